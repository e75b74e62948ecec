//! Client-side entity stores.
//!
//! Every store follows the same protocol: the server owns the data, the
//! store holds a read cache of it, and every successful write is followed
//! by an awaited refetch so callers never see locally patched state. A
//! failed fetch empties the affected cache rather than serving stale
//! entries.

mod children;
mod entity;
mod immunizations;
mod measurements;
mod milestones;
mod recommendations;

pub use children::{ChildStore, SELECTED_CHILD_KEY};
pub use entity::{Endpoint, EntityPage, EntityStore, StoreError};
pub use immunizations::{immunization_store, ImmunizationStore};
pub use measurements::{measurement_store, MeasurementStore};
pub use milestones::{MilestoneStore, DRAFTS_KEY};
pub use recommendations::{recommendation_store, RecommendationStore};
