//! Data models for Tumbuh entities.
//!
//! Typed mirrors of the backend's wire shapes:
//!
//! - `Child`, `ChildPayload`: child records and their write payloads
//! - `Measurement`: growth measurements with derived z-score fields
//! - `Milestone`, `DraftAssessment`, `AssessmentSummary`: developmental
//!   milestone screening and locally buffered answers
//! - Immunization types: schedule catalog, records, per-child status
//! - `Recommendation`, `StimulationContent`: suggested stimulation content

pub mod child;
pub mod immunization;
pub mod measurement;
pub mod milestone;
pub mod recommendation;

pub use child::{Child, ChildPayload, Gender};
pub use immunization::{
    ChildImmunization, ImmunizationOverview, ImmunizationSchedule, ImmunizationScheduleResponse,
    ImmunizationState, ImmunizationStatus, ImmunizationSummary, RecordImmunizationPayload,
};
pub use measurement::{Measurement, MeasurementPayload};
pub use milestone::{
    AssessmentStatus, AssessmentSummary, BatchAssessmentRequest, DraftAssessment, DraftMap,
    Milestone,
};
pub use recommendation::{
    ContentType, Priority, Recommendation, RecommendationsResponse, StimulationContent,
};
