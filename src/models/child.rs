use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::age::{calculate_corrected_age, AgeResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub enum Gender {
    Male,
    Female,
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Gender::Male => write!(f, "Laki-laki"),
            Gender::Female => write!(f, "Perempuan"),
        }
    }
}

/// A child record as owned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Child {
    pub id: String,
    #[serde(default)]
    pub parent_id: String,
    pub name: String,
    /// Date of birth (YYYY-MM-DD)
    pub dob: NaiveDate,
    pub gender: Gender,
    /// Birth weight in kg
    pub birth_weight: f64,
    /// Birth height in cm
    pub birth_height: f64,
    pub is_premature: bool,
    /// Gestational age in weeks, when premature
    #[serde(default)]
    pub gestational_age: Option<i32>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Child {
    /// Chronological and corrected age at `as_of` (today when `None`).
    pub fn age(&self, as_of: Option<NaiveDate>) -> AgeResult {
        calculate_corrected_age(self.dob, self.is_premature, self.gestational_age, as_of)
    }
}

/// Create/full-update payload for a child.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct ChildPayload {
    pub name: String,
    pub dob: NaiveDate,
    pub gender: Gender,
    pub birth_weight: f64,
    pub birth_height: f64,
    pub is_premature: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gestational_age: Option<i32>,
}
