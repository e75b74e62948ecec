use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A developmental milestone question from the screening catalog
/// (learning-pyramid and Denver II sources).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Milestone {
    pub id: String,
    pub age_months: i32,
    #[serde(default)]
    pub min_age_range: Option<i32>,
    #[serde(default)]
    pub max_age_range: Option<i32>,
    /// sensory, motor, perception, cognitive
    pub category: String,
    pub question: String,
    #[serde(default)]
    pub question_en: Option<String>,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub is_red_flag: bool,
    /// Learning-pyramid level 1-4
    #[serde(default)]
    pub pyramid_level: i32,
    /// Denver II domain: PS, FM, L, GM
    #[serde(default)]
    pub denver_domain: Option<String>,
}

/// Answer to one milestone question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub enum AssessmentStatus {
    Yes,
    No,
    Sometimes,
}

impl std::fmt::Display for AssessmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssessmentStatus::Yes => write!(f, "yes"),
            AssessmentStatus::No => write!(f, "no"),
            AssessmentStatus::Sometimes => write!(f, "sometimes"),
        }
    }
}

/// A locally buffered, not-yet-submitted milestone evaluation.
/// Matches the backend's batch item shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct DraftAssessment {
    pub milestone_id: String,
    pub status: AssessmentStatus,
    #[serde(default)]
    pub notes: String,
}

/// Buffered drafts keyed by child id, in insertion order per child.
pub type DraftMap = HashMap<String, Vec<DraftAssessment>>;

/// Batched write of every draft for one child.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct BatchAssessmentRequest {
    pub assessment_date: NaiveDate,
    pub items: Vec<DraftAssessment>,
}

/// Progress summary the backend derives from a child's assessments.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct AssessmentSummary {
    pub total_milestones: i32,
    pub completed_milestones: i32,
    /// category -> percentage
    #[serde(default)]
    pub progress_by_category: HashMap<String, f64>,
    #[serde(default)]
    pub red_flags_detected: Vec<Milestone>,
    #[serde(default)]
    pub pyramid_warnings: Vec<String>,
    #[serde(default)]
    pub next_milestones: Vec<Milestone>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&AssessmentStatus::Sometimes).expect("serialize"),
            r#""sometimes""#
        );
        let status: AssessmentStatus = serde_json::from_str(r#""no""#).expect("parse");
        assert_eq!(status, AssessmentStatus::No);
    }

    #[test]
    fn test_draft_map_round_trip() {
        let mut drafts = DraftMap::new();
        drafts.insert(
            "child-1".to_string(),
            vec![DraftAssessment {
                milestone_id: "ms-1".to_string(),
                status: AssessmentStatus::Yes,
                notes: "sudah lancar".to_string(),
            }],
        );

        let raw = serde_json::to_string(&drafts).expect("serialize");
        let restored: DraftMap = serde_json::from_str(&raw).expect("parse");
        assert_eq!(restored, drafts);
    }
}
