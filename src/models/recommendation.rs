use serde::{Deserialize, Serialize};

use super::Milestone;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub enum ContentType {
    Video,
    Article,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub enum Priority {
    High,
    Medium,
    Low,
}

/// A stimulation video or article from the content catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct StimulationContent {
    pub id: String,
    #[serde(default)]
    pub milestone_id: Option<String>,
    pub category: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub content_type: ContentType,
    pub url: String,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub age_min_months: Option<i32>,
    #[serde(default)]
    pub age_max_months: Option<i32>,
}

/// Content the backend recommends for a child's current age and
/// milestone gaps.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Recommendation {
    pub content: StimulationContent,
    pub reason: String,
    pub priority: Priority,
    #[serde(default)]
    pub related_milestone: Option<Milestone>,
}

#[derive(Debug, Clone, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct RecommendationsResponse {
    pub child_id: String,
    #[serde(default)]
    pub age_months: i32,
    #[serde(default)]
    pub recommendations: Vec<Recommendation>,
}
