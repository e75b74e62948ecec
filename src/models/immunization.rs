use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One entry in the national immunization schedule catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct ImmunizationSchedule {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub name_id: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub age_min_days: Option<i32>,
    #[serde(default)]
    pub age_optimal_days: Option<i32>,
    #[serde(default)]
    pub age_max_days: Option<i32>,
    #[serde(default)]
    pub age_min_months: Option<i32>,
    #[serde(default)]
    pub age_optimal_months: Option<i32>,
    #[serde(default)]
    pub age_max_months: Option<i32>,
    pub dose_number: i32,
    #[serde(default)]
    pub total_doses: Option<i32>,
    #[serde(default)]
    pub interval_from_previous_days: Option<i32>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub priority: String,
    #[serde(default)]
    pub is_required: bool,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub source: String,
}

/// A vaccination actually administered to a child.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct ChildImmunization {
    pub id: String,
    pub child_id: String,
    pub immunization_schedule_id: String,
    pub given_date: NaiveDate,
    #[serde(default)]
    pub given_at_age_days: Option<i64>,
    #[serde(default)]
    pub given_at_age_months: Option<i32>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub healthcare_facility: Option<String>,
    #[serde(default)]
    pub doctor_name: Option<String>,
    #[serde(default)]
    pub vaccine_batch_number: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub is_on_schedule: Option<bool>,
    #[serde(default)]
    pub is_catch_up: bool,
    #[serde(default)]
    pub schedule: Option<ImmunizationSchedule>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub enum ImmunizationState {
    Pending,
    Completed,
    Overdue,
    Upcoming,
}

/// A schedule entry joined with the child's record and due-date math.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct ImmunizationStatus {
    pub schedule: ImmunizationSchedule,
    pub status: ImmunizationState,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub due_age_months: Option<i32>,
    #[serde(default)]
    pub days_until_due: Option<i64>,
    #[serde(default)]
    pub days_overdue: Option<i64>,
    #[serde(default)]
    pub record: Option<ChildImmunization>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct ImmunizationSummary {
    pub total: u32,
    pub completed: u32,
    pub pending: u32,
    pub overdue: u32,
    pub upcoming: u32,
}

/// Full schedule response for one child.
#[derive(Debug, Clone, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct ImmunizationScheduleResponse {
    pub child_id: String,
    #[serde(default)]
    pub age_months: i32,
    #[serde(default)]
    pub age_days: i64,
    #[serde(default)]
    pub immunizations: Vec<ImmunizationStatus>,
    #[serde(default)]
    pub summary: Option<ImmunizationSummary>,
}

/// Derived fields the schedule endpoint reports alongside the item list.
#[derive(Debug, Clone)]
pub struct ImmunizationOverview {
    pub age_months: i32,
    pub age_days: i64,
    pub summary: Option<ImmunizationSummary>,
}

/// Payload for recording an administered vaccination.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct RecordImmunizationPayload {
    pub immunization_schedule_id: String,
    pub given_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub healthcare_facility: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doctor_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vaccine_batch_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}
