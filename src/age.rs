//! Corrected-age calculation for premature infants.
//!
//! Prematurely born children are assessed against their *corrected* age
//! (chronological age minus the weeks they were born before full term)
//! until they reach 24 months chronological age. Growth charts and
//! milestone screens both consume the result of [`calculate_corrected_age`].

use chrono::{Datelike, NaiveDate, Utc};

/// Full-term pregnancy length in weeks; the correction baseline.
const FULL_TERM_WEEKS: i64 = 40;

/// Corrected age stops applying at 24 months chronological age.
const CORRECTED_AGE_CUTOFF_DAYS: i64 = 730;

/// Average days per month used to convert corrected days to months.
const AVG_DAYS_PER_MONTH: f64 = 30.44;

/// Derived age fields for one child at one reference date.
/// Recomputed on demand, never persisted.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct AgeResult {
    pub chronological_months: u32,
    /// Absent when the child is not premature (or has no usable
    /// gestational age); equal to the chronological age once the
    /// correction window has closed.
    pub corrected_months: Option<u32>,
    /// Whether views should prefer the corrected age.
    pub use_corrected: bool,
    pub chronological_display: String,
    pub corrected_display: Option<String>,
}

impl AgeResult {
    fn chronological_only(months: u32, corrected: Option<u32>) -> Self {
        Self {
            chronological_months: months,
            corrected_months: corrected,
            use_corrected: false,
            chronological_display: format_age(months),
            corrected_display: None,
        }
    }
}

/// Whole months between `dob` and `as_of` by calendar-field subtraction,
/// decremented by one when the day-of-month has not yet been reached,
/// floored at zero.
pub fn chronological_age_in_months(dob: NaiveDate, as_of: NaiveDate) -> u32 {
    let years = i64::from(as_of.year()) - i64::from(dob.year());
    let months = i64::from(as_of.month()) - i64::from(dob.month());
    let mut total = years * 12 + months;
    if as_of.day() < dob.day() {
        total -= 1;
    }
    total.max(0) as u32
}

/// Compute chronological and corrected age for a child.
///
/// `as_of` defaults to today. The correction is
/// `chronological - (40 - gestational_age_weeks)` weeks and only applies
/// while the child is under 730 days (24 months) old; past that point, and
/// for term or post-term births, the chronological age is authoritative.
pub fn calculate_corrected_age(
    dob: NaiveDate,
    is_premature: bool,
    gestational_age_weeks: Option<i32>,
    as_of: Option<NaiveDate>,
) -> AgeResult {
    let as_of = as_of.unwrap_or_else(|| Utc::now().date_naive());

    let chronological_months = chronological_age_in_months(dob, as_of);
    let elapsed_days = (as_of - dob).num_days();

    // Not premature, or no usable gestational age: chronological only.
    let weeks = match gestational_age_weeks {
        Some(w) if is_premature && w > 0 => i64::from(w),
        _ => return AgeResult::chronological_only(chronological_months, None),
    };

    // Past the correction window: both fields report the chronological age.
    if elapsed_days >= CORRECTED_AGE_CUTOFF_DAYS {
        return AgeResult::chronological_only(chronological_months, Some(chronological_months));
    }

    // Term or post-term despite the flag.
    let weeks_premature = FULL_TERM_WEEKS - weeks;
    if weeks_premature <= 0 {
        return AgeResult::chronological_only(chronological_months, Some(chronological_months));
    }

    let corrected_days = elapsed_days - weeks_premature * 7;
    let corrected_months = ((corrected_days as f64 / AVG_DAYS_PER_MONTH).floor()).max(0.0) as u32;

    AgeResult {
        chronological_months,
        corrected_months: Some(corrected_months),
        use_corrected: true,
        chronological_display: format_age(chronological_months),
        corrected_display: Some(format_age(corrected_months)),
    }
}

/// Render an age in months as "N bulan" or "Y tahun M bulan".
pub fn format_age(months: u32) -> String {
    let years = months / 12;
    let remaining = months % 12;
    if years > 0 {
        format!("{} tahun {} bulan", years, remaining)
    } else {
        format!("{} bulan", months)
    }
}

// ============================================================================
// Tests
// ============================================================================
