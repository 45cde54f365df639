//! Metric calculation over application records.
//!
//! Everything here is pure. Figures are gathered into a [`StatsAccumulator`],
//! which can be merged with other accumulators for roll-ups and finished
//! into an [`OfficeStatsSummary`] once, so ratios are always derived from
//! summed counts and never averaged.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::collections::BTreeMap;

use crate::models::{
    ApplicationRecord, ApplicationStatus, OfficeKey, OfficeLevel, OfficeStatsSummary,
    PlaceholderFigures,
};

/// Key used in `applications_by_type` for records without a service type.
pub const UNKNOWN_SERVICE_TYPE: &str = "unknown";

/// Naive formats tried after RFC 3339, most specific first.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Running counts for one office or one roll-up of offices.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatsAccumulator {
    pub total: i64,
    pub completed: i64,
    pub pending: i64,
    pub rejected: i64,
    pub in_progress: i64,
    /// Sum of processing days over timed records.
    pub processing_days: i64,
    /// Completed records with both dates readable.
    pub timed_records: i64,
    pub by_type: BTreeMap<String, i64>,
}

impl StatsAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a ApplicationRecord>,
    {
        let mut acc = Self::new();
        for record in records {
            acc.record(record);
        }
        acc
    }

    /// Counts contributed by a placeholder inside a roll-up. Placeholders
    /// carry no per-record dates, so they add nothing to timing.
    pub fn from_placeholder(figures: &PlaceholderFigures) -> Self {
        Self {
            total: figures.total_applications,
            completed: figures.completed,
            pending: figures.pending,
            rejected: figures.rejected,
            in_progress: figures.in_progress,
            processing_days: 0,
            timed_records: 0,
            by_type: figures.applications_by_type.clone(),
        }
    }

    pub fn record(&mut self, record: &ApplicationRecord) {
        self.total += 1;

        match record.status {
            ApplicationStatus::Completed => self.completed += 1,
            ApplicationStatus::Submitted => self.pending += 1,
            ApplicationStatus::InProgress => {
                self.pending += 1;
                self.in_progress += 1;
            }
            ApplicationStatus::Rejected => {}
        }

        if record.is_rejected() {
            self.rejected += 1;
        }

        if let Some(days) = processing_days(record) {
            self.processing_days += days;
            self.timed_records += 1;
        }

        let service_type = record
            .service_type
            .as_deref()
            .unwrap_or(UNKNOWN_SERVICE_TYPE);
        *self.by_type.entry(service_type.to_string()).or_insert(0) += 1;
    }

    /// Field-wise sum.
    pub fn merge(&mut self, other: &StatsAccumulator) {
        self.total += other.total;
        self.completed += other.completed;
        self.pending += other.pending;
        self.rejected += other.rejected;
        self.in_progress += other.in_progress;
        self.processing_days += other.processing_days;
        self.timed_records += other.timed_records;
        for (service_type, count) in &other.by_type {
            *self.by_type.entry(service_type.clone()).or_insert(0) += count;
        }
    }

    pub fn efficiency(&self) -> f64 {
        efficiency(self.completed, self.total)
    }

    pub fn avg_processing_time(&self) -> f64 {
        if self.timed_records == 0 {
            return 0.0;
        }
        round_to(self.processing_days as f64 / self.timed_records as f64, 1)
    }

    pub fn finish(&self, key: &OfficeKey) -> OfficeStatsSummary {
        OfficeStatsSummary {
            office_id: key.to_string(),
            office_name: key.name.clone(),
            office_level: key.level,
            total_applications: self.total,
            completed: self.completed,
            pending: self.pending,
            rejected: self.rejected,
            in_progress: self.in_progress,
            efficiency: self.efficiency(),
            avg_processing_time: self.avg_processing_time(),
            applications_by_type: self.by_type.clone(),
        }
    }
}

/// Summarize a set of records attributed to one office.
pub fn summarize<'a, I>(records: I, office_name: &str, office_level: OfficeLevel) -> OfficeStatsSummary
where
    I: IntoIterator<Item = &'a ApplicationRecord>,
{
    StatsAccumulator::from_records(records).finish(&OfficeKey::new(office_level, office_name))
}

/// Summary for a standalone placeholder: its published figures as given.
pub fn placeholder_summary(key: &OfficeKey, figures: &PlaceholderFigures) -> OfficeStatsSummary {
    OfficeStatsSummary {
        office_id: key.to_string(),
        office_name: key.name.clone(),
        office_level: key.level,
        total_applications: figures.total_applications,
        completed: figures.completed,
        pending: figures.pending,
        rejected: figures.rejected,
        in_progress: figures.in_progress,
        efficiency: figures
            .efficiency
            .unwrap_or_else(|| efficiency(figures.completed, figures.total_applications)),
        avg_processing_time: figures.avg_processing_time,
        applications_by_type: figures.applications_by_type.clone(),
    }
}

/// Completion percentage rounded to two decimals; 0 for an empty set.
pub fn efficiency(completed: i64, total: i64) -> f64 {
    if total <= 0 {
        return 0.0;
    }
    round_to(completed as f64 / total as f64 * 100.0, 2)
}

/// Whole days between submission and completion for a completed record.
///
/// `None` when the record is not completed, has no completion date, either
/// date is unreadable, or completion precedes submission.
pub fn processing_days(record: &ApplicationRecord) -> Option<i64> {
    if record.status != ApplicationStatus::Completed {
        return None;
    }
    let completed_raw = record.completed_date.as_deref()?;
    let submitted = parse_record_date(&record.submitted_date)?;
    let completed = parse_record_date(completed_raw)?;

    let days = (completed - submitted).num_days();
    if days < 0 {
        tracing::debug!(
            application_id = %record.id,
            submitted = %record.submitted_date,
            completed = %completed_raw,
            "Completion precedes submission, excluding from timing"
        );
        return None;
    }
    Some(days)
}

/// Parse a stored timestamp into its calendar date.
///
/// Accepts RFC 3339 (`Z` or numeric offset, keeping the local wall date),
/// naive date-times, and bare dates.
pub fn parse_record_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_local().date());
    }

    let naive = trimmed
        .strip_suffix('Z')
        .or_else(|| trimmed.strip_suffix('z'))
        .unwrap_or(trimmed);

    if let Ok(dt) = DateTime::parse_from_str(naive, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Some(dt.naive_local().date());
    }

    NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(naive, fmt).ok())
        .map(|dt| dt.date())
        .or_else(|| NaiveDate::parse_from_str(naive, "%Y-%m-%d").ok())
}

/// Round to the given number of decimals, resolving exact binary ties to
/// even (`4.25 -> 4.2`, `3.125 -> 3.12`).
///
/// Fixed-precision formatting rounds the exact binary value of `value`, so a
/// product such as `1.115 * 100` that lands on `.5` only after floating-point
/// error is not mistaken for a tie.
pub fn round_to(value: f64, decimals: usize) -> f64 {
    if !value.is_finite() {
        return value;
    }
    format!("{:.*}", decimals, value).parse().unwrap_or(value)
}
