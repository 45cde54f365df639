//! Office statistics and hierarchy report models.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::office::OfficeLevel;

/// Computed statistics for one office (or one roll-up of offices).
///
/// `pending` counts Submitted and In Progress records; `in_progress` is the
/// In Progress subset and therefore overlaps `pending`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct OfficeStatsSummary {
    /// Composite `"<level>:<name>"` identifier.
    pub office_id: String,
    pub office_name: String,
    pub office_level: OfficeLevel,
    pub total_applications: i64,
    pub completed: i64,
    pub pending: i64,
    pub rejected: i64,
    pub in_progress: i64,
    /// Completion percentage, two decimals.
    pub efficiency: f64,
    /// Mean days from submission to completion, one decimal.
    pub avg_processing_time: f64,
    pub applications_by_type: BTreeMap<String, i64>,
}

/// Aggregated report returned to a monitor account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct HierarchyReport {
    pub monitor_office: String,
    pub monitor_level: OfficeLevel,
    pub total_subordinates: usize,
    pub total_applications: i64,
    pub overall_efficiency: f64,
    pub subordinate_offices: Vec<OfficeStatsSummary>,
}
