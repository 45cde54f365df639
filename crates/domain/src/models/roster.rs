//! Fixed-composition roster configuration.
//!
//! Some monitors report on a fixed, named set of subordinate offices rather
//! than on whatever the directory contains. The set is described as an
//! office catalogue plus one roster per monitor:
//!
//! ```toml
//! [[offices]]
//! key = "municipal:Pokhara"
//! source = { kind = "live", selector = { level = "local", name_contains = "Pokhara Ward Office" } }
//!
//! [[offices]]
//! key = "district:Kaski"
//! source = { kind = "roll_up", children = ["municipal:Pokhara"] }
//!
//! [[monitors]]
//! office_name = "Gandaki Province Monitor"
//! subordinates = ["district:Kaski"]
//! ```

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;
use validator::{Validate, ValidationError};

use super::application::ApplicationRecord;
use super::office::{OfficeKey, OfficeLevel};

/// Root of the roster configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RosterConfig {
    #[serde(default)]
    pub offices: Vec<OfficeDefinition>,
    #[serde(default)]
    pub monitors: Vec<MonitorRoster>,
}

/// A named office in the catalogue and where its figures come from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfficeDefinition {
    pub key: OfficeKey,
    pub source: SourceDefinition,
}

/// Ordered subordinate list for one monitor, matched on the monitor's office name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorRoster {
    pub office_name: String,
    pub subordinates: Vec<OfficeKey>,
}

/// Where a catalogue entry's figures come from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceDefinition {
    /// Computed from stored records. Without a selector, records are matched
    /// on the entry's own key.
    Live {
        #[serde(default)]
        selector: Option<RecordSelector>,
    },
    /// Fixed published figures for an office with no live data.
    Placeholder(PlaceholderFigures),
    /// Field-wise sum of other catalogue entries.
    RollUp { children: Vec<OfficeKey> },
}

/// Matches stored records by level and either an exact or a partial office name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_selector_name"))]
pub struct RecordSelector {
    pub level: OfficeLevel,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub name_contains: Option<String>,
}

impl RecordSelector {
    pub fn exact(key: &OfficeKey) -> Self {
        Self {
            level: key.level,
            name: Some(key.name.clone()),
            name_contains: None,
        }
    }

    pub fn containing(level: OfficeLevel, fragment: impl Into<String>) -> Self {
        Self {
            level,
            name: None,
            name_contains: Some(fragment.into()),
        }
    }

    pub fn matches(&self, record: &ApplicationRecord) -> bool {
        if record.office_level != self.level {
            return false;
        }
        match (&self.name, &self.name_contains) {
            (Some(name), _) => record.office_name == *name,
            (None, Some(fragment)) => record.office_name.contains(fragment.as_str()),
            (None, None) => false,
        }
    }
}

/// Exactly one of `name` and `name_contains` must be set and non-empty.
fn validate_selector_name(selector: &RecordSelector) -> Result<(), ValidationError> {
    match (&selector.name, &selector.name_contains) {
        (Some(name), None) if !name.is_empty() => Ok(()),
        (None, Some(fragment)) if !fragment.is_empty() => Ok(()),
        (Some(_), Some(_)) => Err(ValidationError::new("ambiguous_selector").with_message(
            Cow::Borrowed("Selector must set only one of name and name_contains"),
        )),
        _ => Err(ValidationError::new("empty_selector").with_message(Cow::Borrowed(
            "Selector needs a non-empty name or name_contains",
        ))),
    }
}

/// Published figures for an office that has no live data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_figure_consistency"))]
pub struct PlaceholderFigures {
    #[validate(range(min = 0, message = "total_applications must not be negative"))]
    pub total_applications: i64,
    #[validate(range(min = 0, message = "completed must not be negative"))]
    pub completed: i64,
    #[validate(range(min = 0, message = "pending must not be negative"))]
    pub pending: i64,
    #[validate(range(min = 0, message = "rejected must not be negative"))]
    pub rejected: i64,
    #[validate(range(min = 0, message = "in_progress must not be negative"))]
    pub in_progress: i64,
    /// Published efficiency; recomputed from the counts when absent.
    #[serde(default)]
    #[validate(range(min = 0.0, max = 100.0, message = "efficiency must be between 0 and 100"))]
    pub efficiency: Option<f64>,
    #[serde(default)]
    #[validate(range(min = 0.0, message = "avg_processing_time must not be negative"))]
    pub avg_processing_time: f64,
    #[serde(default)]
    #[validate(custom(function = "validate_type_counts"))]
    pub applications_by_type: BTreeMap<String, i64>,
}

/// Sub-counts must fit inside the counts they belong to.
fn validate_figure_consistency(figures: &PlaceholderFigures) -> Result<(), ValidationError> {
    if figures.completed > figures.total_applications {
        return Err(ValidationError::new("completed_exceeds_total").with_message(Cow::Owned(
            format!(
                "completed ({}) exceeds total_applications ({})",
                figures.completed, figures.total_applications
            ),
        )));
    }
    if figures.in_progress > figures.pending {
        return Err(ValidationError::new("in_progress_exceeds_pending").with_message(
            Cow::Owned(format!(
                "in_progress ({}) exceeds pending ({})",
                figures.in_progress, figures.pending
            )),
        ));
    }
    Ok(())
}

fn validate_type_counts(counts: &BTreeMap<String, i64>) -> Result<(), ValidationError> {
    if counts.values().any(|c| *c < 0) {
        return Err(ValidationError::new("negative_type_count").with_message(Cow::Borrowed(
            "applications_by_type counts must not be negative",
        )));
    }
    Ok(())
}
