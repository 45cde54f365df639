//! Citizen service applications routed to an office.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::office::{OfficeKey, OfficeLevel};

/// Lifecycle status of an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApplicationStatus {
    Submitted,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Submitted => "Submitted",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
            Self::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Submitted" => Ok(Self::Submitted),
            "In Progress" => Ok(Self::InProgress),
            "Completed" => Ok(Self::Completed),
            "Rejected" => Ok(Self::Rejected),
            other => Err(format!("Unknown application status: {}", other)),
        }
    }
}

/// A single application as stored, with timestamps kept in their raw form.
///
/// Dates are parsed leniently when metrics are computed; a record whose
/// dates cannot be read still counts toward every figure except
/// processing time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationRecord {
    pub id: String,
    pub user_id: Option<Uuid>,
    pub applicant_name: String,
    pub service_type: Option<String>,
    #[serde(rename = "target_office_level")]
    pub office_level: OfficeLevel,
    #[serde(rename = "target_office_name")]
    pub office_name: String,
    pub status: ApplicationStatus,
    pub approved: Option<bool>,
    pub submitted_date: String,
    pub completed_date: Option<String>,
    pub current_stage: Option<String>,
    #[serde(default)]
    pub progress: i32,
    pub estimated_days: Option<i32>,
    pub rejection_message: Option<String>,
}

impl ApplicationRecord {
    /// Create a freshly submitted record for the given office.
    pub fn new(
        id: impl Into<String>,
        office_level: OfficeLevel,
        office_name: impl Into<String>,
        submitted_date: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            user_id: None,
            applicant_name: String::new(),
            service_type: None,
            office_level,
            office_name: office_name.into(),
            status: ApplicationStatus::Submitted,
            approved: None,
            submitted_date: submitted_date.into(),
            completed_date: None,
            current_stage: None,
            progress: 0,
            estimated_days: None,
            rejection_message: None,
        }
    }

    pub fn with_status(mut self, status: ApplicationStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_service_type(mut self, service_type: impl Into<String>) -> Self {
        self.service_type = Some(service_type.into());
        self
    }

    pub fn with_approved(mut self, approved: bool) -> Self {
        self.approved = Some(approved);
        self
    }

    /// Mark the record completed on the given raw date.
    pub fn completed_on(mut self, completed_date: impl Into<String>) -> Self {
        self.status = ApplicationStatus::Completed;
        self.completed_date = Some(completed_date.into());
        self.progress = 100;
        self
    }

    pub fn office_key(&self) -> OfficeKey {
        OfficeKey::new(self.office_level, self.office_name.clone())
    }

    pub fn belongs_to(&self, level: OfficeLevel, name: &str) -> bool {
        self.office_level == level && self.office_name == name
    }

    /// Rejected by status, or explicitly disapproved.
    pub fn is_rejected(&self) -> bool {
        self.status == ApplicationStatus::Rejected || self.approved == Some(false)
    }
}
