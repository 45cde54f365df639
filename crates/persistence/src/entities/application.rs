//! Application entity (database row mapping).

use domain::models::{ApplicationRecord, ApplicationStatus, OfficeLevel};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the applications table.
#[derive(Debug, Clone, FromRow)]
pub struct ApplicationEntity {
    pub id: String,
    pub user_id: Option<Uuid>,
    pub applicant_name: String,
    pub service_type: Option<String>,
    pub target_office_level: String,
    pub target_office_name: String,
    pub status: String,
    pub approved: Option<bool>,
    pub submitted_date: String,
    pub completed_date: Option<String>,
    pub current_stage: Option<String>,
    pub progress: i32,
    pub estimated_days: Option<i32>,
    pub rejection_message: Option<String>,
}

impl TryFrom<ApplicationEntity> for ApplicationRecord {
    type Error = String;

    fn try_from(entity: ApplicationEntity) -> Result<Self, Self::Error> {
        Ok(Self {
            office_level: entity.target_office_level.parse::<OfficeLevel>()?,
            status: entity.status.parse::<ApplicationStatus>()?,
            id: entity.id,
            user_id: entity.user_id,
            applicant_name: entity.applicant_name,
            service_type: entity.service_type,
            office_name: entity.target_office_name,
            approved: entity.approved,
            submitted_date: entity.submitted_date,
            completed_date: entity.completed_date,
            current_stage: entity.current_stage,
            progress: entity.progress,
            estimated_days: entity.estimated_days,
            rejection_message: entity.rejection_message,
        })
    }
}
