//! Official account entity (database row mapping).

use domain::models::{OfficeAccount, OfficeLevel};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the officials table.
#[derive(Debug, Clone, FromRow)]
pub struct OfficialEntity {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub office_level: String,
    pub office_name: String,
    pub is_monitor: bool,
    pub monitors: Vec<String>,
}

impl TryFrom<OfficialEntity> for OfficeAccount {
    type Error = String;

    fn try_from(entity: OfficialEntity) -> Result<Self, Self::Error> {
        let office_level = entity.office_level.parse::<OfficeLevel>()?;
        let mut monitors = Vec::with_capacity(entity.monitors.len());
        for raw in &entity.monitors {
            let level = raw.parse::<OfficeLevel>()?;
            if !monitors.contains(&level) {
                monitors.push(level);
            }
        }

        Ok(Self {
            id: entity.id,
            full_name: entity.full_name,
            email: entity.email,
            office_level,
            office_name: entity.office_name,
            is_monitor: entity.is_monitor,
            monitors,
        })
    }
}
