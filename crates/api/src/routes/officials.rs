//! Official directory listing.

use axum::{extract::State, Json};
use domain::models::{OfficeAccount, OfficeLevel};
use serde::Serialize;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::OfficialAuth;

/// Public view of an official account.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct OfficialSummary {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub office_level: OfficeLevel,
    pub office_name: String,
    pub is_monitor: bool,
}

impl From<OfficeAccount> for OfficialSummary {
    fn from(account: OfficeAccount) -> Self {
        Self {
            id: account.id,
            full_name: account.full_name,
            email: account.email,
            office_level: account.office_level,
            office_name: account.office_name,
            is_monitor: account.is_monitor,
        }
    }
}

/// `GET /api/officials`
///
/// Every official in the directory, the caller included.
pub async fn list_officials(
    State(state): State<AppState>,
    _auth: OfficialAuth,
) -> Result<Json<Vec<OfficialSummary>>, ApiError> {
    let officials = state.directory.get_all_officials().await?;
    Ok(Json(
        officials.into_iter().map(OfficialSummary::from).collect(),
    ))
}
