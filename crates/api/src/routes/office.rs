//! The calling official's own office.

use axum::{extract::State, Json};
use domain::models::{ApplicationRecord, OfficeStatsSummary};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::OfficialAuth;

/// `GET /api/office/stats`
pub async fn get_office_stats(
    State(state): State<AppState>,
    auth: OfficialAuth,
) -> Result<Json<OfficeStatsSummary>, ApiError> {
    let summary = state.aggregator.office_summary(&auth.account).await?;
    Ok(Json(summary))
}

/// `GET /api/office/applications`
///
/// Applications addressed to the caller's office, newest first.
pub async fn get_office_applications(
    State(state): State<AppState>,
    auth: OfficialAuth,
) -> Result<Json<Vec<ApplicationRecord>>, ApiError> {
    let records = state
        .applications
        .get_applications_by_office(auth.account.office_level, &auth.account.office_name)
        .await?;

    tracing::debug!(
        office = %auth.account.key(),
        count = records.len(),
        "Listed office applications"
    );
    Ok(Json(records))
}
