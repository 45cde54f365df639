//! Monitor hierarchy statistics.

use axum::{extract::State, Json};
use domain::models::HierarchyReport;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::OfficialAuth;
use crate::middleware::record_hierarchy_report;

/// `GET /api/monitor/hierarchy-stats`
///
/// Aggregated statistics over every office the calling monitor oversees.
/// Officials that are not monitors get 403.
pub async fn get_hierarchy_stats(
    State(state): State<AppState>,
    auth: OfficialAuth,
) -> Result<Json<HierarchyReport>, ApiError> {
    let outcome = state
        .aggregator
        .build_report_with_policy(&auth.account)
        .await
        .map_err(|e| {
            tracing::info!(
                official_id = %auth.account.id,
                office = %auth.account.office_name,
                error = %e,
                "Hierarchy report refused"
            );
            ApiError::from(e)
        })?;

    record_hierarchy_report(outcome.policy.as_str());
    Ok(Json(outcome.report))
}
