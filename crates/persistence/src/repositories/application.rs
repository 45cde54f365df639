//! Application record repository.

use async_trait::async_trait;
use domain::models::{ApplicationRecord, OfficeLevel};
use domain::services::{ApplicationStore, StoreError};
use sqlx::PgPool;

use super::{convert_rows, store_error};
use crate::entities::ApplicationEntity;
use crate::metrics::QueryTimer;

/// Repository for the applications table.
#[derive(Clone)]
pub struct ApplicationRepository {
    pool: PgPool,
}

impl ApplicationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ApplicationStore for ApplicationRepository {
    async fn get_all_applications(&self) -> Result<Vec<ApplicationRecord>, StoreError> {
        let timer = QueryTimer::new("list_applications");
        let result = sqlx::query_as::<_, ApplicationEntity>(
            r#"
            SELECT id, user_id, applicant_name, service_type, target_office_level,
                   target_office_name, status, approved, submitted_date, completed_date,
                   current_stage, progress, estimated_days, rejection_message
            FROM applications
            ORDER BY created_at, id
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();

        Ok(convert_rows(result.map_err(store_error)?, "applications"))
    }

    async fn get_applications_by_office(
        &self,
        level: OfficeLevel,
        name: &str,
    ) -> Result<Vec<ApplicationRecord>, StoreError> {
        let timer = QueryTimer::new("list_applications_by_office");
        let result = sqlx::query_as::<_, ApplicationEntity>(
            r#"
            SELECT id, user_id, applicant_name, service_type, target_office_level,
                   target_office_name, status, approved, submitted_date, completed_date,
                   current_stage, progress, estimated_days, rejection_message
            FROM applications
            WHERE target_office_level = $1 AND target_office_name = $2
            ORDER BY created_at DESC, id
            "#,
        )
        .bind(level.as_str())
        .bind(name)
        .fetch_all(&self.pool)
        .await;
        timer.record();

        Ok(convert_rows(result.map_err(store_error)?, "applications"))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let timer = QueryTimer::new("ping");
        let result = sqlx::query("SELECT 1").execute(&self.pool).await;
        timer.record();
        result.map(|_| ()).map_err(store_error)
    }
}
