//! Official directory repository.

use async_trait::async_trait;
use domain::models::OfficeAccount;
use domain::services::{OfficeDirectory, StoreError};
use sqlx::PgPool;
use uuid::Uuid;

use super::{convert_rows, store_error};
use crate::entities::OfficialEntity;
use crate::metrics::QueryTimer;

/// Repository for the officials table.
#[derive(Clone)]
pub struct OfficialRepository {
    pool: PgPool,
}

impl OfficialRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OfficeDirectory for OfficialRepository {
    async fn get_all_officials(&self) -> Result<Vec<OfficeAccount>, StoreError> {
        let timer = QueryTimer::new("list_officials");
        let result = sqlx::query_as::<_, OfficialEntity>(
            r#"
            SELECT id, full_name, email, office_level, office_name, is_monitor, monitors
            FROM officials
            ORDER BY created_at, id
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();

        Ok(convert_rows(result.map_err(store_error)?, "officials"))
    }

    async fn find_official(&self, id: Uuid) -> Result<Option<OfficeAccount>, StoreError> {
        let timer = QueryTimer::new("find_official_by_id");
        let result = sqlx::query_as::<_, OfficialEntity>(
            r#"
            SELECT id, full_name, email, office_level, office_name, is_monitor, monitors
            FROM officials
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();

        let rows: Vec<OfficialEntity> = result.map_err(store_error)?.into_iter().collect();
        Ok(convert_rows(rows, "officials").into_iter().next())
    }
}
