//! Read-side interfaces to the application store and the office directory.
//!
//! The aggregation service only reads through these traits. The persistence
//! crate implements them over PostgreSQL; [`InMemoryStore`] backs tests and
//! local development.

use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{ApplicationRecord, OfficeAccount, OfficeLevel};

/// Failure reading from a backing store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Read access to application records.
#[async_trait::async_trait]
pub trait ApplicationStore: Send + Sync {
    /// Snapshot of every stored application.
    async fn get_all_applications(&self) -> Result<Vec<ApplicationRecord>, StoreError>;

    /// Applications targeting exactly the given office.
    async fn get_applications_by_office(
        &self,
        level: OfficeLevel,
        name: &str,
    ) -> Result<Vec<ApplicationRecord>, StoreError>;

    /// Liveness check used by the readiness endpoint.
    async fn ping(&self) -> Result<(), StoreError>;
}

/// Read access to official accounts.
#[async_trait::async_trait]
pub trait OfficeDirectory: Send + Sync {
    async fn get_all_officials(&self) -> Result<Vec<OfficeAccount>, StoreError>;

    async fn find_official(&self, id: Uuid) -> Result<Option<OfficeAccount>, StoreError>;
}

/// In-memory store implementing both traits.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    applications: RwLock<Vec<ApplicationRecord>>,
    officials: RwLock<Vec<OfficeAccount>>,
    unavailable: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data(officials: Vec<OfficeAccount>, applications: Vec<ApplicationRecord>) -> Self {
        Self {
            applications: RwLock::new(applications),
            officials: RwLock::new(officials),
            unavailable: AtomicBool::new(false),
        }
    }

    pub async fn insert_application(&self, record: ApplicationRecord) {
        self.applications.write().await.push(record);
    }

    pub async fn insert_official(&self, account: OfficeAccount) {
        self.officials.write().await.push(account);
    }

    /// Make every subsequent read fail with [`StoreError::Unavailable`].
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            tracing::warn!("In-memory store simulating outage");
            return Err(StoreError::Unavailable("in-memory store is offline".to_string()));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl ApplicationStore for InMemoryStore {
    async fn get_all_applications(&self) -> Result<Vec<ApplicationRecord>, StoreError> {
        self.check_available()?;
        Ok(self.applications.read().await.clone())
    }

    async fn get_applications_by_office(
        &self,
        level: OfficeLevel,
        name: &str,
    ) -> Result<Vec<ApplicationRecord>, StoreError> {
        self.check_available()?;
        Ok(self
            .applications
            .read()
            .await
            .iter()
            .filter(|r| r.belongs_to(level, name))
            .cloned()
            .collect())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.check_available()
    }
}

#[async_trait::async_trait]
impl OfficeDirectory for InMemoryStore {
    async fn get_all_officials(&self) -> Result<Vec<OfficeAccount>, StoreError> {
        self.check_available()?;
        Ok(self.officials.read().await.clone())
    }

    async fn find_official(&self, id: Uuid) -> Result<Option<OfficeAccount>, StoreError> {
        self.check_available()?;
        Ok(self.officials.read().await.iter().find(|o| o.id == id).cloned())
    }
}
