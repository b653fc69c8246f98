use crate::domain::contact::ContactRecord;
use crate::domain::settings::{FormSettings, SettingsKey};
use crate::error::Result;
use async_trait::async_trait;

/// Read-only lookup of per-form delivery settings.
#[async_trait]
pub trait SettingsStore: Send + Sync + std::fmt::Debug {
    /// Creates the backing container if it is missing. Safe to call repeatedly.
    async fn ensure_exists(&self) -> Result<()>;

    /// Returns `None` when no settings are configured for the key.
    async fn get(&self, key: &SettingsKey) -> Result<Option<FormSettings>>;
}

/// Write-once storage for submission contact details.
#[async_trait]
pub trait ContactStore: Send + Sync + std::fmt::Debug {
    /// Creates the backing container if it is missing. Safe to call repeatedly.
    async fn ensure_exists(&self) -> Result<()>;

    /// Inserts a new record.
    ///
    /// # Errors
    /// Returns `AppError::Conflict` if a record with the same key already exists.
    async fn insert(&self, record: &ContactRecord) -> Result<()>;
}
