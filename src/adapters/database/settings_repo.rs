use crate::adapters::database::DbPool;
use crate::adapters::database::records::FormSettingsRecord;
use crate::core::stores::SettingsStore;
use crate::domain::settings::{FormSettings, SettingsKey};
use crate::error::Result;
use async_trait::async_trait;

/// Form delivery settings, administered outside this service.
#[derive(Clone, Debug)]
pub struct PgSettingsStore {
    pool: DbPool,
}

impl PgSettingsStore {
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SettingsStore for PgSettingsStore {
    #[tracing::instrument(level = "debug", skip(self), err)]
    async fn ensure_exists(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS form_settings (
                partition_key TEXT NOT NULL,
                row_key TEXT NOT NULL,
                from_address TEXT NOT NULL,
                to_address TEXT NOT NULL,
                template_id TEXT,
                PRIMARY KEY (partition_key, row_key)
            )
            ",
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    #[tracing::instrument(level = "debug", skip(self), err)]
    async fn get(&self, key: &SettingsKey) -> Result<Option<FormSettings>> {
        let record = sqlx::query_as::<_, FormSettingsRecord>(
            "SELECT from_address, to_address, template_id FROM form_settings WHERE partition_key = $1 AND row_key = $2",
        )
        .bind(&key.partition_key)
        .bind(&key.row_key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record.map(Into::into))
    }
}
