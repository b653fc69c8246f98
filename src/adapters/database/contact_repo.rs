use crate::adapters::database::DbPool;
use crate::core::stores::ContactStore;
use crate::domain::contact::ContactRecord;
use crate::error::{AppError, Result};
use async_trait::async_trait;

const UNIQUE_VIOLATION: &str = "23505";

#[derive(Clone, Debug)]
pub struct PgContactStore {
    pool: DbPool,
}

impl PgContactStore {
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContactStore for PgContactStore {
    #[tracing::instrument(level = "debug", skip(self), err)]
    async fn ensure_exists(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS form_contacts (
                site_url TEXT NOT NULL,
                submission_id TEXT NOT NULL,
                name TEXT,
                email TEXT,
                phone TEXT,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                PRIMARY KEY (site_url, submission_id)
            )
            ",
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Plain insert: a second submission with the same key is a conflict, not an update.
    #[tracing::instrument(
        level = "debug",
        skip(self, record),
        fields(site_url = %record.site_url, submission_id = %record.submission_id),
        err
    )]
    async fn insert(&self, record: &ContactRecord) -> Result<()> {
        sqlx::query("INSERT INTO form_contacts (site_url, submission_id, name, email, phone) VALUES ($1, $2, $3, $4, $5)")
            .bind(&record.site_url)
            .bind(&record.submission_id)
            .bind(&record.name)
            .bind(&record.email)
            .bind(&record.phone)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    AppError::Conflict(format!(
                        "contact for submission {} on {} already stored",
                        record.submission_id, record.site_url
                    ))
                } else {
                    AppError::Database(e)
                }
            })?;

        Ok(())
    }
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.code().as_deref() == Some(UNIQUE_VIOLATION))
}
