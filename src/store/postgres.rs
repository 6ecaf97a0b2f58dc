use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;

use crate::config::DatabaseConfig;
use crate::model::{Contact, ContactId, ContactPayload, PageRequest};
use crate::store::traits::{ContactStore, StoreError, StoreResult};

const SELECT_CONTACT: &str = "SELECT id, name, email, phone, created_at, updated_at FROM contacts";

const UNIQUE_VIOLATION: &str = "23505";

#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Create a new PostgreSQL store with the given database URL and
    /// pool settings
    pub async fn connect(database_url: &str, settings: &DatabaseConfig) -> Result<Self> {
        let statement_timeout = settings.statement_timeout_ms.to_string();
        let options = PgConnectOptions::from_str(database_url)
            .context("Invalid PostgreSQL connection string")?
            .options([("statement_timeout", statement_timeout.as_str())]);

        let pool = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .acquire_timeout(Duration::from_secs(settings.acquire_timeout_secs))
            .connect_with(options)
            .await
            .context("Failed to create PostgreSQL connection pool")?;

        Ok(Self { pool })
    }

    /// Wrap an existing pool, e.g. one owned by a test harness
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Round-trip a trivial query to verify connectivity
    pub async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .context("Unable to ping database")?;
        Ok(())
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait::async_trait]
impl ContactStore for PostgresStore {
    async fn list_contacts(&self) -> StoreResult<Vec<Contact>> {
        let contacts = sqlx::query_as::<_, Contact>(SELECT_CONTACT)
            .fetch_all(&self.pool)
            .await?;

        Ok(contacts)
    }

    async fn list_contacts_page(&self, page: PageRequest) -> StoreResult<(Vec<Contact>, i64)> {
        let contacts = sqlx::query_as::<_, Contact>(&format!(
            "{SELECT_CONTACT} ORDER BY id LIMIT $1 OFFSET $2"
        ))
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM contacts")
            .fetch_one(&self.pool)
            .await?;

        Ok((contacts, total))
    }

    async fn get_contact(&self, id: ContactId) -> StoreResult<Contact> {
        sqlx::query_as::<_, Contact>(&format!("{SELECT_CONTACT} WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound)
    }

    async fn email_exists(&self, email: &str) -> StoreResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM contacts WHERE email = $1)")
                .bind(email)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    async fn create_contact(&self, contact: &ContactPayload) -> StoreResult<ContactId> {
        let id: ContactId = sqlx::query_scalar(
            "INSERT INTO contacts (name, email, phone) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(&contact.name)
        .bind(&contact.email)
        .bind(&contact.phone)
        .fetch_one(&self.pool)
        .await
        .map_err(classify)?;

        Ok(id)
    }

    async fn update_contact(&self, id: ContactId, contact: &ContactPayload) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE contacts
            SET name = $1, email = $2, phone = $3, updated_at = NOW()
            WHERE id = $4
            "#,
        )
        .bind(&contact.name)
        .bind(&contact.email)
        .bind(&contact.phone)
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(classify)?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(StoreError::NotFound);
        }

        tx.commit().await?;
        Ok(())
    }

    async fn delete_contact(&self, id: ContactId) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM contacts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        Ok(())
    }
}

/// Map a unique-constraint violation to `DuplicateEmail`; the only unique
/// column a contact write can collide on is `email`.
fn classify(err: sqlx::Error) -> StoreError {
    if is_unique_violation(&err) {
        StoreError::DuplicateEmail
    } else {
        StoreError::Database(err)
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().as_deref() == Some(UNIQUE_VIOLATION),
        _ => false,
    }
}
