use async_trait::async_trait;
use serde_json::Value;
use sqlx::{PgPool, Row};
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage backend error: {0}")]
    Backend(#[from] sqlx::Error),
    #[error("persisted document is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("no profile registered for {0}")]
    UnknownUser(String),
}

/// Durable storage for the per-user document: one JSON blob per user id,
/// overwritten on conflict. `load` returning `None` is normal first use,
/// not an error.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn load(&self, user_id: Uuid) -> Result<Option<Value>, StoreError>;
    async fn save(&self, user_id: Uuid, doc: &Value) -> Result<(), StoreError>;
}

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn init_db(&self) -> anyhow::Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    /// Creates or refreshes a profile and returns its user id.
    pub async fn register_profile(&self, email: &str, username: &str) -> Result<Uuid, StoreError> {
        let row = sqlx::query(
            r#"
            INSERT INTO gpa_tracker.profiles (id, email, username)
            VALUES ($1, $2, $3)
            ON CONFLICT (email) DO UPDATE
            SET username = EXCLUDED.username
            RETURNING id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(email)
        .bind(username)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.get("id"))
    }

    /// Looks up the user id behind an email address.
    pub async fn resolve_user(&self, email: &str) -> Result<Uuid, StoreError> {
        let row = sqlx::query("SELECT id FROM gpa_tracker.profiles WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(row.get("id")),
            None => Err(StoreError::UnknownUser(email.to_string())),
        }
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn load(&self, user_id: Uuid) -> Result<Option<Value>, StoreError> {
        let row = sqlx::query("SELECT data_json FROM gpa_tracker.user_data WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|row| row.get("data_json")))
    }

    async fn save(&self, user_id: Uuid, doc: &Value) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO gpa_tracker.user_data (user_id, data_json, updated_at)
            VALUES ($1, $2, now())
            ON CONFLICT (user_id) DO UPDATE
            SET data_json = EXCLUDED.data_json, updated_at = now()
            "#,
        )
        .bind(user_id)
        .bind(doc)
        .execute(&self.pool)
        .await?;

        debug!(%user_id, "upserted user document");
        Ok(())
    }
}
