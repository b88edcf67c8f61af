use anyhow::Context;
use axum::async_trait;
use sqlx::PgPool;

/// Durable handle to the channel message currently on display.
#[async_trait]
pub trait PostStateStore: Send + Sync {
    async fn current_message(&self, channel_id: &str) -> anyhow::Result<Option<i64>>;
    async fn set_current_message(
        &self,
        channel_id: &str,
        message_id: Option<i64>,
    ) -> anyhow::Result<()>;
}

#[derive(Clone)]
pub struct PgPostStateStore {
    db: PgPool,
}

impl PgPostStateStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PostStateStore for PgPostStateStore {
    async fn current_message(&self, channel_id: &str) -> anyhow::Result<Option<i64>> {
        let row = sqlx::query_scalar::<_, Option<i64>>(
            r#"SELECT message_id FROM channel_posts WHERE channel_id = $1"#,
        )
        .bind(channel_id)
        .fetch_optional(&self.db)
        .await
        .context("load channel post")?;
        Ok(row.flatten())
    }

    async fn set_current_message(
        &self,
        channel_id: &str,
        message_id: Option<i64>,
    ) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO channel_posts (channel_id, message_id, updated_at)
            VALUES ($1, $2, now())
            ON CONFLICT (channel_id)
            DO UPDATE SET message_id = EXCLUDED.message_id, updated_at = now()
            "#,
        )
        .bind(channel_id)
        .bind(message_id)
        .execute(&self.db)
        .await
        .context("store channel post")?;
        Ok(())
    }
}
