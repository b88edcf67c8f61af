use anyhow::Context;
use axum::async_trait;
use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::predictions::repo_types::{NewPrediction, Prediction, ResetCounts, User};

#[async_trait]
pub trait PredictionStore: Send + Sync {
    /// Returns the user for `telegram_id`, creating it on first contact.
    async fn upsert_user(&self, telegram_id: i64, first_name: Option<&str>)
        -> anyhow::Result<User>;

    /// Most recent prediction of `user_id` created at or after `since`.
    async fn latest_since(
        &self,
        user_id: Uuid,
        since: OffsetDateTime,
    ) -> anyhow::Result<Option<Prediction>>;

    /// Inserts a prediction; `None` when one already exists for that day.
    async fn insert_prediction(&self, new: NewPrediction<'_>)
        -> anyhow::Result<Option<Prediction>>;

    /// Deletes every prediction, then every user.
    async fn reset_all(&self) -> anyhow::Result<ResetCounts>;
}

#[derive(Clone)]
pub struct PgPredictionStore {
    db: PgPool,
}

impl PgPredictionStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PredictionStore for PgPredictionStore {
    async fn upsert_user(
        &self,
        telegram_id: i64,
        first_name: Option<&str>,
    ) -> anyhow::Result<User> {
        // The no-op update makes RETURNING yield the existing row on conflict.
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, telegram_id, first_name)
            VALUES ($1, $2, $3)
            ON CONFLICT (telegram_id) DO UPDATE SET telegram_id = EXCLUDED.telegram_id
            RETURNING id, telegram_id, first_name, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(telegram_id)
        .bind(first_name)
        .fetch_one(&self.db)
        .await
        .context("upsert user")?;
        Ok(user)
    }

    async fn latest_since(
        &self,
        user_id: Uuid,
        since: OffsetDateTime,
    ) -> anyhow::Result<Option<Prediction>> {
        let row = sqlx::query_as::<_, Prediction>(
            r#"
            SELECT id, user_id, text, kyiv_day, created_at
              FROM predictions
             WHERE user_id = $1 AND created_at >= $2
             ORDER BY created_at DESC
             LIMIT 1
            "#,
        )
        .bind(user_id)
        .bind(since)
        .fetch_optional(&self.db)
        .await
        .context("latest prediction")?;
        Ok(row)
    }

    async fn insert_prediction(
        &self,
        new: NewPrediction<'_>,
    ) -> anyhow::Result<Option<Prediction>> {
        let row = sqlx::query_as::<_, Prediction>(
            r#"
            INSERT INTO predictions (id, user_id, text, kyiv_day, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (user_id, kyiv_day) DO NOTHING
            RETURNING id, user_id, text, kyiv_day, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new.user_id)
        .bind(new.text)
        .bind(new.kyiv_day)
        .bind(new.created_at)
        .fetch_optional(&self.db)
        .await
        .context("insert prediction")?;
        Ok(row)
    }

    async fn reset_all(&self) -> anyhow::Result<ResetCounts> {
        let mut tx = self.db.begin().await.context("begin tx")?;
        let predictions = sqlx::query("DELETE FROM predictions")
            .execute(&mut *tx)
            .await
            .context("delete predictions")?
            .rows_affected();
        let users = sqlx::query("DELETE FROM users")
            .execute(&mut *tx)
            .await
            .context("delete users")?
            .rows_affected();
        tx.commit().await.context("commit tx")?;
        Ok(ResetCounts { predictions, users })
    }
}
