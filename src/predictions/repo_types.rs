use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

/// Telegram user who has opened the Mini App at least once.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub telegram_id: i64,           // unique platform id
    pub first_name: Option<String>, // display name at first contact
    pub created_at: OffsetDateTime,
}

/// One generated prediction; at most one per user per Kyiv day.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Prediction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub text: String,
    pub kyiv_day: Date,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewPrediction<'a> {
    pub user_id: Uuid,
    pub text: &'a str,
    pub kyiv_day: Date,
    pub created_at: OffsetDateTime,
}

/// Rows removed by a full reset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResetCounts {
    pub predictions: u64,
    pub users: u64,
}
