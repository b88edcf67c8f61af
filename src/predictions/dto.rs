use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Request body for `POST /api/predict`.
#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    #[serde(rename = "initData", default)]
    pub init_data: Option<String>,
}

/// Prediction returned to the Mini App.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictResponse {
    pub prediction: String,
    pub cached: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}
