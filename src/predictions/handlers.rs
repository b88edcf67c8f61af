use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use time::OffsetDateTime;
use tracing::{error, info, instrument, warn};

use crate::{
    error::ApiError,
    predictions::{
        dto::{PredictRequest, PredictResponse},
        services::Identity,
    },
    state::AppState,
    telegram::init_data,
};

pub fn predict_routes() -> Router<AppState> {
    Router::new().route("/predict", post(predict))
}

#[instrument(skip(state, payload))]
pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<PredictResponse>, ApiError> {
    let Json(payload) = payload.map_err(|e| {
        warn!(error = %e, "unreadable predict body");
        ApiError::BadRequest("Invalid request body".into())
    })?;

    let init_data = payload
        .init_data
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("initData is required".into()))?;

    let telegram = &state.config.telegram;
    if let (true, Some(token)) = (telegram.verify_init_data, telegram.bot_token.as_deref()) {
        init_data::verify(&init_data, token).map_err(|e| {
            warn!(error = %e, "initData verification failed");
            ApiError::Unauthorized("Invalid initData signature".into())
        })?;
    }

    let user = init_data::parse_user(&init_data).map_err(|e| {
        warn!(error = %e, "invalid initData");
        ApiError::BadRequest("Invalid initData".into())
    })?;

    let identity = Identity {
        telegram_id: user.id,
        first_name: user.first_name,
    };
    let daily = state
        .predictions
        .get_or_create_daily(&identity, OffsetDateTime::now_utc())
        .await
        .map_err(|e| {
            error!(error = %e, telegram_id = identity.telegram_id, "prediction failed");
            ApiError::Internal("Failed to generate prediction".into())
        })?;

    info!(telegram_id = identity.telegram_id, cached = daily.cached, "prediction served");
    Ok(Json(PredictResponse {
        prediction: daily.text,
        cached: daily.cached,
        created_at: daily.created_at,
    }))
}
