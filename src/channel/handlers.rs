use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use time::OffsetDateTime;
use tracing::{error, info};

use crate::{
    channel::{
        dto::{JobResponse, StatusResponse},
        extractors::AdminToken,
        services::{ChannelError, ChannelPublisher},
    },
    error::ApiError,
    state::AppState,
};

pub fn scheduler_routes() -> Router<AppState> {
    Router::new()
        .route("/scheduler/status", get(status))
        .route("/scheduler/publish", post(publish))
        .route("/scheduler/delete", post(delete))
}

fn publisher(state: &AppState) -> Result<&ChannelPublisher, ApiError> {
    state
        .channel
        .as_deref()
        .ok_or_else(|| ApiError::Unavailable("channel publishing is not configured".into()))
}

fn job_failed(e: ChannelError) -> ApiError {
    error!(error = %e, "manual channel job failed");
    ApiError::Internal("channel job failed".into())
}

pub async fn status(
    _admin: AdminToken,
    State(state): State<AppState>,
) -> Result<Json<StatusResponse>, ApiError> {
    let status = match state.channel.as_deref() {
        Some(publisher) => Some(publisher.status().await.map_err(job_failed)?),
        None => None,
    };
    Ok(Json(StatusResponse::new(status, OffsetDateTime::now_utc())))
}

pub async fn publish(
    _admin: AdminToken,
    State(state): State<AppState>,
) -> Result<Json<JobResponse>, ApiError> {
    let message_id = publisher(&state)?
        .publish_daily_post()
        .await
        .map_err(job_failed)?;
    info!(message_id, "manual publish");
    Ok(Json(JobResponse {
        message_id: Some(message_id),
    }))
}

pub async fn delete(
    _admin: AdminToken,
    State(state): State<AppState>,
) -> Result<Json<JobResponse>, ApiError> {
    let message_id = publisher(&state)?
        .delete_current_post()
        .await
        .map_err(job_failed)?;
    info!(?message_id, "manual delete");
    Ok(Json(JobResponse { message_id }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::{
        app::build_app,
        channel::{repo::memory::MemoryPostState, services::fake::FakeChannel, ChannelPublisher},
        state::AppState,
    };

    async fn call(
        state: &AppState,
        method: Method,
        uri: &str,
        token: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            request = request.header("x-admin-token", token);
        }
        let response = build_app(state.clone())
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn admin_state() -> (Arc<FakeChannel>, AppState) {
        let mut state = AppState::fake();
        Arc::make_mut(&mut state.config).admin_token = Some("secret".into());
        let channel = Arc::new(FakeChannel::default());
        state.channel = Some(Arc::new(ChannelPublisher::new(
            channel.clone(),
            Arc::new(MemoryPostState::default()),
            &state.config.telegram,
        )));
        (channel, state)
    }

    #[tokio::test]
    async fn admin_routes_hidden_without_configured_token() {
        let state = AppState::fake();
        let (status, _) = call(&state, Method::GET, "/api/scheduler/status", Some("x")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn wrong_or_missing_token_is_unauthorized() {
        let (_, state) = admin_state();
        let (status, _) = call(&state, Method::POST, "/api/scheduler/publish", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        let (status, body) =
            call(&state, Method::POST, "/api/scheduler/publish", Some("nope")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({"error": "invalid admin token"}));
    }

    #[tokio::test]
    async fn publish_then_delete_round() {
        let (channel, state) = admin_state();

        let (status, body) =
            call(&state, Method::POST, "/api/scheduler/publish", Some("secret")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"messageId": 100}));

        let (_, body) = call(&state, Method::GET, "/api/scheduler/status", Some("secret")).await;
        assert_eq!(body["enabled"], json!(true));
        assert_eq!(body["messageId"], json!(100));
        assert_eq!(body["timeZone"], json!("Europe/Kyiv"));
        assert!(body["nextPublish"].is_string());

        let (status, body) =
            call(&state, Method::POST, "/api/scheduler/delete", Some("secret")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"messageId": 100}));
        assert_eq!(*channel.deleted.lock().unwrap(), vec![100]);
    }

    #[tokio::test]
    async fn jobs_unavailable_without_bot() {
        let mut state = AppState::fake();
        Arc::make_mut(&mut state.config).admin_token = Some("secret".into());

        let (status, _) =
            call(&state, Method::POST, "/api/scheduler/publish", Some("secret")).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

        let (status, body) =
            call(&state, Method::GET, "/api/scheduler/status", Some("secret")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["enabled"], json!(false));
    }
}
