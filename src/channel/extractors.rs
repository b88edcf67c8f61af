use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::{error::ApiError, state::AppState};

pub const ADMIN_HEADER: &str = "x-admin-token";

/// Passes only requests carrying the configured admin token. Without a
/// configured token the admin surface does not exist.
pub struct AdminToken;

#[async_trait]
impl FromRequestParts<AppState> for AdminToken {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let expected = state
            .config
            .admin_token
            .as_deref()
            .ok_or(ApiError::NotFound)?;

        let presented = parts
            .headers
            .get(ADMIN_HEADER)
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("missing admin token".into()))?;

        if presented != expected {
            return Err(ApiError::Unauthorized("invalid admin token".into()));
        }
        Ok(AdminToken)
    }
}
