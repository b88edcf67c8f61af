use crate::state::AppState;
use axum::Router;

mod dto;
pub mod fallback;
pub mod generator;
pub mod handlers;
pub mod repo;
pub mod repo_types;
pub mod services;

pub use generator::{OpenRouterGenerator, PredictionGenerator};
pub use repo::{PgPredictionStore, PredictionStore};
pub use services::{DailyPrediction, Identity, PredictionError, PredictionService};

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::predict_routes())
}
