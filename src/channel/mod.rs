//! Daily promotional post in the Telegram channel.
use crate::state::AppState;
use axum::Router;

mod dto;
pub(crate) mod extractors;
pub mod handlers;
pub mod repo;
pub mod scheduler;
pub mod services;

pub use repo::{PgPostStateStore, PostStateStore};
pub use services::{ChannelError, ChannelPublisher};

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::scheduler_routes())
}
