pub mod app;
pub mod channel;
pub mod config;
pub mod db;
pub mod error;
pub mod kyiv;
pub mod predictions;
pub mod scratch;
pub mod state;
pub mod telegram;
pub mod telemetry;
