//! Wipes every prediction and then every user.
use anyhow::Context;
use daily_oracle::{
    config::AppConfig,
    db,
    predictions::{PgPredictionStore, PredictionStore},
    telemetry,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    telemetry::init_tracing();

    let config = AppConfig::from_env().context("DATABASE_URL must be set")?;
    let pool = db::connect(&config).await?;

    tracing::info!("clearing database");
    let counts = PgPredictionStore::new(pool.clone()).reset_all().await?;
    tracing::info!(predictions = counts.predictions, "deleted predictions");
    tracing::info!(users = counts.users, "deleted users");

    pool.close().await;
    Ok(())
}
