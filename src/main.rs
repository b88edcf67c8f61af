use daily_oracle::{app, channel, config::AppConfig, db, state::AppState, telemetry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    telemetry::init_tracing();

    let config = AppConfig::from_env()?;
    let pool = db::connect(&config).await?;

    // Run migrations if present
    db::migrate(&pool).await;

    let app_state = AppState::init(config, pool)?;

    if let Some(publisher) = app_state.channel.clone() {
        tokio::spawn(channel::scheduler::run(publisher));
    }

    app::serve(app::build_app(app_state)).await
}
