use std::time::Duration;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct OpenRouterConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelegramConfig {
    pub bot_token: Option<String>,
    pub api_base: String,
    pub channel_id: String,
    pub mini_app_url: String,
    pub image_url: String,
    pub verify_init_data: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub frontend_url: Option<String>,
    pub admin_token: Option<String>,
    pub openrouter: OpenRouterConfig,
    pub telegram: TelegramConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let openrouter = OpenRouterConfig {
            api_key: non_empty("OPENROUTER_API_KEY"),
            base_url: std::env::var("OPENROUTER_BASE_URL")
                .unwrap_or_else(|_| "https://openrouter.ai/api/v1".into()),
            model: std::env::var("OPENROUTER_MODEL")
                .unwrap_or_else(|_| "openai/gpt-4o-mini".into()),
            timeout: Duration::from_secs(
                std::env::var("OPENROUTER_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(15),
            ),
        };
        let telegram = TelegramConfig {
            bot_token: non_empty("TELEGRAM_BOT_TOKEN"),
            api_base: std::env::var("TELEGRAM_API_BASE")
                .unwrap_or_else(|_| "https://api.telegram.org".into()),
            channel_id: std::env::var("CHANNEL_ID").unwrap_or_else(|_| "-1002959175149".into()),
            mini_app_url: std::env::var("MINI_APP_URL")
                .unwrap_or_else(|_| "https://t.me/anc_pobajania_bot?startapp=daily".into()),
            image_url: std::env::var("IMAGE_URL").unwrap_or_else(|_| {
                "https://drive.google.com/uc?export=download&id=1-FeAzDErrhvYbfuFjNFAvFyCxOlGJ55W"
                    .into()
            }),
            verify_init_data: std::env::var("VERIFY_INIT_DATA")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
        };
        Ok(Self {
            database_url,
            frontend_url: non_empty("FRONTEND_URL"),
            admin_token: non_empty("ADMIN_TOKEN"),
            openrouter,
            telegram,
        })
    }

    /// Referer sent to OpenRouter; falls back to the local dev frontend.
    pub fn referer(&self) -> &str {
        self.frontend_url
            .as_deref()
            .unwrap_or("http://localhost:5173")
    }
}

fn non_empty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
