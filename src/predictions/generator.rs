//! Prediction text generation through OpenRouter chat completions.
//!
//! [`PredictionGenerator::generate`] never fails: every error path ends in
//! [`random_fallback`], so callers cannot tell the two apart.

use axum::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::config::OpenRouterConfig;
use crate::predictions::fallback::random_fallback;

const SYSTEM_PROMPT: &str = r#"You are a quirky, positive "Pharmacist-Mage". Generate a short daily prediction in Ukrainian.

STRICT RULES:
1. Max 120 characters.
2. NEVER use "Сьогодні", "сьогоднішній", "today" - FORBIDDEN WORDS!
3. NEVER use "ти", "твій", "тобі" - use impersonal style.
4. No medicine, pills, vitamins mentions.

Good examples:
- "Зорі підказують: час для сміливих планів!"
- "Рівень удачі максимальний — всі двері відчинені."
- "Магія в повітрі! Лови момент."
- "Всесвіт шепоче: все складеться чудово."
- "Енергія зашкалює! Перешкоди зникають."
- "Час діяти — успіх чекає за рогом.""#;

const MAX_TOKENS: u32 = 200;
const TEMPERATURE: f32 = 0.8;

#[async_trait]
pub trait PredictionGenerator: Send + Sync {
    async fn generate(&self, first_name: Option<&str>) -> String;
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("no OpenRouter API key configured")]
    MissingApiKey,
    #[error("OpenRouter returned status {0}")]
    Status(StatusCode),
    #[error("malformed completion: {0}")]
    Malformed(String),
    #[error("OpenRouter request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

#[derive(Debug, Deserialize)]
struct Completion {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

pub fn user_prompt(first_name: Option<&str>) -> String {
    match first_name {
        Some(name) => {
            format!("Generate a short daily prediction for {name}. Max 150 characters.")
        }
        None => "Generate a short daily prediction. Max 150 characters.".to_string(),
    }
}

#[derive(Clone)]
pub struct OpenRouterGenerator {
    http: reqwest::Client,
    config: OpenRouterConfig,
    referer: String,
}

impl OpenRouterGenerator {
    pub fn new(config: OpenRouterConfig, referer: impl Into<String>) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http,
            config,
            referer: referer.into(),
        })
    }

    async fn request(&self, first_name: Option<&str>) -> Result<String, GenerationError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(GenerationError::MissingApiKey)?;

        let body = serde_json::json!({
            "model": self.config.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": user_prompt(first_name) },
            ],
            "max_tokens": MAX_TOKENS,
            "temperature": TEMPERATURE,
        });

        let response = self
            .http
            .post(format!(
                "{}/chat/completions",
                self.config.base_url.trim_end_matches('/')
            ))
            .bearer_auth(api_key)
            .header("HTTP-Referer", &self.referer)
            .header("X-Title", "Daily Prediction App")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GenerationError::Status(status));
        }

        let completion: Completion = response
            .json()
            .await
            .map_err(|e| GenerationError::Malformed(e.to_string()))?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or_else(|| GenerationError::Malformed("no content in first choice".into()))
    }
}

#[async_trait]
impl PredictionGenerator for OpenRouterGenerator {
    #[instrument(skip(self))]
    async fn generate(&self, first_name: Option<&str>) -> String {
        match self.request(first_name).await {
            Ok(text) => {
                debug!(chars = text.chars().count(), "prediction generated");
                text
            }
            Err(GenerationError::MissingApiKey) => {
                debug!("no api key, serving fallback");
                random_fallback().to_string()
            }
            Err(e) => {
                warn!(error = %e, "generation failed, serving fallback");
                random_fallback().to_string()
            }
        }
    }
}
