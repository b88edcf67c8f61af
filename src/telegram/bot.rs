use std::time::Duration;

use axum::async_trait;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum BotError {
    #[error("telegram api error: {0}")]
    Api(String),
    #[error("telegram transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

#[derive(Debug, Clone, Serialize)]
pub struct InlineButton {
    pub text: String,
    pub url: String,
}

/// Photo message with a single URL button underneath.
#[derive(Debug, Clone)]
pub struct PhotoPost {
    pub photo_url: String,
    pub caption: String,
    pub button: InlineButton,
}

#[async_trait]
pub trait ChannelClient: Send + Sync {
    /// Sends the post and returns the new message id.
    async fn send_photo(&self, chat_id: &str, post: &PhotoPost) -> Result<i64, BotError>;
    async fn delete_message(&self, chat_id: &str, message_id: i64) -> Result<(), BotError>;
}

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SentMessage {
    message_id: i64,
}

/// Bot API client. The token is part of the base URL and never logged.
#[derive(Clone)]
pub struct TelegramBot {
    http: reqwest::Client,
    base: String,
}

impl TelegramBot {
    pub fn new(api_base: &str, token: &str) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            http,
            base: format!("{}/bot{}", api_base.trim_end_matches('/'), token),
        })
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        body: serde_json::Value,
    ) -> Result<T, BotError> {
        debug!(method, "telegram call");
        let response: ApiResponse<T> = self
            .http
            .post(format!("{}/{}", self.base, method))
            .json(&body)
            .send()
            .await?
            .json()
            .await?;
        if !response.ok {
            return Err(BotError::Api(
                response
                    .description
                    .unwrap_or_else(|| format!("{method} failed")),
            ));
        }
        response
            .result
            .ok_or_else(|| BotError::Api(format!("{method} returned no result")))
    }
}

#[async_trait]
impl ChannelClient for TelegramBot {
    async fn send_photo(&self, chat_id: &str, post: &PhotoPost) -> Result<i64, BotError> {
        let sent: SentMessage = self
            .call(
                "sendPhoto",
                serde_json::json!({
                    "chat_id": chat_id,
                    "photo": post.photo_url,
                    "caption": post.caption,
                    "parse_mode": "HTML",
                    "reply_markup": { "inline_keyboard": [[post.button]] },
                }),
            )
            .await?;
        Ok(sent.message_id)
    }

    async fn delete_message(&self, chat_id: &str, message_id: i64) -> Result<(), BotError> {
        let _: bool = self
            .call(
                "deleteMessage",
                serde_json::json!({ "chat_id": chat_id, "message_id": message_id }),
            )
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn post() -> PhotoPost {
        PhotoPost {
            photo_url: "https://img.example/ball.png".into(),
            caption: "<b>hi</b>".into(),
            button: InlineButton {
                text: "open".into(),
                url: "https://t.me/app".into(),
            },
        }
    }

    #[tokio::test]
    async fn send_photo_returns_message_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/botTOKEN/sendPhoto"))
            .and(body_partial_json(json!({
                "chat_id": "-100",
                "parse_mode": "HTML",
                "reply_markup": {"inline_keyboard": [[{"text": "open", "url": "https://t.me/app"}]]}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": true,
                "result": {"message_id": 777, "date": 0}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let bot = TelegramBot::new(&server.uri(), "TOKEN").unwrap();
        assert_eq!(bot.send_photo("-100", &post()).await.unwrap(), 777);
    }

    #[tokio::test]
    async fn api_failure_carries_description() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/botTOKEN/deleteMessage"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "ok": false,
                "error_code": 400,
                "description": "Bad Request: message to delete not found"
            })))
            .mount(&server)
            .await;

        let bot = TelegramBot::new(&server.uri(), "TOKEN").unwrap();
        let err = bot.delete_message("-100", 5).await.unwrap_err();
        assert!(err.to_string().contains("message to delete not found"));
    }

    #[tokio::test]
    async fn delete_message_ok() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/botTOKEN/deleteMessage"))
            .and(body_partial_json(json!({"chat_id": "-100", "message_id": 5})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": true,
                "result": true
            })))
            .expect(1)
            .mount(&server)
            .await;

        let bot = TelegramBot::new(&server.uri(), "TOKEN").unwrap();
        bot.delete_message("-100", 5).await.unwrap();
    }
}
