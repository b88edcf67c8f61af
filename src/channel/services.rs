use std::sync::Arc;

use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::config::TelegramConfig;
use crate::channel::repo::PostStateStore;
use crate::telegram::{BotError, ChannelClient, InlineButton, PhotoPost};

const CAPTION: &str = "👋 <b>Пс-с, Всесвіт на лінії!</b>\n\n\
Всесвіт нагадує: ранок без магії — гроші на вітер 💸. Куля заряджена і чекає вашого дотику.\n\n\
Тисніть кнопку, <b>потріть гарненько кулю</b> (як лампу джина) і ловіть свій знак долі 👇";

const BUTTON_TEXT: &str = "🔮 Хочу передбачення!";

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error(transparent)]
    Telegram(#[from] BotError),
    #[error("post state storage failed: {0:#}")]
    Storage(#[from] anyhow::Error),
}

/// Where the channel stands right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelStatus {
    pub channel_id: String,
    pub message_id: Option<i64>,
}

/// Publishes the daily invitation post and removes it again.
#[derive(Clone)]
pub struct ChannelPublisher {
    client: Arc<dyn ChannelClient>,
    posts: Arc<dyn PostStateStore>,
    channel_id: String,
    image_url: String,
    mini_app_url: String,
}

impl ChannelPublisher {
    pub fn new(
        client: Arc<dyn ChannelClient>,
        posts: Arc<dyn PostStateStore>,
        config: &TelegramConfig,
    ) -> Self {
        Self {
            client,
            posts,
            channel_id: config.channel_id.clone(),
            image_url: config.image_url.clone(),
            mini_app_url: config.mini_app_url.clone(),
        }
    }

    fn post(&self) -> PhotoPost {
        PhotoPost {
            photo_url: self.image_url.clone(),
            caption: CAPTION.to_string(),
            button: InlineButton {
                text: BUTTON_TEXT.to_string(),
                url: self.mini_app_url.clone(),
            },
        }
    }

    pub async fn status(&self) -> Result<ChannelStatus, ChannelError> {
        Ok(ChannelStatus {
            channel_id: self.channel_id.clone(),
            message_id: self.posts.current_message(&self.channel_id).await?,
        })
    }

    /// Replaces yesterday's post, if any, with a fresh one.
    #[instrument(skip(self), fields(channel_id = %self.channel_id))]
    pub async fn publish_daily_post(&self) -> Result<i64, ChannelError> {
        if let Some(previous) = self.posts.current_message(&self.channel_id).await? {
            if let Err(e) = self.client.delete_message(&self.channel_id, previous).await {
                warn!(error = %e, message_id = previous, "could not delete previous post");
            }
        }

        let message_id = self.client.send_photo(&self.channel_id, &self.post()).await?;
        self.posts
            .set_current_message(&self.channel_id, Some(message_id))
            .await?;
        info!(message_id, "daily post published");
        Ok(message_id)
    }

    /// Removes the current post. Returns the deleted id, `None` if there was
    /// nothing to delete. The stored id survives a failed delete.
    #[instrument(skip(self), fields(channel_id = %self.channel_id))]
    pub async fn delete_current_post(&self) -> Result<Option<i64>, ChannelError> {
        let Some(message_id) = self.posts.current_message(&self.channel_id).await? else {
            info!("no post to delete");
            return Ok(None);
        };

        self.client
            .delete_message(&self.channel_id, message_id)
            .await?;
        self.posts.set_current_message(&self.channel_id, None).await?;
        info!(message_id, "daily post deleted");
        Ok(Some(message_id))
    }
}
