pub mod bot;
pub mod init_data;

pub use bot::{BotError, ChannelClient, InlineButton, PhotoPost, TelegramBot};
pub use init_data::{InitDataError, WebAppUser};
