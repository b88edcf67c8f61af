use serde::Serialize;

use crate::channel::services::ChannelStatus;
use crate::kyiv;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub enabled: bool,
    pub channel_id: Option<String>,
    pub message_id: Option<i64>,
    pub time_zone: &'static str,
    #[serde(with = "time::serde::rfc3339")]
    pub next_publish: time::OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub next_delete: time::OffsetDateTime,
}

impl StatusResponse {
    pub fn new(status: Option<ChannelStatus>, now: time::OffsetDateTime) -> Self {
        use crate::channel::scheduler::{DELETE_AT, PUBLISH_AT};
        let enabled = status.is_some();
        let (channel_id, message_id) = match status {
            Some(s) => (Some(s.channel_id), s.message_id),
            None => (None, None),
        };
        Self {
            enabled,
            channel_id,
            message_id,
            time_zone: kyiv::ZONE_NAME,
            next_publish: kyiv::next_at(now, PUBLISH_AT),
            next_delete: kyiv::next_at(now, DELETE_AT),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobResponse {
    pub message_id: Option<i64>,
}
