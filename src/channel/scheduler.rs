//! Wall-clock loop driving the channel post: publish at 08:00 Kyiv, delete at
//! midnight Kyiv.
use std::sync::Arc;

use time::{macros::time, OffsetDateTime, Time};
use tracing::{error, info};

use crate::channel::services::ChannelPublisher;
use crate::kyiv;

pub const PUBLISH_AT: Time = time!(8:00);
pub const DELETE_AT: Time = Time::MIDNIGHT;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Job {
    Publish,
    Delete,
}

/// The job due soonest after `now`, with its instant.
pub fn next_job(now: OffsetDateTime) -> (Job, OffsetDateTime) {
    let publish = kyiv::next_at(now, PUBLISH_AT);
    let delete = kyiv::next_at(now, DELETE_AT);
    if delete <= publish {
        (Job::Delete, delete)
    } else {
        (Job::Publish, publish)
    }
}

pub async fn run_job(publisher: &ChannelPublisher, job: Job) {
    let result = match job {
        Job::Publish => publisher.publish_daily_post().await.map(|_| ()),
        Job::Delete => publisher.delete_current_post().await.map(|_| ()),
    };
    if let Err(e) = result {
        error!(error = %e, ?job, "scheduled job failed");
    }
}

/// Never returns; spawn it.
pub async fn run(publisher: Arc<ChannelPublisher>) {
    info!(zone = kyiv::ZONE_NAME, "channel scheduler started");
    loop {
        let now = OffsetDateTime::now_utc();
        let (job, at) = next_job(now);
        info!(?job, at = %at, "next channel job");
        tokio::time::sleep((at - now).unsigned_abs()).await;
        run_job(&publisher, job).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn morning_publish_comes_before_midnight_delete() {
        // 07:00 Kyiv summer time.
        let (job, at) = next_job(datetime!(2024-06-01 04:00 UTC));
        assert_eq!(job, Job::Publish);
        assert_eq!(at, datetime!(2024-06-01 05:00 UTC));
    }

    #[test]
    fn after_publish_the_next_job_is_delete() {
        // 12:00 Kyiv winter time.
        let (job, at) = next_job(datetime!(2024-01-10 10:00 UTC));
        assert_eq!(job, Job::Delete);
        assert_eq!(at, datetime!(2024-01-10 22:00 UTC));
    }

    #[test]
    fn exactly_at_publish_time_waits_for_delete() {
        let (job, at) = next_job(datetime!(2024-01-10 06:00 UTC));
        assert_eq!(job, Job::Delete);
        assert_eq!(at, datetime!(2024-01-10 22:00 UTC));
    }

    #[test]
    fn publish_tracks_spring_shift() {
        // Just after midnight on 2024-03-31; clocks jump at 03:00 local.
        let (job, at) = next_job(datetime!(2024-03-30 22:00:01 UTC));
        assert_eq!(job, Job::Publish);
        assert_eq!(at, datetime!(2024-03-31 05:00 UTC));
    }

    #[tokio::test]
    async fn run_job_dispatches_to_publisher() {
        use crate::channel::repo::memory::MemoryPostState;
        use crate::channel::repo::PostStateStore;
        use crate::channel::services::fake::FakeChannel;
        use crate::config::TelegramConfig;

        let channel = Arc::new(FakeChannel::default());
        let posts = Arc::new(MemoryPostState::default());
        let publisher = ChannelPublisher::new(
            channel.clone(),
            posts.clone(),
            &TelegramConfig {
                bot_token: Some("T".into()),
                api_base: "http://unused".into(),
                channel_id: "-1".into(),
                mini_app_url: "https://t.me/app".into(),
                image_url: "https://img".into(),
                verify_init_data: false,
            },
        );

        run_job(&publisher, Job::Publish).await;
        assert_eq!(posts.current_message("-1").await.unwrap(), Some(100));
        run_job(&publisher, Job::Delete).await;
        assert_eq!(posts.current_message("-1").await.unwrap(), None);
        assert_eq!(*channel.deleted.lock().unwrap(), vec![100]);
    }
}
