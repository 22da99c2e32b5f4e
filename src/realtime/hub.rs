use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{broadcast, RwLock};
use uuid::Uuid;

use crate::dto::comment_dto::CommentResponse;

const CHANNEL_CAPACITY: usize = 64;

/// Events pushed to clients watching a job. Delivery is at-most-once and
/// per-process; a reconnecting client reconciles by re-fetching comments.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", content = "data")]
pub enum JobEvent {
    #[serde(rename = "comment-added", rename_all = "camelCase")]
    CommentAdded {
        comment: CommentResponse,
        job_id: Uuid,
    },
    #[serde(rename = "comment-removed", rename_all = "camelCase")]
    CommentRemoved { comment_id: Uuid, job_id: Uuid },
}

impl JobEvent {
    pub fn job_id(&self) -> Uuid {
        match self {
            JobEvent::CommentAdded { job_id, .. } => *job_id,
            JobEvent::CommentRemoved { job_id, .. } => *job_id,
        }
    }
}

/// One broadcast channel per job id. Publishing to a job without
/// subscribers is a no-op, which bounds fan-out to clients currently
/// viewing that job.
#[derive(Clone, Default)]
pub struct JobEventHub {
    channels: Arc<RwLock<HashMap<Uuid, broadcast::Sender<JobEvent>>>>,
}

impl JobEventHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn subscribe(&self, job_id: Uuid) -> broadcast::Receiver<JobEvent> {
        let mut channels = self.channels.write().await;
        channels
            .entry(job_id)
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .subscribe()
    }

    pub async fn publish(&self, event: JobEvent) {
        let job_id = event.job_id();
        let stale = {
            let channels = self.channels.read().await;
            match channels.get(&job_id) {
                // send only fails when every receiver is gone
                Some(sender) => sender.send(event).is_err(),
                None => false,
            }
        };
        if stale {
            self.remove_if_idle(job_id).await;
        }
    }

    /// Drops the channel once its last subscriber has disconnected.
    pub async fn remove_if_idle(&self, job_id: Uuid) {
        let mut channels = self.channels.write().await;
        if let Some(sender) = channels.get(&job_id) {
            if sender.receiver_count() == 0 {
                channels.remove(&job_id);
            }
        }
    }

    pub async fn subscriber_count(&self, job_id: Uuid) -> usize {
        let channels = self.channels.read().await;
        channels
            .get(&job_id)
            .map(|sender| sender.receiver_count())
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn removed_event(job_id: Uuid) -> JobEvent {
        JobEvent::CommentRemoved {
            comment_id: Uuid::new_v4(),
            job_id,
        }
    }

    #[tokio::test]
    async fn events_reach_only_that_jobs_subscribers() {
        let hub = JobEventHub::new();
        let job_a = Uuid::new_v4();
        let job_b = Uuid::new_v4();

        let mut rx_a = hub.subscribe(job_a).await;
        let mut rx_b = hub.subscribe(job_b).await;

        hub.publish(removed_event(job_a)).await;

        let received = rx_a.recv().await.expect("subscriber of job A");
        assert_eq!(received.job_id(), job_a);
        assert!(rx_b.try_recv().is_err());
    }

    #[tokio::test]
    async fn publish_without_subscribers_is_a_noop() {
        let hub = JobEventHub::new();
        hub.publish(removed_event(Uuid::new_v4())).await;
    }

    #[tokio::test]
    async fn idle_channel_is_pruned_after_last_subscriber_leaves() {
        let hub = JobEventHub::new();
        let job_id = Uuid::new_v4();

        let rx = hub.subscribe(job_id).await;
        assert_eq!(hub.subscriber_count(job_id).await, 1);

        drop(rx);
        hub.publish(removed_event(job_id)).await;
        assert_eq!(hub.subscriber_count(job_id).await, 0);

        let channels = hub.channels.read().await;
        assert!(!channels.contains_key(&job_id));
    }

    #[tokio::test]
    async fn fan_out_reaches_every_subscriber() {
        let hub = JobEventHub::new();
        let job_id = Uuid::new_v4();

        let mut first = hub.subscribe(job_id).await;
        let mut second = hub.subscribe(job_id).await;

        hub.publish(removed_event(job_id)).await;

        assert_eq!(first.recv().await.unwrap().job_id(), job_id);
        assert_eq!(second.recv().await.unwrap().job_id(), job_id);
    }

    #[test]
    fn events_serialize_with_kebab_case_names() {
        let job_id = Uuid::new_v4();
        let comment_id = Uuid::new_v4();
        let value = serde_json::to_value(JobEvent::CommentRemoved { comment_id, job_id }).unwrap();
        assert_eq!(value["event"], "comment-removed");
        assert_eq!(value["data"]["commentId"], comment_id.to_string());
        assert_eq!(value["data"]["jobId"], job_id.to_string());
    }
}
