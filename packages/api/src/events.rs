//! Per-user status event fan-out.
//!
//! Backs the `GET /grading/{user_uuid}` event stream. One broadcast channel
//! per connected user, created lazily on first subscribe and pruned once the
//! last receiver is gone. Purely in-process: nothing is buffered for future
//! subscribers and nothing survives a restart — reconnecting clients recover
//! current state by re-reading the submission store.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{RwLock, broadcast};

/// Capacity of each per-user channel. Status transitions are rare (one per
/// grading round trip), so a small buffer is plenty before a slow reader lags.
const CHANNEL_CAPACITY: usize = 16;

type Sender = broadcast::Sender<String>;

/// Publish/subscribe hub keyed by user UUID.
///
/// Delivery is at-most-once and fire-and-forget: `publish` never blocks on a
/// receiver, and a dropped stream deregisters itself simply by dropping its
/// `broadcast::Receiver`.
#[derive(Clone, Default)]
pub struct StatusEventHub {
    channels: Arc<RwLock<HashMap<String, Sender>>>,
}

impl StatusEventHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for `user_uuid`, creating the channel if needed.
    pub async fn subscribe(&self, user_uuid: &str) -> broadcast::Receiver<String> {
        let mut channels = self.channels.write().await;
        channels
            .entry(user_uuid.to_string())
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .subscribe()
    }

    /// Send `payload` to every listener currently registered for `user_uuid`.
    ///
    /// A user with no open stream is a no-op; the event is not buffered.
    /// Channels whose last receiver has disconnected are pruned here.
    pub async fn publish(&self, user_uuid: &str, payload: impl Into<String>) {
        let mut channels = self.channels.write().await;
        if let Some(sender) = channels.get(user_uuid) {
            let _ = sender.send(payload.into());
            if sender.receiver_count() == 0 {
                tracing::debug!(user_uuid, "Removing status channel with no subscribers");
                channels.remove(user_uuid);
            }
        }
    }

    /// Number of listeners currently registered for `user_uuid`.
    pub async fn subscriber_count(&self, user_uuid: &str) -> usize {
        let channels = self.channels.read().await;
        channels
            .get(user_uuid)
            .map(|s| s.receiver_count())
            .unwrap_or(0)
    }

    /// Number of users with a live channel.
    pub async fn channel_count(&self) -> usize {
        self.channels.read().await.len()
    }
}
