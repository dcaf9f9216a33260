//! Cross-context layout synchronization.
//!
//! Several contexts (windows in one process, or processes sharing a storage
//! directory) may show the same layout. Every write made through a
//! [`LayoutStore`](crate::LayoutStore) is published on a [`SyncHub`] as a
//! [`StorageEvent`]. Each context listens with a [`LayoutSync`], which skips
//! its own writes and hands the other contexts' layouts to its host.
//!
//! Processes do not share a hub. A store notices their writes by comparing
//! storage with the last value it knew of
//! ([`LayoutStore::detect_external_change`](crate::LayoutStore::detect_external_change))
//! and publishes what it finds on its own hub.
//!
//! # Examples
//!
//! ```
//! use cardgrid_store::sync::{StorageEvent, SyncHub};
//!
//! let hub = SyncHub::default();
//! let writer = hub.register();
//! let reader = hub.register();
//! let mut rx = hub.subscribe();
//!
//! hub.publish(StorageEvent::new("layout", Some("{}".into()), writer));
//! let event = rx.try_recv().expect("event");
//! assert_eq!(event.origin, writer);
//! assert_ne!(event.origin, reader);
//! ```

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use cardgrid_protocol::{LayoutHost, SavedLayout};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::TryRecvError;
use tracing::debug;

/// Events buffered per subscriber before the oldest are dropped.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// Identifies one context attached to a [`SyncHub`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContextId(u64);

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ctx-{}", self.0)
    }
}

/// A change to a storage key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageEvent {
    /// The key that changed.
    pub key: String,
    /// The new value, or `None` when the key was removed.
    pub new_value: Option<String>,
    /// The context that made the change.
    pub origin: ContextId,
}

impl StorageEvent {
    /// Creates an event.
    #[must_use]
    pub fn new(key: impl Into<String>, new_value: Option<String>, origin: ContextId) -> Self {
        Self {
            key: key.into(),
            new_value,
            origin,
        }
    }
}

/// Broadcasts storage events between contexts.
///
/// Cloning the hub yields another handle to the same channel.
#[derive(Debug, Clone)]
pub struct SyncHub {
    sender: broadcast::Sender<StorageEvent>,
    next_id: Arc<AtomicU64>,
}

impl Default for SyncHub {
    fn default() -> Self {
        Self::new(DEFAULT_CHANNEL_CAPACITY)
    }
}

impl SyncHub {
    /// Creates a hub buffering up to `capacity` events per subscriber.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender,
            next_id: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Allocates a fresh context id.
    #[must_use]
    pub fn register(&self) -> ContextId {
        ContextId(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Publishes an event. Events with no subscribers are dropped.
    pub fn publish(&self, event: StorageEvent) {
        // A send error only means nobody is listening.
        let _ = self.sender.send(event);
    }

    /// Subscribes to events published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<StorageEvent> {
        self.sender.subscribe()
    }
}

/// Applies layouts written by other contexts to a host.
///
/// Dropping it unsubscribes.
#[derive(Debug)]
pub struct LayoutSync {
    receiver: broadcast::Receiver<StorageEvent>,
    origin: ContextId,
    key: String,
}

impl LayoutSync {
    /// Listens on `hub` for changes to `key` made by contexts other than
    /// `origin`.
    #[must_use]
    pub fn new(hub: &SyncHub, origin: ContextId, key: impl Into<String>) -> Self {
        Self {
            receiver: hub.subscribe(),
            origin,
            key: key.into(),
        }
    }

    /// Filters and parses one event.
    ///
    /// Returns `None` for own writes, other keys, removals, and values that
    /// are not a layout.
    #[must_use]
    pub fn interpret(&self, event: &StorageEvent) -> Option<SavedLayout> {
        if event.origin == self.origin || event.key != self.key {
            return None;
        }
        let value = event.new_value.as_deref()?;
        match serde_json::from_str(value) {
            Ok(layout) => Some(layout),
            Err(e) => {
                debug!(origin = %event.origin, error = %e, "ignoring unparsable layout event");
                None
            }
        }
    }

    /// Drains pending events and restores each foreign layout on `host`.
    ///
    /// Returns the number of layouts applied. Never blocks.
    pub fn poll<H: LayoutHost + ?Sized>(&mut self, host: &mut H) -> usize {
        let mut applied = 0;
        loop {
            match self.receiver.try_recv() {
                Ok(event) => {
                    if let Some(layout) = self.interpret(&event) {
                        debug!(origin = %event.origin, "applying layout from another context");
                        host.on_layout_restore(layout);
                        applied += 1;
                    }
                }
                Err(TryRecvError::Lagged(skipped)) => {
                    debug!(skipped, "layout sync lagged behind");
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }
        applied
    }

    /// Waits for the next foreign layout.
    ///
    /// Returns `None` once every hub handle has been dropped.
    pub async fn next_layout(&mut self) -> Option<SavedLayout> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => {
                    if let Some(layout) = self.interpret(&event) {
                        return Some(layout);
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    debug!(skipped, "layout sync lagged behind");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardgrid_protocol::{Card, RecordingHost};
    use chrono::Utc;

    const KEY: &str = "layout";

    fn layout_json() -> String {
        let layout = SavedLayout::from_cards(&[Card::new("a", 0)], 3, None, Utc::now());
        serde_json::to_string(&layout).expect("serialize")
    }

    #[test]
    fn registered_ids_are_unique() {
        let hub = SyncHub::default();
        let a = hub.register();
        let b = hub.clone().register();
        assert_ne!(a, b);
    }

    #[test]
    fn foreign_event_is_applied() {
        let hub = SyncHub::default();
        let me = hub.register();
        let other = hub.register();
        let mut sync = LayoutSync::new(&hub, me, KEY);
        let mut host = RecordingHost::default();

        hub.publish(StorageEvent::new(KEY, Some(layout_json()), other));

        assert_eq!(sync.poll(&mut host), 1);
        assert_eq!(host.restored.len(), 1);
        assert_eq!(host.restored[0].cards[0].id.as_str(), "a");
    }

    #[test]
    fn own_events_and_other_keys_are_ignored() {
        let hub = SyncHub::default();
        let me = hub.register();
        let other = hub.register();
        let mut sync = LayoutSync::new(&hub, me, KEY);
        let mut host = RecordingHost::default();

        hub.publish(StorageEvent::new(KEY, Some(layout_json()), me));
        hub.publish(StorageEvent::new("unrelated", Some(layout_json()), other));

        assert_eq!(sync.poll(&mut host), 0);
        assert!(host.restored.is_empty());
    }

    #[test]
    fn removals_and_garbage_are_swallowed() {
        let hub = SyncHub::default();
        let me = hub.register();
        let other = hub.register();
        let mut sync = LayoutSync::new(&hub, me, KEY);
        let mut host = RecordingHost::default();

        hub.publish(StorageEvent::new(KEY, None, other));
        hub.publish(StorageEvent::new(KEY, Some("{not json".into()), other));

        assert_eq!(sync.poll(&mut host), 0);
        assert!(host.restored.is_empty());
    }

    #[test]
    fn poll_without_events_returns_zero() {
        let hub = SyncHub::default();
        let mut sync = LayoutSync::new(&hub, hub.register(), KEY);
        assert_eq!(sync.poll(&mut RecordingHost::default()), 0);
    }

    #[tokio::test]
    async fn next_layout_skips_own_writes() {
        let hub = SyncHub::default();
        let me = hub.register();
        let other = hub.register();
        let mut sync = LayoutSync::new(&hub, me, KEY);

        hub.publish(StorageEvent::new(KEY, Some(layout_json()), me));
        hub.publish(StorageEvent::new(KEY, Some(layout_json()), other));

        let layout = sync.next_layout().await.expect("foreign layout");
        assert_eq!(layout.grid_columns, 3);
    }
}
