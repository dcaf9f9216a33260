//! Debounced autosave.
//!
//! The [`Autosaver`] watches layout snapshots. When one differs from the last
//! snapshot it saw, it cancels any pending save and schedules a new one after
//! the debounce period, so a burst of edits produces a single write.
//!
//! Saves run on a spawned tokio task; [`Autosaver::observe`] must be called
//! from within a runtime.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::debug;

use crate::store::{LayoutSnapshot, LayoutStore};

/// Default quiet period before a save.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(1000);

/// Tracks which scheduled save, if any, is still outstanding.
///
/// Every scheduled save takes a ticket. Only the save holding the latest
/// ticket may mark the autosaver idle.
#[derive(Debug, Default)]
struct SaveTickets {
    issued: AtomicU64,
    /// Ticket of the outstanding save, `0` when idle.
    pending: AtomicU64,
}

impl SaveTickets {
    fn begin(&self) -> u64 {
        let ticket = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        self.pending.store(ticket, Ordering::SeqCst);
        ticket
    }

    fn finish(&self, ticket: u64) {
        let _ = self
            .pending
            .compare_exchange(ticket, 0, Ordering::SeqCst, Ordering::SeqCst);
    }

    fn clear(&self) {
        self.pending.store(0, Ordering::SeqCst);
    }

    fn is_pending(&self) -> bool {
        self.pending.load(Ordering::SeqCst) != 0
    }
}

/// Saves layout snapshots once they stop changing.
///
/// Dropping the autosaver aborts a pending save.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use std::time::Duration;
/// use cardgrid_protocol::Card;
/// use cardgrid_store::{Autosaver, LayoutSnapshot, LayoutStore, MemoryStorage};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let store = Arc::new(LayoutStore::new(Arc::new(MemoryStorage::new())));
/// let mut autosaver = Autosaver::new(store.clone(), Duration::from_millis(10));
///
/// autosaver.observe(LayoutSnapshot::new(vec![Card::new("a", 0)], 2, None));
/// assert!(autosaver.is_saving());
///
/// tokio::time::sleep(Duration::from_millis(50)).await;
/// assert!(store.has_stored_layout());
/// # }
/// ```
#[derive(Debug)]
pub struct Autosaver {
    store: Arc<LayoutStore>,
    debounce: Duration,
    last: Option<LayoutSnapshot>,
    pending: Option<JoinHandle<()>>,
    tickets: Arc<SaveTickets>,
}

impl Autosaver {
    /// Creates an idle autosaver writing to `store`.
    #[must_use]
    pub fn new(store: Arc<LayoutStore>, debounce: Duration) -> Self {
        Self {
            store,
            debounce,
            last: None,
            pending: None,
            tickets: Arc::default(),
        }
    }

    /// Returns the debounce period.
    #[must_use]
    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    /// Records `snapshot` as already persisted without scheduling a save.
    ///
    /// Used after restoring a layout at startup.
    pub fn prime(&mut self, snapshot: LayoutSnapshot) {
        self.last = Some(snapshot);
    }

    /// Schedules a save if `snapshot` would persist differently from the last
    /// one observed.
    ///
    /// Changes to card recency alone are not persisted and do not schedule a
    /// save.
    ///
    /// Returns `true` if a save was scheduled.
    pub fn observe(&mut self, snapshot: LayoutSnapshot) -> bool {
        if self.last.as_ref().is_some_and(|last| last.persists_as(&snapshot)) {
            return false;
        }

        self.cancel();
        self.last = Some(snapshot.clone());
        let ticket = self.tickets.begin();

        let store = Arc::clone(&self.store);
        let tickets = Arc::clone(&self.tickets);
        let debounce = self.debounce;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            store.save_layout(&snapshot);
            tickets.finish(ticket);
        }));

        debug!(debounce_ms = debounce.as_millis(), "autosave scheduled");
        true
    }

    /// Saves the last observed snapshot immediately, cancelling the pending
    /// save.
    ///
    /// Returns `false` if nothing was pending or the save failed.
    pub fn flush(&mut self) -> bool {
        let Some(pending) = self.pending.take() else {
            return false;
        };
        let was_pending = !pending.is_finished();
        pending.abort();
        self.tickets.clear();

        match (&self.last, was_pending) {
            (Some(snapshot), true) => self.store.save_layout(snapshot),
            _ => false,
        }
    }

    /// Cancels the pending save, if any.
    pub fn cancel(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
        self.tickets.clear();
    }

    /// Returns `true` while a save is scheduled or in progress.
    #[must_use]
    pub fn is_saving(&self) -> bool {
        self.tickets.is_pending()
    }
}

impl Drop for Autosaver {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use cardgrid_protocol::{Card, CardMode};
    use chrono::{DateTime, TimeZone, Utc};

    fn at(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(ms).single().expect("valid timestamp")
    }

    fn snapshot_at(mode: CardMode, touched: DateTime<Utc>) -> LayoutSnapshot {
        LayoutSnapshot::new(
            vec![Card::new("a", 0).with_mode(mode).touched_at(touched)],
            3,
            None,
        )
    }

    fn snapshot(mode: CardMode) -> LayoutSnapshot {
        snapshot_at(mode, at(1_700_000_000_000))
    }

    fn store() -> Arc<LayoutStore> {
        Arc::new(LayoutStore::new(Arc::new(MemoryStorage::new())))
    }

    #[tokio::test(start_paused = true)]
    async fn saves_after_debounce() {
        let store = store();
        let mut autosaver = Autosaver::new(store.clone(), DEFAULT_DEBOUNCE);

        assert!(autosaver.observe(snapshot(CardMode::Expanded)));
        assert!(autosaver.is_saving());

        tokio::time::sleep(Duration::from_millis(999)).await;
        assert!(!store.has_stored_layout());

        tokio::time::sleep(Duration::from_millis(2)).await;
        tokio::task::yield_now().await;
        assert!(store.has_stored_layout());
        assert!(!autosaver.is_saving());
    }

    #[tokio::test(start_paused = true)]
    async fn bursts_coalesce_into_last_snapshot() {
        let store = store();
        let mut autosaver = Autosaver::new(store.clone(), DEFAULT_DEBOUNCE);

        autosaver.observe(snapshot(CardMode::Expanded));
        tokio::time::sleep(Duration::from_millis(500)).await;
        autosaver.observe(snapshot(CardMode::Compact));

        tokio::time::sleep(Duration::from_millis(600)).await;
        assert!(!store.has_stored_layout());

        tokio::time::sleep(Duration::from_millis(500)).await;
        tokio::task::yield_now().await;
        let layout = store.load_layout().expect("saved");
        assert_eq!(layout.cards[0].mode, CardMode::Compact);
    }

    #[tokio::test(start_paused = true)]
    async fn unchanged_snapshot_is_not_rescheduled() {
        let mut autosaver = Autosaver::new(store(), DEFAULT_DEBOUNCE);
        autosaver.prime(snapshot(CardMode::Expanded));

        assert!(!autosaver.observe(snapshot(CardMode::Expanded)));
        assert!(!autosaver.is_saving());
    }

    #[tokio::test(start_paused = true)]
    async fn recency_only_change_is_not_rescheduled() {
        let mut autosaver = Autosaver::new(store(), DEFAULT_DEBOUNCE);
        autosaver.prime(snapshot_at(CardMode::Expanded, at(1_000)));

        assert!(!autosaver.observe(snapshot_at(CardMode::Expanded, at(9_000))));
        assert!(!autosaver.is_saving());
        assert!(autosaver.observe(snapshot_at(CardMode::Compact, at(9_000))));
    }

    #[test]
    fn superseded_save_cannot_clear_the_newer_one() {
        let tickets = SaveTickets::default();
        let first = tickets.begin();
        let second = tickets.begin();

        tickets.finish(first);
        assert!(tickets.is_pending());

        tickets.finish(second);
        assert!(!tickets.is_pending());
    }

    #[test]
    fn clearing_drops_the_outstanding_ticket() {
        let tickets = SaveTickets::default();
        let ticket = tickets.begin();
        tickets.clear();
        assert!(!tickets.is_pending());

        tickets.finish(ticket);
        assert!(!tickets.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn drop_aborts_pending_save() {
        let store = store();
        let mut autosaver = Autosaver::new(store.clone(), DEFAULT_DEBOUNCE);
        autosaver.observe(snapshot(CardMode::Expanded));
        drop(autosaver);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(!store.has_stored_layout());
    }

    #[tokio::test(start_paused = true)]
    async fn flush_saves_immediately() {
        let store = store();
        let mut autosaver = Autosaver::new(store.clone(), DEFAULT_DEBOUNCE);
        autosaver.observe(snapshot(CardMode::Compact));

        assert!(autosaver.flush());
        assert!(store.has_stored_layout());
        assert!(!autosaver.is_saving());
        assert!(!autosaver.flush());
    }
}
