//! Saving, loading, exporting, and importing card layouts.
//!
//! # Overview
//!
//! A [`LayoutStore`] keeps one [`SavedLayout`] record in a [`Storage`]
//! backend under [`STORAGE_KEY`]. The day-to-day operations never fail
//! loudly:
//!
//! - [`save_layout`](LayoutStore::save_layout) and
//!   [`reset_layout`](LayoutStore::reset_layout) log failures and return `false`
//! - [`load_layout`](LayoutStore::load_layout) returns `None` for a missing,
//!   unreadable, or outdated record
//!
//! File import and export are user-initiated and return errors instead, so
//! the host can tell the user what went wrong.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use cardgrid_protocol::Card;
//! use cardgrid_store::{LayoutSnapshot, LayoutStore, MemoryStorage};
//!
//! let store = LayoutStore::new(Arc::new(MemoryStorage::new()));
//! let snapshot = LayoutSnapshot::new(vec![Card::new("a", 0)], 3, None);
//!
//! assert!(store.save_layout(&snapshot));
//! let layout = store.load_layout().expect("stored layout");
//! assert_eq!(layout.grid_columns, 3);
//!
//! assert!(store.reset_layout());
//! assert!(store.load_layout().is_none());
//! ```

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use cardgrid_protocol::{
    AutoCollapseSettings, Card, LAYOUT_VERSION, LayoutHost, LegacyCard, PersistedCard, STORAGE_KEY,
    SavedLayout, is_migratable_version, migrate_card,
};
use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::TryRecvError;
use tracing::{debug, info, instrument, warn};

use crate::error::{Result, StorageError, StoreError};
use crate::storage::Storage;
use crate::sync::{ContextId, LayoutSync, StorageEvent, SyncHub};

/// Column count assumed for imported files that do not record one.
pub const IMPORT_FALLBACK_COLUMNS: u32 = 3;

/// The live state that gets persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutSnapshot {
    /// The card collection.
    pub cards: Vec<Card>,
    /// The user's grid column count.
    pub grid_columns: u32,
    /// Auto-collapse settings to record alongside the cards.
    pub auto_collapse_settings: Option<AutoCollapseSettings>,
}

impl LayoutSnapshot {
    /// Creates a snapshot.
    #[must_use]
    pub fn new(
        cards: Vec<Card>,
        grid_columns: u32,
        auto_collapse_settings: Option<AutoCollapseSettings>,
    ) -> Self {
        Self {
            cards,
            grid_columns,
            auto_collapse_settings,
        }
    }

    /// Returns `true` if both snapshots would be written as the same record.
    ///
    /// Recency is not persisted, so cards differing only in
    /// `last_interaction` compare equal.
    #[must_use]
    pub fn persists_as(&self, other: &Self) -> bool {
        self.grid_columns == other.grid_columns
            && self.auto_collapse_settings == other.auto_collapse_settings
            && self.cards.len() == other.cards.len()
            && self
                .cards
                .iter()
                .zip(&other.cards)
                .all(|(a, b)| PersistedCard::from(a) == PersistedCard::from(b))
    }

    /// Converts the snapshot to a current-version record stamped `at`.
    #[must_use]
    pub fn to_saved(&self, at: DateTime<Utc>) -> SavedLayout {
        SavedLayout::from_cards(
            &self.cards,
            self.grid_columns,
            self.auto_collapse_settings,
            at,
        )
    }
}

/// Renders a layout as the pretty-printed JSON used for export files.
///
/// # Errors
///
/// Returns [`StoreError::Serialize`] if serialization fails.
pub fn export_json(layout: &SavedLayout) -> Result<String> {
    serde_json::to_string_pretty(layout).map_err(StoreError::Serialize)
}

/// Returns the export file name for a layout saved at `timestamp` (ms).
#[must_use]
pub fn export_file_name(timestamp: i64) -> String {
    format!("card-layout-{timestamp}.json")
}

/// Persists the card layout under a single storage key.
pub struct LayoutStore {
    storage: Arc<dyn Storage>,
    key: String,
    sync: Option<SyncLink>,
}

/// A store's attachment to a [`SyncHub`].
struct SyncLink {
    hub: SyncHub,
    origin: ContextId,
    /// Origin stamped on writes detected in storage but not seen on the hub.
    outside: ContextId,
    watch: Mutex<Watch>,
}

/// What this store last knew the stored value to be.
struct Watch {
    seen: Option<String>,
    events: broadcast::Receiver<StorageEvent>,
}

impl Watch {
    /// Catches up with values other contexts announced on the hub.
    fn catch_up(&mut self, key: &str) {
        loop {
            match self.events.try_recv() {
                Ok(event) if event.key == key => self.seen = event.new_value,
                Ok(_) | Err(TryRecvError::Lagged(_)) => {}
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }
    }
}

impl SyncLink {
    fn watch(&self) -> MutexGuard<'_, Watch> {
        self.watch.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for LayoutStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutStore")
            .field("key", &self.key)
            .field("context", &self.context())
            .finish_non_exhaustive()
    }
}

impl LayoutStore {
    /// Creates a store over `storage` using [`STORAGE_KEY`].
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage,
            key: STORAGE_KEY.to_string(),
            sync: None,
        }
    }

    /// Publishes every write on `hub` as a new context.
    ///
    /// The value currently in storage becomes the baseline for
    /// [`detect_external_change`](Self::detect_external_change).
    #[must_use]
    pub fn with_sync(mut self, hub: &SyncHub) -> Self {
        let seen = self.storage.get(&self.key).ok().flatten();
        self.sync = Some(SyncLink {
            hub: hub.clone(),
            origin: hub.register(),
            outside: hub.register(),
            watch: Mutex::new(Watch {
                seen,
                events: hub.subscribe(),
            }),
        });
        self
    }

    /// Returns the storage key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns this store's context on the sync hub, if attached.
    #[must_use]
    pub fn context(&self) -> Option<ContextId> {
        self.sync.as_ref().map(|link| link.origin)
    }

    /// Listens for layouts written by other contexts.
    ///
    /// Returns `None` when the store is not attached to a hub.
    #[must_use]
    pub fn subscribe(&self) -> Option<LayoutSync> {
        self.sync
            .as_ref()
            .map(|link| LayoutSync::new(&link.hub, link.origin, self.key.clone()))
    }

    /// Checks storage for a value written by another process.
    ///
    /// Writers sharing this store's hub announce their values there, so only
    /// a stored value that no context on the hub announced counts as
    /// external. It is published on the hub, where every [`LayoutSync`]
    /// (including this store's own) picks it up as a foreign write.
    ///
    /// Returns `true` if a change was published. Always `false` when the
    /// store is not attached to a hub.
    pub fn detect_external_change(&self) -> bool {
        let Some(link) = &self.sync else {
            return false;
        };
        let mut watch = link.watch();
        watch.catch_up(&self.key);

        let current = match self.storage.get(&self.key) {
            Ok(current) => current,
            Err(e) => {
                debug!(error = %e, "could not check stored layout");
                return false;
            }
        };
        if current == watch.seen {
            return false;
        }

        debug!(removed = current.is_none(), "stored layout changed outside this process");
        watch.seen.clone_from(&current);
        link.hub
            .publish(StorageEvent::new(self.key.clone(), current, link.outside));
        true
    }

    /// Writes or removes the record and announces the new value.
    fn commit(&self, value: Option<String>) -> std::result::Result<(), StorageError> {
        let write = |value: Option<&str>| match value {
            Some(value) => self.storage.set(&self.key, value),
            None => self.storage.remove(&self.key),
        };

        let Some(link) = &self.sync else {
            return write(value.as_deref());
        };
        let mut watch = link.watch();
        write(value.as_deref())?;
        watch.seen.clone_from(&value);
        link.hub
            .publish(StorageEvent::new(self.key.clone(), value, link.origin));
        Ok(())
    }

    fn write_record(&self, layout: &SavedLayout) -> Result<()> {
        let json = serde_json::to_string(layout).map_err(StoreError::Serialize)?;
        self.commit(Some(json))?;
        Ok(())
    }

    /// Saves the snapshot, stamped with the current time.
    ///
    /// Returns `false` (after logging) if the record could not be written.
    #[instrument(skip_all, fields(cards = snapshot.cards.len()))]
    pub fn save_layout(&self, snapshot: &LayoutSnapshot) -> bool {
        let layout = snapshot.to_saved(Utc::now());
        match self.write_record(&layout) {
            Ok(()) => {
                debug!("layout saved");
                true
            }
            Err(e) => {
                warn!(error = %e, "failed to save layout");
                false
            }
        }
    }

    /// Loads the stored layout.
    ///
    /// Returns `None` when nothing is stored, when the record cannot be read
    /// or parsed, or when it was written by a different schema version.
    #[instrument(skip(self))]
    pub fn load_layout(&self) -> Option<SavedLayout> {
        let raw = match self.storage.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("no stored layout");
                return None;
            }
            Err(e) => {
                warn!(error = %e, "failed to read stored layout");
                return None;
            }
        };

        let layout: SavedLayout = match serde_json::from_str(&raw) {
            Ok(layout) => layout,
            Err(e) => {
                warn!(error = %e, "stored layout is not valid");
                return None;
            }
        };

        if !layout.is_current_version() {
            info!(
                found = %layout.version,
                expected = LAYOUT_VERSION,
                "ignoring layout from another version"
            );
            return None;
        }

        debug!(cards = layout.cards.len(), "loaded stored layout");
        Some(layout)
    }

    /// Removes the stored layout.
    ///
    /// Returns `false` (after logging) if the record could not be removed.
    #[instrument(skip(self))]
    pub fn reset_layout(&self) -> bool {
        match self.commit(None) {
            Ok(()) => {
                info!("layout reset");
                true
            }
            Err(e) => {
                warn!(error = %e, "failed to reset layout");
                false
            }
        }
    }

    /// Returns `true` if a record exists, without parsing it.
    #[must_use]
    pub fn has_stored_layout(&self) -> bool {
        self.storage.contains(&self.key)
    }

    /// Writes the snapshot to `dir` as `card-layout-<timestamp>.json`.
    ///
    /// The export does not read or modify storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be serialized or written.
    #[instrument(skip_all, fields(dir = %dir.display()))]
    pub fn export_layout(&self, snapshot: &LayoutSnapshot, dir: &Path) -> Result<PathBuf> {
        let layout = snapshot.to_saved(Utc::now());
        let json = export_json(&layout)?;
        let path = dir.join(export_file_name(layout.timestamp));

        std::fs::write(&path, json).map_err(|source| StoreError::WriteExport {
            path: path.clone(),
            source,
        })?;

        info!(path = %path.display(), "layout exported");
        Ok(path)
    }

    /// Imports a layout file, stores it, and hands it to the host.
    ///
    /// The file must be a JSON object with a `version` string and a `cards`
    /// array. Versions this build cannot migrate are rejected. Cards from
    /// older files (grid positions instead of orders) are migrated, and the
    /// record is stored under the current version.
    ///
    /// Storage is left untouched on any failure, and the host is only
    /// notified once the record has been written.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, is not a
    /// layout, or cannot be stored.
    #[instrument(skip_all, fields(path = %path.display()))]
    pub async fn import_layout<H: LayoutHost + ?Sized>(
        &self,
        path: &Path,
        host: &mut H,
    ) -> Result<SavedLayout> {
        let content =
            tokio::fs::read_to_string(path)
                .await
                .map_err(|source| StoreError::ReadImport {
                    path: path.to_path_buf(),
                    source,
                })?;

        let value: Value = serde_json::from_str(&content).map_err(|source| {
            StoreError::ParseImport {
                path: path.to_path_buf(),
                source,
            }
        })?;

        let layout = parse_import(&value)?;
        self.write_record(&layout)?;

        info!(cards = layout.cards.len(), "layout imported");
        host.on_layout_restore(layout.clone());
        Ok(layout)
    }
}

fn invalid(reason: impl Into<String>) -> StoreError {
    StoreError::InvalidImport {
        reason: reason.into(),
    }
}

/// Validates and normalizes an imported document.
fn parse_import(value: &Value) -> Result<SavedLayout> {
    let object = value
        .as_object()
        .ok_or_else(|| invalid("expected a JSON object"))?;

    match object.get("version") {
        Some(Value::String(version)) if is_migratable_version(version) => {}
        Some(Value::String(version)) => {
            return Err(invalid(format!("unsupported layout version {version}")));
        }
        Some(_) => return Err(invalid("version must be a string")),
        None => return Err(invalid("missing version")),
    }

    let cards = match object.get("cards") {
        Some(Value::Array(cards)) => cards,
        Some(_) => return Err(invalid("cards must be an array")),
        None => return Err(invalid("missing cards")),
    };

    let grid_columns = match object.get("gridColumns") {
        None | Some(Value::Null) => IMPORT_FALLBACK_COLUMNS,
        Some(value) => value
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .filter(|&n| n > 0)
            .ok_or_else(|| invalid("gridColumns must be a positive integer"))?,
    };

    let auto_collapse_settings = match object.get("autoCollapseSettings") {
        None | Some(Value::Null) => None,
        Some(value) => {
            let settings: AutoCollapseSettings = serde_json::from_value(value.clone())
                .map_err(|e| invalid(format!("invalid autoCollapseSettings: {e}")))?;
            settings
                .validate()
                .map_err(|reason| invalid(format!("invalid autoCollapseSettings: {reason}")))?;
            Some(settings)
        }
    };

    let cards = cards
        .iter()
        .enumerate()
        .map(|(index, card)| {
            serde_json::from_value::<LegacyCard>(card.clone())
                .map(|legacy| migrate_card(legacy, grid_columns))
                .map_err(|e| invalid(format!("card {index}: {e}")))
        })
        .collect::<Result<Vec<_>>>()?;

    let timestamp = object
        .get("timestamp")
        .and_then(Value::as_i64)
        .unwrap_or_else(|| Utc::now().timestamp_millis());

    Ok(SavedLayout {
        version: LAYOUT_VERSION.to_string(),
        timestamp,
        cards,
        grid_columns,
        auto_collapse_settings,
    })
}
