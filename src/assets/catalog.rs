//! Asset Catalog
//!
//! The catalog is the externally-owned registry of loadable resources. The
//! binding engine never owns catalog entries, it only observes them: every
//! mutation (registration, load completion, payload swap, removal) is
//! recorded as an [`AssetEvent`] and delivered to observers when the host
//! drains the queue at the start of an update turn.
//!
//! # Load model
//!
//! Loading is cooperative and single-threaded: [`AssetCatalog::load`] marks
//! an entry `Loading` and queues its completion; [`AssetCatalog::flush_loads`]
//! delivers the queued completions on a later turn. No call blocks.
//!
//! # Ordering
//!
//! [`AssetCatalog::remove`] cancels any pending completion before emitting
//! `Removed`, so a `Loaded` event can never be delivered after the entry's
//! `Removed` event.

use std::collections::VecDeque;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::assets::reference::AssetId;
use crate::errors::{Result, TotemError};
use crate::resources::material::Material;
use crate::resources::model::ModelTemplate;

/// Lifecycle state of a catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Unloaded,
    Loading,
    Loaded,
    Removed,
}

/// The resolved resource carried by a catalog entry.
///
/// Payloads are shared immutable templates; anything that needs per-owner
/// mutation must clone into a privately owned instance first.
#[derive(Clone)]
pub enum AssetPayload {
    Model(Arc<ModelTemplate>),
    Material(Arc<Material>),
}

impl AssetPayload {
    #[must_use]
    pub fn as_model(&self) -> Option<&Arc<ModelTemplate>> {
        match self {
            Self::Model(template) => Some(template),
            Self::Material(_) => None,
        }
    }

    #[must_use]
    pub fn as_material(&self) -> Option<&Arc<Material>> {
        match self {
            Self::Material(material) => Some(material),
            Self::Model(_) => None,
        }
    }
}

/// One registered resource.
pub struct AssetEntry {
    id: AssetId,
    path: Option<String>,
    state: LoadState,
    payload: AssetPayload,
}

impl AssetEntry {
    #[inline]
    #[must_use]
    pub fn id(&self) -> AssetId {
        self.id
    }

    #[inline]
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> LoadState {
        self.state
    }

    #[inline]
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.state == LoadState::Loaded
    }

    /// The resolved payload. `None` until the entry reaches `Loaded`.
    #[must_use]
    pub fn resource(&self) -> Option<&AssetPayload> {
        if self.is_loaded() {
            Some(&self.payload)
        } else {
            None
        }
    }
}

/// Catalog mutation kinds, one tag per observable transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetEventKind {
    /// The entry was registered.
    Added,
    /// A pending load completed.
    Loaded,
    /// The loaded payload was swapped for a new one.
    Changed,
    /// The entry was unregistered; its payload is gone.
    Removed,
}

/// A recorded catalog mutation.
#[derive(Debug, Clone)]
pub struct AssetEvent {
    pub kind: AssetEventKind,
    pub id: AssetId,
    /// The entry's registered path at the time of the event, if any.
    pub path: Option<String>,
}

/// The registry of loadable resources.
pub struct AssetCatalog {
    entries: FxHashMap<AssetId, AssetEntry>,
    by_path: FxHashMap<String, AssetId>,
    pending_loads: Vec<AssetId>,
    events: VecDeque<AssetEvent>,
}

impl Default for AssetCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: FxHashMap::default(),
            by_path: FxHashMap::default(),
            pending_loads: Vec::new(),
            events: VecDeque::new(),
        }
    }

    // ========================================================================
    // Registration
    // ========================================================================

    /// Registers an entry. The payload is the data the entry will expose
    /// once loaded; the entry starts `Unloaded`.
    pub fn add(
        &mut self,
        id: impl Into<AssetId>,
        path: Option<&str>,
        payload: AssetPayload,
    ) -> Result<AssetId> {
        let id = id.into();
        if self.entries.contains_key(&id) {
            return Err(TotemError::DuplicateAsset(id));
        }
        if let Some(path) = path {
            if let Some(previous) = self.by_path.insert(path.to_string(), id) {
                log::warn!("Catalog path {path:?} re-registered ({previous} -> {id})");
            }
        }
        self.entries.insert(
            id,
            AssetEntry {
                id,
                path: path.map(str::to_string),
                state: LoadState::Unloaded,
                payload,
            },
        );
        self.events.push_back(AssetEvent {
            kind: AssetEventKind::Added,
            id,
            path: path.map(str::to_string),
        });
        Ok(id)
    }

    /// Unregisters an entry. Cancels any pending load completion first, so
    /// observers never see `Loaded` after `Removed`.
    pub fn remove(&mut self, id: AssetId) -> Result<()> {
        let Some(mut entry) = self.entries.remove(&id) else {
            return Err(TotemError::AssetNotFound(id));
        };
        self.pending_loads.retain(|pending| *pending != id);
        if let Some(path) = entry.path.as_deref() {
            self.by_path.remove(path);
        }
        entry.state = LoadState::Removed;
        self.events.push_back(AssetEvent {
            kind: AssetEventKind::Removed,
            id,
            path: entry.path.clone(),
        });
        Ok(())
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    #[must_use]
    pub fn get(&self, id: AssetId) -> Option<&AssetEntry> {
        self.entries.get(&id)
    }

    #[must_use]
    pub fn get_by_path(&self, path: &str) -> Option<&AssetEntry> {
        let id = self.by_path.get(path)?;
        self.entries.get(id)
    }

    #[must_use]
    pub fn contains(&self, id: AssetId) -> bool {
        self.entries.contains_key(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // ========================================================================
    // Loading
    // ========================================================================

    /// Requests a load. `Unloaded` entries transition to `Loading` and have
    /// their completion queued for [`Self::flush_loads`]; `Loading` and
    /// `Loaded` entries are left as they are.
    pub fn load(&mut self, id: AssetId) -> Result<()> {
        let Some(entry) = self.entries.get_mut(&id) else {
            return Err(TotemError::AssetNotFound(id));
        };
        if entry.state == LoadState::Unloaded {
            entry.state = LoadState::Loading;
            self.pending_loads.push(id);
        }
        Ok(())
    }

    /// Delivers every queued load completion. The host calls this once per
    /// update turn, modeling asynchronous completion without blocking.
    pub fn flush_loads(&mut self) {
        let pending = std::mem::take(&mut self.pending_loads);
        for id in pending {
            if let Some(entry) = self.entries.get_mut(&id) {
                if entry.state == LoadState::Loading {
                    entry.state = LoadState::Loaded;
                    self.events.push_back(AssetEvent {
                        kind: AssetEventKind::Loaded,
                        id,
                        path: entry.path.clone(),
                    });
                }
            }
        }
    }

    #[must_use]
    pub fn has_pending_loads(&self) -> bool {
        !self.pending_loads.is_empty()
    }

    /// Swaps the payload of a loaded entry and records a `Changed` event.
    /// Swapping an unloaded entry just replaces the source data silently;
    /// nothing can have bound it yet.
    pub fn replace(&mut self, id: AssetId, payload: AssetPayload) -> Result<()> {
        let Some(entry) = self.entries.get_mut(&id) else {
            return Err(TotemError::AssetNotFound(id));
        };
        entry.payload = payload;
        if entry.is_loaded() {
            self.events.push_back(AssetEvent {
                kind: AssetEventKind::Changed,
                id,
                path: entry.path.clone(),
            });
        }
        Ok(())
    }

    // ========================================================================
    // Event delivery
    // ========================================================================

    /// Takes the turn's accumulated events, oldest first.
    pub fn drain_events(&mut self) -> Vec<AssetEvent> {
        self.events.drain(..).collect()
    }
}
