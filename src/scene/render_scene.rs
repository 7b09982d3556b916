//! Render scene membership.
//!
//! The render scene is a pair of membership sets keyed by model-instance
//! identity: the draw set and the shadow-caster set. Every operation is
//! idempotent — membership is decided by the set, never by a flag held
//! elsewhere — which is what lets the membership controller re-add an
//! instance it believes present without double-registering it.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use rustc_hash::FxHashSet;

static NEXT_INSTANCE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a model instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModelInstanceId(u64);

impl ModelInstanceId {
    /// Allocates a fresh identity.
    #[must_use]
    pub fn next() -> Self {
        Self(NEXT_INSTANCE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ModelInstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "instance:{}", self.0)
    }
}

/// Draw set and shadow-caster set of one rendered scene.
#[derive(Default)]
pub struct RenderScene {
    models: FxHashSet<ModelInstanceId>,
    shadow_casters: FxHashSet<ModelInstanceId>,
}

impl RenderScene {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Draw set
    // ========================================================================

    /// Adds an instance to the draw set. Returns false when it was already
    /// present.
    pub fn add_model(&mut self, id: ModelInstanceId) -> bool {
        self.models.insert(id)
    }

    /// Removes an instance from the draw set. Removing an absent instance
    /// is a no-op.
    pub fn remove_model(&mut self, id: ModelInstanceId) -> bool {
        self.models.remove(&id)
    }

    #[must_use]
    pub fn contains_model(&self, id: ModelInstanceId) -> bool {
        self.models.contains(&id)
    }

    #[must_use]
    pub fn model_count(&self) -> usize {
        self.models.len()
    }

    // ========================================================================
    // Shadow-caster set
    // ========================================================================

    pub fn add_shadow_caster(&mut self, id: ModelInstanceId) -> bool {
        self.shadow_casters.insert(id)
    }

    pub fn remove_shadow_caster(&mut self, id: ModelInstanceId) -> bool {
        self.shadow_casters.remove(&id)
    }

    #[must_use]
    pub fn contains_shadow_caster(&self, id: ModelInstanceId) -> bool {
        self.shadow_casters.contains(&id)
    }

    #[must_use]
    pub fn shadow_caster_count(&self) -> usize {
        self.shadow_casters.len()
    }
}
