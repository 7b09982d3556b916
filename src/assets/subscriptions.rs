//! Subscription Ledger
//!
//! Tracks, per binding slot, which catalog events the owning component is
//! currently watching. The ledger is the only route from an [`AssetEvent`]
//! to a slot: dispatch asks [`SubscriptionLedger::matching_slots`] at
//! delivery time, so an event can never reach a slot that was torn down —
//! stale delivery is unreachable by construction rather than filtered.
//!
//! A slot holds at most one active subscription set. Rebinding a slot always
//! runs [`SubscriptionLedger::unsubscribe_all`] before establishing the new
//! set; every `Entry` watch within one set targets the same catalog entry.

use smallvec::SmallVec;

use crate::assets::catalog::{AssetEvent, AssetEventKind};
use crate::assets::reference::AssetId;

/// One thing the component keeps in sync with a catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingSlot {
    /// The model itself.
    Model,
    /// The whole-component material override.
    Material,
    /// A single mesh-instance material override, by mesh index.
    MeshMaterial(usize),
}

/// A single registered interest of a slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Watch {
    /// A lifecycle event of a specific registered entry.
    Entry { id: AssetId, kind: AssetEventKind },
    /// First registration of an entry with this id.
    AddedById(AssetId),
    /// First registration of an entry at this path.
    AddedByPath(String),
}

impl Watch {
    fn matches(&self, event: &AssetEvent) -> bool {
        match self {
            Self::Entry { id, kind } => event.id == *id && event.kind == *kind,
            Self::AddedById(id) => event.kind == AssetEventKind::Added && event.id == *id,
            Self::AddedByPath(path) => {
                event.kind == AssetEventKind::Added && event.path.as_deref() == Some(path.as_str())
            }
        }
    }

    /// True for watches that represent an unresolved, in-flight binding.
    fn is_pending(&self) -> bool {
        match self {
            Self::Entry { kind, .. } => *kind == AssetEventKind::Loaded,
            Self::AddedById(_) | Self::AddedByPath(_) => true,
        }
    }

    fn entry_id(&self) -> Option<AssetId> {
        match self {
            Self::Entry { id, .. } => Some(*id),
            Self::AddedById(_) | Self::AddedByPath(_) => None,
        }
    }
}

/// Per-slot watch sets with exact, idempotent teardown.
///
/// Slots are stored in registration order so that event dispatch is
/// deterministic; the set per slot is small (at most a handful of watches).
#[derive(Default)]
pub struct SubscriptionLedger {
    slots: Vec<(BindingSlot, SmallVec<[Watch; 3]>)>,
}

impl SubscriptionLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one watch under a slot.
    ///
    /// The caller is responsible for tearing the slot down before
    /// establishing a new subscription set; mixing entries is a logic bug.
    pub fn subscribe(&mut self, slot: BindingSlot, watch: Watch) {
        let index = match self.slots.iter().position(|(s, _)| *s == slot) {
            Some(index) => index,
            None => {
                self.slots.push((slot, SmallVec::new()));
                self.slots.len() - 1
            }
        };
        let watches = &mut self.slots[index].1;
        debug_assert!(
            watch.entry_id().is_none()
                || watches
                    .iter()
                    .all(|w| w.entry_id().is_none_or(|id| Some(id) == watch.entry_id())),
            "slot {slot:?} would watch two different catalog entries"
        );
        watches.push(watch);
    }

    /// Removes every watch registered under the slot. Safe to call on a
    /// slot with no subscriptions (no-op, not an error).
    pub fn unsubscribe_all(&mut self, slot: BindingSlot) {
        self.slots.retain(|(s, _)| *s != slot);
    }

    /// Tears down every slot at once (component removal).
    pub fn clear(&mut self) {
        self.slots.clear();
    }

    /// The slots whose active subscription set matches the event, in slot
    /// registration order. An event may match several slots (two mesh
    /// indices can reference the same material entry).
    #[must_use]
    pub fn matching_slots(&self, event: &AssetEvent) -> SmallVec<[BindingSlot; 2]> {
        self.slots
            .iter()
            .filter(|(_, watches)| watches.iter().any(|w| w.matches(event)))
            .map(|(slot, _)| *slot)
            .collect()
    }

    /// The slot's dirty flag: true while it awaits asynchronous resolution
    /// (a pending load or a deferred late registration).
    #[must_use]
    pub fn is_pending(&self, slot: BindingSlot) -> bool {
        self.slots
            .iter()
            .find(|(s, _)| *s == slot)
            .is_some_and(|(_, watches)| watches.iter().any(Watch::is_pending))
    }

    /// True when the slot holds any subscription at all.
    #[must_use]
    pub fn has_subscriptions(&self, slot: BindingSlot) -> bool {
        self.slots.iter().any(|(s, _)| *s == slot)
    }

    /// Every slot currently holding a subscription set, in registration
    /// order.
    #[must_use]
    pub fn active_slots(&self) -> SmallVec<[BindingSlot; 4]> {
        self.slots.iter().map(|(slot, _)| *slot).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(kind: AssetEventKind, id: u64, path: Option<&str>) -> AssetEvent {
        AssetEvent {
            kind,
            id: AssetId(id),
            path: path.map(str::to_string),
        }
    }

    #[test]
    fn torn_down_slot_never_matches() {
        let mut ledger = SubscriptionLedger::new();
        ledger.subscribe(
            BindingSlot::Model,
            Watch::Entry {
                id: AssetId(1),
                kind: AssetEventKind::Loaded,
            },
        );
        ledger.unsubscribe_all(BindingSlot::Model);

        let matched = ledger.matching_slots(&event(AssetEventKind::Loaded, 1, None));
        assert!(matched.is_empty(), "no handler may fire after teardown");
    }

    #[test]
    fn unsubscribe_all_on_empty_slot_is_noop() {
        let mut ledger = SubscriptionLedger::new();
        ledger.unsubscribe_all(BindingSlot::MeshMaterial(3));
        assert!(!ledger.has_subscriptions(BindingSlot::MeshMaterial(3)));
    }

    #[test]
    fn one_event_can_match_several_slots() {
        let mut ledger = SubscriptionLedger::new();
        ledger.subscribe(
            BindingSlot::MeshMaterial(0),
            Watch::Entry {
                id: AssetId(7),
                kind: AssetEventKind::Loaded,
            },
        );
        ledger.subscribe(
            BindingSlot::MeshMaterial(2),
            Watch::Entry {
                id: AssetId(7),
                kind: AssetEventKind::Loaded,
            },
        );

        let matched = ledger.matching_slots(&event(AssetEventKind::Loaded, 7, None));
        assert_eq!(
            matched.as_slice(),
            &[BindingSlot::MeshMaterial(0), BindingSlot::MeshMaterial(2)]
        );
    }

    #[test]
    fn added_by_path_matches_on_path_not_id() {
        let mut ledger = SubscriptionLedger::new();
        ledger.subscribe(
            BindingSlot::MeshMaterial(1),
            Watch::AddedByPath("materials/red.mat".to_string()),
        );

        let matched = ledger.matching_slots(&event(
            AssetEventKind::Added,
            99,
            Some("materials/red.mat"),
        ));
        assert_eq!(matched.as_slice(), &[BindingSlot::MeshMaterial(1)]);

        let missed = ledger.matching_slots(&event(AssetEventKind::Added, 99, Some("other.mat")));
        assert!(missed.is_empty());
    }

    #[test]
    fn pending_reflects_outstanding_resolution() {
        let mut ledger = SubscriptionLedger::new();
        assert!(!ledger.is_pending(BindingSlot::Material));

        ledger.subscribe(BindingSlot::Material, Watch::AddedById(AssetId(4)));
        assert!(ledger.is_pending(BindingSlot::Material));

        ledger.unsubscribe_all(BindingSlot::Material);
        ledger.subscribe(
            BindingSlot::Material,
            Watch::Entry {
                id: AssetId(4),
                kind: AssetEventKind::Removed,
            },
        );
        assert!(
            !ledger.is_pending(BindingSlot::Material),
            "a removal watch alone is a settled binding"
        );
    }
}
