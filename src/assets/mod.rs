pub mod catalog;
pub mod reference;
pub mod subscriptions;

// Re-export the catalog surface and related types
pub use catalog::{AssetCatalog, AssetEntry, AssetEvent, AssetEventKind, AssetPayload, LoadState};
pub use reference::{AssetId, AssetRef};
pub use subscriptions::{BindingSlot, SubscriptionLedger, Watch};
