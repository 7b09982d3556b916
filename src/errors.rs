//! Error Types
//!
//! This module defines the error types used throughout the engine.
//!
//! # Overview
//!
//! The main error type [`TotemError`] covers the hard failure modes:
//! - Configuration-contract violations (unknown primitive type, malformed
//!   component data)
//! - Catalog misuse (operating on an unregistered asset id)
//!
//! Resolution failures are deliberately *not* errors: an unresolved
//! reference or a mid-flight removal degrades to a visible fallback state
//! (default material, no model) and never unwinds the owning entity's
//! update cycle.
//!
//! # Usage
//!
//! Fallible public APIs return [`Result<T>`], an alias for
//! `std::result::Result<T, TotemError>`.

use thiserror::Error;

use crate::assets::AssetId;

/// The main error type for the Totem engine.
#[derive(Error, Debug)]
pub enum TotemError {
    // ========================================================================
    // Configuration-Contract Violations
    // ========================================================================
    /// An unrecognized primitive type value. This indicates a broken
    /// configuration contract, not a runtime race, and is fatal.
    #[error("Unknown primitive type: {0:?}")]
    InvalidPrimitiveType(String),

    /// Component data failed to parse.
    #[error("Component data error: {0}")]
    ComponentData(#[from] serde_json::Error),

    // ========================================================================
    // Catalog Errors
    // ========================================================================
    /// The requested asset id is not registered in the catalog.
    #[error("Asset not found: {0}")]
    AssetNotFound(AssetId),

    /// An asset id was registered twice.
    #[error("Asset id already registered: {0}")]
    DuplicateAsset(AssetId),

    /// The asset exists but has no loaded payload to operate on.
    #[error("Asset not loaded: {0}")]
    AssetNotLoaded(AssetId),
}

/// Alias for `Result<T, TotemError>`.
pub type Result<T> = std::result::Result<T, TotemError>;
