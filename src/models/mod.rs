//! Data models for the storefront catalog.
//!
//! This module contains the typed records the catalog is made of. Each record
//! is deserialized from the backend's JSON and then prepared (validated and
//! coerced) before anything else sees it, so downstream code can rely on the
//! invariants documented on each type.

pub mod compatibility;
pub mod product;
pub mod record_id;
pub mod redirect;
pub mod track_size;

// Re-export all model types
pub use compatibility::CompatibilityRecord;
pub use product::Product;
pub use record_id::RecordId;
pub use redirect::{Redirect, RedirectKind};
pub use track_size::{Dimensions, SizeCode, TrackSize};

use anyhow::Result;

/// A record type that can be loaded from a catalog collection.
pub trait CatalogRecord: serde::de::DeserializeOwned {
    /// Human-readable collection name used in log and error messages.
    const KIND: &'static str;

    /// Validates the record and fills in derivable fields.
    ///
    /// Records that fail preparation are rejected at the load boundary.
    fn prepare(&mut self) -> Result<()>;

    /// Whether the record is part of the public storefront view.
    fn is_active(&self) -> bool {
        true
    }
}

pub(crate) const fn default_true() -> bool {
    true
}
