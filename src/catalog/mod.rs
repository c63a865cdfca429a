//! Catalog loading and lookups.
//!
//! The catalog is the set of collections the storefront views run over:
//! products, track sizes, machine compatibility records and redirects. Each
//! collection lives in its own JSON array file inside the data directory.
//!
//! Records are validated one by one at load time. A record that fails to
//! deserialize or prepare is logged and skipped; it never takes the rest of
//! its collection down with it. A missing file is an empty collection.

pub mod integrity;

pub use integrity::{DanglingReference, IntegrityReport};

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;

use crate::constants::{COMPATIBILITY_FILE, PRODUCTS_FILE, REDIRECTS_FILE, TRACK_SIZES_FILE};
use crate::models::{CatalogRecord, CompatibilityRecord, Product, Redirect, TrackSize};
use crate::redirects::RedirectTable;
use crate::track_sizes::TrackSizeIndex;

/// Records parsed from one collection file.
#[derive(Debug, Clone)]
pub struct LoadedCollection<T> {
    /// Active, valid records in file order
    pub records: Vec<T>,
    /// Records skipped because they failed validation
    pub rejected: usize,
    /// Records skipped because they are inactive
    pub inactive: usize,
}

impl<T> Default for LoadedCollection<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            rejected: 0,
            inactive: 0,
        }
    }
}

impl<T> LoadedCollection<T> {
    fn stats(&self) -> CollectionStats {
        CollectionStats {
            loaded: self.records.len(),
            rejected: self.rejected,
            inactive: self.inactive,
        }
    }
}

/// Parses a JSON array of records, preparing each one.
///
/// The document itself must be a JSON array; individual records that fail
/// are counted in [`LoadedCollection::rejected`].
pub fn parse_collection<T: CatalogRecord>(json: &str) -> Result<LoadedCollection<T>> {
    let values: Vec<Value> = serde_json::from_str(json)
        .with_context(|| format!("Expected a JSON array of {} records", T::KIND))?;

    let mut collection = LoadedCollection::default();
    for (index, value) in values.into_iter().enumerate() {
        let mut record: T = match serde_json::from_value(value) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!("Skipping {} #{index}: {e}", T::KIND);
                collection.rejected += 1;
                continue;
            }
        };

        if let Err(e) = record.prepare() {
            tracing::warn!("Skipping {} #{index}: {e}", T::KIND);
            collection.rejected += 1;
            continue;
        }

        if !record.is_active() {
            tracing::debug!("Dropping inactive {} #{index}", T::KIND);
            collection.inactive += 1;
            continue;
        }

        collection.records.push(record);
    }

    Ok(collection)
}

/// Reads and parses one collection file. A missing file is empty.
pub fn read_collection<T: CatalogRecord>(path: &Path) -> Result<LoadedCollection<T>> {
    if !path.exists() {
        tracing::debug!("{} not found, using an empty collection", path.display());
        return Ok(LoadedCollection::default());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse_collection(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Load statistics for one collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CollectionStats {
    /// Records kept
    pub loaded: usize,
    /// Records that failed validation
    pub rejected: usize,
    /// Inactive records dropped
    pub inactive: usize,
}

/// Load statistics for the whole catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    /// Product collection
    pub products: CollectionStats,
    /// Track size collection
    pub track_sizes: CollectionStats,
    /// Compatibility collection
    pub compatibility: CollectionStats,
    /// Redirect collection
    pub redirects: CollectionStats,
}

/// The in-memory catalog.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    /// Products in catalog order
    pub products: Vec<Product>,
    /// Track sizes in catalog order
    pub track_sizes: Vec<TrackSize>,
    /// Compatibility records in catalog order
    pub compatibility: Vec<CompatibilityRecord>,
    /// Redirect table
    pub redirects: RedirectTable,
    /// How the collections were loaded
    pub report: LoadReport,
}

impl Catalog {
    /// Builds a catalog from already-loaded collections.
    pub fn from_collections(
        products: LoadedCollection<Product>,
        track_sizes: LoadedCollection<TrackSize>,
        compatibility: LoadedCollection<CompatibilityRecord>,
        redirects: LoadedCollection<Redirect>,
    ) -> Self {
        let report = LoadReport {
            products: products.stats(),
            track_sizes: track_sizes.stats(),
            compatibility: compatibility.stats(),
            redirects: redirects.stats(),
        };

        Self {
            products: products.records,
            track_sizes: track_sizes.records,
            compatibility: compatibility.records,
            redirects: RedirectTable::new(redirects.records),
            report,
        }
    }

    /// Loads every collection from a data directory.
    ///
    /// Fails if the directory is missing or a collection file is unreadable
    /// or not a JSON array.
    pub fn load_dir(data_dir: &Path) -> Result<Self> {
        if !data_dir.is_dir() {
            anyhow::bail!("Data directory not found: {}", data_dir.display());
        }

        let catalog = Self::from_collections(
            read_collection(&data_dir.join(PRODUCTS_FILE))?,
            read_collection(&data_dir.join(TRACK_SIZES_FILE))?,
            read_collection(&data_dir.join(COMPATIBILITY_FILE))?,
            read_collection(&data_dir.join(REDIRECTS_FILE))?,
        );
        catalog.log_summary(data_dir);
        Ok(catalog)
    }

    /// Loads every collection concurrently.
    ///
    /// Unlike [`Catalog::load_dir`] this never fails: a collection that
    /// cannot be read or parsed is logged and left empty, so the server keeps
    /// serving the rest of the catalog.
    #[cfg(feature = "web")]
    pub async fn load_dir_async(data_dir: &Path) -> Self {
        let (products, track_sizes, compatibility, redirects) = tokio::join!(
            read_collection_async::<Product>(data_dir.join(PRODUCTS_FILE)),
            read_collection_async::<TrackSize>(data_dir.join(TRACK_SIZES_FILE)),
            read_collection_async::<CompatibilityRecord>(data_dir.join(COMPATIBILITY_FILE)),
            read_collection_async::<Redirect>(data_dir.join(REDIRECTS_FILE)),
        );

        let catalog = Self::from_collections(products, track_sizes, compatibility, redirects);
        catalog.log_summary(data_dir);
        catalog
    }

    fn log_summary(&self, data_dir: &Path) {
        tracing::info!(
            "Loaded catalog from {}: {} products, {} track sizes, {} machines, {} redirects",
            data_dir.display(),
            self.products.len(),
            self.track_sizes.len(),
            self.compatibility.len(),
            self.redirects.len()
        );
    }

    /// Index of track sizes by code.
    #[must_use]
    pub fn track_size_index(&self) -> TrackSizeIndex<'_> {
        TrackSizeIndex::new(&self.track_sizes)
    }

    /// Looks up a track size by code.
    #[must_use]
    pub fn track_size(&self, code: &str) -> Option<&TrackSize> {
        self.track_sizes.iter().find(|size| size.matches_code(code))
    }

    /// Machines that list the given size code, in catalog order.
    #[must_use]
    pub fn compatible_machines(&self, code: &str) -> Vec<&CompatibilityRecord> {
        self.compatibility
            .iter()
            .filter(|record| record.fits(code))
            .collect()
    }

    /// Resolves a machine's size codes against the track size collection.
    ///
    /// Codes with no matching track size resolve to `None`.
    #[must_use]
    pub fn resolve_sizes<'a>(
        &'a self,
        record: &'a CompatibilityRecord,
    ) -> Vec<(&'a str, Option<&'a TrackSize>)> {
        let index = self.track_size_index();
        record
            .track_sizes
            .iter()
            .map(|code| (code.as_str(), index.lookup(code)))
            .collect()
    }

    /// Distinct product brands, sorted.
    #[must_use]
    pub fn brands(&self) -> Vec<&str> {
        distinct(self.products.iter().map(|p| p.brand.as_str()))
    }

    /// Distinct product categories, sorted.
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        distinct(self.products.iter().map(|p| p.category.as_str()))
    }

    /// Checks cross references between collections.
    #[must_use]
    pub fn integrity_report(&self) -> IntegrityReport {
        IntegrityReport::build(self)
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    values
        .filter(|v| !v.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(feature = "web")]
async fn read_collection_async<T: CatalogRecord>(path: PathBuf) -> LoadedCollection<T> {
    let content = match tokio::fs::read_to_string(&path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("{} not found, using an empty collection", path.display());
            return LoadedCollection::default();
        }
        Err(e) => {
            tracing::error!("Failed to read {}: {e}", path.display());
            return LoadedCollection::default();
        }
    };

    match parse_collection(&content) {
        Ok(collection) => collection,
        Err(e) => {
            tracing::error!("Failed to parse {}: {e:#}", path.display());
            LoadedCollection::default()
        }
    }
}

/// Resolves the data directory: explicit override first, then the config.
#[must_use]
pub fn resolve_data_dir(override_dir: Option<&Path>, configured: &Path) -> PathBuf {
    override_dir.map_or_else(|| configured.to_path_buf(), Path::to_path_buf)
}
