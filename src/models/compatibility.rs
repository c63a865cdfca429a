//! Machine to track size compatibility records.

use crate::models::{default_true, CatalogRecord, RecordId, SizeCode};
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// A machine (make + model) and the track size codes that fit it.
///
/// Size codes are not checked against the track size collection; a code
/// with no matching [`TrackSize`](crate::models::TrackSize) simply resolves
/// to nothing and shows up in the integrity report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompatibilityRecord {
    /// Record identifier
    #[serde(default, alias = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    /// Machine make (e.g., "Bobcat")
    pub make: String,
    /// Machine model (e.g., "T190")
    pub model: String,
    /// Compatible track size codes, in display order
    #[serde(default)]
    pub track_sizes: Vec<String>,
    /// Whether the record is listed on the storefront
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl CompatibilityRecord {
    /// Creates an active record.
    pub fn new<S: Into<String>>(
        make: impl Into<String>,
        model: impl Into<String>,
        track_sizes: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            id: None,
            make: make.into(),
            model: model.into(),
            track_sizes: track_sizes.into_iter().map(Into::into).collect(),
            is_active: true,
        }
    }

    /// Display name of the machine ("Bobcat T190").
    #[must_use]
    pub fn machine_name(&self) -> String {
        format!("{} {}", self.make, self.model)
    }

    /// Whether the given size code is listed for this machine.
    #[must_use]
    pub fn fits(&self, code: &str) -> bool {
        let wanted = SizeCode::normalize(code);
        self.track_sizes
            .iter()
            .any(|size| SizeCode::normalize(size) == wanted)
    }
}

impl CatalogRecord for CompatibilityRecord {
    const KIND: &'static str = "compatibility record";

    fn prepare(&mut self) -> Result<()> {
        self.make = self.make.trim().to_string();
        self.model = self.model.trim().to_string();

        if self.make.is_empty() || self.model.is_empty() {
            anyhow::bail!("Compatibility record needs both make and model");
        }

        self.track_sizes = self
            .track_sizes
            .iter()
            .map(|size| size.trim().to_string())
            .filter(|size| !size.is_empty())
            .collect();

        Ok(())
    }

    fn is_active(&self) -> bool {
        self.is_active
    }
}
