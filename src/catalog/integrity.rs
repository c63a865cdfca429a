//! Cross-collection consistency checks.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use super::Catalog;
use crate::models::SizeCode;

/// A compatibility record that lists a size code with no track size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DanglingReference {
    /// Machine display name
    pub machine: String,
    /// The unresolved size code, as written
    pub size: String,
}

/// Findings of an integrity check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IntegrityReport {
    /// Size codes referenced by machines but missing from the size collection
    pub dangling_references: Vec<DanglingReference>,
    /// Track sizes with no usable width (left out of width grouping)
    pub unmeasured_sizes: Vec<String>,
    /// Size codes present more than once in the size collection
    pub duplicate_sizes: Vec<String>,
    /// Track sizes no machine refers to
    pub unused_sizes: Vec<String>,
    /// Number of products checked
    pub products: usize,
    /// Number of track sizes checked
    pub track_sizes: usize,
    /// Number of compatibility records checked
    pub machines: usize,
}

impl IntegrityReport {
    /// Runs every check over the catalog.
    pub fn build(catalog: &Catalog) -> Self {
        let index = catalog.track_size_index();

        let dangling_references = catalog
            .compatibility
            .iter()
            .flat_map(|record| {
                record
                    .track_sizes
                    .iter()
                    .filter(|code| index.lookup(code).is_none())
                    .map(|code| DanglingReference {
                        machine: record.machine_name(),
                        size: code.clone(),
                    })
            })
            .collect();

        let unmeasured_sizes = catalog
            .track_sizes
            .iter()
            .filter(|size| size.width_mm().is_none())
            .map(|size| size.size.clone())
            .collect();

        let mut seen: HashMap<String, usize> = HashMap::new();
        let mut duplicate_sizes = Vec::new();
        for size in &catalog.track_sizes {
            let count = seen.entry(SizeCode::normalize(&size.size)).or_insert(0);
            *count += 1;
            if *count == 2 {
                duplicate_sizes.push(size.size.clone());
            }
        }

        let referenced: HashSet<String> = catalog
            .compatibility
            .iter()
            .flat_map(|record| record.track_sizes.iter())
            .map(|code| SizeCode::normalize(code))
            .collect();
        let unused_sizes = catalog
            .track_sizes
            .iter()
            .filter(|size| !referenced.contains(&SizeCode::normalize(&size.size)))
            .map(|size| size.size.clone())
            .collect();

        Self {
            dangling_references,
            unmeasured_sizes,
            duplicate_sizes,
            unused_sizes,
            products: catalog.products.len(),
            track_sizes: catalog.track_sizes.len(),
            machines: catalog.compatibility.len(),
        }
    }

    /// Whether every machine's size codes resolve.
    ///
    /// Unmeasured, duplicate and unused sizes are warnings only.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.dangling_references.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CompatibilityRecord, TrackSize};

    fn unmeasured(code: &str) -> TrackSize {
        let mut size = TrackSize::new(code, 0.0, 0.0, 0);
        size.width = None;
        size.pitch = None;
        size.links = None;
        size
    }

    #[test]
    fn test_clean_catalog() {
        let catalog = Catalog {
            track_sizes: vec![TrackSize::new("450x86x56", 450.0, 86.0, 56)],
            compatibility: vec![CompatibilityRecord::new("Bobcat", "T190", ["450x86x56"])],
            ..Catalog::default()
        };

        let report = catalog.integrity_report();
        assert!(report.is_clean());
        assert!(report.unused_sizes.is_empty());
        assert_eq!(report.machines, 1);
    }

    #[test]
    fn test_reports_every_finding() {
        let catalog = Catalog {
            track_sizes: vec![
                TrackSize::new("450x86x56", 450.0, 86.0, 56),
                TrackSize::new("450X86X56", 450.0, 86.0, 56),
                TrackSize::new("180x72x37", 180.0, 72.0, 37),
                unmeasured("custom"),
            ],
            compatibility: vec![
                CompatibilityRecord::new("Bobcat", "T190", ["450x86x56", "450x86x58"]),
                CompatibilityRecord::new("Kubota", "KX040", ["custom"]),
            ],
            ..Catalog::default()
        };

        let report = catalog.integrity_report();
        assert!(!report.is_clean());
        assert_eq!(
            report.dangling_references,
            vec![DanglingReference {
                machine: "Bobcat T190".to_string(),
                size: "450x86x58".to_string(),
            }]
        );
        assert_eq!(report.duplicate_sizes, vec!["450X86X56"]);
        assert_eq!(report.unmeasured_sizes, vec!["custom"]);
        assert_eq!(report.unused_sizes, vec!["180x72x37"]);
    }
}
