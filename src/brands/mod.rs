//! Brand alias table and normalization.
//!
//! This module provides access to the embedded brand alias table, which maps
//! the ways customers type a manufacturer ("cat", "caterpillar", "jd") to the
//! canonical brand name stored in the catalog ("CAT", "John Deere").

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Alias table schema from brand_aliases.json.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct BrandAliasTable {
    version: String,
    aliases: HashMap<String, String>,
}

/// Static brand alias table with case-insensitive lookup.
///
/// The table is embedded in the binary at compile time. Keys are lowercase
/// alias strings without surrounding whitespace; values are canonical brand
/// names exactly as they appear in the catalog's `brand`/`make` fields.
#[derive(Debug, Clone)]
pub struct BrandAliases {
    /// Lowercase alias -> canonical brand name
    aliases: HashMap<String, String>,
}

impl BrandAliases {
    /// Loads the alias table from the embedded JSON file.
    pub fn load() -> Result<Self> {
        let json_data = include_str!("brand_aliases.json");
        let table: BrandAliasTable = serde_json::from_str(json_data)
            .context("Failed to parse embedded brand_aliases.json")?;

        Self::from_pairs(table.aliases)
    }

    /// Builds an alias table from `(alias, canonical)` pairs, validating keys.
    ///
    /// Every alias key must already be lowercase and trimmed, and every
    /// canonical name must be non-empty.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut aliases = HashMap::new();

        for (alias, canonical) in pairs {
            let alias = alias.into();
            let canonical = canonical.into();

            if alias.is_empty() || alias != alias.trim() || alias != alias.to_lowercase() {
                anyhow::bail!("Brand alias key must be lowercase and trimmed: {alias:?}");
            }
            if canonical.trim().is_empty() {
                anyhow::bail!("Brand alias {alias:?} maps to an empty brand name");
            }

            aliases.insert(alias, canonical);
        }

        Ok(Self { aliases })
    }

    /// Normalizes a free-text brand token to its canonical brand name.
    ///
    /// The token is lowercased and trimmed before lookup. Tokens that are not
    /// aliases come back unchanged, with their original casing.
    ///
    /// # Examples
    ///
    /// ```
    /// use trackfinder::brands::BrandAliases;
    ///
    /// let aliases = BrandAliases::load().unwrap();
    /// assert_eq!(aliases.normalize("Caterpillar"), "CAT");
    /// assert_eq!(aliases.normalize("unknownbrand"), "unknownbrand");
    /// ```
    #[must_use]
    pub fn normalize(&self, token: &str) -> String {
        let key = token.trim().to_lowercase();
        match self.aliases.get(&key) {
            Some(canonical) => canonical.clone(),
            None => token.to_string(),
        }
    }

    /// Returns the canonical name for a token, or `None` if it is not an alias.
    #[must_use]
    pub fn canonical(&self, token: &str) -> Option<&str> {
        self.aliases
            .get(&token.trim().to_lowercase())
            .map(String::as_str)
    }

    /// Returns every spelling that refers to a brand.
    ///
    /// The set holds the name as given, its lowercase form, and every alias
    /// key whose canonical name matches case-insensitively.
    #[must_use]
    pub fn variations_of(&self, brand: &str) -> BTreeSet<String> {
        let lowered = brand.trim().to_lowercase();

        let mut variations = BTreeSet::new();
        variations.insert(brand.to_string());
        variations.insert(lowered.clone());

        for (alias, canonical) in &self.aliases {
            if canonical.to_lowercase() == lowered {
                variations.insert(alias.clone());
            }
        }

        variations
    }

    /// Gets all canonical brand names, sorted and deduplicated.
    #[must_use]
    pub fn canonical_brands(&self) -> Vec<&str> {
        let brands: BTreeSet<&str> = self.aliases.values().map(String::as_str).collect();
        brands.into_iter().collect()
    }

    /// Iterates over `(alias, canonical)` pairs in alias order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        let mut entries: Vec<(&str, &str)> = self
            .aliases
            .iter()
            .map(|(alias, canonical)| (alias.as_str(), canonical.as_str()))
            .collect();
        entries.sort_unstable();
        entries.into_iter()
    }

    /// Gets the total number of aliases.
    #[must_use]
    pub fn alias_count(&self) -> usize {
        self.aliases.len()
    }
}
