//! Product listing filters and sort orders.

use crate::brands::BrandAliases;
use crate::constants::{FILTER_ALL, MAX_PAGE_LIMIT};
use crate::models::{Product, SizeCode};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Sort order of the product listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    /// Keep catalog order
    #[default]
    Featured,
    /// Cheapest first
    PriceLow,
    /// Most expensive first
    PriceHigh,
    /// Alphabetical by title
    Name,
}

impl FromStr for SortOrder {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "featured" => Ok(Self::Featured),
            "price-low" => Ok(Self::PriceLow),
            "price-high" => Ok(Self::PriceHigh),
            "name" => Ok(Self::Name),
            other => anyhow::bail!(
                "Unknown sort order '{other}' (expected featured, price-low, price-high or name)"
            ),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Featured => "featured",
            Self::PriceLow => "price-low",
            Self::PriceHigh => "price-high",
            Self::Name => "name",
        })
    }
}

/// Listing filters. Empty strings and `"all"` disable a filter.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProductFilters {
    /// Free-text search
    #[serde(default)]
    pub search: String,
    /// Exact brand name
    #[serde(default)]
    pub brand: String,
    /// Exact category name
    #[serde(default)]
    pub category: String,
}

impl ProductFilters {
    /// Filters with only a search term.
    pub fn search(term: impl Into<String>) -> Self {
        Self {
            search: term.into(),
            ..Self::default()
        }
    }
}

/// Whether an exact-match filter value is active.
fn is_active_filter(value: &str) -> bool {
    let value = value.trim();
    !value.is_empty() && value != FILTER_ALL
}

/// One named product search predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductPredicate {
    /// Search term found in the title
    TitleContains,
    /// First word alias-normalized, then found in the title with the rest
    BrandNormalizedTitle,
    /// Every word appears somewhere in the title
    AllWordsInTitle,
    /// Search term found in SKU, part number or size code
    CodeFields,
    /// Search term found in a compatible machine model
    MachineModels,
}

impl ProductPredicate {
    /// Evaluation order.
    pub const ORDER: [Self; 5] = [
        Self::TitleContains,
        Self::BrandNormalizedTitle,
        Self::AllWordsInTitle,
        Self::CodeFields,
        Self::MachineModels,
    ];

    fn matches(self, term: &SearchTerm, product: &Product) -> bool {
        match self {
            Self::TitleContains => product.title.to_lowercase().contains(&term.lower),
            Self::BrandNormalizedTitle => product.title.to_lowercase().contains(&term.branded),
            Self::AllWordsInTitle => {
                let title = product.title.to_lowercase();
                term.words.iter().all(|word| title.contains(word.as_str()))
            }
            Self::CodeFields => {
                product.sku.to_lowercase().contains(&term.lower)
                    || product.part_number.to_lowercase().contains(&term.lower)
                    || product.size.as_deref().is_some_and(|size| {
                        size.to_lowercase().contains(&term.lower)
                            || SizeCode::normalize(size).contains(&term.spaceless)
                    })
            }
            Self::MachineModels => product
                .machine_models
                .iter()
                .any(|model| model.to_lowercase().contains(&term.lower)),
        }
    }
}

/// A search term prepared once per listing.
struct SearchTerm {
    lower: String,
    spaceless: String,
    words: Vec<String>,
    branded: String,
}

impl SearchTerm {
    fn new(search: &str, aliases: &BrandAliases) -> Option<Self> {
        let lower = search.trim().to_lowercase();
        if lower.is_empty() {
            return None;
        }

        let words: Vec<String> = lower.split_whitespace().map(str::to_string).collect();
        let mut branded = aliases.normalize(&words[0]).to_lowercase();
        if words.len() > 1 {
            branded.push(' ');
            branded.push_str(&words[1..].join(" "));
        }

        Some(Self {
            spaceless: SizeCode::normalize(&lower),
            lower,
            words,
            branded,
        })
    }
}

/// Filters and sorts product listings.
#[derive(Debug, Clone, Copy)]
pub struct ProductFilterSort<'a> {
    aliases: &'a BrandAliases,
}

impl<'a> ProductFilterSort<'a> {
    /// Creates a filter over the given alias table.
    #[must_use]
    pub const fn new(aliases: &'a BrandAliases) -> Self {
        Self { aliases }
    }

    /// Applies filters (AND-combined) and the sort order.
    ///
    /// Sorting is stable; [`SortOrder::Featured`] keeps catalog order.
    #[must_use]
    pub fn apply<'p>(
        &self,
        products: &'p [Product],
        filters: &ProductFilters,
        sort: SortOrder,
    ) -> Vec<&'p Product> {
        let term = SearchTerm::new(&filters.search, self.aliases);
        let brand = filters.brand.trim();
        let category = filters.category.trim();

        let mut listed: Vec<&Product> = products
            .iter()
            .filter(|product| {
                term.as_ref().is_none_or(|term| {
                    ProductPredicate::ORDER
                        .into_iter()
                        .any(|predicate| predicate.matches(term, product))
                })
            })
            .filter(|product| !is_active_filter(brand) || product.brand == brand)
            .filter(|product| !is_active_filter(category) || product.category == category)
            .collect();

        match sort {
            SortOrder::Featured => {}
            SortOrder::PriceLow => listed.sort_by(|a, b| a.price.total_cmp(&b.price)),
            SortOrder::PriceHigh => listed.sort_by(|a, b| b.price.total_cmp(&a.price)),
            SortOrder::Name => listed.sort_by(|a, b| compare_titles(&a.title, &b.title)),
        }

        listed
    }

    /// Returns the first predicate matching a product, if any.
    #[must_use]
    pub fn matching_predicate(&self, search: &str, product: &Product) -> Option<ProductPredicate> {
        let term = SearchTerm::new(search, self.aliases)?;
        ProductPredicate::ORDER
            .into_iter()
            .find(|predicate| predicate.matches(&term, product))
    }
}

/// Case-insensitive title collation, ties broken by the raw string.
fn compare_titles(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Slices a listing for one page. `limit` is capped at [`MAX_PAGE_LIMIT`].
#[must_use]
pub fn paginate<T: Copy>(items: &[T], skip: usize, limit: usize) -> Vec<T> {
    items
        .iter()
        .skip(skip)
        .take(limit.min(MAX_PAGE_LIMIT))
        .copied()
        .collect()
}
