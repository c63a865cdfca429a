//! Storefront products.

use crate::models::{default_true, CatalogRecord, RecordId};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A product listed in the store.
///
/// Field names follow the backend (`part_number`, `in_stock`); the camelCase
/// spellings used by older exports are accepted as aliases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Record identifier
    #[serde(default, alias = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    /// Stock keeping unit
    pub sku: String,
    /// Product title (e.g., "Bobcat T190 Rubber Track")
    pub title: String,
    /// Long description
    #[serde(default)]
    pub description: String,
    /// Price in USD
    pub price: f64,
    /// Canonical brand name
    pub brand: String,
    /// Category name
    pub category: String,
    /// Track size code, for tracks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    /// Manufacturer part number
    #[serde(default, alias = "partNumber")]
    pub part_number: String,
    /// Image URLs, first one is the primary image
    #[serde(default)]
    pub images: Vec<String>,
    /// Whether the product can be ordered
    #[serde(default = "default_true", alias = "inStock")]
    pub in_stock: bool,
    /// Units on hand
    #[serde(default)]
    pub stock_quantity: u32,
    /// Free-form specification table
    #[serde(default)]
    pub specifications: BTreeMap<String, serde_json::Value>,
    /// Machine models this product fits (e.g., ["T750", "T770"])
    #[serde(default)]
    pub machine_models: Vec<String>,
}

impl Product {
    /// Creates an in-stock product with the required fields set.
    pub fn new(
        sku: impl Into<String>,
        title: impl Into<String>,
        price: f64,
        brand: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        let sku = sku.into();
        Self {
            id: None,
            part_number: sku.clone(),
            sku,
            title: title.into(),
            description: String::new(),
            price,
            brand: brand.into(),
            category: category.into(),
            size: None,
            images: Vec::new(),
            in_stock: true,
            stock_quantity: 0,
            specifications: BTreeMap::new(),
            machine_models: Vec::new(),
        }
    }

    /// Sets the track size code.
    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.size = Some(size.into());
        self
    }

    /// Sets the part number.
    pub fn with_part_number(mut self, part_number: impl Into<String>) -> Self {
        self.part_number = part_number.into();
        self
    }

    /// Primary image URL, if any.
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

impl CatalogRecord for Product {
    const KIND: &'static str = "product";

    fn prepare(&mut self) -> Result<()> {
        self.sku = self.sku.trim().to_string();
        self.title = self.title.trim().to_string();

        if self.sku.is_empty() {
            anyhow::bail!("Product SKU cannot be empty");
        }
        if self.title.is_empty() {
            anyhow::bail!("Product {} has an empty title", self.sku);
        }
        if !self.price.is_finite() || self.price < 0.0 {
            anyhow::bail!("Product {} has an invalid price: {}", self.sku, self.price);
        }

        // Blank sizes come from products that are not tracks
        if self.size.as_deref().is_some_and(|s| s.trim().is_empty()) {
            self.size = None;
        }

        Ok(())
    }
}
