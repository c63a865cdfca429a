//! Rubber track sizes and size codes.

use crate::models::{default_true, CatalogRecord, RecordId};
use anyhow::Result;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

static SIZE_CODE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+(?:\.\d+)?)\s*[xX×]\s*(\d+(?:\.\d+)?)\s*[xX×]\s*(\d+)$")
        .expect("size code pattern is valid")
});

/// Parsed track size code ("WIDTHxPITCHxLINKS", millimeters).
///
/// # Examples
///
/// ```
/// use trackfinder::models::SizeCode;
///
/// let code = SizeCode::parse("300x52.5x84").unwrap();
/// assert_eq!(code.links, 84);
/// assert_eq!(code.to_string(), "300x52.5x84");
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeCode {
    /// Track width in millimeters
    pub width: f64,
    /// Link pitch in millimeters
    pub pitch: f64,
    /// Number of links
    pub links: u32,
}

impl SizeCode {
    /// Parses a size code, tolerating surrounding whitespace and an upper-case `X`.
    pub fn parse(code: &str) -> Result<Self> {
        let trimmed = code.trim();
        let Some(caps) = SIZE_CODE_PATTERN.captures(trimmed) else {
            anyhow::bail!("Invalid track size code '{code}': expected WIDTHxPITCHxLINKS");
        };

        let width: f64 = caps[1].parse()?;
        let pitch: f64 = caps[2].parse()?;
        let links: u32 = caps[3].parse()?;

        if width <= 0.0 || pitch <= 0.0 {
            anyhow::bail!("Invalid track size code '{code}': width and pitch must be positive");
        }

        Ok(Self {
            width,
            pitch,
            links,
        })
    }

    /// Normalizes a code for comparison: lowercase, no whitespace.
    #[must_use]
    pub fn normalize(code: &str) -> String {
        code.chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| if c == '×' { 'x' } else { c })
            .collect::<String>()
            .to_lowercase()
    }
}

impl fmt::Display for SizeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}x{}", self.width, self.pitch, self.links)
    }
}

/// Fully known dimensions of a track size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dimensions {
    /// Width in millimeters (positive)
    pub width: f64,
    /// Pitch in millimeters (positive)
    pub pitch: f64,
    /// Number of links
    pub links: u32,
}

/// A rubber track size offered by the store.
///
/// Width, pitch and links are optional in the backend schema. Missing values
/// are filled from the size code when the record is prepared; a record whose
/// width is still unknown afterwards stays in the catalog but is left out of
/// width grouping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackSize {
    /// Record identifier
    #[serde(default, alias = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    /// Size code in millimeters (e.g., "300x55x82")
    pub size: String,
    /// Width in millimeters
    #[serde(default)]
    pub width: Option<f64>,
    /// Pitch in millimeters
    #[serde(default)]
    pub pitch: Option<f64>,
    /// Number of links
    #[serde(default)]
    pub links: Option<u32>,
    /// Selling price in USD
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    /// Optional description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether the size is listed on the storefront
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl TrackSize {
    /// Creates an active track size with all dimensions set.
    pub fn new(size: impl Into<String>, width: f64, pitch: f64, links: u32) -> Self {
        Self {
            id: None,
            size: size.into(),
            width: Some(width),
            pitch: Some(pitch),
            links: Some(links),
            price: None,
            description: None,
            is_active: true,
        }
    }

    /// Returns the width if it is usable for grouping (finite and positive).
    #[must_use]
    pub fn width_mm(&self) -> Option<f64> {
        self.width.filter(|w| w.is_finite() && *w > 0.0)
    }

    /// Returns all dimensions, or `None` if any of them is missing or invalid.
    #[must_use]
    pub fn dimensions(&self) -> Option<Dimensions> {
        let pitch = self.pitch.filter(|p| p.is_finite() && *p > 0.0)?;
        Some(Dimensions {
            width: self.width_mm()?,
            pitch,
            links: self.links?,
        })
    }

    /// Whether this record's code refers to the given size code.
    #[must_use]
    pub fn matches_code(&self, code: &str) -> bool {
        SizeCode::normalize(&self.size) == SizeCode::normalize(code)
    }
}

impl CatalogRecord for TrackSize {
    const KIND: &'static str = "track size";

    fn prepare(&mut self) -> Result<()> {
        self.size = self.size.trim().to_string();
        if self.size.is_empty() {
            anyhow::bail!("Track size code cannot be empty");
        }

        // Fill in what the code tells us; an unparseable code only matters
        // if the numeric fields are missing too.
        if let Ok(code) = SizeCode::parse(&self.size) {
            self.width = self.width.or(Some(code.width));
            self.pitch = self.pitch.or(Some(code.pitch));
            self.links = self.links.or(Some(code.links));
        }

        if let Some(price) = self.price {
            if !price.is_finite() || price < 0.0 {
                anyhow::bail!("Track size {} has an invalid price: {price}", self.size);
            }
        }

        Ok(())
    }

    fn is_active(&self) -> bool {
        self.is_active
    }
}
