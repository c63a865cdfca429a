//! Track size compatibility chart: width buckets and unit conversion.
//!
//! Track sizes are shown as tabs keyed by width. Both the millimeter and the
//! inch groupings are built in a single pass so switching units never needs
//! a regroup. The same [`BucketRule`] is applied to both units.

use crate::constants::MM_PER_INCH;
use crate::models::{SizeCode, TrackSize};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Display unit for the compatibility chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    /// Millimeters (the unit size codes are stored in)
    #[default]
    Mm,
    /// Inches
    Inches,
}

impl FromStr for Unit {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mm" | "millimeters" | "metric" => Ok(Self::Mm),
            "in" | "inch" | "inches" | "imperial" => Ok(Self::Inches),
            other => anyhow::bail!("Unknown unit '{other}' (expected mm or inches)"),
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mm => f.write_str("mm"),
            Self::Inches => f.write_str("inches"),
        }
    }
}

/// How a width is turned into an integer bucket label.
///
/// The storefront chart rounds inch widths (`Nearest`), so 300 mm sits in
/// its 12" tab. The default here truncates both units, which puts 300 mm in
/// the 11" tab; set `catalog.bucket_rule = "nearest"` to match the storefront.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BucketRule {
    /// Drop the fractional part (449.9 -> 449)
    #[default]
    Truncate,
    /// Round half away from zero (449.5 -> 450)
    Nearest,
}

impl BucketRule {
    /// Applies the rule to a positive width value.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn bucket(self, value: f64) -> i64 {
        match self {
            Self::Truncate => value.trunc() as i64,
            Self::Nearest => value.round() as i64,
        }
    }
}

impl FromStr for BucketRule {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "truncate" => Ok(Self::Truncate),
            "nearest" | "round" => Ok(Self::Nearest),
            other => anyhow::bail!("Unknown bucket rule '{other}' (expected truncate or nearest)"),
        }
    }
}

impl fmt::Display for BucketRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Truncate => f.write_str("truncate"),
            Self::Nearest => f.write_str("nearest"),
        }
    }
}

/// Track sizes grouped by width bucket, in both units.
#[derive(Debug, Clone, Default)]
pub struct WidthGroups<'a> {
    mm: BTreeMap<i64, Vec<&'a TrackSize>>,
    inches: BTreeMap<i64, Vec<&'a TrackSize>>,
    skipped: usize,
}

impl<'a> WidthGroups<'a> {
    /// Groups track sizes by width.
    ///
    /// Sizes without a usable width are filtered out first and counted in
    /// [`WidthGroups::skipped`]. Within a bucket, input order is kept.
    pub fn build(sizes: &'a [TrackSize], rule: BucketRule) -> Self {
        let mut groups = Self::default();

        for size in sizes {
            let Some(width) = size.width_mm() else {
                debug!("Skipping track size {} without a usable width", size.size);
                groups.skipped += 1;
                continue;
            };

            groups
                .mm
                .entry(rule.bucket(width))
                .or_default()
                .push(size);
            groups
                .inches
                .entry(rule.bucket(width / MM_PER_INCH))
                .or_default()
                .push(size);
        }

        groups
    }

    /// Returns the grouping for one unit, keyed in ascending numeric order.
    #[must_use]
    pub fn for_unit(&self, unit: Unit) -> &BTreeMap<i64, Vec<&'a TrackSize>> {
        match unit {
            Unit::Mm => &self.mm,
            Unit::Inches => &self.inches,
        }
    }

    /// Bucket labels for a unit, ascending.
    #[must_use]
    pub fn buckets(&self, unit: Unit) -> Vec<i64> {
        self.for_unit(unit).keys().copied().collect()
    }

    /// The bucket selected by default when the chart opens (smallest width).
    #[must_use]
    pub fn first_bucket(&self, unit: Unit) -> Option<i64> {
        self.for_unit(unit).keys().next().copied()
    }

    /// Sizes in one bucket; empty if the bucket does not exist.
    #[must_use]
    pub fn sizes_in(&self, unit: Unit, bucket: i64) -> &[&'a TrackSize] {
        self.for_unit(unit)
            .get(&bucket)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Number of sizes left out because their width was unknown.
    #[must_use]
    pub const fn skipped(&self) -> usize {
        self.skipped
    }
}

/// A track size formatted for display in a unit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplaySize {
    /// Size string in the display unit ("11.8x2.17x82")
    pub size: String,
    /// Width in the display unit
    pub width: String,
    /// Pitch in the display unit
    pub pitch: String,
    /// Number of links
    pub links: u32,
    /// The stored millimeter code, for reverse lookup
    pub original_size: String,
    /// Selling price in USD
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}

/// Formats a track size in the given unit.
///
/// Inches use one decimal for width and two for pitch, with ties rounded
/// away from zero (11.25 -> "11.3"). Returns `None` when the size is missing
/// a dimension.
///
/// # Examples
///
/// ```
/// use trackfinder::models::TrackSize;
/// use trackfinder::track_sizes::{convert, Unit};
///
/// let size = TrackSize::new("300x55x82", 300.0, 55.0, 82);
/// let shown = convert(&size, Unit::Inches).unwrap();
/// assert_eq!(shown.size, "11.8x2.17x82");
/// assert_eq!(shown.original_size, "300x55x82");
/// ```
#[must_use]
pub fn convert(size: &TrackSize, unit: Unit) -> Option<DisplaySize> {
    let dims = size.dimensions()?;

    let (width, pitch, code) = match unit {
        Unit::Mm => (
            format!("{}", dims.width),
            format!("{}", dims.pitch),
            size.size.clone(),
        ),
        Unit::Inches => {
            let width = format!("{:.1}", round_to(dims.width / MM_PER_INCH, 1));
            let pitch = format!("{:.2}", round_to(dims.pitch / MM_PER_INCH, 2));
            let code = format!("{width}x{pitch}x{}", dims.links);
            (width, pitch, code)
        }
    };

    Some(DisplaySize {
        size: code,
        width,
        pitch,
        links: dims.links,
        original_size: size.size.clone(),
        price: size.price,
    })
}

/// Rounds half away from zero to `decimals` places.
///
/// `format!` alone rounds exact ties to even, which would show 11.25" as 11.2.
fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10_f64.powi(decimals);
    (value * scale).round() / scale
}

/// Reverse lookup of track sizes by size code.
#[derive(Debug, Clone, Default)]
pub struct TrackSizeIndex<'a> {
    by_code: HashMap<String, &'a TrackSize>,
}

impl<'a> TrackSizeIndex<'a> {
    /// Indexes sizes by normalized code. The first record wins on duplicates.
    pub fn new(sizes: &'a [TrackSize]) -> Self {
        let mut by_code = HashMap::new();
        for size in sizes {
            by_code
                .entry(SizeCode::normalize(&size.size))
                .or_insert(size);
        }
        Self { by_code }
    }

    /// Looks up a size by its code (case and spacing insensitive).
    #[must_use]
    pub fn lookup(&self, code: &str) -> Option<&'a TrackSize> {
        self.by_code.get(&SizeCode::normalize(code)).copied()
    }

    /// Number of distinct codes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    /// Whether the index is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn sample_sizes() -> Vec<TrackSize> {
        let mut unmeasured = TrackSize::new("custom", 0.0, 0.0, 0);
        unmeasured.width = None;

        vec![
            TrackSize::new("450x86x56", 450.0, 86.0, 56),
            TrackSize::new("300x55x82", 300.0, 55.0, 82),
            TrackSize::new("449.9x86x52", 449.9, 86.0, 52),
            unmeasured,
            TrackSize::new("180x72x37", 180.0, 72.0, 37),
            TrackSize::new("300x52.5x84", 300.0, 52.5, 84),
        ]
    }

    #[test]
    fn test_group_mm_keys_are_truncated_widths() {
        let sizes = sample_sizes();
        let groups = WidthGroups::build(&sizes, BucketRule::Truncate);

        let expected: BTreeSet<i64> = sizes
            .iter()
            .filter_map(TrackSize::width_mm)
            .map(|w| w.trunc() as i64)
            .collect();

        assert_eq!(groups.buckets(Unit::Mm), expected.into_iter().collect::<Vec<_>>());
        assert_eq!(groups.buckets(Unit::Mm), vec![180, 300, 449, 450]);
    }

    #[test]
    fn test_group_keys_are_numeric_not_lexicographic() {
        let sizes = vec![
            TrackSize::new("1000x100x50", 1000.0, 100.0, 50),
            TrackSize::new("90x50x30", 90.0, 50.0, 30),
            TrackSize::new("200x72x40", 200.0, 72.0, 40),
        ];
        let groups = WidthGroups::build(&sizes, BucketRule::Truncate);
        assert_eq!(groups.buckets(Unit::Mm), vec![90, 200, 1000]);
        assert_eq!(groups.first_bucket(Unit::Mm), Some(90));
    }

    #[test]
    fn test_group_skips_unmeasured_sizes() {
        let sizes = sample_sizes();
        let groups = WidthGroups::build(&sizes, BucketRule::Truncate);
        assert_eq!(groups.skipped(), 1);
        let grouped: usize = groups.for_unit(Unit::Mm).values().map(Vec::len).sum();
        assert_eq!(grouped, sizes.len() - 1);
    }

    #[test]
    fn test_group_inch_buckets() {
        let sizes = sample_sizes();

        let truncated = WidthGroups::build(&sizes, BucketRule::Truncate);
        // 180/25.4 = 7.09, 300/25.4 = 11.81, 449.9/25.4 = 17.71, 450/25.4 = 17.72
        assert_eq!(truncated.buckets(Unit::Inches), vec![7, 11, 17]);
        assert_eq!(truncated.sizes_in(Unit::Inches, 17).len(), 2);

        let nearest = WidthGroups::build(&sizes, BucketRule::Nearest);
        assert_eq!(nearest.buckets(Unit::Inches), vec![7, 12, 18]);
        assert_eq!(nearest.buckets(Unit::Mm), vec![180, 300, 450]);
        assert_eq!(nearest.sizes_in(Unit::Mm, 450).len(), 2);
    }

    #[test]
    fn test_bucket_keeps_input_order() {
        let sizes = sample_sizes();
        let groups = WidthGroups::build(&sizes, BucketRule::Truncate);
        let codes: Vec<&str> = groups
            .sizes_in(Unit::Mm, 300)
            .iter()
            .map(|s| s.size.as_str())
            .collect();
        assert_eq!(codes, vec!["300x55x82", "300x52.5x84"]);
        assert!(groups.sizes_in(Unit::Mm, 999).is_empty());
    }

    #[test]
    fn test_bucket_rule_half_away_from_zero() {
        assert_eq!(BucketRule::Nearest.bucket(449.5), 450);
        assert_eq!(BucketRule::Nearest.bucket(449.49), 449);
        assert_eq!(BucketRule::Truncate.bucket(449.99), 449);
    }

    #[test]
    fn test_convert_to_inches() {
        let size = TrackSize::new("300x55x82", 300.0, 55.0, 82);
        let shown = convert(&size, Unit::Inches).unwrap();
        assert_eq!(shown.size, "11.8x2.17x82");
        assert_eq!(shown.width, "11.8");
        assert_eq!(shown.pitch, "2.17");
        assert_eq!(shown.links, 82);
        assert_eq!(shown.original_size, "300x55x82");
    }

    #[test]
    fn test_convert_rounds_ties_away_from_zero() {
        // 285.75 mm = 11.25", 53.975 mm = 2.125"
        let size = TrackSize::new("285.75x53.975x50", 285.75, 53.975, 50);
        let shown = convert(&size, Unit::Inches).unwrap();
        assert_eq!(shown.width, "11.3");
        assert_eq!(shown.pitch, "2.13");
        assert_eq!(shown.size, "11.3x2.13x50");
    }

    #[test]
    fn test_convert_mm_keeps_stored_values() {
        let size = TrackSize::new("300x52.5x84", 300.0, 52.5, 84);
        let shown = convert(&size, Unit::Mm).unwrap();
        assert_eq!(shown.size, "300x52.5x84");
        assert_eq!(shown.width, "300");
        assert_eq!(shown.pitch, "52.5");
    }

    #[test]
    fn test_convert_missing_dimension() {
        let mut size = TrackSize::new("300x55x82", 300.0, 55.0, 82);
        size.pitch = None;
        assert!(convert(&size, Unit::Inches).is_none());
    }

    #[test]
    fn test_convert_round_trip_through_original_size() {
        let sizes = sample_sizes();
        let index = TrackSizeIndex::new(&sizes);

        for size in sizes.iter().filter(|s| s.dimensions().is_some()) {
            let inches = convert(size, Unit::Inches).unwrap();
            let source = index.lookup(&inches.original_size).unwrap();
            assert_eq!(source, size);
            assert_eq!(convert(source, Unit::Mm), convert(size, Unit::Mm));
        }
    }

    #[test]
    fn test_index_first_record_wins() {
        let mut duplicate = TrackSize::new("300X55X82", 300.0, 55.0, 82);
        duplicate.price = Some(999.0);
        let sizes = vec![TrackSize::new("300x55x82", 300.0, 55.0, 82), duplicate];

        let index = TrackSizeIndex::new(&sizes);
        assert_eq!(index.len(), 1);
        assert_eq!(index.lookup("300x55x82").unwrap().price, None);
        assert!(index.lookup("300x55x84").is_none());
    }

    #[test]
    fn test_unit_from_str() {
        assert_eq!("mm".parse::<Unit>().unwrap(), Unit::Mm);
        assert_eq!("Inches".parse::<Unit>().unwrap(), Unit::Inches);
        assert_eq!("in".parse::<Unit>().unwrap(), Unit::Inches);
        assert!("cubits".parse::<Unit>().is_err());
    }
}
