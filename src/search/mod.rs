//! Fuzzy machine search over compatibility records.
//!
//! A record matches when any of the [`MatchStrategy`] predicates accepts it.
//! Strategies are evaluated in [`MatchStrategy::ORDER`] and stop at the first
//! hit; results are never re-ranked, so they keep the input order.

use crate::brands::BrandAliases;
use crate::models::CompatibilityRecord;
use serde::Serialize;
use std::fmt;

/// A search string prepared once for all records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedQuery {
    /// Lowercased, trimmed query
    lower: String,
    /// Lowercased query with whitespace and hyphens removed
    compact: String,
    /// Lowercased whitespace-separated words
    words: Vec<String>,
    /// First word after brand normalization, lowercased
    brand: String,
    /// Remaining words joined by a single space
    remainder: String,
}

impl PreparedQuery {
    /// Prepares a query. Returns `None` for an empty or whitespace-only query.
    pub fn new(query: &str, aliases: &BrandAliases) -> Option<Self> {
        let lower = query.trim().to_lowercase();
        if lower.is_empty() {
            return None;
        }

        let words: Vec<String> = lower.split_whitespace().map(str::to_string).collect();
        let brand = aliases.normalize(&words[0]).to_lowercase();
        let remainder = words[1..].join(" ");

        Some(Self {
            compact: compact(&lower),
            lower,
            words,
            brand,
            remainder,
        })
    }

    /// The lowercased, trimmed query.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.lower
    }
}

/// Lowercases and removes whitespace and hyphens.
fn compact(value: &str) -> String {
    value
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

/// One named matching heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    /// Query found in "make+model" with whitespace and hyphens removed
    Compact,
    /// Query found in make or in model (case-insensitive)
    FieldContains,
    /// First word is a brand (alias-normalized) in make, the rest is in model
    BrandModelSplit,
    /// Every query word appears somewhere in "make model"
    AllWords,
}

impl MatchStrategy {
    /// Evaluation order.
    pub const ORDER: [Self; 4] = [
        Self::Compact,
        Self::FieldContains,
        Self::BrandModelSplit,
        Self::AllWords,
    ];

    /// Whether this strategy accepts the record.
    #[must_use]
    pub fn matches(self, query: &PreparedQuery, record: &CompatibilityRecord) -> bool {
        let make = record.make.to_lowercase();
        let model = record.model.to_lowercase();

        match self {
            Self::Compact => {
                !query.compact.is_empty()
                    && compact(&format!("{make}{model}")).contains(&query.compact)
            }
            Self::FieldContains => make.contains(&query.lower) || model.contains(&query.lower),
            Self::BrandModelSplit => make.contains(&query.brand) && model.contains(&query.remainder),
            Self::AllWords => {
                let combined = format!("{make} {model}");
                query.words.iter().all(|word| combined.contains(word.as_str()))
            }
        }
    }

    /// Snake-case name, as used in JSON output.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Compact => "compact",
            Self::FieldContains => "field_contains",
            Self::BrandModelSplit => "brand_model_split",
            Self::AllWords => "all_words",
        }
    }
}

impl fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A matched record and the strategy that accepted it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MachineMatch<'r> {
    /// The matching record
    pub record: &'r CompatibilityRecord,
    /// First strategy that accepted the record
    pub strategy: MatchStrategy,
}

/// Machine search with brand alias support.
#[derive(Debug, Clone, Copy)]
pub struct MachineSearch<'a> {
    aliases: &'a BrandAliases,
}

impl<'a> MachineSearch<'a> {
    /// Creates a search over the given alias table.
    #[must_use]
    pub const fn new(aliases: &'a BrandAliases) -> Self {
        Self { aliases }
    }

    /// Returns the first strategy accepting the record, if any.
    #[must_use]
    pub fn match_record(
        &self,
        query: &PreparedQuery,
        record: &CompatibilityRecord,
    ) -> Option<MatchStrategy> {
        MatchStrategy::ORDER
            .into_iter()
            .find(|strategy| strategy.matches(query, record))
    }

    /// Searches records, keeping input order.
    ///
    /// An empty or whitespace-only query matches nothing; use
    /// [`MachineSearch::filter_or_all`] when an absent query means "show all".
    ///
    /// # Examples
    ///
    /// ```
    /// use trackfinder::brands::BrandAliases;
    /// use trackfinder::models::CompatibilityRecord;
    /// use trackfinder::search::MachineSearch;
    ///
    /// let aliases = BrandAliases::load().unwrap();
    /// let records = vec![CompatibilityRecord::new("Bobcat", "T190", ["450x86x56"])];
    /// let search = MachineSearch::new(&aliases);
    /// assert_eq!(search.search("bob t190", &records).len(), 1);
    /// assert!(search.search("", &records).is_empty());
    /// ```
    #[must_use]
    pub fn search<'r>(
        &self,
        query: &str,
        records: &'r [CompatibilityRecord],
    ) -> Vec<&'r CompatibilityRecord> {
        self.search_explained(query, records)
            .into_iter()
            .map(|m| m.record)
            .collect()
    }

    /// Searches records and reports which strategy matched each one.
    #[must_use]
    pub fn search_explained<'r>(
        &self,
        query: &str,
        records: &'r [CompatibilityRecord],
    ) -> Vec<MachineMatch<'r>> {
        let Some(prepared) = PreparedQuery::new(query, self.aliases) else {
            return Vec::new();
        };

        records
            .iter()
            .filter_map(|record| {
                self.match_record(&prepared, record)
                    .map(|strategy| MachineMatch { record, strategy })
            })
            .collect()
    }

    /// Applies an optional filter: `None` returns every record.
    #[must_use]
    pub fn filter_or_all<'r>(
        &self,
        query: Option<&str>,
        records: &'r [CompatibilityRecord],
    ) -> Vec<&'r CompatibilityRecord> {
        match query {
            Some(query) => self.search(query, records),
            None => records.iter().collect(),
        }
    }
}

/// Admin list filter: query in make, model or any size code.
///
/// An empty query returns every record.
#[must_use]
pub fn filter_admin<'r>(
    query: &str,
    records: &'r [CompatibilityRecord],
) -> Vec<&'r CompatibilityRecord> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return records.iter().collect();
    }

    records
        .iter()
        .filter(|record| {
            record.make.to_lowercase().contains(&needle)
                || record.model.to_lowercase().contains(&needle)
                || record
                    .track_sizes
                    .iter()
                    .any(|size| size.to_lowercase().contains(&needle))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aliases() -> BrandAliases {
        BrandAliases::load().expect("Failed to load brand aliases")
    }

    fn records() -> Vec<CompatibilityRecord> {
        vec![
            CompatibilityRecord::new("Bobcat", "T190", ["450x86x56"]),
            CompatibilityRecord::new("CAT", "299D", ["450x86x60"]),
            CompatibilityRecord::new("Kubota", "SVL-75", ["400x86x52", "450x86x52"]),
            CompatibilityRecord::new("John Deere", "317G", ["320x86x52"]),
            CompatibilityRecord::new("ASV", "MD70 Turbo", ["457x101.6x51"]),
        ]
    }

    fn prepared(query: &str) -> PreparedQuery {
        PreparedQuery::new(query, &aliases()).unwrap()
    }

    #[test]
    fn test_bobcat_t190_scenarios() {
        let aliases = aliases();
        let search = MachineSearch::new(&aliases);
        let records = vec![CompatibilityRecord::new("Bobcat", "T190", ["450x86x56"])];

        for query in ["bobcat t190", "T190", "bob t190"] {
            let found = search.search(query, &records);
            assert_eq!(found.len(), 1, "query {query:?} should match");
            assert_eq!(found[0].model, "T190");
        }
    }

    #[test]
    fn test_strategy_reported_for_each_scenario() {
        let aliases = aliases();
        let search = MachineSearch::new(&aliases);
        let records = records();

        let strategy = |query: &str| search.search_explained(query, &records)[0].strategy;
        assert_eq!(strategy("bobcat t190"), MatchStrategy::Compact);
        assert_eq!(strategy("svl75"), MatchStrategy::Compact);
        assert_eq!(strategy("caterpillar 299d"), MatchStrategy::BrandModelSplit);
        assert_eq!(strategy("bob t190"), MatchStrategy::BrandModelSplit);
        assert_eq!(strategy("turbo asv"), MatchStrategy::AllWords);
    }

    #[test]
    fn test_empty_query_matches_nothing() {
        let aliases = aliases();
        let search = MachineSearch::new(&aliases);
        let records = records();
        assert!(search.search("", &records).is_empty());
        assert!(search.search("   \t", &records).is_empty());
    }

    #[test]
    fn test_absent_query_shows_all() {
        let aliases = aliases();
        let search = MachineSearch::new(&aliases);
        let records = records();
        assert_eq!(search.filter_or_all(None, &records).len(), records.len());
        assert!(search.filter_or_all(Some(""), &records).is_empty());
    }

    #[test]
    fn test_every_make_and_model_substring_matches() {
        let aliases = aliases();
        let search = MachineSearch::new(&aliases);
        let records = records();

        for record in &records {
            for field in [&record.make, &record.model] {
                let chars: Vec<char> = field.chars().collect();
                for start in 0..chars.len() {
                    for end in start + 1..=chars.len() {
                        let query: String = chars[start..end].iter().collect();
                        if query.trim().is_empty() {
                            continue;
                        }
                        let found = search.search(&query, &records);
                        assert!(
                            found.contains(&record),
                            "{query:?} should find {}",
                            record.machine_name()
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_results_keep_input_order() {
        let aliases = aliases();
        let search = MachineSearch::new(&aliases);
        let records = records();
        let found = search.search("t", &records);
        let positions: Vec<usize> = found
            .iter()
            .map(|r| records.iter().position(|x| x == *r).unwrap())
            .collect();
        let mut sorted = positions.clone();
        sorted.sort_unstable();
        assert_eq!(positions, sorted);
    }

    #[test]
    fn test_unknown_first_word_falls_through() {
        let aliases = aliases();
        let search = MachineSearch::new(&aliases);
        let records = records();
        // "deere" is an alias, "317g" is in the model
        assert_eq!(search.search("deere 317g", &records).len(), 1);
        // "turbo" is not a brand; all-words still finds the ASV
        assert_eq!(search.search("turbo md70", &records).len(), 1);
        assert!(search.search("volvo t190", &records).is_empty());
    }

    #[test]
    fn test_strategies_individually() {
        let bobcat = CompatibilityRecord::new("Bobcat", "T190", ["450x86x56"]);

        assert!(MatchStrategy::Compact.matches(&prepared("bob-cat t 190"), &bobcat));
        assert!(!MatchStrategy::Compact.matches(&prepared("bob t190"), &bobcat));

        assert!(MatchStrategy::FieldContains.matches(&prepared("T19"), &bobcat));
        assert!(!MatchStrategy::FieldContains.matches(&prepared("bobcat t190"), &bobcat));

        assert!(MatchStrategy::BrandModelSplit.matches(&prepared("bob t190"), &bobcat));
        assert!(!MatchStrategy::BrandModelSplit.matches(&prepared("t190 bobcat"), &bobcat));

        assert!(MatchStrategy::AllWords.matches(&prepared("t190 bobcat"), &bobcat));
        assert!(!MatchStrategy::AllWords.matches(&prepared("t190 kubota"), &bobcat));
    }

    #[test]
    fn test_hyphen_only_query_does_not_match_everything() {
        let aliases = aliases();
        let search = MachineSearch::new(&aliases);
        let records = records();
        let found = search.search("-", &records);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].model, "SVL-75");
    }

    #[test]
    fn test_filter_admin() {
        let records = records();
        assert_eq!(filter_admin("450x86", &records).len(), 3);
        assert_eq!(filter_admin("deere", &records).len(), 1);
        assert_eq!(filter_admin("", &records).len(), records.len());
    }
}
