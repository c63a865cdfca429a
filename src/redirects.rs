//! Redirect table lookup.

use crate::models::Redirect;
use std::collections::HashMap;

/// Maximum number of hops followed when resolving a redirect chain.
const MAX_REDIRECT_HOPS: usize = 10;

/// Active redirects indexed by normalized source path.
#[derive(Debug, Clone, Default)]
pub struct RedirectTable {
    redirects: Vec<Redirect>,
    by_path: HashMap<String, usize>,
}

impl RedirectTable {
    /// Builds the table. Later entries for the same source path are ignored.
    pub fn new(redirects: Vec<Redirect>) -> Self {
        let mut by_path = HashMap::new();
        for (idx, redirect) in redirects.iter().enumerate() {
            by_path
                .entry(Redirect::normalize_path(&redirect.from_url))
                .or_insert(idx);
        }
        Self { redirects, by_path }
    }

    /// Finds the redirect registered for a request path.
    #[must_use]
    pub fn resolve(&self, path: &str) -> Option<&Redirect> {
        let idx = self.by_path.get(&Redirect::normalize_path(path))?;
        self.redirects.get(*idx)
    }

    /// Follows a redirect chain to its final target.
    ///
    /// Returns the last redirect applied, or `None` if the path has no
    /// redirect or the chain runs into a cycle (there is no final target to
    /// send the client to). Chains longer than the hop limit stop at the last
    /// redirect followed.
    #[must_use]
    pub fn resolve_chain(&self, path: &str) -> Option<&Redirect> {
        self.follow(path).map(|(last, _)| last)
    }

    /// Number of redirects applied when following the chain from `path`.
    #[must_use]
    pub fn chain_length(&self, path: &str) -> usize {
        self.follow(path).map_or(0, |(_, hops)| hops)
    }

    fn follow(&self, path: &str) -> Option<(&Redirect, usize)> {
        let mut current = self.resolve(path)?;
        let mut visited = vec![Redirect::normalize_path(path)];

        for _ in 0..MAX_REDIRECT_HOPS {
            let next_path = Redirect::normalize_path(&current.to_url);
            if visited.contains(&next_path) {
                tracing::warn!("Redirect loop detected at {next_path}");
                return None;
            }
            match self.resolve(&next_path) {
                Some(next) => {
                    visited.push(next_path);
                    current = next;
                }
                None => break,
            }
        }

        Some((current, visited.len()))
    }

    /// All redirects in the table.
    #[must_use]
    pub fn entries(&self) -> &[Redirect] {
        &self.redirects
    }

    /// Number of redirects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.redirects.len()
    }

    /// Whether the table has no redirects.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.redirects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> RedirectTable {
        RedirectTable::new(vec![
            Redirect::permanent("/products/old-t190", "/products/bobcat-t190"),
            Redirect::permanent("/tracks", "/products"),
            Redirect::permanent("/products", "/shop"),
            Redirect::permanent("/a", "/b"),
            Redirect::permanent("/b", "/a"),
            Redirect::permanent("/tracks", "/ignored"),
        ])
    }

    #[test]
    fn test_resolve_exact_and_normalized() {
        let table = table();
        let redirect = table.resolve("/products/old-t190/").unwrap();
        assert_eq!(redirect.to_url, "/products/bobcat-t190");
        assert!(table.resolve("products/old-t190?ref=mail").is_some());
        assert!(table.resolve("/nothing-here").is_none());
    }

    #[test]
    fn test_first_entry_wins() {
        assert_eq!(table().resolve("/tracks").unwrap().to_url, "/products");
    }

    #[test]
    fn test_resolve_chain() {
        let table = table();
        assert_eq!(table.resolve_chain("/tracks").unwrap().to_url, "/shop");
        assert_eq!(table.chain_length("/tracks"), 2);
        assert_eq!(table.chain_length("/nothing-here"), 0);
        assert_eq!(
            table.resolve_chain("/products/old-t190").unwrap().to_url,
            "/products/bobcat-t190"
        );
    }

    #[test]
    fn test_resolve_chain_loop_is_unresolvable() {
        let table = table();
        assert!(table.resolve("/a").is_some());
        assert!(table.resolve_chain("/a").is_none());
        assert!(table.resolve_chain("/b").is_none());
        assert_eq!(table.chain_length("/a"), 0);
    }

    #[test]
    fn test_resolve_chain_loop_after_first_hop() {
        let mut redirects = table().entries().to_vec();
        redirects.push(Redirect::permanent("/promo", "/a"));
        let table = RedirectTable::new(redirects);
        assert!(table.resolve_chain("/promo").is_none());
    }
}
