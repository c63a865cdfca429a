//! URL redirect entries (301/302 management).

use crate::models::{default_true, CatalogRecord, RecordId};
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Kind of HTTP redirect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectKind {
    /// 301 Moved Permanently
    Permanent,
    /// 302 Found
    Temporary,
}

impl RedirectKind {
    /// HTTP status code for this redirect kind.
    #[must_use]
    pub const fn status_code(self) -> u16 {
        match self {
            Self::Permanent => 301,
            Self::Temporary => 302,
        }
    }
}

/// A redirect from an old storefront URL to a new one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Redirect {
    /// Record identifier
    #[serde(default, alias = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    /// Old path (e.g., "/products/old-slug")
    pub from_url: String,
    /// New path or absolute URL
    pub to_url: String,
    /// HTTP status code, 301 or 302
    #[serde(default = "default_redirect_type")]
    pub redirect_type: u16,
    /// Whether the redirect is applied
    #[serde(default = "default_true")]
    pub is_active: bool,
}

const fn default_redirect_type() -> u16 {
    301
}

impl Redirect {
    /// Creates an active permanent redirect.
    pub fn permanent(from_url: impl Into<String>, to_url: impl Into<String>) -> Self {
        Self {
            id: None,
            from_url: from_url.into(),
            to_url: to_url.into(),
            redirect_type: 301,
            is_active: true,
        }
    }

    /// Returns the redirect kind. Only valid after [`CatalogRecord::prepare`].
    #[must_use]
    pub const fn kind(&self) -> RedirectKind {
        if self.redirect_type == 302 {
            RedirectKind::Temporary
        } else {
            RedirectKind::Permanent
        }
    }

    /// Normalizes a request path for lookup.
    ///
    /// Surrounding whitespace, the query string and a trailing slash are
    /// dropped, and a leading slash is added if missing.
    #[must_use]
    pub fn normalize_path(path: &str) -> String {
        let path = path.trim();
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/');

        if trimmed.starts_with('/') {
            trimmed.to_string()
        } else {
            format!("/{trimmed}")
        }
    }
}

impl CatalogRecord for Redirect {
    const KIND: &'static str = "redirect";

    fn prepare(&mut self) -> Result<()> {
        if self.redirect_type != 301 && self.redirect_type != 302 {
            anyhow::bail!(
                "Redirect {} has unsupported type {} (expected 301 or 302)",
                self.from_url,
                self.redirect_type
            );
        }

        if self.from_url.trim().is_empty() || self.to_url.trim().is_empty() {
            anyhow::bail!("Redirect needs both from_url and to_url");
        }

        self.from_url = Self::normalize_path(&self.from_url);
        self.to_url = self.to_url.trim().to_string();

        if self.from_url == self.to_url {
            anyhow::bail!("Redirect {} points to itself", self.from_url);
        }

        Ok(())
    }

    fn is_active(&self) -> bool {
        self.is_active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path() {
        assert_eq!(Redirect::normalize_path("/old/"), "/old");
        assert_eq!(Redirect::normalize_path("old?utm=1"), "/old");
        assert_eq!(Redirect::normalize_path("/"), "/");
        assert_eq!(Redirect::normalize_path(""), "/");
    }

    #[test]
    fn test_prepare_rejects_bad_type() {
        let mut redirect = Redirect::permanent("/a", "/b");
        redirect.redirect_type = 307;
        assert!(redirect.prepare().is_err());
    }

    #[test]
    fn test_prepare_rejects_self_redirect() {
        let mut redirect = Redirect::permanent("/a/", "/a");
        assert!(redirect.prepare().is_err());
    }

    #[test]
    fn test_kind() {
        let mut redirect = Redirect::permanent("/a", "/b");
        assert_eq!(redirect.kind().status_code(), 301);
        redirect.redirect_type = 302;
        assert_eq!(redirect.kind(), RedirectKind::Temporary);
    }
}
