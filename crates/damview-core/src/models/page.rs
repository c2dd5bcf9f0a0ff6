use serde::{Deserialize, Serialize};

use super::asset::Asset;
use super::scheme::ListScheme;

/// Active list query: a scheme plus optional keyword filter and node scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListQuery {
    pub scheme: ListScheme,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
}

impl ListQuery {
    pub fn new(scheme: ListScheme) -> Self {
        Self {
            scheme,
            node_id: None,
            keywords: None,
        }
    }

    pub fn album(node_id: impl Into<String>) -> Self {
        Self {
            scheme: ListScheme::Album,
            node_id: Some(node_id.into()),
            keywords: None,
        }
    }

    /// Blank keywords are treated as no keyword filter.
    pub fn with_keywords(mut self, keywords: impl Into<String>) -> Self {
        let keywords = keywords.into();
        let trimmed = keywords.trim();
        self.keywords = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
        self
    }
}

/// Opaque continuation token returned by a list fetch.
///
/// Only the service that produced it interprets its contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageCursor(String);

impl PageCursor {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One page of list results. `next` is `None` once the backend has no further pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetPage {
    pub items: Vec<Asset>,
    pub next: Option<PageCursor>,
}

impl AssetPage {
    pub fn last(items: Vec<Asset>) -> Self {
        Self { items, next: None }
    }

    pub fn with_next(items: Vec<Asset>, next: PageCursor) -> Self {
        Self {
            items,
            next: Some(next),
        }
    }

    pub fn is_last(&self) -> bool {
        self.next.is_none()
    }
}
