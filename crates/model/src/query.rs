//! Structured queries and their responses.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::blob::BlobMeta;
use crate::expression::Expression;

/// Page size used when a query does not set one.
pub const DEFAULT_QUERY_SIZE: usize = 30;

/// A filtered, paged query against the blob store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    /// Filter expression.
    pub expression: Expression,
    /// Offset of the first hit to return.
    pub from: usize,
    /// Maximum number of hits to return. Zero returns only the total.
    pub size: usize,
    /// Whether hits should carry pre-signed download URLs.
    pub sign_urls: bool,
    /// Whether to compute tag and attribute facets over the whole result set.
    pub facets: bool,
}

impl Query {
    /// Create a query with default paging.
    ///
    /// # Arguments
    /// * `expression` - Filter expression
    pub fn new(expression: Expression) -> Self {
        Self {
            expression,
            from: 0,
            size: DEFAULT_QUERY_SIZE,
            sign_urls: true,
            facets: false,
        }
    }

    /// Query for the direct children of a blob.
    pub fn children_of(parent_id: impl Into<String>) -> Self {
        Self::new(Expression::parent(parent_id))
    }

    pub fn with_from(mut self, from: usize) -> Self {
        self.from = from;
        self
    }

    pub fn with_size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    pub fn with_sign_urls(mut self, sign_urls: bool) -> Self {
        self.sign_urls = sign_urls;
        self
    }

    pub fn with_facets(mut self, facets: bool) -> Self {
        self.facets = facets;
        self
    }
}

/// One matching blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hit {
    /// Blob ID.
    pub id: String,
    /// Blob metadata.
    pub meta: BlobMeta,
    /// Pre-signed download URL, when requested.
    #[serde(default)]
    pub url: Option<String>,
}

/// Distinct values and their counts across a filtered result set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facets {
    /// Tag → number of matching blobs carrying it.
    #[serde(default)]
    pub tags: BTreeMap<String, u64>,
    /// Attribute key → (value → number of matching blobs).
    #[serde(default)]
    pub meta: BTreeMap<String, BTreeMap<String, u64>>,
}

impl Facets {
    /// Distinct values observed for an attribute key.
    ///
    /// # Arguments
    /// * `key` - Attribute key
    ///
    /// # Returns
    /// Values in sorted order, empty if the key was never observed.
    pub fn values_for(&self, key: &str) -> Vec<String> {
        self.meta
            .get(key)
            .map(|values| values.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Distinct tags in sorted order.
    pub fn tag_names(&self) -> Vec<String> {
        self.tags.keys().cloned().collect()
    }
}

/// Result page for a query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResponse {
    /// Number of hits in this response.
    pub count: usize,
    /// Total number of matching blobs on the server.
    pub total: usize,
    /// Hits in server order.
    pub hits: Vec<Hit>,
    /// Facets, when requested.
    #[serde(default)]
    pub facets: Option<Facets>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_builders() {
        let query: Query = Query::children_of("D1")
            .with_from(10)
            .with_size(0)
            .with_sign_urls(false)
            .with_facets(true);

        assert_eq!(query.expression, Expression::parent("D1"));
        assert_eq!(query.from, 10);
        assert_eq!(query.size, 0);
        assert!(!query.sign_urls);
        assert!(query.facets);
    }

    #[test]
    fn test_facet_accessors() {
        let mut facets: Facets = Facets::default();
        facets.tags.insert("2024".to_string(), 1);
        facets.tags.insert("2023".to_string(), 4);
        facets
            .meta
            .entry("camera".to_string())
            .or_default()
            .insert("x100".to_string(), 2);

        assert_eq!(facets.tag_names(), vec!["2023", "2024"]);
        assert_eq!(facets.values_for("camera"), vec!["x100"]);
        assert!(facets.values_for("lens").is_empty());
    }
}
