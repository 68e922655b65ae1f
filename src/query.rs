//! Query and retrieval options.
//!
//! A [`Query`] is immutable, validated at construction, and constructed per
//! request. [`RetrievalOptions`] carries all per-call tuning knobs; nothing
//! is read from global state.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{NaginataError, Result};

/// Default number of fused results returned by a retrieval call.
pub const DEFAULT_TOP_K: usize = 10;

/// A retrieval query: opaque text plus optional metadata filters.
///
/// The text must contain at least one non-whitespace character; empty
/// queries are rejected at construction so no retriever is ever invoked
/// for them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Query {
    text: String,
    filters: HashMap<String, String>,
}

impl Query {
    /// Create a new query, validating the text.
    ///
    /// # Examples
    ///
    /// ```
    /// use naginata::query::Query;
    ///
    /// let query = Query::new("distributed consensus").unwrap();
    /// assert_eq!(query.text(), "distributed consensus");
    ///
    /// assert!(Query::new("   ").is_err());
    /// ```
    pub fn new<S: Into<String>>(text: S) -> Result<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(NaginataError::invalid_query(
                "Query text must not be empty",
            ));
        }
        Ok(Self {
            text,
            filters: HashMap::new(),
        })
    }

    /// Add a metadata filter (builder style).
    pub fn with_filter<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.filters.insert(key.into(), value.into());
        self
    }

    /// The query text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Metadata filters to apply during retrieval.
    pub fn filters(&self) -> &HashMap<String, String> {
        &self.filters
    }
}

/// Per-call retrieval options.
///
/// `top_k` bounds the fused result list. The per-retriever overrides bound
/// how many candidates each source is asked for; when unset, each source is
/// asked for more than `top_k` so the merge has candidates to work with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalOptions {
    /// Maximum number of fused results to return (>= 1). When unset, the
    /// hybrid retriever's configured default applies.
    pub top_k: Option<usize>,
    /// Candidate count requested from the vector retriever, if overridden.
    pub vector_top_k: Option<usize>,
    /// Candidate count requested from the graph retriever, if overridden.
    pub graph_top_k: Option<usize>,
    /// Minimum fused score for a result to be kept.
    pub min_score: f32,
    /// Per-retriever call timeout. Overrides the configured default.
    pub timeout: Option<Duration>,
}

impl Default for RetrievalOptions {
    fn default() -> Self {
        Self {
            top_k: None,
            vector_top_k: None,
            graph_top_k: None,
            min_score: 0.0,
            timeout: None,
        }
    }
}

impl RetrievalOptions {
    /// Create options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of fused results to return.
    pub fn top_k(mut self, top_k: usize) -> Self {
        self.top_k = Some(top_k);
        self
    }

    /// Override the candidate count requested from the vector retriever.
    pub fn vector_top_k(mut self, top_k: usize) -> Self {
        self.vector_top_k = Some(top_k);
        self
    }

    /// Override the candidate count requested from the graph retriever.
    pub fn graph_top_k(mut self, top_k: usize) -> Self {
        self.graph_top_k = Some(top_k);
        self
    }

    /// Set the minimum fused score threshold.
    pub fn min_score(mut self, min_score: f32) -> Self {
        self.min_score = min_score;
        self
    }

    /// Set the per-retriever timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Validate the options.
    pub fn validate(&self) -> Result<()> {
        if self.top_k == Some(0) {
            return Err(NaginataError::config("top_k must be at least 1"));
        }
        if !self.min_score.is_finite() {
            return Err(NaginataError::config("min_score must be finite"));
        }
        Ok(())
    }

    /// The effective fused result bound for this call.
    pub fn effective_top_k(&self) -> usize {
        self.top_k.unwrap_or(DEFAULT_TOP_K)
    }

    /// Candidate count to request from the vector retriever.
    ///
    /// Falls back to twice the effective top-k to give the merge enough
    /// candidates.
    pub fn vector_candidates(&self) -> usize {
        self.vector_top_k.unwrap_or(self.effective_top_k() * 2)
    }

    /// Candidate count to request from the graph retriever.
    pub fn graph_candidates(&self) -> usize {
        self.graph_top_k.unwrap_or(self.effective_top_k() * 2)
    }
}
