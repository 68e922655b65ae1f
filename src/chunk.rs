//! Scored chunks and combined retrieval results.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Provenance tag identifying which retrieval capability produced a chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RetrieverSource {
    /// Dense embedding-similarity retrieval.
    Vector,
    /// Knowledge-graph traversal retrieval.
    Graph,
}

impl fmt::Display for RetrieverSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetrieverSource::Vector => write!(f, "vector"),
            RetrieverSource::Graph => write!(f, "graph"),
        }
    }
}

/// A single retrieved unit of content with a retriever-local score.
///
/// The chunk identifier is stable: the same identifier returned by both
/// retrievers refers to the same underlying content, and the fusion step
/// merges such entries instead of duplicating them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredChunk {
    /// Stable chunk identifier.
    pub id: String,
    /// Source text of the chunk.
    pub text: String,
    /// Metadata mapping (string keys to scalar values).
    pub metadata: HashMap<String, String>,
    /// Relevance score on the producing retriever's own scale.
    pub score: f32,
    /// Which retriever produced this chunk.
    pub source: RetrieverSource,
}

impl ScoredChunk {
    /// Create a new scored chunk.
    pub fn new<S: Into<String>>(id: S, score: f32, source: RetrieverSource) -> Self {
        Self {
            id: id.into(),
            text: String::new(),
            metadata: HashMap::new(),
            score,
            source,
        }
    }

    /// Set the chunk text.
    pub fn with_text<S: Into<String>>(mut self, text: S) -> Self {
        self.text = text.into();
        self
    }

    /// Set the metadata mapping.
    pub fn with_metadata(mut self, metadata: HashMap<String, String>) -> Self {
        self.metadata = metadata;
        self
    }

    /// Add a single metadata entry.
    pub fn with_metadata_entry<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// A chunk after fusion, carrying both per-source normalized scores.
///
/// A chunk returned by only one retriever has the other score unset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FusedChunk {
    /// Stable chunk identifier.
    pub id: String,
    /// Source text of the chunk.
    pub text: String,
    /// Union of the metadata from every contributing source.
    pub metadata: HashMap<String, String>,
    /// Combined score used for ranking.
    pub fused_score: f32,
    /// Normalized vector-retrieval score, if the vector retriever matched.
    pub vector_score: Option<f32>,
    /// Normalized graph-retrieval score, if the graph retriever matched.
    pub graph_score: Option<f32>,
}

impl FusedChunk {
    /// Create a fused chunk from a single-source scored chunk.
    pub fn from_scored(chunk: ScoredChunk) -> Self {
        let (vector_score, graph_score) = match chunk.source {
            RetrieverSource::Vector => (Some(chunk.score), None),
            RetrieverSource::Graph => (None, Some(chunk.score)),
        };
        Self {
            id: chunk.id,
            text: chunk.text,
            metadata: chunk.metadata,
            fused_score: 0.0,
            vector_score,
            graph_score,
        }
    }

    /// How many retrievers produced this chunk.
    pub fn source_count(&self) -> usize {
        self.vector_score.is_some() as usize + self.graph_score.is_some() as usize
    }

    /// Which sources contributed to this chunk.
    pub fn sources(&self) -> Vec<RetrieverSource> {
        let mut sources = Vec::with_capacity(2);
        if self.vector_score.is_some() {
            sources.push(RetrieverSource::Vector);
        }
        if self.graph_score.is_some() {
            sources.push(RetrieverSource::Graph);
        }
        sources
    }
}

/// Ordered, deduplicated, fused retrieval results.
///
/// Results are sorted by fused score (descending) with deterministic
/// tie-breaking, contain no duplicate chunk identifiers, and are bounded by
/// the requested top-k.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombinedResult {
    /// Fused results, best first.
    pub chunks: Vec<FusedChunk>,
    /// True when one retriever failed and the degrade policy kept the
    /// surviving retriever's results. Never set silently on full success.
    pub degraded: bool,
    /// Number of candidates the vector retriever contributed.
    pub vector_matches: usize,
    /// Number of candidates the graph retriever contributed.
    pub graph_matches: usize,
    /// Query processing time in milliseconds.
    pub query_time_ms: u64,
    /// Query text used for retrieval.
    pub query_text: String,
}

impl CombinedResult {
    /// Create new empty results.
    pub fn empty() -> Self {
        Self {
            chunks: Vec::new(),
            degraded: false,
            vector_matches: 0,
            graph_matches: 0,
            query_time_ms: 0,
            query_text: String::new(),
        }
    }

    /// Get the number of results.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Check if the results are empty.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Get the best result.
    pub fn best(&self) -> Option<&FusedChunk> {
        self.chunks.first()
    }

    /// Drop results below a minimum fused score.
    pub fn filter_by_score(&mut self, min_score: f32) {
        self.chunks.retain(|chunk| chunk.fused_score >= min_score);
    }

    /// Limit the number of results.
    pub fn truncate(&mut self, max_results: usize) {
        if self.chunks.len() > max_results {
            self.chunks.truncate(max_results);
        }
    }
}
