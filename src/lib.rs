//! # Naginata
//!
//! A hybrid retrieval library for Rust.
//!
//! Naginata fuses results from a dense vector-similarity retriever and a
//! knowledge-graph retriever into a single ranked result set for a query,
//! ready for a downstream answer-generation stage.
//!
//! ## Features
//!
//! - Pluggable retrieval capabilities behind one trait
//! - Per-source score normalization (min-max, z-score, rank)
//! - Deduplication by stable chunk identifier
//! - Configurable weighted score fusion with deterministic ordering
//! - Concurrent retriever invocation with timeouts
//! - Fail-fast or degraded partial results on retriever failure

pub mod chunk;
pub mod error;
pub mod fusion;
pub mod hybrid;
pub mod query;
pub mod retriever;

pub mod prelude {
    //! Convenience re-exports of the main library types.

    pub use crate::chunk::{CombinedResult, FusedChunk, RetrieverSource, ScoredChunk};
    pub use crate::error::{NaginataError, Result};
    pub use crate::fusion::{FailurePolicy, FusionConfig, ScoreCombination, ScoreNormalization};
    pub use crate::hybrid::HybridRetriever;
    pub use crate::query::{Query, RetrievalOptions};
    pub use crate::retriever::Retriever;
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
