//! The retrieval capability contract.
//!
//! Every retrieval backend implements [`Retriever`]: a dense vector index,
//! a knowledge graph, or any future source. The hybrid retriever composes
//! capabilities by reference and never subclasses or owns them.

use futures::future::BoxFuture;

use crate::chunk::{RetrieverSource, ScoredChunk};
use crate::error::Result;
use crate::query::{Query, RetrievalOptions};

/// A retrieval capability: given a query, produce scored chunks.
///
/// Scores are on the implementation's own scale and are normalized before
/// fusion; implementations do not need to agree on a range. An empty result
/// is a valid success, not an error.
///
/// Implementations are responsible for their own thread/request safety;
/// the hybrid retriever shares them behind `Arc` across concurrent calls.
pub trait Retriever: Send + Sync {
    /// Name used for error attribution (for example `"vector"` or
    /// `"neo4j-graph"`).
    fn name(&self) -> &str;

    /// Which kind of source this capability represents.
    fn source(&self) -> RetrieverSource;

    /// Retrieve scored chunks for the query.
    ///
    /// `options` carries the candidate budget for this call; implementations
    /// should return at most [`RetrievalOptions::vector_candidates`] or
    /// [`RetrievalOptions::graph_candidates`] chunks depending on their
    /// source kind.
    fn retrieve<'a>(
        &'a self,
        query: &'a Query,
        options: &'a RetrievalOptions,
    ) -> BoxFuture<'a, Result<Vec<ScoredChunk>>>;
}
