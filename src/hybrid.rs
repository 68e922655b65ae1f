//! Hybrid retriever combining vector and graph retrieval.
//!
//! [`HybridRetriever`] composes two [`Retriever`] capabilities behind a
//! single retrieval contract. Both calls are issued concurrently, scores
//! are normalized per source, duplicates are merged, and the fused ranking
//! is truncated to the requested top-k.
//!
//! The retriever holds no state beyond the injected capabilities and its
//! configuration: no caching, no mutation of inputs, nothing shared across
//! calls that would need locking.

use std::sync::Arc;
use std::time::Instant;

use tokio::time::timeout;

use crate::chunk::{CombinedResult, ScoredChunk};
use crate::error::{NaginataError, Result};
use crate::fusion::config::{FailurePolicy, FusionConfig};
use crate::fusion::merger::ResultMerger;
use crate::query::{Query, RetrievalOptions};
use crate::retriever::Retriever;

/// Outcome of one underlying retriever call after policy handling.
type SourceOutcome = Result<Vec<ScoredChunk>>;

/// A retriever that fuses dense vector and knowledge-graph retrieval.
pub struct HybridRetriever {
    vector: Arc<dyn Retriever>,
    graph: Arc<dyn Retriever>,
    config: FusionConfig,
    merger: ResultMerger,
}

impl HybridRetriever {
    /// Create a new hybrid retriever from two injected capabilities.
    pub fn new(
        vector: Arc<dyn Retriever>,
        graph: Arc<dyn Retriever>,
        config: FusionConfig,
    ) -> Result<Self> {
        config.validate()?;
        let merger = ResultMerger::new(config.clone());
        Ok(Self {
            vector,
            graph,
            config,
            merger,
        })
    }

    /// Create a hybrid retriever with the default configuration.
    pub fn with_defaults(vector: Arc<dyn Retriever>, graph: Arc<dyn Retriever>) -> Self {
        let config = FusionConfig::default();
        let merger = ResultMerger::new(config.clone());
        Self {
            vector,
            graph,
            config,
            merger,
        }
    }

    /// The active fusion configuration.
    pub fn config(&self) -> &FusionConfig {
        &self.config
    }

    /// Retrieve a fused, deduplicated, ranked result set for the query.
    ///
    /// The vector and graph calls run concurrently; cancelling the returned
    /// future cancels both. Under [`FailurePolicy::Degrade`] a single
    /// retriever failure yields the surviving retriever's results with the
    /// `degraded` flag set; under [`FailurePolicy::FailFast`] it fails the
    /// call identifying the retriever. Empty result sets are a success.
    pub async fn retrieve(
        &self,
        query: &Query,
        options: &RetrievalOptions,
    ) -> Result<CombinedResult> {
        if query.text().trim().is_empty() {
            return Err(NaginataError::invalid_query(
                "Query text must not be empty",
            ));
        }
        options.validate()?;

        let start = Instant::now();

        // Fill in the configured top-k default, then hand each retriever its
        // own copy of the options. The query itself is immutable and shared
        // by reference.
        let mut options = options.clone();
        options.top_k = Some(options.top_k.unwrap_or(self.config.top_k));
        let top_k = options.effective_top_k();

        let vector_options = options.clone();
        let graph_options = options.clone();

        let (vector_outcome, graph_outcome) = tokio::join!(
            self.call_retriever(self.vector.as_ref(), query, &vector_options),
            self.call_retriever(self.graph.as_ref(), query, &graph_options),
        );

        let (vector_chunks, graph_chunks, degraded) =
            self.apply_failure_policy(vector_outcome, graph_outcome)?;

        let vector_matches = vector_chunks.len();
        let graph_matches = graph_chunks.len();

        let chunks = self
            .merger
            .merge(vector_chunks, graph_chunks, top_k, options.min_score);

        Ok(CombinedResult {
            chunks,
            degraded,
            vector_matches,
            graph_matches,
            query_time_ms: start.elapsed().as_millis() as u64,
            query_text: query.text().to_string(),
        })
    }

    /// Invoke one retriever, applying the per-call timeout.
    ///
    /// A timeout is reported as that retriever being unavailable, so the
    /// failure policy treats timeouts and errors uniformly.
    async fn call_retriever(
        &self,
        retriever: &dyn Retriever,
        query: &Query,
        options: &RetrievalOptions,
    ) -> SourceOutcome {
        let limit = options.timeout.or(self.config.retriever_timeout);
        match limit {
            Some(limit) => match timeout(limit, retriever.retrieve(query, options)).await {
                Ok(outcome) => outcome,
                Err(_) => Err(NaginataError::retriever_unavailable(
                    retriever.name(),
                    format!("Timed out after {}ms", limit.as_millis()),
                )),
            },
            None => retriever.retrieve(query, options).await,
        }
    }

    /// Resolve the two call outcomes against the configured failure policy.
    ///
    /// Returns the usable chunk sets plus whether the result is degraded.
    fn apply_failure_policy(
        &self,
        vector_outcome: SourceOutcome,
        graph_outcome: SourceOutcome,
    ) -> Result<(Vec<ScoredChunk>, Vec<ScoredChunk>, bool)> {
        match (vector_outcome, graph_outcome) {
            (Ok(vector_chunks), Ok(graph_chunks)) => Ok((vector_chunks, graph_chunks, false)),
            (Ok(vector_chunks), Err(graph_err)) => match self.config.failure_policy {
                FailurePolicy::Degrade => Ok((vector_chunks, Vec::new(), true)),
                FailurePolicy::FailFast => Err(self.attribute(self.graph.as_ref(), graph_err)),
            },
            (Err(vector_err), Ok(graph_chunks)) => match self.config.failure_policy {
                FailurePolicy::Degrade => Ok((Vec::new(), graph_chunks, true)),
                FailurePolicy::FailFast => Err(self.attribute(self.vector.as_ref(), vector_err)),
            },
            (Err(vector_err), Err(graph_err)) => Err(NaginataError::retriever_unavailable(
                format!("{}, {}", self.vector.name(), self.graph.name()),
                format!("both retrievers failed: {vector_err}; {graph_err}"),
            )),
        }
    }

    /// Wrap a retriever failure with the retriever's name, unless it
    /// already carries one.
    fn attribute(&self, retriever: &dyn Retriever, err: NaginataError) -> NaginataError {
        if err.is_retriever_unavailable() {
            err
        } else {
            NaginataError::retriever_unavailable(retriever.name(), err.to_string())
        }
    }
}
