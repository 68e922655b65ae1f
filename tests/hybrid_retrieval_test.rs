//! Integration tests for hybrid retrieval: fusion invariants and
//! failure-policy behavior through the public API.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use futures::future::BoxFuture;

use naginata::prelude::*;

/// Retrieval backend double with canned results.
struct FixtureRetriever {
    name: String,
    source: RetrieverSource,
    chunks: Vec<ScoredChunk>,
    fail: bool,
    calls: Arc<AtomicUsize>,
}

impl FixtureRetriever {
    fn new(source: RetrieverSource, chunks: Vec<ScoredChunk>) -> Self {
        Self {
            name: source.to_string(),
            source,
            chunks,
            fail: false,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn failing(source: RetrieverSource) -> Self {
        Self {
            fail: true,
            ..Self::new(source, Vec::new())
        }
    }

    fn call_counter(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }
}

impl Retriever for FixtureRetriever {
    fn name(&self) -> &str {
        &self.name
    }

    fn source(&self) -> RetrieverSource {
        self.source
    }

    fn retrieve<'a>(
        &'a self,
        _query: &'a Query,
        _options: &'a RetrievalOptions,
    ) -> BoxFuture<'a, Result<Vec<ScoredChunk>>> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(NaginataError::other("index unreachable"))
            } else {
                Ok(self.chunks.clone())
            }
        })
    }
}

fn vector_chunk(id: &str, score: f32) -> ScoredChunk {
    ScoredChunk::new(id, score, RetrieverSource::Vector)
}

fn graph_chunk(id: &str, score: f32) -> ScoredChunk {
    ScoredChunk::new(id, score, RetrieverSource::Graph)
}

fn hybrid(
    vector_chunks: Vec<ScoredChunk>,
    graph_chunks: Vec<ScoredChunk>,
) -> HybridRetriever {
    HybridRetriever::with_defaults(
        Arc::new(FixtureRetriever::new(RetrieverSource::Vector, vector_chunks)),
        Arc::new(FixtureRetriever::new(RetrieverSource::Graph, graph_chunks)),
    )
}

#[tokio::test]
async fn test_mixed_scales_boost_shared_chunk() {
    // Vector scores in [0, 1], graph scores in [0, 10]; chunk "b" appears in
    // both sources and must rank first, without duplication.
    let retriever = hybrid(
        vec![vector_chunk("a", 0.9), vector_chunk("b", 0.4)],
        vec![graph_chunk("b", 10.0), graph_chunk("c", 2.0)],
    );

    let query = Query::new("hybrid fusion").unwrap();
    let result = retriever
        .retrieve(&query, &RetrievalOptions::default())
        .await
        .unwrap();

    let ids: Vec<&str> = result.chunks.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["b", "a", "c"]);

    let b = result.best().unwrap();
    assert_eq!(b.source_count(), 2);
    assert!(b.fused_score >= b.vector_score.unwrap() * retriever.config().vector_weight);
    assert!(b.fused_score >= b.graph_score.unwrap() * retriever.config().graph_weight);
}

#[tokio::test]
async fn test_result_length_bounded_by_top_k() {
    let vector_chunks: Vec<ScoredChunk> = (0..30)
        .map(|i| vector_chunk(&format!("v{i:02}"), i as f32))
        .collect();
    let graph_chunks: Vec<ScoredChunk> = (0..30)
        .map(|i| graph_chunk(&format!("g{i:02}"), i as f32))
        .collect();

    let retriever = hybrid(vector_chunks, graph_chunks);
    let query = Query::new("bounded").unwrap();

    for top_k in [1, 3, 10, 100] {
        let result = retriever
            .retrieve(&query, &RetrievalOptions::new().top_k(top_k))
            .await
            .unwrap();
        assert!(result.len() <= top_k);
    }
}

#[tokio::test]
async fn test_no_duplicate_identifiers() {
    let retriever = hybrid(
        vec![
            vector_chunk("a", 0.9),
            vector_chunk("b", 0.7),
            vector_chunk("c", 0.5),
        ],
        vec![
            graph_chunk("b", 8.0),
            graph_chunk("c", 6.0),
            graph_chunk("d", 4.0),
        ],
    );

    let query = Query::new("dedup").unwrap();
    let result = retriever
        .retrieve(&query, &RetrievalOptions::default())
        .await
        .unwrap();

    let mut ids: Vec<&str> = result.chunks.iter().map(|c| c.id.as_str()).collect();
    let total = ids.len();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), total);
    assert_eq!(total, 4);
}

#[tokio::test]
async fn test_ordering_is_reproducible() {
    let vector_chunks = vec![
        vector_chunk("delta", 0.5),
        vector_chunk("alpha", 0.5),
        vector_chunk("echo", 0.5),
    ];
    let graph_chunks = vec![graph_chunk("charlie", 2.0), graph_chunk("bravo", 2.0)];

    let first = hybrid(vector_chunks.clone(), graph_chunks.clone());
    let second = hybrid(vector_chunks, graph_chunks);
    let query = Query::new("stable").unwrap();

    let result_a = first
        .retrieve(&query, &RetrievalOptions::default())
        .await
        .unwrap();
    let result_b = second
        .retrieve(&query, &RetrievalOptions::default())
        .await
        .unwrap();

    let ids_a: Vec<&str> = result_a.chunks.iter().map(|c| c.id.as_str()).collect();
    let ids_b: Vec<&str> = result_b.chunks.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids_a, ids_b);
    // Constant scores tie everywhere, so identifiers decide the order.
    assert_eq!(ids_a, vec!["alpha", "bravo", "charlie", "delta", "echo"]);
}

#[tokio::test]
async fn test_degrade_policy_returns_partial_results() {
    let vector = Arc::new(FixtureRetriever::new(
        RetrieverSource::Vector,
        vec![
            vector_chunk("a", 0.9),
            vector_chunk("b", 0.6),
            vector_chunk("c", 0.3),
        ],
    ));
    let graph = Arc::new(FixtureRetriever::failing(RetrieverSource::Graph));
    let config = FusionConfig {
        failure_policy: FailurePolicy::Degrade,
        ..Default::default()
    };
    let retriever = HybridRetriever::new(vector, graph, config).unwrap();

    let query = Query::new("partial").unwrap();
    let result = retriever
        .retrieve(&query, &RetrievalOptions::new().top_k(5))
        .await
        .unwrap();

    assert!(result.degraded);
    assert_eq!(result.len(), 3);
    assert_eq!(result.graph_matches, 0);
    assert!(result.chunks.iter().all(|c| c.graph_score.is_none()));
    // Normalized vector ordering survives.
    assert_eq!(result.best().unwrap().id, "a");
}

#[tokio::test]
async fn test_empty_query_rejected_before_any_retriever_call() {
    let vector = FixtureRetriever::new(RetrieverSource::Vector, vec![vector_chunk("a", 0.9)]);
    let graph = FixtureRetriever::new(RetrieverSource::Graph, vec![graph_chunk("b", 1.0)]);
    let vector_calls = vector.call_counter();
    let graph_calls = graph.call_counter();

    // Construction is where empty text is rejected.
    let err = Query::new("   ").unwrap_err();
    assert!(matches!(err, NaginataError::InvalidQuery(_)));

    // Round-trip through serde to force an empty query past construction.
    let valid = Query::new("placeholder").unwrap();
    let json = serde_json::to_string(&valid)
        .unwrap()
        .replace("placeholder", "");
    let empty: Query = serde_json::from_str(&json).unwrap();

    let retriever = HybridRetriever::with_defaults(Arc::new(vector), Arc::new(graph));
    let err = retriever
        .retrieve(&empty, &RetrievalOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, NaginataError::InvalidQuery(_)));
    assert_eq!(vector_calls.load(Ordering::SeqCst), 0);
    assert_eq!(graph_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_no_matches_is_empty_not_error() {
    let retriever = hybrid(Vec::new(), Vec::new());
    let query = Query::new("no such content anywhere").unwrap();

    let result = retriever
        .retrieve(&query, &RetrievalOptions::default())
        .await
        .unwrap();

    assert!(result.is_empty());
    assert!(!result.degraded);
    assert_eq!(result.vector_matches, 0);
    assert_eq!(result.graph_matches, 0);
}

#[tokio::test]
async fn test_fail_fast_surfaces_retriever_identity() {
    let vector = Arc::new(FixtureRetriever::failing(RetrieverSource::Vector));
    let graph = Arc::new(FixtureRetriever::new(
        RetrieverSource::Graph,
        vec![graph_chunk("a", 1.0)],
    ));
    let retriever = HybridRetriever::with_defaults(vector, graph);

    let query = Query::new("failing side").unwrap();
    let err = retriever
        .retrieve(&query, &RetrievalOptions::default())
        .await
        .unwrap_err();

    match err {
        NaginataError::RetrieverUnavailable { retriever, .. } => {
            assert_eq!(retriever, "vector")
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_combined_result_round_trips_through_json() {
    let retriever = hybrid(
        vec![vector_chunk("a", 0.9).with_text("alpha text")],
        vec![graph_chunk("a", 3.0).with_metadata_entry("entity", "alpha")],
    );
    let query = Query::new("serialize").unwrap();
    let result = retriever
        .retrieve(&query, &RetrievalOptions::default())
        .await
        .unwrap();

    let json = serde_json::to_string(&result).unwrap();
    let back: CombinedResult = serde_json::from_str(&json).unwrap();
    assert_eq!(back.len(), 1);
    assert_eq!(back.chunks[0].id, "a");
    assert_eq!(back.chunks[0].source_count(), 2);
    assert_eq!(back.query_text, "serialize");
}
