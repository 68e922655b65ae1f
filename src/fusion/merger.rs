//! Result merging for hybrid retrieval.
//!
//! Takes the two per-source result sets, normalizes each independently,
//! merges entries that share a chunk identifier, combines the normalized
//! scores, and produces a deterministically ordered, bounded ranking.

use std::cmp::Ordering;

use ahash::AHashMap;

use crate::chunk::{FusedChunk, ScoredChunk};
use crate::fusion::config::{FusionConfig, ScoreCombination};
use crate::fusion::scorer::ScoreNormalizer;

/// Merges vector and graph retrieval results into one fused ranking.
pub struct ResultMerger {
    config: FusionConfig,
    normalizer: ScoreNormalizer,
}

impl ResultMerger {
    /// Create a new result merger.
    pub fn new(config: FusionConfig) -> Self {
        let normalizer = ScoreNormalizer::new(config.normalization);
        Self { config, normalizer }
    }

    /// Merge the two result sets into a fused, ordered, bounded ranking.
    ///
    /// The output contains no duplicate chunk identifiers, is sorted by
    /// fused score descending, and holds at most `top_k` entries. Ties are
    /// broken by source count (a chunk confirmed by both retrievers ranks
    /// above one confirmed by only one), then by chunk identifier, so
    /// repeated calls with identical inputs produce identical orderings.
    pub fn merge(
        &self,
        mut vector_chunks: Vec<ScoredChunk>,
        mut graph_chunks: Vec<ScoredChunk>,
        top_k: usize,
        min_score: f32,
    ) -> Vec<FusedChunk> {
        self.normalizer.normalize(&mut vector_chunks);
        self.normalizer.normalize(&mut graph_chunks);

        let capacity = vector_chunks.len() + graph_chunks.len();
        let mut by_id: AHashMap<String, FusedChunk> = AHashMap::with_capacity(capacity);

        for chunk in vector_chunks {
            by_id.insert(chunk.id.clone(), FusedChunk::from_scored(chunk));
        }

        for chunk in graph_chunks {
            match by_id.get_mut(&chunk.id) {
                Some(existing) => Self::merge_into(existing, chunk),
                None => {
                    by_id.insert(chunk.id.clone(), FusedChunk::from_scored(chunk));
                }
            }
        }

        for fused in by_id.values_mut() {
            fused.fused_score = self.combine(fused.vector_score, fused.graph_score);
        }

        let mut results: Vec<FusedChunk> = by_id.into_values().collect();

        if min_score > 0.0 {
            results.retain(|fused| fused.fused_score >= min_score);
        }

        results.sort_by(|a, b| {
            b.fused_score
                .partial_cmp(&a.fused_score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| b.source_count().cmp(&a.source_count()))
                .then_with(|| a.id.cmp(&b.id))
        });

        results.truncate(top_k);
        results
    }

    /// Fold a graph-side chunk into an entry the vector side already
    /// produced for the same identifier.
    ///
    /// Metadata is unioned with the existing (vector-side) value winning on
    /// key conflicts; the longer text is kept.
    fn merge_into(existing: &mut FusedChunk, chunk: ScoredChunk) {
        existing.graph_score = Some(chunk.score);
        if chunk.text.len() > existing.text.len() {
            existing.text = chunk.text;
        }
        for (key, value) in chunk.metadata {
            existing.metadata.entry(key).or_insert(value);
        }
    }

    /// Combine the weighted per-source scores into a fused score.
    fn combine(&self, vector_score: Option<f32>, graph_score: Option<f32>) -> f32 {
        let vector_component = vector_score.unwrap_or(0.0) * self.config.vector_weight;
        let graph_component = graph_score.unwrap_or(0.0) * self.config.graph_weight;

        match self.config.combination {
            ScoreCombination::SumClipped => (vector_component + graph_component).min(1.0),
            ScoreCombination::WeightedSum => vector_component + graph_component,
            ScoreCombination::Max => vector_component.max(graph_component),
        }
    }
}
