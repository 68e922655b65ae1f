//! Score normalization for hybrid retrieval.
//!
//! Vector similarity and graph relevance scores live on different scales.
//! Each source's result set is normalized independently onto [0, 1] before
//! fusion, so a high score from either source is comparably high afterwards.

use std::cmp::Ordering;

use crate::chunk::ScoredChunk;
use crate::fusion::config::ScoreNormalization;

/// Score normalizer applied to one retriever's result set.
#[derive(Debug, Clone, Copy)]
pub struct ScoreNormalizer {
    strategy: ScoreNormalization,
}

impl ScoreNormalizer {
    /// Create a new score normalizer.
    pub fn new(strategy: ScoreNormalization) -> Self {
        Self { strategy }
    }

    /// The configured strategy.
    pub fn strategy(&self) -> ScoreNormalization {
        self.strategy
    }

    /// Normalize the scores of a single source's result set in place.
    pub fn normalize(&self, chunks: &mut [ScoredChunk]) {
        if chunks.is_empty() {
            return;
        }
        match self.strategy {
            ScoreNormalization::None => {}
            ScoreNormalization::MinMax => Self::normalize_min_max(chunks),
            ScoreNormalization::ZScore => Self::normalize_z_score(chunks),
            ScoreNormalization::Rank => Self::normalize_rank(chunks),
        }
    }

    /// Min-max normalization to [0, 1].
    ///
    /// A constant or single-element set carries no ordering information and
    /// maps to 1.0, so a lone match still counts as a full-strength signal.
    /// Re-normalizing an already-normalized set is a no-op.
    fn normalize_min_max(chunks: &mut [ScoredChunk]) {
        let min = chunks.iter().fold(f32::INFINITY, |a, c| a.min(c.score));
        let max = chunks.iter().fold(f32::NEG_INFINITY, |a, c| a.max(c.score));
        let range = max - min;

        if range > 0.0 {
            for chunk in chunks.iter_mut() {
                chunk.score = (chunk.score - min) / range;
            }
        } else {
            for chunk in chunks.iter_mut() {
                chunk.score = 1.0;
            }
        }
    }

    /// Z-score normalization, rescaled into [0, 1].
    fn normalize_z_score(chunks: &mut [ScoredChunk]) {
        let count = chunks.len() as f32;
        let mean = chunks.iter().map(|c| c.score).sum::<f32>() / count;
        let variance = chunks
            .iter()
            .map(|c| (c.score - mean).powi(2))
            .sum::<f32>()
            / count;
        let std_dev = variance.sqrt();

        if std_dev > 0.0 {
            for chunk in chunks.iter_mut() {
                let z = (chunk.score - mean) / std_dev;
                chunk.score = ((z + 3.0) / 6.0).clamp(0.0, 1.0);
            }
        } else {
            for chunk in chunks.iter_mut() {
                chunk.score = 1.0;
            }
        }
    }

    /// Rank-based normalization.
    ///
    /// The best distinct score maps to 1.0 and each lower distinct score
    /// steps down by `1 / distinct_count`. Equal raw scores stay equal.
    fn normalize_rank(chunks: &mut [ScoredChunk]) {
        let mut unique: Vec<f32> = chunks.iter().map(|c| c.score).collect();
        unique.sort_by(|a, b| b.partial_cmp(a).unwrap_or(Ordering::Equal));
        unique.dedup();

        let distinct = unique.len() as f32;
        for chunk in chunks.iter_mut() {
            if let Some(rank) = unique.iter().position(|&s| s == chunk.score) {
                chunk.score = 1.0 - rank as f32 / distinct;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::RetrieverSource;

    fn chunks(scores: &[f32]) -> Vec<ScoredChunk> {
        scores
            .iter()
            .enumerate()
            .map(|(i, &score)| {
                ScoredChunk::new(format!("chunk-{i}"), score, RetrieverSource::Vector)
            })
            .collect()
    }

    fn scores(chunks: &[ScoredChunk]) -> Vec<f32> {
        chunks.iter().map(|c| c.score).collect()
    }

    #[test]
    fn test_no_normalization() {
        let normalizer = ScoreNormalizer::new(ScoreNormalization::None);
        let mut set = chunks(&[0.8, 0.4, 10.0]);
        normalizer.normalize(&mut set);
        assert_eq!(scores(&set), vec![0.8, 0.4, 10.0]);
    }

    #[test]
    fn test_min_max_normalization() {
        let normalizer = ScoreNormalizer::new(ScoreNormalization::MinMax);
        let mut set = chunks(&[0.9, 0.4, 0.65]);
        normalizer.normalize(&mut set);
        assert_eq!(scores(&set), vec![1.0, 0.0, 0.5]);
    }

    #[test]
    fn test_min_max_handles_arbitrary_scale() {
        let normalizer = ScoreNormalizer::new(ScoreNormalization::MinMax);
        let mut set = chunks(&[10.0, 2.0]);
        normalizer.normalize(&mut set);
        assert_eq!(scores(&set), vec![1.0, 0.0]);
    }

    #[test]
    fn test_min_max_degenerate_sets() {
        let normalizer = ScoreNormalizer::new(ScoreNormalization::MinMax);

        let mut single = chunks(&[0.37]);
        normalizer.normalize(&mut single);
        assert_eq!(scores(&single), vec![1.0]);

        let mut constant = chunks(&[5.0, 5.0, 5.0]);
        normalizer.normalize(&mut constant);
        assert_eq!(scores(&constant), vec![1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_min_max_idempotent() {
        let normalizer = ScoreNormalizer::new(ScoreNormalization::MinMax);

        let mut set = chunks(&[0.9, 0.4, 0.65]);
        normalizer.normalize(&mut set);
        let once = scores(&set);
        normalizer.normalize(&mut set);
        assert_eq!(scores(&set), once);

        // Already-normalized single element stays put.
        let mut single = chunks(&[1.0]);
        normalizer.normalize(&mut single);
        assert_eq!(scores(&single), vec![1.0]);
    }

    #[test]
    fn test_z_score_normalization_range() {
        let normalizer = ScoreNormalizer::new(ScoreNormalization::ZScore);
        let mut set = chunks(&[0.8, 0.4, 0.6, 0.2]);
        normalizer.normalize(&mut set);

        for score in scores(&set) {
            assert!((0.0..=1.0).contains(&score));
        }
        // Ordering is preserved.
        assert!(set[0].score > set[1].score);
        assert!(set[2].score > set[3].score);
    }

    #[test]
    fn test_rank_normalization() {
        let normalizer = ScoreNormalizer::new(ScoreNormalization::Rank);
        let mut set = chunks(&[0.9, 0.1, 0.5]);
        normalizer.normalize(&mut set);
        assert_eq!(scores(&set), vec![1.0, 1.0 / 3.0, 2.0 / 3.0]);
    }

    #[test]
    fn test_rank_normalization_ties() {
        let normalizer = ScoreNormalizer::new(ScoreNormalization::Rank);
        let mut set = chunks(&[0.9, 0.5, 0.5]);
        normalizer.normalize(&mut set);
        assert_eq!(set[1].score, set[2].score);
        assert!(set[0].score > set[1].score);
    }

    #[test]
    fn test_empty_set() {
        let normalizer = ScoreNormalizer::new(ScoreNormalization::MinMax);
        let mut set: Vec<ScoredChunk> = Vec::new();
        normalizer.normalize(&mut set);
        assert!(set.is_empty());
    }
}
