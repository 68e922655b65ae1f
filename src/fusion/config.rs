//! Configuration for hybrid retrieval fusion.
//!
//! This module provides configuration structures for controlling how vector
//! and graph retrieval results are combined into a single ranking.
//!
//! # Examples
//!
//! ```
//! use naginata::fusion::{FailurePolicy, FusionConfig, ScoreNormalization};
//!
//! // Use default configuration
//! let config = FusionConfig::default();
//! assert_eq!(config.vector_weight, 0.5);
//! assert_eq!(config.graph_weight, 0.5);
//!
//! // Create custom configuration
//! let mut custom_config = FusionConfig::default();
//! custom_config.vector_weight = 0.7; // Favor dense retrieval
//! custom_config.graph_weight = 0.3;
//! custom_config.normalization = ScoreNormalization::ZScore;
//! custom_config.failure_policy = FailurePolicy::Degrade;
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{NaginataError, Result};
use crate::query::DEFAULT_TOP_K;

/// Configuration for fusing vector and graph retrieval results.
///
/// The weights control how much each source contributes to the fused score.
/// They do not have to sum to 1.0; with [`ScoreCombination::SumClipped`] the
/// fused score is clipped back into the normalized range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FusionConfig {
    /// Weight for vector retrieval scores (>= 0.0).
    pub vector_weight: f32,
    /// Weight for graph retrieval scores (>= 0.0).
    pub graph_weight: f32,
    /// Default number of fused results when the caller does not override it.
    pub top_k: usize,
    /// Normalization strategy applied per source before fusion.
    pub normalization: ScoreNormalization,
    /// How the two normalized scores combine into one.
    pub combination: ScoreCombination,
    /// What to do when one retriever fails.
    pub failure_policy: FailurePolicy,
    /// Default per-retriever call timeout. `None` waits indefinitely.
    pub retriever_timeout: Option<Duration>,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            vector_weight: 0.5,
            graph_weight: 0.5,
            top_k: DEFAULT_TOP_K,
            normalization: ScoreNormalization::MinMax,
            combination: ScoreCombination::SumClipped,
            failure_policy: FailurePolicy::FailFast,
            retriever_timeout: None,
        }
    }
}

impl FusionConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if !self.vector_weight.is_finite() || self.vector_weight < 0.0 {
            return Err(NaginataError::config(
                "vector_weight must be finite and non-negative",
            ));
        }
        if !self.graph_weight.is_finite() || self.graph_weight < 0.0 {
            return Err(NaginataError::config(
                "graph_weight must be finite and non-negative",
            ));
        }
        if self.vector_weight == 0.0 && self.graph_weight == 0.0 {
            return Err(NaginataError::config("at least one weight must be positive"));
        }
        if self.top_k == 0 {
            return Err(NaginataError::config("top_k must be at least 1"));
        }
        Ok(())
    }
}

/// Score normalization strategies applied per source before fusion.
///
/// Raw scores from the two retrievers are not on a comparable scale
/// (cosine similarity vs. graph-path relevance), so each source's result
/// set is normalized independently before any combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreNormalization {
    /// No normalization - use raw scores directly.
    ///
    /// Only safe when both retrievers already score on the same scale.
    None,
    /// Min-max normalization to [0, 1] range.
    ///
    /// Scales scores linearly: `(score - min) / (max - min)`. Constant or
    /// single-element sets map to 1.0.
    MinMax,
    /// Z-score normalization (standardization), rescaled into [0, 1].
    ///
    /// More robust to outliers than min-max normalization.
    ZScore,
    /// Rank-based normalization.
    ///
    /// Uses relative ranking positions instead of score magnitudes. Useful
    /// when score distributions are very different.
    Rank,
}

/// How two normalized per-source scores combine into one fused score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreCombination {
    /// Weighted sum, clipped to the normalized range [0, 1].
    ///
    /// A chunk confirmed by both retrievers scores at least as high as it
    /// would from either source alone.
    SumClipped,
    /// Weighted sum without clipping.
    WeightedSum,
    /// Maximum of the weighted per-source scores.
    Max,
}

/// Policy for handling a failure of one underlying retriever.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailurePolicy {
    /// Any retriever failure fails the whole retrieval call, identifying
    /// which retriever failed.
    FailFast,
    /// Return the surviving retriever's results alone and mark the result
    /// as degraded. Both retrievers failing still fails the call.
    Degrade,
}
