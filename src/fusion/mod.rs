//! Score fusion for hybrid retrieval.
//!
//! This module turns two independently-scored result sets into a single
//! ranking:
//! - Per-source score normalization onto a common scale
//! - Deduplication by chunk identifier across sources
//! - Configurable score combination and deterministic ordering

pub mod config;
pub mod merger;
pub mod scorer;

pub use config::{FailurePolicy, FusionConfig, ScoreCombination, ScoreNormalization};
pub use merger::ResultMerger;
pub use scorer::ScoreNormalizer;
