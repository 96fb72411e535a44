//! Synchronisation pipeline stages

pub mod audio_pattern_analyzer;
pub mod fallback_synchronizer;
pub mod feedback_propagator;
pub mod lrc_exporter;
pub mod lyrics_analyzer;
pub mod pattern_mapper;
pub mod pattern_optimizer;
pub mod quality_scorer;
pub mod timestamp_post_processor;

pub use audio_pattern_analyzer::AudioPatternAnalyzer;
pub use fallback_synchronizer::{fallback_from_structure, fallback_synchronize};
pub use feedback_propagator::apply_corrections;
pub use lrc_exporter::to_lrc;
pub use lyrics_analyzer::LyricsAnalyzer;
pub use pattern_mapper::{Alignment, PatternMapper};
pub use pattern_optimizer::PatternOptimizer;
pub use quality_scorer::{low_confidence_lines, score_quality, QualityScorer};
pub use timestamp_post_processor::TimestampPostProcessor;
