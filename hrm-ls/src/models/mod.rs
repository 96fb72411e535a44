//! Value types flowing through the synchronisation pipeline

pub mod audio_pattern;
pub mod lyric_timestamp;
pub mod lyrics_structure;
pub mod parameters;
pub mod sync_options;
pub mod sync_quality;
pub mod sync_record;

pub use audio_pattern::{AudioPattern, PatternKind};
pub use lyric_timestamp::{LyricTimestamp, UserCorrection};
pub use lyrics_structure::LyricsStructure;
pub use parameters::{AnalyzerParameters, BandModel};
pub use sync_options::SyncOptions;
pub use sync_quality::{QualityScore, SyncQuality};
pub use sync_record::{SyncMethod, SyncRecord};
