//! Shared data models for the Reel backend.
//!
//! This crate provides Serde-serializable types for:
//! - Continuation modes and anchor provenance
//! - Continuity evaluations
//! - Scenes, style bibles and composed prompt bundles
//! - Encoding and generation constants

pub mod continuity;
pub mod encoding;
pub mod scene;

// Re-export common types
pub use continuity::{
    AnchorDecision, AnchorSource, ContinuationMode, ContinuationModeParseError,
    ContinuityEvaluation,
};
pub use encoding::{
    clamp_generation_duration, NormalizeProfile, GENERATION_RESOLUTION, MAX_GENERATION_SECS,
    MIN_GENERATION_SECS,
};
pub use scene::{Scene, ScenePromptBundle, ScenesBible, StyleBible};
