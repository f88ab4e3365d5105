//! Continuity decisions for multi-shot generation.
//!
//! Everything in this crate is synchronous and total: the functions never
//! fail and never touch the network or the filesystem.
//!
//! - [`anchor`] picks the source image of the next shot
//! - [`evaluator`] scores how likely the shot is to stay continuous
//! - [`prompt`] builds the director, cinematographer and merged prompts

pub mod anchor;
pub mod evaluator;
pub mod prompt;

pub use anchor::{resolve_anchor, AnchorContext};
pub use evaluator::{evaluate_continuity, normalize_threshold, ContinuityInputs, DEFAULT_THRESHOLD};
pub use prompt::{compose_prompts, PromptInputs};
