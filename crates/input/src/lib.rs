//! Pointer input for the scene: raw host events and their normalization
//! against the scene's bounding region.
//!
//! # Invariants
//! - Offsets are always within `[-1, 1]` on both axes.
//! - The scene centre maps to a zero offset.

pub mod pointer;

pub use pointer::{PointerEvent, PointerOffset, SceneBounds};

pub fn crate_info() -> &'static str {
    "voxstage-input v0.1.0"
}
