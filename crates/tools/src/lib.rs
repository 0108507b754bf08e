//! Developer tooling: read-only inspection of a running composer.
//!
//! # Invariants
//! - Tools never mutate composer state.

mod inspector;

pub use inspector::{CellInfo, SceneInspector, SceneSummary};

pub fn crate_info() -> &'static str {
    "voxstage-tools v0.1.0"
}
