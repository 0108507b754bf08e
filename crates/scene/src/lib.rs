//! Scene model: the static level description and the block property resolver.
//!
//! # Invariants
//! - A `LevelScene` grid is rectangular and non-empty for its whole lifetime.
//! - `resolve` is pure and total; unknown codes degrade to "not rendered".

mod scene;
mod theme;
mod tile;

pub use scene::{LevelScene, SceneError, SceneImages};
pub use theme::Theme;
pub use tile::{BlockAttributes, ColorClass, TextureSlot, TileCode, resolve};

pub fn crate_info() -> &'static str {
    "voxstage-scene v0.1.0"
}
