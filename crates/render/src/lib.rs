//! Rendering: cuboid meshes from flat layers, the per-frame visual tree, and
//! renderer-agnostic output.
//!
//! # Invariants
//! - Mesh building is pure: identical inputs give identical faces.
//! - Grid-space nodes never embed the camera; only `SceneFrame::root_transform` does.
//! - Renderers read frames and never mutate scene or animation state.

mod cache;
mod frame;
mod mesh;
mod renderer;

pub use cache::MeshCache;
pub use frame::{BlockNode, CharacterNode, GlowNode, ParticleNode, SceneFrame};
pub use mesh::{
    CubeMesh, Cuboid, FaceDescriptor, FaceOrientation, GradientDirection, Ornament, OrnamentKind,
    TextureLayer, build_cube, cell_origin, character_mesh,
};
pub use renderer::{DebugTextRenderer, Layer, LayerKind, LayerListRenderer, Renderer};

pub fn crate_info() -> &'static str {
    "voxstage-render v0.1.0"
}
