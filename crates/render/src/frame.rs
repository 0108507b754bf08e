use crate::mesh::CubeMesh;
use glam::{Mat4, Vec3};
use voxstage_common::{Fill, GridCoord, Rgba};
use voxstage_scene::TileCode;

/// A rendered grid block in grid space.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockNode {
    pub coord: GridCoord,
    pub code: TileCode,
    pub mesh: CubeMesh,
    pub color: Rgba,
    pub texture: Fill,
    pub glow: bool,
}

/// Rising-glow stand-in for a dissolved block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlowNode {
    pub coord: GridCoord,
    /// Base position of the block the glow replaced.
    pub origin: Vec3,
    pub size: f32,
    pub color: Rgba,
    pub opacity: f32,
    pub scale: f32,
    /// Upward float distance along +Z.
    pub rise: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CharacterNode {
    pub mesh: CubeMesh,
    pub fill: Fill,
}

/// Ambient mote, positioned in the scene bounds (not grid space).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleNode {
    pub x: f32,
    pub y: f32,
    pub depth: f32,
    pub size: f32,
    pub opacity: f32,
    pub color: Rgba,
}

/// The complete visual tree for one frame.
///
/// Everything under `root_transform` stays in grid space; camera motion only
/// changes the root.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneFrame {
    pub root_transform: Mat4,
    pub compact: bool,
    pub background: Fill,
    pub blocks: Vec<BlockNode>,
    pub glows: Vec<GlowNode>,
    pub character: Option<CharacterNode>,
    pub particles: Vec<ParticleNode>,
    pub finished: bool,
}

impl SceneFrame {
    /// Frame with nothing mounted.
    pub fn empty() -> Self {
        Self {
            root_transform: Mat4::IDENTITY,
            compact: false,
            background: Fill::Transparent,
            blocks: Vec::new(),
            glows: Vec::new(),
            character: None,
            particles: Vec::new(),
            finished: false,
        }
    }

    /// Number of flat layers the frame expands to.
    pub fn layer_count(&self) -> usize {
        self.blocks.iter().map(|b| b.mesh.layer_count()).sum::<usize>()
            + self.glows.len()
            + self.character.as_ref().map_or(0, |c| c.mesh.layer_count())
            + self.particles.len()
    }
}

impl Default for SceneFrame {
    fn default() -> Self {
        Self::empty()
    }
}
