use crate::frame::SceneFrame;
use crate::mesh::FaceOrientation;
use glam::{Mat4, Vec3};
use voxstage_common::{Fill, Rgba};

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// A renderer reads a composed frame and produces output. It never feeds
/// back into scene or animation state.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one composed frame.
    fn render(&self, frame: &SceneFrame) -> Self::Output;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerKind {
    /// Fills the scene bounds; extents are zero.
    Background,
    Face(FaceOrientation),
    Ornament,
    Glow,
    Particle,
}

/// One flat, fully transformed surface ready for a 2D compositor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layer {
    pub kind: LayerKind,
    /// Layer space to view space, root transform included.
    pub matrix: Mat4,
    pub width: f32,
    pub height: f32,
    pub color: Rgba,
    pub fill: Fill,
    pub opacity: f32,
}

/// Flattens the visual tree into tree-ordered layers.
///
/// The root transform is folded into every grid-space layer here, so the
/// frame itself only ever carries one camera matrix.
#[derive(Debug, Default)]
pub struct LayerListRenderer;

impl LayerListRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for LayerListRenderer {
    type Output = Vec<Layer>;

    fn render(&self, frame: &SceneFrame) -> Vec<Layer> {
        let root = frame.root_transform;
        let mut layers = Vec::with_capacity(frame.layer_count() + 1);

        layers.push(Layer {
            kind: LayerKind::Background,
            matrix: Mat4::IDENTITY,
            width: 0.0,
            height: 0.0,
            color: Rgba::TRANSPARENT,
            fill: frame.background,
            opacity: 1.0,
        });

        for block in &frame.blocks {
            for face in &block.mesh.faces {
                layers.push(Layer {
                    kind: LayerKind::Face(face.orientation),
                    matrix: root * face.transform,
                    width: face.width,
                    height: face.height,
                    color: face.tint(block.color),
                    fill: block.texture,
                    opacity: 1.0,
                });
            }
        }

        for glow in &frame.glows {
            let lift = Vec3::Z * (glow.size / 2.0 + glow.rise);
            layers.push(Layer {
                kind: LayerKind::Glow,
                matrix: root
                    * Mat4::from_translation(glow.origin + lift)
                    * Mat4::from_scale(Vec3::splat(glow.scale)),
                width: glow.size,
                height: glow.size,
                color: glow.color,
                fill: Fill::Solid(glow.color),
                opacity: glow.opacity,
            });
        }

        if let Some(character) = &frame.character {
            for face in &character.mesh.faces {
                layers.push(Layer {
                    kind: LayerKind::Face(face.orientation),
                    matrix: root * face.transform,
                    width: face.width,
                    height: face.height,
                    color: face.tint(Rgba::WHITE),
                    fill: character.fill,
                    opacity: 1.0,
                });
            }
            for ornament in &character.mesh.ornaments {
                layers.push(Layer {
                    kind: LayerKind::Ornament,
                    matrix: root * ornament.transform,
                    width: ornament.width,
                    height: ornament.height,
                    color: ornament.color,
                    fill: Fill::Solid(ornament.color),
                    opacity: 1.0,
                });
            }
        }

        // Particles live in scene-bounds space, outside the camera root.
        for p in &frame.particles {
            layers.push(Layer {
                kind: LayerKind::Particle,
                matrix: Mat4::from_translation(Vec3::new(p.x, p.y, p.depth)),
                width: p.size,
                height: p.size,
                color: p.color,
                fill: Fill::Solid(p.color),
                opacity: p.opacity,
            });
        }

        tracing::trace!(layers = layers.len(), "flattened frame");
        layers
    }
}

/// Debug text renderer.
///
/// Produces a human-readable description of a frame. Used by the CLI and in
/// tests of the render interface.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, frame: &SceneFrame) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "=== Scene Frame (compact={}, finished={}) ===\n",
            frame.compact, frame.finished
        ));
        out.push_str(&format!(
            "Blocks: {} Glows: {} Particles: {} Layers: {}\n",
            frame.blocks.len(),
            frame.glows.len(),
            frame.particles.len(),
            frame.layer_count()
        ));
        let up = frame.root_transform.transform_vector3(Vec3::Z);
        out.push_str(&format!(
            "Root up-axis: ({:.3}, {:.3}, {:.3})\n",
            up.x, up.y, up.z
        ));

        for block in &frame.blocks {
            let p = block.mesh.cuboid.position;
            out.push_str(&format!(
                "  block {} code={} pos=({:.1}, {:.1}, {:.1}) h={:.1}{}\n",
                block.coord,
                block.code.0,
                p.x,
                p.y,
                p.z,
                block.mesh.cuboid.height,
                if block.glow { " glow" } else { "" }
            ));
        }
        for glow in &frame.glows {
            out.push_str(&format!(
                "  glow {} opacity={:.2} scale={:.2} rise={:.1}\n",
                glow.coord, glow.opacity, glow.scale, glow.rise
            ));
        }
        if let Some(character) = &frame.character {
            let p = character.mesh.cuboid.position;
            out.push_str(&format!(
                "  character pos=({:.1}, {:.1}, {:.1}) ornaments={}\n",
                p.x,
                p.y,
                p.z,
                character.mesh.ornaments.len()
            ));
        }

        out
    }
}
