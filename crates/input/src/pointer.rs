use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A raw pointer event from the host, in coordinates relative to the
/// scene's bounding box (origin top-left, y downward).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// Pointer moved to `(x, y)`.
    Move { x: f32, y: f32 },
    /// Pointer left the scene region.
    Leave,
}

/// Pointer position as a fraction of the half-extents from the scene
/// centre: `(0, 0)` at the centre, `(+/-1, +/-1)` at the edges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerOffset {
    pub nx: f32,
    pub ny: f32,
}

impl PointerOffset {
    pub const CENTER: Self = Self { nx: 0.0, ny: 0.0 };
}

/// Size of the scene's bounding region.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SceneBounds {
    pub width: f32,
    pub height: f32,
}

impl SceneBounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        (0.0..=self.width).contains(&x) && (0.0..=self.height).contains(&y)
    }

    /// Position relative to the centre, in the same units as the bounds.
    pub fn centered(&self, x: f32, y: f32) -> Vec2 {
        Vec2::new(x - self.width / 2.0, y - self.height / 2.0)
    }

    /// Normalized offset from the centre, clamped to `[-1, 1]`.
    pub fn offset(&self, x: f32, y: f32) -> PointerOffset {
        let half = Vec2::new(self.width / 2.0, self.height / 2.0);
        if half.x <= 0.0 || half.y <= 0.0 {
            return PointerOffset::CENTER;
        }
        let n = (self.centered(x, y) / half).clamp(Vec2::NEG_ONE, Vec2::ONE);
        PointerOffset { nx: n.x, ny: n.y }
    }
}

impl Default for SceneBounds {
    fn default() -> Self {
        Self::new(480.0, 480.0)
    }
}
