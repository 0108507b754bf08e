use glam::Vec2;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A cell position in the scene grid. `row` grows downward, `col` rightward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCoord {
    pub row: usize,
    pub col: usize,
}

impl GridCoord {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Cell position as a float point (x = col, y = row).
    pub fn as_vec2(self) -> Vec2 {
        Vec2::new(self.col as f32, self.row as f32)
    }

    /// Euclidean distance from this cell to an arbitrary point in cell space.
    pub fn distance_to(self, point: Vec2) -> f32 {
        self.as_vec2().distance(point)
    }
}

impl std::fmt::Display for GridCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Straight (non-premultiplied) RGBA color with components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color from 8-bit channels.
    pub fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0)
    }

    /// Scale the color channels by `factor`, leaving alpha untouched.
    pub fn shaded(self, factor: f32) -> Self {
        Self {
            r: (self.r * factor).clamp(0.0, 1.0),
            g: (self.g * factor).clamp(0.0, 1.0),
            b: (self.b * factor).clamp(0.0, 1.0),
            a: self.a,
        }
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    pub fn is_transparent(&self) -> bool {
        self.a <= 0.0
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::TRANSPARENT
    }
}

/// Content-addressed reference to an image registered with the asset store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ImageHandle(pub u64);

/// How a surface is painted.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum Fill {
    #[default]
    Transparent,
    Solid(Rgba),
    Image(ImageHandle),
}

impl Fill {
    pub fn is_visible(&self) -> bool {
        match self {
            Self::Transparent => false,
            Self::Solid(c) => !c.is_transparent(),
            Self::Image(_) => true,
        }
    }
}

/// Identity of one scene mount. Every timer carries the id of the mount that
/// scheduled it so fires belonging to a torn-down mount can be discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MountId(pub Uuid);

impl MountId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Fold the id into a 64-bit seed for per-mount randomness.
    pub fn seed(&self) -> u64 {
        let (hi, lo) = self.0.as_u64_pair();
        hi ^ lo.rotate_left(17)
    }
}

impl Default for MountId {
    fn default() -> Self {
        Self::new()
    }
}
