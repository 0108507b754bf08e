use serde::{Deserialize, Serialize};

/// Integer category of a grid cell.
///
/// Any value is accepted; codes outside the known set resolve to the
/// "not rendered" attributes instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileCode(pub i32);

impl TileCode {
    pub const EMPTY: Self = Self(0);
    pub const PATH: Self = Self(1);
    pub const ACCENT: Self = Self(2);
    pub const OBSTACLE: Self = Self(3);

    /// Whether this tile takes part in the completion dissolve.
    pub fn is_dissolvable(self) -> bool {
        matches!(self, Self::PATH | Self::ACCENT)
    }
}

impl From<i32> for TileCode {
    fn from(v: i32) -> Self {
        Self(v)
    }
}

/// Palette slot a block is painted with. The theme maps it to a color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColorClass {
    Path,
    Accent,
    Obstacle,
    Transparent,
}

/// Noise texture slot. The theme maps it to an image name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextureSlot {
    Ground,
    Crystal,
    Stone,
}

/// Rendering attributes derived from a tile code.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlockAttributes {
    pub color_class: ColorClass,
    /// Cube height as a multiple of the tile size. Zero culls the cell.
    pub height_multiplier: f32,
    /// Lift of the cube base as a multiple of the tile size.
    pub vertical_offset: f32,
    pub texture: Option<TextureSlot>,
    pub glow: bool,
}

impl BlockAttributes {
    pub const HIDDEN: Self = Self {
        color_class: ColorClass::Transparent,
        height_multiplier: 0.0,
        vertical_offset: 0.0,
        texture: None,
        glow: false,
    };

    pub fn is_rendered(&self) -> bool {
        self.height_multiplier > 0.0
    }
}

/// Map a tile code to its rendering attributes.
///
/// Pure and total: the mesh cache relies on identical codes producing
/// identical attributes.
pub fn resolve(code: TileCode) -> BlockAttributes {
    match code {
        TileCode::PATH => BlockAttributes {
            color_class: ColorClass::Path,
            height_multiplier: 1.0,
            vertical_offset: 0.0,
            texture: Some(TextureSlot::Ground),
            glow: false,
        },
        TileCode::ACCENT => BlockAttributes {
            color_class: ColorClass::Accent,
            height_multiplier: 1.0,
            vertical_offset: 0.25,
            texture: Some(TextureSlot::Crystal),
            glow: true,
        },
        TileCode::OBSTACLE => BlockAttributes {
            color_class: ColorClass::Obstacle,
            height_multiplier: 2.0,
            vertical_offset: 0.0,
            texture: Some(TextureSlot::Stone),
            glow: false,
        },
        _ => BlockAttributes::HIDDEN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_codes_are_not_rendered() {
        for v in [-5, -1, 0, 4, 7, 99, i32::MAX, i32::MIN] {
            let attrs = resolve(TileCode(v));
            assert_eq!(attrs.height_multiplier, 0.0, "code {v}");
            assert_eq!(attrs.color_class, ColorClass::Transparent);
            assert!(!attrs.is_rendered());
        }
    }

    #[test]
    fn known_codes_render() {
        for code in [TileCode::PATH, TileCode::ACCENT, TileCode::OBSTACLE] {
            assert!(resolve(code).is_rendered());
        }
    }

    #[test]
    fn obstacle_is_a_tall_pillar() {
        let attrs = resolve(TileCode::OBSTACLE);
        assert!(attrs.height_multiplier > resolve(TileCode::PATH).height_multiplier);
        assert!(!attrs.glow);
    }

    #[test]
    fn accent_is_elevated_and_glowing() {
        let attrs = resolve(TileCode::ACCENT);
        assert!(attrs.vertical_offset > 0.0);
        assert!(attrs.glow);
    }

    #[test]
    fn resolve_is_deterministic() {
        for v in -2..6 {
            assert_eq!(resolve(TileCode(v)), resolve(TileCode(v)));
        }
    }

    #[test]
    fn dissolvable_set() {
        assert!(TileCode::PATH.is_dissolvable());
        assert!(TileCode::ACCENT.is_dissolvable());
        assert!(!TileCode::OBSTACLE.is_dissolvable());
        assert!(!TileCode::EMPTY.is_dissolvable());
        assert!(!TileCode(42).is_dissolvable());
    }
}
