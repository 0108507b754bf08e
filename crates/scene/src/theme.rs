use crate::tile::{ColorClass, TextureSlot};
use serde::{Deserialize, Serialize};
use voxstage_common::Rgba;

/// Colors and texture names used to paint one scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub path: Rgba,
    pub accent: Rgba,
    pub obstacle: Rgba,
    pub ground_texture: String,
    pub crystal_texture: String,
    pub stone_texture: String,
    /// Backdrop color used when the scene has no background image.
    pub backdrop: Rgba,
}

impl Theme {
    pub const DEFAULT_NAME: &'static str = "meadow";

    /// Look up a built-in theme; unknown names fall back to the default.
    pub fn builtin(name: &str) -> Self {
        match name {
            "ember" => Self {
                name: "ember".into(),
                path: Rgba::rgb8(0x8a, 0x5a, 0x44),
                accent: Rgba::rgb8(0xff, 0xb3, 0x47),
                obstacle: Rgba::rgb8(0x4a, 0x2c, 0x2a),
                ground_texture: "noise/ash".into(),
                crystal_texture: "noise/spark".into(),
                stone_texture: "noise/basalt".into(),
                backdrop: Rgba::rgb8(0x1c, 0x0f, 0x0d),
            },
            "glacier" => Self {
                name: "glacier".into(),
                path: Rgba::rgb8(0xc8, 0xdd, 0xe8),
                accent: Rgba::rgb8(0x6f, 0xe3, 0xff),
                obstacle: Rgba::rgb8(0x5b, 0x73, 0x8a),
                ground_texture: "noise/snow".into(),
                crystal_texture: "noise/frost".into(),
                stone_texture: "noise/slate".into(),
                backdrop: Rgba::rgb8(0x0d, 0x16, 0x24),
            },
            Self::DEFAULT_NAME => Self::default(),
            other => {
                tracing::debug!(theme = other, "unknown theme, using default");
                Self::default()
            }
        }
    }

    pub fn color(&self, class: ColorClass) -> Rgba {
        match class {
            ColorClass::Path => self.path,
            ColorClass::Accent => self.accent,
            ColorClass::Obstacle => self.obstacle,
            ColorClass::Transparent => Rgba::TRANSPARENT,
        }
    }

    pub fn texture(&self, slot: TextureSlot) -> &str {
        match slot {
            TextureSlot::Ground => &self.ground_texture,
            TextureSlot::Crystal => &self.crystal_texture,
            TextureSlot::Stone => &self.stone_texture,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            name: Self::DEFAULT_NAME.into(),
            path: Rgba::rgb8(0x7c, 0xb3, 0x42),
            accent: Rgba::rgb8(0xff, 0xd5, 0x4f),
            obstacle: Rgba::rgb8(0x5d, 0x40, 0x37),
            ground_texture: "noise/grass".into(),
            crystal_texture: "noise/crystal".into(),
            stone_texture: "noise/stone".into(),
            backdrop: Rgba::rgb8(0x10, 0x1a, 0x12),
        }
    }
}
