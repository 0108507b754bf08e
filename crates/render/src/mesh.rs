//! Cuboid mesh construction from flat layers.
//!
//! Every face is a `width x height` layer lying in its own local XY plane,
//! centred on its origin, with the layer normal along local +Z. A face
//! transform carries the layer onto one side of the box. World up is +Z and
//! the grid lies in the XY plane.

use glam::{Mat4, Vec3};
use std::f32::consts::{FRAC_PI_2, PI};
use voxstage_common::Rgba;
use voxstage_scene::{BlockAttributes, TextureSlot};

/// Opacity of the shared noise layer composited over each face.
const NOISE_OPACITY: f32 = 0.35;

/// One of the six sides of a cuboid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaceOrientation {
    Top,
    Bottom,
    Front,
    Back,
    Left,
    Right,
}

impl FaceOrientation {
    pub const ALL: [Self; 6] = [
        Self::Top,
        Self::Bottom,
        Self::Front,
        Self::Back,
        Self::Left,
        Self::Right,
    ];

    /// Static light multiplier: top brightest, bottom darkest.
    pub fn brightness(self) -> f32 {
        match self {
            Self::Top => 1.0,
            Self::Front => 0.8,
            Self::Right => 0.7,
            Self::Back | Self::Left => 0.6,
            Self::Bottom => 0.4,
        }
    }

    /// Outward unit normal in cube space.
    pub fn normal(self) -> Vec3 {
        match self {
            Self::Top => Vec3::Z,
            Self::Bottom => Vec3::NEG_Z,
            Self::Front => Vec3::Y,
            Self::Back => Vec3::NEG_Y,
            Self::Right => Vec3::X,
            Self::Left => Vec3::NEG_X,
        }
    }

    fn base_rotation(self) -> Mat4 {
        match self {
            Self::Top => Mat4::IDENTITY,
            Self::Bottom => Mat4::from_rotation_x(PI),
            Self::Front => Mat4::from_rotation_x(-FRAC_PI_2),
            Self::Back => Mat4::from_rotation_x(FRAC_PI_2),
            Self::Right => Mat4::from_rotation_y(FRAC_PI_2),
            Self::Left => Mat4::from_rotation_y(-FRAC_PI_2),
        }
    }

    /// Face centre relative to the cube's base centre.
    fn offset(self, size: f32, height: f32) -> Vec3 {
        let half = size / 2.0;
        let mid = height / 2.0;
        match self {
            Self::Top => Vec3::new(0.0, 0.0, height),
            Self::Bottom => Vec3::ZERO,
            Self::Front => Vec3::new(0.0, half, mid),
            Self::Back => Vec3::new(0.0, -half, mid),
            Self::Right => Vec3::new(half, 0.0, mid),
            Self::Left => Vec3::new(-half, 0.0, mid),
        }
    }

    /// Layer extents `(width, height)` before rotation. The rotation about X
    /// puts the layer's local Y on the up axis; the rotation about Y does the
    /// same for local X.
    fn extents(self, size: f32, height: f32) -> (f32, f32) {
        match self {
            Self::Top | Self::Bottom => (size, size),
            Self::Front | Self::Back => (size, height),
            Self::Left | Self::Right => (height, size),
        }
    }

    fn gradient(self) -> GradientDirection {
        match self {
            Self::Top | Self::Bottom => GradientDirection::Diagonal,
            _ => GradientDirection::Downward,
        }
    }
}

/// Direction of the linear fade overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradientDirection {
    Downward,
    Diagonal,
}

/// A paint layer stacked over a face's base color, bottom to top.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TextureLayer {
    Noise {
        slot: Option<TextureSlot>,
        opacity: f32,
    },
    Gradient {
        direction: GradientDirection,
        from_alpha: f32,
        to_alpha: f32,
    },
}

/// One positioned, shaded face of a cuboid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceDescriptor {
    pub orientation: FaceOrientation,
    /// Maps layer space onto grid space.
    pub transform: Mat4,
    pub width: f32,
    pub height: f32,
    pub brightness: f32,
    pub layers: [TextureLayer; 2],
}

impl FaceDescriptor {
    /// Base color after applying the face's static lighting.
    pub fn tint(&self, base: Rgba) -> Rgba {
        base.shaded(self.brightness)
    }

    /// Layer corners in grid space, counter-clockwise in layer space.
    pub fn corners(&self) -> [Vec3; 4] {
        let (w, h) = (self.width / 2.0, self.height / 2.0);
        [
            Vec3::new(-w, -h, 0.0),
            Vec3::new(w, -h, 0.0),
            Vec3::new(w, h, 0.0),
            Vec3::new(-w, h, 0.0),
        ]
        .map(|p| self.transform.transform_point3(p))
    }

    pub fn center(&self) -> Vec3 {
        self.transform.transform_point3(Vec3::ZERO)
    }
}

/// Immutable box primitive: base centre, footprint edge and height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cuboid {
    pub position: Vec3,
    pub size: f32,
    pub height: f32,
}

impl Cuboid {
    pub fn new(position: Vec3, size: f32, height: f32) -> Self {
        Self {
            position,
            size,
            height,
        }
    }

    /// Cuboid for a resolved block: height scales with the multiplier and
    /// the base is lifted by the vertical offset.
    pub fn from_attributes(position: Vec3, size: f32, attrs: &BlockAttributes) -> Self {
        Self {
            position: position + Vec3::Z * (size * attrs.vertical_offset),
            size,
            height: size * attrs.height_multiplier,
        }
    }

    pub fn top(&self) -> f32 {
        self.position.z + self.height
    }

    /// The six faces, built from the orientation table.
    pub fn faces(&self, texture: Option<TextureSlot>) -> [FaceDescriptor; 6] {
        let origin = Mat4::from_translation(self.position);
        FaceOrientation::ALL.map(|orientation| {
            let (width, height) = orientation.extents(self.size, self.height);
            let local = Mat4::from_translation(orientation.offset(self.size, self.height))
                * orientation.base_rotation();
            FaceDescriptor {
                orientation,
                transform: origin * local,
                width,
                height,
                brightness: orientation.brightness(),
                layers: [
                    TextureLayer::Noise {
                        slot: texture,
                        opacity: NOISE_OPACITY,
                    },
                    TextureLayer::Gradient {
                        direction: orientation.gradient(),
                        from_alpha: 0.0,
                        to_alpha: 0.3,
                    },
                ],
            }
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrnamentKind {
    Staff,
    Eye,
}

/// Extra layer attached to the character cube.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ornament {
    pub kind: OrnamentKind,
    pub transform: Mat4,
    pub width: f32,
    pub height: f32,
    pub color: Rgba,
}

/// Faces plus any ornaments for one rendered cube.
#[derive(Debug, Clone, PartialEq)]
pub struct CubeMesh {
    pub cuboid: Cuboid,
    pub faces: [FaceDescriptor; 6],
    pub ornaments: Vec<Ornament>,
}

impl CubeMesh {
    pub fn face(&self, orientation: FaceOrientation) -> &FaceDescriptor {
        // `faces` is built in `FaceOrientation::ALL` order, which matches
        // the declaration order.
        &self.faces[orientation as usize]
    }

    pub fn layer_count(&self) -> usize {
        self.faces.len() + self.ornaments.len()
    }
}

/// Build the mesh for a block. Culled (zero-height) blocks yield `None`.
pub fn build_cube(position: Vec3, size: f32, attrs: &BlockAttributes) -> Option<CubeMesh> {
    if !attrs.is_rendered() {
        return None;
    }
    let cuboid = Cuboid::from_attributes(position, size, attrs);
    Some(CubeMesh {
        cuboid,
        faces: cuboid.faces(attrs.texture),
        ornaments: Vec::new(),
    })
}

/// Character cube: a unit-height box with a staff and two eye marks
/// anchored to its top face.
pub fn character_mesh(position: Vec3, size: f32) -> CubeMesh {
    let cuboid = Cuboid::new(position, size, size);
    let top = Mat4::from_translation(position + Vec3::Z * cuboid.height);
    let staff_len = size * 0.9;

    let staff = Ornament {
        kind: OrnamentKind::Staff,
        transform: top
            * Mat4::from_translation(Vec3::new(size * 0.42, size * 0.1, staff_len / 2.0))
            * Mat4::from_rotation_x(-FRAC_PI_2),
        width: size * 0.08,
        height: staff_len,
        color: Rgba::rgb8(0x8d, 0x6e, 0x63),
    };
    let eye = |dx: f32| Ornament {
        kind: OrnamentKind::Eye,
        // Lifted slightly off the top face so it never coincides with it.
        transform: top * Mat4::from_translation(Vec3::new(dx, size * 0.22, size * 0.01)),
        width: size * 0.12,
        height: size * 0.12,
        color: Rgba::rgb8(0x21, 0x21, 0x21),
    };

    CubeMesh {
        cuboid,
        faces: cuboid.faces(None),
        ornaments: vec![staff, eye(-size * 0.18), eye(size * 0.18)],
    }
}

/// Base centre of the cell at `(row, col)` in a `rows x cols` grid laid out
/// around the origin.
pub fn cell_origin(row: usize, col: usize, rows: usize, cols: usize, size: f32) -> Vec3 {
    Vec3::new(
        (col as f32 - (cols as f32 - 1.0) / 2.0) * size,
        (row as f32 - (rows as f32 - 1.0) / 2.0) * size,
        0.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxstage_scene::{TileCode, resolve};

    const EPS: f32 = 1e-4;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < EPS
    }

    #[test]
    fn culled_codes_build_nothing() {
        for v in [0, 4, -1] {
            assert!(build_cube(Vec3::ZERO, 40.0, &resolve(TileCode(v))).is_none());
        }
    }

    #[test]
    fn side_face_length_tracks_height_multiplier() {
        let size = 40.0;
        for code in [TileCode::PATH, TileCode::ACCENT, TileCode::OBSTACLE] {
            let attrs = resolve(code);
            let mesh = build_cube(Vec3::ZERO, size, &attrs).unwrap();
            let expected = size * attrs.height_multiplier;
            assert_eq!(mesh.face(FaceOrientation::Front).height, expected);
            assert_eq!(mesh.face(FaceOrientation::Back).height, expected);
            assert_eq!(mesh.face(FaceOrientation::Left).width, expected);
            assert_eq!(mesh.face(FaceOrientation::Right).width, expected);
            // top and bottom stay unit-sized
            assert_eq!(mesh.face(FaceOrientation::Top).width, size);
            assert_eq!(mesh.face(FaceOrientation::Bottom).height, size);
        }
    }

    #[test]
    fn rebuild_is_idempotent() {
        let attrs = resolve(TileCode::OBSTACLE);
        let pos = cell_origin(2, 5, 8, 8, 37.5);
        let first = build_cube(pos, 37.5, &attrs).unwrap();
        for _ in 0..100 {
            assert_eq!(build_cube(pos, 37.5, &attrs).unwrap(), first);
        }
    }

    #[test]
    fn faces_point_outward() {
        let cuboid = Cuboid::new(Vec3::new(10.0, -5.0, 0.0), 20.0, 40.0);
        for face in cuboid.faces(None) {
            let n = face.transform.transform_vector3(Vec3::Z);
            assert!(n.abs_diff_eq(face.orientation.normal(), EPS), "{:?}", face.orientation);
        }
    }

    #[test]
    fn faces_lie_on_box_bounds() {
        let cuboid = Cuboid::new(Vec3::new(3.0, 4.0, 2.0), 10.0, 25.0);
        let (min, max) = (
            Vec3::new(-2.0, -1.0, 2.0),
            Vec3::new(8.0, 9.0, 27.0),
        );
        for face in cuboid.faces(None) {
            for c in face.corners() {
                assert!(c.cmpge(min - EPS).all() && c.cmple(max + EPS).all());
            }
            let corners = face.corners();
            let zs = corners.map(|c| c.z);
            let z_lo = zs.iter().copied().fold(f32::INFINITY, f32::min);
            let z_hi = zs.iter().copied().fold(f32::NEG_INFINITY, f32::max);
            match face.orientation {
                FaceOrientation::Top => assert!(approx(z_lo, 27.0) && approx(z_hi, 27.0)),
                FaceOrientation::Bottom => assert!(approx(z_lo, 2.0) && approx(z_hi, 2.0)),
                _ => assert!(approx(z_lo, 2.0) && approx(z_hi, 27.0)),
            }
        }
    }

    #[test]
    fn vertical_offset_lifts_base() {
        let attrs = resolve(TileCode::ACCENT);
        let mesh = build_cube(Vec3::ZERO, 40.0, &attrs).unwrap();
        assert_eq!(mesh.cuboid.position.z, 10.0);
        assert_eq!(mesh.cuboid.top(), 50.0);
    }

    #[test]
    fn lighting_ratios() {
        let top = FaceOrientation::Top.brightness();
        let bottom = FaceOrientation::Bottom.brightness();
        for o in FaceOrientation::ALL {
            assert!(o.brightness() <= top && o.brightness() >= bottom);
        }
        assert!(top > bottom);
    }

    #[test]
    fn faces_carry_noise_then_gradient() {
        let mesh = build_cube(Vec3::ZERO, 10.0, &resolve(TileCode::PATH)).unwrap();
        for face in &mesh.faces {
            assert!(matches!(
                face.layers[0],
                TextureLayer::Noise {
                    slot: Some(TextureSlot::Ground),
                    ..
                }
            ));
            assert!(matches!(face.layers[1], TextureLayer::Gradient { .. }));
        }
    }

    #[test]
    fn tint_applies_brightness() {
        let mesh = build_cube(Vec3::ZERO, 10.0, &resolve(TileCode::PATH)).unwrap();
        let bottom = mesh.face(FaceOrientation::Bottom);
        assert_eq!(bottom.tint(Rgba::WHITE), Rgba::new(0.4, 0.4, 0.4, 1.0));
    }

    #[test]
    fn character_ornaments_sit_on_top_plane() {
        let mesh = character_mesh(Vec3::new(0.0, 0.0, 5.0), 20.0);
        assert_eq!(mesh.ornaments.len(), 3);
        assert_eq!(
            mesh.ornaments
                .iter()
                .filter(|o| o.kind == OrnamentKind::Eye)
                .count(),
            2
        );
        let top = mesh.cuboid.top();
        for o in &mesh.ornaments {
            match o.kind {
                OrnamentKind::Eye => {
                    let c = o.transform.transform_point3(Vec3::ZERO);
                    assert!(c.z > top && c.z - top < 1.0);
                }
                OrnamentKind::Staff => {
                    let a = o.transform.transform_point3(Vec3::new(0.0, -o.height / 2.0, 0.0));
                    let b = o.transform.transform_point3(Vec3::new(0.0, o.height / 2.0, 0.0));
                    assert!(approx(a.z.min(b.z), top));
                    assert!(approx(a.z.max(b.z), top + o.height));
                }
            }
        }
    }

    #[test]
    fn cell_origins_are_centred() {
        let a = cell_origin(0, 0, 8, 8, 10.0);
        let b = cell_origin(7, 7, 8, 8, 10.0);
        assert_eq!(a, Vec3::new(-35.0, -35.0, 0.0));
        assert_eq!(a + b, Vec3::ZERO);
    }
}
