//! Hover picking against projected block tops.
//!
//! View space is orthographic: x to the right, y down the screen, z toward
//! the viewer. The pointer is given relative to the centre of the scene
//! bounds, which is where the grid origin projects.

use glam::{Mat4, Vec2, Vec3};
use voxstage_render::{BlockNode, FaceOrientation};

/// The block whose projected top face contains `point`, nearest the viewer
/// when several overlap.
pub fn pick_block<'a>(
    blocks: impl IntoIterator<Item = &'a BlockNode>,
    root: Mat4,
    point: Vec2,
) -> Option<&'a BlockNode> {
    let mut best: Option<(&BlockNode, f32)> = None;
    for block in blocks {
        let top = block.mesh.face(FaceOrientation::Top);
        let quad = top.corners().map(|c| root.transform_point3(c).truncate());
        if !quad_contains(&quad, point) {
            continue;
        }
        let depth = root.transform_point3(top.center()).z;
        if best.is_none_or(|(_, d)| depth > d) {
            best = Some((block, depth));
        }
    }
    best.map(|(block, _)| block)
}

/// Convex quad test that accepts either winding. Edge-on quads never match.
fn quad_contains(quad: &[Vec2; 4], p: Vec2) -> bool {
    let area = (quad[2] - quad[0]).perp_dot(quad[3] - quad[1]);
    if area.abs() <= f32::EPSILON {
        return false;
    }
    let mut sign = 0.0f32;
    for i in 0..4 {
        let a = quad[i];
        let b = quad[(i + 1) % 4];
        let cross = (b - a).perp_dot(p - a);
        if cross == 0.0 {
            continue;
        }
        if sign == 0.0 {
            sign = cross.signum();
        } else if cross.signum() != sign {
            return false;
        }
    }
    true
}

/// Projected position of a grid-space point, for hosts that need to map
/// back to pointer coordinates.
pub fn project(root: Mat4, point: Vec3) -> Vec2 {
    root.transform_point3(point).truncate()
}
