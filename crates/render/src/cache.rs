use crate::mesh::{CubeMesh, build_cube, cell_origin};
use std::collections::HashMap;
use voxstage_common::GridCoord;
use voxstage_scene::{TileCode, resolve};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct MeshKey {
    coord: GridCoord,
    code: TileCode,
    dims: (usize, usize),
    size_bits: u32,
}

/// Memoizes cube meshes by cell, tile code and tile size for one grid shape.
///
/// Valid because `resolve` is pure: the same key always produces the same
/// geometry. Every culled code shares the `TileCode::EMPTY` entry, cached as
/// `None`. A lookup for a different grid shape evicts everything.
#[derive(Debug, Default)]
pub struct MeshCache {
    meshes: HashMap<MeshKey, Option<CubeMesh>>,
    dims: Option<(usize, usize)>,
    hits: u64,
    misses: u64,
}

impl MeshCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mesh for the cell, building it on first use.
    pub fn get_or_build(
        &mut self,
        coord: GridCoord,
        code: TileCode,
        dims: (usize, usize),
        size: f32,
    ) -> Option<&CubeMesh> {
        if self.dims != Some(dims) {
            if !self.meshes.is_empty() {
                tracing::debug!(
                    ?dims,
                    evicted = self.meshes.len(),
                    "mesh cache: grid shape changed"
                );
            }
            self.meshes.clear();
            self.dims = Some(dims);
        }
        let attrs = resolve(code);
        let key = MeshKey {
            coord,
            code: if attrs.is_rendered() { code } else { TileCode::EMPTY },
            dims,
            size_bits: size.to_bits(),
        };
        if self.meshes.contains_key(&key) {
            self.hits += 1;
        } else {
            self.misses += 1;
            let origin = cell_origin(coord.row, coord.col, dims.0, dims.1, size);
            self.meshes.insert(key, build_cube(origin, size, &attrs));
        }
        self.meshes.get(&key).and_then(Option::as_ref)
    }

    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    pub fn clear(&mut self) {
        self.meshes.clear();
        self.dims = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_lookup_hits() {
        let mut cache = MeshCache::new();
        let c = GridCoord::new(1, 2);
        let first = cache.get_or_build(c, TileCode::PATH, (8, 8), 40.0).cloned();
        let second = cache.get_or_build(c, TileCode::PATH, (8, 8), 40.0).cloned();
        assert_eq!(first, second);
        assert_eq!(cache.hits(), 1);
        assert_eq!(cache.misses(), 1);
    }

    #[test]
    fn cached_mesh_matches_fresh_build() {
        let mut cache = MeshCache::new();
        let c = GridCoord::new(4, 6);
        cache.get_or_build(c, TileCode::OBSTACLE, (8, 8), 32.0);
        let cached = cache
            .get_or_build(c, TileCode::OBSTACLE, (8, 8), 32.0)
            .cloned()
            .unwrap();
        let fresh = build_cube(
            cell_origin(4, 6, 8, 8, 32.0),
            32.0,
            &resolve(TileCode::OBSTACLE),
        )
        .unwrap();
        assert_eq!(cached, fresh);
    }

    #[test]
    fn culled_cells_are_cached_as_none() {
        let mut cache = MeshCache::new();
        let c = GridCoord::new(0, 0);
        assert!(cache.get_or_build(c, TileCode::EMPTY, (8, 8), 40.0).is_none());
        assert!(cache.get_or_build(c, TileCode::EMPTY, (8, 8), 40.0).is_none());
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.hits(), 1);
    }

    #[test]
    fn size_change_is_a_new_key() {
        let mut cache = MeshCache::new();
        let c = GridCoord::new(0, 0);
        cache.get_or_build(c, TileCode::PATH, (8, 8), 40.0);
        cache.get_or_build(c, TileCode::PATH, (8, 8), 20.0);
        assert_eq!(cache.len(), 2);
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn unrendered_codes_share_one_entry() {
        let mut cache = MeshCache::new();
        let c = GridCoord::new(2, 2);
        for code in [0, 4, -1, 99, i32::MAX] {
            assert!(cache.get_or_build(c, TileCode(code), (8, 8), 40.0).is_none());
        }
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.misses(), 1);
        assert_eq!(cache.hits(), 4);
    }

    #[test]
    fn new_grid_shape_evicts() {
        let mut cache = MeshCache::new();
        for row in 0..4 {
            cache.get_or_build(GridCoord::new(row, 0), TileCode::PATH, (4, 4), 40.0);
        }
        assert_eq!(cache.len(), 4);
        cache.get_or_build(GridCoord::new(0, 0), TileCode::PATH, (6, 6), 40.0);
        assert_eq!(cache.len(), 1);
        // back to the first shape rebuilds
        cache.get_or_build(GridCoord::new(0, 0), TileCode::PATH, (4, 4), 40.0);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.misses(), 6);
    }
}
