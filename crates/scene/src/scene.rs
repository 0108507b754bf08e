use crate::theme::Theme;
use crate::tile::TileCode;
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::path::Path;
use voxstage_common::GridCoord;

/// Errors from building or loading a scene description.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("scene grid has no cells")]
    EmptyGrid,
    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedGrid {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Optional image names for the character and the backdrop.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneImages {
    #[serde(default)]
    pub character: Option<String>,
    #[serde(default)]
    pub background: Option<String>,
}

#[derive(Deserialize)]
struct RawScene {
    grid: Vec<Vec<i32>>,
    #[serde(default = "default_theme")]
    theme: String,
    #[serde(default)]
    images: SceneImages,
}

fn default_theme() -> String {
    Theme::DEFAULT_NAME.to_string()
}

/// Static description of one level: a rectangular tile grid plus theme.
///
/// Immutable once built; the grid is guaranteed rectangular and non-empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawScene")]
pub struct LevelScene {
    grid: Vec<Vec<TileCode>>,
    theme: String,
    images: SceneImages,
}

impl TryFrom<RawScene> for LevelScene {
    type Error = SceneError;

    fn try_from(raw: RawScene) -> Result<Self, Self::Error> {
        Self::new(raw.grid, raw.theme).map(|s| s.with_images(raw.images))
    }
}

impl LevelScene {
    /// Build a scene from raw tile codes, validating the grid shape.
    pub fn new(grid: Vec<Vec<i32>>, theme: impl Into<String>) -> Result<Self, SceneError> {
        let cols = grid.first().map(Vec::len).unwrap_or(0);
        if cols == 0 {
            return Err(SceneError::EmptyGrid);
        }
        for (row, cells) in grid.iter().enumerate() {
            if cells.len() != cols {
                return Err(SceneError::RaggedGrid {
                    row,
                    expected: cols,
                    found: cells.len(),
                });
            }
        }
        let grid = grid
            .into_iter()
            .map(|r| r.into_iter().map(TileCode).collect())
            .collect();
        Ok(Self {
            grid,
            theme: theme.into(),
            images: SceneImages::default(),
        })
    }

    pub fn with_images(mut self, images: SceneImages) -> Self {
        self.images = images;
        self
    }

    pub fn from_json(json: &str) -> Result<Self, SceneError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a scene description from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let file = std::fs::File::open(path)?;
        Ok(serde_json::from_reader(std::io::BufReader::new(file))?)
    }

    pub fn rows(&self) -> usize {
        self.grid.len()
    }

    pub fn cols(&self) -> usize {
        self.grid[0].len()
    }

    /// Tile at `coord`; out-of-range coordinates read as empty.
    pub fn tile(&self, coord: GridCoord) -> TileCode {
        self.grid
            .get(coord.row)
            .and_then(|r| r.get(coord.col))
            .copied()
            .unwrap_or(TileCode::EMPTY)
    }

    /// All cells in row-major scan order.
    pub fn cells(&self) -> impl Iterator<Item = (GridCoord, TileCode)> + '_ {
        self.grid.iter().enumerate().flat_map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .map(move |(col, &code)| (GridCoord::new(row, col), code))
        })
    }

    /// Geometric centre in cell space (x = column, y = row).
    pub fn center(&self) -> Vec2 {
        Vec2::new(
            (self.cols() as f32 - 1.0) / 2.0,
            (self.rows() as f32 - 1.0) / 2.0,
        )
    }

    pub fn theme_name(&self) -> &str {
        &self.theme
    }

    pub fn theme(&self) -> Theme {
        Theme::builtin(&self.theme)
    }

    pub fn images(&self) -> &SceneImages {
        &self.images
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn grid_8x8() -> Vec<Vec<i32>> {
        vec![vec![0; 8]; 8]
    }

    #[test]
    fn rejects_empty_grid() {
        assert!(matches!(
            LevelScene::new(vec![], "meadow"),
            Err(SceneError::EmptyGrid)
        ));
        assert!(matches!(
            LevelScene::new(vec![vec![]], "meadow"),
            Err(SceneError::EmptyGrid)
        ));
    }

    #[test]
    fn rejects_ragged_grid() {
        let err = LevelScene::new(vec![vec![1, 1], vec![1]], "meadow").unwrap_err();
        assert!(matches!(
            err,
            SceneError::RaggedGrid {
                row: 1,
                expected: 2,
                found: 1
            }
        ));
    }

    #[test]
    fn unknown_codes_are_kept() {
        let scene = LevelScene::new(vec![vec![9, -1]], "meadow").unwrap();
        assert_eq!(scene.tile(GridCoord::new(0, 0)), TileCode(9));
    }

    #[test]
    fn dimensions_and_center() {
        let scene = LevelScene::new(grid_8x8(), "meadow").unwrap();
        assert_eq!(scene.rows(), 8);
        assert_eq!(scene.cols(), 8);
        assert_eq!(scene.center(), Vec2::new(3.5, 3.5));
    }

    #[test]
    fn cells_in_scan_order() {
        let scene = LevelScene::new(vec![vec![1, 2], vec![3, 0]], "meadow").unwrap();
        let cells: Vec<_> = scene.cells().collect();
        assert_eq!(
            cells,
            vec![
                (GridCoord::new(0, 0), TileCode(1)),
                (GridCoord::new(0, 1), TileCode(2)),
                (GridCoord::new(1, 0), TileCode(3)),
                (GridCoord::new(1, 1), TileCode(0)),
            ]
        );
    }

    #[test]
    fn out_of_range_reads_empty() {
        let scene = LevelScene::new(vec![vec![1]], "meadow").unwrap();
        assert_eq!(scene.tile(GridCoord::new(4, 4)), TileCode::EMPTY);
    }

    #[test]
    fn parses_json_with_defaults() {
        let scene = LevelScene::from_json(r#"{"grid": [[1, 0], [0, 2]]}"#).unwrap();
        assert_eq!(scene.theme_name(), "meadow");
        assert!(scene.images().character.is_none());
    }

    #[test]
    fn json_validation_runs() {
        assert!(LevelScene::from_json(r#"{"grid": [[1, 0], [0]]}"#).is_err());
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"grid": [[0, 1, 0]], "theme": "ember", "images": {{"character": "hero.png"}}}}"#
        )
        .unwrap();
        let scene = LevelScene::load(file.path()).unwrap();
        assert_eq!(scene.cols(), 3);
        assert_eq!(scene.theme().name, "ember");
        assert_eq!(scene.images().character.as_deref(), Some("hero.png"));
    }
}
