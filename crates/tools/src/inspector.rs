use voxstage_anim::{CameraMode, DissolvePhase, dissolve_order};
use voxstage_common::GridCoord;
use voxstage_compose::{FrameSource, SceneComposer};
use voxstage_scene::{BlockAttributes, LevelScene, TileCode, resolve};

/// Read-only queries against a composer for debugging and the CLI.
pub struct SceneInspector;

impl SceneInspector {
    /// Snapshot of the composer state.
    pub fn summary<S: FrameSource>(composer: &SceneComposer<S>) -> SceneSummary {
        let Some(scene) = composer.scene() else {
            return SceneSummary::default();
        };
        let frame = composer.frame();
        let camera = composer.camera().map(|c| (*c.state(), c.mode()));
        let dissolve = composer.dissolve();
        SceneSummary {
            mounted: true,
            compact: composer.is_compact(),
            animating: composer.is_animating(),
            rows: scene.rows(),
            cols: scene.cols(),
            theme: scene.theme().name,
            blocks: frame.blocks.len(),
            glows: frame.glows.len(),
            particles: frame.particles.len(),
            layers: frame.layer_count(),
            phase: dissolve.map(|d| d.phase()),
            dissolved: dissolve.map_or(0, |d| d.dissolved_count()),
            pending: dissolve.map_or(0, |d| d.pending_count()),
            tilt: camera.map_or(0.0, |(s, _)| s.current_tilt),
            spin: camera.map_or(0.0, |(s, _)| s.current_spin),
            camera_mode: camera.map(|(_, m)| m),
            hovered: composer.hovered(),
            elapsed_ms: composer.elapsed().as_millis() as u64,
            frames: composer.stats().total_frames(),
            fps: composer.stats().fps(),
            finished: composer.is_finished(),
        }
    }

    /// Everything known about one cell of the mounted scene.
    pub fn inspect_cell<S: FrameSource>(
        composer: &SceneComposer<S>,
        coord: GridCoord,
    ) -> Option<CellInfo> {
        let scene = composer.scene()?;
        if coord.row >= scene.rows() || coord.col >= scene.cols() {
            return None;
        }
        let code = scene.tile(coord);
        Some(CellInfo {
            coord,
            code,
            attributes: resolve(code),
            distance: coord.distance_to(scene.center()),
            dissolved: composer.dissolve().is_some_and(|d| d.is_dissolved(coord)),
        })
    }

    /// Dissolve order with each cell's distance from the grid centre.
    pub fn dissolve_plan(scene: &LevelScene) -> Vec<(GridCoord, f32)> {
        let center = scene.center();
        dissolve_order(scene)
            .into_iter()
            .map(|coord| (coord, coord.distance_to(center)))
            .collect()
    }

    /// Resolver output for a range of codes.
    pub fn resolve_table(codes: impl IntoIterator<Item = i32>) -> Vec<(TileCode, BlockAttributes)> {
        codes
            .into_iter()
            .map(|c| (TileCode(c), resolve(TileCode(c))))
            .collect()
    }
}

/// Composer state at a glance.
#[derive(Debug, Clone, Default)]
pub struct SceneSummary {
    pub mounted: bool,
    pub compact: bool,
    pub animating: bool,
    pub rows: usize,
    pub cols: usize,
    pub theme: String,
    pub blocks: usize,
    pub glows: usize,
    pub particles: usize,
    pub layers: usize,
    pub phase: Option<DissolvePhase>,
    pub dissolved: usize,
    pub pending: usize,
    pub tilt: f32,
    pub spin: f32,
    pub camera_mode: Option<CameraMode>,
    pub hovered: Option<GridCoord>,
    pub elapsed_ms: u64,
    pub frames: u64,
    pub fps: f32,
    pub finished: bool,
}

impl std::fmt::Display for SceneSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if !self.mounted {
            return write!(f, "Scene: not mounted");
        }
        writeln!(
            f,
            "Scene: {}x{} theme={} compact={} animating={}",
            self.rows, self.cols, self.theme, self.compact, self.animating
        )?;
        writeln!(
            f,
            "Frame: blocks={} glows={} particles={} layers={}",
            self.blocks, self.glows, self.particles, self.layers
        )?;
        writeln!(
            f,
            "Camera: tilt={:.2} spin={:.2} mode={:?}",
            self.tilt,
            self.spin,
            self.camera_mode.unwrap_or(CameraMode::AutoOrbit)
        )?;
        writeln!(
            f,
            "Dissolve: phase={:?} dissolved={} pending={} finished={}",
            self.phase.unwrap_or(DissolvePhase::Idle),
            self.dissolved,
            self.pending,
            self.finished
        )?;
        match self.hovered {
            Some(coord) => writeln!(f, "Hover: {coord}")?,
            None => writeln!(f, "Hover: none")?,
        }
        write!(
            f,
            "Clock: elapsed={}ms frames={} fps={:.1}",
            self.elapsed_ms, self.frames, self.fps
        )
    }
}

/// Detailed info about one grid cell.
#[derive(Debug, Clone)]
pub struct CellInfo {
    pub coord: GridCoord,
    pub code: TileCode,
    pub attributes: BlockAttributes,
    /// Distance from the grid centre in cells.
    pub distance: f32,
    pub dissolved: bool,
}

impl std::fmt::Display for CellInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Cell {} code={} class={:?} height={:.2} offset={:.2} glow={} dist={:.2}{}",
            self.coord,
            self.code.0,
            self.attributes.color_class,
            self.attributes.height_multiplier,
            self.attributes.vertical_offset,
            self.attributes.glow,
            self.distance,
            if self.dissolved { " dissolved" } else { "" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use voxstage_assets::AssetStore;
    use voxstage_compose::{HeadlessFrameSource, RendererConfig};

    fn composer() -> SceneComposer<HeadlessFrameSource> {
        SceneComposer::new(
            RendererConfig::default(),
            AssetStore::new(),
            HeadlessFrameSource::new(),
        )
    }

    fn scene() -> LevelScene {
        LevelScene::new(vec![vec![1, 2, 1], vec![0, 3, 0], vec![1, 2, 1]], "glacier").unwrap()
    }

    #[test]
    fn summary_unmounted() {
        let summary = SceneInspector::summary(&composer());
        assert!(!summary.mounted);
        assert_eq!(format!("{summary}"), "Scene: not mounted");
    }

    #[test]
    fn summary_mounted() {
        let mut c = composer();
        c.render_scene(&scene(), false, false);
        let summary = SceneInspector::summary(&c);
        assert!(summary.mounted);
        assert_eq!((summary.rows, summary.cols), (3, 3));
        assert_eq!(summary.theme, "glacier");
        assert_eq!(summary.blocks, 7);
        assert_eq!(summary.phase, Some(DissolvePhase::Idle));
        let text = format!("{summary}");
        assert!(text.contains("blocks=7"));
        assert!(text.contains("theme=glacier"));
    }

    #[test]
    fn summary_tracks_dissolve() {
        let mut c = composer();
        c.render_scene(&scene(), true, false);
        c.tick(Duration::from_millis(100));
        let summary = SceneInspector::summary(&c);
        assert_eq!(summary.dissolved, 2);
        assert_eq!(summary.pending, 4);
        assert_eq!(summary.blocks, 5);
        assert_eq!(summary.frames, 1);
        assert_eq!(summary.elapsed_ms, 100);
    }

    #[test]
    fn inspect_cell_bounds() {
        let mut c = composer();
        assert!(SceneInspector::inspect_cell(&c, GridCoord::new(0, 0)).is_none());
        c.render_scene(&scene(), false, false);
        let info = SceneInspector::inspect_cell(&c, GridCoord::new(1, 1)).unwrap();
        assert_eq!(info.code, TileCode::OBSTACLE);
        assert_eq!(info.distance, 0.0);
        assert!(!info.dissolved);
        assert!(format!("{info}").contains("code=3"));
        assert!(SceneInspector::inspect_cell(&c, GridCoord::new(3, 0)).is_none());
    }

    #[test]
    fn dissolve_plan_matches_order() {
        let plan = SceneInspector::dissolve_plan(&scene());
        assert_eq!(plan.len(), 6);
        assert_eq!(plan[0].1, 1.0);
        assert!(plan.windows(2).all(|w| w[0].1 <= w[1].1));
    }

    #[test]
    fn resolve_table_covers_codes() {
        let table = SceneInspector::resolve_table(0..=4);
        assert_eq!(table.len(), 5);
        assert_eq!(table[0].1.height_multiplier, 0.0);
        assert_eq!(table[3].1.height_multiplier, 2.0);
        assert_eq!(table[4].1.height_multiplier, 0.0);
    }
}
