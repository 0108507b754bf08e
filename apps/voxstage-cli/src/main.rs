use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use voxstage_assets::AssetStore;
use voxstage_compose::{HeadlessFrameSource, RecordingObserver, RendererConfig, SceneComposer};
use voxstage_input::PointerEvent;
use voxstage_render::{DebugTextRenderer, Renderer};
use voxstage_scene::LevelScene;
use voxstage_tools::SceneInspector;

#[derive(Parser)]
#[command(name = "voxstage-cli", about = "CLI tool for voxstage scenes")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print crate versions
    Info,
    /// Print the block attributes for each tile code
    Resolve {
        /// Highest code to list
        #[arg(long, default_value = "4")]
        max_code: i32,
    },
    /// Print the dissolve order of a scene
    Order {
        /// Scene JSON file
        #[arg(short, long)]
        scene: PathBuf,
    },
    /// Run the composer headlessly and print a summary
    Simulate {
        /// Scene JSON file
        #[arg(short, long)]
        scene: PathBuf,
        /// Renderer config YAML file
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Directory of images to register
        #[arg(long)]
        assets: Option<PathBuf>,
        /// Number of frames to simulate
        #[arg(short, long, default_value = "120")]
        frames: u64,
        /// Frame delta in milliseconds
        #[arg(long, default_value = "16")]
        dt_ms: u64,
        /// Frame at which the scene is marked complete
        #[arg(long)]
        complete_at: Option<u64>,
        /// Pointer position inside the scene bounds, as X,Y
        #[arg(long, value_parser = parse_point)]
        pointer: Option<(f32, f32)>,
        /// Render as a compact, static preview
        #[arg(long)]
        compact: bool,
        /// Print the final frame
        #[arg(long)]
        dump: bool,
    },
}

fn parse_point(s: &str) -> Result<(f32, f32), String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y, got `{s}`"))?;
    let x = x.trim().parse().map_err(|e| format!("bad X: {e}"))?;
    let y = y.trim().parse().map_err(|e| format!("bad Y: {e}"))?;
    Ok((x, y))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("voxstage-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("scene: {}", voxstage_scene::crate_info());
            println!("render: {}", voxstage_render::crate_info());
            println!("input: {}", voxstage_input::crate_info());
            println!("anim: {}", voxstage_anim::crate_info());
            println!("assets: {}", voxstage_assets::crate_info());
            println!("compose: {}", voxstage_compose::crate_info());
            println!("tools: {}", voxstage_tools::crate_info());
        }
        Commands::Resolve { max_code } => {
            println!("code  class        height  offset  texture   glow");
            for (code, attrs) in SceneInspector::resolve_table(0..=max_code) {
                println!(
                    "{:<5} {:<12} {:<7.2} {:<7.2} {:<9} {}",
                    code.0,
                    format!("{:?}", attrs.color_class),
                    attrs.height_multiplier,
                    attrs.vertical_offset,
                    attrs
                        .texture
                        .map_or_else(|| "-".to_string(), |t| format!("{t:?}")),
                    attrs.glow
                );
            }
        }
        Commands::Order { scene } => {
            let level = LevelScene::load(&scene)
                .with_context(|| format!("loading scene {}", scene.display()))?;
            let plan = SceneInspector::dissolve_plan(&level);
            println!(
                "Dissolve order: {} cells in a {}x{} grid",
                plan.len(),
                level.rows(),
                level.cols()
            );
            for (i, (coord, distance)) in plan.iter().enumerate() {
                println!("  {i:>3}: {coord} dist={distance:.3}");
            }
        }
        Commands::Simulate {
            scene,
            config,
            assets,
            frames,
            dt_ms,
            complete_at,
            pointer,
            compact,
            dump,
        } => {
            let level = LevelScene::load(&scene)
                .with_context(|| format!("loading scene {}", scene.display()))?;
            let config = match config {
                Some(path) => RendererConfig::load(&path)
                    .with_context(|| format!("loading config {}", path.display()))?,
                None => RendererConfig::default(),
            };
            let mut store = AssetStore::new();
            if let Some(dir) = assets {
                let handles = store
                    .import_dir(&dir)
                    .with_context(|| format!("importing assets from {}", dir.display()))?;
                tracing::info!(images = handles.len(), "assets registered");
            }

            let observer = RecordingObserver::new();
            let mut composer = SceneComposer::new(config, store, HeadlessFrameSource::new())
                .with_observer(observer.clone());
            let dt = Duration::from_millis(dt_ms);

            let mut completed = complete_at == Some(0);
            composer.render_scene(&level, completed, compact);
            for frame in 1..=frames {
                if !completed && complete_at == Some(frame) {
                    completed = true;
                    composer.render_scene(&level, completed, compact);
                }
                if let Some((x, y)) = pointer {
                    composer.on_pointer(PointerEvent::Move { x, y });
                }
                composer.tick(dt);
            }

            println!("{}", SceneInspector::summary(&composer));
            let log = observer.log();
            println!("Hooks: hovers={} finished={}", log.hovers.len(), log.finished);
            if dump {
                print!("{}", DebugTextRenderer::new().render(&composer.frame()));
            }
        }
    }

    Ok(())
}
