use crate::config::RendererConfig;
use crate::frame_loop::{FrameSource, LoopHandle};
use crate::observer::{HoverCue, SceneObserver};
use crate::picking::pick_block;
use glam::Vec3;
use std::time::Duration;
use voxstage_anim::{
    CameraController, ColorTag, DissolvePhase, DissolveSequencer, FrameTimer, ParticleField,
    TimerQueue,
};
use voxstage_assets::AssetStore;
use voxstage_common::{Fill, GridCoord, MountId, Rgba};
use voxstage_input::PointerEvent;
use voxstage_render::{
    BlockNode, CharacterNode, GlowNode, MeshCache, ParticleNode, SceneFrame, character_mesh,
};
use voxstage_scene::{LevelScene, Theme, resolve};

/// Character cube edge relative to the tile size.
const CHARACTER_SCALE: f32 = 0.6;

/// Derived state for one mounted scene. Dropped wholesale on unmount.
struct Mount {
    id: MountId,
    scene: LevelScene,
    compact: bool,
    completed: bool,
    tile_size: f32,
    theme: Theme,
    blocks: Vec<BlockNode>,
    character: CharacterNode,
    background: Fill,
    camera: CameraController,
    dissolve: DissolveSequencer,
    particles: ParticleField,
    frame_loop: Option<LoopHandle>,
    hovered: Option<GridCoord>,
    finished_notified: bool,
}

/// Top-level assembly: owns the mounted scene, its animation state and the
/// shared timer queue, and composes one `SceneFrame` per call to `frame`.
///
/// All state is owned here; hosts drive it with `render_scene`,
/// `on_pointer` and `tick`.
pub struct SceneComposer<S: FrameSource> {
    config: RendererConfig,
    assets: AssetStore,
    frame_source: S,
    timers: TimerQueue,
    meshes: MeshCache,
    observer: Option<Box<dyn SceneObserver>>,
    mount: Option<Mount>,
    stats: FrameTimer,
}

impl<S: FrameSource> SceneComposer<S> {
    pub fn new(config: RendererConfig, assets: AssetStore, frame_source: S) -> Self {
        Self {
            config,
            assets,
            frame_source,
            timers: TimerQueue::new(),
            meshes: MeshCache::new(),
            observer: None,
            mount: None,
            stats: FrameTimer::default(),
        }
    }

    pub fn with_observer(mut self, observer: impl SceneObserver + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn set_observer(&mut self, observer: Option<Box<dyn SceneObserver>>) {
        self.observer = observer;
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    pub fn frame_source(&self) -> &S {
        &self.frame_source
    }

    pub fn timers(&self) -> &TimerQueue {
        &self.timers
    }

    pub fn mesh_cache(&self) -> &MeshCache {
        &self.meshes
    }

    pub fn stats(&self) -> &FrameTimer {
        &self.stats
    }

    pub fn is_mounted(&self) -> bool {
        self.mount.is_some()
    }

    pub fn mount_id(&self) -> Option<MountId> {
        self.mount.as_ref().map(|m| m.id)
    }

    pub fn scene(&self) -> Option<&LevelScene> {
        self.mount.as_ref().map(|m| &m.scene)
    }

    pub fn is_compact(&self) -> bool {
        self.mount.as_ref().is_some_and(|m| m.compact)
    }

    /// Whether the mount holds a running frame loop.
    pub fn is_animating(&self) -> bool {
        self.mount.as_ref().is_some_and(|m| m.frame_loop.is_some())
    }

    pub fn camera(&self) -> Option<&CameraController> {
        self.mount.as_ref().map(|m| &m.camera)
    }

    pub fn dissolve(&self) -> Option<&DissolveSequencer> {
        self.mount.as_ref().map(|m| &m.dissolve)
    }

    pub fn particles(&self) -> Option<&ParticleField> {
        self.mount.as_ref().map(|m| &m.particles)
    }

    /// Currently hovered block.
    pub fn hovered(&self) -> Option<GridCoord> {
        self.mount.as_ref().and_then(|m| m.hovered)
    }

    /// Time since the current mount started.
    pub fn elapsed(&self) -> Duration {
        self.timers.now()
    }

    pub fn is_finished(&self) -> bool {
        self.mount
            .as_ref()
            .is_some_and(|m| m.dissolve.phase() == DissolvePhase::Done)
    }

    /// Present `scene`. A different scene or presentation mode remounts; a
    /// rising edge of `completed` starts the dissolve.
    pub fn render_scene(&mut self, scene: &LevelScene, completed: bool, compact: bool) -> SceneFrame {
        let remount = self
            .mount
            .as_ref()
            .is_none_or(|m| m.scene != *scene || m.compact != compact);
        if remount {
            self.unmount();
            self.mount_scene(scene, compact);
        }

        if let Some(mount) = self.mount.as_mut() {
            let rising = completed && !mount.completed;
            mount.completed = completed;
            if rising {
                mount.dissolve.trigger(&mount.scene, &mut self.timers);
            }
        }
        self.notify_if_finished();
        self.frame()
    }

    fn mount_scene(&mut self, scene: &LevelScene, compact: bool) {
        let id = MountId::new();
        let _span = tracing::info_span!(
            "mount",
            rows = scene.rows(),
            cols = scene.cols(),
            compact
        )
        .entered();

        self.timers = TimerQueue::new();
        let theme = scene.theme();
        let tile_size = self.config.tile_size_for(compact);
        let dims = (scene.rows(), scene.cols());

        let mut blocks = Vec::new();
        for (coord, code) in scene.cells() {
            let Some(mesh) = self.meshes.get_or_build(coord, code, dims, tile_size) else {
                continue;
            };
            let attrs = resolve(code);
            blocks.push(BlockNode {
                coord,
                code,
                mesh: mesh.clone(),
                color: theme.color(attrs.color_class),
                texture: self
                    .assets
                    .fill_for(attrs.texture.map(|slot| theme.texture(slot))),
                glow: attrs.glow,
            });
        }

        let images = scene.images();
        let character_size = tile_size * CHARACTER_SCALE;
        let character = CharacterNode {
            mesh: character_mesh(Vec3::Z * tile_size, character_size),
            fill: self.assets.fill_for(images.character.as_deref()),
        };
        let background = match images.background.as_deref() {
            Some(name) => self.assets.fill_for(Some(name)),
            None => Fill::Solid(theme.backdrop),
        };

        let (camera, particles, frame_loop) = if compact {
            (
                CameraController::fixed(self.config.camera),
                ParticleField::empty(),
                None,
            )
        } else {
            let frame_loop = match self.frame_source.acquire() {
                Ok(handle) => Some(handle),
                Err(err) => {
                    tracing::warn!(%err, "frame loop unavailable, scene stays static");
                    None
                }
            };
            (
                CameraController::new(self.config.camera),
                ParticleField::generate(id.seed(), &self.config.particles),
                frame_loop,
            )
        };

        tracing::debug!(
            blocks = blocks.len(),
            particles = particles.len(),
            theme = %theme.name,
            "scene mounted"
        );
        self.mount = Some(Mount {
            id,
            scene: scene.clone(),
            compact,
            completed: false,
            tile_size,
            theme,
            blocks,
            character,
            background,
            camera,
            dissolve: DissolveSequencer::new(self.config.dissolve, id),
            particles,
            frame_loop,
            hovered: None,
            finished_notified: false,
        });
    }

    /// Tear down the current mount: cancel timers, release the frame loop
    /// and drop derived state. No hook fires for it afterwards.
    pub fn unmount(&mut self) {
        let Some(mut mount) = self.mount.take() else {
            return;
        };
        let _span = tracing::info_span!("unmount").entered();
        mount.dissolve.cancel(&mut self.timers);
        mount.camera.dispose();
        let cancelled = self.timers.cancel_owner(mount.id);
        if let Some(handle) = mount.frame_loop.take() {
            self.frame_source.release(handle);
        }
        tracing::debug!(
            cancelled,
            dissolved = mount.dissolve.dissolved_count(),
            "scene unmounted"
        );
    }

    /// Route a pointer event. Ignored in compact mode and when nothing is
    /// mounted; moves outside the bounds count as a leave.
    pub fn on_pointer(&mut self, event: PointerEvent) {
        let bounds = self.config.bounds;
        let Some(mount) = self.mount.as_mut() else {
            return;
        };
        if mount.compact {
            return;
        }

        match event {
            PointerEvent::Move { x, y } if bounds.contains(x, y) => {
                mount.camera.on_pointer_move(bounds.offset(x, y));
                let root = mount.camera.transform();
                let dissolve = &mount.dissolve;
                let picked = pick_block(
                    mount.blocks.iter().filter(|b| !dissolve.is_dissolved(b.coord)),
                    root,
                    bounds.centered(x, y),
                )
                .map(|b| HoverCue {
                    coord: b.coord,
                    code: b.code,
                });

                let coord = picked.map(|cue| cue.coord);
                if coord != mount.hovered {
                    mount.hovered = coord;
                    if let Some(cue) = picked {
                        tracing::trace!(coord = %cue.coord, "hover");
                        if let Some(observer) = self.observer.as_mut() {
                            if let Err(err) = observer.on_hover(cue) {
                                tracing::warn!(%err, "hover hook failed");
                            }
                        }
                    }
                }
            }
            PointerEvent::Move { .. } | PointerEvent::Leave => {
                mount.camera.on_pointer_leave();
                mount.hovered = None;
            }
        }
    }

    /// Advance one frame. A compact mount only advances its dissolve timer;
    /// an interactive mount without a frame loop does nothing.
    pub fn tick(&mut self, dt: Duration) {
        let Some(mount) = self.mount.as_mut() else {
            return;
        };
        if mount.frame_loop.is_none() && !mount.compact {
            return;
        }
        let _span = tracing::info_span!("tick", dt_us = dt.as_micros() as u64).entered();
        self.stats.record(dt);

        for fired in self.timers.advance(dt) {
            if fired.owner != mount.id {
                tracing::trace!(id = ?fired.id, "stale timer fire dropped");
                continue;
            }
            mount.dissolve.on_timer(&fired, &mut self.timers);
        }
        mount.camera.tick(dt);
        self.notify_if_finished();
    }

    fn notify_if_finished(&mut self) {
        let Some(mount) = self.mount.as_mut() else {
            return;
        };
        if mount.finished_notified || mount.dissolve.phase() != DissolvePhase::Done {
            return;
        }
        mount.finished_notified = true;
        tracing::debug!(dissolved = mount.dissolve.dissolved_count(), "scene finished");
        if let Some(observer) = self.observer.as_mut() {
            if let Err(err) = observer.on_finished() {
                tracing::warn!(%err, "finished hook failed");
            }
        }
    }

    /// Compose the visual tree for the current state.
    pub fn frame(&self) -> SceneFrame {
        let Some(mount) = self.mount.as_ref() else {
            return SceneFrame::empty();
        };
        let now = self.timers.now();

        let blocks = mount
            .blocks
            .iter()
            .filter(|b| !mount.dissolve.is_dissolved(b.coord))
            .cloned()
            .collect();

        let glows = mount
            .dissolve
            .active_glows(now)
            .filter_map(|(coord, glow)| {
                let block = mount.blocks.iter().find(|b| b.coord == coord)?;
                Some(GlowNode {
                    coord,
                    origin: block.mesh.cuboid.position,
                    size: mount.tile_size,
                    color: block.color,
                    opacity: glow.opacity,
                    scale: glow.scale,
                    rise: glow.rise * mount.tile_size,
                })
            })
            .collect();

        let bounds = self.config.bounds;
        let particles = mount
            .particles
            .sample(now)
            .into_iter()
            .map(|p| ParticleNode {
                x: p.relative_x * bounds.width,
                y: p.relative_y * bounds.height,
                depth: p.depth,
                size: p.size,
                opacity: p.opacity,
                color: particle_color(p.color_tag, &mount.theme),
            })
            .collect();

        SceneFrame {
            root_transform: mount.camera.transform(),
            compact: mount.compact,
            background: mount.background,
            blocks,
            glows,
            character: Some(mount.character.clone()),
            particles,
            finished: mount.dissolve.phase() == DissolvePhase::Done,
        }
    }
}

impl<S: FrameSource> Drop for SceneComposer<S> {
    fn drop(&mut self) {
        self.unmount();
    }
}

fn particle_color(tag: ColorTag, theme: &Theme) -> Rgba {
    match tag {
        ColorTag::Warm => Rgba::rgb8(0xff, 0xd1, 0x80),
        ColorTag::Cool => Rgba::rgb8(0x80, 0xd8, 0xff),
        ColorTag::Accent => theme.accent,
    }
}
