//! Scene composition: mounts a `LevelScene`, drives its camera, dissolve and
//! particles from host events, and emits one `SceneFrame` per frame.
//!
//! # Invariants
//! - At most one scene is mounted; mounting a new one first unmounts the old.
//! - After `unmount` no timer fire, hook or frame-loop callback is observed
//!   for the old mount.
//! - Compact mounts never acquire a frame loop and ignore pointer input;
//!   their dissolve still runs on `tick`.
//! - Timer fires whose `MountId` differs from the live mount are dropped.

mod composer;
mod config;
mod frame_loop;
mod observer;
pub mod picking;

pub use composer::SceneComposer;
pub use config::{ConfigError, RendererConfig};
pub use frame_loop::{FrameLoopError, FrameSource, HeadlessFrameSource, LoopHandle, NoSurface};
pub use observer::{HookError, HoverCue, ObserverLog, RecordingObserver, SceneObserver};

pub fn crate_info() -> &'static str {
    "voxstage-compose v0.1.0"
}
