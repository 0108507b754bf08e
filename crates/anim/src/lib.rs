//! Animation state for a mounted scene: virtual-time timers, the orbital
//! camera, the completion dissolve and ambient particles.
//!
//! # Invariants
//! - Nothing here reads wall-clock time; all motion is driven by explicit `dt`.
//! - Camera angles only change through easing toward targets.
//! - A dissolved cell stays dissolved for the lifetime of its sequencer.
//! - Particle motion is a pure function of elapsed time.

mod camera;
mod clock;
mod dissolve;
mod particles;
mod stats;

pub use camera::{CameraConfig, CameraController, CameraMode, CameraState};
pub use clock::{TimerFired, TimerId, TimerQueue};
pub use dissolve::{
    DissolveConfig, DissolveEvent, DissolvePhase, DissolveSequencer, GlowFrame, dissolve_order,
};
pub use particles::{ColorTag, Particle, ParticleConfig, ParticleField, ParticleSample};
pub use stats::FrameTimer;

pub fn crate_info() -> &'static str {
    "voxstage-anim v0.1.0"
}
