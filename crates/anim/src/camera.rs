use glam::Mat4;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use voxstage_input::PointerOffset;

/// Camera tuning. Angles are in degrees, speeds in degrees per second.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub default_tilt: f32,
    pub min_tilt: f32,
    pub max_tilt: f32,
    /// Tilt change at the top/bottom edge of the bounds.
    pub tilt_swing: f32,
    /// Spin added at the left/right edge of the bounds.
    pub spin_swing: f32,
    /// Fraction of the remaining distance covered per 60 Hz frame.
    pub easing: f32,
    pub auto_rotate_speed: f32,
    pub initial_spin: f32,
    /// Spin used by the static camera in compact mode.
    pub compact_spin: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            default_tilt: 60.0,
            min_tilt: 20.0,
            max_tilt: 80.0,
            tilt_swing: 30.0,
            spin_swing: 45.0,
            easing: 0.1,
            auto_rotate_speed: 12.0,
            initial_spin: 45.0,
            compact_spin: 45.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraMode {
    AutoOrbit,
    PointerDriven,
}

/// Current and target orbital angles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    pub current_tilt: f32,
    pub current_spin: f32,
    pub target_tilt: f32,
    pub target_spin: f32,
    pub pointer_active: bool,
}

/// Owns the orbital camera for one mounted scene.
///
/// Angles only move through `tick` easing toward targets; there is no way to
/// set them directly.
#[derive(Debug, Clone)]
pub struct CameraController {
    config: CameraConfig,
    state: CameraState,
    interactive: bool,
    disposed: bool,
}

impl CameraController {
    /// Interactive camera at its default angles, auto-orbiting.
    pub fn new(config: CameraConfig) -> Self {
        Self::at(config, config.initial_spin, true)
    }

    /// Static camera for compact previews: ignores pointer and ticks.
    pub fn fixed(config: CameraConfig) -> Self {
        Self::at(config, config.compact_spin, false)
    }

    fn at(config: CameraConfig, spin: f32, interactive: bool) -> Self {
        let tilt = config.default_tilt.clamp(config.min_tilt, config.max_tilt);
        Self {
            config,
            state: CameraState {
                current_tilt: tilt,
                current_spin: spin,
                target_tilt: tilt,
                target_spin: spin,
                pointer_active: false,
            },
            interactive,
            disposed: false,
        }
    }

    pub fn state(&self) -> &CameraState {
        &self.state
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    pub fn mode(&self) -> CameraMode {
        if self.state.pointer_active {
            CameraMode::PointerDriven
        } else {
            CameraMode::AutoOrbit
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    fn is_live(&self) -> bool {
        self.interactive && !self.disposed
    }

    /// Pointer moved inside the scene bounds.
    pub fn on_pointer_move(&mut self, offset: PointerOffset) {
        if !self.is_live() {
            return;
        }
        if !self.state.pointer_active {
            tracing::debug!("camera: auto-orbit -> pointer-driven");
        }
        let c = &self.config;
        self.state.pointer_active = true;
        self.state.target_tilt =
            (c.default_tilt + offset.ny * c.tilt_swing).clamp(c.min_tilt, c.max_tilt);
        self.state.target_spin = self.state.current_spin + offset.nx * c.spin_swing;
    }

    /// Pointer left the scene bounds.
    pub fn on_pointer_leave(&mut self) {
        if !self.is_live() || !self.state.pointer_active {
            return;
        }
        tracing::debug!("camera: pointer-driven -> auto-orbit");
        self.state.pointer_active = false;
    }

    /// Advance one frame of `dt`.
    pub fn tick(&mut self, dt: Duration) {
        if !self.is_live() {
            return;
        }
        let secs = dt.as_secs_f32();
        if !self.state.pointer_active {
            self.state.target_spin += self.config.auto_rotate_speed * secs;
            self.state.target_tilt = self
                .config
                .default_tilt
                .clamp(self.config.min_tilt, self.config.max_tilt);
        }

        let alpha = 1.0 - (1.0 - self.config.easing).powf(secs * 60.0);
        let s = &mut self.state;
        s.current_tilt += (s.target_tilt - s.current_tilt) * alpha;
        s.current_spin += (s.target_spin - s.current_spin) * alpha;

        // Keep spin within one turn; shifting both angles preserves the gap.
        if !(0.0..360.0).contains(&s.current_spin) {
            // rem_euclid rounds tiny negatives up to exactly 360
            let mut wrapped = s.current_spin.rem_euclid(360.0);
            if wrapped >= 360.0 {
                wrapped = 0.0;
            }
            s.target_spin += wrapped - s.current_spin;
            s.current_spin = wrapped;
        }
    }

    /// Stop the controller. Later calls are no-ops.
    pub fn dispose(&mut self) {
        self.disposed = true;
        self.state.pointer_active = false;
    }

    /// Root transform applied to the whole grid group.
    pub fn transform(&self) -> Mat4 {
        Mat4::from_rotation_x(self.state.current_tilt.to_radians())
            * Mat4::from_rotation_z(self.state.current_spin.to_radians())
    }
}
