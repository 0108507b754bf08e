use serde::{Deserialize, Serialize};
use std::path::Path;
use voxstage_anim::{CameraConfig, DissolveConfig, ParticleConfig};
use voxstage_input::SceneBounds;

/// Errors from loading or validating renderer configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Tunables for one composer. Every field has a default, so a partial YAML
/// file only overrides what it names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Edge length of one grid cell.
    pub tile_size: f32,
    pub compact_tile_size: f32,
    pub bounds: SceneBounds,
    pub camera: CameraConfig,
    pub dissolve: DissolveConfig,
    pub particles: ParticleConfig,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            tile_size: 40.0,
            compact_tile_size: 20.0,
            bounds: SceneBounds::default(),
            camera: CameraConfig::default(),
            dissolve: DissolveConfig::default(),
            particles: ParticleConfig::default(),
        }
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

impl RendererConfig {
    /// Parse and validate YAML text.
    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let config: Self = serde_yaml::from_reader(std::io::BufReader::new(file))?;
        config.validate()?;
        tracing::debug!(path = %path.display(), "renderer config loaded");
        Ok(config)
    }

    /// Tile size for the given presentation mode.
    pub fn tile_size_for(&self, compact: bool) -> f32 {
        if compact {
            self.compact_tile_size
        } else {
            self.tile_size
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("tile_size", self.tile_size),
            ("compact_tile_size", self.compact_tile_size),
            ("bounds.width", self.bounds.width),
            ("bounds.height", self.bounds.height),
        ] {
            if !(value > 0.0 && value.is_finite()) {
                return Err(invalid(field, format!("must be positive, got {value}")));
            }
        }

        let cam = &self.camera;
        if cam.min_tilt > cam.max_tilt {
            return Err(invalid(
                "camera.min_tilt",
                format!("{} exceeds max_tilt {}", cam.min_tilt, cam.max_tilt),
            ));
        }
        if !(cam.min_tilt..=cam.max_tilt).contains(&cam.default_tilt) {
            return Err(invalid(
                "camera.default_tilt",
                format!(
                    "{} outside [{}, {}]",
                    cam.default_tilt, cam.min_tilt, cam.max_tilt
                ),
            ));
        }
        if !(cam.easing > 0.0 && cam.easing <= 1.0) {
            return Err(invalid(
                "camera.easing",
                format!("must be in (0, 1], got {}", cam.easing),
            ));
        }

        let dissolve = &self.dissolve;
        if dissolve.interval_ms == 0 {
            return Err(invalid("dissolve.interval_ms", "must be positive"));
        }
        if dissolve.rise_duration_ms == 0 {
            return Err(invalid("dissolve.rise_duration_ms", "must be positive"));
        }

        let p = &self.particles;
        if p.min_cycle_ms == 0 || p.min_cycle_ms > p.max_cycle_ms {
            return Err(invalid(
                "particles.min_cycle_ms",
                format!("need 0 < min <= max, got {}..{}", p.min_cycle_ms, p.max_cycle_ms),
            ));
        }
        if !(p.min_size > 0.0 && p.min_size <= p.max_size) {
            return Err(invalid(
                "particles.min_size",
                format!("need 0 < min <= max, got {}..{}", p.min_size, p.max_size),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        RendererConfig::default().validate().unwrap();
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config = RendererConfig::from_yaml(
            "tile_size: 32\ncamera:\n  easing: 0.25\ndissolve:\n  interval_ms: 80\n",
        )
        .unwrap();
        assert_eq!(config.tile_size, 32.0);
        assert_eq!(config.camera.easing, 0.25);
        assert_eq!(config.camera.max_tilt, 80.0);
        assert_eq!(config.dissolve.interval_ms, 80);
        assert_eq!(config.dissolve.rise_duration_ms, 1500);
        assert_eq!(config.particles.count, 24);
    }

    #[test]
    fn default_tilt_must_be_inside_clamp() {
        let err = RendererConfig::from_yaml("camera:\n  default_tilt: 85\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "camera.default_tilt",
                ..
            }
        ));
    }

    #[test]
    fn easing_range_is_checked() {
        for bad in ["0", "1.5", "-0.1"] {
            let yaml = format!("camera:\n  easing: {bad}\n");
            assert!(RendererConfig::from_yaml(&yaml).is_err(), "easing {bad}");
        }
        assert!(RendererConfig::from_yaml("camera:\n  easing: 1\n").is_ok());
    }

    #[test]
    fn zero_interval_rejected() {
        let err = RendererConfig::from_yaml("dissolve:\n  interval_ms: 0\n").unwrap_err();
        assert!(err.to_string().contains("dissolve.interval_ms"));
    }

    #[test]
    fn non_positive_sizes_rejected() {
        assert!(RendererConfig::from_yaml("tile_size: 0\n").is_err());
        assert!(RendererConfig::from_yaml("bounds:\n  width: -1\n  height: 10\n").is_err());
        assert!(RendererConfig::from_yaml("particles:\n  min_size: 5\n  max_size: 2\n").is_err());
    }

    #[test]
    fn malformed_yaml_is_a_yaml_error() {
        assert!(matches!(
            RendererConfig::from_yaml("tile_size: [1, 2"),
            Err(ConfigError::Yaml(_))
        ));
    }

    #[test]
    fn load_from_file() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        writeln!(tmp, "compact_tile_size: 12\nparticles:\n  count: 4").unwrap();
        let config = RendererConfig::load(tmp.path()).unwrap();
        assert_eq!(config.compact_tile_size, 12.0);
        assert_eq!(config.tile_size_for(true), 12.0);
        assert_eq!(config.tile_size_for(false), 40.0);
        assert_eq!(config.particles.count, 4);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        assert!(matches!(
            RendererConfig::load("/no/such/config.yaml"),
            Err(ConfigError::Io(_))
        ));
    }
}
