use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    pub count: usize,
    /// Upper bound on how far a mote drifts toward the viewer.
    pub depth_cap: f32,
    pub min_cycle_ms: u64,
    pub max_cycle_ms: u64,
    pub min_size: f32,
    pub max_size: f32,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            count: 24,
            depth_cap: 240.0,
            min_cycle_ms: 4_000,
            max_cycle_ms: 9_000,
            min_size: 1.5,
            max_size: 4.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorTag {
    Warm,
    Cool,
    Accent,
}

/// Parameters of one mote, fixed at generation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Position within the scene bounds, `[0, 1]` on each axis.
    pub relative_x: f32,
    pub relative_y: f32,
    pub depth_target: f32,
    pub phase_delay: Duration,
    pub cycle_duration: Duration,
    pub size: f32,
    pub color_tag: ColorTag,
}

/// A particle evaluated at some elapsed time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleSample {
    pub relative_x: f32,
    pub relative_y: f32,
    pub depth: f32,
    pub opacity: f32,
    pub size: f32,
    pub color_tag: ColorTag,
}

/// Fraction of the cycle spent fading in.
const FADE_IN: f32 = 0.2;

impl Particle {
    /// State at `elapsed` since mount. Pure: depends only on the inputs.
    pub fn sample(&self, elapsed: Duration) -> ParticleSample {
        let (depth, opacity) = match elapsed.checked_sub(self.phase_delay) {
            None => (0.0, 0.0),
            Some(running) => {
                let cycle = self.cycle_duration.as_secs_f32().max(f32::EPSILON);
                let t = (running.as_secs_f32() % cycle) / cycle;
                let eased = 1.0 - (1.0 - t).powi(3);
                let opacity = if t < FADE_IN {
                    t / FADE_IN
                } else {
                    (1.0 - t) / (1.0 - FADE_IN)
                };
                (self.depth_target * eased, opacity.clamp(0.0, 1.0))
            }
        };
        ParticleSample {
            relative_x: self.relative_x,
            relative_y: self.relative_y,
            depth,
            opacity,
            size: self.size,
            color_tag: self.color_tag,
        }
    }
}

/// Splitmix64 stream: small, seedable and platform independent.
struct SplitMix64(u64);

impl SplitMix64 {
    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9e37_79b9_7f4a_7c15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^ (z >> 31)
    }

    /// Uniform in `[0, 1)`.
    fn unit(&mut self) -> f32 {
        (self.next_u64() >> 40) as f32 / (1u64 << 24) as f32
    }

    fn range(&mut self, lo: f32, hi: f32) -> f32 {
        lo + (hi - lo) * self.unit()
    }
}

/// Fixed pool of independently phased motes, generated once per mount.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParticleField {
    particles: Vec<Particle>,
}

impl ParticleField {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn generate(seed: u64, config: &ParticleConfig) -> Self {
        let mut rng = SplitMix64(seed);
        let min_cycle = config.min_cycle_ms.min(config.max_cycle_ms) as f32;
        let max_cycle = config.max_cycle_ms.max(config.min_cycle_ms) as f32;
        let particles = (0..config.count)
            .map(|_| {
                let cycle_ms = rng.range(min_cycle, max_cycle);
                Particle {
                    relative_x: rng.unit(),
                    relative_y: rng.unit(),
                    depth_target: config.depth_cap * rng.range(0.4, 1.0),
                    phase_delay: Duration::from_secs_f32(rng.unit() * cycle_ms / 1000.0),
                    cycle_duration: Duration::from_secs_f32(cycle_ms / 1000.0),
                    size: rng.range(config.min_size, config.max_size),
                    color_tag: match rng.next_u64() % 3 {
                        0 => ColorTag::Warm,
                        1 => ColorTag::Cool,
                        _ => ColorTag::Accent,
                    },
                }
            })
            .collect();
        Self { particles }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Every particle at `elapsed`, in generation order.
    pub fn sample(&self, elapsed: Duration) -> Vec<ParticleSample> {
        self.particles.iter().map(|p| p.sample(elapsed)).collect()
    }
}
