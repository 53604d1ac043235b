//! Background particle engine
//!
//! Owns particle state and per-frame kinematics; drawing is left to the host,
//! which receives `Sprite`s. The engine follows the effective theme's accent
//! colour through change notifications.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::TAU;
use std::str::FromStr;
use tracing::debug;

use crate::events::{ChangeListener, PreferenceChange};

/// Where particles that leave the bottom edge reappear
const RESPAWN_Y: f32 = -10.0;

/// Snow falls slower than rain
const SNOW_SPEED_FACTOR: f32 = 0.7;

/// Visual style of the particles
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParticleKind {
    #[default]
    Rain,
    Snow,
    Stars,
}

impl FromStr for ParticleKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rain" => Ok(ParticleKind::Rain),
            "snow" => Ok(ParticleKind::Snow),
            "stars" => Ok(ParticleKind::Stars),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParticleConfig {
    pub kind: ParticleKind,
    pub count: usize,
    pub color: String,
    /// Upper bound of each particle's opacity
    pub opacity: f32,
    pub speed: f32,
    pub size_min: f32,
    pub size_max: f32,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            kind: ParticleKind::Rain,
            count: 150,
            color: "#0066ff".to_string(),
            opacity: 0.6,
            speed: 1.2,
            size_min: 1.0,
            size_max: 4.0,
        }
    }
}

/// Drawing surface size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, PartialEq)]
struct Particle {
    x: f32,
    y: f32,
    size: f32,
    speed: f32,
    opacity: f32,
    swing: f32,
    swing_count: f32,
    twinkle_speed: f32,
    twinkle_pos: f32,
}

/// What the host draws for one particle
#[derive(Debug, Clone, PartialEq)]
pub enum Sprite {
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        alpha: f32,
    },
    Circle {
        x: f32,
        y: f32,
        radius: f32,
        alpha: f32,
    },
}

#[derive(Debug)]
pub struct ParticleEngine {
    config: ParticleConfig,
    viewport: Viewport,
    particles: Vec<Particle>,
    rng: StdRng,
    listener: Option<ChangeListener>,
}

impl ParticleEngine {
    pub fn new(config: ParticleConfig, viewport: Viewport) -> Self {
        Self::with_rng(config, viewport, StdRng::from_entropy())
    }

    /// Engine with a deterministic random source
    pub fn with_seed(config: ParticleConfig, viewport: Viewport, seed: u64) -> Self {
        Self::with_rng(config, viewport, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: ParticleConfig, viewport: Viewport, rng: StdRng) -> Self {
        let mut engine = Self {
            config,
            viewport,
            particles: Vec::new(),
            rng,
            listener: None,
        };
        engine.create_particles();
        engine
    }

    /// Follow theme changes published on `listener`
    pub fn subscribe(&mut self, listener: ChangeListener) {
        self.listener = Some(listener);
    }

    /// Apply pending theme changes; returns true if the colour changed
    pub fn sync(&mut self) -> bool {
        let Some(listener) = self.listener.as_mut() else {
            return false;
        };

        let accent = listener
            .drain()
            .into_iter()
            .filter_map(|change| match change {
                PreferenceChange::Theme { effective, .. } => Some(effective.accent_color()),
                _ => None,
            })
            .last();

        match accent {
            Some(color) if color != self.config.color => {
                debug!("Particles following accent {}", color);
                self.set_color(color);
                true
            }
            _ => false,
        }
    }

    pub fn config(&self) -> &ParticleConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Switch style; unknown names are ignored
    pub fn set_type(&mut self, kind: &str) {
        if let Ok(kind) = kind.parse() {
            self.config.kind = kind;
            self.create_particles();
        }
    }

    pub fn set_color(&mut self, color: &str) {
        self.config.color = color.to_string();
    }

    pub fn set_opacity(&mut self, opacity: f32) {
        self.config.opacity = opacity;
        for particle in &mut self.particles {
            particle.opacity = self.rng.gen::<f32>() * opacity;
        }
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.config.speed = speed;
        self.create_particles();
    }

    pub fn set_count(&mut self, count: usize) {
        self.config.count = count;
        self.create_particles();
    }

    /// Resize the surface; existing particles are regenerated
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        if !self.particles.is_empty() {
            self.create_particles();
        }
    }

    fn create_particles(&mut self) {
        let mut particles = Vec::with_capacity(self.config.count);
        for _ in 0..self.config.count {
            particles.push(self.spawn());
        }
        self.particles = particles;
    }

    fn spawn(&mut self) -> Particle {
        let config = &self.config;
        let rng = &mut self.rng;

        let opacity = rng.gen::<f32>() * config.opacity;
        let x = rng.gen::<f32>() * self.viewport.width;
        let y = rng.gen::<f32>() * self.viewport.height;
        let size = config.size_min + rng.gen::<f32>() * (config.size_max - config.size_min);

        let mut particle = Particle {
            x,
            y,
            size,
            speed: 0.0,
            opacity,
            swing: 0.0,
            swing_count: 0.0,
            twinkle_speed: 0.0,
            twinkle_pos: 0.0,
        };

        match config.kind {
            ParticleKind::Rain => {
                particle.speed = (rng.gen::<f32>() + 0.2) * config.speed;
            }
            ParticleKind::Snow => {
                particle.speed = (rng.gen::<f32>() + 0.2) * config.speed * SNOW_SPEED_FACTOR;
                particle.swing = rng.gen::<f32>() * 3.0;
                particle.swing_count = rng.gen::<f32>() * TAU;
            }
            ParticleKind::Stars => {
                particle.twinkle_speed = 0.03 + rng.gen::<f32>() * 0.05;
                particle.twinkle_pos = rng.gen::<f32>() * TAU;
            }
        }
        particle
    }

    /// Advance every particle by one frame
    pub fn step(&mut self) {
        let Viewport { width, height } = self.viewport;
        for particle in &mut self.particles {
            match self.config.kind {
                ParticleKind::Rain | ParticleKind::Snow => {
                    particle.y += particle.speed;
                    if self.config.kind == ParticleKind::Snow {
                        particle.swing_count += 0.02;
                        particle.x += particle.swing_count.sin() * particle.swing * 0.1;
                    }
                    if particle.y > height {
                        particle.y = RESPAWN_Y;
                        particle.x = self.rng.gen::<f32>() * width;
                    }
                }
                ParticleKind::Stars => {
                    particle.twinkle_pos += particle.twinkle_speed;
                    if particle.twinkle_pos > TAU {
                        particle.twinkle_pos = 0.0;
                    }
                }
            }
        }
    }

    /// Shapes to draw this frame, all in `config().color`
    pub fn sprites(&self) -> Vec<Sprite> {
        self.particles
            .iter()
            .map(|p| match self.config.kind {
                ParticleKind::Rain => Sprite::Rect {
                    x: p.x,
                    y: p.y,
                    width: p.size / 3.0,
                    height: p.size,
                    alpha: p.opacity,
                },
                ParticleKind::Snow => Sprite::Circle {
                    x: p.x,
                    y: p.y,
                    radius: p.size / 2.0,
                    alpha: p.opacity,
                },
                ParticleKind::Stars => {
                    let twinkle = (p.twinkle_pos.sin() + 1.0) / 2.0;
                    Sprite::Circle {
                        x: p.x,
                        y: p.y,
                        radius: p.size / 2.0 * (0.7 + twinkle * 0.3),
                        alpha: p.opacity * (0.5 + twinkle * 0.5),
                    }
                }
            })
            .collect()
    }
}
