//! Particle System
//!
//! Small one-shot effects (landing dust, brick debris, fireball sparks)
//! drawn from a fixed-size pool. Bursts come in through `Events` so the
//! simulation never touches the pool directly.

use macroquad::prelude::*;
use ::rand::{rngs::StdRng, Rng, SeedableRng};
use super::event::{Burst, BurstKind};

/// Maximum number of live particles
pub const MAX_PARTICLES: usize = 256;

/// Drawn shape of a particle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Circle,
    Star,
    Square,
}

/// A single particle in the pool
#[derive(Debug, Clone, Copy)]
pub struct Particle {
    pub position: Vec2,
    /// Velocity (pixels per second)
    pub velocity: Vec2,
    pub gravity: f32,
    /// Remaining life in seconds
    pub life: f32,
    /// Total lifetime (for interpolation)
    pub max_life: f32,
    pub color: Color,
    /// Radius at birth, shrinking to `size * scale_end`
    pub size: f32,
    pub scale_end: f32,
    pub shape: Shape,
    pub alive: bool,
}

impl Default for Particle {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            gravity: 0.0,
            life: 0.0,
            max_life: 1.0,
            color: WHITE,
            size: 3.0,
            scale_end: 0.0,
            shape: Shape::Circle,
            alive: false,
        }
    }
}

/// Emitter settings for one preset
#[derive(Debug, Clone, Copy)]
pub struct BurstDef {
    pub count: usize,
    /// Seconds
    pub lifespan: f32,
    pub speed_min: f32,
    pub speed_max: f32,
    /// Degrees, 0 = right, 90 = down
    pub angle_min: f32,
    pub angle_max: f32,
    pub gravity: f32,
    pub color: Color,
    pub size: f32,
    pub scale_end: f32,
    pub shape: Shape,
}

impl BurstDef {
    pub fn preset(kind: BurstKind) -> Self {
        match kind {
            BurstKind::Dust => Self {
                count: 10,
                lifespan: 0.35,
                speed_min: 40.0,
                speed_max: 90.0,
                angle_min: 220.0,
                angle_max: 320.0,
                gravity: 200.0,
                color: Color::new(1.0, 1.0, 1.0, 0.9),
                size: 3.0,
                scale_end: 0.0,
                shape: Shape::Circle,
            },
            BurstKind::RespawnStars => Self {
                count: 24,
                lifespan: 0.5,
                speed_min: 80.0,
                speed_max: 180.0,
                angle_min: 0.0,
                angle_max: 360.0,
                gravity: 0.0,
                color: Color::from_hex(0xfff27a),
                size: 7.0,
                scale_end: 0.0,
                shape: Shape::Star,
            },
            BurstKind::FireSparks => Self {
                count: 12,
                lifespan: 0.25,
                speed_min: 40.0,
                speed_max: 120.0,
                angle_min: 0.0,
                angle_max: 360.0,
                gravity: 100.0,
                color: Color::from_hex(0xffa030),
                size: 2.0,
                scale_end: 0.2,
                shape: Shape::Circle,
            },
            BurstKind::Ember => Self {
                count: 1,
                lifespan: 0.3,
                speed_min: 10.0,
                speed_max: 40.0,
                angle_min: 0.0,
                angle_max: 360.0,
                gravity: 0.0,
                color: Color::new(1.0, 0.75, 0.3, 0.9),
                size: 2.0,
                scale_end: 0.0,
                shape: Shape::Circle,
            },
            BurstKind::StarTrail => Self {
                count: 1,
                lifespan: 0.4,
                speed_min: 10.0,
                speed_max: 30.0,
                angle_min: 0.0,
                angle_max: 360.0,
                gravity: 0.0,
                color: Color::from_hex(0xfff27a),
                size: 3.0,
                scale_end: 0.0,
                shape: Shape::Star,
            },
            BurstKind::BrickDebris => Self {
                count: 4,
                lifespan: 0.8,
                speed_min: 120.0,
                speed_max: 180.0,
                angle_min: 230.0,
                angle_max: 310.0,
                gravity: 650.0,
                color: Color::from_hex(0xb45a1e),
                size: 4.0,
                scale_end: 1.0,
                shape: Shape::Square,
            },
        }
    }
}

/// The particle pool. Manages all live particles
pub struct ParticlePool {
    pub particles: [Particle; MAX_PARTICLES],
    rng: StdRng,
}

impl ParticlePool {
    pub fn new() -> Self {
        Self::with_seed(12345)
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            particles: [Particle::default(); MAX_PARTICLES],
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn find_free_slot(&self) -> Option<usize> {
        self.particles.iter().position(|p| !p.alive)
    }

    fn range(&mut self, min: f32, max: f32) -> f32 {
        if max > min { self.rng.gen_range(min..max) } else { min }
    }

    /// Spawn a single particle; silently dropped when the pool is full.
    pub fn spawn_one(&mut self, def: &BurstDef, origin: Vec2) {
        let Some(idx) = self.find_free_slot() else {
            return;
        };
        let speed = self.range(def.speed_min, def.speed_max);
        let angle = self.range(def.angle_min, def.angle_max).to_radians();

        self.particles[idx] = Particle {
            position: origin,
            velocity: Vec2::new(angle.cos(), angle.sin()) * speed,
            gravity: def.gravity,
            life: def.lifespan,
            max_life: def.lifespan,
            color: def.color,
            size: def.size,
            scale_end: def.scale_end,
            shape: def.shape,
            alive: true,
        };
    }

    pub fn explode(&mut self, def: &BurstDef, origin: Vec2) {
        for _ in 0..def.count {
            self.spawn_one(def, origin);
        }
    }

    pub fn spawn_burst(&mut self, burst: Burst) {
        self.explode(&BurstDef::preset(burst.kind), burst.pos);
    }

    /// Update all live particles
    pub fn update(&mut self, delta_time: f32) {
        for particle in &mut self.particles {
            if !particle.alive {
                continue;
            }

            particle.life -= delta_time;
            if particle.life <= 0.0 {
                particle.alive = false;
                continue;
            }

            particle.velocity.y += particle.gravity * delta_time;
            particle.position += particle.velocity * delta_time;
        }
    }

    /// Draw live particles in world space (the camera is already set).
    pub fn draw(&self) {
        for particle in self.particles.iter().filter(|p| p.alive) {
            let t = 1.0 - particle.life / particle.max_life;
            let size = particle.size * (1.0 + (particle.scale_end - 1.0) * t);
            if size <= 0.05 {
                continue;
            }
            let Vec2 { x, y } = particle.position;
            match particle.shape {
                Shape::Circle => draw_circle(x, y, size, particle.color),
                Shape::Square => {
                    draw_rectangle(x - size / 2.0, y - size / 2.0, size, size, particle.color)
                }
                Shape::Star => draw_poly(x, y, 5, size, -90.0, particle.color),
            }
        }
    }

    pub fn alive_count(&self) -> usize {
        self.particles.iter().filter(|p| p.alive).count()
    }

    pub fn clear(&mut self) {
        for p in &mut self.particles {
            p.alive = false;
        }
    }
}

impl Default for ParticlePool {
    fn default() -> Self {
        Self::new()
    }
}
