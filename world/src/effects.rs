//! Cosmetic entities: bullets, particles, floor decals and screenshake.

use bank_heist_core::{
    EnemyKind, Rgb, TileCoord, BULLET_LENGTH, BULLET_TRAVEL_RATE, PARTICLE_DRAG,
    SCREENSHAKE_DISSIPATION,
};
use glam::Vec2;
use rand::Rng;

use crate::level::TileGrid;

/// Visual ray travelling from a turret towards its target.
///
/// Damage is settled when the shot is fired, so a bullet never touches game state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bullet {
    from: Vec2,
    to: Vec2,
    progress: f32,
    length: f32,
}

impl Bullet {
    pub(crate) fn new(from: Vec2, to: Vec2) -> Self {
        Self {
            from,
            to,
            progress: 0.0,
            length: from.distance(to),
        }
    }

    /// Fraction of the ray already covered.
    #[must_use]
    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// End points of the short segment drawn for the bullet this frame.
    #[must_use]
    pub fn segment(&self) -> (Vec2, Vec2) {
        let head = if self.length > 0.0 {
            self.progress + BULLET_LENGTH / self.length
        } else {
            1.0
        };
        let start = self.from.lerp(self.to, self.progress.clamp(0.0, 1.0));
        let end = self.from.lerp(self.to, head.clamp(0.0, 1.0));
        (start, end)
    }

    fn advance(&mut self) {
        self.progress += BULLET_TRAVEL_RATE;
    }

    fn is_spent(&self) -> bool {
        self.progress >= 1.0
    }
}

/// Short-lived spark thrown out by explosions and placements.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    position: Vec2,
    trace: Vec2,
    velocity: Vec2,
    color: Rgb,
    life: i32,
}

impl Particle {
    fn spawn<R: Rng>(rng: &mut R, position: Vec2, color: Rgb, power: f32) -> Self {
        let direction = rng.gen::<f32>() * 360.0;
        let length = rng.gen::<f32>() * power;
        Self {
            position,
            trace: position,
            velocity: Vec2::new(direction.sin(), direction.cos()) * length,
            color,
            life: rng.gen_range(10..=50),
        }
    }

    /// Current world position.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Displacement applied on the last tick, used to draw a streak.
    #[must_use]
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Colour of the particle.
    #[must_use]
    pub fn color(&self) -> Rgb {
        self.color
    }

    /// Ticks left before the particle disappears.
    #[must_use]
    pub fn life(&self) -> i32 {
        self.life
    }

    /// Moves the particle. The trace stops advancing once it sits off the floor.
    fn advance(&mut self, grid: &TileGrid) {
        self.velocity *= PARTICLE_DRAG;
        self.position += self.velocity;
        if on_floor(grid, self.trace) {
            self.trace += self.velocity;
        }
        self.life -= 1;
    }
}

fn on_floor(grid: &TileGrid, point: Vec2) -> bool {
    grid.peek(TileCoord::containing(point)).is_floor_placeable()
}

/// Stain left on the floor beneath a particle's trace.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Decal {
    /// World position of the stain.
    pub position: Vec2,
    /// Colour of the particle that left it.
    pub color: Rgb,
}

/// Particle bursts emitted by the session.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Burst {
    /// Item deployed or spike trap broken.
    Spark,
    /// Enemy killed.
    Death(EnemyKind),
    /// Bomb trap detonated.
    Bomb,
    /// Gold stolen from the stash.
    Gold,
}

/// Every cosmetic entity alive in the session.
#[derive(Clone, Debug, Default)]
pub(crate) struct Effects {
    pub(crate) bullets: Vec<Bullet>,
    pub(crate) particles: Vec<Particle>,
    pub(crate) decals: Vec<Decal>,
    pub(crate) screenshake: Vec2,
}

impl Effects {
    pub(crate) fn fire<R: Rng>(&mut self, rng: &mut R, from: Vec2, to: Vec2, accuracy: f32) {
        let jitter = Vec2::new(signed(rng), signed(rng)) * accuracy;
        self.bullets.push(Bullet::new(from, to + jitter));
    }

    pub(crate) fn advance_bullets(&mut self) {
        for bullet in &mut self.bullets {
            bullet.advance();
        }
        self.bullets.retain(|bullet| !bullet.is_spent());
    }

    /// Moves every particle, records this tick's decals and decays the shake.
    pub(crate) fn advance(&mut self, grid: &TileGrid) {
        self.decals.clear();
        for particle in &mut self.particles {
            particle.advance(grid);
            if on_floor(grid, particle.trace) {
                self.decals.push(Decal {
                    position: particle.trace,
                    color: particle.color,
                });
            }
        }
        self.particles.retain(|particle| particle.life >= 0);
        self.screenshake = -self.screenshake * SCREENSHAKE_DISSIPATION;
    }

    pub(crate) fn burst<R: Rng>(&mut self, rng: &mut R, at: Vec2, burst: Burst) {
        match burst {
            Burst::Spark => self.scatter(rng, at, 100, Rgb::WHITE, 5.0),
            Burst::Death(kind) => self.scatter(rng, at, 300, kind.color(), 5.0),
            Burst::Bomb => {
                self.shake(rng, 100.0);
                for _ in 0..500 {
                    let g = rng.gen_range(0..=255_u32);
                    let color = Rgb::from_rgb(saturate(g * 10), saturate(g * 2), saturate(g));
                    let power = rng.gen::<f32>() * 15.0;
                    self.particles.push(Particle::spawn(rng, at, color, power));
                }
            }
            Burst::Gold => {
                self.shake(rng, 25.0);
                for _ in 0..250 {
                    let g = rng.gen_range(0..=255_u32);
                    let color = Rgb::from_rgb(saturate(g * 5), saturate(g * 5), saturate(g));
                    let power = rng.gen::<f32>() * 7.5;
                    self.particles.push(Particle::spawn(rng, at, color, power));
                }
            }
        }
    }

    fn scatter<R: Rng>(&mut self, rng: &mut R, at: Vec2, count: usize, color: Rgb, power: f32) {
        self.particles.reserve(count);
        for _ in 0..count {
            self.particles.push(Particle::spawn(rng, at, color, power));
        }
    }

    fn shake<R: Rng>(&mut self, rng: &mut R, power: f32) {
        self.screenshake = Vec2::new(signed(rng), signed(rng)) * power;
    }
}

/// Uniform sample from `-1.0..1.0`.
pub(crate) fn signed<R: Rng>(rng: &mut R) -> f32 {
    rng.gen::<f32>() * 2.0 - 1.0
}

fn saturate(channel: u32) -> u8 {
    u8::try_from(channel.min(255)).unwrap_or(u8::MAX)
}
