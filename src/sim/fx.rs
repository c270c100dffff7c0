//! Cosmetic feedback: block debris particles and screen shake
//!
//! Driven by the cosmetic RNG stream and capped by `EffectLimits`, so turning
//! effects down never changes a gameplay outcome.

use glam::Vec2;
use rand::Rng;

use super::state::{GameState, Particle};
use crate::consts::*;

/// Downward pull on debris (pixels per tick squared)
const PARTICLE_GRAVITY: f32 = 0.15;
/// Life lost per tick
const PARTICLE_FADE: f32 = 0.03;
/// Per-tick shake decay factor
const SHAKE_DECAY: f32 = 0.9;

impl GameState {
    /// Burst of debris at a destroyed block
    pub(crate) fn spawn_debris(&mut self, center: Vec2, color: u32) {
        let room = self.limits.max_particles.saturating_sub(self.particles.len());
        for _ in 0..PARTICLES_PER_BLOCK.min(room) {
            let angle = self.fx_rng.random_range(0.0..std::f32::consts::TAU);
            let speed = self.fx_rng.random_range(1.0..4.0);
            let size = self.fx_rng.random_range(2.0..5.0);
            self.particles.push(Particle {
                pos: center,
                vel: Vec2::new(angle.cos(), angle.sin()) * speed,
                color,
                life: 1.0,
                size,
            });
        }
    }

    pub(crate) fn bump_shake(&mut self, amount: f32) {
        if self.limits.screen_shake {
            self.shake = (self.shake + amount).min(1.0);
        }
    }

    /// Age particles and decay shake by one tick
    pub(crate) fn update_fx(&mut self) {
        for particle in self.particles.iter_mut() {
            particle.pos += particle.vel;
            particle.vel.y += PARTICLE_GRAVITY;
            particle.vel *= 0.98;
            particle.life -= PARTICLE_FADE;
        }
        self.particles.retain(|p| p.life > 0.0);

        self.shake *= SHAKE_DECAY;
        if self.shake < 0.01 {
            self.shake = 0.0;
        }
    }
}
