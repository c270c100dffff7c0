//! Power-up drops and timed effects
//!
//! Destroyed blocks may drop a power-up that falls toward the paddle. Catching
//! it applies the effect; timed effects hold one record per `EffectSlot` and
//! revert when the record's timer fires. Replacing a record drops its timer,
//! so a superseded effect can never revert on top of its successor.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use super::state::{Ball, GameEvent, GameState};
use super::timer::Timer;
use crate::consts::*;

/// Paddle width multiplier for the expand power-up
const EXPAND_FACTOR: f32 = 1.5;
/// Paddle width multiplier for the shrink power-up
const SHRINK_FACTOR: f32 = 0.7;
const SLOW_FACTOR: f32 = 0.6;
const FAST_FACTOR: f32 = 1.4;
/// Random scale range for multi-ball velocities
const MULTI_BALL_SPREAD: std::ops::RangeInclusive<f32> = 0.7..=1.3;
const MULTI_BALL_COUNT: usize = 2;
/// Below this speed a ball has no direction to rescale along
const MIN_RESCALE_SPEED: f32 = 1e-4;

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    ExpandPaddle,
    ShrinkPaddle,
    SlowBall,
    FastBall,
    MultiBall,
    Penetrate,
}

/// What a timed effect modifies. Effects sharing a slot replace each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectSlot {
    PaddleWidth,
    BallSpeed,
    Penetration,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 6] = [
        PowerUpKind::ExpandPaddle,
        PowerUpKind::ShrinkPaddle,
        PowerUpKind::SlowBall,
        PowerUpKind::FastBall,
        PowerUpKind::MultiBall,
        PowerUpKind::Penetrate,
    ];

    /// One-shot effects have no slot
    pub fn slot(&self) -> Option<EffectSlot> {
        match self {
            PowerUpKind::ExpandPaddle | PowerUpKind::ShrinkPaddle => Some(EffectSlot::PaddleWidth),
            PowerUpKind::SlowBall | PowerUpKind::FastBall => Some(EffectSlot::BallSpeed),
            PowerUpKind::Penetrate => Some(EffectSlot::Penetration),
            PowerUpKind::MultiBall => None,
        }
    }

    /// HUD glyph
    pub fn symbol(&self) -> char {
        match self {
            PowerUpKind::ExpandPaddle => '+',
            PowerUpKind::ShrinkPaddle => '-',
            PowerUpKind::SlowBall => 'S',
            PowerUpKind::FastBall => 'F',
            PowerUpKind::MultiBall => 'M',
            PowerUpKind::Penetrate => 'P',
        }
    }

    /// 0xRRGGBB
    pub fn color(&self) -> u32 {
        match self {
            PowerUpKind::ExpandPaddle => 0x2ecc71,
            PowerUpKind::ShrinkPaddle => 0xe74c3c,
            PowerUpKind::SlowBall => 0x3498db,
            PowerUpKind::FastBall => 0xf39c12,
            PowerUpKind::MultiBall => 0x9b59b6,
            PowerUpKind::Penetrate => 0xf1c40f,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PowerUpKind::ExpandPaddle => "Expand Paddle",
            PowerUpKind::ShrinkPaddle => "Shrink Paddle",
            PowerUpKind::SlowBall => "Slow Ball",
            PowerUpKind::FastBall => "Fast Ball",
            PowerUpKind::MultiBall => "Multi Ball",
            PowerUpKind::Penetrate => "Penetrate",
        }
    }
}

/// A falling power-up
#[derive(Debug, Clone, PartialEq)]
pub struct PowerUpDrop {
    /// Centre
    pub pos: Vec2,
    /// Pixels per tick, downward
    pub fall_speed: f32,
    pub kind: PowerUpKind,
}

impl PowerUpDrop {
    pub fn rect(&self) -> Rect {
        Rect::centered(self.pos, DROP_SIZE, DROP_SIZE)
    }
}

/// A timed effect currently in force
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveEffect {
    pub kind: PowerUpKind,
    pub expiry: Timer,
}

impl GameState {
    pub fn effect_active(&self, kind: PowerUpKind) -> bool {
        self.effects.iter().any(|e| e.kind == kind)
    }

    pub fn effect_remaining_ms(&self, kind: PowerUpKind) -> Option<f64> {
        self.effects
            .iter()
            .find(|e| e.kind == kind)
            .and_then(|e| e.expiry.remaining_ms(self.clock_ms))
    }

    /// Roll for a drop at a destroyed block's centre
    pub fn maybe_spawn_drop(&mut self, at: Vec2) -> bool {
        if self.rng.random::<f32>() >= self.tuning.drop_chance {
            return false;
        }
        let kind = PowerUpKind::ALL[self.rng.random_range(0..PowerUpKind::ALL.len())];
        self.drops.push(PowerUpDrop {
            pos: at,
            fall_speed: self.tuning.drop_fall_speed,
            kind,
        });
        log::trace!("Spawned {:?} drop at {:?}", kind, at);
        true
    }

    /// Fall every drop one tick; apply the ones the paddle catches
    pub(crate) fn update_drops(&mut self) {
        let paddle = self.paddle.rect();
        let mut caught = Vec::new();
        self.drops.retain_mut(|drop| {
            drop.pos.y += drop.fall_speed;
            if drop.rect().intersects(&paddle) {
                caught.push(drop.kind);
                false
            } else {
                drop.rect().y <= FIELD_HEIGHT
            }
        });
        for kind in caught {
            self.apply_power_up(kind);
        }
    }

    /// Apply a power-up's effect and register its expiry
    pub fn apply_power_up(&mut self, kind: PowerUpKind) {
        self.emit(GameEvent::PowerUpCollected { kind });

        let previous = kind
            .slot()
            .and_then(|slot| self.effects.iter().find(|e| e.kind.slot() == Some(slot)))
            .map(|e| e.kind);
        if previous == Some(kind) {
            log::debug!("{} refreshed", kind.label());
        } else {
            log::debug!("{} applied (replacing {:?})", kind.label(), previous);
        }

        match kind {
            PowerUpKind::ExpandPaddle => {
                let width = self.baseline_paddle_width() * EXPAND_FACTOR;
                self.paddle.set_width(width);
            }
            PowerUpKind::ShrinkPaddle => {
                let width = self.baseline_paddle_width() * SHRINK_FACTOR;
                self.paddle.set_width(width);
            }
            PowerUpKind::SlowBall | PowerUpKind::FastBall => {
                if previous != Some(kind) {
                    if previous.is_some() {
                        self.rescale_balls_to_target();
                    }
                    let factor = if kind == PowerUpKind::SlowBall {
                        SLOW_FACTOR
                    } else {
                        FAST_FACTOR
                    };
                    for ball in self.balls_mut() {
                        ball.vel *= factor;
                    }
                }
            }
            PowerUpKind::MultiBall => self.spawn_multi_ball(),
            PowerUpKind::Penetrate => {
                for ball in self.balls_mut() {
                    ball.penetrating = true;
                }
            }
        }

        let duration = self.tuning.duration_ms(kind);
        if let Some(slot) = kind.slot() {
            if duration > 0.0 {
                self.effects.retain(|e| e.kind.slot() != Some(slot));
                self.effects.push(ActiveEffect {
                    kind,
                    expiry: Timer::after(self.clock_ms, duration),
                });
            }
        }
    }

    /// Two extra balls at the primary's position with jittered velocities
    fn spawn_multi_ball(&mut self) {
        let origin = self.ball.pos;
        let base = self.ball.vel;
        let penetrating = self.ball.penetrating;
        for _ in 0..MULTI_BALL_COUNT {
            let scale_x = self.rng.random_range(MULTI_BALL_SPREAD);
            let sign = if self.rng.random_bool(0.5) { 1.0 } else { -1.0 };
            let scale_y = self.rng.random_range(MULTI_BALL_SPREAD);
            let mut ball = Ball::new(origin, Vec2::new(base.x * scale_x * sign, base.y * scale_y));
            ball.penetrating = penetrating;
            self.extra_balls.push(ball);
        }
    }

    /// Restore every ball's speed to the stage target, keeping direction
    fn rescale_balls_to_target(&mut self) {
        let target = self.target_ball_speed();
        for ball in self.balls_mut() {
            let speed = ball.speed();
            if speed > MIN_RESCALE_SPEED {
                ball.vel *= target / speed;
            }
        }
    }

    /// Revert every effect whose timer has fired
    pub(crate) fn expire_effects(&mut self) {
        let now = self.clock_ms;
        let mut expired = Vec::new();
        self.effects.retain_mut(|effect| {
            if effect.expiry.fire(now) {
                expired.push(effect.kind);
                false
            } else {
                true
            }
        });
        for kind in expired {
            self.revert_effect(kind);
            self.emit(GameEvent::PowerUpExpired { kind });
            log::debug!("{} expired", kind.label());
        }
    }

    fn revert_effect(&mut self, kind: PowerUpKind) {
        match kind {
            PowerUpKind::ExpandPaddle | PowerUpKind::ShrinkPaddle => self.reset_paddle_width(),
            PowerUpKind::SlowBall | PowerUpKind::FastBall => self.rescale_balls_to_target(),
            PowerUpKind::Penetrate => {
                for ball in self.balls_mut() {
                    ball.penetrating = false;
                }
            }
            PowerUpKind::MultiBall => {}
        }
    }
}
