//! Game state and core simulation types
//!
//! `GameState` is the session object: it owns every entity collection and is
//! only mutated through the tick entry point and the transition methods in
//! `tick.rs`.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::combo::Combo;
use super::field::BlockField;
use super::geometry::Rect;
use super::powerup::{ActiveEffect, PowerUpDrop, PowerUpKind};
use super::timer::Timer;
use crate::consts::*;
use crate::settings::EffectLimits;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Field set up, waiting for the run toggle
    Ready,
    /// Active gameplay (may be paused via `GameState::running`)
    Playing,
    /// Field cleared, waiting for the next-stage event
    StageClear,
    /// Out of lives
    GameOver,
    /// Last stage cleared
    GameWin,
}

/// Fire-and-forget notifications for audio/display collaborators
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    BlockDestroyed { color: u32 },
    PaddleHit,
    WallHit,
    PowerUpCollected { kind: PowerUpKind },
    PowerUpExpired { kind: PowerUpKind },
    ComboHit { level: u32 },
    BallLost { lives_left: u8 },
    StageClear { stage: u32 },
    GameOver { score: u64 },
    GameWin { score: u64 },
}

/// Trail point for ball rendering
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrailPoint {
    pub pos: Vec2,
    pub speed: f32,
}

/// A ball entity
#[derive(Debug, Clone, PartialEq)]
pub struct Ball {
    pub pos: Vec2,
    /// Pixels per tick
    pub vel: Vec2,
    pub radius: f32,
    /// Horizontal speed clamp applied on paddle hits
    pub max_speed: f32,
    /// Destroys blocks without bouncing off them
    pub penetrating: bool,
    /// Trail history for rendering (newest first)
    pub trail: Vec<TrailPoint>,
}

impl Default for Ball {
    fn default() -> Self {
        Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            radius: BALL_RADIUS,
            max_speed: BALL_MAX_SPEED,
            penetrating: false,
            trail: Vec::new(),
        }
    }
}

impl Ball {
    pub fn new(pos: Vec2, vel: Vec2) -> Self {
        Self {
            pos,
            vel,
            ..Default::default()
        }
    }

    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    /// Record current position to trail, keeping at most `limit` points
    pub fn record_trail(&mut self, limit: usize) {
        if limit == 0 {
            self.trail.clear();
            return;
        }
        let speed = self.speed();
        self.trail.insert(0, TrailPoint { pos: self.pos, speed });
        self.trail.truncate(limit);
    }

    /// Clear trail (on respawn)
    pub fn clear_trail(&mut self) {
        self.trail.clear();
    }
}

/// The player's paddle
#[derive(Debug, Clone, PartialEq)]
pub struct Paddle {
    /// Left edge
    pub x: f32,
    /// Top edge (fixed)
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Pixels per tick for discrete left/right movement
    pub speed: f32,
    /// Width before stage shrink or power-ups
    pub initial_width: f32,
}

impl Default for Paddle {
    fn default() -> Self {
        Self {
            x: FIELD_WIDTH / 2.0 - PADDLE_WIDTH / 2.0,
            y: FIELD_HEIGHT - PADDLE_BOTTOM_OFFSET,
            width: PADDLE_WIDTH,
            height: PADDLE_HEIGHT,
            speed: PADDLE_SPEED,
            initial_width: PADDLE_WIDTH,
        }
    }
}

impl Paddle {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    /// Shift by `dx`, staying inside the field
    pub fn move_by(&mut self, dx: f32) {
        self.x = (self.x + dx).clamp(0.0, (FIELD_WIDTH - self.width).max(0.0));
    }

    /// Centre the paddle on `x`, staying inside the field
    pub fn center_on(&mut self, x: f32) {
        self.x = (x - self.width / 2.0).clamp(0.0, (FIELD_WIDTH - self.width).max(0.0));
    }

    /// Resize around the current centre, bounded to `[PADDLE_MIN_WIDTH, PADDLE_MAX_WIDTH]`
    pub fn set_width(&mut self, width: f32) {
        let center = self.center_x();
        self.width = width.clamp(PADDLE_MIN_WIDTH, PADDLE_MAX_WIDTH);
        self.center_on(center);
    }
}

/// A block entity
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub rect: Rect,
    /// Destroyed blocks are hidden, never removed
    pub visible: bool,
    /// 0xRRGGBB
    pub color: u32,
}

/// A particle for visual effects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: u32,
    pub life: f32, // 0-1, decreases over time
    pub size: f32,
}

/// Complete game session
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    pub limits: EffectLimits,
    /// Gameplay RNG (launch angles, drops, multi-ball spread)
    pub(crate) rng: Pcg32,
    /// Cosmetic RNG, kept apart so particles never perturb gameplay
    pub(crate) fx_rng: Pcg32,
    /// Simulation clock (ms)
    pub clock_ms: f64,
    pub phase: GamePhase,
    /// Whether the simulation advances this tick
    pub running: bool,
    /// Resume after the respawn pause
    pub resume: Timer,
    /// Current stage (1-based)
    pub stage: u32,
    pub score: u64,
    pub lives: u8,
    pub high_score: u64,
    pub paddle: Paddle,
    /// Primary ball: losing it costs a life
    pub ball: Ball,
    /// Multi-ball extras: losing them is free
    pub extra_balls: Vec<Ball>,
    pub field: BlockField,
    pub drops: Vec<PowerUpDrop>,
    /// At most one record per effect slot
    pub effects: Vec<ActiveEffect>,
    pub combo: Combo,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    /// Screen shake intensity (0-1)
    pub shake: f32,
    /// Events raised during the last tick
    pub events: Vec<GameEvent>,
}

/// Offset for the cosmetic RNG stream
const FX_SEED_SALT: u64 = 0x9e37_79b9_7f4a_7c15;

impl GameState {
    /// Create a new game state with the given seed and default configuration
    pub fn new(seed: u64) -> Self {
        Self::with_config(seed, Tuning::default(), EffectLimits::default())
    }

    pub fn with_config(seed: u64, tuning: Tuning, limits: EffectLimits) -> Self {
        let lives = tuning.starting_lives;
        let mut state = Self {
            seed,
            tuning,
            limits,
            rng: Pcg32::seed_from_u64(seed),
            fx_rng: Pcg32::seed_from_u64(seed ^ FX_SEED_SALT),
            clock_ms: 0.0,
            phase: GamePhase::Ready,
            running: false,
            resume: Timer::default(),
            stage: 1,
            score: 0,
            lives,
            high_score: 0,
            paddle: Paddle::default(),
            ball: Ball::default(),
            extra_balls: Vec::new(),
            field: BlockField::new(),
            drops: Vec::new(),
            effects: Vec::new(),
            combo: Combo::default(),
            particles: Vec::new(),
            shake: 0.0,
            events: Vec::new(),
        };
        state.reset_paddle_width();
        state.reseed_ball();
        state
    }

    /// Carry a previously persisted best score into the session
    pub fn with_high_score(mut self, high_score: u64) -> Self {
        self.high_score = high_score.max(self.score);
        self
    }

    pub fn stage_speed_multiplier(&self) -> f32 {
        self.tuning.stage_speed_multiplier(self.stage)
    }

    /// Paddle width with no width power-up active
    pub fn baseline_paddle_width(&self) -> f32 {
        self.paddle.initial_width * self.tuning.stage_width_multiplier(self.stage)
    }

    pub fn reset_paddle_width(&mut self) {
        let width = self.baseline_paddle_width();
        self.paddle.set_width(width);
    }

    /// Ball speed magnitude the current stage is tuned for
    pub fn target_ball_speed(&self) -> f32 {
        BALL_START_SPEED_Y.abs() * self.stage_speed_multiplier()
    }

    /// Put the primary ball above the paddle with a fresh stage-scaled launch
    pub fn reseed_ball(&mut self) {
        let mult = self.stage_speed_multiplier();
        let spread = self.rng.random::<f32>() - 0.5;
        let penetrating = self.effect_active(PowerUpKind::Penetrate);

        self.ball.pos = Vec2::new(FIELD_WIDTH / 2.0, self.paddle.y - BALL_SPAWN_HEIGHT);
        self.ball.vel = Vec2::new(spread * BALL_START_SPREAD_X * mult, BALL_START_SPEED_Y * mult);
        self.ball.penetrating = penetrating;
        self.ball.clear_trail();
    }

    /// Primary ball first, then the extras
    pub fn balls(&self) -> impl Iterator<Item = &Ball> {
        std::iter::once(&self.ball).chain(self.extra_balls.iter())
    }

    pub fn balls_mut(&mut self) -> impl Iterator<Item = &mut Ball> {
        std::iter::once(&mut self.ball).chain(self.extra_balls.iter_mut())
    }

    pub fn add_score(&mut self, points: u64) {
        self.score += points;
        if self.score > self.high_score {
            self.high_score = self.score;
        }
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Drop every transient collection and pending timer
    pub(crate) fn clear_transients(&mut self) {
        self.extra_balls.clear();
        self.drops.clear();
        self.effects.clear();
        self.particles.clear();
        self.ball.clear_trail();
        self.ball.penetrating = false;
        self.combo.reset();
        self.resume.cancel();
        self.shake = 0.0;
    }
}
