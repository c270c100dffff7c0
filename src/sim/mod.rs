//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only (separate stream for cosmetic effects)
//! - Timers are deadlines on the simulation clock, checked once per tick
//! - Stable iteration order (blocks are hidden, never removed)
//! - No rendering, audio or platform dependencies

pub mod balls;
pub mod combo;
pub mod field;
pub mod fx;
pub mod geometry;
pub mod powerup;
pub mod snapshot;
pub mod state;
pub mod tick;
pub mod timer;

pub use balls::{BallSlot, BallStep, DestroyedBlock, step_ball};
pub use combo::Combo;
pub use field::BlockField;
pub use geometry::{
    Collision, ImpactAxis, Rect, impact_axis, resolve_block, resolve_paddle, resolve_walls,
};
pub use powerup::{ActiveEffect, EffectSlot, PowerUpDrop, PowerUpKind};
pub use snapshot::Snapshot;
pub use state::{Ball, Block, GameEvent, GamePhase, GameState, Paddle, Particle, TrailPoint};
pub use tick::{PaddleIntent, TickInput, tick};
pub use timer::Timer;
