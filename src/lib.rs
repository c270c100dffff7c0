//! Brick Rally - a staged brick-breaker simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, power-ups, game state)
//! - `tuning`: Data-driven game balance
//! - `settings`: Presentation preferences (particles, trails, shake, volume)
//! - `storage`: Keyed persistence for settings and the high score
//! - `audio`: Maps simulation events to tone descriptions

pub mod audio;
pub mod highscores;
pub mod settings;
pub mod sim;
pub mod storage;
pub mod tuning;

pub use highscores::HighScore;
pub use settings::{QualityPreset, Settings};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Nominal frame duration (60 Hz render cadence)
    pub const FRAME_MS: f64 = 1000.0 / 60.0;

    /// Play field dimensions
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 600.0;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 150.0;
    pub const PADDLE_HEIGHT: f32 = 15.0;
    pub const PADDLE_SPEED: f32 = 8.0;
    /// Distance from the paddle's top edge to the bottom of the field
    pub const PADDLE_BOTTOM_OFFSET: f32 = 30.0;
    pub const PADDLE_MIN_WIDTH: f32 = 50.0;
    pub const PADDLE_MAX_WIDTH: f32 = 300.0;
    /// Extra depth below the paddle top that still counts as a paddle hit
    pub const PADDLE_HIT_SLACK: f32 = 10.0;
    /// Horizontal exit speed per unit of off-centre hit position
    pub const PADDLE_ANGLE_FACTOR: f32 = 5.0;

    /// Ball defaults (velocities are pixels per tick)
    pub const BALL_RADIUS: f32 = 10.0;
    pub const BALL_START_SPEED_Y: f32 = 2.5;
    /// Width of the random horizontal launch range, centred on zero
    pub const BALL_START_SPREAD_X: f32 = 3.0;
    pub const BALL_MAX_SPEED: f32 = 8.0;
    /// Respawn height above the paddle
    pub const BALL_SPAWN_HEIGHT: f32 = 100.0;
    /// Velocity gain applied on every non-penetrating block bounce
    pub const BLOCK_BOUNCE_GAIN: f32 = 1.01;

    /// Block grid
    pub const BLOCK_ROWS: usize = 6;
    pub const BLOCK_COLS: usize = 10;
    pub const BLOCK_WIDTH: f32 = 75.0;
    pub const BLOCK_HEIGHT: f32 = 25.0;
    pub const BLOCK_PADDING: f32 = 5.0;
    pub const BLOCK_OFFSET_TOP: f32 = 60.0;
    /// Row colours, cycled by row index
    pub const BLOCK_PALETTE: [u32; 6] = [0xff6b6b, 0x4ecdc4, 0x45b7d1, 0x96ceb4, 0xffeaa7, 0xdda0dd];

    /// Power-up drop size (square)
    pub const DROP_SIZE: f32 = 20.0;

    /// Particles emitted per destroyed block
    pub const PARTICLES_PER_BLOCK: usize = 8;
    /// Screen shake added per destroyed block
    pub const SHAKE_PER_BLOCK: f32 = 0.15;
}
