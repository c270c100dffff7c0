//! Per-frame simulation tick
//!
//! Core game loop: consumes one frame of input, fires due timers, then moves
//! the paddle, balls and drops and checks for a cleared field, in that order.

use super::state::{GameEvent, GamePhase, GameState, Paddle};

/// Paddle intent for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum PaddleIntent {
    #[default]
    None,
    /// Move left by the paddle speed
    Left,
    /// Move right by the paddle speed
    Right,
    /// Centre the paddle on a pointer x position
    MoveTo(f32),
}

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub paddle: PaddleIntent,
    /// Run/pause toggle (space or click)
    pub toggle_run: bool,
    /// Advance to the next stage (only honoured in `StageClear`)
    pub next_stage: bool,
    /// Restart the whole session
    pub restart: bool,
}

/// Advance the game state by one frame of `dt_ms` milliseconds
pub fn tick(state: &mut GameState, input: &TickInput, dt_ms: f64) {
    state.events.clear();
    state.clock_ms += dt_ms.max(0.0);

    if input.restart {
        state.restart();
    }
    if input.next_stage {
        state.next_stage();
    }
    if input.toggle_run {
        state.toggle_run();
    }

    state.update_timers();

    if !state.running {
        return;
    }

    state.move_paddle(input.paddle);
    state.advance_balls();
    if state.running {
        state.update_drops();
    }
    state.check_field_cleared();
    state.update_fx();
}

impl GameState {
    /// Run/pause toggle
    pub fn toggle_run(&mut self) {
        match self.phase {
            GamePhase::Ready => {
                self.phase = GamePhase::Playing;
                self.running = true;
                log::info!("Stage {} started", self.stage);
            }
            GamePhase::Playing => {
                // A manual toggle overrides any pending respawn resume
                self.resume.cancel();
                self.running = !self.running;
                log::debug!("{}", if self.running { "Resumed" } else { "Paused" });
            }
            GamePhase::GameOver | GamePhase::GameWin => {
                self.restart();
                self.phase = GamePhase::Playing;
                self.running = true;
                log::info!("New run started");
            }
            GamePhase::StageClear => {
                log::debug!("Run toggle ignored while stage is clear");
            }
        }
    }

    /// Move on from `StageClear`; a no-op in any other phase
    pub fn next_stage(&mut self) {
        if self.phase != GamePhase::StageClear {
            log::debug!("Next stage ignored in {:?}", self.phase);
            return;
        }
        self.stage = (self.stage + 1).min(self.tuning.max_stages);
        self.clear_transients();
        self.reset_paddle_width();
        self.field.reset();
        self.reseed_ball();
        self.phase = GamePhase::Ready;
        self.running = false;
        log::info!(
            "Advanced to stage {} (ball x{:.1}, paddle {:.0}px)",
            self.stage,
            self.stage_speed_multiplier(),
            self.paddle.width
        );
    }

    /// Reset the session to its initial state, keeping the high score
    pub fn restart(&mut self) {
        self.score = 0;
        self.lives = self.tuning.starting_lives;
        self.stage = 1;
        self.clear_transients();
        self.paddle = Paddle::default();
        self.reset_paddle_width();
        self.field.reset();
        self.reseed_ball();
        self.phase = GamePhase::Ready;
        self.running = false;
        log::info!("Session restarted");
    }

    /// Fire every due deadline
    fn update_timers(&mut self) {
        if self.resume.fire(self.clock_ms) && self.phase == GamePhase::Playing {
            self.running = true;
            log::debug!("Respawn pause over");
        }
        self.combo.update(self.clock_ms);
        self.expire_effects();
    }

    fn move_paddle(&mut self, intent: PaddleIntent) {
        match intent {
            PaddleIntent::None => {}
            PaddleIntent::Left => self.paddle.move_by(-self.paddle.speed),
            PaddleIntent::Right => self.paddle.move_by(self.paddle.speed),
            PaddleIntent::MoveTo(x) if x.is_finite() => self.paddle.center_on(x),
            PaddleIntent::MoveTo(_) => {}
        }
    }

    fn check_field_cleared(&mut self) {
        if self.phase != GamePhase::Playing || !self.field.is_cleared() {
            return;
        }
        self.running = false;
        if self.stage >= self.tuning.max_stages {
            self.phase = GamePhase::GameWin;
            self.emit(GameEvent::GameWin { score: self.score });
            log::info!("All {} stages cleared, final score {}", self.stage, self.score);
        } else {
            self.phase = GamePhase::StageClear;
            self.emit(GameEvent::StageClear { stage: self.stage });
            log::info!("Stage {} clear, score {}", self.stage, self.score);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::powerup::PowerUpKind;
    use glam::Vec2;

    fn toggle() -> TickInput {
        TickInput {
            toggle_run: true,
            ..Default::default()
        }
    }

    /// Park the primary ball somewhere harmless
    fn park_ball(state: &mut GameState) {
        state.ball.pos = Vec2::new(400.0, 400.0);
        state.ball.vel = Vec2::ZERO;
    }

    #[test]
    fn test_tick_ready_to_playing() {
        let mut state = GameState::new(12345);
        assert_eq!(state.phase, GamePhase::Ready);

        // Tick without toggle - nothing moves
        let ball_before = state.ball.pos;
        tick(&mut state, &TickInput::default(), FRAME_MS);
        assert_eq!(state.ball.pos, ball_before);

        tick(&mut state, &toggle(), FRAME_MS);
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.running);
        assert_ne!(state.ball.pos, ball_before);
    }

    #[test]
    fn test_tick_pause() {
        let mut state = GameState::new(12345);
        tick(&mut state, &toggle(), FRAME_MS);
        assert!(state.running);

        tick(&mut state, &toggle(), FRAME_MS);
        assert!(!state.running);
        assert_eq!(state.phase, GamePhase::Playing);
        let frozen = state.ball.pos;
        tick(&mut state, &TickInput::default(), FRAME_MS);
        assert_eq!(state.ball.pos, frozen);

        tick(&mut state, &toggle(), FRAME_MS);
        assert!(state.running);
    }

    #[test]
    fn test_paddle_intents() {
        let mut state = GameState::new(1);
        tick(&mut state, &toggle(), FRAME_MS);
        park_ball(&mut state);
        let start = state.paddle.x;

        let left = TickInput {
            paddle: PaddleIntent::Left,
            ..Default::default()
        };
        tick(&mut state, &left, FRAME_MS);
        assert_eq!(state.paddle.x, start - PADDLE_SPEED);

        let pointer = TickInput {
            paddle: PaddleIntent::MoveTo(5_000.0),
            ..Default::default()
        };
        tick(&mut state, &pointer, FRAME_MS);
        assert_eq!(state.paddle.x, FIELD_WIDTH - state.paddle.width);

        let bogus = TickInput {
            paddle: PaddleIntent::MoveTo(f32::NAN),
            ..Default::default()
        };
        tick(&mut state, &bogus, FRAME_MS);
        assert_eq!(state.paddle.x, FIELD_WIDTH - state.paddle.width);
    }

    #[test]
    fn test_next_stage_only_from_stage_clear() {
        let mut state = GameState::new(2);
        state.next_stage();
        assert_eq!(state.stage, 1);
        assert_eq!(state.phase, GamePhase::Ready);
    }

    #[test]
    fn test_clearing_field_mid_game_gives_stage_clear() {
        let mut state = GameState::new(3);
        tick(&mut state, &toggle(), FRAME_MS);
        park_ball(&mut state);
        for i in 0..state.field.blocks.len() {
            state.field.destroy(i);
        }
        tick(&mut state, &TickInput::default(), FRAME_MS);
        assert_eq!(state.phase, GamePhase::StageClear);
        assert!(!state.running);
        assert!(state.events.contains(&GameEvent::StageClear { stage: 1 }));

        // Toggle is ignored here
        tick(&mut state, &toggle(), FRAME_MS);
        assert_eq!(state.phase, GamePhase::StageClear);

        let advance = TickInput {
            next_stage: true,
            ..Default::default()
        };
        tick(&mut state, &advance, FRAME_MS);
        assert_eq!(state.stage, 2);
        assert_eq!(state.phase, GamePhase::Ready);
        assert_eq!(state.field.visible_count(), 60);
        assert!((state.paddle.width - 135.0).abs() < 1e-4);
        assert!((state.ball.vel.y - BALL_START_SPEED_Y * 1.2).abs() < 1e-5);
    }

    #[test]
    fn test_clearing_last_stage_wins() {
        let mut state = GameState::new(4);
        state.stage = state.tuning.max_stages;
        tick(&mut state, &toggle(), FRAME_MS);
        park_ball(&mut state);
        for i in 0..state.field.blocks.len() {
            state.field.destroy(i);
        }
        tick(&mut state, &TickInput::default(), FRAME_MS);
        assert_eq!(state.phase, GamePhase::GameWin);
        assert!(!state.events.iter().any(|e| matches!(e, GameEvent::StageClear { .. })));
    }

    #[test]
    fn test_stage_advance_cancels_effects() {
        let mut state = GameState::new(5);
        tick(&mut state, &toggle(), FRAME_MS);
        state.apply_power_up(PowerUpKind::ExpandPaddle);
        state.apply_power_up(PowerUpKind::MultiBall);
        state.phase = GamePhase::StageClear;
        state.next_stage();
        assert!(state.effects.is_empty());
        assert!(state.extra_balls.is_empty());
        assert!((state.paddle.width - 135.0).abs() < 1e-4);
    }

    #[test]
    fn test_toggle_after_game_over_starts_fresh_run() {
        let mut state = GameState::new(6);
        state.phase = GamePhase::GameOver;
        state.lives = 0;
        state.score = 420;
        tick(&mut state, &toggle(), FRAME_MS);
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.running);
        assert_eq!(state.lives, 3);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_restart_cancels_pending_expiry() {
        let mut state = GameState::new(7);
        tick(&mut state, &toggle(), FRAME_MS);
        state.apply_power_up(PowerUpKind::ShrinkPaddle);
        let restart = TickInput {
            restart: true,
            ..Default::default()
        };
        tick(&mut state, &restart, FRAME_MS);
        tick(&mut state, &toggle(), FRAME_MS);
        state.apply_power_up(PowerUpKind::ExpandPaddle);
        // Past the shrink's old deadline but inside expand's
        for _ in 0..9 {
            tick(&mut state, &TickInput::default(), 1_000.0);
            park_ball(&mut state);
        }
        assert!(state.effect_active(PowerUpKind::ExpandPaddle));
        assert_eq!(state.paddle.width, 225.0);
    }
}
