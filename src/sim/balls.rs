//! Ball entity manager
//!
//! Moves each ball one tick, resolves walls, paddle and blocks in that order,
//! and turns the outcome into score, combo, drop and event side effects.

use glam::Vec2;

use super::field::BlockField;
use super::geometry::{Rect, resolve_block, resolve_paddle, resolve_walls};
use super::state::{Ball, GameEvent, GamePhase, GameState};
use crate::consts::*;

/// A block removed by a ball this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DestroyedBlock {
    pub index: usize,
    pub center: Vec2,
    pub color: u32,
}

/// What happened to one ball during one tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BallStep {
    pub wall_hit: bool,
    pub paddle_hit: bool,
    pub destroyed: Option<DestroyedBlock>,
    /// Fell past the bottom edge
    pub lost: bool,
}

/// Which ball to advance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BallSlot {
    Primary,
    Extra(usize),
}

/// Move a ball by its velocity and resolve every collision for this tick
///
/// At most one block is resolved per call: the first visible block in grid
/// order that the ball overlaps.
pub fn step_ball(ball: &mut Ball, paddle: &Rect, field: &mut BlockField) -> BallStep {
    let mut step = BallStep::default();

    ball.pos += ball.vel;

    let wall = resolve_walls(ball.pos, ball.radius, ball.vel, FIELD_WIDTH);
    ball.pos = wall.pos;
    ball.vel = wall.vel;
    step.wall_hit = wall.hit;

    let bounce = resolve_paddle(ball.pos, ball.radius, ball.vel, ball.max_speed, paddle);
    ball.pos = bounce.pos;
    ball.vel = bounce.vel;
    step.paddle_hit = bounce.hit;

    for (index, block) in field.blocks.iter().enumerate() {
        if !block.visible {
            continue;
        }
        let hit = resolve_block(ball.pos, ball.radius, ball.vel, &block.rect, ball.penetrating);
        if hit.hit {
            ball.pos = hit.pos;
            ball.vel = hit.vel;
            step.destroyed = Some(DestroyedBlock {
                index,
                center: block.rect.center(),
                color: block.color,
            });
            break;
        }
    }
    if let Some(destroyed) = step.destroyed {
        field.destroy(destroyed.index);
    }

    step.lost = ball.pos.y + ball.radius > FIELD_HEIGHT;
    step
}

impl GameState {
    /// Advance one ball and apply the side effects; returns whether it is
    /// still in play. A lost extra ball is left for the caller to remove.
    pub fn advance_ball(&mut self, slot: BallSlot) -> bool {
        let paddle = self.paddle.rect();
        let trail_length = self.limits.trail_length;
        let ball = match slot {
            BallSlot::Primary => &mut self.ball,
            BallSlot::Extra(i) => match self.extra_balls.get_mut(i) {
                Some(ball) => ball,
                None => return false,
            },
        };
        let step = step_ball(ball, &paddle, &mut self.field);
        ball.record_trail(trail_length);

        if step.wall_hit {
            self.emit(GameEvent::WallHit);
        }
        if step.paddle_hit {
            self.emit(GameEvent::PaddleHit);
        }
        if let Some(block) = step.destroyed {
            self.on_block_destroyed(block);
        }
        if step.lost {
            if slot == BallSlot::Primary {
                self.lose_primary_ball();
            }
            return false;
        }
        true
    }

    /// Advance the primary ball, then the extras in reverse so removal is safe
    pub(crate) fn advance_balls(&mut self) {
        if !self.advance_ball(BallSlot::Primary) {
            // Respawn pause or game over: nothing else moves this tick
            return;
        }
        for i in (0..self.extra_balls.len()).rev() {
            if !self.advance_ball(BallSlot::Extra(i)) {
                self.extra_balls.remove(i);
            }
        }
    }

    fn on_block_destroyed(&mut self, block: DestroyedBlock) {
        let bonus = self.combo.register_hit(
            self.clock_ms,
            self.tuning.combo_window_ms,
            self.tuning.combo_bonus,
        );
        self.add_score(self.tuning.block_score + bonus);
        self.emit(GameEvent::BlockDestroyed { color: block.color });
        if self.combo.count > 1 {
            self.emit(GameEvent::ComboHit {
                level: self.combo.count,
            });
        }

        self.spawn_debris(block.center, block.color);
        self.bump_shake(SHAKE_PER_BLOCK);
        self.maybe_spawn_drop(block.center);
    }

    fn lose_primary_ball(&mut self) {
        self.lives = self.lives.saturating_sub(1);
        self.combo.reset();
        self.extra_balls.clear();
        self.emit(GameEvent::BallLost {
            lives_left: self.lives,
        });

        self.running = false;
        if self.lives > 0 {
            self.reseed_ball();
            self.resume.schedule(self.clock_ms, self.tuning.respawn_pause_ms);
            log::info!("Ball lost, {} lives left", self.lives);
        } else {
            self.resume.cancel();
            self.phase = GamePhase::GameOver;
            self.emit(GameEvent::GameOver { score: self.score });
            log::info!("Game over at stage {} with score {}", self.stage, self.score);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paddle_rect() -> Rect {
        Rect::new(325.0, 570.0, 150.0, 15.0)
    }

    #[test]
    fn test_step_moves_ball() {
        let mut field = BlockField::new();
        let mut ball = Ball::new(Vec2::new(400.0, 400.0), Vec2::new(1.0, 2.0));
        let step = step_ball(&mut ball, &paddle_rect(), &mut field);
        assert_eq!(ball.pos, Vec2::new(401.0, 402.0));
        assert_eq!(step, BallStep::default());
    }

    #[test]
    fn test_one_block_per_tick() {
        let mut field = BlockField::new();
        // Straddles the gap between blocks 0 and 1 in the bottom row
        let gap_x = field.blocks[51].rect.x - BLOCK_PADDING / 2.0;
        let bottom = field.blocks[51].rect.bottom();
        let mut ball = Ball::new(Vec2::new(gap_x, bottom + 8.0), Vec2::new(0.0, -1.0));
        let step = step_ball(&mut ball, &paddle_rect(), &mut field);
        assert_eq!(step.destroyed.map(|d| d.index), Some(50));
        assert_eq!(field.visible_count(), 59);
        assert!(ball.vel.y > 0.0);
    }

    #[test]
    fn test_penetrating_ball_keeps_course() {
        let mut field = BlockField::new();
        let target = field.blocks[55].rect;
        let mut ball = Ball::new(Vec2::new(target.center().x, target.bottom() + 9.0), Vec2::new(0.0, -2.0));
        ball.penetrating = true;
        let step = step_ball(&mut ball, &paddle_rect(), &mut field);
        assert_eq!(step.destroyed.map(|d| d.index), Some(55));
        assert_eq!(ball.vel, Vec2::new(0.0, -2.0));
    }

    #[test]
    fn test_ball_past_bottom_is_lost() {
        let mut field = BlockField::new();
        let mut ball = Ball::new(Vec2::new(50.0, 589.0), Vec2::new(0.0, 2.0));
        let step = step_ball(&mut ball, &paddle_rect(), &mut field);
        assert!(step.lost);
    }

    #[test]
    fn test_block_destruction_scores_and_combos() {
        let mut state = GameState::new(3);
        state.running = true;
        state.phase = GamePhase::Playing;
        state.on_block_destroyed(DestroyedBlock {
            index: 0,
            center: Vec2::new(40.0, 72.5),
            color: 0xff6b6b,
        });
        state.on_block_destroyed(DestroyedBlock {
            index: 1,
            center: Vec2::new(120.0, 72.5),
            color: 0xff6b6b,
        });
        assert_eq!(state.score, 10 + 10 + 2 * 5);
        assert_eq!(state.combo.count, 2);
        assert!(state.events.contains(&GameEvent::ComboHit { level: 2 }));
    }

    #[test]
    fn test_losing_extra_ball_is_free() {
        let mut state = GameState::new(4);
        state.running = true;
        state.phase = GamePhase::Playing;
        state
            .extra_balls
            .push(Ball::new(Vec2::new(50.0, 595.0), Vec2::new(0.0, 3.0)));
        assert!(!state.advance_ball(BallSlot::Extra(0)));
        assert_eq!(state.lives, 3);
        assert!(state.running);
    }

    #[test]
    fn test_losing_primary_schedules_respawn() {
        let mut state = GameState::new(5);
        state.running = true;
        state.phase = GamePhase::Playing;
        state.combo.register_hit(0.0, 2000.0, 5);
        state
            .extra_balls
            .push(Ball::new(Vec2::new(200.0, 300.0), Vec2::new(1.0, 1.0)));
        state.ball.pos = Vec2::new(50.0, 595.0);
        state.ball.vel = Vec2::new(0.0, 3.0);

        assert!(!state.advance_ball(BallSlot::Primary));
        assert_eq!(state.lives, 2);
        assert!(!state.running);
        assert!(state.resume.is_pending());
        assert!(state.extra_balls.is_empty());
        assert_eq!(state.combo.count, 0);
        assert_eq!(state.ball.pos, Vec2::new(400.0, 470.0));
    }
}
