//! Read-only view of a session for rendering and HUD display

use glam::Vec2;
use serde::Serialize;

use super::geometry::Rect;
use super::powerup::PowerUpKind;
use super::state::{GamePhase, GameState, Particle};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BallView {
    pub pos: Vec2,
    pub radius: f32,
    pub penetrating: bool,
    /// False for multi-ball extras
    pub primary: bool,
    /// Newest first
    pub trail: Vec<Vec2>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockView {
    pub rect: Rect,
    pub color: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DropView {
    pub rect: Rect,
    pub kind: PowerUpKind,
    pub symbol: char,
    pub color: u32,
}

/// HUD entry for a timed effect
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EffectView {
    pub kind: PowerUpKind,
    pub symbol: char,
    pub color: u32,
    /// Whole seconds left, rounded up
    pub remaining_secs: u32,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub running: bool,
    pub paddle: Rect,
    pub balls: Vec<BallView>,
    /// Visible blocks only
    pub blocks: Vec<BlockView>,
    pub drops: Vec<DropView>,
    pub particles: Vec<Particle>,
    pub effects: Vec<EffectView>,
    /// Current combo level (0 when idle)
    pub combo: u32,
    pub score: u64,
    pub lives: u8,
    pub stage: u32,
    pub high_score: u64,
    pub shake: f32,
}

impl Snapshot {
    pub fn capture(state: &GameState) -> Self {
        let balls = state
            .balls()
            .enumerate()
            .map(|(i, ball)| BallView {
                pos: ball.pos,
                radius: ball.radius,
                penetrating: ball.penetrating,
                primary: i == 0,
                trail: ball.trail.iter().map(|p| p.pos).collect(),
            })
            .collect();

        let blocks = state
            .field
            .visible()
            .map(|block| BlockView {
                rect: block.rect,
                color: block.color,
            })
            .collect();

        let drops = state
            .drops
            .iter()
            .map(|drop| DropView {
                rect: drop.rect(),
                kind: drop.kind,
                symbol: drop.kind.symbol(),
                color: drop.kind.color(),
            })
            .collect();

        let effects = state
            .effects
            .iter()
            .map(|effect| EffectView {
                kind: effect.kind,
                symbol: effect.kind.symbol(),
                color: effect.kind.color(),
                remaining_secs: effect
                    .expiry
                    .remaining_ms(state.clock_ms)
                    .map_or(0, |ms| (ms / 1000.0).ceil() as u32),
            })
            .collect();

        Self {
            phase: state.phase,
            running: state.running,
            paddle: state.paddle.rect(),
            balls,
            blocks,
            drops,
            particles: state.particles.clone(),
            effects,
            combo: state.combo.count,
            score: state.score,
            lives: state.lives,
            stage: state.stage,
            high_score: state.high_score,
            shake: state.shake,
        }
    }

    /// Serialize for an external renderer
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl GameState {
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::tick::{TickInput, tick};

    #[test]
    fn test_fresh_snapshot() {
        let snap = GameState::new(1).snapshot();
        assert_eq!(snap.phase, GamePhase::Ready);
        assert_eq!(snap.blocks.len(), 60);
        assert_eq!(snap.balls.len(), 1);
        assert!(snap.balls[0].primary);
        assert!(snap.effects.is_empty());
        assert_eq!(snap.lives, 3);
    }

    #[test]
    fn test_effect_countdown_rounds_up() {
        let mut state = GameState::new(2);
        state.apply_power_up(PowerUpKind::Penetrate);
        assert_eq!(state.snapshot().effects[0].remaining_secs, 5);
        state.clock_ms = 4_001.0;
        let snap = state.snapshot();
        assert_eq!(snap.effects[0].remaining_secs, 1);
        assert_eq!(snap.effects[0].symbol, 'P');
    }

    #[test]
    fn test_snapshot_serializes() {
        let mut state = GameState::new(3);
        let input = TickInput {
            toggle_run: true,
            ..Default::default()
        };
        tick(&mut state, &input, 16.0);
        let json = state.snapshot().to_json().unwrap();
        assert!(json.contains("\"phase\":\"Playing\""));
        assert!(json.contains("\"blocks\""));
    }
}
