//! Data-driven game balance
//!
//! Every gameplay knob that is a design choice rather than geometry lives
//! here. Defaults reproduce the canonical game; a JSON file can override any
//! subset of fields.

use serde::{Deserialize, Serialize};

use crate::sim::PowerUpKind;

/// Gameplay balance parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Number of stages; clearing the last one wins the game
    pub max_stages: u32,
    pub starting_lives: u8,
    /// Probability that a destroyed block drops a power-up
    pub drop_chance: f32,
    /// Pause after losing the primary ball while lives remain
    pub respawn_pause_ms: f64,
    /// Idle time after the last block hit before the combo resets
    pub combo_window_ms: f64,
    /// Base score per destroyed block
    pub block_score: u64,
    /// Bonus per combo level (awarded once the combo exceeds 1)
    pub combo_bonus: u64,
    /// Ball speed gain per stage after the first
    pub stage_speed_step: f32,
    /// Paddle baseline shrink per stage after the first
    pub stage_shrink_step: f32,
    /// Power-up drop fall speed (pixels per tick)
    pub drop_fall_speed: f32,
    pub expand_paddle_ms: f64,
    pub shrink_paddle_ms: f64,
    pub slow_ball_ms: f64,
    pub fast_ball_ms: f64,
    pub penetrate_ms: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            max_stages: 5,
            starting_lives: 3,
            drop_chance: 0.3,
            respawn_pause_ms: 1000.0,
            combo_window_ms: 2000.0,
            block_score: 10,
            combo_bonus: 5,
            stage_speed_step: 0.2,
            stage_shrink_step: 0.1,
            drop_fall_speed: 2.0,
            expand_paddle_ms: 10_000.0,
            shrink_paddle_ms: 8_000.0,
            slow_ball_ms: 8_000.0,
            fast_ball_ms: 6_000.0,
            penetrate_ms: 5_000.0,
        }
    }
}

impl Tuning {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "brick_rally_tuning";

    /// Parse a (possibly partial) JSON override
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Tuning>(json).map(Tuning::sanitized)
    }

    /// Clamp knobs into ranges the simulation can run with
    pub fn sanitized(mut self) -> Self {
        self.max_stages = self.max_stages.max(1);
        self.starting_lives = self.starting_lives.max(1);
        self.drop_chance = self.drop_chance.clamp(0.0, 1.0);
        self.respawn_pause_ms = self.respawn_pause_ms.max(0.0);
        self.combo_window_ms = self.combo_window_ms.max(0.0);
        self.drop_fall_speed = self.drop_fall_speed.max(0.1);
        // Last stage baseline must stay positive
        self.stage_shrink_step = self
            .stage_shrink_step
            .clamp(0.0, 0.9 / (self.max_stages.saturating_sub(1).max(1)) as f32);
        self.stage_speed_step = self.stage_speed_step.max(0.0);
        for ms in [
            &mut self.expand_paddle_ms,
            &mut self.shrink_paddle_ms,
            &mut self.slow_ball_ms,
            &mut self.fast_ball_ms,
            &mut self.penetrate_ms,
        ] {
            *ms = ms.max(0.0);
        }
        self
    }

    /// Effect duration for a power-up type (0 = one-shot)
    pub fn duration_ms(&self, kind: PowerUpKind) -> f64 {
        match kind {
            PowerUpKind::ExpandPaddle => self.expand_paddle_ms,
            PowerUpKind::ShrinkPaddle => self.shrink_paddle_ms,
            PowerUpKind::SlowBall => self.slow_ball_ms,
            PowerUpKind::FastBall => self.fast_ball_ms,
            PowerUpKind::MultiBall => 0.0,
            PowerUpKind::Penetrate => self.penetrate_ms,
        }
    }

    /// Ball speed multiplier for a stage (1-based)
    pub fn stage_speed_multiplier(&self, stage: u32) -> f32 {
        1.0 + stage.saturating_sub(1) as f32 * self.stage_speed_step
    }

    /// Paddle width multiplier for a stage (1-based)
    pub fn stage_width_multiplier(&self, stage: u32) -> f32 {
        1.0 - stage.saturating_sub(1) as f32 * self.stage_shrink_step
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_override_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{"max_stages": 3}"#).unwrap();
        assert_eq!(tuning.max_stages, 3);
        assert_eq!(tuning.block_score, 10);
        assert_eq!(tuning.combo_window_ms, 2000.0);
    }

    #[test]
    fn test_sanitize_clamps_chance_and_stages() {
        let tuning = Tuning::from_json(r#"{"drop_chance": 4.0, "max_stages": 0}"#).unwrap();
        assert_eq!(tuning.drop_chance, 1.0);
        assert_eq!(tuning.max_stages, 1);
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(Tuning::from_json("{max_stages: 3").is_err());
    }

    #[test]
    fn test_stage_scaling() {
        let tuning = Tuning::default();
        assert_eq!(tuning.stage_speed_multiplier(1), 1.0);
        assert!((tuning.stage_speed_multiplier(3) - 1.4).abs() < 1e-6);
        assert!((tuning.stage_width_multiplier(5) - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_multiball_is_one_shot() {
        assert_eq!(Tuning::default().duration_ms(PowerUpKind::MultiBall), 0.0);
    }
}
