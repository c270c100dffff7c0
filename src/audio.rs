//! Audio cue mapping
//!
//! Turns simulation events into oscillator descriptions an audio backend can
//! play. Nothing here touches a sound device.

use serde::Serialize;

use crate::settings::Settings;
use crate::sim::GameEvent;

/// Peak gain of a tone before volume scaling
const BASE_GAIN: f32 = 0.1;
/// Gain every envelope decays to
pub const RELEASE_GAIN: f32 = 0.01;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SoundEffect {
    /// Ball hits paddle
    PaddleHit,
    /// Ball hits wall
    WallHit,
    /// Block destroyed
    BlockBreak,
    /// Combo continued; pitch rises with level
    Combo(u32),
    /// Power-up caught
    PickupCollect,
    /// Timed effect ran out
    EffectExpired,
    /// Primary ball lost
    BallLost,
    /// Stage cleared
    StageClear,
    GameOver,
    GameWin,
}

impl SoundEffect {
    pub fn from_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::BlockDestroyed { .. } => Some(SoundEffect::BlockBreak),
            GameEvent::PaddleHit => Some(SoundEffect::PaddleHit),
            GameEvent::WallHit => Some(SoundEffect::WallHit),
            GameEvent::PowerUpCollected { .. } => Some(SoundEffect::PickupCollect),
            GameEvent::PowerUpExpired { .. } => Some(SoundEffect::EffectExpired),
            GameEvent::ComboHit { level } => Some(SoundEffect::Combo(*level)),
            GameEvent::BallLost { lives_left } if *lives_left > 0 => Some(SoundEffect::BallLost),
            // The game-over jingle covers the last ball
            GameEvent::BallLost { .. } => None,
            GameEvent::StageClear { .. } => Some(SoundEffect::StageClear),
            GameEvent::GameOver { .. } => Some(SoundEffect::GameOver),
            GameEvent::GameWin { .. } => Some(SoundEffect::GameWin),
        }
    }

    /// Oscillator layers making up this effect, at unit volume
    pub fn tones(&self) -> Vec<Tone> {
        match self {
            SoundEffect::BlockBreak => vec![Tone::new(800.0, 0.1, Waveform::Square)],
            SoundEffect::PaddleHit => vec![Tone::new(200.0, 0.1, Waveform::Sine)],
            SoundEffect::WallHit => vec![Tone::new(400.0, 0.08, Waveform::Sine).gain(0.5)],
            SoundEffect::Combo(level) => {
                // Semitone per level above 2, capped at an octave
                let steps = level.saturating_sub(2).min(12) as f32;
                let freq = 880.0 * 2f32.powf(steps / 12.0);
                vec![Tone::new(freq, 0.08, Waveform::Triangle).delay(0.05)]
            }
            SoundEffect::PickupCollect => arpeggio(&[600.0, 800.0, 1000.0], 0.08, 0.15, Waveform::Sine),
            SoundEffect::EffectExpired => {
                vec![Tone::new(600.0, 0.2, Waveform::Triangle).sweep_to(300.0).gain(0.6)]
            }
            SoundEffect::BallLost => vec![Tone::new(300.0, 0.5, Waveform::Sine).sweep_to(60.0)],
            SoundEffect::StageClear => arpeggio(&[400.0, 500.0, 600.0, 800.0], 0.1, 0.4, Waveform::Triangle),
            SoundEffect::GameOver => arpeggio(&[400.0, 350.0, 300.0, 200.0], 0.2, 0.3, Waveform::Sine),
            SoundEffect::GameWin => {
                arpeggio(&[500.0, 600.0, 700.0, 800.0, 1000.0], 0.08, 0.25, Waveform::Triangle)
            }
        }
    }
}

/// Notes played one after another
fn arpeggio(freqs: &[f32], spacing: f32, duration: f32, waveform: Waveform) -> Vec<Tone> {
    freqs
        .iter()
        .enumerate()
        .map(|(i, &freq)| Tone::new(freq, duration, waveform).delay(i as f32 * spacing))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Waveform {
    Sine,
    Square,
    Triangle,
    Sawtooth,
}

/// One oscillator with an exponential gain decay to `RELEASE_GAIN`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Tone {
    pub frequency: f32,
    /// Exponential pitch ramp target over the tone's duration
    pub end_frequency: Option<f32>,
    pub waveform: Waveform,
    /// Seconds
    pub duration: f32,
    /// Seconds after the cue starts
    pub delay: f32,
    pub gain: f32,
}

impl Tone {
    pub fn new(frequency: f32, duration: f32, waveform: Waveform) -> Self {
        Self {
            frequency,
            end_frequency: None,
            waveform,
            duration,
            delay: 0.0,
            gain: BASE_GAIN,
        }
    }

    fn sweep_to(mut self, frequency: f32) -> Self {
        self.end_frequency = Some(frequency);
        self
    }

    fn delay(mut self, secs: f32) -> Self {
        self.delay = secs;
        self
    }

    /// Scale the peak gain
    fn gain(mut self, factor: f32) -> Self {
        self.gain *= factor;
        self
    }
}

/// A sound ready for playback at the mixer's volume
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cue {
    pub effect: SoundEffect,
    pub tones: Vec<Tone>,
}

/// Applies volume and mute to event-driven sounds
#[derive(Debug, Clone)]
pub struct AudioMixer {
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl Default for AudioMixer {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

impl AudioMixer {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            master_volume: settings.master_volume.clamp(0.0, 1.0),
            sfx_volume: settings.sfx_volume.clamp(0.0, 1.0),
            muted: settings.muted,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Cue for a single effect, or `None` when silent
    pub fn cue(&self, effect: SoundEffect) -> Option<Cue> {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return None;
        }
        let tones = effect
            .tones()
            .into_iter()
            .map(|mut tone| {
                tone.gain *= vol;
                tone
            })
            .collect();
        Some(Cue { effect, tones })
    }

    /// Cues for one tick's worth of events, in event order
    pub fn cues(&self, events: &[GameEvent]) -> Vec<Cue> {
        events
            .iter()
            .filter_map(SoundEffect::from_event)
            .filter_map(|effect| self.cue(effect))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::PowerUpKind;

    #[test]
    fn test_block_and_paddle_tones() {
        let block = SoundEffect::BlockBreak.tones();
        assert_eq!(block.len(), 1);
        assert_eq!(block[0].frequency, 800.0);
        assert_eq!(block[0].waveform, Waveform::Square);
        assert_eq!(block[0].duration, 0.1);

        let paddle = SoundEffect::PaddleHit.tones();
        assert_eq!(paddle[0].frequency, 200.0);
        assert_eq!(paddle[0].waveform, Waveform::Sine);
    }

    #[test]
    fn test_combo_pitch_rises_then_caps() {
        let freq = |level| SoundEffect::Combo(level).tones()[0].frequency;
        assert!(freq(3) > freq(2));
        assert!((freq(14) - 1760.0).abs() < 0.5);
        assert_eq!(freq(14), freq(40));
    }

    #[test]
    fn test_final_ball_lost_is_silent() {
        assert_eq!(
            SoundEffect::from_event(&GameEvent::BallLost { lives_left: 0 }),
            None
        );
        assert_eq!(
            SoundEffect::from_event(&GameEvent::BallLost { lives_left: 2 }),
            Some(SoundEffect::BallLost)
        );
    }

    #[test]
    fn test_mixer_scales_and_mutes() {
        let mut mixer = AudioMixer::default();
        mixer.set_master_volume(0.5);
        mixer.set_sfx_volume(1.0);
        let events = [
            GameEvent::PaddleHit,
            GameEvent::PowerUpCollected {
                kind: PowerUpKind::SlowBall,
            },
        ];
        let cues = mixer.cues(&events);
        assert_eq!(cues.len(), 2);
        assert!((cues[0].tones[0].gain - 0.05).abs() < 1e-6);
        assert_eq!(cues[1].tones.len(), 3);

        mixer.set_muted(true);
        assert!(mixer.cues(&events).is_empty());
    }

    #[test]
    fn test_mixer_follows_settings() {
        let settings = Settings {
            muted: true,
            ..Default::default()
        };
        assert!(AudioMixer::from_settings(&settings).cue(SoundEffect::WallHit).is_none());
    }
}
