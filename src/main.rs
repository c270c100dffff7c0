//! Brick Rally headless runner
//!
//! Plays a session with a tracking autopilot at the nominal frame rate,
//! logging events and audio cues, then persists the high score.
//!
//! Usage: `brick-rally [seed] [data-dir]` (`RUST_LOG=debug` for detail)

use std::time::{SystemTime, UNIX_EPOCH};

use brick_rally::audio::AudioMixer;
use brick_rally::consts::*;
use brick_rally::sim::{GameEvent, GamePhase, GameState, PaddleIntent, TickInput, tick};
use brick_rally::storage::{FileStore, KeyValueStore, StorageError};
use brick_rally::{HighScore, Settings, Tuning};

/// Ten minutes of simulated play
const MAX_FRAMES: u64 = 60 * 60 * 10;
const DEFAULT_DATA_DIR: &str = ".brick-rally";

/// Runner holding the session and its collaborators
struct Game {
    state: GameState,
    mixer: AudioMixer,
    best: HighScore,
    input: TickInput,
    last_phase: GamePhase,
    frames: u64,
}

impl Game {
    fn new(seed: u64, tuning: Tuning, settings: &Settings, best: HighScore) -> Self {
        let state = GameState::with_config(seed, tuning, settings.effect_limits())
            .with_high_score(best.score);
        let last_phase = state.phase;
        Self {
            state,
            mixer: AudioMixer::from_settings(settings),
            best,
            input: TickInput::default(),
            last_phase,
            frames: 0,
        }
    }

    /// Decide this frame's input from the current state
    fn drive(&mut self) {
        self.input = TickInput {
            paddle: autopilot(&self.state),
            ..Default::default()
        };
        match self.state.phase {
            GamePhase::Ready => self.input.toggle_run = true,
            GamePhase::StageClear => self.input.next_stage = true,
            _ => {}
        }
    }

    /// Advance one frame; returns false once the session has ended
    fn update(&mut self) -> bool {
        self.drive();
        tick(&mut self.state, &self.input, FRAME_MS);
        self.frames += 1;

        for event in &self.state.events {
            report(event);
        }
        for cue in self.mixer.cues(&self.state.events) {
            log::trace!("cue {:?} ({} tones)", cue.effect, cue.tones.len());
        }

        let phase = self.state.phase;
        if phase != self.last_phase {
            log::debug!("Phase {:?} -> {:?}", self.last_phase, phase);
            self.last_phase = phase;
        }
        !matches!(phase, GamePhase::GameOver | GamePhase::GameWin)
    }
}

/// Follow the lowest descending ball, hitting off-centre to steer it inward
fn autopilot(state: &GameState) -> PaddleIntent {
    let target = state
        .balls()
        .filter(|b| b.vel.y > 0.0)
        .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
        .or_else(|| state.balls().next());
    match target {
        Some(ball) => {
            let lean = (ball.pos.x - FIELD_WIDTH / 2.0) / FIELD_WIDTH * state.paddle.width * 0.5;
            PaddleIntent::MoveTo(ball.pos.x + lean)
        }
        None => PaddleIntent::None,
    }
}

fn report(event: &GameEvent) {
    match event {
        GameEvent::BlockDestroyed { .. } | GameEvent::PaddleHit | GameEvent::WallHit => {
            log::trace!("{:?}", event)
        }
        GameEvent::ComboHit { level } => log::debug!("Combo x{}", level),
        GameEvent::PowerUpCollected { kind } => log::info!("Collected {}", kind.label()),
        GameEvent::PowerUpExpired { kind } => log::debug!("{} wore off", kind.label()),
        GameEvent::BallLost { lives_left } => log::info!("Ball lost ({} left)", lives_left),
        GameEvent::StageClear { .. } | GameEvent::GameOver { .. } | GameEvent::GameWin { .. } => {}
    }
}

fn load_tuning(store: &dyn KeyValueStore) -> Tuning {
    match store.get(Tuning::STORAGE_KEY) {
        Ok(Some(json)) => match Tuning::from_json(&json) {
            Ok(tuning) => {
                log::info!("Loaded tuning overrides");
                tuning
            }
            Err(e) => {
                log::warn!("Ignoring unreadable tuning: {}", e);
                Tuning::default()
            }
        },
        Ok(None) => Tuning::default(),
        Err(e) => {
            log::warn!("Tuning storage unavailable: {}", e);
            Tuning::default()
        }
    }
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

fn run() -> Result<(), StorageError> {
    let mut args = std::env::args().skip(1);
    let seed = match args.next() {
        Some(arg) => arg.parse().unwrap_or_else(|_| {
            log::warn!("Seed {:?} is not a number, using clock", arg);
            clock_seed()
        }),
        None => clock_seed(),
    };
    let data_dir = args.next().unwrap_or_else(|| DEFAULT_DATA_DIR.to_string());

    let mut store = FileStore::open(&data_dir)?;
    let tuning = load_tuning(&store);
    let settings = Settings::load(&store);
    let best = HighScore::load(&store);

    log::info!("Brick Rally starting (seed {}, data in {})", seed, data_dir);
    let mut game = Game::new(seed, tuning, &settings, best);
    while game.frames < MAX_FRAMES && game.update() {}

    let state = &game.state;
    log::info!(
        "Finished after {:.1}s: {:?}, stage {}, score {}, lives {}",
        state.clock_ms / 1000.0,
        state.phase,
        state.stage,
        state.score,
        state.lives
    );

    if game.best.submit(state.score, state.stage) {
        log::info!("New high score!");
        game.best.save(&mut store)?;
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
