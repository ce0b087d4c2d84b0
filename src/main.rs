//! Echoes of Time entry point
//!
//! Headless runner: loads settings, then lets the autopilot play for a while
//! through the same fixed-step loop a windowed frontend would use.
//!
//! Usage: `echoes-of-time [SETTINGS_JSON] [SECONDS]`

use std::time::{SystemTime, UNIX_EPOCH};

use echoes_of_time::Settings;
use echoes_of_time::audio::{AudioManager, LogBackend};
use echoes_of_time::consts::*;
use echoes_of_time::sim::{GameEvent, GamePhase, GameState, TickInput, tick};

/// Host frame length the runner pretends to have (50 fps display)
const FRAME_DT: f32 = 0.02;
const DEFAULT_SECONDS: f32 = 60.0;

/// Game instance holding all state
struct Game {
    state: GameState,
    audio: AudioManager,
    accumulator: f32,
    input: TickInput,
    deaths: u32,
    best_score: u64,
    best_level: u32,
}

impl Game {
    fn new(settings: &Settings, seed: u64) -> Self {
        let mut audio = AudioManager::new(Some(Box::new(LogBackend)));
        audio.apply_settings(settings);
        Self {
            state: GameState::new(seed, settings.tuning.clone()),
            audio,
            accumulator: 0.0,
            input: TickInput {
                idle_mode: true,
                ..Default::default()
            },
            deaths: 0,
            best_score: 0,
            best_level: 1,
        }
    }

    /// Run simulation ticks
    fn update(&mut self, dt: f32) {
        let dt = dt.min(0.1);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(&mut self.state, &self.input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;

            // Clear one-shot inputs after processing
            self.input.echo = false;
            self.input.pause = false;
            self.input.dismiss = false;

            self.best_score = self.best_score.max(self.state.score);
            self.best_level = self.best_level.max(self.state.level.number);
        }

        let events = self.state.drain_events();
        self.deaths += events.iter().filter(|e| **e == GameEvent::PlayerDied).count() as u32;
        self.audio.handle_events(&events);
    }
}

fn pick_seed(settings: &Settings) -> u64 {
    settings.seed.unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0)
    })
}

fn main() {
    env_logger::init();
    log::info!("Echoes of Time starting...");

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => Settings::load_or_default(path),
        None => Settings::default(),
    };
    let seconds = args
        .next()
        .and_then(|s| s.parse::<f32>().ok())
        .unwrap_or(DEFAULT_SECONDS);

    let seed = pick_seed(&settings);
    log::info!("Game initialized with seed: {}", seed);
    let mut game = Game::new(&settings, seed);

    let frames = (seconds / FRAME_DT).ceil() as u64;
    for _ in 0..frames {
        game.update(FRAME_DT);
    }

    let frame = game.state.frame();
    log::info!(
        "Ran {} ticks over {} rounds: best score {}, best level {}, {} deaths",
        game.state.time_ticks,
        frame.hud.round,
        game.best_score,
        game.best_level,
        game.deaths
    );
    if frame.hud.phase == GamePhase::Dead {
        log::info!("Finished on the death screen");
    }
    println!(
        "seed={} ticks={} rounds={} best_score={} best_level={} deaths={}",
        seed, game.state.time_ticks, frame.hud.round, game.best_score, game.best_level, game.deaths
    );
}
