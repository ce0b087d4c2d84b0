//! Game state and core simulation types
//!
//! Everything a round needs lives in `GameState`. The simulation clock, the
//! RNG and the event queue are all explicit so a run can be replayed from its
//! seed.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::echo::{Echo, history_capacity};
use super::enemy::Enemy;
use super::fragments::{FragmentField, ShatterConfig};
use super::player::Player;
use super::rect::{Arena, Rect};
use super::spawn::{SpawnBudget, SpawnRequest, find_spawn_position};
use crate::consts::*;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Everything frozen
    Paused,
    /// Player shattered; waiting for the death screen to be dismissed
    Dead,
}

/// Something the presentation layer may want to react to (sound, flashes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A new echo started replaying
    EchoCreated,
    /// An echo destroyed an enemy
    EnemyShattered,
    /// An enemy caught the player
    PlayerDied,
    /// All enemies cleared
    LevelAdvanced { level: u32 },
    PauseToggled { paused: bool },
    RoundStarted { round: u32 },
}

/// A static wall block
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub rect: Rect,
}

impl Obstacle {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            rect: Rect::new(x, y, w, h),
        }
    }
}

/// Static surroundings shared by every moving body during a tick
#[derive(Debug, Clone, Copy)]
pub struct World<'a> {
    pub arena: Arena,
    pub obstacles: &'a [Obstacle],
    /// Length of one fixed tick (s); enemies never step further than this
    pub tick_dt: f32,
}

impl<'a> World<'a> {
    pub fn new(arena: Arena, obstacles: &'a [Obstacle], tick_dt: f32) -> Self {
        Self {
            arena,
            obstacles,
            tick_dt,
        }
    }
}

/// Difficulty for one level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub number: u32,
    pub enemy_count: u32,
    pub enemy_speed: f32,
}

impl Level {
    pub fn new(number: u32, tuning: &Tuning) -> Self {
        Self {
            number,
            enemy_count: tuning.base_enemy_count + tuning.enemy_count_per_level * number,
            enemy_speed: tuning.base_enemy_speed + tuning.enemy_speed_per_level * number as f32,
        }
    }
}

/// Complete state of one game session
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub arena: Arena,
    pub obstacles: Vec<Obstacle>,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub echoes: Vec<Echo>,
    /// Fading debris of destroyed enemies
    pub shattered_enemies: Vec<FragmentField>,
    /// Debris of the player, at most one per round
    pub shattered_player: Option<FragmentField>,
    pub level: Level,
    pub score: u64,
    pub phase: GamePhase,
    /// Rounds started this session
    pub round: u32,
    /// Simulation clock (ms), frozen while paused
    pub clock_ms: f64,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// When the player died, if they have
    pub death_time_ms: Option<f64>,
    /// Events raised since the last drain
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new session and start its first round
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let arena = Arena::new(tuning.arena_width, tuning.arena_height);
        let obstacles = tuning
            .obstacles
            .iter()
            .map(|&[x, y, w, h]| Obstacle::new(x, y, w, h))
            .collect();
        let player = Self::fresh_player(&tuning);
        let level = Level::new(1, &tuning);

        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            arena,
            obstacles,
            player,
            enemies: Vec::new(),
            echoes: Vec::new(),
            shattered_enemies: Vec::new(),
            shattered_player: None,
            level,
            score: 0,
            phase: GamePhase::Playing,
            round: 0,
            clock_ms: 0.0,
            time_ticks: 0,
            death_time_ms: None,
            events: Vec::new(),
        };
        state.start_round();
        state
    }

    fn fresh_player(tuning: &Tuning) -> Player {
        let (x, y) = tuning.player_start;
        Player::new(
            Vec2::new(x, y),
            tuning.player_size,
            tuning.player_speed,
            history_capacity(tuning.echo_duration, tuning.ticks_per_second),
        )
    }

    /// Length of one fixed tick in seconds
    pub fn tick_dt(&self) -> f32 {
        1.0 / self.tuning.ticks_per_second as f32
    }

    /// Reset to level 1 with a fresh player and wave
    pub fn start_round(&mut self) {
        self.round += 1;
        self.player = Self::fresh_player(&self.tuning);
        self.enemies.clear();
        self.echoes.clear();
        self.shattered_enemies.clear();
        self.shattered_player = None;
        self.level = Level::new(1, &self.tuning);
        self.score = 0;
        self.phase = GamePhase::Playing;
        self.death_time_ms = None;
        self.spawn_wave();

        log::info!(
            "Round {} started: level {}, {} enemies",
            self.round,
            self.level.number,
            self.enemies.len()
        );
        self.events.push(GameEvent::RoundStarted { round: self.round });
    }

    /// Tear down the current round's live entities
    pub fn end_round(&mut self) {
        log::info!(
            "Round {} ended: score {}, level {}",
            self.round,
            self.score,
            self.level.number
        );
        self.enemies.clear();
        self.echoes.clear();
        self.shattered_enemies.clear();
        self.shattered_player = None;
    }

    /// Place the current level's enemies; spots that can't be found are skipped
    pub fn spawn_wave(&mut self) {
        let size = self.tuning.enemy_size;
        for _ in 0..self.level.enemy_count {
            let request = SpawnRequest {
                arena: self.arena,
                player: self.player.rect,
                obstacles: &self.obstacles,
                enemies: &self.enemies,
                min_distance: self.tuning.min_spawn_distance,
                size,
            };
            match find_spawn_position(&request, SpawnBudget::default(), &mut self.rng) {
                Some(pos) => {
                    let enemy = Enemy::spawn(pos, size, self.level.enemy_speed, &mut self.rng);
                    self.enemies.push(enemy);
                }
                None => log::warn!("Skipping enemy: no free spawn position"),
            }
        }
    }

    /// Move to the next level once the arena is clear
    pub fn advance_level(&mut self) {
        self.level = Level::new(self.level.number + 1, &self.tuning);
        self.spawn_wave();
        self.echoes.clear();
        log::info!(
            "Level {}: {} enemies at speed {}",
            self.level.number,
            self.enemies.len(),
            self.level.enemy_speed
        );
        self.events.push(GameEvent::LevelAdvanced {
            level: self.level.number,
        });
    }

    /// Start an echo from the player's recent trail.
    ///
    /// Only while playing, and only if there's a trail to replay.
    pub fn emit_echo(&mut self) -> bool {
        if self.phase != GamePhase::Playing || self.player.history.is_empty() {
            return false;
        }
        self.echoes.push(Echo::new(&self.player.history, self.player.size));
        log::debug!("Echo emitted ({} points)", self.player.history.len());
        self.events.push(GameEvent::EchoCreated);
        true
    }

    /// Flip between playing and paused (no effect once dead)
    pub fn toggle_pause(&mut self) {
        let paused = match self.phase {
            GamePhase::Playing => true,
            GamePhase::Paused => false,
            GamePhase::Dead => return,
        };
        self.phase = if paused {
            GamePhase::Paused
        } else {
            GamePhase::Playing
        };
        self.events.push(GameEvent::PauseToggled { paused });
    }

    /// Shatter the player and switch to the death screen
    pub fn kill_player(&mut self) {
        let config = ShatterConfig::player(self.tuning.fragment_count);
        self.shattered_player = Some(FragmentField::new(
            self.player.pos,
            self.player.size,
            PLAYER_COLOR,
            config,
            self.clock_ms,
            &mut self.rng,
        ));
        self.player.visible = false;
        self.phase = GamePhase::Dead;
        self.death_time_ms = Some(self.clock_ms);
        log::info!("Player died at level {} with score {}", self.level.number, self.score);
        self.events.push(GameEvent::PlayerDied);
    }

    /// Destroy the enemy at `index`, leaving fading debris
    pub fn shatter_enemy(&mut self, index: usize) {
        let enemy = self.enemies.remove(index);
        let config = ShatterConfig::enemy(self.tuning.fragment_count);
        self.shattered_enemies.push(FragmentField::new(
            enemy.pos,
            enemy.size,
            ENEMY_COLOR,
            config,
            self.clock_ms,
            &mut self.rng,
        ));
        self.events.push(GameEvent::EnemyShattered);
    }

    /// Milliseconds since the player died
    pub fn time_since_death_ms(&self) -> Option<f64> {
        self.death_time_ms.map(|t| self.clock_ms - t)
    }

    /// Whether the death screen may be dismissed yet
    pub fn can_dismiss_death(&self) -> bool {
        self.phase == GamePhase::Dead
            && self
                .time_since_death_ms()
                .is_some_and(|t| t >= DEATH_DISMISS_DELAY_MS)
    }

    /// Take all events raised since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
