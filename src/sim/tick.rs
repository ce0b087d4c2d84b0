//! Fixed timestep simulation tick
//!
//! Core game loop that advances the simulation by one step. Order within a
//! tick matters and is fixed:
//! 1. pause / echo / dismiss inputs
//! 2. player movement, history, death check (playing only)
//! 3. echo replay against enemies
//! 4. debris pushback, level clear check
//! 5. enemy movement (playing or dead)
//! 6. debris updates and removal of faded enemy debris

use glam::Vec2;

use super::rect::Rect;
use super::state::{GamePhase, GameState, World};
use crate::consts::*;

/// Autopilot emits an echo when the nearest enemy is closer than this
const IDLE_ECHO_RANGE: f32 = 160.0;
/// Autopilot ignores steering components smaller than this
const IDLE_STEER_DEADZONE: f32 = 0.3;

/// Input commands for a single tick (already edge-detected by the caller)
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    /// Emit an echo
    pub echo: bool,
    /// Pause toggle
    pub pause: bool,
    /// Dismiss the death screen
    pub dismiss: bool,
    /// Idle/demo mode - the game plays itself
    pub idle_mode: bool,
}

impl TickInput {
    /// Raw (unnormalized) movement intent
    pub fn direction(&self) -> Vec2 {
        let mut dir = Vec2::ZERO;
        if self.left {
            dir.x -= 1.0;
        }
        if self.right {
            dir.x += 1.0;
        }
        if self.up {
            dir.y -= 1.0;
        }
        if self.down {
            dir.y += 1.0;
        }
        dir
    }
}

/// Advance the game state by `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    let input = if input.idle_mode {
        idle_input(state, input)
    } else {
        *input
    };

    if input.pause {
        state.toggle_pause();
    }
    if state.phase == GamePhase::Paused {
        return;
    }

    state.time_ticks += 1;
    state.clock_ms += f64::from(dt) * 1000.0;

    if input.echo {
        state.emit_echo();
    }

    if input.dismiss && state.can_dismiss_death() {
        state.end_round();
        state.start_round();
        return;
    }

    match state.phase {
        GamePhase::Playing => {
            move_player(state, &input, dt);
            check_player_caught(state);
            replay_echoes(state);
            push_debris(state);

            if state.enemies.is_empty() {
                state.advance_level();
            }
        }
        GamePhase::Dead => {
            state.player.visible = false;
            update_player_debris(state, dt);
        }
        GamePhase::Paused => {}
    }

    step_enemies(state, dt);
    update_enemy_debris(state, dt);
}

fn move_player(state: &mut GameState, input: &TickInput, dt: f32) {
    let world = World::new(state.arena, &state.obstacles, state.tick_dt());
    let player = &mut state.player;

    player.visible = true;
    let displacement = player.movement_vector(input.direction(), dt);
    player.apply_movement(displacement, &world, &mut state.shattered_enemies);
    player.record_history();
}

fn check_player_caught(state: &mut GameState) {
    let player = state.player.rect;
    let zone = player.inflate(BROAD_PHASE_INFLATE, BROAD_PHASE_INFLATE);

    let caught = state
        .enemies
        .iter()
        .filter(|enemy| enemy.rect.intersects(&zone))
        .any(|enemy| enemy.rect.intersects(&player));
    if caught {
        state.kill_player();
    }
}

fn replay_echoes(state: &mut GameState) {
    let mut echoes = std::mem::take(&mut state.echoes);

    echoes.retain_mut(|echo| {
        if echo.advance().is_none() {
            return false;
        }
        match state.enemies.iter().position(|e| e.rect.intersects(&echo.rect)) {
            Some(index) => {
                state.shatter_enemy(index);
                state.score += state.tuning.echo_score;
                log::debug!("Echo hit an enemy, score {}", state.score);
                false
            }
            None => true,
        }
    });

    state.echoes = echoes;
}

fn push_debris(state: &mut GameState) {
    let enemies: Vec<Rect> = state.enemies.iter().map(|e| e.rect).collect();

    if let Some(field) = state.shattered_player.as_mut() {
        let mut bodies = Vec::with_capacity(enemies.len() + 1);
        bodies.push(state.player.rect);
        bodies.extend_from_slice(&enemies);
        field.apply_pushback(&bodies);
    }
    for field in &mut state.shattered_enemies {
        field.apply_pushback(&enemies);
    }
}

fn update_player_debris(state: &mut GameState, dt: f32) {
    let world = World::new(state.arena, &state.obstacles, state.tick_dt());
    if let Some(field) = state.shattered_player.as_mut() {
        field.update(dt, &world, state.clock_ms);
    }
}

fn step_enemies(state: &mut GameState, dt: f32) {
    let world = World::new(state.arena, &state.obstacles, state.tick_dt());
    for enemy in &mut state.enemies {
        enemy.step(dt, &world, state.shattered_player.as_mut(), &mut state.rng);
    }
}

fn update_enemy_debris(state: &mut GameState, dt: f32) {
    let world = World::new(state.arena, &state.obstacles, state.tick_dt());
    for field in &mut state.shattered_enemies {
        field.update(dt, &world, state.clock_ms);
    }
    state.shattered_enemies.retain(|field| !field.is_expired());
}

/// Demo-mode input: run from the nearest enemy, drift back toward the middle,
/// and fire an echo when something gets close.
fn idle_input(state: &GameState, input: &TickInput) -> TickInput {
    let mut input = TickInput {
        idle_mode: true,
        pause: input.pause,
        ..Default::default()
    };

    match state.phase {
        GamePhase::Dead => input.dismiss = state.can_dismiss_death(),
        GamePhase::Playing => {
            let center = state.player.rect.center();
            let nearest = state.enemies.iter().min_by(|a, b| {
                a.rect
                    .center()
                    .distance_squared(center)
                    .partial_cmp(&b.rect.center().distance_squared(center))
                    .unwrap_or(std::cmp::Ordering::Equal)
            });

            if let Some(enemy) = nearest {
                let away = center - enemy.rect.center();
                let to_middle = (state.arena.bounds().center() - center).normalize_or_zero();
                let steer = away.normalize_or_zero() + to_middle * 0.5;

                input.left = steer.x < -IDLE_STEER_DEADZONE;
                input.right = steer.x > IDLE_STEER_DEADZONE;
                input.up = steer.y < -IDLE_STEER_DEADZONE;
                input.down = steer.y > IDLE_STEER_DEADZONE;

                let trail_ready = state.player.history.len() * 2 >= state.player.history.capacity();
                input.echo = state.echoes.is_empty() && trail_ready && away.length() < IDLE_ECHO_RANGE;
            }
        }
        GamePhase::Paused => {}
    }

    input
}
