//! Enemy spawn placement
//!
//! Rejection sampling over the arena interior. The search is bounded both by
//! attempt count and by wall-clock time; running out of either means "skip
//! this enemy", never an error.

use std::time::{Duration, Instant};

use glam::Vec2;
use rand::Rng;

use super::enemy::Enemy;
use super::rect::{Arena, Rect};
use super::state::Obstacle;
use crate::consts::*;

/// Limits on a single placement search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnBudget {
    pub max_attempts: u32,
    pub max_duration: Duration,
}

impl Default for SpawnBudget {
    fn default() -> Self {
        Self {
            max_attempts: SPAWN_MAX_ATTEMPTS,
            max_duration: SPAWN_TIME_BUDGET,
        }
    }
}

/// What a candidate spot has to stay clear of
#[derive(Debug, Clone, Copy)]
pub struct SpawnRequest<'a> {
    pub arena: Arena,
    /// Player's collision box
    pub player: Rect,
    pub obstacles: &'a [Obstacle],
    /// Enemies already placed this wave
    pub enemies: &'a [Enemy],
    /// Minimum player-center to enemy-center gap, before adding half the enemy size
    pub min_distance: f32,
    /// Footprint of the enemy being placed
    pub size: f32,
}

impl SpawnRequest<'_> {
    /// Would an enemy with its top-left at `pos` be acceptable?
    pub fn accepts(&self, pos: Vec2) -> bool {
        let rect = Rect::square(pos, self.size);
        let center = rect.center();

        if self.player.center().distance(center) < self.min_distance + self.size / 2.0 {
            return false;
        }
        if self.obstacles.iter().any(|o| rect.intersects(&o.rect)) {
            return false;
        }
        if self
            .enemies
            .iter()
            .any(|e| e.rect.center().distance(center) < (self.size + e.size) / 2.0)
        {
            return false;
        }
        self.arena.contains(&rect)
    }
}

/// Search for a free spawn spot (top-left corner).
///
/// Candidates are whole-pixel positions at least `SPAWN_EDGE_BUFFER` in from
/// every edge. Returns `None` once either budget limit is hit.
pub fn find_spawn_position<R: Rng + ?Sized>(
    request: &SpawnRequest<'_>,
    budget: SpawnBudget,
    rng: &mut R,
) -> Option<Vec2> {
    let min = SPAWN_EDGE_BUFFER as i32;
    let max_x = (request.arena.width - request.size - SPAWN_EDGE_BUFFER) as i32;
    let max_y = (request.arena.height - request.size - SPAWN_EDGE_BUFFER) as i32;
    if max_x < min || max_y < min {
        log::warn!(
            "Arena {}x{} too small to spawn size {}",
            request.arena.width,
            request.arena.height,
            request.size
        );
        return None;
    }

    let started = Instant::now();
    let mut attempts = 0;
    while attempts < budget.max_attempts && started.elapsed() < budget.max_duration {
        attempts += 1;
        let pos = Vec2::new(
            rng.random_range(min..=max_x) as f32,
            rng.random_range(min..=max_y) as f32,
        );
        if request.accepts(pos) {
            return Some(pos);
        }
    }

    log::debug!(
        "No spawn spot after {} attempts in {:?}",
        attempts,
        started.elapsed()
    );
    None
}
