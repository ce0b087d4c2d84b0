//! Echoes of Time - an arena arcade game where your past is the weapon
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, collisions, fragments, game state)
//! - `tuning`: Data-driven game balance
//! - `settings`: Player preferences, persisted as JSON
//! - `audio`: Sound trigger boundary (works with or without a device)

pub mod audio;
pub mod error;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::ConfigError;
pub use settings::Settings;
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    use std::time::Duration;

    /// Target simulation rate
    pub const TICKS_PER_SECOND: u32 = 60;
    /// Fixed simulation timestep
    pub const SIM_DT: f32 = 1.0 / TICKS_PER_SECOND as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Arena dimensions
    pub const ARENA_WIDTH: f32 = 800.0;
    pub const ARENA_HEIGHT: f32 = 600.0;

    /// Player defaults
    pub const PLAYER_SIZE: f32 = 50.0;
    pub const PLAYER_SPEED: f32 = 300.0; // pixels per second
    pub const PLAYER_START: (f32, f32) = (50.0, 50.0);

    /// Enemy defaults
    pub const ENEMY_SIZE: f32 = 40.0;
    pub const BASE_ENEMY_COUNT: u32 = 3;
    pub const ENEMY_COUNT_PER_LEVEL: u32 = 1;
    pub const BASE_ENEMY_SPEED: f32 = 120.0;
    pub const ENEMY_SPEED_PER_LEVEL: f32 = 20.0;
    /// Obstacle hits before the heading is fully re-randomized
    pub const MAX_COLLISIONS_BEFORE_RANDOM_DIRECTION: u32 = 3;
    /// Displacement below which an enemy counts as stalled
    pub const STUCK_DISTANCE: f32 = 1.0;
    /// Seconds of stall before the heading is perturbed
    pub const STUCK_TIMEOUT: f32 = 1.0;
    /// Max perturbation applied to a stalled heading (degrees)
    pub const STUCK_MAX_TURN_DEG: f32 = 45.0;

    /// Echo trail length in seconds
    pub const ECHO_DURATION: f32 = 2.0;
    /// Points awarded per enemy destroyed by an echo
    pub const ECHO_SCORE: u64 = 10;

    /// Fragment kinematics
    pub const FRAGMENT_VELOCITY_DECAY: f32 = 0.95;
    /// Below this speed a fragment comes to rest
    pub const MIN_FRAGMENT_VELOCITY: f32 = 5.0;
    pub const FRAGMENT_COUNT: usize = 25;
    pub const DEFAULT_FRAGMENT_COUNT: usize = 15;
    pub const PLAYER_FRAGMENT_SPEED: (f32, f32) = (50.0, 150.0);
    pub const ENEMY_FRAGMENT_SPEED: (f32, f32) = (100.0, 300.0);
    pub const FADE_DELAY_MS: f64 = 1000.0;
    pub const FADE_STEP: u8 = 10;
    /// Velocity added to a fragment shoved by a body
    pub const PUSH_IMPULSE: f32 = 100.0;
    /// Half-width of the window used to pick bodies near a fragment field
    pub const PUSH_NEAR_WINDOW: f32 = 200.0;

    /// Spawn placement
    pub const MIN_SPAWN_DISTANCE: f32 = 100.0;
    pub const SPAWN_EDGE_BUFFER: f32 = 50.0;
    pub const SPAWN_MAX_ATTEMPTS: u32 = 500;
    pub const SPAWN_TIME_BUDGET: Duration = Duration::from_secs(1);

    /// Player/enemy broad-phase padding
    pub const BROAD_PHASE_INFLATE: f32 = 50.0;
    /// Death screen can't be dismissed before this
    pub const DEATH_DISMISS_DELAY_MS: f64 = 500.0;

    /// Colors (RGB)
    pub const PLAYER_COLOR: [u8; 3] = [0, 120, 215];
    pub const ENEMY_COLOR: [u8; 3] = [0, 255, 0];
    pub const ECHO_COLOR: [u8; 3] = [139, 0, 0];
    pub const OBSTACLE_COLOR: [u8; 3] = [0, 0, 0];
}

/// Rotate a vector by an angle in degrees (positive is clockwise on screen)
#[inline]
pub fn rotate_degrees(v: Vec2, degrees: f32) -> Vec2 {
    Vec2::from_angle(degrees.to_radians()).rotate(v)
}

/// Unit vector pointing along a heading in degrees
#[inline]
pub fn heading_from_degrees(degrees: f32) -> Vec2 {
    Vec2::from_angle(degrees.to_radians())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotate_degrees_quarter_turn() {
        let v = rotate_degrees(Vec2::X, 90.0);
        assert!(v.x.abs() < 1e-5);
        assert!((v.y - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_heading_is_unit() {
        for deg in [0.0, 33.0, 180.0, 271.5] {
            assert!((heading_from_degrees(deg).length() - 1.0).abs() < 1e-5);
        }
    }
}
