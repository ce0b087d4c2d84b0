//! Data-driven game balance
//!
//! Defaults reproduce the stock game. Any field missing from a JSON file
//! falls back to its default.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Arena ===
    pub arena_width: f32,
    pub arena_height: f32,
    pub ticks_per_second: u32,
    /// Obstacle rects as `[x, y, w, h]`
    pub obstacles: Vec<[f32; 4]>,

    // === Player ===
    pub player_size: f32,
    pub player_speed: f32,
    pub player_start: (f32, f32),
    /// Seconds of trail an echo replays
    pub echo_duration: f32,
    pub echo_score: u64,

    // === Enemies ===
    pub enemy_size: f32,
    pub base_enemy_count: u32,
    pub enemy_count_per_level: u32,
    pub base_enemy_speed: f32,
    pub enemy_speed_per_level: f32,
    pub min_spawn_distance: f32,

    // === Debris ===
    pub fragment_count: usize,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,
            ticks_per_second: TICKS_PER_SECOND,
            obstacles: vec![
                [200.0, 150.0, 100.0, 300.0],
                [500.0, 100.0, 50.0, 400.0],
                [350.0, 250.0, 100.0, 100.0],
            ],

            player_size: PLAYER_SIZE,
            player_speed: PLAYER_SPEED,
            player_start: PLAYER_START,
            echo_duration: ECHO_DURATION,
            echo_score: ECHO_SCORE,

            enemy_size: ENEMY_SIZE,
            base_enemy_count: BASE_ENEMY_COUNT,
            enemy_count_per_level: ENEMY_COUNT_PER_LEVEL,
            base_enemy_speed: BASE_ENEMY_SPEED,
            enemy_speed_per_level: ENEMY_SPEED_PER_LEVEL,
            min_spawn_distance: MIN_SPAWN_DISTANCE,

            fragment_count: FRAGMENT_COUNT,
        }
    }
}

impl Tuning {
    /// Parse from JSON and validate
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values the simulation can't run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));

        if self.ticks_per_second == 0 {
            return invalid("ticks_per_second must be positive".into());
        }
        for (name, value) in [
            ("arena_width", self.arena_width),
            ("arena_height", self.arena_height),
            ("player_size", self.player_size),
            ("enemy_size", self.enemy_size),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return invalid(format!("{name} must be positive, got {value}"));
            }
        }
        if self.player_speed < 0.0 || self.base_enemy_speed < 0.0 || self.echo_duration < 0.0 {
            return invalid("speeds and durations can't be negative".into());
        }

        let smaller_side = self.arena_width.min(self.arena_height);
        if self.player_size >= smaller_side || self.enemy_size >= smaller_side {
            return invalid(format!(
                "bodies must fit in the {}x{} arena",
                self.arena_width, self.arena_height
            ));
        }

        let (sx, sy) = self.player_start;
        if sx < 0.0
            || sy < 0.0
            || sx + self.player_size > self.arena_width
            || sy + self.player_size > self.arena_height
        {
            return invalid(format!("player_start ({sx}, {sy}) is outside the arena"));
        }

        for &[x, y, w, h] in &self.obstacles {
            if w <= 0.0 || h <= 0.0 || x < 0.0 || y < 0.0 || x + w > self.arena_width || y + h > self.arena_height {
                return invalid(format!("obstacle [{x}, {y}, {w}, {h}] is outside the arena"));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let tuning = Tuning::from_json(r#"{ "player_speed": 250.0, "fragment_count": 10 }"#).unwrap();
        assert_eq!(tuning.player_speed, 250.0);
        assert_eq!(tuning.fragment_count, 10);
        assert_eq!(tuning.arena_width, ARENA_WIDTH);
        assert_eq!(tuning.obstacles.len(), 3);
    }

    #[test]
    fn test_rejects_zero_tick_rate() {
        let err = Tuning::from_json(r#"{ "ticks_per_second": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_obstacle_outside_arena() {
        let mut tuning = Tuning::default();
        tuning.obstacles.push([780.0, 10.0, 50.0, 50.0]);
        assert!(matches!(tuning.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = Tuning::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
