//! Autonomous enemies
//!
//! Enemies never stop: they bounce off the arena edges and obstacles, pick a
//! fresh heading after repeated obstacle hits, and nudge their heading when
//! they notice they've stalled.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::{Axis, bounce, min_axis_separation};
use super::fragments::FragmentField;
use super::rect::Rect;
use super::state::World;
use crate::consts::*;
use crate::{heading_from_degrees, rotate_degrees};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    /// Top-left position (continuous)
    pub pos: Vec2,
    pub size: f32,
    /// Pixels per second
    pub speed: f32,
    /// Unit heading
    pub dir: Vec2,
    /// Collision box, top-left snapped to `pos.floor()`
    pub rect: Rect,
    /// Seconds spent (nearly) motionless
    pub stuck_timer: f32,
    /// Position at the end of the previous step
    pub last_pos: Vec2,
    /// Obstacle hits since the last random heading
    pub collision_count: u32,
}

impl Enemy {
    pub fn new(pos: Vec2, size: f32, speed: f32, dir: Vec2) -> Self {
        Self {
            pos,
            size,
            speed,
            dir: dir.normalize_or_zero(),
            rect: Rect::square(pos.floor(), size),
            stuck_timer: 0.0,
            last_pos: pos,
            collision_count: 0,
        }
    }

    /// Spawn with a uniformly random heading
    pub fn spawn<R: Rng + ?Sized>(pos: Vec2, size: f32, speed: f32, rng: &mut R) -> Self {
        Self::new(pos, size, speed, random_heading(rng))
    }

    /// Advance one step.
    ///
    /// `dt` is capped at one tick so a long frame can't fling the enemy
    /// through an obstacle. Player debris overlapping the enemy afterwards is
    /// shoved away.
    pub fn step<R: Rng + ?Sized>(
        &mut self,
        dt: f32,
        world: &World<'_>,
        shattered_player: Option<&mut FragmentField>,
        rng: &mut R,
    ) {
        let dt = dt.min(world.tick_dt);

        self.pos += self.dir * self.speed * dt;
        self.sync_rect();

        self.bounce_off_walls(world);
        self.bounce_off_obstacles(world, rng);

        // Obstacles near a wall can push us out; never leave the arena
        self.pos = world.arena.clamp_position(self.pos, self.size);
        self.sync_rect();

        self.update_stuck_timer(dt, rng);

        if let Some(field) = shattered_player {
            field.push_from_body(&self.rect);
        }
    }

    fn bounce_off_walls(&mut self, world: &World<'_>) {
        let max = Vec2::new(world.arena.width - self.size, world.arena.height - self.size);

        if self.pos.x < 0.0 {
            self.pos.x = 0.0;
            self.dir = bounce(self.dir, Vec2::X);
        } else if self.pos.x > max.x {
            self.pos.x = max.x;
            self.dir = bounce(self.dir, Vec2::NEG_X);
        }

        if self.pos.y < 0.0 {
            self.pos.y = 0.0;
            self.dir = bounce(self.dir, Vec2::Y);
        } else if self.pos.y > max.y {
            self.pos.y = max.y;
            self.dir = bounce(self.dir, Vec2::NEG_Y);
        }

        self.sync_rect();
    }

    fn bounce_off_obstacles<R: Rng + ?Sized>(&mut self, world: &World<'_>, rng: &mut R) {
        for obstacle in world.obstacles {
            let Some(sep) = min_axis_separation(&self.rect, &obstacle.rect) else {
                continue;
            };

            self.collision_count += 1;
            match sep.axis {
                Axis::X => self.pos.x = sep.position,
                Axis::Y => self.pos.y = sep.position,
            }
            self.dir = bounce(self.dir, sep.normal);
            self.sync_rect();

            if self.collision_count > MAX_COLLISIONS_BEFORE_RANDOM_DIRECTION {
                self.dir = random_heading(rng);
                self.collision_count = 0;
            }
        }
    }

    fn update_stuck_timer<R: Rng + ?Sized>(&mut self, dt: f32, rng: &mut R) {
        if self.last_pos.distance(self.pos) < STUCK_DISTANCE {
            self.stuck_timer += dt;
        } else {
            self.stuck_timer = 0.0;
        }

        if self.stuck_timer > STUCK_TIMEOUT {
            let turn = rng.random_range(-STUCK_MAX_TURN_DEG..=STUCK_MAX_TURN_DEG);
            let turned = rotate_degrees(self.dir, turn).normalize_or_zero();
            self.dir = if turned == Vec2::ZERO {
                random_heading(rng)
            } else {
                turned
            };
            self.stuck_timer = 0.0;
        }

        self.last_pos = self.pos;
    }

    fn sync_rect(&mut self) {
        self.rect.set_top_left(self.pos.floor());
    }
}

fn random_heading<R: Rng + ?Sized>(rng: &mut R) -> Vec2 {
    heading_from_degrees(rng.random_range(0.0..360.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::fragments::Fragment;
    use crate::sim::rect::Arena;
    use crate::sim::state::Obstacle;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(42)
    }

    #[test]
    fn test_right_wall_clamps_and_flips() {
        let arena = Arena::new(800.0, 600.0);
        let world = World::new(arena, &[], SIM_DT);
        let mut enemy = Enemy::new(Vec2::new(759.0, 300.0), 40.0, 120.0, Vec2::X);
        enemy.step(SIM_DT, &world, None, &mut rng());
        assert_eq!(enemy.pos.x, 760.0);
        assert!(enemy.dir.x < 0.0);
        assert_eq!(enemy.rect.right(), 800.0);
    }

    #[test]
    fn test_each_axis_reflects_independently() {
        let arena = Arena::new(800.0, 600.0);
        let world = World::new(arena, &[], SIM_DT);
        let dir = Vec2::new(-1.0, -1.0).normalize();
        let mut enemy = Enemy::new(Vec2::new(0.5, 0.5), 40.0, 120.0, dir);
        enemy.step(SIM_DT, &world, None, &mut rng());
        assert_eq!(enemy.pos, Vec2::ZERO);
        assert!(enemy.dir.x > 0.0 && enemy.dir.y > 0.0);
        assert!((enemy.dir.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_dt_is_capped_to_one_tick() {
        let arena = Arena::new(800.0, 600.0);
        let world = World::new(arena, &[], SIM_DT);
        let mut enemy = Enemy::new(Vec2::new(100.0, 100.0), 40.0, 120.0, Vec2::X);
        enemy.step(1.0, &world, None, &mut rng());
        assert!((enemy.pos.x - 102.0).abs() < 1e-4);
    }

    #[test]
    fn test_obstacle_bounce_on_shallow_axis() {
        let arena = Arena::new(800.0, 600.0);
        let obstacles = vec![Obstacle::new(200.0, 150.0, 100.0, 300.0)];
        let world = World::new(arena, &obstacles, SIM_DT);
        let mut enemy = Enemy::new(Vec2::new(159.0, 250.0), 40.0, 120.0, Vec2::X);
        enemy.step(SIM_DT, &world, None, &mut rng());
        assert_eq!(enemy.pos.x, 160.0);
        assert!(enemy.dir.x < 0.0);
        assert_eq!(enemy.collision_count, 1);
        assert!(!enemy.rect.intersects(&obstacles[0].rect));
    }

    #[test]
    fn test_repeated_hits_randomize_heading() {
        let arena = Arena::new(800.0, 600.0);
        let obstacles = vec![Obstacle::new(200.0, 150.0, 100.0, 300.0)];
        let world = World::new(arena, &obstacles, SIM_DT);
        let mut enemy = Enemy::new(Vec2::new(159.0, 250.0), 40.0, 120.0, Vec2::X);
        enemy.collision_count = MAX_COLLISIONS_BEFORE_RANDOM_DIRECTION;
        enemy.step(SIM_DT, &world, None, &mut rng());
        assert_eq!(enemy.collision_count, 0);
        assert!((enemy.dir.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_stall_perturbs_heading() {
        let arena = Arena::new(800.0, 600.0);
        let world = World::new(arena, &[], SIM_DT);
        // Zero speed: never moves, so the stall timer keeps accumulating
        let mut enemy = Enemy::new(Vec2::new(300.0, 300.0), 40.0, 0.0, Vec2::X);
        let mut rng = rng();
        for _ in 0..58 {
            enemy.step(SIM_DT, &world, None, &mut rng);
        }
        assert!(enemy.stuck_timer > 0.9);
        assert_eq!(enemy.dir, Vec2::X);

        for _ in 0..3 {
            enemy.step(SIM_DT, &world, None, &mut rng);
        }
        assert!(enemy.stuck_timer < 0.05);
        let angle = enemy.dir.y.atan2(enemy.dir.x).to_degrees();
        assert!(angle.abs() <= 45.0 + 1e-3);
        assert!((enemy.dir.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_pushes_player_debris() {
        let arena = Arena::new(800.0, 600.0);
        let world = World::new(arena, &[], SIM_DT);
        let mut enemy = Enemy::new(Vec2::new(300.0, 300.0), 40.0, 0.0, Vec2::X);
        let mut field = FragmentField {
            fragments: vec![Fragment {
                rect: Rect::new(300.0, 315.0, 10.0, 10.0),
                vel: Vec2::ZERO,
                alpha: None,
            }],
            color: PLAYER_COLOR,
            fade: false,
            created_ms: 0.0,
        };
        enemy.step(SIM_DT, &world, Some(&mut field), &mut rng());
        assert!(field.fragments[0].vel.x < 0.0);
    }

    proptest! {
        #[test]
        fn prop_enemy_stays_in_arena(
            seed in any::<u64>(),
            x in 0.0f32..760.0,
            y in 0.0f32..560.0,
            speed in 60.0f32..400.0,
        ) {
            let arena = Arena::new(800.0, 600.0);
            let world = World::new(arena, &[], SIM_DT);
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut enemy = Enemy::spawn(Vec2::new(x, y), 40.0, speed, &mut rng);
            for _ in 0..300 {
                enemy.step(SIM_DT, &world, None, &mut rng);
                prop_assert!(arena.contains(&enemy.rect));
                prop_assert!((enemy.dir.length() - 1.0).abs() < 1e-4);
            }
        }
    }
}
