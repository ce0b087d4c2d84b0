//! Fragment fields: the burst of debris left behind when a body is destroyed
//!
//! A field owns a fixed set of small rects that fly apart, slow down, stop
//! against walls and obstacles, and get shoved around by live bodies. Enemy
//! debris fades out and is then removed; player debris stays for the rest of
//! the round.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::{Axis, min_axis_separation, push_impulse};
use super::rect::Rect;
use super::state::World;
use crate::consts::*;
use crate::heading_from_degrees;

/// Parameters that distinguish one kind of shatter from another
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShatterConfig {
    /// Number of fragments spawned
    pub count: usize,
    /// Initial speed range (min, max), pixels/s
    pub speed_range: (f32, f32),
    /// Whether fragments fade out and the field expires
    pub fade: bool,
}

impl ShatterConfig {
    /// Player debris: slow, permanent
    pub fn player(count: usize) -> Self {
        Self {
            count,
            speed_range: PLAYER_FRAGMENT_SPEED,
            fade: false,
        }
    }

    /// Enemy debris: fast, fades after a delay
    pub fn enemy(count: usize) -> Self {
        Self {
            count,
            speed_range: ENEMY_FRAGMENT_SPEED,
            fade: true,
        }
    }
}

impl Default for ShatterConfig {
    fn default() -> Self {
        Self::player(DEFAULT_FRAGMENT_COUNT)
    }
}

/// A single piece of debris
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fragment {
    pub rect: Rect,
    pub vel: Vec2,
    /// Opacity 0-255, only for fading fields
    pub alpha: Option<u8>,
}

impl Fragment {
    /// Opacity for drawing (non-fading debris is always opaque)
    pub fn opacity(&self) -> u8 {
        self.alpha.unwrap_or(u8::MAX)
    }

    fn push_from(&mut self, body: &Rect) {
        self.vel += push_impulse(self.rect.center(), body.center(), PUSH_IMPULSE);
    }

    fn integrate(&mut self, dt: f32) {
        self.rect.x += self.vel.x * dt;
        self.rect.y += self.vel.y * dt;

        if self.vel.length() > MIN_FRAGMENT_VELOCITY {
            self.vel *= FRAGMENT_VELOCITY_DECAY;
        } else {
            self.vel = Vec2::ZERO;
        }
    }

    fn contain(&mut self, world: &World<'_>) {
        let arena = world.arena;
        if self.rect.left() <= 0.0 || self.rect.right() >= arena.width {
            self.vel.x = 0.0;
            self.rect.x = self.rect.x.clamp(0.0, (arena.width - self.rect.w).max(0.0));
        }
        if self.rect.top() <= 0.0 || self.rect.bottom() >= arena.height {
            self.vel.y = 0.0;
            self.rect.y = self.rect.y.clamp(0.0, (arena.height - self.rect.h).max(0.0));
        }

        for obstacle in world.obstacles {
            if let Some(sep) = min_axis_separation(&self.rect, &obstacle.rect) {
                self.vel = Vec2::ZERO;
                match sep.axis {
                    Axis::X => self.rect.x = sep.position,
                    Axis::Y => self.rect.y = sep.position,
                }
            }
        }
    }
}

/// The debris of one destroyed body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FragmentField {
    pub fragments: Vec<Fragment>,
    pub color: [u8; 3],
    pub fade: bool,
    /// Simulation time the field was created (ms)
    pub created_ms: f64,
}

impl FragmentField {
    /// Burst a body of `size` at top-left `origin` into fragments.
    ///
    /// Each fragment is a fifth of the body's size, scattered within half a
    /// body-width of the origin and flung at a random heading.
    pub fn new<R: Rng + ?Sized>(
        origin: Vec2,
        size: f32,
        color: [u8; 3],
        config: ShatterConfig,
        now_ms: f64,
        rng: &mut R,
    ) -> Self {
        let fragment_size = (size / 5.0).floor();
        let half = (size / 2.0).floor() as i32;
        let (min_speed, max_speed) = config.speed_range;

        let fragments = (0..config.count)
            .map(|_| {
                let offset_x = rng.random_range(-half..=half) as f32;
                let offset_y = rng.random_range(-half..=half) as f32;
                let heading = rng.random_range(0.0..360.0);
                let speed = if max_speed > min_speed {
                    rng.random_range(min_speed..=max_speed)
                } else {
                    min_speed
                };
                Fragment {
                    rect: Rect::new(
                        origin.x + offset_x,
                        origin.y + offset_y,
                        fragment_size,
                        fragment_size,
                    ),
                    vel: heading_from_degrees(heading) * speed,
                    alpha: config.fade.then_some(u8::MAX),
                }
            })
            .collect();

        Self {
            fragments,
            color,
            fade: config.fade,
            created_ms: now_ms,
        }
    }

    /// Advance every fragment by `dt` seconds at simulation time `now_ms`
    pub fn update(&mut self, dt: f32, world: &World<'_>, now_ms: f64) {
        let fading = self.fade && now_ms - self.created_ms >= FADE_DELAY_MS;

        for fragment in &mut self.fragments {
            fragment.integrate(dt);
            fragment.contain(world);

            if fading {
                if let Some(alpha) = fragment.alpha.as_mut() {
                    *alpha = alpha.saturating_sub(FADE_STEP);
                }
            }
        }
    }

    /// Shove fragments away from any body they overlap.
    ///
    /// Bodies are first narrowed to a window around the first fragment; that
    /// is a cheap approximation of "near this field", not a per-fragment test.
    pub fn apply_pushback(&mut self, bodies: &[Rect]) {
        let Some(anchor) = self.fragments.first().map(|f| f.rect.center()) else {
            return;
        };

        let nearby: Vec<&Rect> = bodies
            .iter()
            .filter(|body| {
                let c = body.center();
                (c.x - anchor.x).abs() < PUSH_NEAR_WINDOW && (c.y - anchor.y).abs() < PUSH_NEAR_WINDOW
            })
            .collect();
        if nearby.is_empty() {
            return;
        }

        for fragment in &mut self.fragments {
            for body in &nearby {
                if fragment.rect.intersects(body) {
                    fragment.push_from(body);
                }
            }
        }
    }

    /// Shove fragments overlapping a single moving body
    pub fn push_from_body(&mut self, body: &Rect) {
        for fragment in &mut self.fragments {
            if fragment.rect.intersects(body) {
                fragment.push_from(body);
            }
        }
    }

    /// A fading field is done once every fragment is fully transparent
    pub fn is_expired(&self) -> bool {
        self.fade && self.fragments.iter().all(|f| f.alpha == Some(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rect::Arena;
    use crate::sim::state::Obstacle;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn open_world(arena: &Arena) -> World<'_> {
        World {
            arena: *arena,
            obstacles: &[],
            tick_dt: SIM_DT,
        }
    }

    fn single(rect: Rect, vel: Vec2, fade: bool) -> FragmentField {
        FragmentField {
            fragments: vec![Fragment {
                rect,
                vel,
                alpha: fade.then_some(255),
            }],
            color: ENEMY_COLOR,
            fade,
            created_ms: 0.0,
        }
    }

    #[test]
    fn test_spawn_shape() {
        let mut rng = Pcg32::seed_from_u64(7);
        let field = FragmentField::new(
            Vec2::new(300.0, 300.0),
            40.0,
            ENEMY_COLOR,
            ShatterConfig::enemy(25),
            0.0,
            &mut rng,
        );
        assert_eq!(field.fragments.len(), 25);
        for f in &field.fragments {
            assert_eq!(f.rect.w, 8.0);
            assert!(f.rect.x >= 280.0 && f.rect.x <= 320.0);
            assert!(f.rect.y >= 280.0 && f.rect.y <= 320.0);
            let speed = f.vel.length();
            assert!((99.9..=300.1).contains(&speed), "speed {speed}");
            assert_eq!(f.alpha, Some(255));
        }
    }

    #[test]
    fn test_default_config() {
        let config = ShatterConfig::default();
        assert_eq!(config.count, 15);
        assert!(!config.fade);
        assert_eq!(config.speed_range, (50.0, 150.0));
    }

    #[test]
    fn test_slow_fragment_stops_exactly() {
        let arena = Arena::default();
        let world = open_world(&arena);
        let mut field = single(
            Rect::new(400.0, 300.0, 8.0, 8.0),
            Vec2::new(3.0, 4.0),
            false,
        );
        field.update(SIM_DT, &world, 0.0);
        assert_eq!(field.fragments[0].vel, Vec2::ZERO);
        field.update(SIM_DT, &world, 16.0);
        assert_eq!(field.fragments[0].vel, Vec2::ZERO);
    }

    #[test]
    fn test_wall_zeroes_axis_and_clamps() {
        let arena = Arena::default();
        let world = open_world(&arena);
        let mut field = single(
            Rect::new(790.0, 300.0, 8.0, 8.0),
            Vec2::new(600.0, 60.0),
            false,
        );
        field.update(SIM_DT, &world, 0.0);
        let f = &field.fragments[0];
        assert_eq!(f.vel.x, 0.0);
        assert!(f.vel.y > 0.0);
        assert_eq!(f.rect.right(), 800.0);
    }

    #[test]
    fn test_obstacle_stops_and_ejects() {
        let arena = Arena::default();
        let obstacles = [Obstacle::new(200.0, 150.0, 100.0, 300.0)];
        let world = World {
            arena,
            obstacles: &obstacles,
            tick_dt: SIM_DT,
        };
        let mut field = single(
            Rect::new(190.0, 300.0, 8.0, 8.0),
            Vec2::new(300.0, 0.0),
            false,
        );
        field.update(SIM_DT, &world, 0.0);
        let f = &field.fragments[0];
        assert_eq!(f.vel, Vec2::ZERO);
        assert_eq!(f.rect.right(), 200.0);
        assert!(!f.rect.intersects(&obstacles[0].rect));
    }

    #[test]
    fn test_fade_schedule() {
        let arena = Arena::default();
        let world = open_world(&arena);
        let mut field = single(Rect::new(400.0, 300.0, 8.0, 8.0), Vec2::ZERO, true);

        let dt_ms = 1000.0 / 60.0;
        let mut now = 0.0;
        while now < 1000.0 - 1e-6 {
            field.update(SIM_DT, &world, now);
            assert_eq!(field.fragments[0].alpha, Some(255));
            now += dt_ms;
        }

        let mut now = 1000.0;
        for _ in 0..25 {
            field.update(SIM_DT, &world, now);
            now += dt_ms;
        }
        assert_eq!(field.fragments[0].alpha, Some(5));
        assert!(!field.is_expired());

        field.update(SIM_DT, &world, now);
        assert_eq!(field.fragments[0].alpha, Some(0));
        assert!(field.is_expired());

        field.update(SIM_DT, &world, now + dt_ms);
        assert_eq!(field.fragments[0].alpha, Some(0));
    }

    #[test]
    fn test_player_field_never_expires() {
        let arena = Arena::default();
        let world = open_world(&arena);
        let mut field = single(Rect::new(400.0, 300.0, 10.0, 10.0), Vec2::ZERO, false);
        for i in 0..600 {
            field.update(SIM_DT, &world, i as f64 * 16.0);
        }
        assert!(!field.is_expired());
        assert_eq!(field.fragments[0].opacity(), 255);
    }

    #[test]
    fn test_pushback_only_for_nearby_overlapping_bodies() {
        let mut field = single(Rect::new(100.0, 100.0, 10.0, 10.0), Vec2::ZERO, true);
        // Overlapping body to the left of the fragment center
        let body = Rect::new(90.0, 95.0, 15.0, 20.0);
        field.apply_pushback(&[body]);
        let v = field.fragments[0].vel;
        assert!(v.x > 0.0);
        assert!((v.length() - PUSH_IMPULSE).abs() < 1e-3);

        // Far away bodies are ignored entirely
        let mut field = single(Rect::new(100.0, 100.0, 10.0, 10.0), Vec2::ZERO, true);
        field.apply_pushback(&[Rect::new(500.0, 500.0, 40.0, 40.0)]);
        assert_eq!(field.fragments[0].vel, Vec2::ZERO);
    }

    #[test]
    fn test_pushback_with_coincident_centers_is_zero() {
        let mut field = single(Rect::new(100.0, 100.0, 10.0, 10.0), Vec2::ZERO, false);
        field.apply_pushback(&[Rect::new(95.0, 95.0, 20.0, 20.0)]);
        assert_eq!(field.fragments[0].vel, Vec2::ZERO);
    }

    proptest! {
        #[test]
        fn prop_speed_non_increasing(
            vx in -400.0f32..400.0,
            vy in -400.0f32..400.0,
            x in 100.0f32..600.0,
            y in 100.0f32..500.0,
        ) {
            let arena = Arena::default();
            let world = open_world(&arena);
            let mut field = single(Rect::new(x, y, 8.0, 8.0), Vec2::new(vx, vy), false);
            let mut last = field.fragments[0].vel.length();
            for i in 0..240 {
                field.update(SIM_DT, &world, i as f64 * 16.0);
                let speed = field.fragments[0].vel.length();
                prop_assert!(speed <= last + 1e-4);
                let r = field.fragments[0].rect;
                prop_assert!(arena.contains(&r));
                last = speed;
            }
            prop_assert_eq!(field.fragments[0].vel, Vec2::ZERO);
        }
    }
}
