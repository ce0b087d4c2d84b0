//! The player-controlled square
//!
//! Movement is resolved one axis at a time against obstacles so the player
//! slides along walls instead of snagging on corners.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::echo::History;
use super::fragments::FragmentField;
use super::rect::Rect;
use super::state::World;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Top-left position (continuous)
    pub pos: Vec2,
    pub size: f32,
    /// Pixels per second
    pub speed: f32,
    /// Collision box, top-left snapped to `pos.floor()`
    pub rect: Rect,
    /// Hidden once shattered
    pub visible: bool,
    /// Recent positions, fed to echoes
    pub history: History,
}

impl Player {
    pub fn new(pos: Vec2, size: f32, speed: f32, history_capacity: usize) -> Self {
        Self {
            pos,
            size,
            speed,
            rect: Rect::square(pos.floor(), size),
            visible: true,
            history: History::new(history_capacity),
        }
    }

    /// Displacement for one tick from a raw input direction.
    ///
    /// Diagonals are normalized so they're no faster than straight moves; a
    /// zero direction gives zero displacement.
    pub fn movement_vector(&self, direction: Vec2, dt: f32) -> Vec2 {
        direction.normalize_or_zero() * self.speed * dt
    }

    /// Move by `displacement`, sliding along obstacles and staying in the arena.
    ///
    /// Debris in `fields` that overlaps the player afterwards is shoved away.
    pub fn apply_movement(
        &mut self,
        displacement: Vec2,
        world: &World<'_>,
        fields: &mut [FragmentField],
    ) {
        let start = self.pos;
        self.pos += displacement;
        self.sync_rect();

        let blocked = world
            .obstacles
            .iter()
            .any(|obstacle| self.rect.intersects(&obstacle.rect));
        if blocked {
            self.pos = start;
            self.sync_rect();

            if displacement.x != 0.0 {
                self.pos.x += displacement.x;
                self.sync_rect();
                for obstacle in world.obstacles {
                    if self.rect.intersects(&obstacle.rect) {
                        self.pos.x = if displacement.x > 0.0 {
                            obstacle.rect.left() - self.size
                        } else {
                            obstacle.rect.right()
                        };
                        self.sync_rect();
                    }
                }
            }

            if displacement.y != 0.0 {
                self.pos.y += displacement.y;
                self.sync_rect();
                for obstacle in world.obstacles {
                    if self.rect.intersects(&obstacle.rect) {
                        self.pos.y = if displacement.y > 0.0 {
                            obstacle.rect.top() - self.size
                        } else {
                            obstacle.rect.bottom()
                        };
                        self.sync_rect();
                    }
                }
            }
        }

        self.pos = world.arena.clamp_position(self.pos, self.size);
        self.sync_rect();

        for field in fields.iter_mut() {
            field.push_from_body(&self.rect);
        }
    }

    /// Remember the current position (once per live tick, after movement)
    pub fn record_history(&mut self) {
        self.history.push(self.pos);
    }

    fn sync_rect(&mut self) {
        self.rect.set_top_left(self.pos.floor());
    }
}
