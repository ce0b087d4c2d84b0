//! Axis-aligned rectangles and the arena they live in
//!
//! Screen convention: origin top-left, +y down. A rect is its top-left corner
//! plus width/height.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Square of side `size` with its top-left at `pos`
    pub fn square(pos: Vec2, size: f32) -> Self {
        Self::new(pos.x, pos.y, size, size)
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    #[inline]
    pub fn top_left(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w * 0.5, self.y + self.h * 0.5)
    }

    /// Strict overlap test: rects that only share an edge don't intersect
    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// True if `other` lies entirely inside this rect (edges may touch)
    pub fn contains(&self, other: &Rect) -> bool {
        other.left() >= self.left()
            && other.right() <= self.right()
            && other.top() >= self.top()
            && other.bottom() <= self.bottom()
    }

    /// Grow by `dx`/`dy` in total, keeping the same center
    pub fn inflate(&self, dx: f32, dy: f32) -> Self {
        Self::new(self.x - dx * 0.5, self.y - dy * 0.5, self.w + dx, self.h + dy)
    }

    /// Move the top-left corner, keeping the size
    pub fn set_top_left(&mut self, pos: Vec2) {
        self.x = pos.x;
        self.y = pos.y;
    }
}

/// The fixed playfield every body is confined to
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
}

impl Arena {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    pub fn contains(&self, rect: &Rect) -> bool {
        self.bounds().contains(rect)
    }

    /// Clamp a top-left position so a square of `size` stays inside
    pub fn clamp_position(&self, pos: Vec2, size: f32) -> Vec2 {
        Vec2::new(
            pos.x.clamp(0.0, (self.width - size).max(0.0)),
            pos.y.clamp(0.0, (self.height - size).max(0.0)),
        )
    }
}

impl Default for Arena {
    fn default() -> Self {
        use crate::consts::{ARENA_HEIGHT, ARENA_WIDTH};
        Self::new(ARENA_WIDTH, ARENA_HEIGHT)
    }
}
