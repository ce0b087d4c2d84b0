//! Collision queries and responses for axis-aligned rectangles
//!
//! Everything here is a total function: non-overlapping input yields `None`
//! and coincident centers yield a zero push instead of a NaN.

use glam::Vec2;

use super::rect::Rect;

/// Axis along which two rects are separated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// How to move a rect out of an obstacle along a single axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Separation {
    /// Axis with the smaller penetration
    pub axis: Axis,
    /// Penetration depth on that axis
    pub depth: f32,
    /// New top-left coordinate on `axis` that clears the obstacle
    pub position: f32,
    /// Unit normal of the obstacle face the rect was pushed out through
    pub normal: Vec2,
}

/// Penetration depth on each axis (both positive iff the rects overlap)
#[inline]
pub fn overlap_depth(a: &Rect, b: &Rect) -> Vec2 {
    Vec2::new(
        a.right().min(b.right()) - a.left().max(b.left()),
        a.bottom().min(b.bottom()) - a.top().max(b.top()),
    )
}

/// Pick the axis with the smaller penetration.
///
/// Equal depths resolve on Y.
#[inline]
pub fn separation_axis(depth: Vec2) -> Axis {
    if depth.x < depth.y { Axis::X } else { Axis::Y }
}

/// Compute the minimum-axis escape for `rect` out of `obstacle`.
///
/// The push side is the obstacle edge nearest to `rect`'s center, so the
/// result never depends on which way the body happened to be heading.
pub fn min_axis_separation(rect: &Rect, obstacle: &Rect) -> Option<Separation> {
    if !rect.intersects(obstacle) {
        return None;
    }
    let depth = overlap_depth(rect, obstacle);
    let axis = separation_axis(depth);
    let center = rect.center();
    let obstacle_center = obstacle.center();

    let (depth, position, normal) = match axis {
        Axis::X if center.x < obstacle_center.x => (depth.x, obstacle.left() - rect.w, Vec2::NEG_X),
        Axis::X => (depth.x, obstacle.right(), Vec2::X),
        Axis::Y if center.y < obstacle_center.y => (depth.y, obstacle.top() - rect.h, Vec2::NEG_Y),
        Axis::Y => (depth.y, obstacle.bottom(), Vec2::Y),
    };

    Some(Separation {
        axis,
        depth,
        position,
        normal,
    })
}

/// Impulse that shoves something at `target` away from `source`.
///
/// Coincident centers produce no impulse.
#[inline]
pub fn push_impulse(target: Vec2, source: Vec2, magnitude: f32) -> Vec2 {
    (target - source).normalize_or_zero() * magnitude
}

/// Bounce a heading off a face with an axis-aligned `normal`.
///
/// The component along the normal is mirrored so it points away from the
/// face; the result is re-normalized to stay a unit vector.
#[inline]
pub fn bounce(dir: Vec2, normal: Vec2) -> Vec2 {
    let mut out = dir;
    if normal.x != 0.0 {
        out.x = dir.x.abs() * normal.x.signum();
    }
    if normal.y != 0.0 {
        out.y = dir.y.abs() * normal.y.signum();
    }
    out.normalize_or_zero()
}
