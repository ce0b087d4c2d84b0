//! Position history and echo replay
//!
//! The player leaves a bounded trail of past positions. An echo copies that
//! trail and walks it back from the newest point to the oldest, one point per
//! tick, destroying the first enemy it touches.

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rect::Rect;

/// Number of ticks in a trail of `seconds` at `ticks_per_second`
pub fn history_capacity(seconds: f32, ticks_per_second: u32) -> usize {
    (seconds * ticks_per_second as f32).round() as usize
}

/// Fixed-capacity FIFO of past positions (oldest at the front)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct History {
    points: VecDeque<Vec2>,
    capacity: usize,
}

impl History {
    pub fn new(capacity: usize) -> Self {
        Self {
            points: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Capacity for a trail of `seconds` at `ticks_per_second`
    pub fn for_duration(seconds: f32, ticks_per_second: u32) -> Self {
        Self::new(history_capacity(seconds, ticks_per_second))
    }

    /// Append a position, evicting the oldest one when full
    pub fn push(&mut self, pos: Vec2) {
        if self.capacity == 0 {
            return;
        }
        if self.points.len() == self.capacity {
            self.points.pop_front();
        }
        self.points.push_back(pos);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &Vec2> {
        self.points.iter()
    }

    /// Owned copy of the current contents, oldest first
    pub fn snapshot(&self) -> Vec<Vec2> {
        self.points.iter().copied().collect()
    }
}

/// A replay of a history snapshot, newest point first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Echo {
    trail: Vec<Vec2>,
    step: usize,
    pub rect: Rect,
}

impl Echo {
    /// Start an echo from a copy of `history`; later pushes don't affect it
    pub fn new(history: &History, size: f32) -> Self {
        Self {
            trail: history.snapshot(),
            step: 0,
            rect: Rect::new(0.0, 0.0, size, size),
        }
    }

    /// Move to the next point back in time.
    ///
    /// Returns `None` once the trail is used up.
    pub fn advance(&mut self) -> Option<Vec2> {
        let index = self.trail.len().checked_sub(self.step + 1)?;
        let pos = self.trail[index];
        self.rect.set_top_left(pos);
        self.step += 1;
        Some(pos)
    }

    /// Points still to be replayed
    pub fn remaining(&self) -> usize {
        self.trail.len().saturating_sub(self.step)
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn pts(n: usize) -> Vec<Vec2> {
        (0..n).map(|i| Vec2::new(i as f32 * 10.0, i as f32)).collect()
    }

    #[test]
    fn test_capacity_from_duration() {
        let history = History::for_duration(2.0, 60);
        assert_eq!(history.capacity(), 120);
    }

    #[test]
    fn test_history_evicts_oldest() {
        let mut history = History::new(3);
        for p in pts(5) {
            history.push(p);
        }
        assert_eq!(history.len(), 3);
        assert_eq!(history.snapshot(), pts(5)[2..].to_vec());
    }

    #[test]
    fn test_echo_replays_newest_first() {
        let mut history = History::new(10);
        let points = pts(5);
        for &p in &points {
            history.push(p);
        }
        let mut echo = Echo::new(&history, 50.0);

        for expected in points.iter().rev() {
            assert_eq!(echo.advance(), Some(*expected));
            assert_eq!(echo.rect.top_left(), *expected);
        }
        assert!(echo.is_exhausted());
        assert_eq!(echo.advance(), None);
    }

    #[test]
    fn test_echo_is_detached_from_history() {
        let mut history = History::new(4);
        history.push(Vec2::new(1.0, 1.0));
        history.push(Vec2::new(2.0, 2.0));
        let mut echo = Echo::new(&history, 50.0);

        history.push(Vec2::new(99.0, 99.0));
        history.clear();

        assert_eq!(echo.remaining(), 2);
        assert_eq!(echo.advance(), Some(Vec2::new(2.0, 2.0)));
        assert_eq!(echo.advance(), Some(Vec2::new(1.0, 1.0)));
        assert_eq!(echo.advance(), None);
    }

    #[test]
    fn test_empty_echo_ends_immediately() {
        let history = History::new(4);
        let mut echo = Echo::new(&history, 50.0);
        assert_eq!(echo.advance(), None);
    }

    proptest! {
        #[test]
        fn prop_history_bounded_fifo(capacity in 1usize..50, pushes in 0usize..200) {
            let mut history = History::new(capacity);
            for p in pts(pushes) {
                history.push(p);
                prop_assert!(history.len() <= capacity);
            }
            let expected: Vec<Vec2> = pts(pushes)
                .into_iter()
                .skip(pushes.saturating_sub(capacity))
                .collect();
            prop_assert_eq!(history.snapshot(), expected);
        }
    }
}
