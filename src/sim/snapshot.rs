//! Render snapshot: everything a presentation layer needs to draw one frame.
//!
//! Read-only view over `GameState`; building it never mutates the simulation.

use serde::{Deserialize, Serialize};

use super::fragments::FragmentField;
use super::rect::Rect;
use super::state::{GamePhase, GameState};
use crate::consts::*;

/// A filled rectangle with an RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RectView {
    pub rect: Rect,
    pub color: [u8; 4],
}

impl RectView {
    fn solid(rect: Rect, [r, g, b]: [u8; 3]) -> Self {
        Self {
            rect,
            color: [r, g, b, 255],
        }
    }
}

/// One drawable frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderFrame {
    pub width: f32,
    pub height: f32,
    pub obstacles: Vec<RectView>,
    pub enemies: Vec<RectView>,
    /// Debris from every field, player debris last
    pub fragments: Vec<RectView>,
    /// `None` while the player is shattered
    pub player: Option<RectView>,
    pub echoes: Vec<RectView>,
    pub hud: HudView,
}

/// Text overlay values
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HudView {
    pub score: u64,
    pub enemies_remaining: usize,
    pub level: u32,
    pub round: u32,
    pub phase: GamePhase,
    /// Set on the death screen once it can be dismissed
    pub can_continue: bool,
}

/// Build a complete frame from the current state.
pub fn build_frame(state: &GameState) -> RenderFrame {
    let mut fragments: Vec<RectView> = state.shattered_enemies.iter().flat_map(field_views).collect();
    if let Some(field) = &state.shattered_player {
        fragments.extend(field_views(field));
    }

    RenderFrame {
        width: state.arena.width,
        height: state.arena.height,
        obstacles: state
            .obstacles
            .iter()
            .map(|o| RectView::solid(o.rect, OBSTACLE_COLOR))
            .collect(),
        enemies: state
            .enemies
            .iter()
            .map(|e| RectView::solid(e.rect, ENEMY_COLOR))
            .collect(),
        fragments,
        player: state
            .player
            .visible
            .then(|| RectView::solid(state.player.rect, PLAYER_COLOR)),
        echoes: state
            .echoes
            .iter()
            .map(|e| RectView::solid(e.rect, ECHO_COLOR))
            .collect(),
        hud: HudView {
            score: state.score,
            enemies_remaining: state.enemies.len(),
            level: state.level.number,
            round: state.round,
            phase: state.phase,
            can_continue: state.can_dismiss_death(),
        },
    }
}

fn field_views(field: &FragmentField) -> impl Iterator<Item = RectView> + '_ {
    let [r, g, b] = field.color;
    field.fragments.iter().map(move |f| RectView {
        rect: f.rect,
        color: [r, g, b, f.opacity()],
    })
}

impl GameState {
    /// Snapshot for drawing
    pub fn frame(&self) -> RenderFrame {
        build_frame(self)
    }
}
