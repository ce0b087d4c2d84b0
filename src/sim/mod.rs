//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (insertion order of entity lists)
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod echo;
pub mod enemy;
pub mod fragments;
pub mod player;
pub mod rect;
pub mod snapshot;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{Axis, Separation, bounce, min_axis_separation, push_impulse};
pub use echo::{Echo, History};
pub use enemy::Enemy;
pub use fragments::{Fragment, FragmentField, ShatterConfig};
pub use player::Player;
pub use rect::{Arena, Rect};
pub use snapshot::{HudView, RectView, RenderFrame, build_frame};
pub use spawn::{SpawnBudget, SpawnRequest, find_spawn_position};
pub use state::{GameEvent, GamePhase, GameState, Level, Obstacle, World};
pub use tick::{TickInput, tick};
