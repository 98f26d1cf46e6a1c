//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (insertion order, removals deferred to the sweep)
//! - No rendering or platform dependencies

pub mod background;
pub mod collision;
pub mod difficulty;
pub mod entity;
pub mod player;
pub mod state;
pub mod tick;

pub use background::{Star, Starfield};
pub use collision::{contact_damage, roll_drop};
pub use difficulty::Difficulty;
pub use entity::{Body, Bounds, Color, Entity, EntityKind, PowerUpKind, UpdateContext};
pub use player::{EffectTimers, Player};
pub use state::{GameEvent, GamePhase, GameState};
pub use tick::{TickInput, tick};
