//! Simulation module
//!
//! All gameplay logic lives here. Nothing in this module renders, plays
//! sound or reads the clock:
//! - Time arrives as milliseconds in [`TickInput`]
//! - Spawns use the session's seeded RNG
//! - Side effects are reported as [`GameEvent`]s

pub mod ability;
pub mod autopilot;
pub mod collision;
pub mod history;
pub mod state;
pub mod tick;

pub use ability::{AbilityState, Activation, Rewind};
pub use autopilot::autopilot_input;
pub use collision::{CollisionReport, resolve_collisions};
pub use history::{HistoryBuffer, HistoryEntry, RewindFrame};
pub use state::{Bullet, Enemy, GameEvent, GamePhase, GameState, MoveIntent, Player, Powerup};
pub use tick::{Edge, TickInput, tick};
