//! Deterministic match simulation
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Stable iteration order (roster index)
//! - No rendering, audio or platform dependencies

pub mod ball;
pub mod field;
pub mod player;
pub mod state;
pub mod steering;
pub mod tick;

pub use ball::{Ball, BallPhase};
pub use field::{End, FieldGeometry, GoalArea, ScoringZone};
pub use player::{Direction, Intents, Player, Side};
pub use state::{MatchState, RngState};
pub use steering::steering_target;
pub use tick::{MatchEvent, TickInput, tick};
