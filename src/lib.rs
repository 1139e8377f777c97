//! Oval Footy - an arcade Australian-rules football match on an elliptical oval
//!
//! Core modules:
//! - `sim`: Deterministic match simulation (field geometry, ball, players, tick)
//! - `engine`: Host-facing lifecycle (start/update/render/destroy)
//! - `input`: Keyboard codes to movement intents and one-shot actions
//! - `renderer`: Draw surface abstraction and WebGPU presenter
//! - `tuning`: Data-driven gameplay constants

pub mod audio;
pub mod engine;
pub mod input;
pub mod renderer;
pub mod scoreboard;
pub mod settings;
pub mod sim;
pub mod teams;
pub mod tuning;

pub use engine::{Lifecycle, MatchEngine, ScoreSink};
pub use scoreboard::Scoreboard;
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Default canvas size (pixels)
    pub const SCREEN_WIDTH: f32 = 1200.0;
    pub const SCREEN_HEIGHT: f32 = 800.0;
    /// Gap between the canvas edge and the boundary line
    pub const FIELD_BORDER: f32 = 20.0;

    /// Real-world ground size (metres) mapped onto the ellipse axes
    pub const GROUND_LENGTH_M: f32 = 160.0;
    pub const GROUND_WIDTH_M: f32 = 130.0;
    /// Distance between the goal posts (metres)
    pub const GOAL_WIDTH_M: f32 = 6.4;
    /// Distance from a goal post out to its behind post (metres)
    pub const BEHIND_WIDTH_M: f32 = 6.4;

    /// Players per side, fixed for the whole match
    pub const PLAYERS_PER_TEAM: usize = 18;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 8.0;
    /// Downward acceleration while airborne (pixels/s²)
    pub const BALL_GRAVITY: f32 = 300.0;
    /// Fraction of vertical speed kept on each bounce
    pub const BALL_BOUNCE: f32 = 0.6;
    /// Planar velocity multiplier per grounded tick
    pub const BALL_FRICTION: f32 = 0.98;
    /// Rebounds slower than this die on the spot
    pub const BALL_REST_BOUNCE_SPEED: f32 = 20.0;
    /// Rolling slower than this stops the ball
    pub const BALL_REST_ROLL_SPEED: f32 = 5.0;
    /// Height the ball leaves the boot at
    pub const BALL_KICK_HEIGHT: f32 = 5.0;
    /// Upward speed per unit of kick power
    pub const BALL_KICK_LIFT: f32 = 0.5;
    /// Ball counts as airborne above this height
    pub const BALL_AIR_HEIGHT: f32 = 5.0;
    /// Possession radius shared by every contested action
    pub const BALL_PROXIMITY: f32 = 25.0;

    /// Longest frame the engine integrates in a single update
    pub const MAX_FRAME_DT: f32 = 0.1;
    /// Nominal frame time (first frame, headless runs)
    pub const FRAME_DT: f32 = 1.0 / 60.0;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_normalize_angle() {
        assert!((normalize_angle(3.0 * PI) - (-PI)).abs() < 1e-5);
        assert!((normalize_angle(-PI / 2.0) + PI / 2.0).abs() < 1e-6);
        assert!((normalize_angle(2.5 * PI) - PI / 2.0).abs() < 1e-5);
    }
}
