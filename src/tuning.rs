//! Gameplay tuning
//!
//! Everything a designer might want to tweak without a rebuild. Missing
//! fields in a JSON document fall back to the defaults below.

use serde::{Deserialize, Serialize};

/// Out-of-bounds balls rest at least this far past the boundary
pub const MIN_OUT_OF_BOUNDS_NUDGE: f32 = 1.0;

/// Data-driven gameplay constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Controlled-player top speed (pixels/s)
    pub player_speed: f32,
    /// Uncontrolled players run at this fraction of `player_speed`
    pub ai_speed_factor: f32,
    /// AI players stop once this close to their target
    pub ai_arrive_radius: f32,
    /// Players are kept this far inside the boundary
    pub player_margin: f32,

    /// Kick power is uniform in [min, max)
    pub kick_power_min: f32,
    pub kick_power_max: f32,
    /// Maximum random deviation from the aimed kick angle (radians)
    pub kick_jitter: f32,

    /// Reach of a tackle from the controlled player
    pub tackle_radius: f32,
    /// A successful tackle spills the ball up to this far on each axis
    pub tackle_scatter: f32,

    /// Distance the ball is pushed past the boundary after going out
    pub out_of_bounds_nudge: f32,
    /// Behinds restart this far inside the scoring line
    pub behind_restart_inset: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player_speed: 120.0,
            ai_speed_factor: 0.7,
            ai_arrive_radius: 5.0,
            player_margin: 20.0,
            kick_power_min: 150.0,
            kick_power_max: 250.0,
            kick_jitter: 0.15,
            tackle_radius: 30.0,
            tackle_scatter: 20.0,
            out_of_bounds_nudge: 2.0,
            behind_restart_inset: 20.0,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON document
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str::<Tuning>(json).map(Tuning::sanitized)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// AI top speed
    pub fn ai_speed(&self) -> f32 {
        self.player_speed * self.ai_speed_factor
    }

    /// Repair values that would make random ranges empty or negative
    pub fn sanitized(mut self) -> Self {
        let defaults = Tuning::default();
        let fix = |v: f32, fallback: f32| if v.is_finite() && v >= 0.0 { v } else { fallback };

        self.player_speed = fix(self.player_speed, defaults.player_speed);
        self.ai_speed_factor = fix(self.ai_speed_factor, defaults.ai_speed_factor);
        self.ai_arrive_radius = fix(self.ai_arrive_radius, defaults.ai_arrive_radius);
        self.player_margin = fix(self.player_margin, defaults.player_margin);
        self.kick_power_min = fix(self.kick_power_min, defaults.kick_power_min);
        self.kick_power_max = fix(self.kick_power_max, defaults.kick_power_max);
        self.kick_jitter = fix(self.kick_jitter, defaults.kick_jitter);
        self.tackle_radius = fix(self.tackle_radius, defaults.tackle_radius);
        self.tackle_scatter = fix(self.tackle_scatter, defaults.tackle_scatter);
        self.out_of_bounds_nudge = fix(self.out_of_bounds_nudge, defaults.out_of_bounds_nudge)
            .max(MIN_OUT_OF_BOUNDS_NUDGE);
        self.behind_restart_inset = fix(self.behind_restart_inset, defaults.behind_restart_inset);

        if self.kick_power_max < self.kick_power_min {
            std::mem::swap(&mut self.kick_power_min, &mut self.kick_power_max);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let tuning = Tuning::from_json(r#"{ "player_speed": 150.0 }"#).unwrap();
        assert_eq!(tuning.player_speed, 150.0);
        assert_eq!(tuning.kick_power_min, 150.0);
        assert_eq!(tuning.tackle_radius, 30.0);
        assert!((tuning.ai_speed() - 105.0).abs() < 1e-4);
    }

    #[test]
    fn test_json_roundtrip() {
        let tuning = Tuning::default();
        let json = tuning.to_json().unwrap();
        assert_eq!(Tuning::from_json(&json).unwrap(), tuning);
    }

    #[test]
    fn test_sanitized_swaps_inverted_power_range() {
        let tuning = Tuning::from_json(r#"{ "kick_power_min": 300.0, "kick_power_max": 100.0 }"#)
            .unwrap();
        assert_eq!(tuning.kick_power_min, 100.0);
        assert_eq!(tuning.kick_power_max, 300.0);
    }

    #[test]
    fn test_sanitized_rejects_negative() {
        let tuning = Tuning::from_json(r#"{ "tackle_scatter": -4.0 }"#).unwrap();
        assert_eq!(tuning.tackle_scatter, 20.0);
    }

    #[test]
    fn test_sanitized_keeps_nudge_off_the_line() {
        let tuning = Tuning::from_json(r#"{ "out_of_bounds_nudge": 0.0 }"#).unwrap();
        assert_eq!(tuning.out_of_bounds_nudge, MIN_OUT_OF_BOUNDS_NUDGE);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(Tuning::from_json("{ not json").is_err());
    }
}
