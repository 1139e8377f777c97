//! Ball physics
//!
//! Planar motion in screen space plus a separate height axis. The ball is
//! either grounded (rolling with friction) or airborne (falling under
//! gravity, bouncing with damping when it lands).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::player::Player;
use crate::consts::*;

/// Ball phase, derived from height
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BallPhase {
    Grounded,
    Airborne,
}

/// The match ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Height above the ground (never negative)
    pub z: f32,
    /// Vertical velocity (positive is up)
    pub vz: f32,
    pub radius: f32,
    /// Set by a kick, cleared by a catch or by leaving play
    pub was_kicked: bool,
    /// Set on the first ground contact after a kick
    pub has_bounced_since_kick: bool,
}

impl Ball {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            z: 0.0,
            vz: 0.0,
            radius: BALL_RADIUS,
            was_kicked: false,
            has_bounced_since_kick: false,
        }
    }

    pub fn phase(&self) -> BallPhase {
        if self.z > 0.0 {
            BallPhase::Airborne
        } else {
            BallPhase::Grounded
        }
    }

    /// Advance the ball by `dt` seconds
    pub fn update(&mut self, dt: f32) {
        if self.z > 0.0 {
            self.vz -= BALL_GRAVITY * dt;
        }

        self.pos += self.vel * dt;
        self.z += self.vz * dt;

        // Ground contact
        if self.z <= 0.0 {
            self.z = 0.0;
            if self.vz < 0.0 {
                self.vz = -self.vz * BALL_BOUNCE;
                if self.vz.abs() < BALL_REST_BOUNCE_SPEED {
                    self.vz = 0.0;
                }
                if self.was_kicked {
                    self.has_bounced_since_kick = true;
                }
            }
        }

        if self.phase() == BallPhase::Grounded {
            self.vel *= BALL_FRICTION;
            if self.vel.length() < BALL_REST_ROLL_SPEED {
                self.vel = Vec2::ZERO;
            }
        }
    }

    /// Launch the ball from `origin` along `angle` (radians) with `power`
    /// (pixels/s). Loft is proportional to power.
    pub fn kick(&mut self, origin: Vec2, angle: f32, power: f32) {
        self.pos = origin;
        self.vel = Vec2::from_angle(angle) * power;
        self.vz = power * BALL_KICK_LIFT;
        self.z = BALL_KICK_HEIGHT;
        self.was_kicked = true;
        self.has_bounced_since_kick = false;
    }

    /// Take the ball cleanly at `at`: all motion stops and kick tracking resets
    pub fn catch(&mut self, at: Vec2) {
        self.pos = at;
        self.stop();
        self.clear_kick_tracking();
    }

    /// Kill all motion where the ball lies
    pub fn stop(&mut self) {
        self.vel = Vec2::ZERO;
        self.vz = 0.0;
        self.z = 0.0;
    }

    pub fn clear_kick_tracking(&mut self) {
        self.was_kicked = false;
        self.has_bounced_since_kick = false;
    }

    /// High enough to be marked. Uses a threshold rather than `z > 0` so the
    /// touchdown frame does not flicker.
    pub fn is_in_air(&self) -> bool {
        self.z > BALL_AIR_HEIGHT
    }

    /// Within possession range of `point` (ground distance)
    pub fn is_near(&self, point: Vec2) -> bool {
        self.pos.distance(point) < BALL_PROXIMITY
    }

    pub fn is_near_player(&self, player: &Player) -> bool {
        self.is_near(player.pos)
    }
}
