//! Elliptical playing surface
//!
//! The oval is an axis-aligned ellipse in screen space (y grows downward).
//! Every containment query takes a `margin` that shrinks both semi-axes, so
//! one ellipse serves the ball (margin = ball radius) and the players
//! (margin = half body width).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::player::Side;
use crate::consts::*;

/// Smallest semi-axis a margin can shrink the ellipse to
const MIN_SEMI_AXIS: f32 = 1.0;
/// Projected points land this fraction of the way to the boundary so they
/// always pass `is_inside` despite float rounding
const PROJECTION_SHRINK: f32 = 0.999;

/// One end of the ground
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum End {
    Left,
    Right,
}

impl End {
    pub const BOTH: [End; 2] = [End::Left, End::Right];

    /// Sign of the x-direction pointing off the ground through this end
    pub fn outward(self) -> f32 {
        match self {
            End::Left => -1.0,
            End::Right => 1.0,
        }
    }
}

/// Where a ball crossing a scoring line went through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoringZone {
    /// Between the goal posts
    Goal,
    /// Between a goal post and its behind post
    Behind,
    /// Wide of the behind posts
    Outside,
}

/// Scoring line and post positions for one end
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoalArea {
    pub end: End,
    /// x-coordinate of the scoring line
    pub line_x: f32,
    pub goal_top: f32,
    pub goal_bottom: f32,
    pub behind_top: f32,
    pub behind_bottom: f32,
}

impl GoalArea {
    /// Classify a crossing at height `y` against the four post thresholds
    pub fn classify(&self, y: f32) -> ScoringZone {
        if (self.goal_top..=self.goal_bottom).contains(&y) {
            ScoringZone::Goal
        } else if (self.behind_top..=self.behind_bottom).contains(&y) {
            ScoringZone::Behind
        } else {
            ScoringZone::Outside
        }
    }

    /// True when `x` lies beyond the scoring line, off the ground
    pub fn is_past_line(&self, x: f32) -> bool {
        match self.end {
            End::Left => x < self.line_x,
            End::Right => x > self.line_x,
        }
    }

    /// True when moving from `from_x` to `to_x` carried the ball over the line
    pub fn crossed(&self, from_x: f32, to_x: f32) -> bool {
        !self.is_past_line(from_x) && self.is_past_line(to_x)
    }

    /// Middle of the goal mouth
    pub fn centre(&self) -> Vec2 {
        Vec2::new(self.line_x, (self.goal_top + self.goal_bottom) * 0.5)
    }
}

/// The oval: immutable once built
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldGeometry {
    pub width: f32,
    pub height: f32,
    pub center: Vec2,
    /// Semi-axes (rx, ry)
    pub radii: Vec2,
    /// Screen pixels per real-world metre
    pub px_per_meter: f32,
    /// Ball radius the scoring lines are placed against
    scoring_margin: f32,
}

impl Default for FieldGeometry {
    fn default() -> Self {
        Self::new(SCREEN_WIDTH, SCREEN_HEIGHT, FIELD_BORDER, BALL_RADIUS)
    }
}

impl FieldGeometry {
    /// Build the oval inscribed in a `width` x `height` canvas, `border`
    /// pixels in from each edge.
    pub fn new(width: f32, height: f32, border: f32, ball_radius: f32) -> Self {
        let radii = Vec2::new(
            (width * 0.5 - border).max(MIN_SEMI_AXIS),
            (height * 0.5 - border).max(MIN_SEMI_AXIS),
        );
        // Use the tighter axis so goal dimensions stay isotropic
        let px_per_meter =
            (2.0 * radii.x / GROUND_LENGTH_M).min(2.0 * radii.y / GROUND_WIDTH_M);

        Self {
            width,
            height,
            center: Vec2::new(width * 0.5, height * 0.5),
            radii,
            px_per_meter,
            scoring_margin: ball_radius.max(0.0),
        }
    }

    pub fn centre(&self) -> Vec2 {
        self.center
    }

    /// Semi-axes after shrinking inward by `margin`
    fn shrunk_radii(&self, margin: f32) -> Vec2 {
        (self.radii - Vec2::splat(margin.max(0.0))).max(Vec2::splat(MIN_SEMI_AXIS))
    }

    /// Implicit ellipse function: <= 1 inside, > 1 outside
    fn ellipse_value(&self, point: Vec2, margin: f32) -> f32 {
        ((point - self.center) / self.shrunk_radii(margin)).length_squared()
    }

    /// Is `point` within the oval shrunk by `margin`?
    pub fn is_inside(&self, point: Vec2, margin: f32) -> bool {
        self.ellipse_value(point, margin) <= 1.0
    }

    /// Pull `point` back onto the shrunk boundary along the ray from the
    /// centre. Points already inside are returned unchanged.
    ///
    /// Radial projection is not the nearest boundary point, but it is close
    /// enough for the small excursions a single tick produces.
    pub fn project_inside(&self, point: Vec2, margin: f32) -> Vec2 {
        let k = self.ellipse_value(point, margin);
        if k <= 1.0 {
            return point;
        }
        if !k.is_finite() {
            return self.center;
        }
        self.center + (point - self.center) * (PROJECTION_SHRINK / k.sqrt())
    }

    /// Point on the shrunk boundary along the ray from the centre through
    /// `point`, with no inward bias. The centre maps to itself.
    pub fn boundary_point(&self, point: Vec2, margin: f32) -> Vec2 {
        let k = self.ellipse_value(point, margin);
        if k <= f32::EPSILON || !k.is_finite() {
            return point;
        }
        self.center + (point - self.center) / k.sqrt()
    }

    /// Outward unit normal at a boundary point, from the gradient of the
    /// implicit function
    pub fn normal_at(&self, point: Vec2) -> Vec2 {
        let d = point - self.center;
        let grad = Vec2::new(
            d.x / (self.radii.x * self.radii.x),
            d.y / (self.radii.y * self.radii.y),
        );
        grad.try_normalize().unwrap_or(Vec2::X)
    }

    /// Scoring line and posts for one end.
    ///
    /// The line sits on the chord of the ball-shrunk ellipse through the
    /// behind posts, so the whole scoring window is still in play and a ball
    /// crosses the line before it can cross the boundary there.
    pub fn goal_area(&self, end: End) -> GoalArea {
        let shrunk = self.shrunk_radii(self.scoring_margin);
        let goal_half = (GOAL_WIDTH_M * 0.5 * self.px_per_meter).min(shrunk.y);
        let behind_half = (goal_half + BEHIND_WIDTH_M * self.px_per_meter).min(shrunk.y);

        let t = behind_half / shrunk.y;
        let chord = shrunk.x * (1.0 - t * t).max(0.0).sqrt();
        let cy = self.center.y;

        GoalArea {
            end,
            line_x: self.center.x + end.outward() * chord,
            goal_top: cy - goal_half,
            goal_bottom: cy + goal_half,
            behind_top: cy - behind_half,
            behind_bottom: cy + behind_half,
        }
    }

    /// Both ends, left first
    pub fn goal_areas(&self) -> [GoalArea; 2] {
        End::BOTH.map(|end| self.goal_area(end))
    }

    /// Goal-line centre of the end `side` kicks toward
    pub fn attacking_goal(&self, side: Side) -> Vec2 {
        self.goal_area(side.attacking_end()).centre()
    }

    /// Classify a ball crossing `end`'s scoring line at height `y`
    pub fn classify_crossing(&self, end: End, y: f32) -> ScoringZone {
        self.goal_area(end).classify(y)
    }
}
