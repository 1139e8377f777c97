//! Target selection for players the human is not controlling

use glam::Vec2;

use super::ball::Ball;
use super::field::FieldGeometry;
use super::player::Side;

/// Where an uncontrolled player should run.
///
/// With the ball in reach, carry it toward the goal the player's side
/// attacks; otherwise chase the ball.
pub fn steering_target(player_pos: Vec2, side: Side, ball: &Ball, field: &FieldGeometry) -> Vec2 {
    if ball.is_near(player_pos) {
        field.attacking_goal(side)
    } else {
        ball.pos
    }
}
