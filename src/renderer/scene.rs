//! Match scene: ground markings, posts, players and ball

use glam::Vec2;

use super::DrawSurface;
use super::sprites::SpriteSheet;
use super::vertex::colors;
use crate::sim::{FieldGeometry, GoalArea, MatchState, Side};
use crate::teams::Team;

/// On-screen player size (pixels)
pub const PLAYER_SIZE: Vec2 = Vec2::new(24.0, 24.0);
/// Centre circle radius (metres)
const CENTRE_CIRCLE_M: f32 = 5.0;
/// Centre square side (metres)
const CENTRE_SQUARE_M: f32 = 50.0;
/// Goal square depth (metres)
const GOAL_SQUARE_DEPTH_M: f32 = 9.0;
const LINE_WIDTH: f32 = 2.0;

/// Draw one frame of the match. Read-only over the simulation.
pub fn draw_match(
    surface: &mut impl DrawSurface,
    field: &FieldGeometry,
    state: &MatchState,
    sheet: &SpriteSheet,
    home: &Team,
    away: &Team,
) {
    draw_ground(surface, field);
    for area in field.goal_areas() {
        draw_goal_end(surface, field, &area);
    }

    for player in &state.players {
        if player.is_controlled {
            surface.stroke_ellipse(
                player.pos,
                PLAYER_SIZE * 0.7,
                LINE_WIDTH,
                colors::HIGHLIGHT,
            );
        }
        let team = match player.side {
            Side::Home => home,
            Side::Away => away,
        };
        surface.sprite(
            sheet.sprite_for(player),
            player.pos,
            PLAYER_SIZE,
            team.primary.to_rgba(),
        );
    }

    // Shadow stays on the ground, the ball rises with its height
    let ball = &state.ball;
    let radii = Vec2::new(ball.radius * 1.25, ball.radius * 0.85);
    surface.fill_ellipse(ball.pos, radii, colors::BALL_SHADOW);
    surface.fill_ellipse(ball.pos - Vec2::new(0.0, ball.z), radii, colors::BALL);
}

fn draw_ground(surface: &mut impl DrawSurface, field: &FieldGeometry) {
    let c = field.centre();
    let ppm = field.px_per_meter;

    surface.fill_rect(Vec2::ZERO, Vec2::new(field.width, field.height), colors::BACKGROUND);
    surface.fill_ellipse(c, field.radii, colors::GRASS);
    // Mowing stripe through the middle
    surface.fill_ellipse(c, field.radii * Vec2::new(0.35, 1.0), colors::GRASS_STRIPE);
    surface.stroke_ellipse(c, field.radii, LINE_WIDTH * 1.5, colors::LINE);

    surface.stroke_ellipse(c, Vec2::splat(CENTRE_CIRCLE_M * ppm), LINE_WIDTH, colors::LINE);
    let half = CENTRE_SQUARE_M * ppm * 0.5;
    let corners = [
        c + Vec2::new(-half, -half),
        c + Vec2::new(half, -half),
        c + Vec2::new(half, half),
        c + Vec2::new(-half, half),
    ];
    for i in 0..corners.len() {
        surface.line(corners[i], corners[(i + 1) % corners.len()], LINE_WIDTH, colors::LINE);
    }
}

fn draw_goal_end(surface: &mut impl DrawSurface, field: &FieldGeometry, area: &GoalArea) {
    let inward = -area.end.outward();
    let depth = GOAL_SQUARE_DEPTH_M * field.px_per_meter * inward;

    // Goal line between the behind posts
    surface.line(
        Vec2::new(area.line_x, area.behind_top),
        Vec2::new(area.line_x, area.behind_bottom),
        LINE_WIDTH,
        colors::LINE,
    );

    // Goal square
    let top = Vec2::new(area.line_x, area.goal_top);
    let bottom = Vec2::new(area.line_x, area.goal_bottom);
    let out = Vec2::new(depth, 0.0);
    surface.line(top, top + out, LINE_WIDTH, colors::LINE);
    surface.line(bottom, bottom + out, LINE_WIDTH, colors::LINE);
    surface.line(top + out, bottom + out, LINE_WIDTH, colors::LINE);

    for y in [area.goal_top, area.goal_bottom] {
        surface.fill_circle(Vec2::new(area.line_x, y), 4.0, colors::GOAL_POST);
    }
    for y in [area.behind_top, area.behind_bottom] {
        surface.fill_circle(Vec2::new(area.line_x, y), 3.0, colors::BEHIND_POST);
    }
}
