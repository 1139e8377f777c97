//! Players: side, facing, intents and locomotion

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::field::End;

/// Which team a player belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Home,
    Away,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Home => Side::Away,
            Side::Away => Side::Home,
        }
    }

    /// End this side kicks toward
    pub fn attacking_end(self) -> End {
        match self {
            Side::Home => End::Right,
            Side::Away => End::Left,
        }
    }
}

/// Compass direction on screen. Used both for facing and for movement intents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Direction {
    Up,
    #[default]
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit vector in screen space (y grows downward)
    pub fn vector(self) -> Vec2 {
        match self {
            Direction::Up => Vec2::NEG_Y,
            Direction::Down => Vec2::Y,
            Direction::Left => Vec2::NEG_X,
            Direction::Right => Vec2::X,
        }
    }

    /// Dominant axis of `v`, horizontal on a tie. `None` for a zero vector.
    pub fn from_vector(v: Vec2) -> Option<Direction> {
        if v == Vec2::ZERO || !v.is_finite() {
            return None;
        }
        Some(if v.x.abs() >= v.y.abs() {
            if v.x >= 0.0 {
                Direction::Right
            } else {
                Direction::Left
            }
        } else if v.y > 0.0 {
            Direction::Down
        } else {
            Direction::Up
        })
    }
}

/// Held movement intents. Only input events change these.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intents {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl Intents {
    pub fn set(&mut self, direction: Direction, active: bool) {
        match direction {
            Direction::Up => self.up = active,
            Direction::Down => self.down = active,
            Direction::Left => self.left = active,
            Direction::Right => self.right = active,
        }
    }

    pub fn is_active(&self, direction: Direction) -> bool {
        match direction {
            Direction::Up => self.up,
            Direction::Down => self.down,
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }

    pub fn any(&self) -> bool {
        self.up || self.down || self.left || self.right
    }

    /// Sum of the active directions' unit vectors (not normalized)
    pub fn vector(&self) -> Vec2 {
        Direction::ALL
            .into_iter()
            .filter(|d| self.is_active(*d))
            .map(Direction::vector)
            .sum()
    }
}

/// A player on the ground
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Guernsey number, 1-based
    pub number: u8,
    pub side: Side,
    pub pos: Vec2,
    pub vel: Vec2,
    pub is_controlled: bool,
    pub facing: Direction,
    pub intents: Intents,
}

impl Player {
    pub fn new(number: u8, side: Side, pos: Vec2) -> Self {
        Self {
            number,
            side,
            pos,
            vel: Vec2::ZERO,
            is_controlled: false,
            facing: Direction::default(),
            intents: Intents::default(),
        }
    }

    pub fn set_intent(&mut self, direction: Direction, active: bool) {
        self.intents.set(direction, active);
    }

    /// Move from held intents. Diagonals are rescaled so speed never exceeds
    /// `top_speed`.
    pub fn update_controlled(&mut self, dt: f32, top_speed: f32) {
        let mut vel = self.intents.vector() * top_speed;
        if vel.length() > top_speed {
            vel = vel.normalize_or_zero() * top_speed;
        }
        self.vel = vel;
        self.pos += self.vel * dt;

        if let Some(facing) = Direction::from_vector(self.intents.vector()) {
            self.facing = facing;
        }
    }

    /// Seek `target` at `speed`, standing still once within `arrive_radius`
    pub fn move_toward(&mut self, target: Vec2, dt: f32, speed: f32, arrive_radius: f32) {
        let to_target = target - self.pos;
        if to_target.length() <= arrive_radius {
            self.vel = Vec2::ZERO;
            return;
        }
        self.vel = to_target.normalize_or_zero() * speed;
        self.pos += self.vel * dt;

        if let Some(facing) = Direction::from_vector(self.vel) {
            self.facing = facing;
        }
    }
}
