//! Player sprite selection
//!
//! Three guernsey sprite sets exist, each drawn facing four ways. Every club
//! colour family maps onto one of them.

use std::fmt;

use crate::sim::{Direction, Player, Side};
use crate::teams::{KitColor, Team};

/// Available sprite colour sets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpriteVariant {
    Red,
    Blue,
    Black,
}

impl SpriteVariant {
    pub fn as_str(self) -> &'static str {
        match self {
            SpriteVariant::Red => "red",
            SpriteVariant::Blue => "blue",
            SpriteVariant::Black => "black",
        }
    }
}

impl From<KitColor> for SpriteVariant {
    fn from(kit: KitColor) -> Self {
        match kit {
            KitColor::Red | KitColor::Purple | KitColor::Gold | KitColor::Orange => {
                SpriteVariant::Red
            }
            KitColor::Blue | KitColor::Green => SpriteVariant::Blue,
            KitColor::Black | KitColor::Brown => SpriteVariant::Black,
            KitColor::Other => SpriteVariant::Red,
        }
    }
}

fn facing_str(facing: Direction) -> &'static str {
    match facing {
        Direction::Up => "up",
        Direction::Down => "down",
        Direction::Left => "left",
        Direction::Right => "right",
    }
}

/// One frame in the sprite atlas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpriteId {
    pub variant: SpriteVariant,
    pub facing: Direction,
}

impl SpriteId {
    /// Asset name, e.g. `player_red_up`
    pub fn asset_name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for SpriteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player_{}_{}", self.variant.as_str(), facing_str(self.facing))
    }
}

/// Sprite sets for the two clubs in a match, resolved once at kick-off
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteSheet {
    pub home: SpriteVariant,
    pub away: SpriteVariant,
}

impl SpriteSheet {
    pub fn new(home: &Team, away: &Team) -> Self {
        Self {
            home: home.kit().into(),
            away: away.kit().into(),
        }
    }

    pub fn variant(&self, side: Side) -> SpriteVariant {
        match side {
            Side::Home => self.home,
            Side::Away => self.away,
        }
    }

    pub fn sprite_for(&self, player: &Player) -> SpriteId {
        SpriteId {
            variant: self.variant(player.side),
            facing: player.facing,
        }
    }
}
