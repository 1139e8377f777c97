//! Club roster
//!
//! Eighteen clubs, each with its guernsey colours. Matches pick two of them
//! by index.

use serde::Serialize;

/// An sRGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// From a 0xRRGGBB literal
    pub const fn hex(value: u32) -> Self {
        Self {
            r: ((value >> 16) & 0xFF) as u8,
            g: ((value >> 8) & 0xFF) as u8,
            b: (value & 0xFF) as u8,
        }
    }

    pub fn to_rgba(self) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            1.0,
        ]
    }

    /// `#RRGGBB`
    pub fn css(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Closed set of guernsey colour families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum KitColor {
    Red,
    Blue,
    Black,
    Purple,
    Brown,
    Gold,
    Orange,
    Green,
    /// Anything without a dedicated family
    Other,
}

impl KitColor {
    /// Family of a primary colour
    pub fn of(color: Rgb) -> Self {
        match (color.r, color.g, color.b) {
            (0xFF, 0x00, 0x00) => KitColor::Red,
            (0x00, 0x00, 0xFF) => KitColor::Blue,
            (0x00, 0x00, 0x00) => KitColor::Black,
            (0x80, 0x00, 0x80) => KitColor::Purple,
            (0x8B, 0x45, 0x13) => KitColor::Brown,
            (0xFF, 0xD7, 0x00) | (0xFF, 0xFF, 0x00) => KitColor::Gold,
            (0xFF, 0xA5, 0x00) => KitColor::Orange,
            (0x00, 0x80, 0x00) => KitColor::Green,
            _ => KitColor::Other,
        }
    }
}

/// A club
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Team {
    pub id: &'static str,
    pub name: &'static str,
    pub city: &'static str,
    pub primary: Rgb,
    pub secondary: Rgb,
    /// Colour for text drawn over `primary`
    pub text: Rgb,
}

impl Team {
    pub fn kit(&self) -> KitColor {
        KitColor::of(self.primary)
    }

    /// "City Name", e.g. "Adelaide Crows"
    pub fn full_name(&self) -> String {
        format!("{} {}", self.city, self.name)
    }
}

const WHITE: Rgb = Rgb::hex(0xFFFFFF);
const BLACK: Rgb = Rgb::hex(0x000000);

const fn club(
    id: &'static str,
    name: &'static str,
    city: &'static str,
    primary: u32,
    secondary: u32,
    text: Rgb,
) -> Team {
    Team {
        id,
        name,
        city,
        primary: Rgb::hex(primary),
        secondary: Rgb::hex(secondary),
        text,
    }
}

pub static TEAMS: [Team; 18] = [
    club("adelaide", "Crows", "Adelaide", 0xFF0000, 0xFFFF00, WHITE),
    club("brisbane", "Lions", "Brisbane", 0x800080, 0xFFD700, WHITE),
    club("carlton", "Blues", "Carlton", 0x0000FF, 0xFFFFFF, WHITE),
    club("collingwood", "Magpies", "Collingwood", 0x000000, 0xFFFFFF, WHITE),
    club("essendon", "Bombers", "Essendon", 0xFF0000, 0x000000, WHITE),
    club("fremantle", "Dockers", "Fremantle", 0x800080, 0xFFFFFF, WHITE),
    club("geelong", "Cats", "Geelong", 0x0000FF, 0xFFFFFF, WHITE),
    club("hawthorn", "Hawks", "Hawthorn", 0x8B4513, 0xFFD700, WHITE),
    club("melbourne", "Demons", "Melbourne", 0xFF0000, 0x0000FF, WHITE),
    club("richmond", "Tigers", "Richmond", 0xFFD700, 0x000000, BLACK),
    club("stkilda", "Saints", "St Kilda", 0xFF0000, 0xFFFFFF, WHITE),
    club("sydney", "Swans", "Sydney", 0xFF0000, 0xFFFFFF, WHITE),
    club("westcoast", "Eagles", "West Coast", 0x0000FF, 0xFFD700, WHITE),
    club("bulldogs", "Bulldogs", "Western", 0xFF0000, 0x0000FF, WHITE),
    club("gold_coast", "Suns", "Gold Coast", 0xFFD700, 0xFF0000, BLACK),
    club("gws", "Giants", "GWS", 0xFFA500, 0x000000, WHITE),
    club("darwin", "Devils", "Darwin", 0x8B0000, 0xFFFFFF, WHITE),
    club("canberra", "Capitals", "Canberra", 0x008000, 0xFFFFFF, WHITE),
];

/// Club by roster index
pub fn team(index: usize) -> Option<&'static Team> {
    TEAMS.get(index)
}

/// Club by id, e.g. `"geelong"`
pub fn team_by_id(id: &str) -> Option<&'static Team> {
    TEAMS.iter().find(|t| t.id == id)
}
