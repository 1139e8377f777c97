//! Match state and core simulation types
//!
//! All state that must be kept for determinism lives here.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::ball::Ball;
use super::field::FieldGeometry;
use super::player::{Player, Side};
use crate::consts::*;
use crate::tuning::Tuning;

/// Horizontal spread of the starting layout around each side's column
pub const LAYOUT_JITTER: f32 = 100.0;

/// Odd constant used to decorrelate successive streams of one seed
const STREAM_SALT: u64 = 0x9E37_79B9_7F4A_7C15;

/// RNG state wrapper for serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub stream: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed, stream: 0 }
    }

    /// Hand out a fresh generator and advance to the next stream, so each
    /// consumer sees different numbers while the whole match stays
    /// reproducible from the seed.
    pub fn next_rng(&mut self) -> Pcg32 {
        let rng = Pcg32::seed_from_u64(self.seed ^ self.stream.wrapping_mul(STREAM_SALT));
        self.stream = self.stream.wrapping_add(1);
        rng
    }
}

/// Uniform sample in `[lo, hi)`; returns `lo` for an empty range
pub fn uniform(rng: &mut Pcg32, lo: f32, hi: f32) -> f32 {
    lo + (hi - lo).max(0.0) * rng.random::<f32>()
}

/// Complete match state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchState {
    /// Match seed for reproducibility
    pub seed: u64,
    pub rng_state: RngState,
    pub ball: Ball,
    /// Home players first, then away; order never changes
    pub players: Vec<Player>,
    /// Index into `players` of the human-controlled player
    controlled: usize,
    /// Ball containment at the end of the previous tick
    pub ball_was_inside: bool,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Simulated seconds
    pub elapsed: f32,
}

impl MatchState {
    /// Kick-off layout: ball at the centre, each side spread down its own
    /// half with the first home player under control.
    pub fn new(seed: u64, field: &FieldGeometry, tuning: &Tuning) -> Self {
        let mut rng_state = RngState::new(seed);
        let mut rng = rng_state.next_rng();

        let row_gap = field.height / (PLAYERS_PER_TEAM as f32 + 1.0);
        let mut players = Vec::with_capacity(PLAYERS_PER_TEAM * 2);
        for (side, column) in [(Side::Home, 0.25), (Side::Away, 0.75)] {
            let base_x = field.width * column;
            for i in 0..PLAYERS_PER_TEAM {
                let x = base_x + uniform(&mut rng, -LAYOUT_JITTER, LAYOUT_JITTER);
                let y = row_gap * (i as f32 + 1.0);
                let pos = field.project_inside(Vec2::new(x, y), tuning.player_margin);
                players.push(Player::new(i as u8 + 1, side, pos));
            }
        }
        players[0].is_controlled = true;

        Self {
            seed,
            rng_state,
            ball: Ball::new(field.centre()),
            players,
            controlled: 0,
            ball_was_inside: true,
            time_ticks: 0,
            elapsed: 0.0,
        }
    }

    pub fn controlled_index(&self) -> usize {
        self.controlled
    }

    pub fn controlled(&self) -> &Player {
        &self.players[self.controlled]
    }

    pub fn controlled_mut(&mut self) -> &mut Player {
        &mut self.players[self.controlled]
    }

    /// Hand control to player `to`. Held intents follow the human, so they
    /// move across with the flag. Returns false for an out-of-range index.
    pub fn transfer_control(&mut self, to: usize) -> bool {
        if to >= self.players.len() {
            return false;
        }
        if to == self.controlled {
            return true;
        }
        let intents = std::mem::take(&mut self.players[self.controlled].intents);
        self.players[self.controlled].is_controlled = false;
        self.players[to].is_controlled = true;
        self.players[to].intents = intents;
        self.controlled = to;
        true
    }

    /// Teammate of player `from` closest to the ball, excluding `from`
    pub fn nearest_teammate_to_ball(&self, from: usize) -> Option<usize> {
        let side = self.players.get(from)?.side;
        let ball = self.ball.pos;
        self.players
            .iter()
            .enumerate()
            .filter(|(i, p)| *i != from && p.side == side)
            .min_by(|(_, a), (_, b)| {
                a.pos
                    .distance_squared(ball)
                    .partial_cmp(&b.pos.distance_squared(ball))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|(i, _)| i)
    }

    /// Players of one side, with their roster indices
    pub fn side_players(&self, side: Side) -> impl Iterator<Item = (usize, &Player)> {
        self.players.iter().enumerate().filter(move |(_, p)| p.side == side)
    }
}
