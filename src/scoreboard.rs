//! Match totals, quarter and clock
//!
//! The default score store. The engine only ever adds to it through
//! [`ScoreSink`]; the host drives the clock.

use std::fmt;

use log::info;
use serde::{Deserialize, Serialize};

use crate::engine::ScoreSink;
use crate::sim::Side;

pub const GOAL_POINTS: u32 = 6;
pub const BEHIND_POINTS: u32 = 1;
pub const QUARTERS: u8 = 4;
/// Length of a quarter (seconds)
pub const QUARTER_SECS: f32 = 1200.0;

/// One side's tally
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub goals: u32,
    pub behinds: u32,
}

impl Score {
    pub fn total(&self) -> u32 {
        self.goals * GOAL_POINTS + self.behinds * BEHIND_POINTS
    }
}

/// Traditional "goals.behinds (total)", e.g. `3.2 (20)`
impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{} ({})", self.goals, self.behinds, self.total())
    }
}

/// Where the match is up to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPhase {
    Playing,
    Paused,
    /// Siren has gone, waiting for the next quarter
    QuarterEnd,
    /// Final siren
    MatchEnd,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scoreboard {
    pub home: Score,
    pub away: Score,
    /// 1-based
    pub quarter: u8,
    /// Seconds remaining in the quarter
    pub clock_secs: f32,
    pub phase: MatchPhase,
}

impl Default for Scoreboard {
    fn default() -> Self {
        Self {
            home: Score::default(),
            away: Score::default(),
            quarter: 1,
            clock_secs: QUARTER_SECS,
            phase: MatchPhase::Playing,
        }
    }
}

impl Scoreboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn score(&self, side: Side) -> Score {
        match side {
            Side::Home => self.home,
            Side::Away => self.away,
        }
    }

    /// Side in front, `None` when level
    pub fn leader(&self) -> Option<Side> {
        let (home, away) = (self.home.total(), self.away.total());
        match home.cmp(&away) {
            std::cmp::Ordering::Greater => Some(Side::Home),
            std::cmp::Ordering::Less => Some(Side::Away),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn margin(&self) -> u32 {
        self.home.total().abs_diff(self.away.total())
    }

    /// Run the clock down. Returns true on the tick the siren sounds.
    pub fn advance_clock(&mut self, dt: f32) -> bool {
        if self.phase != MatchPhase::Playing || !dt.is_finite() || dt <= 0.0 {
            return false;
        }
        self.clock_secs = (self.clock_secs - dt).max(0.0);
        if self.clock_secs > 0.0 {
            return false;
        }
        self.phase = if self.quarter >= QUARTERS {
            MatchPhase::MatchEnd
        } else {
            MatchPhase::QuarterEnd
        };
        info!("Siren: end of quarter {} ({} v {})", self.quarter, self.home, self.away);
        true
    }

    /// Start the next quarter after a break. No-op at any other time.
    pub fn next_quarter(&mut self) -> bool {
        if self.phase != MatchPhase::QuarterEnd {
            return false;
        }
        self.quarter += 1;
        self.clock_secs = QUARTER_SECS;
        self.phase = MatchPhase::Playing;
        true
    }

    pub fn toggle_pause(&mut self) {
        self.phase = match self.phase {
            MatchPhase::Playing => MatchPhase::Paused,
            MatchPhase::Paused => MatchPhase::Playing,
            other => other,
        };
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Clock as `MM:SS`
    pub fn format_clock(&self) -> String {
        let secs = self.clock_secs.ceil() as u32;
        format!("{:02}:{:02}", secs / 60, secs % 60)
    }
}

impl ScoreSink for Scoreboard {
    fn add_score(&mut self, side: Side, goals: u32, behinds: u32) {
        let score = match side {
            Side::Home => &mut self.home,
            Side::Away => &mut self.away,
        };
        score.goals += goals;
        score.behinds += behinds;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_display() {
        let score = Score { goals: 3, behinds: 2 };
        assert_eq!(score.total(), 20);
        assert_eq!(score.to_string(), "3.2 (20)");
    }

    #[test]
    fn test_add_score_is_additive() {
        let mut board = Scoreboard::new();
        board.add_score(Side::Home, 1, 0);
        board.add_score(Side::Home, 0, 1);
        board.add_score(Side::Away, 0, 1);
        assert_eq!(board.home, Score { goals: 1, behinds: 1 });
        assert_eq!(board.away.total(), 1);
        assert_eq!(board.leader(), Some(Side::Home));
        assert_eq!(board.margin(), 6);
    }

    #[test]
    fn test_quarters_run_to_final_siren() {
        let mut board = Scoreboard::new();
        for quarter in 1..=QUARTERS {
            assert_eq!(board.quarter, quarter);
            assert!(!board.advance_clock(QUARTER_SECS - 1.0));
            assert!(board.advance_clock(2.0));
            assert_eq!(board.clock_secs, 0.0);
            board.next_quarter();
        }
        assert_eq!(board.phase, MatchPhase::MatchEnd);
        assert!(!board.next_quarter());
        assert!(!board.advance_clock(1.0));
    }

    #[test]
    fn test_paused_clock_holds() {
        let mut board = Scoreboard::new();
        board.toggle_pause();
        assert!(!board.advance_clock(10.0));
        assert_eq!(board.clock_secs, QUARTER_SECS);
        board.toggle_pause();
        board.advance_clock(10.0);
        assert_eq!(board.format_clock(), "19:50");
    }

    #[test]
    fn test_reset() {
        let mut board = Scoreboard::new();
        board.add_score(Side::Away, 2, 3);
        board.advance_clock(100.0);
        board.reset();
        assert_eq!(board.away, Score::default());
        assert_eq!(board.quarter, 1);
        assert_eq!(board.format_clock(), "20:00");
    }
}
