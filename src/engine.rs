//! Match engine
//!
//! Host-facing wrapper around the simulation. Owns the field, the match
//! state and the input mapper; forwards tick events to the score and audio
//! collaborators.
//!
//! Lifecycle: `Created --start--> Running --destroy--> Destroyed`. Updates
//! only run while `Running`, and every entry point is a no-op once
//! destroyed.

use log::{debug, info};

use crate::audio::{AudioSink, OUT_ON_THE_FULL, SoundEffect};
use crate::consts::MAX_FRAME_DT;
use crate::input::{InputCommand, InputMapper, is_game_key};
use crate::renderer::{DrawSurface, SpriteSheet, draw_match};
use crate::sim::{FieldGeometry, MatchEvent, MatchState, Side, TickInput, tick};
use crate::teams::Team;
use crate::tuning::Tuning;

/// Receives scoring. Calls are additive: a goal is `(side, 1, 0)`, a
/// behind `(side, 0, 1)`.
pub trait ScoreSink {
    fn add_score(&mut self, side: Side, goals: u32, behinds: u32);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Created,
    Running,
    Destroyed,
}

pub struct MatchEngine<S: ScoreSink, A: AudioSink> {
    field: FieldGeometry,
    tuning: Tuning,
    state: MatchState,
    input: InputMapper,
    /// Actions queued since the last update
    pending: TickInput,
    home: &'static Team,
    away: &'static Team,
    sprites: SpriteSheet,
    scores: S,
    audio: A,
    lifecycle: Lifecycle,
}

impl<S: ScoreSink, A: AudioSink> MatchEngine<S, A> {
    pub fn new(home: &'static Team, away: &'static Team, scores: S, audio: A, seed: u64) -> Self {
        Self::with_tuning(
            home,
            away,
            scores,
            audio,
            seed,
            Tuning::default(),
            FieldGeometry::default(),
        )
    }

    pub fn with_tuning(
        home: &'static Team,
        away: &'static Team,
        scores: S,
        audio: A,
        seed: u64,
        tuning: Tuning,
        field: FieldGeometry,
    ) -> Self {
        let tuning = tuning.sanitized();
        let state = MatchState::new(seed, &field, &tuning);
        Self {
            field,
            tuning,
            state,
            input: InputMapper::new(),
            pending: TickInput::default(),
            home,
            away,
            sprites: SpriteSheet::new(home, away),
            scores,
            audio,
            lifecycle: Lifecycle::Created,
        }
    }

    pub fn start(&mut self) {
        if self.lifecycle != Lifecycle::Created {
            return;
        }
        self.lifecycle = Lifecycle::Running;
        self.audio.resume();
        info!(
            "Kick-off: {} v {} (seed {})",
            self.home.full_name(),
            self.away.full_name(),
            self.state.seed
        );
    }

    /// Advance one display frame. Frames longer than `MAX_FRAME_DT` are
    /// clamped; negative or non-finite `dt` is ignored.
    pub fn update(&mut self, dt: f32) -> Vec<MatchEvent> {
        if self.lifecycle != Lifecycle::Running || !dt.is_finite() || dt < 0.0 {
            return Vec::new();
        }
        let dt = dt.min(MAX_FRAME_DT);
        let input = std::mem::take(&mut self.pending);

        let events = tick(&mut self.state, &self.field, &self.tuning, &input, dt);
        for event in &events {
            self.dispatch(event);
        }
        events
    }

    /// Draw the current frame. Never mutates the match.
    pub fn render(&self, surface: &mut impl DrawSurface) {
        if self.lifecycle == Lifecycle::Destroyed {
            return;
        }
        draw_match(
            surface,
            &self.field,
            &self.state,
            &self.sprites,
            self.home,
            self.away,
        );
    }

    pub fn destroy(&mut self) {
        if self.lifecycle == Lifecycle::Destroyed {
            return;
        }
        self.release_keys();
        self.audio.shutdown();
        self.lifecycle = Lifecycle::Destroyed;
        info!("Match engine destroyed");
    }

    /// Fresh layout from `seed` for a new match. Scores are the host's to
    /// reset; the lifecycle is unchanged.
    pub fn rematch(&mut self, seed: u64) {
        if self.lifecycle == Lifecycle::Destroyed {
            return;
        }
        self.release_keys();
        self.state = MatchState::new(seed, &self.field, &self.tuning);
        info!("Rematch: {} v {} (seed {seed})", self.home.name, self.away.name);
    }

    /// Feed a `KeyboardEvent.code` press. Returns true when the key belongs
    /// to the game, so the host can suppress the browser default.
    pub fn key_down(&mut self, code: &str) -> bool {
        if self.lifecycle == Lifecycle::Destroyed {
            return false;
        }
        if let Some(command) = self.input.key_down(code) {
            self.apply(command);
        }
        is_game_key(code)
    }

    pub fn key_up(&mut self, code: &str) -> bool {
        if self.lifecycle == Lifecycle::Destroyed {
            return false;
        }
        if let Some(command) = self.input.key_up(code) {
            self.apply(command);
        }
        is_game_key(code)
    }

    /// Drop every held key and any queued action, e.g. on pause or when the
    /// window loses focus and the key-ups will never arrive
    pub fn release_keys(&mut self) {
        for command in self.input.release_all() {
            self.apply(command);
        }
        self.pending = TickInput::default();
    }

    fn apply(&mut self, command: InputCommand) {
        match command {
            InputCommand::Move { direction, active } => {
                self.state.controlled_mut().set_intent(direction, active);
            }
            // Actions only count while the match is live
            InputCommand::Action(action) => {
                if self.lifecycle == Lifecycle::Running {
                    self.pending.queue(action);
                }
            }
        }
    }

    fn dispatch(&mut self, event: &MatchEvent) {
        match *event {
            MatchEvent::Goal { side, .. } => {
                self.scores.add_score(side, 1, 0);
                self.audio.play(SoundEffect::Goal);
                info!("Goal to the {}", self.team(side).name);
            }
            MatchEvent::Behind { side, .. } => {
                self.scores.add_score(side, 0, 1);
                self.audio.play(SoundEffect::Behind);
                info!("Behind to the {}", self.team(side).name);
            }
            MatchEvent::OutOfBounds { on_the_full, .. } => {
                if on_the_full {
                    self.audio.announce(OUT_ON_THE_FULL);
                }
            }
            MatchEvent::Kicked { .. } => self.audio.play(SoundEffect::Kick),
            MatchEvent::Tackled { .. } => self.audio.play(SoundEffect::Tackle),
            MatchEvent::Marked { .. } => self.audio.play(SoundEffect::Mark),
            MatchEvent::ControlTransferred { from, to } => {
                debug!("Control {from} -> {to}");
            }
            MatchEvent::SpecialMove { .. } => {}
        }
    }

    pub fn team(&self, side: Side) -> &'static Team {
        match side {
            Side::Home => self.home,
            Side::Away => self.away,
        }
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut MatchState {
        &mut self.state
    }

    pub fn field(&self) -> &FieldGeometry {
        &self.field
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn sprites(&self) -> &SpriteSheet {
        &self.sprites
    }

    pub fn scores(&self) -> &S {
        &self.scores
    }

    pub fn scores_mut(&mut self) -> &mut S {
        &mut self.scores
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn audio_mut(&mut self) -> &mut A {
        &mut self.audio
    }
}
