//! Keyboard input mapping
//!
//! Turns browser `KeyboardEvent.code` strings into held movement intents and
//! edge-triggered actions. Auto-repeat key-downs are swallowed so holding a
//! key never fires an action twice.

use std::collections::HashSet;

use crate::sim::Direction;

/// One-shot possession actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Kick,
    Mark,
    Tackle,
    Special,
}

/// What a key is bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    Move(Direction),
    Action(Action),
}

/// A state change produced by a key event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputCommand {
    /// Set or clear a movement intent
    Move { direction: Direction, active: bool },
    /// Fire an action once
    Action(Action),
}

/// Key code to binding table
pub const KEY_BINDINGS: &[(&str, Binding)] = &[
    ("KeyW", Binding::Move(Direction::Up)),
    ("ArrowUp", Binding::Move(Direction::Up)),
    ("KeyS", Binding::Move(Direction::Down)),
    ("ArrowDown", Binding::Move(Direction::Down)),
    ("KeyA", Binding::Move(Direction::Left)),
    ("ArrowLeft", Binding::Move(Direction::Left)),
    ("KeyD", Binding::Move(Direction::Right)),
    ("ArrowRight", Binding::Move(Direction::Right)),
    ("KeyJ", Binding::Action(Action::Kick)),
    ("KeyK", Binding::Action(Action::Mark)),
    ("KeyL", Binding::Action(Action::Tackle)),
    ("Space", Binding::Action(Action::Special)),
];

/// Look up a key code; `None` for keys the game does not use
pub fn binding_for(code: &str) -> Option<(&'static str, Binding)> {
    KEY_BINDINGS.iter().find(|(c, _)| *c == code).copied()
}

/// True for keys whose browser default (scrolling) should be suppressed
pub fn is_game_key(code: &str) -> bool {
    binding_for(code).is_some()
}

/// Tracks held keys between events
#[derive(Debug, Default)]
pub struct InputMapper {
    held: HashSet<&'static str>,
}

impl InputMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle a key press. Repeats of an already-held key produce nothing.
    pub fn key_down(&mut self, code: &str) -> Option<InputCommand> {
        let (code, binding) = binding_for(code)?;
        if !self.held.insert(code) {
            return None;
        }
        Some(match binding {
            Binding::Move(direction) => InputCommand::Move { direction, active: true },
            Binding::Action(action) => InputCommand::Action(action),
        })
    }

    /// Handle a key release. Movement keys always clear their intent, even
    /// if the press was never seen (focus changes can eat key-downs).
    pub fn key_up(&mut self, code: &str) -> Option<InputCommand> {
        let (code, binding) = binding_for(code)?;
        self.held.remove(code);
        match binding {
            Binding::Move(direction) => Some(InputCommand::Move { direction, active: false }),
            Binding::Action(_) => None,
        }
    }

    pub fn is_held(&self, code: &str) -> bool {
        self.held.contains(code)
    }

    /// Forget every held key, returning the intents to clear
    pub fn release_all(&mut self) -> Vec<InputCommand> {
        let mut released: Vec<_> = self.held.drain().collect();
        released.sort_unstable();
        released
            .into_iter()
            .filter_map(|code| match binding_for(code) {
                Some((_, Binding::Move(direction))) => {
                    Some(InputCommand::Move { direction, active: false })
                }
                _ => None,
            })
            .collect()
    }
}
