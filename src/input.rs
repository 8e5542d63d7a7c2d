//! Logical input actions
//!
//! The core never reads raw device events. The host maps whatever keys,
//! buttons or touches it likes onto this fixed action set and answers a
//! single query: is the action currently held.

use std::collections::HashSet;

/// The fixed set of logical actions the simulation understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
    Dash,
    Fire,
    SlowTime,
    Rewind,
    PauseToggle,
}

/// Input capability provided by the host
pub trait InputSource {
    fn is_held(&self, action: Action) -> bool;
}

/// Plain held-action set. Useful for tests and simple hosts that do their
/// own key tracking.
#[derive(Debug, Clone, Default)]
pub struct HeldSet {
    held: HashSet<Action>,
}

impl HeldSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, action: Action) {
        self.held.insert(action);
    }

    pub fn release(&mut self, action: Action) {
        self.held.remove(&action);
    }

    pub fn clear(&mut self) {
        self.held.clear();
    }
}

impl InputSource for HeldSet {
    fn is_held(&self, action: Action) -> bool {
        self.held.contains(&action)
    }
}
