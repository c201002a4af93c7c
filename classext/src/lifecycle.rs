use std::fmt;

use serde::{Deserialize, Serialize};

/// Registration state of the singleton extension object.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LibraryState {
    #[default]
    Unregistered,
    Registering,
    Registered,
    Unregistering,
}

impl fmt::Display for LibraryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LibraryState::Unregistered => "unregistered",
            LibraryState::Registering => "registering",
            LibraryState::Registered => "registered",
            LibraryState::Unregistering => "unregistering",
        };
        f.write_str(name)
    }
}

/// One recorded state transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifecycleEvent {
    pub from_state: LibraryState,
    pub to_state: LibraryState,
    /// Device name in effect, if one had been chosen.
    pub name: Option<String>,
    pub error: Option<String>,
}

/// Current state plus the history of transitions.
#[derive(Debug, Clone, Default)]
pub struct LifecycleTracker {
    state: LibraryState,
    events: Vec<LifecycleEvent>,
}

impl LifecycleTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> LibraryState {
        self.state
    }

    pub fn transition(&mut self, to_state: LibraryState, name: Option<&str>) {
        self.record(to_state, name, None);
    }

    pub fn fail(&mut self, to_state: LibraryState, name: Option<&str>, error: &str) {
        self.record(to_state, name, Some(error));
    }

    fn record(&mut self, to_state: LibraryState, name: Option<&str>, error: Option<&str>) {
        let from_state = self.state;
        self.state = to_state;
        self.events.push(LifecycleEvent {
            from_state,
            to_state,
            name: name.map(str::to_string),
            error: error.map(str::to_string),
        });
    }

    pub fn events(&self) -> &[LifecycleEvent] {
        &self.events
    }

    /// States visited, starting with the initial one.
    pub fn path(&self) -> Vec<LibraryState> {
        std::iter::once(LibraryState::Unregistered)
            .chain(self.events.iter().map(|e| e.to_state))
            .collect()
    }
}
