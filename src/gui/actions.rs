use crate::core::Intent;

// A simple ui action queue so widgets don't need mutable access to the session
#[derive(Debug, Clone)]
pub enum UiAction {
    // Deck state, forwarded to the study session
    Study(Intent),

    // Deck source
    OpenDeckFile,
    UseBuiltinDeck,

    // Preferences
    ToggleTheme,
    SetSpeechEnabled(bool),
}

impl From<Intent> for UiAction {
    fn from(intent: Intent) -> Self {
        UiAction::Study(intent)
    }
}

pub struct ActionQueue {
    actions: Vec<UiAction>,
}

impl ActionQueue {
    pub fn new() -> Self {
        Self { actions: Vec::new() }
    }

    pub fn push(&mut self, action: impl Into<UiAction>) {
        self.actions.push(action.into());
    }

    pub fn drain(&mut self) -> std::vec::Drain<'_, UiAction> {
        self.actions.drain(..)
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl Default for ActionQueue {
    fn default() -> Self {
        Self::new()
    }
}
