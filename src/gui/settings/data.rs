use std::{
    path::PathBuf,
    time::Duration,
};

use serde::{
    Deserialize,
    Serialize,
};

use crate::{
    core::{
        gesture::DEFAULT_SWIPE_THRESHOLD,
        session::DEFAULT_TRANSITION_TIMEOUT,
        SessionOptions,
    },
    speech::SpeechSettings,
};

pub const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsData {
    /// `None` follows the system theme.
    pub dark_mode: Option<bool>,
    pub speech: SpeechSettings,
    pub swipe_threshold: f32,
    pub transition_timeout_ms: u64,
    pub last_deck_path: Option<PathBuf>,
    /// Font with CJK coverage, tried before the system fonts.
    pub font_path: Option<PathBuf>,
}

impl Default for SettingsData {
    fn default() -> Self {
        Self {
            dark_mode: None,
            speech: SpeechSettings::default(),
            swipe_threshold: DEFAULT_SWIPE_THRESHOLD,
            transition_timeout_ms: DEFAULT_TRANSITION_TIMEOUT.as_millis() as u64,
            last_deck_path: None,
            font_path: None,
        }
    }
}

impl SettingsData {
    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            swipe_threshold: self.swipe_threshold,
            transition_timeout: Duration::from_millis(self.transition_timeout_ms.max(1)),
        }
    }
}
