use std::process::{
    Child,
    Command,
    Stdio,
};

use serde::{
    Deserialize,
    Serialize,
};
use tracing::{
    debug,
    warn,
};

use crate::core::DeckError;

const BASE_WORDS_PER_MINUTE: f32 = 175.0;
const TEXT_PLACEHOLDER: &str = "{text}";

/// Fire-and-forget pronunciation. Implementations must not block and must
/// cut off any utterance still playing when a new one starts.
pub trait Speaker {
    fn speak(&mut self, text: &str);

    fn stop(&mut self) {}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechSettings {
    pub enabled: bool,
    pub language: String,
    pub rate: f32,
    /// Overrides the platform command. `{text}` is replaced by the term; if
    /// absent the term is appended as the last argument.
    pub command: Option<Vec<String>>,
}

impl Default for SpeechSettings {
    fn default() -> Self {
        Self { enabled: true, language: "zh-CN".to_string(), rate: 0.9, command: None }
    }
}

impl SpeechSettings {
    fn words_per_minute(&self) -> u32 {
        (BASE_WORDS_PER_MINUTE * self.rate.clamp(0.1, 4.0)).round() as u32
    }
}

/// Speaks through the host's text-to-speech program (`say` on macOS,
/// `espeak-ng` elsewhere on unix, or a configured command).
pub struct SystemSpeaker {
    settings: SpeechSettings,
    child: Option<Child>,
    unavailable: bool,
}

impl SystemSpeaker {
    pub fn new(settings: SpeechSettings) -> Self {
        Self { settings, child: None, unavailable: false }
    }

    fn spawn(&self, text: &str) -> Result<Child, DeckError> {
        let (program, args) = build_command(&self.settings, text).ok_or_else(|| {
            DeckError::Speech("no text-to-speech command for this platform".to_string())
        })?;

        let child = Command::new(&program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| DeckError::Speech(format!("could not start {}: {}", program, e)))?;

        debug!("Speaking {:?} with {}", text, program);
        Ok(child)
    }
}

impl Speaker for SystemSpeaker {
    fn speak(&mut self, text: &str) {
        let text = text.trim();
        if self.unavailable || text.is_empty() {
            return;
        }

        self.stop();

        match self.spawn(text) {
            Ok(child) => self.child = Some(child),
            Err(e) => {
                warn!("{}. Speech disabled.", e);
                self.unavailable = true;
            }
        }
    }

    fn stop(&mut self) {
        if let Some(mut child) = self.child.take() {
            if let Ok(None) = child.try_wait() {
                let _ = child.kill();
            }
            let _ = child.wait();
        }
    }
}

impl Drop for SystemSpeaker {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Used when speech is switched off.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentSpeaker;

impl Speaker for SilentSpeaker {
    fn speak(&mut self, _text: &str) {}
}

pub fn speaker_from_settings(settings: &SpeechSettings) -> Box<dyn Speaker> {
    if settings.enabled {
        Box::new(SystemSpeaker::new(settings.clone()))
    } else {
        Box::new(SilentSpeaker)
    }
}

fn build_command(settings: &SpeechSettings, text: &str) -> Option<(String, Vec<String>)> {
    if let Some(template) = &settings.command {
        let (program, rest) = template.split_first()?;
        let mut args: Vec<String> =
            rest.iter().map(|arg| arg.replace(TEXT_PLACEHOLDER, text)).collect();
        if !rest.iter().any(|arg| arg.contains(TEXT_PLACEHOLDER)) {
            args.push(text.to_string());
        }
        return Some((program.clone(), args));
    }

    platform_command(settings, text)
}

#[cfg(target_os = "macos")]
fn platform_command(settings: &SpeechSettings, text: &str) -> Option<(String, Vec<String>)> {
    let mut args = vec!["-r".to_string(), settings.words_per_minute().to_string()];
    if let Some(voice) = say_voice(&settings.language) {
        args.push("-v".to_string());
        args.push(voice.to_string());
    }
    args.push(text.to_string());
    Some(("say".to_string(), args))
}

#[cfg(target_os = "macos")]
fn say_voice(language: &str) -> Option<&'static str> {
    match language.to_lowercase().as_str() {
        "zh-cn" | "zh" | "cmn" => Some("Tingting"),
        "zh-tw" => Some("Meijia"),
        "ja-jp" | "ja" => Some("Kyoko"),
        _ => None,
    }
}

#[cfg(all(unix, not(target_os = "macos")))]
fn platform_command(settings: &SpeechSettings, text: &str) -> Option<(String, Vec<String>)> {
    Some((
        "espeak-ng".to_string(),
        vec![
            "-v".to_string(),
            espeak_voice(&settings.language),
            "-s".to_string(),
            settings.words_per_minute().to_string(),
            text.to_string(),
        ],
    ))
}

#[cfg(not(unix))]
fn platform_command(_settings: &SpeechSettings, _text: &str) -> Option<(String, Vec<String>)> {
    None
}

#[cfg_attr(not(all(unix, not(target_os = "macos"))), allow(dead_code))]
fn espeak_voice(language: &str) -> String {
    match language.to_lowercase().as_str() {
        "zh-cn" | "zh" => "cmn".to_string(),
        "zh-tw" => "cmn-latn-pinyin".to_string(),
        "zh-hk" | "yue" => "yue".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_command_placeholder() {
        let settings = SpeechSettings {
            command: Some(vec!["tts".into(), "--say={text}".into(), "--fast".into()]),
            ..Default::default()
        };
        let (program, args) = build_command(&settings, "你好").unwrap();
        assert_eq!(program, "tts");
        assert_eq!(args, vec!["--say=你好", "--fast"]);
    }

    #[test]
    fn test_custom_command_appends_text() {
        let settings =
            SpeechSettings { command: Some(vec!["speak".into(), "-q".into()]), ..Default::default() };
        let (_, args) = build_command(&settings, "谢谢").unwrap();
        assert_eq!(args, vec!["-q", "谢谢"]);

        let empty = SpeechSettings { command: Some(Vec::new()), ..Default::default() };
        assert!(build_command(&empty, "谢谢").is_none());
    }

    #[test]
    fn test_rate_and_voice() {
        let normal = SpeechSettings { rate: 1.0, ..Default::default() };
        assert_eq!(normal.words_per_minute(), 175);
        let clamped = SpeechSettings { rate: 10.0, ..Default::default() };
        assert_eq!(clamped.words_per_minute(), 700);
        assert_eq!(espeak_voice("zh-CN"), "cmn");
        assert_eq!(espeak_voice("fr"), "fr");
    }

    #[test]
    fn test_missing_program_degrades_to_silence() {
        let settings = SpeechSettings {
            command: Some(vec!["hanzideck-no-such-tts-program".into()]),
            ..Default::default()
        };
        let mut speaker = SystemSpeaker::new(settings);
        assert!(matches!(speaker.spawn("大"), Err(DeckError::Speech(_))));

        speaker.speak("大");
        assert!(speaker.unavailable);
        speaker.speak("多");
        assert!(speaker.child.is_none());
    }

    #[cfg(target_os = "linux")]
    fn is_running(pid: u32) -> bool {
        std::path::Path::new(&format!("/proc/{}", pid)).exists()
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_new_utterance_cuts_off_previous() {
        let settings = SpeechSettings {
            command: Some(vec!["sleep".into(), "{text}".into()]),
            ..Default::default()
        };
        let mut speaker = SystemSpeaker::new(settings);

        speaker.speak("5");
        let first = speaker.child.as_ref().map(Child::id).unwrap();
        assert!(is_running(first));

        speaker.speak("5");
        let second = speaker.child.as_ref().map(Child::id).unwrap();
        assert_ne!(first, second);
        assert!(!is_running(first));
        assert!(is_running(second));

        speaker.stop();
        assert!(speaker.child.is_none());
        assert!(!is_running(second));
    }
}
