//! Speech announcer
//!
//! Speaks the newest assistant message when voice output is on. Every
//! announcement cancels the engine's current utterance first, so at most one
//! reply is ever audible.

use crate::chat::models::Message;
use crate::config::SpeechConfig;
use crate::speech::engine::{SpeechEngine, Utterance};
use crate::speech::error::SpeechError;
use crate::speech::language::detect_locale;
use crate::speech::voice_select::select_voice;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info};

/// What an announcement did
#[derive(Debug, Clone, PartialEq)]
pub enum AnnounceOutcome {
    /// Voice output is off
    Disabled,
    /// The conversation is empty or its last message is from the user
    NothingToSay,
    /// The utterance was handed to the engine
    Spoken(Utterance),
}

/// Turns assistant messages into speech
///
/// Clones share the engine and the voice switch, so a clone handed to a
/// background task sees toggles made through the original.
#[derive(Clone)]
pub struct SpeechAnnouncer {
    engine: Arc<dyn SpeechEngine>,
    enabled: Arc<Mutex<bool>>,
    rate: f32,
    pitch: f32,
}

impl SpeechAnnouncer {
    /// Create an announcer using the configured rate, pitch and voice default
    pub fn new(engine: Arc<dyn SpeechEngine>, config: &SpeechConfig) -> Self {
        Self {
            engine,
            enabled: Arc::new(Mutex::new(config.enabled_by_default)),
            rate: config.rate,
            pitch: config.pitch,
        }
    }

    /// The engine announcements are sent to
    pub fn engine(&self) -> &Arc<dyn SpeechEngine> {
        &self.engine
    }

    /// Whether voice output is on
    pub fn is_enabled(&self) -> bool {
        *self.switch()
    }

    /// Turn voice output on or off
    ///
    /// Turning it off silences the current utterance. Returns `false` if the
    /// switch was already in the requested position.
    pub fn set_enabled(&self, enabled: bool) -> bool {
        let mut switch = self.switch();
        if *switch == enabled {
            return false;
        }
        *switch = enabled;
        if !enabled {
            self.engine.cancel();
        }
        true
    }

    /// Speak the last message if it is from the assistant and voice is on
    ///
    /// The switch is checked again once the voice list is available, so an
    /// announcement that was waiting for voices stays silent if voice output
    /// was turned off meanwhile.
    ///
    /// # Errors
    /// * `SpeechError` - the engine refused the utterance
    pub async fn announce(&self, messages: &[Message]) -> Result<AnnounceOutcome, SpeechError> {
        if !self.is_enabled() {
            return Ok(AnnounceOutcome::Disabled);
        }

        let message = match messages.last() {
            Some(message) if message.is_assistant() => message,
            _ => return Ok(AnnounceOutcome::NothingToSay),
        };

        let utterance = self.prepare(&message.content).await;

        // Held across cancel and speak so a concurrent toggle lands before or after both
        let switch = self.switch();
        if !*switch {
            debug!("Voice turned off while preparing, skipping announcement");
            return Ok(AnnounceOutcome::Disabled);
        }
        self.engine.cancel();
        self.engine.speak(utterance.clone())?;
        drop(switch);

        info!(
            lang = %utterance.lang,
            voice = utterance.voice.as_ref().map(|v| v.name.as_str()).unwrap_or("default"),
            text_len = utterance.text.len(),
            "Speaking assistant message"
        );

        Ok(AnnounceOutcome::Spoken(utterance))
    }

    /// Build the utterance for `text`, waiting for the voice list if needed
    pub async fn prepare(&self, text: &str) -> Utterance {
        let locale = detect_locale(text);

        let mut voices = self.engine.list_voices();
        if voices.is_empty() {
            debug!("Voice list not loaded yet, waiting");
            self.engine.voices_ready().await;
            voices = self.engine.list_voices();
        }

        let voice = select_voice(&voices, locale);
        debug!(
            locale = locale.tag(),
            available = voices.len(),
            selected = ?voice.as_ref().map(|v| &v.name),
            "Voice selected"
        );

        Utterance {
            text: text.to_string(),
            lang: locale.tag().to_string(),
            voice,
            rate: self.rate,
            pitch: self.pitch,
        }
    }

    fn switch(&self) -> MutexGuard<'_, bool> {
        self.enabled
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
