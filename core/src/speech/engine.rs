//! Speech engine abstraction
//!
//! The announcer talks to synthesis through [`SpeechEngine`] so any backend
//! (a command-line synthesizer, a platform API, a test double) can be used.

use crate::speech::error::SpeechError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A voice offered by the engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voice {
    /// Engine-specific voice name, also used to select it
    pub name: String,
    /// BCP 47-ish language tag, e.g. `en-US`, `ar`, `en_GB`
    pub lang: String,
}

impl Voice {
    /// Create a voice descriptor
    pub fn new(name: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lang: lang.into(),
        }
    }
}

/// One unit of speech: text plus how to say it
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    /// Text to speak
    pub text: String,
    /// Locale tag the text is in
    pub lang: String,
    /// Voice to use; `None` leaves the choice to the engine
    pub voice: Option<Voice>,
    /// Speaking rate, 1.0 is normal
    pub rate: f32,
    /// Pitch, 1.0 is the engine default
    pub pitch: f32,
}

/// Capability set required from a speech synthesizer
#[async_trait]
pub trait SpeechEngine: Send + Sync {
    /// Voices currently known; may be empty until [`SpeechEngine::voices_ready`] resolves
    fn list_voices(&self) -> Vec<Voice>;

    /// Resolves once the voice list has been populated
    ///
    /// Resolves immediately if it already has. Engines whose voice discovery
    /// fails must still resolve (with an empty list).
    async fn voices_ready(&self);

    /// Stop whatever is currently being spoken
    fn cancel(&self);

    /// Start speaking; returns once playback has been handed to the engine
    fn speak(&self, utterance: Utterance) -> Result<(), SpeechError>;
}
