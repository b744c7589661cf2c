//! Speech-specific error types

use thiserror::Error;

/// Errors raised by speech engines
///
/// These never become chat messages; the announcer logs them and moves on.
#[derive(Error, Debug)]
pub enum SpeechError {
    /// The synthesizer process could not be started
    #[error("Failed to spawn synthesizer: {0}")]
    Spawn(#[from] std::io::Error),

    /// The synthesizer ran but reported a failure
    #[error("Synthesizer failed: {0}")]
    Failed(String),

    /// No synthesizer is available on this system
    #[error("Speech synthesis unavailable: {0}")]
    Unavailable(String),
}
