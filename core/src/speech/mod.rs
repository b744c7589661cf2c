//! Speech module
//!
//! Speaks assistant replies through a pluggable synthesis engine.

pub mod announcer;
pub mod command;
pub mod engine;
pub mod error;
pub mod language;
pub mod voice_select;

pub use announcer::{AnnounceOutcome, SpeechAnnouncer};
pub use command::CommandSpeechEngine;
pub use engine::{SpeechEngine, Utterance, Voice};
pub use error::SpeechError;
pub use language::{detect_locale, Locale};
pub use voice_select::select_voice;
