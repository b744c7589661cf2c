//! Chat Widget Core Library
//!
//! The logical core behind the chat window: conversation state, the HTTP
//! session client and the speech announcer. The GUI binary in the parent
//! package binds its widgets to [`chat::ChatController`].

pub mod chat;
pub mod config;
pub mod error;
/// Speech output
///
/// Language detection, voice selection and the pluggable synthesis engine.
pub mod speech;

pub use chat::{ChatController, Conversation, Message, Role};
pub use config::Config;
pub use error::{ConfigError, TransportError};
pub use speech::{SpeechAnnouncer, SpeechEngine};
