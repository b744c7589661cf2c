//! Application configuration
//!
//! Centralized configuration management with environment variable support
//! and sensible defaults.

use crate::error::ConfigError;
use std::env;

/// Default chat endpoint used when `CHAT_ENDPOINT_URL` is not set
pub const DEFAULT_ENDPOINT_URL: &str = "http://localhost:8000/api/chat";

/// Default greeting shown at startup and after every reset
pub const DEFAULT_GREETING: &str =
    "Hey! I'm your AI agent. Cool that you're here! What's on your mind?";

/// Application configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Chat endpoint and conversation settings
    pub chat: ChatConfig,
    /// Speech output settings
    pub speech: SpeechConfig,
}

/// Chat endpoint and conversation settings
#[derive(Debug, Clone, PartialEq)]
pub struct ChatConfig {
    /// Absolute URL the chat messages are POSTed to
    pub endpoint_url: String,
    /// Assistant message that opens every conversation
    pub greeting: String,
}

/// Speech output settings
#[derive(Debug, Clone, PartialEq)]
pub struct SpeechConfig {
    /// Whether voice responses start enabled
    pub enabled_by_default: bool,
    /// Speaking rate, 1.0 is the engine's normal speed
    pub rate: f32,
    /// Voice pitch, 1.0 is the engine's default pitch
    pub pitch: f32,
    /// Synthesizer executable used by the command-line speech engine
    pub command: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            chat: ChatConfig {
                endpoint_url: DEFAULT_ENDPOINT_URL.to_string(),
                greeting: DEFAULT_GREETING.to_string(),
            },
            speech: SpeechConfig {
                enabled_by_default: false,
                rate: 1.0,
                pitch: 0.9,
                command: "espeak-ng".to_string(),
            },
        }
    }
}

impl Config {
    /// Load configuration from environment variables with defaults
    ///
    /// Unparseable values fall back to their defaults; call
    /// [`Config::validate`] to reject values that parse but make no sense.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            chat: ChatConfig {
                endpoint_url: env::var("CHAT_ENDPOINT_URL")
                    .unwrap_or(defaults.chat.endpoint_url),
                greeting: env::var("CHAT_GREETING").unwrap_or(defaults.chat.greeting),
            },
            speech: SpeechConfig {
                enabled_by_default: env::var("CHAT_VOICE_ENABLED")
                    .ok()
                    .and_then(|v| parse_flag(&v))
                    .unwrap_or(defaults.speech.enabled_by_default),
                rate: env::var("CHAT_SPEECH_RATE")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.speech.rate),
                pitch: env::var("CHAT_SPEECH_PITCH")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.speech.pitch),
                command: env::var("CHAT_SPEECH_COMMAND").unwrap_or(defaults.speech.command),
            },
        }
    }

    /// Check that every setting is usable
    ///
    /// # Errors
    /// * `ConfigError::InvalidUrl` - endpoint is not an absolute http(s) URL
    /// * `ConfigError::OutOfRange` - rate outside `0.1..=10` or pitch outside `0..=2`
    /// * `ConfigError::Empty` - greeting or speech command is blank
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.endpoint()?;

        if self.chat.greeting.trim().is_empty() {
            return Err(ConfigError::Empty("greeting"));
        }
        if self.speech.command.trim().is_empty() {
            return Err(ConfigError::Empty("speech command"));
        }

        check_range("speech rate", self.speech.rate, 0.1, 10.0)?;
        check_range("speech pitch", self.speech.pitch, 0.0, 2.0)?;

        Ok(())
    }

    /// Parse the chat endpoint
    pub fn endpoint(&self) -> Result<reqwest::Url, ConfigError> {
        let raw = &self.chat.endpoint_url;
        let url = reqwest::Url::parse(raw).map_err(|e| ConfigError::InvalidUrl {
            url: raw.clone(),
            reason: e.to_string(),
        })?;

        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(ConfigError::InvalidUrl {
                url: raw.clone(),
                reason: format!("unsupported scheme '{}'", other),
            }),
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn check_range(name: &'static str, value: f32, min: f32, max: f32) -> Result<(), ConfigError> {
    if value.is_finite() && (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            name,
            value,
            min,
            max,
        })
    }
}
