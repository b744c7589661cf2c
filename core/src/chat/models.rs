//! Chat data models
//!
//! Defines messages, the session token and the JSON wire format spoken with
//! the remote chat endpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Role of a message sender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Message typed by the user
    User,
    /// Message from the assistant, including rendered errors
    Assistant,
}

impl Role {
    /// Convert the role to its string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// A single chat message
///
/// Messages are never edited after they are appended to a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Who sent the message
    pub role: Role,
    /// Message text
    pub content: String,
    /// When the message was appended (display only)
    pub sent_at: DateTime<Utc>,
}

impl Message {
    /// Create a new message stamped with the current time
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            sent_at: Utc::now(),
        }
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Whether the assistant sent this message
    pub fn is_assistant(&self) -> bool {
        self.role == Role::Assistant
    }
}

/// Opaque session token issued by the chat endpoint
///
/// Only obtainable by decoding a server response.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    #[cfg(test)]
    pub(crate) fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrow the raw token
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Request body POSTed to the chat endpoint
///
/// `sessionId` is always present and serialized as `null` before the server
/// has issued one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    /// The user's message text
    pub message: String,
    /// Session to continue, if any
    pub session_id: Option<SessionId>,
}

/// Response body returned by the chat endpoint
///
/// Both shapes share one struct: `{success: true, response, sessionId}` and
/// `{success: false, error}`. Classification lives in the transport client.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    /// Whether the server handled the message
    pub success: bool,
    /// Assistant reply (success only)
    #[serde(default)]
    pub response: Option<String>,
    /// Session token to use for the next request (success only)
    #[serde(default)]
    pub session_id: Option<SessionId>,
    /// Human-readable failure reason (failure only)
    #[serde(default)]
    pub error: Option<String>,
}

/// A message that passed validation and is waiting to be sent
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundMessage {
    /// Text to send
    pub text: String,
    /// Session held by the conversation when the send began
    pub session_id: Option<SessionId>,
    /// Ticket the result must be settled with
    pub ticket: SendTicket,
}

impl OutboundMessage {
    /// Build the wire request for this message
    pub fn to_request(&self) -> ChatRequest {
        ChatRequest {
            message: self.text.clone(),
            session_id: self.session_id.clone(),
        }
    }
}

/// Identifies one send so stale results can be told apart after a reset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SendTicket(pub(crate) u64);

/// A successful assistant reply
#[derive(Debug, Clone, PartialEq)]
pub struct AssistantReply {
    /// Reply text
    pub text: String,
    /// Session token supplied with the reply, if any
    pub session_id: Option<SessionId>,
}

/// How a single send settled
#[derive(Debug, Clone, PartialEq)]
pub enum SendOutcome {
    /// The server replied
    Reply(AssistantReply),
    /// The server understood the request but reported a failure
    AppError(String),
    /// The exchange failed; the cause is logged, not kept
    TransportError,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serialization() {
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), r#""user""#);
        assert_eq!(
            serde_json::to_string(&Role::Assistant).unwrap(),
            r#""assistant""#
        );
        assert_eq!(Role::Assistant.as_str(), "assistant");
    }

    #[test]
    fn test_message_constructors() {
        let msg = Message::user("Hello");
        assert_eq!(msg.role, Role::User);
        assert_eq!(msg.content, "Hello");
        assert!(!msg.is_assistant());
        assert!(Message::assistant("Hi").is_assistant());
    }

    #[test]
    fn test_request_without_session_serializes_null() {
        let request = ChatRequest {
            message: "Hello".to_string(),
            session_id: None,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["message"], "Hello");
        assert!(value.as_object().unwrap().contains_key("sessionId"));
        assert!(value["sessionId"].is_null());
    }

    #[test]
    fn test_request_with_session_uses_camel_case() {
        let request = ChatRequest {
            message: "Again".to_string(),
            session_id: Some(SessionId::new("abc123")),
        };
        let json = serde_json::to_string(&request).unwrap();
        assert_eq!(json, r#"{"message":"Again","sessionId":"abc123"}"#);
    }

    #[test]
    fn test_response_failure_shape() {
        let response: ChatResponse =
            serde_json::from_str(r#"{"success":false,"error":"quota exceeded"}"#).unwrap();
        assert!(!response.success);
        assert_eq!(response.error.as_deref(), Some("quota exceeded"));
        assert!(response.response.is_none());
        assert!(response.session_id.is_none());
    }

    #[test]
    fn test_session_id_display() {
        let id = SessionId::new("s-1");
        assert_eq!(id.to_string(), "s-1");
        assert_eq!(id.as_str(), "s-1");
    }
}
