//! Conversation state
//!
//! Holds the append-only message list, the server-issued session token and
//! the send state machine:
//!
//! ```text
//! Idle -> Pending -> {ResolvedSuccess | ResolvedAppError | ResolvedTransportError} -> Idle
//! ```
//!
//! Resolution is instantaneous, so only `Idle` and `Pending` are ever
//! observable; the resolution itself is kept as [`Conversation::last_resolution`].

use crate::chat::constants::{APP_ERROR_PREFIX, TRANSPORT_ERROR_MESSAGE};
use crate::chat::models::{
    AssistantReply, Message, OutboundMessage, SendOutcome, SendTicket, SessionId,
};
use tracing::{debug, warn};

/// Whether a send is outstanding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendState {
    /// Ready to accept a message
    Idle,
    /// Waiting for the endpoint; further sends are ignored
    Pending(SendTicket),
}

/// Terminal state of the most recent send
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The server replied
    Success,
    /// The server reported a failure string
    AppError,
    /// The exchange failed
    TransportError,
}

/// Ordered chat history plus session state
#[derive(Debug, Clone)]
pub struct Conversation {
    messages: Vec<Message>,
    session_id: Option<SessionId>,
    state: SendState,
    last_resolution: Option<Resolution>,
    greeting: String,
    next_ticket: u64,
    revision: u64,
}

impl Conversation {
    /// Start a conversation containing only the greeting
    pub fn new(greeting: impl Into<String>) -> Self {
        let greeting = greeting.into();
        Self {
            messages: vec![Message::assistant(greeting.clone())],
            session_id: None,
            state: SendState::Idle,
            last_resolution: None,
            greeting,
            next_ticket: 0,
            revision: 0,
        }
    }

    /// Messages in append order
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Most recent message
    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Session token held for the next request
    pub fn session_id(&self) -> Option<&SessionId> {
        self.session_id.as_ref()
    }

    /// Current send state
    pub fn state(&self) -> SendState {
        self.state
    }

    /// Whether a send is outstanding
    pub fn is_pending(&self) -> bool {
        matches!(self.state, SendState::Pending(_))
    }

    /// How the most recent send settled, if any has since the last reset
    pub fn last_resolution(&self) -> Option<Resolution> {
        self.last_resolution
    }

    /// Counter bumped on every change to the message list
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Validate and append a user message
    ///
    /// Returns `None` without touching any state when `text` is blank or a
    /// send is already pending. Otherwise appends the message verbatim,
    /// enters `Pending` and returns what must be sent.
    pub fn begin_send(&mut self, text: &str) -> Option<OutboundMessage> {
        if text.trim().is_empty() {
            debug!("Ignoring blank message");
            return None;
        }
        if self.is_pending() {
            debug!("Ignoring message while a send is pending");
            return None;
        }

        let ticket = SendTicket(self.next_ticket);
        self.next_ticket += 1;

        self.push(Message::user(text));
        self.state = SendState::Pending(ticket);

        Some(OutboundMessage {
            text: text.to_string(),
            session_id: self.session_id.clone(),
            ticket,
        })
    }

    /// Apply the result of a send
    ///
    /// Returns `false` if `ticket` is not the pending send (the conversation
    /// was reset while the request was in flight); the outcome is dropped.
    pub fn settle(&mut self, ticket: SendTicket, outcome: SendOutcome) -> bool {
        if self.state != SendState::Pending(ticket) {
            warn!(ticket = ticket.0, "Dropping result for a send that is no longer pending");
            return false;
        }

        match outcome {
            SendOutcome::Reply(reply) => {
                self.resolve_with_reply(reply);
                self.last_resolution = Some(Resolution::Success);
            }
            SendOutcome::AppError(error) => {
                self.resolve_with_error(format!("{}{}", APP_ERROR_PREFIX, error));
                self.last_resolution = Some(Resolution::AppError);
            }
            SendOutcome::TransportError => {
                self.resolve_with_error(TRANSPORT_ERROR_MESSAGE);
                self.last_resolution = Some(Resolution::TransportError);
            }
        }
        true
    }

    /// Append an assistant reply and return to `Idle`
    ///
    /// A reply that carries a session token replaces the held one.
    pub fn resolve_with_reply(&mut self, reply: AssistantReply) {
        if let Some(session_id) = reply.session_id {
            debug!(session_id = %session_id, "Session updated");
            self.session_id = Some(session_id);
        }
        self.push(Message::assistant(reply.text));
        self.state = SendState::Idle;
    }

    /// Append an error as an ordinary assistant message and return to `Idle`
    pub fn resolve_with_error(&mut self, message: impl Into<String>) {
        self.push(Message::assistant(message));
        self.state = SendState::Idle;
    }

    /// Start over with a fresh greeting and no session
    pub fn reset(&mut self) {
        self.messages = vec![Message::assistant(self.greeting.clone())];
        self.session_id = None;
        self.state = SendState::Idle;
        self.last_resolution = None;
        self.revision += 1;
    }

    fn push(&mut self, message: Message) {
        self.messages.push(message);
        self.revision += 1;
    }
}
