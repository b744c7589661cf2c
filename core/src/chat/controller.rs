//! Chat controller
//!
//! The surface the GUI binds to: the message list, the pending flag, the
//! voice toggle and the send/reset actions. Composes the conversation, the
//! transport and the speech announcer.
//!
//! [`ChatController::send`] runs a whole exchange in one call. Callers that
//! must not block on the network (the GUI's frame loop) split it into
//! [`ChatController::begin_send`], a [`ChatTransport::send`] on a runtime,
//! and [`ChatController::complete_send`].

use crate::chat::conversation::{Conversation, Resolution};
use crate::chat::models::{Message, OutboundMessage, SendOutcome, SendTicket};
use crate::chat::transport::ChatTransport;
use crate::config::Config;
use crate::speech::{AnnounceOutcome, SpeechAnnouncer};
use std::sync::Arc;
use tracing::{info, warn};

/// UI-facing chat state and actions
pub struct ChatController {
    conversation: Conversation,
    transport: Arc<dyn ChatTransport>,
    announcer: SpeechAnnouncer,
    announced_revision: u64,
}

impl ChatController {
    /// Create a controller with the configured greeting
    ///
    /// The voice default comes from the announcer.
    pub fn new(
        config: &Config,
        transport: Arc<dyn ChatTransport>,
        announcer: SpeechAnnouncer,
    ) -> Self {
        let conversation = Conversation::new(config.chat.greeting.clone());
        let announced_revision = conversation.revision();
        Self {
            conversation,
            transport,
            announcer,
            announced_revision,
        }
    }

    /// Messages in display order
    pub fn messages(&self) -> &[Message] {
        self.conversation.messages()
    }

    /// Underlying conversation state
    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Whether a send is outstanding (drives the typing indicator)
    pub fn is_pending(&self) -> bool {
        self.conversation.is_pending()
    }

    /// Whether replies are spoken
    pub fn voice_enabled(&self) -> bool {
        self.announcer.is_enabled()
    }

    /// Turn spoken replies on or off
    ///
    /// Turning voice off silences the current utterance. Turning it on does
    /// not replay messages that arrived while it was off.
    pub fn set_voice_enabled(&mut self, enabled: bool) {
        if self.announcer.set_enabled(enabled) {
            info!(enabled, "Voice responses toggled");
        }
    }

    /// Transport used for sends
    pub fn transport(&self) -> Arc<dyn ChatTransport> {
        Arc::clone(&self.transport)
    }

    /// Announcer used for spoken replies
    pub fn announcer(&self) -> &SpeechAnnouncer {
        &self.announcer
    }

    /// Send `text` and wait for the reply, then speak it if voice is on
    ///
    /// Returns `None` if the message was rejected (blank, or a send is
    /// already pending) or the conversation was reset meanwhile.
    pub async fn send(&mut self, text: &str) -> Option<Resolution> {
        let outbound = self.begin_send(text)?;
        let outcome = self.transport.send(&outbound).await;
        if !self.complete_send(outbound.ticket, outcome) {
            return None;
        }
        self.announce_changes().await;
        self.conversation.last_resolution()
    }

    /// First half of a send: validate, append the user message, go pending
    pub fn begin_send(&mut self, text: &str) -> Option<OutboundMessage> {
        self.conversation.begin_send(text)
    }

    /// Second half of a send: append the reply or error
    ///
    /// Returns `false` if the result belonged to a conversation that has
    /// since been reset.
    pub fn complete_send(&mut self, ticket: SendTicket, outcome: SendOutcome) -> bool {
        self.conversation.settle(ticket, outcome)
    }

    /// Start a new conversation
    pub fn reset(&mut self) {
        info!("Conversation reset");
        self.conversation.reset();
    }

    /// The newest message, if the list changed since the last call
    ///
    /// Marks the change as seen, so each change is announced at most once.
    pub fn take_announcement(&mut self) -> Option<Message> {
        let revision = self.conversation.revision();
        if revision == self.announced_revision {
            return None;
        }
        self.announced_revision = revision;
        self.conversation.last_message().cloned()
    }

    /// Speak the newest message if the list changed and voice is on
    ///
    /// Engine failures are logged, never surfaced.
    pub async fn announce_changes(&mut self) -> Option<AnnounceOutcome> {
        let message = self.take_announcement()?;
        match self
            .announcer
            .announce(std::slice::from_ref(&message))
            .await
        {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                warn!(error = %e, "Failed to speak assistant message");
                None
            }
        }
    }
}
