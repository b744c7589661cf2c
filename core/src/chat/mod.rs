//! Chat module
//!
//! Conversation state, the chat endpoint client and the controller the GUI
//! binds to.

pub mod constants;
pub mod controller;
pub mod conversation;
pub mod models;
pub mod transport;

pub use controller::ChatController;
pub use conversation::{Conversation, Resolution, SendState};
pub use models::{
    AssistantReply, ChatRequest, ChatResponse, Message, OutboundMessage, Role, SendOutcome,
    SendTicket, SessionId,
};
pub use transport::{ChatTransport, HttpChatClient};
