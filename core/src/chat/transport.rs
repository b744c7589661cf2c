//! Chat endpoint client
//!
//! One POST per user message, no retries, no queueing. Every failure that is
//! not a well-formed `{success: false, error}` body collapses into
//! [`SendOutcome::TransportError`].

use crate::chat::models::{
    AssistantReply, ChatRequest, ChatResponse, OutboundMessage, SendOutcome,
};
use crate::error::TransportError;
use async_trait::async_trait;
use tracing::{debug, error, info, info_span, Instrument};
use uuid::Uuid;

/// Something that can deliver a chat message and classify the result
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Deliver one message
    ///
    /// Never fails: transport problems are reported as
    /// [`SendOutcome::TransportError`].
    async fn send(&self, message: &OutboundMessage) -> SendOutcome;
}

/// HTTP client for the remote chat endpoint
#[derive(Debug, Clone)]
pub struct HttpChatClient {
    client: reqwest::Client,
    endpoint: reqwest::Url,
}

impl HttpChatClient {
    /// Create a client with its own connection pool
    pub fn new(endpoint: reqwest::Url) -> Self {
        Self::with_client(reqwest::Client::new(), endpoint)
    }

    /// Create a client on a shared `reqwest::Client`
    pub fn with_client(client: reqwest::Client, endpoint: reqwest::Url) -> Self {
        Self { client, endpoint }
    }

    /// The URL messages are POSTed to
    pub fn endpoint(&self) -> &reqwest::Url {
        &self.endpoint
    }

    /// POST a request and decode the body
    ///
    /// # Errors
    /// * `TransportError::Request` - connection failure or unreadable body
    /// * `TransportError::Status` - non-2xx status
    /// * `TransportError::Decode` - body is not a chat response
    pub async fn exchange(&self, request: &ChatRequest) -> Result<ChatResponse, TransportError> {
        debug!(
            url = %self.endpoint,
            message_len = request.message.len(),
            has_session = request.session_id.is_some(),
            "Posting chat message"
        );

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error body".to_string());
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let parsed: ChatResponse = serde_json::from_str(&body)?;
        Ok(parsed)
    }
}

#[async_trait]
impl ChatTransport for HttpChatClient {
    async fn send(&self, message: &OutboundMessage) -> SendOutcome {
        let request_id = Uuid::new_v4();
        let span = info_span!("chat_send", request_id = %request_id);

        async {
            let result = self
                .exchange(&message.to_request())
                .await
                .and_then(classify);

            match result {
                Ok(outcome) => {
                    info!(
                        outcome = outcome_label(&outcome),
                        "Chat exchange completed"
                    );
                    outcome
                }
                Err(e) => {
                    error!(error = %e, "Chat exchange failed");
                    SendOutcome::TransportError
                }
            }
        }
        .instrument(span)
        .await
    }
}

/// Map a decoded response onto a send outcome
///
/// # Errors
/// * `TransportError::UnexpectedShape` - success without a `response` string,
///   or failure without an `error` string
pub fn classify(response: ChatResponse) -> Result<SendOutcome, TransportError> {
    match response {
        ChatResponse {
            success: true,
            response: Some(text),
            session_id,
            ..
        } => Ok(SendOutcome::Reply(AssistantReply { text, session_id })),
        ChatResponse {
            success: true,
            response: None,
            ..
        } => Err(TransportError::UnexpectedShape(
            "success response without 'response' field".to_string(),
        )),
        ChatResponse {
            success: false,
            error: Some(error),
            ..
        } => Ok(SendOutcome::AppError(error)),
        ChatResponse {
            success: false,
            error: None,
            ..
        } => Err(TransportError::UnexpectedShape(
            "failure response without 'error' field".to_string(),
        )),
    }
}

fn outcome_label(outcome: &SendOutcome) -> &'static str {
    match outcome {
        SendOutcome::Reply(_) => "reply",
        SendOutcome::AppError(_) => "app_error",
        SendOutcome::TransportError => "transport_error",
    }
}
