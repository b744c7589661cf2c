// Application state management
// Owns the chat controller, the input buffer and the bridge between the
// egui frame loop and the tokio runtime

use chat_widget_core::chat::{ChatController, Message, SendOutcome, SendTicket};
use chat_widget_core::speech::{AnnounceOutcome, SpeechAnnouncer};
use eframe::egui;
use std::sync::mpsc;
use tokio::runtime::Handle;
use tokio::sync::mpsc as async_mpsc;
use tracing::{debug, warn};

/// Results delivered back to the UI thread
#[derive(Debug)]
pub enum UiEvent {
    /// A send finished on the runtime
    SendSettled {
        /// Ticket issued when the send began
        ticket: SendTicket,
        /// How it went
        outcome: SendOutcome,
    },
}

/// UI-specific state
#[derive(Debug, Clone)]
pub struct UiState {
    /// Whether the feature/voice side panel is visible
    pub sidebar_visible: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            sidebar_visible: true,
        }
    }
}

/// Main application state
pub struct AppState {
    /// Conversation, transport and speech
    pub controller: ChatController,
    /// Text currently in the input box
    pub input: String,
    /// UI state preferences
    pub ui_state: UiState,
    runtime: Handle,
    events_tx: mpsc::Sender<UiEvent>,
    events_rx: mpsc::Receiver<UiEvent>,
    speech_tx: async_mpsc::UnboundedSender<Message>,
}

impl AppState {
    /// Create the application state; async work is spawned on `runtime`
    pub fn new(controller: ChatController, runtime: Handle) -> Self {
        let (events_tx, events_rx) = mpsc::channel();
        let speech_tx = spawn_speech_worker(&runtime, controller.announcer().clone());
        Self {
            controller,
            input: String::new(),
            ui_state: UiState::default(),
            runtime,
            events_tx,
            events_rx,
            speech_tx,
        }
    }

    /// Whether the Send button should be clickable
    pub fn can_send(&self) -> bool {
        !self.input.trim().is_empty() && !self.controller.is_pending()
    }

    /// Send the input buffer
    /// Returns false if the input was blank or a send is already pending
    pub fn submit_input(&mut self, ctx: &egui::Context) -> bool {
        let Some(outbound) = self.controller.begin_send(&self.input) else {
            return false;
        };
        self.input.clear();

        let transport = self.controller.transport();
        let events_tx = self.events_tx.clone();
        let ctx = ctx.clone();
        self.runtime.spawn(async move {
            let outcome = transport.send(&outbound).await;
            let event = UiEvent::SendSettled {
                ticket: outbound.ticket,
                outcome,
            };
            if events_tx.send(event).is_err() {
                debug!("UI closed before the send settled");
            }
            ctx.request_repaint();
        });

        self.queue_announcement();
        true
    }

    /// Start a new conversation
    pub fn reset(&mut self) {
        self.controller.reset();
        self.queue_announcement();
    }

    /// Turn spoken replies on or off
    pub fn set_voice_enabled(&mut self, enabled: bool) {
        self.controller.set_voice_enabled(enabled);
    }

    /// Apply every result that arrived since the last frame
    /// Returns the number of events applied
    pub fn poll_events(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            self.apply_event(event);
            applied += 1;
        }
        applied
    }

    fn apply_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::SendSettled { ticket, outcome } => {
                if self.controller.complete_send(ticket, outcome) {
                    self.queue_announcement();
                }
            }
        }
    }

    fn queue_announcement(&mut self) {
        if let Some(message) = self.controller.take_announcement() {
            if self.speech_tx.send(message).is_err() {
                warn!("Speech worker stopped, dropping announcement");
            }
        }
    }
}

/// Speak announcements one at a time, in the order they were queued
///
/// The announcer shares its voice switch with the controller, so a job
/// queued before voice was turned off is not spoken.
fn spawn_speech_worker(
    runtime: &Handle,
    announcer: SpeechAnnouncer,
) -> async_mpsc::UnboundedSender<Message> {
    let (tx, mut rx) = async_mpsc::unbounded_channel::<Message>();
    runtime.spawn(async move {
        while let Some(message) = rx.recv().await {
            match announcer
                .announce(std::slice::from_ref(&message))
                .await
            {
                Ok(AnnounceOutcome::Spoken(utterance)) => {
                    debug!(lang = %utterance.lang, "Announcement handed to engine");
                }
                Ok(_) => {}
                Err(e) => warn!(error = %e, "Failed to speak assistant message"),
            }
        }
    });
    tx
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chat_widget_core::chat::{AssistantReply, ChatTransport, OutboundMessage, Role};
    use chat_widget_core::speech::{SpeechEngine, SpeechError, Utterance, Voice};
    use chat_widget_core::Config;
    use std::sync::{Arc, Mutex};
    use std::time::{Duration, Instant};
    use tokio::sync::watch;

    struct EchoTransport;

    #[async_trait]
    impl ChatTransport for EchoTransport {
        async fn send(&self, message: &OutboundMessage) -> SendOutcome {
            SendOutcome::Reply(AssistantReply {
                text: format!("echo: {}", message.text),
                session_id: None,
            })
        }
    }

    struct MuteEngine;

    #[async_trait]
    impl SpeechEngine for MuteEngine {
        fn list_voices(&self) -> Vec<Voice> {
            vec![Voice::new("Daniel", "en-GB")]
        }
        async fn voices_ready(&self) {}
        fn cancel(&self) {}
        fn speak(&self, _utterance: Utterance) -> Result<(), SpeechError> {
            Ok(())
        }
    }

    /// Engine whose voice list stays empty until `release` is called
    struct GatedEngine {
        ready: watch::Sender<bool>,
        spoken: Mutex<Vec<String>>,
    }

    impl GatedEngine {
        fn new() -> Self {
            let (ready, _) = watch::channel(false);
            Self {
                ready,
                spoken: Mutex::new(Vec::new()),
            }
        }

        fn release(&self) {
            self.ready.send_replace(true);
        }

        fn spoken(&self) -> Vec<String> {
            self.spoken.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl SpeechEngine for GatedEngine {
        fn list_voices(&self) -> Vec<Voice> {
            if *self.ready.borrow() {
                vec![Voice::new("Daniel", "en-GB")]
            } else {
                Vec::new()
            }
        }
        async fn voices_ready(&self) {
            let mut rx = self.ready.subscribe();
            let _ = rx.wait_for(|ready| *ready).await;
        }
        fn cancel(&self) {}
        fn speak(&self, utterance: Utterance) -> Result<(), SpeechError> {
            self.spoken.lock().unwrap().push(utterance.text);
            Ok(())
        }
    }

    fn voiced_state(
        runtime: &tokio::runtime::Runtime,
        engine: Arc<GatedEngine>,
    ) -> AppState {
        let mut config = Config::default();
        config.speech.enabled_by_default = true;
        let announcer = SpeechAnnouncer::new(engine, &config.speech);
        let controller = ChatController::new(&config, Arc::new(EchoTransport), announcer);
        AppState::new(controller, runtime.handle().clone())
    }

    fn state(runtime: &tokio::runtime::Runtime) -> AppState {
        let config = Config::default();
        let engine = Arc::new(MuteEngine);
        let announcer = SpeechAnnouncer::new(engine, &config.speech);
        let controller = ChatController::new(&config, Arc::new(EchoTransport), announcer);
        AppState::new(controller, runtime.handle().clone())
    }

    fn wait_for_event(state: &mut AppState) {
        let event = state
            .events_rx
            .recv_timeout(Duration::from_secs(5))
            .expect("send should settle");
        state.apply_event(event);
    }

    #[test]
    fn test_app_state_creation() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let state = state(&runtime);
        assert_eq!(state.controller.messages().len(), 1);
        assert!(state.input.is_empty());
        assert!(!state.can_send());
        assert!(state.ui_state.sidebar_visible);
    }

    #[test]
    fn test_blank_input_is_not_sent() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let mut state = state(&runtime);
        let ctx = egui::Context::default();

        state.input = "   ".to_string();
        assert!(!state.submit_input(&ctx));
        assert_eq!(state.input, "   ");
        assert_eq!(state.controller.messages().len(), 1);
    }

    #[test]
    fn test_submit_clears_input_and_receives_reply() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let mut state = state(&runtime);
        let ctx = egui::Context::default();

        state.input = "Hello".to_string();
        assert!(state.submit_input(&ctx));
        assert!(state.input.is_empty());
        assert!(state.controller.is_pending());

        wait_for_event(&mut state);

        assert!(!state.controller.is_pending());
        let last = state.controller.messages().last().unwrap();
        assert_eq!(last.role, Role::Assistant);
        assert_eq!(last.content, "echo: Hello");
    }

    #[test]
    fn test_second_submit_while_pending_keeps_input() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let mut state = state(&runtime);
        let ctx = egui::Context::default();

        state.input = "first".to_string();
        assert!(state.submit_input(&ctx));
        state.input = "second".to_string();
        assert!(!state.can_send());
        assert!(!state.submit_input(&ctx));
        assert_eq!(state.input, "second");

        wait_for_event(&mut state);
        assert!(state.can_send());
    }

    #[test]
    fn test_reset_while_pending_drops_late_reply() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let mut state = state(&runtime);
        let ctx = egui::Context::default();

        state.input = "Hello".to_string();
        state.submit_input(&ctx);
        state.reset();

        wait_for_event(&mut state);
        assert_eq!(state.controller.messages().len(), 1);
        assert!(!state.controller.is_pending());
    }

    #[test]
    fn test_poll_events_without_results() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let mut state = state(&runtime);
        assert_eq!(state.poll_events(), 0);
    }

    #[test]
    fn test_reply_waiting_for_voices_is_silent_after_voice_off() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let engine = Arc::new(GatedEngine::new());
        let mut state = voiced_state(&runtime, engine.clone());
        let ctx = egui::Context::default();

        state.input = "Hello".to_string();
        assert!(state.submit_input(&ctx));
        wait_for_event(&mut state);

        state.set_voice_enabled(false);
        engine.release();
        std::thread::sleep(Duration::from_millis(100));

        assert!(engine.spoken().is_empty());
    }

    #[test]
    fn test_reply_is_spoken_once_voices_load() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let engine = Arc::new(GatedEngine::new());
        let mut state = voiced_state(&runtime, engine.clone());
        let ctx = egui::Context::default();

        state.input = "Hello".to_string();
        assert!(state.submit_input(&ctx));
        wait_for_event(&mut state);
        engine.release();

        let deadline = Instant::now() + Duration::from_secs(5);
        while engine.spoken().is_empty() && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(10));
        }
        assert_eq!(engine.spoken(), vec!["echo: Hello".to_string()]);
    }
}
