// Chat Widget GUI - Main Entry Point
// Native window around the chat core: conversation, HTTP transport and spoken replies

mod state;
mod ui;

use anyhow::{anyhow, Context as _};
use chat_widget_core::chat::{ChatController, HttpChatClient};
use chat_widget_core::speech::{CommandSpeechEngine, SpeechAnnouncer};
use chat_widget_core::Config;
use eframe::egui;
use state::AppState;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;
use ui::render_app_layout;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = Config::from_env();
    config.validate().context("Invalid configuration")?;
    let endpoint = config.endpoint()?;

    // The runtime outlives the window; the UI thread only holds a handle to it
    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;

    let engine = Arc::new(CommandSpeechEngine::new(config.speech.command.clone()));
    {
        let engine = engine.clone();
        runtime.spawn(async move { engine.discover_voices().await });
    }

    info!(endpoint = %endpoint, voice = config.speech.enabled_by_default, "Starting chat widget");

    let client = HttpChatClient::new(endpoint);
    let announcer = SpeechAnnouncer::new(engine, &config.speech);
    let controller = ChatController::new(&config, Arc::new(client), announcer);
    let app = ChatWidgetApp::new(AppState::new(controller, runtime.handle().clone()));

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("AI Agent Chat")
            .with_inner_size([900.0, 680.0])
            .with_min_inner_size([520.0, 420.0]),
        ..Default::default()
    };

    eframe::run_native("AI Agent Chat", options, Box::new(|_cc| Box::new(app)))
        .map_err(|e| anyhow!("GUI error: {e}"))
}

/// Main application struct
/// Applies finished async work, then renders the frame
struct ChatWidgetApp {
    /// Application state (controller, input buffer, UI preferences)
    state: AppState,
}

impl ChatWidgetApp {
    fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for ChatWidgetApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.state.poll_events();
        render_app_layout(ctx, &mut self.state);
    }
}
