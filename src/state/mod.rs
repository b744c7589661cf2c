// State management module
// Handles the chat controller, input buffer and UI state

pub mod app_state;

pub use app_state::AppState;
