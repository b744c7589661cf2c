// Main application layout
// Handles the menu bar, header, feature sidebar, message list and input row

use crate::state::AppState;
use crate::ui::components::*;
use eframe::egui;

/// Capabilities advertised in the sidebar
const FEATURES: [(&str, &str, &str); 4] = [
    ("🧠", "Memory", "Remembers what you talked about"),
    ("✨", "Personality", "A consistent, friendly character"),
    ("🎙", "Voice Clone", "Replies read aloud in a natural voice"),
    ("⚡", "Task Execution", "Gets things done on your behalf"),
];

/// Render the main application layout
/// Includes menu bar, header, sidebar, message list and input row
pub fn render_app_layout(ctx: &egui::Context, state: &mut AppState) {
    render_menu_bar(ctx, state);
    render_header(ctx);

    if state.ui_state.sidebar_visible {
        render_sidebar(ctx, state);
    }

    // Input row must be added before the central panel so it keeps its height
    render_input_row(ctx, state);

    egui::CentralPanel::default().show(ctx, |ui| {
        render_messages(ui, state);
    });
}

/// Render the top menu bar
fn render_menu_bar(ctx: &egui::Context, state: &mut AppState) {
    egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
        egui::menu::bar(ui, |ui| {
            ui.menu_button("Chat", |ui| {
                if ui.button("New conversation").clicked() {
                    state.reset();
                    ui.close_menu();
                }
                ui.separator();
                if ui.button("Quit").clicked() {
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
            });

            ui.menu_button("Settings", |ui| {
                let mut voice = state.controller.voice_enabled();
                if ui.checkbox(&mut voice, "Voice responses").changed() {
                    state.set_voice_enabled(voice);
                }
            });

            ui.menu_button("View", |ui| {
                let mut dark_mode = ctx.style().visuals.dark_mode;
                if ui.checkbox(&mut dark_mode, "Dark Mode").changed() {
                    ctx.set_visuals(if dark_mode {
                        egui::Visuals::dark()
                    } else {
                        egui::Visuals::light()
                    });
                }
                ui.checkbox(&mut state.ui_state.sidebar_visible, "Show Sidebar");
            });
        });
    });
}

/// Render the assistant header with its status line
fn render_header(ctx: &egui::Context) {
    egui::TopBottomPanel::top("header").show(ctx, |ui| {
        ui.add_space(6.0);
        ui.horizontal(|ui| {
            avatar(ui, "A", ACCENT, 36.0);
            ui.add_space(8.0);
            ui.vertical(|ui| {
                ui.label(egui::RichText::new("AI Agent").strong().size(16.0));
                ui.label(
                    egui::RichText::new("Online • Ready to chat")
                        .size(11.0)
                        .color(egui::Color32::from_rgb(34, 197, 94)),
                );
            });
        });
        ui.add_space(6.0);
    });
}

/// Render the sidebar with feature cards and the voice switch
fn render_sidebar(ctx: &egui::Context, state: &mut AppState) {
    egui::SidePanel::left("features")
        .resizable(false)
        .exact_width(240.0)
        .show(ctx, |ui| {
            ui.add_space(8.0);
            ui.heading("Features");
            ui.add_space(8.0);

            for (icon, title, description) in FEATURES {
                feature_card(ui, icon, title, description);
                ui.add_space(6.0);
            }

            ui.add_space(8.0);
            ui.separator();
            ui.add_space(8.0);

            ui.horizontal(|ui| {
                ui.label(egui::RichText::new("Voice responses").strong());
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let mut voice = state.controller.voice_enabled();
                    if toggle_switch(ui, &mut voice).changed() {
                        state.set_voice_enabled(voice);
                    }
                });
            });
            let hint = if state.controller.voice_enabled() {
                "Replies are read aloud"
            } else {
                "Replies are shown as text only"
            };
            ui.label(egui::RichText::new(hint).size(11.0).weak());
        });
}

/// Render the input box and Send button
fn render_input_row(ctx: &egui::Context, state: &mut AppState) {
    egui::TopBottomPanel::bottom("input").show(ctx, |ui| {
        ui.add_space(8.0);
        ui.horizontal(|ui| {
            let can_send = state.can_send();
            let button_width = 72.0;
            let input_width = (ui.available_width() - button_width - 8.0).max(80.0);

            let response = ui.add_enabled(
                !state.controller.is_pending(),
                egui::TextEdit::singleline(&mut state.input)
                    .hint_text("Type your message…")
                    .desired_width(input_width),
            );
            let enter_pressed =
                response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

            let clicked = ui
                .add_enabled(
                    can_send,
                    egui::Button::new("Send").min_size(egui::vec2(button_width, 0.0)),
                )
                .clicked();

            if (clicked || enter_pressed) && state.submit_input(ctx) {
                response.request_focus();
            }
        });
        ui.add_space(8.0);
    });
}

/// Render the scrolling list of messages
fn render_messages(ui: &mut egui::Ui, state: &AppState) {
    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .stick_to_bottom(true)
        .show(ui, |ui| {
            ui.add_space(8.0);
            for message in state.controller.messages() {
                message_bubble(ui, message);
                ui.add_space(8.0);
            }
            if state.controller.is_pending() {
                typing_indicator(ui);
                ui.add_space(8.0);
            }
        });
}
