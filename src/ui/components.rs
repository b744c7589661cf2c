// Reusable UI components
// Message bubbles, avatars, typing indicator, feature cards and the voice toggle

use chat_widget_core::chat::{Message, Role};
use eframe::egui;

/// Accent used for the assistant avatar and the enabled toggle
pub const ACCENT: egui::Color32 = egui::Color32::from_rgb(168, 85, 247);

/// Background of user bubbles
pub const USER_BUBBLE: egui::Color32 = egui::Color32::from_rgb(59, 130, 246);

/// Render a round avatar with a single letter
pub fn avatar(ui: &mut egui::Ui, letter: &str, fill: egui::Color32, size: f32) {
    let (rect, _) = ui.allocate_exact_size(egui::vec2(size, size), egui::Sense::hover());
    let painter = ui.painter();
    painter.circle_filled(rect.center(), size / 2.0, fill);
    painter.text(
        rect.center(),
        egui::Align2::CENTER_CENTER,
        letter,
        egui::FontId::proportional(size * 0.45),
        egui::Color32::WHITE,
    );
}

/// Render a chat bubble, right-aligned for the user and left-aligned for the assistant
pub fn message_bubble(ui: &mut egui::Ui, message: &Message) {
    let is_user = message.role == Role::User;
    let layout = if is_user {
        egui::Layout::right_to_left(egui::Align::TOP)
    } else {
        egui::Layout::left_to_right(egui::Align::TOP)
    };

    ui.with_layout(layout, |ui| {
        let max_width = ui.available_width() * 0.8;
        if is_user {
            avatar(ui, "U", USER_BUBBLE, 28.0);
        } else {
            avatar(ui, "A", ACCENT, 28.0);
        }
        ui.add_space(6.0);

        let fill = if is_user {
            USER_BUBBLE
        } else {
            ui.visuals().faint_bg_color
        };
        egui::Frame::none()
            .fill(fill)
            .rounding(egui::Rounding::same(12.0))
            .inner_margin(egui::Margin::symmetric(12.0, 8.0))
            .show(ui, |ui| {
                ui.set_max_width(max_width);
                ui.with_layout(egui::Layout::top_down(egui::Align::LEFT), |ui| {
                    let text = egui::RichText::new(&message.content).size(14.0);
                    let text = if is_user {
                        text.color(egui::Color32::WHITE)
                    } else {
                        text
                    };
                    ui.add(egui::Label::new(text).wrap(true));
                    ui.label(
                        egui::RichText::new(message_time(message))
                            .size(10.0)
                            .weak(),
                    );
                });
            });
    });
}

/// Local wall-clock time a message was appended, e.g. "14:05"
pub fn message_time(message: &Message) -> String {
    message
        .sent_at
        .with_timezone(&chrono::Local)
        .format("%H:%M")
        .to_string()
}

/// Render the "assistant is typing" indicator
pub fn typing_indicator(ui: &mut egui::Ui) {
    ui.horizontal(|ui| {
        avatar(ui, "A", ACCENT, 28.0);
        ui.add_space(6.0);
        egui::Frame::none()
            .fill(ui.visuals().faint_bg_color)
            .rounding(egui::Rounding::same(12.0))
            .inner_margin(egui::Margin::symmetric(12.0, 8.0))
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.add(egui::Spinner::new().size(12.0));
                    ui.label(egui::RichText::new("Typing…").weak().italics());
                });
            });
    });
}

/// Render a feature card with an icon, title and description
pub fn feature_card(ui: &mut egui::Ui, icon: &str, title: &str, description: &str) {
    egui::Frame::none()
        .fill(ui.visuals().faint_bg_color)
        .rounding(egui::Rounding::same(10.0))
        .inner_margin(egui::Margin::same(10.0))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new(icon).size(20.0).color(ACCENT));
                ui.add_space(8.0);
                ui.vertical(|ui| {
                    ui.label(egui::RichText::new(title).strong());
                    ui.label(egui::RichText::new(description).size(11.0).weak());
                });
            });
        });
}

/// Render an iOS-style on/off switch
/// Returns a response that is `changed()` when the value flipped
pub fn toggle_switch(ui: &mut egui::Ui, on: &mut bool) -> egui::Response {
    let desired_size = ui.spacing().interact_size.y * egui::vec2(2.0, 1.0);
    let (rect, mut response) = ui.allocate_exact_size(desired_size, egui::Sense::click());
    if response.clicked() {
        *on = !*on;
        response.mark_changed();
    }

    if ui.is_rect_visible(rect) {
        let how_on = ui.ctx().animate_bool(response.id, *on);
        let visuals = ui.style().interact_selectable(&response, *on);
        let rect = rect.expand(visuals.expansion);
        let radius = 0.5 * rect.height();
        let fill = if *on { ACCENT } else { visuals.bg_fill };
        ui.painter().rect(rect, radius, fill, visuals.bg_stroke);

        let circle_x = egui::lerp((rect.left() + radius)..=(rect.right() - radius), how_on);
        let center = egui::pos2(circle_x, rect.center().y);
        ui.painter()
            .circle(center, 0.75 * radius, egui::Color32::WHITE, visuals.fg_stroke);
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_ui(add_contents: impl FnMut(&mut egui::Ui)) {
        let ctx = egui::Context::default();
        let mut add_contents = add_contents;
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| add_contents(ui));
        });
    }

    #[test]
    fn test_components_render() {
        let user = Message::user("Hello");
        let assistant = Message::assistant("مرحبا، كيف حالك؟");
        let mut on = false;

        run_ui(|ui| {
            message_bubble(ui, &user);
            message_bubble(ui, &assistant);
            typing_indicator(ui);
            feature_card(ui, "🧠", "Memory", "Remembers past conversations");
            let response = toggle_switch(ui, &mut on);
            assert!(!response.changed());
        });

        assert!(!on);
    }

    #[test]
    fn test_message_time_format() {
        let message = Message::assistant("hi");
        let time = message_time(&message);
        assert_eq!(time.len(), 5);
        assert_eq!(&time[2..3], ":");
    }
}
