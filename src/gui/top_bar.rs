use eframe::egui::{
    self,
    containers,
};

use super::actions::{
    ActionQueue,
    UiAction,
};

pub struct TopBar;

impl TopBar {
    pub fn show(
        ctx: &egui::Context,
        deck_name: &str,
        dark_mode: bool,
        speech_enabled: bool,
        actions: &mut ActionQueue,
    ) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            containers::menu::Bar::new().ui(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open Deck…").clicked() {
                        actions.push(UiAction::OpenDeckFile);
                    }
                    if ui.button("Built-in HSK List").clicked() {
                        actions.push(UiAction::UseBuiltinDeck);
                    }
                    ui.separator();
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });

                ui.menu_button("Settings", |ui| {
                    let mut enabled = speech_enabled;
                    if ui.checkbox(&mut enabled, "Pronunciation audio").changed() {
                        actions.push(UiAction::SetSpeechEnabled(enabled));
                    }
                });

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let (icon, hint) = if dark_mode {
                        ("☀", "Switch to light mode")
                    } else {
                        ("🌙", "Switch to dark mode")
                    };
                    if ui.button(icon).on_hover_text(hint).clicked() {
                        actions.push(UiAction::ToggleTheme);
                    }
                    ui.label(egui::RichText::new(deck_name).weak());
                });
            });
        });
    }
}
