use eframe::egui;

use super::actions::ActionQueue;
use crate::core::{
    Intent,
    NavigationController,
};

const BUTTON_WIDTH: f32 = 88.0;

pub fn nav_bar(ui: &mut egui::Ui, nav: &NavigationController, actions: &mut ActionQueue) {
    let Some(position) = nav.position_label() else {
        return;
    };
    let controls = nav.controls();

    ui.horizontal(|ui| {
        let total = BUTTON_WIDTH * 3.0 + 80.0 + ui.spacing().item_spacing.x * 3.0;
        ui.add_space(((ui.available_width() - total) / 2.0).max(0.0));

        let prev = egui::Button::new("◀ Prev").min_size(egui::vec2(BUTTON_WIDTH, 0.0));
        if ui.add_enabled(controls.previous, prev).clicked() {
            actions.push(Intent::Retreat);
        }

        ui.add_sized([80.0, ui.spacing().interact_size.y], egui::Label::new(position));

        let next = egui::Button::new("Next ▶").min_size(egui::vec2(BUTTON_WIDTH, 0.0));
        if ui.add_enabled(controls.next, next).clicked() {
            actions.push(Intent::Advance);
        }

        let shuffle = egui::Button::new("🔀 Shuffle").min_size(egui::vec2(BUTTON_WIDTH, 0.0));
        if ui.add_enabled(controls.shuffle, shuffle).clicked() {
            actions.push(Intent::Shuffle);
        }
    });
}
