use eframe::egui;

use super::actions::ActionQueue;
use crate::core::{
    Intent,
    NavigationController,
};

/// One toggle per category plus "All", which clears the selection.
pub fn filter_bar(ui: &mut egui::Ui, nav: &NavigationController, actions: &mut ActionQueue) {
    ui.horizontal_wrapped(|ui| {
        ui.spacing_mut().item_spacing.x = 6.0;

        let showing_all = nav.selection().is_empty() && !nav.deck().is_empty();
        if ui.selectable_label(showing_all, "All").clicked() && !showing_all {
            actions.push(Intent::ShowAll);
        }

        for category in nav.categories() {
            let selected = nav.selection().contains(category);
            if ui.selectable_label(selected, category.as_str()).clicked() {
                actions.push(Intent::ToggleFilter(category.clone()));
            }
        }
    });
}
