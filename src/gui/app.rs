use std::{
    path::Path,
    time::Instant,
};

use eframe::egui;
use rand::{
    rngs::StdRng,
    SeedableRng,
};
use rfd::FileDialog;
use tracing::{
    info,
    warn,
};

use super::{
    actions::{
        ActionQueue,
        UiAction,
    },
    card_view::CardView,
    error_modal::ErrorModal,
    filter_bar::filter_bar,
    fonts::setup_fonts,
    nav_bar::nav_bar,
    settings::{
        SettingsData,
        SETTINGS_FILE,
    },
    theme::{
        apply_dark_mode,
        set_theme,
        Theme,
    },
    top_bar::TopBar,
};
use crate::{
    core::{
        Intent,
        StudySession,
    },
    parser,
    persistence::{
        load_json_or_default,
        save_json,
    },
    speech::speaker_from_settings,
};

const BUILTIN_DECK_NAME: &str = "HSK 1–5";

pub struct FlashcardApp {
    // Study state
    session: StudySession<StdRng>,
    deck_name: String,

    // Configuration
    settings_data: SettingsData,

    // UI State
    theme: Theme,
    dark_mode: bool,
    card_view: CardView,
    actions: ActionQueue,
    error_modal: ErrorModal,
}

impl FlashcardApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let settings_data = load_json_or_default::<SettingsData>(SETTINGS_FILE);

        setup_fonts(&cc.egui_ctx, settings_data.font_path.as_deref());

        let theme = Theme::dracula();
        set_theme(&cc.egui_ctx, &theme);
        let dark_mode =
            settings_data.dark_mode.unwrap_or_else(|| cc.egui_ctx.theme() == egui::Theme::Dark);
        apply_dark_mode(&cc.egui_ctx, dark_mode);

        let mut error_modal = ErrorModal::new();
        let (records, deck_name) = match &settings_data.last_deck_path {
            Some(path) => match parser::load_records(path) {
                Ok(records) => (records, deck_label(path)),
                Err(e) => {
                    warn!("Failed to reopen {}: {}", path.display(), e);
                    error_modal.show_error(
                        "Could not reopen deck",
                        "Falling back to the built-in word list.",
                        Some(e.to_string()),
                    );
                    (parser::builtin_records(), BUILTIN_DECK_NAME.to_string())
                }
            },
            None => (parser::builtin_records(), BUILTIN_DECK_NAME.to_string()),
        };
        info!("Loaded {} records from {}", records.len(), deck_name);

        let session = StudySession::new(
            records,
            StdRng::from_os_rng(),
            speaker_from_settings(&settings_data.speech),
            settings_data.session_options(),
        );

        Self {
            session,
            deck_name,
            settings_data,
            theme,
            dark_mode,
            card_view: CardView::default(),
            actions: ActionQueue::new(),
            error_modal,
        }
    }

    fn read_keyboard(&mut self, ctx: &egui::Context) {
        let keys = ctx.input(|i| {
            [
                (i.key_pressed(egui::Key::ArrowRight), Intent::Advance),
                (i.key_pressed(egui::Key::ArrowLeft), Intent::Retreat),
                (i.key_pressed(egui::Key::Space), Intent::ToggleFlip),
                (i.key_pressed(egui::Key::S), Intent::Shuffle),
                (i.key_pressed(egui::Key::P), Intent::Speak),
            ]
        });

        for (pressed, intent) in keys {
            if pressed {
                self.actions.push(intent);
            }
        }
    }

    fn apply_actions(&mut self, ctx: &egui::Context) {
        if self.actions.is_empty() {
            return;
        }

        let actions: Vec<UiAction> = self.actions.drain().collect();
        for action in actions {
            match action {
                UiAction::Study(intent) => self.session.dispatch(intent, Instant::now()),
                UiAction::OpenDeckFile => self.open_deck_file(),
                UiAction::UseBuiltinDeck => {
                    self.session.replace_records(parser::builtin_records());
                    self.deck_name = BUILTIN_DECK_NAME.to_string();
                    self.settings_data.last_deck_path = None;
                    self.save_settings();
                }
                UiAction::ToggleTheme => {
                    self.dark_mode = !self.dark_mode;
                    apply_dark_mode(ctx, self.dark_mode);
                    self.settings_data.dark_mode = Some(self.dark_mode);
                    self.save_settings();
                }
                UiAction::SetSpeechEnabled(enabled) => {
                    self.settings_data.speech.enabled = enabled;
                    self.session.set_speaker(speaker_from_settings(&self.settings_data.speech));
                    self.save_settings();
                }
            }
        }

        ctx.request_repaint();
    }

    fn open_deck_file(&mut self) {
        let Some(path) =
            FileDialog::new().add_filter("CSV word lists", &["csv", "txt"]).pick_file()
        else {
            return;
        };

        match parser::load_records(&path) {
            Ok(records) => {
                self.session.replace_records(records);
                self.deck_name = deck_label(&path);
                self.settings_data.last_deck_path = Some(path);
                self.save_settings();
            }
            Err(e) => {
                warn!("Failed to open {}: {}", path.display(), e);
                self.error_modal.show_error(
                    "Could not open deck",
                    "The file needs a header row with term and definition columns.",
                    Some(e.to_string()),
                );
            }
        }
    }

    fn save_settings(&self) {
        if let Err(e) = save_json(&self.settings_data, SETTINGS_FILE) {
            warn!("Failed to save settings: {}", e);
        }
    }
}

impl eframe::App for FlashcardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.session.tick(Instant::now());
        self.read_keyboard(ctx);

        TopBar::show(
            ctx,
            &self.deck_name,
            self.dark_mode,
            self.settings_data.speech.enabled,
            &mut self.actions,
        );

        egui::TopBottomPanel::bottom("nav_panel").show(ctx, |ui| {
            ui.add_space(8.0);
            nav_bar(ui, self.session.navigation(), &mut self.actions);
            ui.add_space(8.0);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_space(6.0);
            filter_bar(ui, self.session.navigation(), &mut self.actions);
            ui.add_space(28.0);

            self.card_view.show(ui, &self.session, &self.theme, &mut self.actions);

            if !self.session.navigation().deck().is_empty() {
                ui.add_space(14.0);
                ui.vertical_centered(|ui| {
                    ui.label(
                        egui::RichText::new("Click to flip · swipe or ←/→ to move · P to listen")
                            .small()
                            .color(self.theme.muted(ui.ctx())),
                    );
                });
            }
        });

        self.error_modal.show(ctx);
        self.apply_actions(ctx);
    }
}

fn deck_label(path: &Path) -> String {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("Custom deck")
        .to_string()
}
