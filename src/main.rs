use eframe::egui;
use hanzideck::gui::FlashcardApp;
use tracing_subscriber::EnvFilter;

fn main() -> eframe::Result {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("hanzideck=info")),
        )
        .init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Hanzi Deck")
            .with_inner_size([560.0, 640.0])
            .with_min_inner_size([380.0, 520.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Hanzi Deck",
        options,
        Box::new(|cc| Ok(Box::new(FlashcardApp::new(cc)))),
    )
}
