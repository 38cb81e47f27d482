pub mod actions;
pub mod app;
pub mod card_view;
pub mod error_modal;
pub mod filter_bar;
pub mod fonts;
pub mod nav_bar;
pub mod settings;
pub mod theme;
pub mod top_bar;

pub use app::FlashcardApp;
