pub mod deck;
pub mod errors;
pub mod filter;
pub mod gesture;
pub mod models;
pub mod navigation;
pub mod session;

pub use deck::Deck;
pub use errors::{
    DeckError,
    NavigationError,
};
pub use filter::FilterSelection;
pub use gesture::{
    GestureOutcome,
    GestureRecognizer,
};
pub use models::{
    Direction,
    VocabRecord,
};
pub use navigation::{
    NavigationController,
    TransitionHandle,
};
pub use session::{
    Intent,
    SessionOptions,
    StudySession,
};
