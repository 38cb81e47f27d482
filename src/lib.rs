pub mod core;
pub mod gui;
pub mod parser;
pub mod persistence;
pub mod speech;

pub use crate::core::{
    Intent,
    NavigationController,
    StudySession,
    VocabRecord,
};
