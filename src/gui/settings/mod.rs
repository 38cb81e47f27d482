pub mod data;

pub use data::{
    SettingsData,
    SETTINGS_FILE,
};
