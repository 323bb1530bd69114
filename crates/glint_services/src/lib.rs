//! Glint Services Layer
//!
//! Platform-facing services around the core: persisted settings and the
//! high score.

pub mod settings;

pub use settings::{AudioSettings, Settings, SettingsError};
