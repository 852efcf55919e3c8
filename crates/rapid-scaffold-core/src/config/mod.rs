//! Generator configuration

pub mod settings;

pub use settings::{GeneratorSettings, SettingsOverrides};
