//! Data models for colors and design-token settings.
//!
//! This module contains the plain data structures shared by the color,
//! settings and expansion code. Models carry no I/O.

pub mod color_value;
pub mod rgb;
pub mod settings;

// Re-export all model types
pub use color_value::{ColorModifier, ColorValue};
pub use rgb::RgbColor;
pub use settings::SettingsSnapshot;
