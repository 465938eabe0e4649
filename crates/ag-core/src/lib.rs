/// Configuration, types, and shared structures for asciigen.
///
/// This crate contains the character palette, the ANSI color mapper, the
/// render options, the persisted settings, and the validation error taxonomy
/// shared across the asciigen workspace.

pub mod color;
pub mod config;
pub mod error;
pub mod palette;
pub mod settings;

pub use color::ColorMode;
pub use config::{ExportFormat, RenderOptions};
pub use error::ValidationError;
pub use palette::Palette;
pub use settings::Settings;
