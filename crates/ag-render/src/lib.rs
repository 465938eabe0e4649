/// ASCII conversion engine for asciigen.
///
/// Converts prepared pixel bitmaps into styled text, one frame at a time.

pub mod renderer;

pub use renderer::{MASK_THRESHOLD, render, visible_width};
