/// Visual source modules for asciigen (decode, resize, matting, animation).

pub mod animation;
pub mod image;
pub mod matting;

pub use animation::FrameStream;
pub use crate::image::{PreparedFrame, prepare_frame, probe_image};
pub use matting::{Matting, MattingCommand};
