pub mod luminance;
pub mod pixels;

pub use luminance::{score_frame, score_region, FrameScore};
pub use pixels::PixelSource;
