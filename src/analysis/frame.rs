use chrono::{DateTime, Utc};
use image::RgbaImage;

use crate::geometry::RegionOfInterest;
use crate::scoring::PixelSource;

/// A still captured from the camera feed. Owned by exactly one analysis pass
/// and dropped as soon as the pass has scored it or failed.
pub struct Frame {
    image: RgbaImage,
    captured_at: DateTime<Utc>,
}

impl Frame {
    pub fn new(image: RgbaImage, captured_at: DateTime<Utc>) -> Self {
        Self { image, captured_at }
    }

    /// Wraps a raw RGBA buffer. `None` when the length does not match
    /// `width * height * 4`.
    pub fn from_rgba(
        width: u32,
        height: u32,
        rgba: Vec<u8>,
        captured_at: DateTime<Utc>,
    ) -> Option<Self> {
        RgbaImage::from_raw(width, height, rgba).map(|image| Self::new(image, captured_at))
    }

    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }
}

impl PixelSource for Frame {
    fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    fn read_pixels(&self, roi: &RegionOfInterest) -> Option<Vec<u8>> {
        self.image.read_pixels(roi)
    }
}

impl std::fmt::Debug for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (width, height) = self.image.dimensions();
        f.debug_struct("Frame")
            .field("width", &width)
            .field("height", &height)
            .field("captured_at", &self.captured_at)
            .finish()
    }
}
