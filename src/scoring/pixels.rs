use image::{imageops, RgbaImage};

use crate::geometry::RegionOfInterest;

/// Synchronous read access to a captured frame's pixels.
pub trait PixelSource {
    fn dimensions(&self) -> (u32, u32);

    /// Returns the RGBA bytes inside `roi`, row-major, four bytes per pixel.
    /// `None` when the rectangle does not fit the frame.
    fn read_pixels(&self, roi: &RegionOfInterest) -> Option<Vec<u8>>;
}

impl PixelSource for RgbaImage {
    fn dimensions(&self) -> (u32, u32) {
        RgbaImage::dimensions(self)
    }

    fn read_pixels(&self, roi: &RegionOfInterest) -> Option<Vec<u8>> {
        let (width, height) = RgbaImage::dimensions(self);
        if !roi.fits_within(width, height) {
            return None;
        }

        let block = imageops::crop_imm(self, roi.x, roi.y, roi.width, roi.height).to_image();
        Some(block.into_raw())
    }
}
