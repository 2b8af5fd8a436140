use crate::geometry::{EyeRois, RegionOfInterest};

use super::pixels::PixelSource;

/// Combined brightness for one frame, with the per-eye values it came from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameScore {
    pub left: Option<f64>,
    pub right: Option<f64>,
    /// Mean channel-averaged luminance in `[0, 255]`.
    pub value: f64,
}

/// Mean luminance of the pixels inside `roi`, where each pixel contributes
/// the unweighted mean of its red, green and blue channels.
///
/// Channel sums are accumulated as integers in row order, so the result is
/// reproducible bit for bit for the same input.
pub fn score_region<S: PixelSource + ?Sized>(
    source: &S,
    roi: Option<&RegionOfInterest>,
) -> Option<f64> {
    let roi = roi.filter(|r| !r.is_empty())?;
    let block = source.read_pixels(roi)?;

    let (channel_sum, pixel_count) = block
        .chunks_exact(4)
        .fold((0u64, 0u64), |(sum, count), px| {
            let rgb = u64::from(px[0]) + u64::from(px[1]) + u64::from(px[2]);
            (sum + rgb, count + 1)
        });

    if pixel_count == 0 {
        return None;
    }

    Some(channel_sum as f64 / (pixel_count * 3) as f64)
}

/// Scores both eye regions and merges them: the mean when both sides are
/// usable, the single side otherwise. `None` means no region could be
/// sampled and the frame has no valid score.
pub fn score_frame<S: PixelSource + ?Sized>(source: &S, rois: &EyeRois) -> Option<FrameScore> {
    let left = score_region(source, rois.left.as_ref());
    let right = score_region(source, rois.right.as_ref());

    let value = match (left, right) {
        (Some(l), Some(r)) => (l + r) / 2.0,
        (Some(only), None) | (None, Some(only)) => only,
        (None, None) => return None,
    };

    Some(FrameScore { left, right, value })
}
