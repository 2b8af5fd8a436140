use std::future::Future;

use anyhow::Result;

use crate::geometry::LandmarkPoint;

use super::frame::Frame;

/// Face landmark model.
///
/// Implementations convert the model's native output into `LandmarkPoint`s
/// before returning; one inner `Vec` per detected face, in detector order,
/// numbered per the model's mesh. An empty outer `Vec` means no face.
pub trait LandmarkDetector: Send + Sync {
    fn detect(
        &self,
        frame: &Frame,
        timestamp_ms: i64,
    ) -> impl Future<Output = Result<Vec<Vec<LandmarkPoint>>>> + Send;
}

/// Live camera feed that can hand out still frames.
pub trait FrameSource: Send {
    /// Next still from the feed, or `None` while the feed is not ready.
    fn next_frame(&mut self) -> impl Future<Output = Result<Option<Frame>>> + Send;

    /// Called once a pass that drew from this source has finished, whether
    /// it succeeded, failed or was cancelled.
    fn release(&mut self) {}
}
