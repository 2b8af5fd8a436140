use serde::Serialize;
use thiserror::Error;

/// Why an analysis pass ended without a result. Every variant is
/// recoverable by capturing again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    #[error("no face detected in frame")]
    NoFaceDetected,

    #[error("landmark detector failed: {0}")]
    DetectorUnavailable(String),

    #[error("landmark detector timed out")]
    DetectorTimedOut,

    #[error("frame source failed: {0}")]
    FrameSourceFailed(String),

    #[error("frame has no pixels yet")]
    FrameNotReady,

    #[error("no usable under-eye region in frame")]
    NoUsableRegion,

    #[error("failed to commit baseline: {0}")]
    PersistenceWriteFailed(String),

    #[error("another analysis pass is already running")]
    AnalysisInProgress,

    #[error("analysis cancelled")]
    Cancelled,
}

impl AnalysisError {
    /// Stable tag for the failure, safe to hand across the crate boundary.
    pub fn reason(&self) -> &'static str {
        match self {
            AnalysisError::NoFaceDetected => "no-face",
            AnalysisError::DetectorUnavailable(_) => "detector-error",
            AnalysisError::DetectorTimedOut => "detector-timeout",
            AnalysisError::FrameSourceFailed(_) => "camera-error",
            AnalysisError::FrameNotReady => "frame-not-ready",
            AnalysisError::NoUsableRegion => "no-usable-region",
            AnalysisError::PersistenceWriteFailed(_) => "persistence-write-failed",
            AnalysisError::AnalysisInProgress => "busy",
            AnalysisError::Cancelled => "cancelled",
        }
    }

    /// Short text for the person holding the camera.
    pub fn user_message(&self) -> &'static str {
        match self {
            AnalysisError::NoFaceDetected => {
                "No clear face found. Adjust the lighting and try again."
            }
            AnalysisError::DetectorUnavailable(_) | AnalysisError::DetectorTimedOut => {
                "Analysis engine hit a problem. Please try again."
            }
            AnalysisError::FrameSourceFailed(_) => {
                "Camera is unavailable. Check camera permissions."
            }
            AnalysisError::FrameNotReady => "Camera is not ready yet. Wait a moment.",
            AnalysisError::NoUsableRegion => {
                "Could not see the area under your eyes. Center your face and try again."
            }
            AnalysisError::PersistenceWriteFailed(_) => {
                "Could not save your baseline. Please try again."
            }
            AnalysisError::AnalysisInProgress => "Analysis already in progress.",
            AnalysisError::Cancelled => "Analysis cancelled.",
        }
    }
}

/// Non-fatal problem attached to a successful pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "camelCase")]
pub enum AnalysisWarning {
    /// Today's history entry was dropped; the result itself is valid.
    HistoryWriteFailed(String),
}
