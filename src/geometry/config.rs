use serde::{Deserialize, Serialize};

/// Proportions used to place the under-eye sampling box.
///
/// Every size is a fraction of the normalized face height, so the box scales
/// with how close the face is to the camera.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RoiConfig {
    /// Lower bound for the normalized face height. Keeps the box a sane size
    /// when landmark spread collapses (occluded or flattened faces).
    pub min_face_height: f64,

    /// Vertical gap between the lowest eye landmark and the box center.
    pub offset_fraction: f64,

    pub height_fraction: f64,
    pub width_fraction: f64,
}

impl Default for RoiConfig {
    fn default() -> Self {
        Self {
            min_face_height: 0.2,
            offset_fraction: 0.06,
            height_fraction: 0.09,
            width_fraction: 0.12,
        }
    }
}
