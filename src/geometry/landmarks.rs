use serde::{Deserialize, Serialize};

/// A facial landmark in normalized frame coordinates.
///
/// `x` and `y` are fractions of frame width and height. `z` is carried for
/// detectors that report depth but is not used for region placement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LandmarkPoint {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
}

impl LandmarkPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, z: 0.0 }
    }
}

impl From<(f32, f32, f32)> for LandmarkPoint {
    fn from((x, y, z): (f32, f32, f32)) -> Self {
        Self {
            x: f64::from(x),
            y: f64::from(y),
            z: f64::from(z),
        }
    }
}

/// Builds landmarks from a flat `[x0, y0, z0, x1, y1, z1, ...]` buffer, the
/// layout most mesh models emit. A trailing partial triple is dropped.
pub fn landmarks_from_flat(values: &[f32]) -> Vec<LandmarkPoint> {
    values
        .chunks_exact(3)
        .map(|triple| LandmarkPoint::from((triple[0], triple[1], triple[2])))
        .collect()
}

/// Landmark indices that outline the lower lid of each eye.
///
/// These are bound to the detector's numbering scheme. Swapping the detector
/// model means revalidating them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EyeRegionIndices {
    pub left: [usize; 4],
    pub right: [usize; 4],
}

impl EyeRegionIndices {
    /// MediaPipe FaceMesh (468/478 point) numbering.
    pub const FACE_MESH: Self = Self {
        left: [145, 159, 160, 144],
        right: [374, 386, 387, 380],
    };
}

impl Default for EyeRegionIndices {
    fn default() -> Self {
        Self::FACE_MESH
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_buffer_drops_partial_triple() {
        let points = landmarks_from_flat(&[0.1, 0.2, 0.0, 0.5, 0.6, -0.1, 0.9]);
        assert_eq!(points.len(), 2);
        assert!((points[1].x - 0.5).abs() < 1e-6);
        assert!((points[1].z + 0.1).abs() < 1e-6);
    }

    #[test]
    fn missing_z_deserializes_as_zero() {
        let point: LandmarkPoint = serde_json::from_str(r#"{"x":0.25,"y":0.75}"#).unwrap();
        assert_eq!(point, LandmarkPoint::new(0.25, 0.75));
    }
}
