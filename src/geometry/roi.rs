use serde::{Deserialize, Serialize};

use super::config::RoiConfig;
use super::landmarks::{EyeRegionIndices, LandmarkPoint};

/// Axis-aligned pixel rectangle, always inside the frame it was resolved for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionOfInterest {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl RegionOfInterest {
    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn fits_within(&self, frame_width: u32, frame_height: u32) -> bool {
        u64::from(self.x) + u64::from(self.width) <= u64::from(frame_width)
            && u64::from(self.y) + u64::from(self.height) <= u64::from(frame_height)
    }
}

/// Sampling boxes for both eyes. A side is `None` when its landmarks were
/// missing or the clamped box was too small to sample.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EyeRois {
    pub left: Option<RegionOfInterest>,
    pub right: Option<RegionOfInterest>,
}

impl EyeRois {
    pub fn is_empty(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}

/// Resolves both under-eye boxes with the FaceMesh indices and default
/// proportions.
pub fn resolve_rois(landmarks: &[LandmarkPoint], frame_width: u32, frame_height: u32) -> EyeRois {
    resolve_rois_with(
        landmarks,
        frame_width,
        frame_height,
        &EyeRegionIndices::default(),
        &RoiConfig::default(),
    )
}

pub fn resolve_rois_with(
    landmarks: &[LandmarkPoint],
    frame_width: u32,
    frame_height: u32,
    indices: &EyeRegionIndices,
    config: &RoiConfig,
) -> EyeRois {
    let face_height = face_height_norm(landmarks, config.min_face_height);
    let layout = BoxLayout {
        offset: face_height * config.offset_fraction,
        width: face_height * config.width_fraction,
        height: face_height * config.height_fraction,
        frame_width,
        frame_height,
    };

    EyeRois {
        left: layout.place(landmarks, &indices.left),
        right: layout.place(landmarks, &indices.right),
    }
}

/// Vertical landmark spread, floored at `min_face_height`.
fn face_height_norm(landmarks: &[LandmarkPoint], min_face_height: f64) -> f64 {
    let mut ys = landmarks.iter().map(|p| p.y).filter(|y| y.is_finite());
    let Some(first) = ys.next() else {
        return min_face_height;
    };

    let (min_y, max_y) = ys.fold((first, first), |(lo, hi), y| (lo.min(y), hi.max(y)));
    (max_y - min_y).max(min_face_height)
}

struct BoxLayout {
    offset: f64,
    width: f64,
    height: f64,
    frame_width: u32,
    frame_height: u32,
}

impl BoxLayout {
    fn place(&self, landmarks: &[LandmarkPoint], cluster: &[usize]) -> Option<RegionOfInterest> {
        let mut points = cluster
            .iter()
            .filter_map(|&idx| landmarks.get(idx))
            .filter(|p| p.x.is_finite() && p.y.is_finite());

        let first = points.next()?;
        let (min_x, max_x, lowest_y) = points.fold((first.x, first.x, first.y), |(lo, hi, low), p| {
            (lo.min(p.x), hi.max(p.x), low.max(p.y))
        });

        let frame_w = f64::from(self.frame_width);
        let frame_h = f64::from(self.frame_height);

        let center_x = (min_x + max_x) / 2.0 * frame_w;
        let center_y = (lowest_y + self.offset) * frame_h;
        let box_w = self.width * frame_w;
        let box_h = self.height * frame_h;

        let x = ((center_x - box_w / 2.0).floor() as i64).max(0);
        let y = ((center_y - box_h / 2.0).floor() as i64).max(0);
        let w = (box_w.floor() as i64).min(i64::from(self.frame_width) - x);
        let h = (box_h.floor() as i64).min(i64::from(self.frame_height) - y);

        if w <= 1 || h <= 1 {
            return None;
        }

        Some(RegionOfInterest {
            x: u32::try_from(x).ok()?,
            y: u32::try_from(y).ok()?,
            width: u32::try_from(w).ok()?,
            height: u32::try_from(h).ok()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MESH_POINTS: usize = 478;

    /// A face spanning y in [0.2, 0.8], with each lower-lid cluster spread
    /// horizontally around `left_x` / `right_x` and bottoming out at `eye_y`.
    fn synthetic_face(left_x: f64, right_x: f64, eye_y: f64) -> Vec<LandmarkPoint> {
        let mut points = vec![LandmarkPoint::new(0.5, 0.5); MESH_POINTS];
        points[10] = LandmarkPoint::new(0.5, 0.2);
        points[152] = LandmarkPoint::new(0.5, 0.8);

        let spread = [-0.05, -0.02, 0.02, 0.05];
        let lift = [0.0, 0.02, 0.03, 0.01];
        let indices = EyeRegionIndices::FACE_MESH;
        for (i, &idx) in indices.left.iter().enumerate() {
            points[idx] = LandmarkPoint::new(left_x + spread[i], eye_y - lift[i]);
        }
        for (i, &idx) in indices.right.iter().enumerate() {
            points[idx] = LandmarkPoint::new(right_x + spread[i], eye_y - lift[i]);
        }
        points
    }

    #[test]
    fn places_box_below_each_eye() {
        let rois = resolve_rois(&synthetic_face(0.4, 0.6, 0.45), 640, 480);

        let left = rois.left.expect("left roi");
        assert_eq!(left, RegionOfInterest { x: 232, y: 220, width: 46, height: 25 });

        let right = rois.right.expect("right roi");
        assert_eq!(right.y, left.y);
        assert_eq!(right.width, left.width);
        assert!(right.x > left.x);
    }

    #[test]
    fn boxes_stay_inside_frame() {
        let sizes = [(640, 480), (1280, 720), (31, 17), (3, 3)];
        let anchors = [-0.3, 0.0, 0.02, 0.5, 0.97, 1.0, 1.4];

        for &(w, h) in &sizes {
            for &ax in &anchors {
                for &ay in &anchors {
                    let rois = resolve_rois(&synthetic_face(ax, 1.0 - ax, ay), w, h);
                    for roi in [rois.left, rois.right].into_iter().flatten() {
                        assert!(roi.fits_within(w, h), "{roi:?} escapes {w}x{h}");
                        assert!(roi.width > 1 && roi.height > 1);
                    }
                }
            }
        }
    }

    #[test]
    fn flat_landmark_spread_uses_height_floor() {
        let points: Vec<LandmarkPoint> = (0..MESH_POINTS)
            .map(|i| LandmarkPoint::new(i as f64 / MESH_POINTS as f64, 0.4))
            .collect();

        assert!((face_height_norm(&points, 0.2) - 0.2).abs() < f64::EPSILON);

        let rois = resolve_rois(&points, 1000, 1000);
        let left = rois.left.expect("floored face height still yields a box");
        // 0.2 * 0.12 * 1000 = 24 wide, 0.2 * 0.09 * 1000 = 18 tall
        assert_eq!((left.width, left.height), (24, 18));
        assert!(left.fits_within(1000, 1000));
    }

    #[test]
    fn missing_indices_leave_side_absent() {
        let mut points = synthetic_face(0.4, 0.6, 0.45);
        points.truncate(300);

        let rois = resolve_rois(&points, 640, 480);
        assert!(rois.left.is_some());
        assert!(rois.right.is_none());
    }

    #[test]
    fn empty_landmarks_resolve_nothing() {
        assert!(resolve_rois(&[], 640, 480).is_empty());
    }

    #[test]
    fn tiny_frame_drops_both_sides() {
        let rois = resolve_rois(&synthetic_face(0.4, 0.6, 0.45), 8, 8);
        assert!(rois.is_empty());
    }

    #[test]
    fn anchor_past_frame_edge_is_absent() {
        let rois = resolve_rois(&synthetic_face(0.4, 0.6, 1.5), 640, 480);
        assert!(rois.is_empty());
    }
}
