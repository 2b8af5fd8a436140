pub mod config;
pub mod landmarks;
pub mod roi;

pub use config::RoiConfig;
pub use landmarks::{landmarks_from_flat, EyeRegionIndices, LandmarkPoint};
pub use roi::{resolve_rois, resolve_rois_with, EyeRois, RegionOfInterest};
