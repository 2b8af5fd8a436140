pub mod collaborators;
pub mod controller;
pub mod error;
pub mod frame;
pub mod state;

pub use collaborators::{FrameSource, LandmarkDetector};
pub use controller::{AnalysisController, AnalysisReport};
pub use error::{AnalysisError, AnalysisWarning};
pub use frame::Frame;
pub use state::AnalysisState;
