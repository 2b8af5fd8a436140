use crate::models::AnalysisResult;

use super::error::AnalysisError;

/// Where the current analysis pass is.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum AnalysisState {
    #[default]
    Idle,
    Capturing,
    Detecting,
    Scoring,
    Persisting,
    Done(AnalysisResult),
    Failed(AnalysisError),
}

impl AnalysisState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, AnalysisState::Done(_) | AnalysisState::Failed(_))
    }

    pub fn name(&self) -> &'static str {
        match self {
            AnalysisState::Idle => "idle",
            AnalysisState::Capturing => "capturing",
            AnalysisState::Detecting => "detecting",
            AnalysisState::Scoring => "scoring",
            AnalysisState::Persisting => "persisting",
            AnalysisState::Done(_) => "done",
            AnalysisState::Failed(_) => "failed",
        }
    }
}
