pub mod analysis;
pub mod history;

pub use analysis::{AnalysisResult, Trend};
pub use history::{date_key, HistoryEntry};
