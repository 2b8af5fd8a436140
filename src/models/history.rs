use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One day's recorded delta. The history holds at most one entry per
/// `date_key`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    #[serde(rename = "date")]
    pub date_key: String,
    pub delta_percent: f64,
    pub is_first: bool,
}

/// Calendar-day key (`YYYY-MM-DD`, UTC) for a capture time. Sorts
/// chronologically as plain text.
pub fn date_key(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d").to_string()
}
