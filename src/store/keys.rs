//! Storage keys. Changing either orphans previously persisted data.

pub const BASELINE_KEY: &str = "sleepglow_baseline_score";
pub const HISTORY_KEY: &str = "sleepglow_history_v1";
