use anyhow::{Context, Result};
use tokio::sync::Mutex;

use crate::models::HistoryEntry;

use super::keys::{BASELINE_KEY, HISTORY_KEY};
use super::KeyValueStore;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info, log_warn};

/// Baseline value after a commit attempt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaselineCommit {
    /// The baseline now on record, whoever wrote it.
    pub value: f64,
    /// True when this call wrote it.
    pub newly_set: bool,
}

/// Owns the persisted baseline and the day-keyed history log.
///
/// Share one instance (behind an `Arc`) between every analysis pass that
/// targets the same user; the baseline write guard only serializes writers
/// that go through the same instance.
pub struct BaselineStore<S> {
    kv: S,
    baseline_guard: Mutex<()>,
}

impl<S: KeyValueStore> BaselineStore<S> {
    pub fn new(kv: S) -> Self {
        Self {
            kv,
            baseline_guard: Mutex::new(()),
        }
    }

    pub fn inner(&self) -> &S {
        &self.kv
    }

    /// Reads the baseline. A stored value that does not parse as a finite
    /// number reads as absent.
    pub async fn read_baseline(&self) -> Result<Option<f64>> {
        let raw = self
            .kv
            .get(BASELINE_KEY)
            .await
            .context("failed to read baseline")?;

        Ok(raw.and_then(|raw| parse_baseline(&raw)))
    }

    /// Commits `score` as the baseline unless one is already on record, in
    /// which case the existing value is returned untouched.
    pub async fn write_baseline_if_absent(&self, score: f64) -> Result<BaselineCommit> {
        let _guard = self.baseline_guard.lock().await;

        if let Some(existing) = self.read_baseline().await? {
            log_debug!("baseline already set to {existing:.3}; discarding {score:.3}");
            return Ok(BaselineCommit {
                value: existing,
                newly_set: false,
            });
        }

        self.kv
            .set(BASELINE_KEY, &score.to_string())
            .await
            .context("failed to commit baseline")?;

        log_info!("baseline committed: {score:.3}");
        Ok(BaselineCommit {
            value: score,
            newly_set: true,
        })
    }

    /// Records `delta_percent` for `date_key`, replacing any entry already
    /// stored for that day.
    pub async fn upsert_history_entry(
        &self,
        date_key: &str,
        delta_percent: f64,
        is_first: bool,
    ) -> Result<()> {
        let raw = self
            .kv
            .get(HISTORY_KEY)
            .await
            .context("failed to read history before update")?;
        let mut history = raw.as_deref().map(parse_history).unwrap_or_default();
        history.retain(|entry| entry.date_key != date_key);
        history.push(HistoryEntry {
            date_key: date_key.to_string(),
            delta_percent,
            is_first,
        });
        history.sort_by(|a, b| a.date_key.cmp(&b.date_key));

        let serialized =
            serde_json::to_string(&history).context("failed to serialize history")?;
        self.kv
            .set(HISTORY_KEY, &serialized)
            .await
            .context("failed to write history")
    }

    /// History sorted by day. Unreadable or malformed data yields an empty
    /// history.
    pub async fn read_history(&self) -> Vec<HistoryEntry> {
        let raw = match self.kv.get(HISTORY_KEY).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(err) => {
                log_warn!("history read failed, treating as empty: {err:#}");
                return Vec::new();
            }
        };

        parse_history(&raw)
    }
}

/// Decodes the stored history, sorted by day. Malformed data yields an
/// empty history.
fn parse_history(raw: &str) -> Vec<HistoryEntry> {
    match serde_json::from_str::<Vec<HistoryEntry>>(raw) {
        Ok(mut entries) => {
            entries.sort_by(|a, b| a.date_key.cmp(&b.date_key));
            entries
        }
        Err(err) => {
            log_warn!("stored history is malformed, treating as empty: {err}");
            Vec::new()
        }
    }
}

fn parse_baseline(raw: &str) -> Option<f64> {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Some(value),
        _ => {
            log_warn!("stored baseline {raw:?} is not a number; treating as absent");
            None
        }
    }
}
