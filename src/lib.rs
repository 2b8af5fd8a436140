//! Under-eye brightness delta engine.
//!
//! Takes a captured frame plus face landmarks, samples a box under each eye,
//! and reports the brightness change against a per-user baseline that is
//! committed on the first successful capture. Only scalar scores are
//! persisted; frames are dropped as soon as they have been scored.

pub mod analysis;
pub mod db;
pub mod delta;
pub mod geometry;
pub mod models;
pub mod scoring;
pub mod settings;
pub mod store;
mod utils;

use std::{path::Path, sync::Arc};

use anyhow::{Context, Result};
use log::info;

pub use analysis::{
    AnalysisController, AnalysisError, AnalysisReport, AnalysisState, AnalysisWarning, Frame,
    FrameSource, LandmarkDetector,
};
pub use db::Database;
pub use delta::{compute_delta, Delta};
pub use geometry::{EyeRegionIndices, LandmarkPoint, RegionOfInterest, RoiConfig};
pub use models::{AnalysisResult, HistoryEntry, Trend};
pub use settings::{EngineSettings, SettingsStore};
pub use store::{BaselineStore, KeyValueStore, MemoryStore};
pub use utils::logging::init_logging;

const DATABASE_FILE: &str = "sleepglow.sqlite3";
const SETTINGS_FILE: &str = "settings.json";

/// Engine wired to on-disk storage under one data directory.
pub struct SleepGlow {
    pub controller: AnalysisController<Database>,
    pub settings: SettingsStore,
}

impl SleepGlow {
    /// Opens (or creates) the engine's files under `data_dir`.
    ///
    /// Does not install a logger; hosts that want output call
    /// [`init_logging`] first, e.g. with [`settings::debug_mode`].
    pub fn open(data_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(data_dir)
            .with_context(|| format!("failed to create data directory {}", data_dir.display()))?;

        let database = Database::new(data_dir.join(DATABASE_FILE))?;
        let settings = SettingsStore::new(data_dir.join(SETTINGS_FILE))?;

        let controller =
            AnalysisController::new(Arc::new(BaselineStore::new(database)), settings.current());

        info!("SleepGlow engine ready at {}", data_dir.display());

        Ok(Self {
            controller,
            settings,
        })
    }

    pub async fn history(&self) -> Vec<HistoryEntry> {
        self.controller.history().await
    }
}
