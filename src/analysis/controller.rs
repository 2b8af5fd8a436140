use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    },
    time::Instant,
};

use serde::Serialize;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::{
    delta::compute_delta,
    geometry::resolve_rois_with,
    models::{date_key, AnalysisResult, HistoryEntry},
    scoring::{score_frame, PixelSource},
    settings::EngineSettings,
    store::{BaselineStore, KeyValueStore},
};

use super::{
    collaborators::{FrameSource, LandmarkDetector},
    error::{AnalysisError, AnalysisWarning},
    frame::Frame,
    state::AnalysisState,
};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info, log_warn};

/// A successful pass.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub pass_id: Uuid,
    pub result: AnalysisResult,
    pub warnings: Vec<AnalysisWarning>,
}

/// Sequences one capture through detection, scoring and persistence.
///
/// At most one pass runs per controller; a second request while one is in
/// flight is rejected with [`AnalysisError::AnalysisInProgress`]. Clones
/// share the in-flight flag and state.
pub struct AnalysisController<S> {
    store: Arc<BaselineStore<S>>,
    settings: EngineSettings,
    state: Arc<Mutex<AnalysisState>>,
    in_flight: Arc<AtomicBool>,
}

impl<S> Clone for AnalysisController<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            settings: self.settings.clone(),
            state: Arc::clone(&self.state),
            in_flight: Arc::clone(&self.in_flight),
        }
    }
}

/// Held for the lifetime of a pass. Dropping it before the pass reached a
/// terminal state (the caller dropped the future) records a cancellation.
struct PassGuard {
    state: Arc<Mutex<AnalysisState>>,
    in_flight: Arc<AtomicBool>,
}

impl Drop for PassGuard {
    fn drop(&mut self) {
        let mut state = lock_state(&self.state);
        if !state.is_terminal() {
            *state = AnalysisState::Failed(AnalysisError::Cancelled);
        }
        drop(state);
        self.in_flight.store(false, Ordering::Release);
    }
}

/// Hands the frame source back once the pass is over, however it ended.
struct ReleaseOnDrop<'a, F: FrameSource>(&'a mut F);

impl<F: FrameSource> Drop for ReleaseOnDrop<'_, F> {
    fn drop(&mut self) {
        self.0.release();
    }
}

fn lock_state(state: &Mutex<AnalysisState>) -> std::sync::MutexGuard<'_, AnalysisState> {
    match state.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

impl<S: KeyValueStore> AnalysisController<S> {
    pub fn new(store: Arc<BaselineStore<S>>, settings: EngineSettings) -> Self {
        Self {
            store,
            settings,
            state: Arc::new(Mutex::new(AnalysisState::Idle)),
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn store(&self) -> &Arc<BaselineStore<S>> {
        &self.store
    }

    pub fn state(&self) -> AnalysisState {
        lock_state(&self.state).clone()
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Moves the controller to `state`, typically `Capturing` after a
    /// failure. Rejected while a pass is running.
    pub fn reset_to(&self, state: AnalysisState) -> Result<(), AnalysisError> {
        if self.is_busy() {
            return Err(AnalysisError::AnalysisInProgress);
        }
        *lock_state(&self.state) = state;
        Ok(())
    }

    /// Day-ordered history of recorded deltas.
    pub async fn history(&self) -> Vec<HistoryEntry> {
        self.store.read_history().await
    }

    /// Analyzes an already captured frame.
    pub async fn run_analysis<D: LandmarkDetector>(
        &self,
        frame: Frame,
        detector: &D,
        cancel: &CancellationToken,
    ) -> Result<AnalysisReport, AnalysisError> {
        let _pass = self.begin_pass()?;
        self.set_state(AnalysisState::Capturing);

        let outcome = self.analyze(frame, detector, cancel).await;
        self.finish(outcome)
    }

    /// Pulls the next still from `source`, then analyzes it.
    pub async fn capture_and_analyze<F: FrameSource, D: LandmarkDetector>(
        &self,
        source: &mut F,
        detector: &D,
        cancel: &CancellationToken,
    ) -> Result<AnalysisReport, AnalysisError> {
        let _pass = self.begin_pass()?;
        let mut source = ReleaseOnDrop(source);
        self.set_state(AnalysisState::Capturing);

        let captured = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(AnalysisError::Cancelled),
            frame = source.0.next_frame() => match frame {
                Ok(Some(frame)) => Ok(frame),
                Ok(None) => Err(AnalysisError::FrameNotReady),
                Err(err) => Err(AnalysisError::FrameSourceFailed(format!("{err:#}"))),
            },
        };

        let outcome = match captured {
            Ok(frame) => self.analyze(frame, detector, cancel).await,
            Err(err) => Err(err),
        };
        drop(source);
        self.finish(outcome)
    }

    fn begin_pass(&self) -> Result<PassGuard, AnalysisError> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            log_warn!("rejected capture: a pass is already in flight");
            return Err(AnalysisError::AnalysisInProgress);
        }

        Ok(PassGuard {
            state: Arc::clone(&self.state),
            in_flight: Arc::clone(&self.in_flight),
        })
    }

    fn set_state(&self, next: AnalysisState) {
        let mut state = lock_state(&self.state);
        log_debug!("analysis state {} -> {}", state.name(), next.name());
        *state = next;
    }

    fn finish(
        &self,
        outcome: Result<AnalysisReport, AnalysisError>,
    ) -> Result<AnalysisReport, AnalysisError> {
        match &outcome {
            Ok(report) => self.set_state(AnalysisState::Done(report.result)),
            Err(err) => {
                log_warn!("analysis failed ({}): {err}", err.reason());
                self.set_state(AnalysisState::Failed(err.clone()));
            }
        }
        outcome
    }

    async fn analyze<D: LandmarkDetector>(
        &self,
        frame: Frame,
        detector: &D,
        cancel: &CancellationToken,
    ) -> Result<AnalysisReport, AnalysisError> {
        let pass_id = Uuid::new_v4();
        let pass_start = Instant::now();

        let (width, height) = frame.dimensions();
        if width == 0 || height == 0 {
            return Err(AnalysisError::FrameNotReady);
        }
        let captured_at = frame.captured_at();

        self.set_state(AnalysisState::Detecting);
        let detect_start = Instant::now();
        let detection = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(AnalysisError::Cancelled),
            res = tokio::time::timeout(
                self.settings.detector_timeout(),
                detector.detect(&frame, captured_at.timestamp_millis()),
            ) => res,
        };
        let detect_ms = detect_start.elapsed().as_millis();

        let faces = match detection {
            Ok(Ok(faces)) => faces,
            Ok(Err(err)) => return Err(AnalysisError::DetectorUnavailable(format!("{err:#}"))),
            Err(_) => return Err(AnalysisError::DetectorTimedOut),
        };
        let landmarks = faces
            .into_iter()
            .next()
            .filter(|face| !face.is_empty())
            .ok_or(AnalysisError::NoFaceDetected)?;

        self.set_state(AnalysisState::Scoring);
        let rois = resolve_rois_with(
            &landmarks,
            width,
            height,
            &self.settings.eye_indices,
            &self.settings.roi,
        );
        let score = score_frame(&frame, &rois);
        drop(frame);

        let score = score.ok_or(AnalysisError::NoUsableRegion)?;
        log_debug!(
            "pass {pass_id}: left roi {:?} -> {:?}, right roi {:?} -> {:?}",
            rois.left,
            score.left,
            rois.right,
            score.right
        );

        if cancel.is_cancelled() {
            return Err(AnalysisError::Cancelled);
        }

        self.set_state(AnalysisState::Persisting);
        let commit = self
            .store
            .write_baseline_if_absent(score.value)
            .await
            .map_err(|err| AnalysisError::PersistenceWriteFailed(format!("{err:#}")))?;

        let result = if commit.newly_set {
            AnalysisResult {
                baseline_score: commit.value,
                current_score: score.value,
                delta_percent: 0.0,
                improved: false,
                is_first_time: true,
            }
        } else {
            let delta = compute_delta(commit.value, score.value);
            AnalysisResult {
                baseline_score: commit.value,
                current_score: score.value,
                delta_percent: delta.delta_percent,
                improved: delta.improved,
                is_first_time: false,
            }
        };

        let mut warnings = Vec::new();
        let day = date_key(captured_at);
        if let Err(err) = self
            .store
            .upsert_history_entry(&day, result.delta_percent, result.is_first_time)
            .await
        {
            log_warn!("pass {pass_id}: history entry for {day} dropped: {err:#}");
            warnings.push(AnalysisWarning::HistoryWriteFailed(format!("{err:#}")));
        }

        log_info!(
            "pass {pass_id} done in {}ms (detect: {}ms): score={:.2} baseline={:.2} delta={}% first={}",
            pass_start.elapsed().as_millis(),
            detect_ms,
            result.current_score,
            result.baseline_score,
            result.delta_percent,
            result.is_first_time
        );

        Ok(AnalysisReport {
            pass_id,
            result,
            warnings,
        })
    }
}
