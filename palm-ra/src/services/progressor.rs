//! Staged analysis progressor
//!
//! Drives one record through the checkpoints
//! `0 → 25 → 50 → 75 → 100 → completed`, sleeping a fixed dwell delay before
//! each checkpoint and persisting every step on its own so pollers see
//! intermediate progress. Once at 100 the reading is generated from the
//! stored fingerprint and written together with `status = completed`.
//!
//! Any failure along the way (store error, vanished record, panic) moves the
//! record straight to `error` with progress 0. There is no retry and no
//! cancellation.

use futures::FutureExt;
use palm_common::{generate, AnalysisRecord, AnalysisStatus, AnalysisUpdate, Error};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::store::SharedStore;

/// One progress checkpoint and the dwell delay that precedes it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stage {
    pub progress: u8,
    pub delay: Duration,
}

/// Nominal checkpoints: (progress, dwell delay in ms)
pub const DEFAULT_STAGES: [(u8, u64); 4] = [(25, 1000), (50, 1500), (75, 2000), (100, 1000)];

/// Ordered checkpoint table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageSchedule {
    stages: Vec<Stage>,
}

impl Default for StageSchedule {
    fn default() -> Self {
        Self::scaled(1.0)
    }
}

impl StageSchedule {
    /// Nominal checkpoints with every delay multiplied by `factor`
    pub fn scaled(factor: f64) -> Self {
        let stages = DEFAULT_STAGES
            .iter()
            .map(|&(progress, millis)| Stage {
                progress,
                delay: palm_common::time::scaled_duration(millis, factor),
            })
            .collect();
        Self { stages }
    }

    /// Nominal checkpoints with no waiting
    pub fn immediate() -> Self {
        Self::scaled(0.0)
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Sum of all dwell delays
    pub fn total_delay(&self) -> Duration {
        self.stages.iter().map(|stage| stage.delay).sum()
    }
}

/// Launches and runs staged analyses against a record store
#[derive(Clone)]
pub struct AnalysisProgressor {
    store: SharedStore,
    schedule: Arc<StageSchedule>,
}

impl AnalysisProgressor {
    pub fn new(store: SharedStore, schedule: StageSchedule) -> Self {
        Self {
            store,
            schedule: Arc::new(schedule),
        }
    }

    pub fn schedule(&self) -> &StageSchedule {
        &self.schedule
    }

    /// Start the staged analysis on a detached task
    ///
    /// Returns immediately. The handle resolves to the terminal status but
    /// callers are free to drop it; results are only observable through the
    /// store.
    pub fn spawn(&self, analysis_id: Uuid) -> JoinHandle<AnalysisStatus> {
        let progressor = self.clone();
        tokio::spawn(async move { progressor.run(analysis_id).await })
    }

    /// Run the staged analysis to a terminal status
    ///
    /// Never fails: errors and panics become `status = error` on the record.
    pub async fn run(&self, analysis_id: Uuid) -> AnalysisStatus {
        info!(analysis_id = %analysis_id, "Palm analysis started");

        let outcome = AssertUnwindSafe(self.run_stages(analysis_id))
            .catch_unwind()
            .await;

        let failure = match outcome {
            Ok(Ok(())) => {
                info!(analysis_id = %analysis_id, "Palm analysis completed");
                return AnalysisStatus::Completed;
            }
            Ok(Err(e)) => e.to_string(),
            Err(panic) => panic_message(panic.as_ref()),
        };

        error!(analysis_id = %analysis_id, error = %failure, "Palm analysis failed");
        self.mark_failed(analysis_id).await;
        AnalysisStatus::Error
    }

    async fn run_stages(&self, analysis_id: Uuid) -> Result<(), Error> {
        let mut latest: Option<AnalysisRecord> = None;

        for stage in self.schedule.stages() {
            tokio::time::sleep(stage.delay).await;
            let record = self
                .store
                .update(analysis_id, AnalysisUpdate::progress(stage.progress))
                .await?
                .ok_or_else(|| missing(analysis_id))?;
            debug!(analysis_id = %analysis_id, progress = record.progress, "Checkpoint reached");
            latest = Some(record);
        }

        let record = match latest {
            Some(record) => record,
            None => self
                .store
                .get(analysis_id)
                .await?
                .ok_or_else(|| missing(analysis_id))?,
        };

        let reading = generate(&record.content_fingerprint);

        self.store
            .update(analysis_id, AnalysisUpdate::completed(reading))
            .await?
            .ok_or_else(|| missing(analysis_id))?;

        Ok(())
    }

    async fn mark_failed(&self, analysis_id: Uuid) {
        match self.store.update(analysis_id, AnalysisUpdate::failed()).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                error!(analysis_id = %analysis_id, "Cannot record failure: analysis no longer exists");
            }
            Err(e) => {
                error!(analysis_id = %analysis_id, error = %e, "Cannot record failure");
            }
        }
    }
}

fn missing(analysis_id: Uuid) -> Error {
    Error::NotFound(format!("Analysis {} disappeared during processing", analysis_id))
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        format!("panic: {}", message)
    } else if let Some(message) = panic.downcast_ref::<String>() {
        format!("panic: {}", message)
    } else {
        "panic: <non-string payload>".to_string()
    }
}
