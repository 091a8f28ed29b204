//! Analysis record model
//!
//! A record moves `processing → completed | error` and is frozen once it
//! leaves processing. Progress only rises while processing, and a stored
//! result is never replaced.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::reading::Reading;
use crate::{Error, Result};

/// Upper bound for `AnalysisRecord::progress`
pub const MAX_PROGRESS: u8 = 100;

/// Analysis lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisStatus {
    /// Staged work still running
    Processing,
    /// Reading generated and stored
    Completed,
    /// Staged work failed; terminal
    Error,
}

impl AnalysisStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisStatus::Processing => "processing",
            AnalysisStatus::Completed => "completed",
            AnalysisStatus::Error => "error",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, AnalysisStatus::Processing)
    }
}

impl fmt::Display for AnalysisStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnalysisStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "processing" => Ok(AnalysisStatus::Processing),
            "completed" => Ok(AnalysisStatus::Completed),
            "error" => Ok(AnalysisStatus::Error),
            other => Err(Error::InvalidInput(format!("Unknown analysis status: {}", other))),
        }
    }
}

/// Fields supplied when creating a record
#[derive(Debug, Clone)]
pub struct NewAnalysis {
    pub content_fingerprint: String,
}

impl NewAnalysis {
    pub fn new(content_fingerprint: impl Into<String>) -> Self {
        Self {
            content_fingerprint: content_fingerprint.into(),
        }
    }
}

/// Persisted analysis record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub id: Uuid,
    pub content_fingerprint: String,
    pub status: AnalysisStatus,
    pub progress: u8,
    pub result: Option<Reading>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial update merged into a record
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisUpdate {
    pub status: Option<AnalysisStatus>,
    pub progress: Option<u8>,
    pub result: Option<Reading>,
}

impl AnalysisUpdate {
    /// Progress checkpoint while still processing
    pub fn progress(progress: u8) -> Self {
        Self {
            progress: Some(progress),
            ..Default::default()
        }
    }

    /// Terminal success carrying the generated reading
    pub fn completed(result: Reading) -> Self {
        Self {
            status: Some(AnalysisStatus::Completed),
            progress: Some(MAX_PROGRESS),
            result: Some(result),
        }
    }

    /// Terminal failure; progress resets to zero
    pub fn failed() -> Self {
        Self {
            status: Some(AnalysisStatus::Error),
            progress: Some(0),
            result: None,
        }
    }
}

impl AnalysisRecord {
    /// Build a fresh record in `processing` at progress 0
    pub fn new(new: NewAnalysis) -> Self {
        let now = crate::time::now();
        Self {
            id: Uuid::new_v4(),
            content_fingerprint: new.content_fingerprint,
            status: AnalysisStatus::Processing,
            progress: 0,
            result: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Merge a partial update, refreshing `updated_at`
    ///
    /// The record is left untouched when the update is rejected.
    pub fn apply(&mut self, update: AnalysisUpdate) -> Result<()> {
        let status = update.status.unwrap_or(self.status);
        let progress = update.progress.unwrap_or(self.progress);

        if progress > MAX_PROGRESS {
            return Err(Error::InvalidTransition(format!(
                "progress {} exceeds {}",
                progress, MAX_PROGRESS
            )));
        }

        if self.status.is_terminal() && (status != self.status || progress != self.progress) {
            return Err(Error::InvalidTransition(format!(
                "analysis {} is {} and can no longer change",
                self.id, self.status
            )));
        }

        if status == AnalysisStatus::Processing && progress < self.progress {
            return Err(Error::InvalidTransition(format!(
                "progress cannot decrease from {} to {} while processing",
                self.progress, progress
            )));
        }

        if status == AnalysisStatus::Completed && progress != MAX_PROGRESS {
            return Err(Error::InvalidTransition(format!(
                "completed analysis must report progress {}, got {}",
                MAX_PROGRESS, progress
            )));
        }

        if self.result.is_some() && update.result.is_some() {
            return Err(Error::InvalidTransition(format!(
                "analysis {} already has a result",
                self.id
            )));
        }

        if status == AnalysisStatus::Completed && self.result.is_none() && update.result.is_none() {
            return Err(Error::InvalidTransition(format!(
                "analysis {} cannot complete without a result",
                self.id
            )));
        }

        self.status = status;
        self.progress = progress;
        if let Some(result) = update.result {
            self.result = Some(result);
        }
        self.updated_at = crate::time::now();
        Ok(())
    }
}
