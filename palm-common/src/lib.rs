//! # Palm Common Library
//!
//! Shared code for the palm reading services including:
//! - Analysis record model and update merging
//! - Deterministic reading generator
//! - Configuration loading and root folder resolution
//! - Error types and timestamp helpers

pub mod config;
pub mod error;
pub mod models;
pub mod reading;
pub mod time;

pub use error::{Error, Result};
pub use models::{AnalysisRecord, AnalysisStatus, AnalysisUpdate, NewAnalysis};
pub use reading::{generate, Reading};
