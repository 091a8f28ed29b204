//! Background services for palm-ra

pub mod progressor;

pub use progressor::{AnalysisProgressor, Stage, StageSchedule};
