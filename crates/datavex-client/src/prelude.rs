//! Common imports for typical client usage.
//!
//! This module intentionally exports the most frequently used run/session
//! types so front ends and examples need fewer import lines.
pub use crate::{
    ClientConfig, ClientError, PipelineClient, PipelineEvent, PipelineOutput, PipelineRun,
    RunOutcome, RunSession, StageCatalog, StageId, StageState,
};
