use tracing::debug;

use crate::event::PipelineEvent;
use crate::output::PipelineOutput;
use crate::stage::{StageCatalog, StageId, StageState};

/// Label shown before the first progress event arrives.
pub const STARTING_LABEL: &str = "Starting pipeline...";
/// Label shown once the terminal `result` event has been applied.
pub const COMPLETION_LABEL: &str = "Pipeline complete!";

/// Terminal outcome of one run.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum RunOutcome {
    /// No terminal event has arrived yet.
    #[default]
    Pending,
    /// The pipeline finished and delivered its output.
    Succeeded(PipelineOutput),
    /// The pipeline reported a terminal failure.
    Failed(String),
}

/// Per-run projection of the event sequence: the ordered stage board, the
/// current activity label, and the terminal outcome.
///
/// Owned by a single driving loop; observers take cloned snapshots. A new
/// invocation replaces the session wholesale via [`RunSession::reset`].
#[derive(Clone, Debug, PartialEq)]
pub struct RunSession {
    catalog: StageCatalog,
    stages: Vec<StageState>,
    label: String,
    outcome: RunOutcome,
}

impl RunSession {
    /// Creates a fresh session for one pipeline invocation.
    pub fn new(catalog: StageCatalog) -> Self {
        let stages = catalog.stages().iter().map(StageState::fresh).collect();
        Self {
            catalog,
            stages,
            label: STARTING_LABEL.to_string(),
            outcome: RunOutcome::Pending,
        }
    }

    /// Returns the session to fresh-run state: all flags cleared, starting
    /// label restored, outcome pending.
    pub fn reset(&mut self) {
        self.stages = self.catalog.stages().iter().map(StageState::fresh).collect();
        self.label = STARTING_LABEL.to_string();
        self.outcome = RunOutcome::Pending;
    }

    /// Applies one decoded event to the session.
    pub fn apply(&mut self, event: &PipelineEvent) {
        match event {
            PipelineEvent::Progress { stage, label, .. } => self.on_progress(stage, label),
            PipelineEvent::Result { output } => self.on_result(output.clone()),
            PipelineEvent::Error { message } => self.on_error(message.clone()),
        }
    }

    /// Advances the stage board to `stage`.
    ///
    /// Stages before it become completed, stages after it are cleared, and
    /// the activity label takes the event's value. A stage id missing from
    /// the catalogue updates the label only. Ignored once the run has
    /// reached a terminal outcome.
    pub fn on_progress(&mut self, stage: &StageId, label: &str) {
        if self.is_finished() {
            debug!(stage = %stage, "ignoring progress after terminal event");
            return;
        }
        if let Some(index) = self.catalog.position(stage) {
            for (i, entry) in self.stages.iter_mut().enumerate() {
                entry.completed = i < index;
                entry.active = i == index;
            }
        } else {
            debug!(stage = %stage, "progress for stage not in catalogue");
        }
        self.label = label.to_string();
    }

    /// Marks the run as succeeded: every stage completed, completion label,
    /// outcome carrying the final output.
    pub fn on_result(&mut self, output: PipelineOutput) {
        if self.is_finished() {
            debug!("ignoring result after terminal event");
            return;
        }
        for entry in &mut self.stages {
            entry.completed = true;
            entry.active = false;
        }
        self.label = COMPLETION_LABEL.to_string();
        self.outcome = RunOutcome::Succeeded(output);
    }

    /// Marks the run as failed, leaving the stage board as last observed.
    pub fn on_error(&mut self, message: String) {
        if self.is_finished() {
            debug!("ignoring error after terminal event");
            return;
        }
        self.label.clear();
        self.outcome = RunOutcome::Failed(message);
    }

    /// Completion percentage derived from the stage board.
    ///
    /// A successful terminal event is authoritative and always reports 100,
    /// even when the last catalogue stage was never reported by a progress
    /// event.
    pub fn progress_percent(&self) -> u8 {
        if matches!(self.outcome, RunOutcome::Succeeded(_)) {
            return 100;
        }
        if self.stages.is_empty() {
            return 0;
        }
        let completed = self.stages.iter().filter(|s| s.completed).count();
        let percent = 100.0 * completed as f64 / self.stages.len() as f64;
        percent.round() as u8
    }

    /// The ordered stage board for rendering.
    pub fn stages(&self) -> &[StageState] {
        &self.stages
    }

    /// The current activity label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The terminal outcome so far.
    pub fn outcome(&self) -> &RunOutcome {
        &self.outcome
    }

    /// Returns `true` once a terminal event has been applied.
    pub fn is_finished(&self) -> bool {
        !matches!(self.outcome, RunOutcome::Pending)
    }

    /// Consumes the session, returning the terminal outcome.
    pub fn into_outcome(self) -> RunOutcome {
        self.outcome
    }
}
