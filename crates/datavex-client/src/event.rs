use crate::output::PipelineOutput;
use crate::stage::StageId;

/// One fully-parsed event from the pipeline stream.
///
/// Exactly one variant is emitted per decoded record; unrecognized record
/// types never surface here.
#[derive(Clone, Debug, PartialEq)]
pub enum PipelineEvent {
    /// The backend entered a new pipeline stage.
    Progress {
        /// Stage id, matched against the catalogue by identity.
        stage: StageId,
        /// Human-readable activity label for the stage board.
        label: String,
        /// Backend graph node that reported the stage.
        node: String,
    },
    /// Terminal success event carrying the assembled pipeline output.
    Result {
        /// Final typed output, delivered unchanged to the caller.
        output: PipelineOutput,
    },
    /// Terminal failure reported by the pipeline itself.
    Error {
        /// Failure message, surfaced verbatim.
        message: String,
    },
}

impl PipelineEvent {
    /// Returns `true` for the two terminal variants.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Result { .. } | Self::Error { .. })
    }

    /// Short variant name used in log lines.
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Self::Progress { .. } => "progress",
            Self::Result { .. } => "result",
            Self::Error { .. } => "error",
        }
    }
}
