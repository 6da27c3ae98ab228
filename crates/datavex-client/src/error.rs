/// Errors surfaced by the client API.
///
/// Only transport-level and pipeline-reported failures reach callers; parse
/// anomalies inside the event stream are absorbed by the decoder and never
/// appear here.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    /// Invalid client configuration.
    #[error("config error: {0}")]
    Config(String),
    /// Invalid user input (for example an empty keyword).
    #[error("validation error: {0}")]
    Validation(String),
    /// Backend answered with a non-success HTTP status.
    #[error("backend error (status {status}): {message}")]
    Backend { status: u16, message: String },
    /// Network or stream I/O failed.
    #[error("transport error: {message}")]
    Transport { message: String },
    /// The pipeline itself reported a terminal failure via an `error` event.
    #[error("pipeline failed: {message}")]
    Pipeline { message: String },
    /// Response shape or event sequencing was invalid.
    #[error("protocol error: {0}")]
    Protocol(String),
}

impl ClientError {
    /// Creates a config-level error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a backend-status error.
    pub fn backend(status: u16, message: impl Into<String>) -> Self {
        Self::Backend {
            status,
            message: message.into(),
        }
    }

    /// Creates a transport-level error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Creates a pipeline-reported failure.
    pub fn pipeline(message: impl Into<String>) -> Self {
        Self::Pipeline {
            message: message.into(),
        }
    }

    /// Creates a protocol-level error.
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol(message.into())
    }
}

/// Errors returned by the JSON export helper.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// Writing the export file failed.
    #[error("export io error: {0}")]
    Io(#[from] std::io::Error),
    /// Serializing the pipeline output failed.
    #[error("export serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
