//! Streaming client for the DataVex growth pipeline.
//!
//! The backend reports a long-running pipeline over a chunked SSE-style
//! response. This crate decodes that byte stream into typed events, projects
//! them onto an ordered stage board, and delivers the final output for
//! rendering or export.
//!
//! # Streaming usage
//!
//! ```no_run
//! use datavex_client::prelude::*;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), ClientError> {
//! let client = PipelineClient::new(ClientConfig::from_env())?;
//! let mut run = client.start("data observability").await?;
//!
//! while let Some(event) = run.next_event().await? {
//!     let session = run.session();
//!     println!("{:>3}% {}", session.progress_percent(), session.label());
//!     if event.is_terminal() {
//!         break;
//!     }
//! }
//!
//! let output = run.collect_output().await?;
//! println!("{}", output.blog.meta_title);
//! # Ok(())
//! # }
//! ```

/// Client entry point owning transport and catalogue.
pub mod client;
/// Client configuration and backend URLs.
pub mod config;
/// Incremental SSE-style stream decoder.
pub mod decoder;
/// Public error types used by the client API.
pub mod error;
/// Typed events decoded from the stream.
pub mod event;
/// JSON export of the final pipeline output.
pub mod export;
/// Tracing/observability initialization.
pub mod observability;
/// Typed model of the final pipeline output.
pub mod output;
/// Common imports for typical usage.
pub mod prelude;
/// Streaming run handle and the decoded event stream.
pub mod run;
/// Per-run session state: stage board, label, outcome.
pub mod session;
/// Stage identifiers and the ordered stage catalogue.
pub mod stage;
/// Transport boundary trait and the HTTP implementation.
pub mod transport;

pub use client::PipelineClient;
pub use config::ClientConfig;
pub use decoder::EventDecoder;
pub use error::{ClientError, ExportError};
pub use event::PipelineEvent;
pub use export::export_output;
pub use observability::init_observability;
pub use output::PipelineOutput;
pub use run::PipelineRun;
pub use session::{COMPLETION_LABEL, RunOutcome, RunSession, STARTING_LABEL};
pub use stage::{StageCatalog, StageDescriptor, StageId, StageState};
pub use transport::{ByteStream, HttpTransport, PipelineTransport};
