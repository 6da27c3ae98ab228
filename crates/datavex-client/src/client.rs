use std::sync::Arc;

use tracing::info;

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::output::PipelineOutput;
use crate::run::PipelineRun;
use crate::session::RunSession;
use crate::stage::StageCatalog;
use crate::transport::{HttpTransport, PipelineTransport};

/// Entry point for starting pipeline runs against one backend.
///
/// The client owns the transport and the stage catalogue; each call to
/// [`PipelineClient::start`] produces an independent [`PipelineRun`] with its
/// own decoder and session state.
#[derive(Clone)]
pub struct PipelineClient {
    transport: Arc<dyn PipelineTransport>,
    catalog: StageCatalog,
}

impl PipelineClient {
    /// Creates a client over HTTP with the v1 stage catalogue.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let transport = HttpTransport::new(config)?;
        Ok(Self::with_transport(
            Arc::new(transport),
            StageCatalog::datavex_v1(),
        ))
    }

    /// Creates a client from an explicit transport and catalogue.
    ///
    /// This is the seam for alternate pipeline versions and for tests that
    /// replay canned streams.
    pub fn with_transport(transport: Arc<dyn PipelineTransport>, catalog: StageCatalog) -> Self {
        Self { transport, catalog }
    }

    /// Starts a streaming run for `keyword`.
    pub async fn start(&self, keyword: &str) -> Result<PipelineRun, ClientError> {
        let keyword = validate_keyword(keyword)?;
        let bytes = self.transport.open_stream(keyword).await?;
        let session = RunSession::new(self.catalog.clone());
        let run = PipelineRun::new(bytes, session);
        info!(keyword = %keyword, run_id = %run.run_id(), "pipeline run started");
        Ok(run)
    }

    /// Runs the one-shot (non-streaming) variant for `keyword`.
    pub async fn run_sync(&self, keyword: &str) -> Result<PipelineOutput, ClientError> {
        let keyword = validate_keyword(keyword)?;
        info!(keyword = %keyword, "running pipeline synchronously");
        self.transport.fetch_sync(keyword).await
    }
}

fn validate_keyword(keyword: &str) -> Result<&str, ClientError> {
    let keyword = keyword.trim();
    if keyword.is_empty() {
        return Err(ClientError::validation("keyword must not be empty"));
    }
    Ok(keyword)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::fixtures::sample_output;
    use crate::transport::ByteStream;
    use futures::stream;

    struct FakeTransport {
        chunks: Vec<Result<bytes::Bytes, ClientError>>,
        sync_result: Result<PipelineOutput, ClientError>,
    }

    #[async_trait::async_trait]
    impl PipelineTransport for FakeTransport {
        async fn open_stream(&self, _keyword: &str) -> Result<ByteStream, ClientError> {
            Ok(Box::pin(stream::iter(self.chunks.clone())))
        }

        async fn fetch_sync(&self, _keyword: &str) -> Result<PipelineOutput, ClientError> {
            self.sync_result.clone()
        }
    }

    fn client_with_chunks(chunks: Vec<Result<bytes::Bytes, ClientError>>) -> PipelineClient {
        PipelineClient::with_transport(
            Arc::new(FakeTransport {
                chunks,
                sync_result: Ok(sample_output()),
            }),
            StageCatalog::datavex_v1(),
        )
    }

    #[tokio::test]
    async fn start_rejects_blank_keyword() {
        let client = client_with_chunks(Vec::new());
        let err = match client.start("   ").await {
            Ok(_) => panic!("blank keyword should fail"),
            Err(err) => err,
        };
        assert!(matches!(err, ClientError::Validation(_)));
    }

    #[tokio::test]
    async fn run_sync_rejects_blank_keyword() {
        let client = client_with_chunks(Vec::new());
        let err = client.run_sync("").await.expect_err("should reject");
        assert!(matches!(err, ClientError::Validation(_)));
    }

    #[tokio::test]
    async fn run_sync_returns_transport_output() {
        let client = client_with_chunks(Vec::new());
        let output = client.run_sync("data observability").await.expect("output");
        assert_eq!(output, sample_output());
    }

    #[tokio::test]
    async fn backend_status_error_bypasses_the_decoder() {
        let client = PipelineClient::with_transport(
            Arc::new(BackendDown),
            StageCatalog::datavex_v1(),
        );
        let err = match client.start("kw").await {
            Ok(_) => panic!("backend failure should fail the start"),
            Err(err) => err,
        };
        assert!(matches!(err, ClientError::Backend { status: 503, .. }));
    }

    struct BackendDown;

    #[async_trait::async_trait]
    impl PipelineTransport for BackendDown {
        async fn open_stream(&self, _keyword: &str) -> Result<ByteStream, ClientError> {
            Err(ClientError::backend(503, "service unavailable"))
        }

        async fn fetch_sync(&self, _keyword: &str) -> Result<PipelineOutput, ClientError> {
            Err(ClientError::backend(503, "service unavailable"))
        }
    }
}
