use std::pin::Pin;

use futures::TryStreamExt as _;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::output::PipelineOutput;

/// Raw byte stream delivered by a transport, in arrival order.
pub type ByteStream =
    Pin<Box<dyn futures::Stream<Item = Result<bytes::Bytes, ClientError>> + Send + 'static>>;

/// Transport boundary for starting pipeline runs.
///
/// `HttpTransport` is the production implementation; tests substitute fakes
/// that replay canned byte streams.
#[async_trait::async_trait]
pub trait PipelineTransport: Send + Sync {
    /// Opens the streaming endpoint for `keyword` and returns the response
    /// body as a byte stream.
    async fn open_stream(&self, keyword: &str) -> Result<ByteStream, ClientError>;

    /// Runs the one-shot endpoint for `keyword` and returns the final output.
    async fn fetch_sync(&self, keyword: &str) -> Result<PipelineOutput, ClientError>;
}

#[derive(serde::Serialize)]
struct PipelineRequest<'a> {
    keyword: &'a str,
}

#[derive(serde::Deserialize)]
struct BackendErrorBody {
    error: Option<String>,
}

/// HTTP transport for the pipeline backend.
pub struct HttpTransport {
    client: reqwest::Client,
    config: ClientConfig,
}

impl HttpTransport {
    /// Creates a transport from explicit configuration.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let mut builder = reqwest::Client::builder().connect_timeout(config.connect_timeout);
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ClientError::config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, config })
    }
}

#[async_trait::async_trait]
impl PipelineTransport for HttpTransport {
    async fn open_stream(&self, keyword: &str) -> Result<ByteStream, ClientError> {
        debug!(keyword = %keyword, url = %self.config.stream_url(), "opening pipeline event stream");
        let response = self
            .client
            .post(self.config.stream_url())
            .header(reqwest::header::ACCEPT, "text/event-stream")
            .json(&PipelineRequest { keyword })
            .send()
            .await
            .map_err(|e| ClientError::transport(format!("stream request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ClientError::backend(status.as_u16(), body));
        }

        let stream = response
            .bytes_stream()
            .map_err(|e| ClientError::transport(format!("stream read failed: {e}")));
        Ok(Box::pin(stream))
    }

    async fn fetch_sync(&self, keyword: &str) -> Result<PipelineOutput, ClientError> {
        debug!(keyword = %keyword, url = %self.config.sync_url(), "running pipeline synchronously");
        let response = self
            .client
            .post(self.config.sync_url())
            .json(&PipelineRequest { keyword })
            .send()
            .await
            .map_err(|e| ClientError::transport(format!("sync request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let message = match response.json::<BackendErrorBody>().await {
                Ok(BackendErrorBody {
                    error: Some(message),
                }) => message,
                _ => format!("HTTP {}", status.as_u16()),
            };
            return Err(ClientError::backend(status.as_u16(), message));
        }

        response
            .json::<PipelineOutput>()
            .await
            .map_err(|e| ClientError::protocol(format!("invalid sync response body: {e}")))
    }
}
