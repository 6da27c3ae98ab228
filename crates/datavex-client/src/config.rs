use std::time::Duration;

const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Configuration for the pipeline client.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Base URL of the pipeline backend.
    pub base_url: String,
    /// Timeout for establishing the HTTP connection.
    pub connect_timeout: Duration,
    /// Optional whole-request timeout.
    ///
    /// Defaults to none: pipeline runs are long-lived and the stream has no
    /// internal deadline of its own.
    pub request_timeout: Option<Duration>,
}

impl ClientConfig {
    /// Creates a config with defaults.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: None,
        }
    }

    /// Builds a config from the environment, falling back to defaults.
    ///
    /// `DATAVEX_BASE_URL` overrides the backend base URL.
    pub fn from_env() -> Self {
        let mut config = Self::new();
        if let Ok(base_url) = std::env::var("DATAVEX_BASE_URL")
            && !base_url.trim().is_empty()
        {
            config.base_url = base_url.trim().to_string();
        }
        config
    }

    /// Overrides the backend base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Overrides the connect timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets a whole-request timeout.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub(crate) fn stream_url(&self) -> String {
        format!("{}/run-pipeline", self.base_url.trim_end_matches('/'))
    }

    pub(crate) fn sync_url(&self) -> String {
        format!("{}/run-pipeline-sync", self.base_url.trim_end_matches('/'))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_points_at_local_backend() {
        let config = ClientConfig::new();
        assert_eq!(config.stream_url(), "http://localhost:8000/run-pipeline");
        assert_eq!(config.sync_url(), "http://localhost:8000/run-pipeline-sync");
        assert_eq!(config.request_timeout, None);
    }

    #[test]
    fn base_url_override_strips_trailing_slash_in_urls() {
        let config = ClientConfig::new().base_url("https://pipeline.example.com/");
        assert_eq!(
            config.stream_url(),
            "https://pipeline.example.com/run-pipeline"
        );
    }

    #[test]
    fn builder_setters_apply() {
        let config = ClientConfig::new()
            .connect_timeout(Duration::from_secs(3))
            .request_timeout(Duration::from_secs(600));
        assert_eq!(config.connect_timeout, Duration::from_secs(3));
        assert_eq!(config.request_timeout, Some(Duration::from_secs(600)));
    }
}
