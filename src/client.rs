//! Run operation: one `POST` to the AEP endpoint.

use std::future::Future;
use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::analysis::AnalysisResult;
use crate::config::ServerConfig;

/// Why a run produced no result.
///
/// Both kinds end the run; the view shows the `Display` text either way.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RunError {
    /// The service answered with a non-success status. The body is not read.
    #[error("Error: {status_text}")]
    Rejected {
        /// Numeric HTTP status.
        status: u16,
        /// Reason phrase for the status, or the numeric code if it has none.
        status_text: String,
    },
    /// Network failure or a body that could not be decoded.
    #[error("{0}")]
    Transport(String),
}

impl RunError {
    /// Builds a rejection from a response status.
    pub fn rejected(status: StatusCode) -> Self {
        let status_text = status
            .canonical_reason()
            .map_or_else(|| status.as_u16().to_string(), str::to_string);
        Self::Rejected {
            status: status.as_u16(),
            status_text,
        }
    }
}

impl From<reqwest::Error> for RunError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for RunError {
    fn from(err: serde_json::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

/// Anything that can perform a remote AEP run.
///
/// The run takes no parameters: the backend executes its fixed demo
/// configuration.
pub trait AepBackend: Send + Sync + 'static {
    /// Performs one run and resolves with its outcome.
    fn run_aep(&self) -> impl Future<Output = Result<AnalysisResult, RunError>> + Send;
}

/// HTTP backend issuing `POST {base_url}{endpoint}` with no body.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    http_client: reqwest::Client,
    url: String,
}

impl HttpBackend {
    /// Creates a backend for the given server settings.
    ///
    /// No request timeout is applied unless `timeout_secs` is set.
    ///
    /// # Errors
    ///
    /// Returns a `reqwest::Error` if the HTTP client cannot be initialised.
    pub fn new(server: &ServerConfig) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = server.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        Ok(Self {
            http_client: builder.build()?,
            url: server.run_url(),
        })
    }

    /// Full URL the run is posted to.
    pub fn url(&self) -> &str {
        &self.url
    }

    async fn post_run(&self) -> Result<AnalysisResult, RunError> {
        info!(url = %self.url, "requesting AEP run");
        let response = self.http_client.post(&self.url).send().await?;

        let status = response.status();
        debug!(status = status.as_u16(), "AEP run responded");
        if !status.is_success() {
            let err = RunError::rejected(status);
            warn!(status = status.as_u16(), "AEP run rejected");
            return Err(err);
        }

        let body = response.text().await?;
        let result = AnalysisResult::from_json_str(&body)?;
        info!(iterations = result.iteration_count(), "AEP run completed");
        Ok(result)
    }
}

impl AepBackend for HttpBackend {
    fn run_aep(&self) -> impl Future<Output = Result<AnalysisResult, RunError>> + Send {
        async move {
            let outcome = self.post_run().await;
            if let Err(ref e) = outcome {
                warn!(error = %e, "AEP run failed");
            }
            outcome
        }
    }
}
