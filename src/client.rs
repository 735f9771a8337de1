use std::future::Future;

use reqwest::{StatusCode, Url};
use serde::{Serialize, de::DeserializeOwned};
use tracing::instrument;

use crate::domain::{BusinessInput, HealthStatus, RegulationCatalog, ReportResponse};

const REPORT_PATH: &str = "api/report";
const HEALTH_PATH: &str = "api/health";
const REGULATIONS_PATH: &str = "api/regulations";

/// Anything that can turn a business description into a licensing report.
///
/// The form talks to the service only through this trait.
pub trait ReportService {
    /// Requests a report for the given input.
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`] if the request fails for any reason.
    fn fetch_report(
        &self,
        input: &BusinessInput,
    ) -> impl Future<Output = Result<ReportResponse, FetchError>> + Send;
}

/// Why a request to the licensing service failed.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The configured base URL cannot be used.
    #[error("invalid service URL '{url}': {reason}")]
    InvalidUrl {
        /// The offending URL.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The request could not be sent or the response could not be read.
    #[error("request to {url} failed")]
    Transport {
        /// The endpoint that was called.
        url: String,
        /// The underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The service answered with a non-success status.
    #[error("{url} returned {status}")]
    Status {
        /// The endpoint that was called.
        url: String,
        /// The status code received.
        status: StatusCode,
    },

    /// The response body was not the expected JSON.
    #[error("malformed response payload")]
    Decode(#[from] serde_json::Error),
}

/// Client for the licensing service's HTTP API.
#[derive(Debug, Clone)]
pub struct HttpClient {
    http: reqwest::Client,
    base_url: Url,
}

impl HttpClient {
    /// Creates a client for the service rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidUrl`] if `base_url` is not an absolute
    /// URL.
    pub fn new(base_url: &str) -> Result<Self, FetchError> {
        let mut url = Url::parse(base_url).map_err(|e| FetchError::InvalidUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        // Endpoint paths are joined relative to the base, so it has to read as
        // a directory.
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }

        Ok(Self {
            http: reqwest::Client::new(),
            base_url: url,
        })
    }

    /// The base URL all endpoints are resolved against.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Checks that the service is up.
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`] if the request fails.
    #[instrument(level = "debug", skip(self))]
    pub async fn health(&self) -> Result<HealthStatus, FetchError> {
        let url = self.endpoint(HEALTH_PATH)?;
        self.receive(self.http.get(url.clone()), &url).await
    }

    /// Fetches every regulation the service knows about.
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`] if the request fails.
    #[instrument(level = "debug", skip(self))]
    pub async fn regulations(&self) -> Result<RegulationCatalog, FetchError> {
        let url = self.endpoint(REGULATIONS_PATH)?;
        self.receive(self.http.get(url.clone()), &url).await
    }

    /// Submits a business description and returns the service's report.
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`] if the request fails.
    #[instrument(level = "debug", skip(self))]
    pub async fn report(&self, input: &BusinessInput) -> Result<ReportResponse, FetchError> {
        self.post(REPORT_PATH, input).await
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, FetchError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        self.receive(self.http.post(url.clone()).json(body), &url)
            .await
    }

    async fn receive<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        url: &Url,
    ) -> Result<T, FetchError> {
        let transport = |source| FetchError::Transport {
            url: url.to_string(),
            source,
        };

        let response = request.send().await.map_err(transport)?;
        let status = response.status();
        tracing::debug!(%url, %status, "licensing service responded");

        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        let body = response.bytes().await.map_err(transport)?;
        tracing::trace!(bytes = body.len(), "decoding response body");
        Ok(serde_json::from_slice(&body)?)
    }

    fn endpoint(&self, path: &str) -> Result<Url, FetchError> {
        self.base_url.join(path).map_err(|e| FetchError::InvalidUrl {
            url: format!("{}{path}", self.base_url),
            reason: e.to_string(),
        })
    }
}

impl ReportService for HttpClient {
    async fn fetch_report(&self, input: &BusinessInput) -> Result<ReportResponse, FetchError> {
        self.report(input).await
    }
}
