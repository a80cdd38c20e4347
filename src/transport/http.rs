use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

use super::DataApiTransport;
use crate::config::{ENV_ENDPOINT, RdsDataOptions};
use crate::error::RdsDataError;
use crate::wire::{
    BeginTransactionRequest, BeginTransactionResponse, EndTransactionRequest,
    EndTransactionResponse, ExecuteStatementRequest, ExecuteStatementResponse,
};

const EXECUTE_PATH: &str = "Execute";
const BEGIN_PATH: &str = "BeginTransaction";
const COMMIT_PATH: &str = "CommitTransaction";
const ROLLBACK_PATH: &str = "RollbackTransaction";

/// Header carrying the endpoint's exception name on a failed call.
const ERROR_TYPE_HEADER: &str = "x-amzn-ErrorType";

/// JSON-over-HTTP transport for Data API compatible endpoints.
///
/// Requests are not signed, so the endpoint must accept unsigned calls: a local
/// Data API emulator, or a proxy that signs on the caller's behalf. Add any static
/// headers the endpoint needs with [`header`](HttpTransport::header). Reaching the
/// AWS service directly takes a signing [`DataApiTransport`] of your own.
///
/// The underlying `reqwest::Client` is created on first use and shared by every
/// later call, including calls from clones of the owning client.
#[derive(Debug)]
pub struct HttpTransport {
    endpoint: String,
    headers: Vec<(String, String)>,
    timeout: Option<Duration>,
    http_client: OnceCell<reqwest::Client>,
}

impl HttpTransport {
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        let endpoint = endpoint.into().trim_end_matches('/').to_owned();
        Self {
            endpoint,
            headers: Vec::new(),
            timeout: None,
            http_client: OnceCell::new(),
        }
    }

    /// Build a transport for the endpoint configured in `options`
    ///
    /// # Arguments
    ///
    /// * `options` - Target settings; `endpoint` must be set
    ///
    /// # Returns
    ///
    /// A transport posting to `options.endpoint`
    ///
    /// # Errors
    /// Returns `RdsDataError::ConfigError` if no endpoint is configured.
    pub fn from_options(options: &RdsDataOptions) -> Result<Self, RdsDataError> {
        match options.endpoint.as_deref().map(str::trim) {
            Some(endpoint) if !endpoint.is_empty() => Ok(Self::new(endpoint)),
            _ => Err(RdsDataError::ConfigError(format!(
                "endpoint is required for the HTTP transport (set {ENV_ENDPOINT})"
            ))),
        }
    }

    /// Add a header sent with every request.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Per-request timeout enforced by the HTTP client.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn http_client(&self) -> Result<&reqwest::Client, RdsDataError> {
        self.http_client
            .get_or_try_init(|| async {
                let mut builder = reqwest::Client::builder();
                if let Some(timeout) = self.timeout {
                    builder = builder.timeout(timeout);
                }
                builder.build().map_err(RdsDataError::from)
            })
            .await
    }

    async fn post<Req, Resp>(&self, path: &str, body: &Req) -> Result<Resp, RdsDataError>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned,
    {
        let url = format!("{}/{path}", self.endpoint);
        let mut request = self.http_client().await?.post(&url).json(body);
        for (name, value) in &self.headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let started = Instant::now();
        let response = request.send().await?;
        let status = response.status();
        debug!(
            %url,
            status = status.as_u16(),
            duration_ms = started.elapsed().as_millis(),
            "data api response received"
        );

        let header_type = response
            .headers()
            .get(ERROR_TYPE_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let bytes = response.bytes().await?;
        if status.is_success() {
            return Ok(serde_json::from_slice(&bytes)?);
        }

        let body = String::from_utf8_lossy(&bytes).into_owned();
        let parsed = serde_json::from_str::<serde_json::Value>(&body).ok();
        let error_type = header_type
            .as_deref()
            .map(exception_name)
            .or_else(|| parsed.as_ref().and_then(body_error_type));
        let message = parsed
            .as_ref()
            .and_then(body_message)
            .unwrap_or_else(|| body.clone());
        warn!(
            %url,
            status = status.as_u16(),
            error_type = error_type.as_deref(),
            %message,
            "data api request failed"
        );
        Err(RdsDataError::Remote {
            status: status.as_u16(),
            error_type,
            message,
            body,
        })
    }
}

/// `BadRequestException:http://...` and `aws#BadRequestException` both name `BadRequestException`.
fn exception_name(raw: &str) -> String {
    let name = raw.split(':').next().unwrap_or(raw);
    name.rsplit('#').next().unwrap_or(name).trim().to_owned()
}

fn body_error_type(json: &serde_json::Value) -> Option<String> {
    json.get("__type")
        .or_else(|| json.get("code"))
        .and_then(serde_json::Value::as_str)
        .map(exception_name)
}

fn body_message(json: &serde_json::Value) -> Option<String> {
    json.get("message")
        .or_else(|| json.get("Message"))
        .and_then(serde_json::Value::as_str)
        .map(str::to_owned)
}

#[async_trait]
impl DataApiTransport for HttpTransport {
    async fn execute_statement(
        &self,
        request: ExecuteStatementRequest,
    ) -> Result<ExecuteStatementResponse, RdsDataError> {
        self.post(EXECUTE_PATH, &request).await
    }

    async fn begin_transaction(
        &self,
        request: BeginTransactionRequest,
    ) -> Result<BeginTransactionResponse, RdsDataError> {
        self.post(BEGIN_PATH, &request).await
    }

    async fn commit_transaction(
        &self,
        request: EndTransactionRequest,
    ) -> Result<EndTransactionResponse, RdsDataError> {
        self.post(COMMIT_PATH, &request).await
    }

    async fn rollback_transaction(
        &self,
        request: EndTransactionRequest,
    ) -> Result<EndTransactionResponse, RdsDataError> {
        self.post(ROLLBACK_PATH, &request).await
    }
}
