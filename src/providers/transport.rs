use std::time::Duration;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, header};
use log::error;
use std::fmt::Debug;

use crate::errors::ProviderError;

/// Raw HTTP response: status code and body
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body
    pub body: Bytes,
}

impl HttpResponse {
    /// Create a response
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Classify the status code and hand back the body of a 200 response
    ///
    /// 429 means the service is throttling us, which is transient. Any other
    /// non-200 status is a provider error.
    pub fn into_success_body(self) -> Result<Bytes, ProviderError> {
        match self.status {
            200 => Ok(self.body),
            429 => Err(ProviderError::RateLimitExceeded("Too Many Requests".to_string())),
            status_code => Err(ProviderError::ApiError {
                status_code,
                message: format!("Request failed with status code {}", status_code),
            }),
        }
    }
}

/// Issues GET requests on behalf of a provider
///
/// Implementations must bound every request by a timeout and report it as
/// `ProviderError::Timeout`.
#[async_trait]
pub trait HttpTransport: Send + Sync + Debug {
    /// GET `url` and return the raw response, whatever its status
    async fn get(&self, url: &str) -> Result<HttpResponse, ProviderError>;
}

/// `HttpTransport` backed by a pooled `reqwest::Client`
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    /// HTTP client for API requests
    client: Client,
    /// Timeout applied to every request
    timeout: Duration,
}

impl ReqwestTransport {
    /// Create a transport sending `user_agent` and bounded by `timeout`
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, ProviderError> {
        let mut headers = header::HeaderMap::new();
        let user_agent = header::HeaderValue::from_str(user_agent)
            .map_err(|e| ProviderError::ConnectionError(format!("Invalid User-Agent header: {}", e)))?;
        headers.insert(header::USER_AGENT, user_agent);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .map_err(|e| ProviderError::ConnectionError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, timeout })
    }

    fn map_error(&self, url: &str, e: reqwest::Error) -> ProviderError {
        if e.is_timeout() {
            ProviderError::Timeout(self.timeout.as_secs())
        } else {
            error!("Request to {} failed: {}", url, e);
            ProviderError::ConnectionError(e.to_string())
        }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse, ProviderError> {
        let response = self.client.get(url)
            .send()
            .await
            .map_err(|e| self.map_error(url, e))?;

        let status = response.status().as_u16();
        let body = response.bytes().await
            .map_err(|e| self.map_error(url, e))?;

        Ok(HttpResponse { status, body })
    }
}
