use std::sync::Arc;
use bytes::Bytes;
use log::{debug, error};

use crate::app_config::ProviderSettings;
use crate::errors::ProviderError;
use crate::providers::bierdopje::dto::ResponseDocument;
use crate::providers::transport::{HttpTransport, ReqwestTransport};

/// How the client obtains its connection context when opened
#[derive(Debug, Clone)]
enum Connector {
    /// Build a fresh `reqwest` client from the settings
    Reqwest,
    /// Reuse a caller-supplied transport
    Shared(Arc<dyn HttpTransport>),
}

/// BierDopje API client
///
/// Holds one reusable connection context between `open` and `close`.
#[derive(Debug)]
pub struct ApiClient {
    /// Endpoint, key, timeout and User-Agent
    settings: ProviderSettings,
    /// Source of the connection context
    connector: Connector,
    /// Connection context, present while open
    session: Option<Arc<dyn HttpTransport>>,
}

impl ApiClient {
    /// Create a client that opens a `reqwest` connection pool
    pub fn new(settings: ProviderSettings) -> Self {
        Self {
            settings,
            connector: Connector::Reqwest,
            session: None,
        }
    }

    /// Create a client that opens onto an existing transport
    pub fn with_transport(settings: ProviderSettings, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            settings,
            connector: Connector::Shared(transport),
            session: None,
        }
    }

    /// Settings in use
    pub fn settings(&self) -> &ProviderSettings {
        &self.settings
    }

    /// Acquire the connection context; opening twice is a no-op
    pub fn open(&mut self) -> Result<(), ProviderError> {
        if self.session.is_some() {
            return Ok(());
        }

        let transport: Arc<dyn HttpTransport> = match &self.connector {
            Connector::Reqwest => Arc::new(ReqwestTransport::new(
                &self.settings.user_agent,
                self.settings.timeout(),
            )?),
            Connector::Shared(transport) => Arc::clone(transport),
        };
        self.session = Some(transport);
        debug!("Opened connection context for {}", self.settings.base_url);
        Ok(())
    }

    /// Release the connection context
    pub fn close(&mut self) {
        if self.session.take().is_some() {
            debug!("Closed connection context for {}", self.settings.base_url);
        }
    }

    /// Whether the connection context is held
    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    fn session(&self) -> Result<&Arc<dyn HttpTransport>, ProviderError> {
        self.session.as_ref().ok_or(ProviderError::NotInitialized)
    }

    /// Full URL of an API call
    pub fn url_for(&self, path_template: &str, params: &[(&str, String)]) -> String {
        format!("{}/{}", self.settings.api_root(), expand_path(path_template, params))
    }

    /// Make a GET request on `path_template` formatted with `params`
    ///
    /// # Arguments
    /// * `path_template` - API part of the URL, without the leading slash, with `{name}` placeholders
    /// * `params` - Values for the placeholders; they are percent-encoded
    ///
    /// # Returns
    /// * `Result<ResponseDocument, ProviderError>` - The parsed document, or an error when the
    ///   status is not 200, the body is not a document, or the document embeds an error message
    pub async fn get(&self, path_template: &str, params: &[(&str, String)]) -> Result<ResponseDocument, ProviderError> {
        let session = self.session()?;
        let path = expand_path(path_template, params);
        let url = format!("{}/{}", self.settings.api_root(), path);

        debug!("GET {}", path);
        let body = session.get(&url).await?.into_success_body()?;
        let document = ResponseDocument::parse(&body)?;

        if let Some(message) = document.error_message() {
            error!("BierDopje API error for {}: {}", path, message);
            return Err(ProviderError::ServiceError(message.to_string()));
        }

        Ok(document)
    }

    /// Download the raw bytes behind `url`
    pub async fn download_raw(&self, url: &str) -> Result<Bytes, ProviderError> {
        let session = self.session()?;
        debug!("Downloading {}", url);
        session.get(url).await?.into_success_body()
    }
}

/// Substitute `{name}` placeholders with percent-encoded values
pub fn expand_path(path_template: &str, params: &[(&str, String)]) -> String {
    params.iter().fold(path_template.to_string(), |path, (name, value)| {
        path.replace(&format!("{{{}}}", name), &urlencoding::encode(value))
    })
}
