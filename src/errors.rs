/*!
 * Error types for the BierDopje subtitle provider.
 *
 * Every failure a provider call can produce is expressed as a `ProviderError`.
 * Callers that only need to know how to react can ask for its `ErrorClass`.
 */

use thiserror::Error;

/// How a caller is expected to react to a failed provider call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Transient unavailability: try another provider or try later
    Unavailable,
    /// The remote service broke its contract or reported an error
    Provider,
    /// The downloaded content is not a usable subtitle; try another candidate
    InvalidContent,
    /// The caller misused the API; not retryable
    Contract,
}

/// Errors that can occur when talking to the subtitle service
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The request did not complete within the configured timeout
    #[error("Provider not available: timeout after {0} seconds")]
    Timeout(u64),

    /// The service answered with HTTP 429
    #[error("Provider not available: rate limit exceeded ({0})")]
    RateLimitExceeded(String),

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The service answered with an unexpected HTTP status
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message
        message: String,
    },

    /// The service embedded an error message in an otherwise successful response
    #[error("Provider error: {0}")]
    ServiceError(String),

    /// The response document could not be understood
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// The downloaded payload was rejected by the subtitle validator
    #[error("Invalid subtitle: {0}")]
    InvalidSubtitle(String),

    /// A query was issued without a TVDB id or a series name
    #[error("Missing parameter: a TVDB id or a series name is required")]
    MissingShowIdentifier,

    /// The provider cannot search in the requested language
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    /// A request was issued before `initialize` or after `terminate`
    #[error("Provider is not initialized")]
    NotInitialized,
}

impl ProviderError {
    /// Classify the error for the caller
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::Timeout(_) | Self::RateLimitExceeded(_) | Self::ConnectionError(_) => {
                ErrorClass::Unavailable
            }
            Self::ApiError { .. } | Self::ServiceError(_) | Self::ParseError(_) => {
                ErrorClass::Provider
            }
            Self::InvalidSubtitle(_) => ErrorClass::InvalidContent,
            Self::MissingShowIdentifier | Self::UnsupportedLanguage(_) | Self::NotInitialized => {
                ErrorClass::Contract
            }
        }
    }

    /// Whether the provider is only temporarily unavailable
    pub fn is_unavailable(&self) -> bool {
        self.class() == ErrorClass::Unavailable
    }
}

impl From<quick_xml::DeError> for ProviderError {
    fn from(error: quick_xml::DeError) -> Self {
        Self::ParseError(error.to_string())
    }
}
