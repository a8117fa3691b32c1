//! Error types for Blaseball API calls.
//!
//! Every failure in the crate surfaces as an [`Error`]. Transport problems,
//! failure statuses, undecodable bodies and payloads missing entity fields each
//! get their own variant so callers can tell them apart without string matching.

use http::{Method, StatusCode};
use url::Url;

/// The main error type for Blaseball API calls.
///
/// # Examples
///
/// ```no_run
/// use blaseball::{Blaseball, Error};
///
/// # async fn example() -> Result<(), Error> {
/// match Blaseball::login("foo", "bar").await {
///     Ok(client) => println!("Logged in: {:?}", client.user().await?.email),
///     Err(Error::Authentication { username, source }) => {
///         eprintln!("Login for {} failed: {}", username, source);
///     }
///     Err(e) => eprintln!("Other error: {}", e),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A network-level error occurred (connection refused, DNS lookup failed, etc.).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The request took longer than the configured timeout.
    #[error("Request timed out")]
    Timeout,

    /// The server answered with a failure status.
    ///
    /// When this reaches a caller, every retry attempt for the request has
    /// already been spent.
    #[error("HTTP error {status} for {method} {url}: {raw_response}")]
    HttpError {
        /// The request method
        method: Method,
        /// The full request URL, including query parameters
        url: Url,
        /// The HTTP status code
        status: StatusCode,
        /// The raw response body
        raw_response: String,
    },

    /// Logging in failed after all retry attempts.
    ///
    /// No client is constructed when this is returned.
    #[error("Authentication failed for user {username}: {source}")]
    Authentication {
        /// The user name that was rejected
        username: String,
        /// The final error from the login endpoint
        source: Box<Error>,
    },

    /// The response body was not valid JSON of the expected shape.
    #[error("Failed to deserialize response (status {status}): {serde_error}")]
    DeserializationFailed {
        /// The raw response body that failed to deserialize
        raw_response: String,
        /// The serde error message
        serde_error: String,
        /// The HTTP status code
        status: StatusCode,
    },

    /// A decoded JSON mapping could not be turned into an entity.
    ///
    /// Raised when a required field is absent or has the wrong type.
    #[error("Failed to decode {entity}: {message}")]
    Decoding {
        /// The kind of entity being built (`"User"`, `"Team"`, `"Player"`)
        entity: &'static str,
        /// What was wrong with the payload
        message: String,
    },

    /// Invalid configuration was provided.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Failed to serialize the request body.
    #[error("Failed to serialize request: {0}")]
    SerializationFailed(String),

    /// An invalid URL was provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl Error {
    /// Returns `true` if this error is a transient failure worth retrying
    /// under conservative policies.
    ///
    /// Network errors, timeouts, 5xx and 429 responses qualify. Other 4xx
    /// responses and decoding failures do not.
    ///
    /// # Examples
    ///
    /// ```
    /// use blaseball::Error;
    /// use http::{Method, StatusCode};
    ///
    /// let err = Error::HttpError {
    ///     method: Method::GET,
    ///     url: "https://blaseball.com/api/getUser".parse().unwrap(),
    ///     status: StatusCode::BAD_GATEWAY,
    ///     raw_response: String::new(),
    /// };
    /// assert!(err.is_retryable());
    /// ```
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Network(_) => true,
            Error::Timeout => true,
            Error::HttpError { status, .. } => {
                status.is_server_error() || *status == StatusCode::TOO_MANY_REQUESTS
            }
            Error::Authentication { .. } => false,
            Error::DeserializationFailed { .. } => false,
            Error::Decoding { .. } => false,
            Error::ConfigurationError(_) => false,
            Error::SerializationFailed(_) => false,
            Error::InvalidUrl(_) => false,
        }
    }

    /// Returns the HTTP status code if this error has one.
    ///
    /// Authentication errors report the status of the underlying login failure.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::HttpError { status, .. } => Some(*status),
            Error::DeserializationFailed { status, .. } => Some(*status),
            Error::Authentication { source, .. } => source.status(),
            _ => None,
        }
    }

    /// Returns the raw response body if this error has one.
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            Error::HttpError { raw_response, .. } => Some(raw_response),
            Error::DeserializationFailed { raw_response, .. } => Some(raw_response),
            Error::Authentication { source, .. } => source.raw_response(),
            _ => None,
        }
    }
}

/// A specialized `Result` type for Blaseball API calls.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    fn http_error(status: StatusCode) -> Error {
        Error::HttpError {
            method: Method::POST,
            url: Url::parse("https://blaseball.com/auth/local").unwrap(),
            status,
            raw_response: "nope".to_string(),
        }
    }

    #[test]
    fn test_http_error_display_names_method_and_url() {
        let message = http_error(StatusCode::UNAUTHORIZED).to_string();
        assert!(message.contains("401"));
        assert!(message.contains("POST"));
        assert!(message.contains("https://blaseball.com/auth/local"));
    }

    #[test]
    fn test_is_retryable() {
        assert!(http_error(StatusCode::INTERNAL_SERVER_ERROR).is_retryable());
        assert!(http_error(StatusCode::TOO_MANY_REQUESTS).is_retryable());
        assert!(!http_error(StatusCode::NOT_FOUND).is_retryable());
        assert!(Error::Timeout.is_retryable());

        let decoding = Error::Decoding {
            entity: "User",
            message: "missing field `email`".to_string(),
        };
        assert!(!decoding.is_retryable());
    }

    #[test]
    fn test_authentication_exposes_inner_status() {
        let err = Error::Authentication {
            username: "foo".to_string(),
            source: Box::new(http_error(StatusCode::FORBIDDEN)),
        };

        assert_eq!(err.status(), Some(StatusCode::FORBIDDEN));
        assert_eq!(err.raw_response(), Some("nope"));
        assert!(err.to_string().starts_with("Authentication failed for user foo"));
    }
}
