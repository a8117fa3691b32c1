//! Request metadata and configuration types.

use http::{HeaderMap, HeaderName, HeaderValue, Method};

/// Metadata for an individual HTTP request.
///
/// Holds the method, the path relative to the session's base URL, extra
/// headers and query parameters. Query parameters keep their insertion order.
#[derive(Debug, Clone)]
pub struct RequestMetadata {
    /// The HTTP method (GET, POST, etc.).
    pub method: Method,

    /// The request path, relative to the base URL (for example `database/team`).
    pub path: String,

    /// Additional headers for this request.
    pub headers: HeaderMap,

    /// Query parameters for this request.
    pub query_params: Vec<(String, String)>,
}

impl RequestMetadata {
    /// Creates a new `RequestMetadata` with the given method and path.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HeaderMap::new(),
            query_params: Vec::new(),
        }
    }

    /// Adds a header to the request.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn with_header(
        mut self,
        name: impl AsRef<str>,
        value: impl AsRef<str>,
    ) -> Result<Self, crate::Error> {
        let name = HeaderName::try_from(name.as_ref())
            .map_err(|e| crate::Error::ConfigurationError(format!("Invalid header name: {}", e)))?;
        let value = HeaderValue::try_from(value.as_ref())
            .map_err(|e| crate::Error::ConfigurationError(format!("Invalid header value: {}", e)))?;
        self.headers.insert(name, value);
        Ok(self)
    }

    /// Adds a query parameter to the request.
    pub fn with_query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_params.push((key.into(), value.into()));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_params_keep_order() {
        let metadata = RequestMetadata::new(Method::GET, "database/players")
            .with_query_param("ids", "a,b")
            .with_query_param("extra", "1");

        assert_eq!(
            metadata.query_params,
            vec![
                ("ids".to_string(), "a,b".to_string()),
                ("extra".to_string(), "1".to_string())
            ]
        );
    }

    #[test]
    fn test_invalid_header_is_configuration_error() {
        let result = RequestMetadata::new(Method::GET, "api/getUser").with_header("bad header", "x");
        assert!(matches!(result, Err(crate::Error::ConfigurationError(_))));
    }
}
