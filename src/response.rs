//! Response wrapper that keeps transport details next to the decoded data.
//!
//! Fetchers only hand back [`Response::data`], but the full [`Response`] is
//! available from [`Session::call`](crate::Session::call) for callers that
//! want to see how many attempts a request took or what the server sent.

use http::{HeaderMap, StatusCode};
use std::time::Duration;
use url::Url;

/// A successful HTTP response.
///
/// # Examples
///
/// ```no_run
/// use blaseball::{metadata::RequestMetadata, ClientBuilder};
/// use http::Method;
///
/// # async fn example() -> Result<(), blaseball::Error> {
/// let session = ClientBuilder::new().build()?;
/// let metadata = RequestMetadata::new(Method::GET, "database/allTeams");
/// let response = session.call::<(), serde_json::Value>(metadata, None).await?;
///
/// println!("{} answered {} after {} attempt(s)", response.url, response.status, response.attempts);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Response<T> {
    /// The deserialized response data.
    pub data: T,

    /// The raw response body as a string.
    pub raw_body: String,

    /// The URL the final attempt was sent to.
    pub url: Url,

    /// The HTTP status code of the response.
    pub status: StatusCode,

    /// The response headers.
    pub headers: HeaderMap,

    /// Time from the first attempt until the successful response, backoff sleeps included.
    pub latency: Duration,

    /// The number of attempts made to complete this request.
    ///
    /// `1` for requests that succeeded on the first try.
    pub attempts: usize,
}

impl<T> Response<T> {
    /// Creates a new `Response`.
    pub fn new(
        data: T,
        raw_body: String,
        url: Url,
        status: StatusCode,
        headers: HeaderMap,
        latency: Duration,
        attempts: usize,
    ) -> Self {
        Self {
            data,
            raw_body,
            url,
            status,
            headers,
            latency,
            attempts,
        }
    }

    /// Maps the response data to a different type, keeping the metadata.
    pub fn map<U, F>(self, f: F) -> Response<U>
    where
        F: FnOnce(T) -> U,
    {
        Response {
            data: f(self.data),
            raw_body: self.raw_body,
            url: self.url,
            status: self.status,
            headers: self.headers,
            latency: self.latency,
            attempts: self.attempts,
        }
    }

    /// Returns `true` if the request required retries.
    pub fn was_retried(&self) -> bool {
        self.attempts > 1
    }

    /// Returns a header value by name, if present and valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)?.to_str().ok()
    }
}

impl<T> std::ops::Deref for Response<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}
