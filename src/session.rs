//! Authenticated transport with retry logic.
//!
//! A [`Session`] owns the cookie jar filled in at login and runs every request
//! through the retry loop. It is configured with [`ClientBuilder`], which can
//! also log in directly and hand back a [`Blaseball`] client.

use crate::{
    client::Blaseball,
    metadata::RequestMetadata,
    retry::{self, RetryPredicate, RetryStrategy},
    Error, Response, Result,
};
use http::{header, HeaderMap, HeaderName, HeaderValue, Method};
use serde::{de::DeserializeOwned, Serialize};
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

/// Origin of the official Blaseball API.
pub const DEFAULT_BASE_URL: &str = "https://blaseball.com/";

const DEFAULT_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// A cookie-backed HTTP session shared by a client and every entity it creates.
///
/// Cloning is cheap and every clone shares the same cookie jar, so logging in
/// through one handle authenticates all of them. The jar and connection pool
/// are thread-safe, but the session does not order or coordinate concurrent
/// requests; callers are expected to await one call at a time.
///
/// Redirects are never followed. A `302` from the login endpoint is reported
/// as-is and the cookies it sets are kept.
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    http_client: reqwest::Client,
    base_url: Url,
    retry_strategy: RetryStrategy,
    retry_predicate: Box<dyn RetryPredicate>,
    timeout: Option<Duration>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("base_url", &self.inner.base_url.as_str())
            .field("retry_strategy", &self.inner.retry_strategy)
            .field("timeout", &self.inner.timeout)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Creates a new `ClientBuilder` for configuring a session.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// The origin every request path is resolved against.
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Sends a request and decodes a JSON response body.
    ///
    /// Only 2xx statuses count as success. Failures are retried according to
    /// the session's strategy and predicate; once attempts run out the last
    /// error is returned unchanged.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use blaseball::{metadata::RequestMetadata, Session};
    /// use http::Method;
    ///
    /// # async fn example() -> Result<(), blaseball::Error> {
    /// let session = Session::builder().build()?;
    /// let metadata = RequestMetadata::new(Method::GET, "database/team")
    ///     .with_query_param("id", "8d87c468-699a-47a8-b40d-cfb73a5660ad");
    ///
    /// let team = session.call::<(), serde_json::Value>(metadata, None).await?;
    /// println!("{}", team.data["fullName"]);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn call<Req, Res>(
        &self,
        metadata: RequestMetadata,
        body: Option<&Req>,
    ) -> Result<Response<Res>>
    where
        Req: Serialize,
        Res: DeserializeOwned,
    {
        let request = &metadata;
        self.with_retries(request, move |attempt| {
            self.decode_attempt(request, body, attempt)
        })
        .await
    }

    /// Sends a request whose response body is not needed.
    ///
    /// Both 2xx and 3xx statuses count as success. The raw body is still
    /// available on the returned [`Response`].
    pub async fn send<Req>(&self, metadata: RequestMetadata, body: Option<&Req>) -> Result<Response<()>>
    where
        Req: Serialize,
    {
        let request = &metadata;
        self.with_retries(request, move |attempt| {
            self.discard_attempt(request, body, attempt)
        })
        .await
    }

    /// Makes a GET request to a path relative to the base URL.
    pub async fn get<Res>(&self, path: impl Into<String>) -> Result<Response<Res>>
    where
        Res: DeserializeOwned,
    {
        let metadata = RequestMetadata::new(Method::GET, path);
        self.call::<(), Res>(metadata, None).await
    }

    /// Runs `attempt_fn` until it succeeds, the predicate rejects the error,
    /// or the strategy runs out of retries.
    async fn with_retries<T, F, Fut>(&self, metadata: &RequestMetadata, mut attempt_fn: F) -> Result<Response<T>>
    where
        F: FnMut(usize) -> Fut,
        Fut: Future<Output = Result<Response<T>>>,
    {
        let start_time = Instant::now();
        let mut attempt = 0;

        loop {
            attempt += 1;

            match attempt_fn(attempt).await {
                Ok(mut response) => {
                    response.latency = start_time.elapsed();
                    response.attempts = attempt;

                    tracing::info!(
                        status = response.status.as_u16(),
                        latency_ms = response.latency.as_millis(),
                        attempts = attempt,
                        url = %response.url,
                        "Received HTTP response"
                    );
                    return Ok(response);
                }
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        attempt = attempt,
                        method = %metadata.method,
                        path = %metadata.path,
                        "Request failed"
                    );

                    if !self.inner.retry_predicate.should_retry(&e, attempt) {
                        return Err(e);
                    }

                    match self.inner.retry_strategy.delay_for_attempt(attempt) {
                        Some(delay) => {
                            tracing::info!(
                                delay_ms = delay.as_millis(),
                                attempt = attempt,
                                "Retrying request after delay"
                            );
                            tokio::time::sleep(delay).await;
                        }
                        None => {
                            tracing::warn!(
                                attempts = attempt,
                                method = %metadata.method,
                                path = %metadata.path,
                                "Retries exhausted"
                            );
                            return Err(e);
                        }
                    }
                }
            }
        }
    }

    async fn decode_attempt<Req, Res>(
        &self,
        metadata: &RequestMetadata,
        body: Option<&Req>,
        attempt: usize,
    ) -> Result<Response<Res>>
    where
        Req: Serialize,
        Res: DeserializeOwned,
    {
        let (url, response) = self.execute_request(metadata, body, attempt).await?;
        let response = check_status(metadata, &url, response, false).await?;

        let status = response.status();
        let headers = response.headers().clone();
        let raw_body = response.text().await.map_err(transport_error)?;

        match serde_json::from_str::<Res>(&raw_body) {
            Ok(data) => Ok(Response::new(
                data,
                raw_body,
                url,
                status,
                headers,
                Duration::ZERO,
                attempt,
            )),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    raw_response = %raw_body,
                    url = %url,
                    "Failed to deserialize response"
                );

                Err(Error::DeserializationFailed {
                    raw_response: raw_body,
                    serde_error: e.to_string(),
                    status,
                })
            }
        }
    }

    async fn discard_attempt<Req>(
        &self,
        metadata: &RequestMetadata,
        body: Option<&Req>,
        attempt: usize,
    ) -> Result<Response<()>>
    where
        Req: Serialize,
    {
        let (url, response) = self.execute_request(metadata, body, attempt).await?;
        let response = check_status(metadata, &url, response, true).await?;

        let status = response.status();
        let headers = response.headers().clone();
        let raw_body = response.text().await.map_err(transport_error)?;

        Ok(Response::new(
            (),
            raw_body,
            url,
            status,
            headers,
            Duration::ZERO,
            attempt,
        ))
    }

    /// Executes a single request attempt.
    async fn execute_request<Req>(
        &self,
        metadata: &RequestMetadata,
        body: Option<&Req>,
        attempt: usize,
    ) -> Result<(Url, reqwest::Response)>
    where
        Req: Serialize,
    {
        let url = self.url_for(metadata)?;

        tracing::debug!(
            method = %metadata.method,
            url = %url,
            attempt = attempt,
            "Executing HTTP request"
        );

        let mut request = self
            .inner
            .http_client
            .request(metadata.method.clone(), url.clone());

        for (name, value) in &metadata.headers {
            request = request.header(name, value);
        }

        if let Some(timeout) = self.inner.timeout {
            request = request.timeout(timeout);
        }

        if let Some(body) = body {
            let json = serde_json::to_value(body)
                .map_err(|e| Error::SerializationFailed(e.to_string()))?;
            request = request.json(&json);
        }

        let response = request.send().await.map_err(transport_error)?;

        Ok((url, response))
    }

    fn url_for(&self, metadata: &RequestMetadata) -> Result<Url> {
        let mut url = self
            .inner
            .base_url
            .join(metadata.path.trim_start_matches('/'))?;

        if !metadata.query_params.is_empty() {
            url.query_pairs_mut().extend_pairs(&metadata.query_params);
        }

        Ok(url)
    }
}

/// Turns a failure status into [`Error::HttpError`], draining the body for the message.
async fn check_status(
    metadata: &RequestMetadata,
    url: &Url,
    response: reqwest::Response,
    accept_redirects: bool,
) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() || (accept_redirects && status.is_redirection()) {
        return Ok(response);
    }

    let raw_response = response.text().await.unwrap_or_default();

    if status.is_client_error() {
        tracing::error!(
            status = status.as_u16(),
            url = %url,
            response = %raw_response,
            "Client error (4xx)"
        );
    } else {
        tracing::warn!(
            status = status.as_u16(),
            url = %url,
            response = %raw_response,
            "Server error"
        );
    }

    Err(Error::HttpError {
        method: metadata.method.clone(),
        url: url.clone(),
        status,
        raw_response,
    })
}

fn transport_error(error: reqwest::Error) -> Error {
    if error.is_timeout() {
        Error::Timeout
    } else {
        Error::Network(error)
    }
}

/// Builder for configuring a [`Session`] and logging in.
///
/// # Examples
///
/// ```no_run
/// use blaseball::{ClientBuilder, RetryStrategy};
/// use std::time::Duration;
///
/// # async fn example() -> Result<(), blaseball::Error> {
/// let client = ClientBuilder::new()
///     .timeout(Duration::from_secs(10))
///     .retry_strategy(RetryStrategy::ExponentialBackoff {
///         initial_delay: Duration::from_millis(250),
///         max_delay: Duration::from_secs(5),
///         max_retries: 4,
///         jitter: true,
///     })
///     .user_agent("my-blaseball-bot/1.0")
///     .login("foo", "bar")
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct ClientBuilder {
    base_url: Option<Url>,
    default_headers: HeaderMap,
    user_agent: Option<String>,
    retry_strategy: RetryStrategy,
    retry_predicate: Option<Box<dyn RetryPredicate>>,
    timeout: Option<Duration>,
}

impl ClientBuilder {
    /// Creates a new `ClientBuilder` with default settings.
    ///
    /// Requests go to [`DEFAULT_BASE_URL`] with no timeout and
    /// [`RetryStrategy::default`] retries.
    pub fn new() -> Self {
        Self {
            base_url: None,
            default_headers: HeaderMap::new(),
            user_agent: None,
            retry_strategy: RetryStrategy::default(),
            retry_predicate: None,
            timeout: None,
        }
    }

    /// Sets the origin all request paths are resolved against.
    ///
    /// A trailing slash is added when missing so that paths are appended
    /// rather than replacing the last segment.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or cannot serve as a base.
    pub fn base_url(mut self, url: impl AsRef<str>) -> Result<Self> {
        let mut url = Url::parse(url.as_ref())?;
        if url.cannot_be_a_base() {
            return Err(Error::ConfigurationError(format!(
                "Base URL cannot have paths appended: {}",
                url
            )));
        }

        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }

        self.base_url = Some(url);
        Ok(self)
    }

    /// Adds a default header that will be included in all requests.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn default_header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Result<Self> {
        let name = HeaderName::try_from(name.as_ref())
            .map_err(|e| Error::ConfigurationError(format!("Invalid header name: {}", e)))?;
        let value = HeaderValue::try_from(value.as_ref())
            .map_err(|e| Error::ConfigurationError(format!("Invalid header value: {}", e)))?;
        self.default_headers.insert(name, value);
        Ok(self)
    }

    /// Overrides the `User-Agent` sent with every request.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Sets the retry strategy for failed requests.
    pub fn retry_strategy(mut self, strategy: RetryStrategy) -> Self {
        self.retry_strategy = strategy;
        self
    }

    /// Sets a custom retry predicate.
    ///
    /// Defaults to [`retry::default_predicate`].
    pub fn retry_predicate(mut self, predicate: Box<dyn RetryPredicate>) -> Self {
        self.retry_predicate = Some(predicate);
        self
    }

    /// Sets the per-attempt request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds an unauthenticated [`Session`].
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client configuration is invalid.
    pub fn build(self) -> Result<Session> {
        let base_url = match self.base_url {
            Some(url) => url,
            None => Url::parse(DEFAULT_BASE_URL)?,
        };

        let mut default_headers = self.default_headers;
        let user_agent = self.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT);
        let user_agent = HeaderValue::try_from(user_agent)
            .map_err(|e| Error::ConfigurationError(format!("Invalid user agent: {}", e)))?;
        default_headers.insert(header::USER_AGENT, user_agent);

        let http_client = reqwest::Client::builder()
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::none())
            .default_headers(default_headers)
            .build()
            .map_err(|e| {
                Error::ConfigurationError(format!("Failed to build HTTP client: {}", e))
            })?;

        let retry_predicate = self
            .retry_predicate
            .unwrap_or_else(retry::default_predicate);

        Ok(Session {
            inner: Arc::new(SessionInner {
                http_client,
                base_url,
                retry_strategy: self.retry_strategy,
                retry_predicate,
                timeout: self.timeout,
            }),
        })
    }

    /// Builds a session and logs in with it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Authentication`] if the login endpoint keeps failing,
    /// or a configuration error if the session cannot be built.
    pub async fn login(self, username: &str, password: &str) -> Result<Blaseball> {
        let session = self.build()?;
        Blaseball::with_session(session, username, password).await
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_base_url() {
        let session = ClientBuilder::new().build().unwrap();
        assert_eq!(session.base_url().as_str(), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let session = ClientBuilder::new()
            .base_url("http://localhost:8080/mirror")
            .unwrap()
            .build()
            .unwrap();

        let metadata = RequestMetadata::new(Method::GET, "database/allTeams");
        assert_eq!(
            session.url_for(&metadata).unwrap().as_str(),
            "http://localhost:8080/mirror/database/allTeams"
        );
    }

    #[test]
    fn test_url_for_encodes_query() {
        let session = ClientBuilder::new().build().unwrap();
        let metadata = RequestMetadata::new(Method::GET, "/database/players")
            .with_query_param("ids", "p1,p2");

        let url = session.url_for(&metadata).unwrap();
        assert_eq!(url.path(), "/database/players");

        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs, vec![("ids".to_string(), "p1,p2".to_string())]);
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            ClientBuilder::new().base_url("not a url"),
            Err(Error::InvalidUrl(_))
        ));
        assert!(matches!(
            ClientBuilder::new().base_url("mailto:someone@example.com"),
            Err(Error::ConfigurationError(_))
        ));
    }

    #[test]
    fn test_invalid_user_agent() {
        let result = ClientBuilder::new().user_agent("bad\nagent").build();
        assert!(matches!(result, Err(Error::ConfigurationError(_))));
    }
}
