//! One function per remote endpoint.
//!
//! Each fetcher performs a single logical request through the session's retry
//! loop and hands back the decoded JSON untouched. Turning that JSON into
//! entities is the job of [`models`](crate::models).

use crate::{metadata::RequestMetadata, Error, Result, Session};
use http::Method;
use serde::Serialize;

/// A decoded JSON object as returned by the API.
pub type JsonObject = serde_json::Map<String, serde_json::Value>;

/// Endpoint paths, relative to the session's base URL.
pub mod paths {
    /// Logs in and sets the session cookie.
    pub const LOGIN: &str = "auth/local";
    /// The currently logged-in user.
    pub const USER: &str = "api/getUser";
    /// Players by comma-separated `ids`.
    pub const PLAYERS: &str = "database/players";
    /// Every team in the league.
    pub const ALL_TEAMS: &str = "database/allTeams";
    /// A single team by `id`.
    pub const TEAM: &str = "database/team";
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
    is_login: bool,
}

/// Logs `session` in; on success its cookie jar carries the credentials.
///
/// Any 2xx or 3xx status is accepted.
///
/// # Errors
///
/// Returns [`Error::Authentication`] wrapping the last failure once retries
/// are exhausted.
pub async fn login(session: &Session, username: &str, password: &str) -> Result<()> {
    let body = LoginRequest {
        username,
        password,
        is_login: true,
    };
    let metadata = RequestMetadata::new(Method::POST, paths::LOGIN);

    match session.send(metadata, Some(&body)).await {
        Ok(response) => {
            tracing::info!(username = username, status = response.status.as_u16(), "Logged in");
            Ok(())
        }
        Err(e) => Err(Error::Authentication {
            username: username.to_string(),
            source: Box::new(e),
        }),
    }
}

/// Fetches the logged-in user.
pub async fn get_user(session: &Session) -> Result<JsonObject> {
    Ok(session.get::<JsonObject>(paths::USER).await?.data)
}

/// Fetches players by id, in a single request.
///
/// An empty id list returns an empty list without touching the network.
pub async fn get_players<S: AsRef<str>>(session: &Session, ids: &[S]) -> Result<Vec<JsonObject>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let ids = ids
        .iter()
        .map(|id| id.as_ref())
        .collect::<Vec<_>>()
        .join(",");
    let metadata = RequestMetadata::new(Method::GET, paths::PLAYERS).with_query_param("ids", ids);

    Ok(session
        .call::<(), Vec<JsonObject>>(metadata, None)
        .await?
        .data)
}

/// Fetches every team.
pub async fn get_all_teams(session: &Session) -> Result<Vec<JsonObject>> {
    Ok(session.get::<Vec<JsonObject>>(paths::ALL_TEAMS).await?.data)
}

/// Fetches a single team by id.
pub async fn get_team(session: &Session, id: &str) -> Result<JsonObject> {
    let metadata = RequestMetadata::new(Method::GET, paths::TEAM).with_query_param("id", id);
    Ok(session.call::<(), JsonObject>(metadata, None).await?.data)
}
