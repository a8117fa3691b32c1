//! The logged-in client.
//!
//! [`Blaseball`] is the entry point of the crate: constructing one logs in,
//! and its methods run the top-level queries.

use crate::{
    api,
    models::{Player, Team, User},
    ClientBuilder, Result, Session,
};

/// An authenticated Blaseball client.
///
/// Entities returned from this client share its [`Session`], so their lazy
/// accessors keep working after the client itself is dropped.
///
/// # Examples
///
/// ```no_run
/// use blaseball::Blaseball;
///
/// # async fn example() -> Result<(), blaseball::Error> {
/// let client = Blaseball::login("foo", "bar").await?;
///
/// let user = client.user().await?;
/// println!("{} has {} coins", user.email, user.coins);
///
/// let team = user.favorite_team().await?;
/// for player in team.lineup().await? {
///     println!("{}", player);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Blaseball {
    session: Session,
}

impl Blaseball {
    /// Creates a new `ClientBuilder` for configuring the client before logging in.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Logs in against the official API with default settings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Authentication`](crate::Error::Authentication) if the
    /// login endpoint keeps failing.
    pub async fn login(username: &str, password: &str) -> Result<Self> {
        Self::builder().login(username, password).await
    }

    /// Logs in with an already configured session.
    pub async fn with_session(session: Session, username: &str, password: &str) -> Result<Self> {
        api::login(&session, username, password).await?;
        Ok(Self { session })
    }

    /// The authenticated session.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Fetches the logged-in user.
    pub async fn user(&self) -> Result<User> {
        let raw = api::get_user(&self.session).await?;
        User::from_json(&self.session, raw)
    }

    /// Fetches every team in the league.
    pub async fn teams(&self) -> Result<Vec<Team>> {
        let raw = api::get_all_teams(&self.session).await?;
        Team::from_json_list(&self.session, raw)
    }

    /// Fetches a single team by id.
    pub async fn team(&self, id: &str) -> Result<Team> {
        let raw = api::get_team(&self.session, id).await?;
        Team::from_json(&self.session, raw)
    }

    /// Fetches players by id in one request.
    pub async fn players<S: AsRef<str>>(&self, ids: &[S]) -> Result<Vec<Player>> {
        let raw = api::get_players(&self.session, ids).await?;
        Player::from_json_list(&self.session, raw)
    }
}
