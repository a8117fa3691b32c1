use super::{Entity, Record, Team};
use crate::{api, Result};
use serde::Deserialize;

/// Account data for the logged-in user.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    pub email: String,
    pub coins: i64,
    pub votes: i64,
    pub peanuts: i64,
    pub squirrels: i64,
    /// Id of the team the user backs. See [`User::favorite_team`].
    #[serde(rename = "favoriteTeam")]
    pub favorite_team_id: String,
}

impl Record for UserData {
    const KIND: &'static str = "User";
}

/// The logged-in user.
pub type User = Entity<UserData>;

impl Entity<UserData> {
    /// Fetches the user's favorite team.
    ///
    /// Every call makes a fresh request.
    pub async fn favorite_team(&self) -> Result<Team> {
        let raw = api::get_team(self.session(), &self.favorite_team_id).await?;
        Team::from_json(self.session(), raw)
    }
}
