use super::{Entity, Player, Record};
use crate::{api, Result};
use serde::Deserialize;
use std::fmt;

/// Team details plus the ids of everyone on the roster.
///
/// The id lists are fixed once decoded. Use the accessors on [`Team`] to
/// fetch the players behind them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamData {
    pub full_name: String,
    pub location: String,
    pub nickname: String,
    pub emoji: String,
    pub slogan: String,

    pub season_shames: i64,
    pub season_shamings: i64,
    pub shame_runs: i64,
    pub total_shames: i64,
    pub total_shamings: i64,
    pub championships: i64,

    #[serde(rename = "lineup")]
    pub lineup_ids: Vec<String>,
    #[serde(rename = "rotation")]
    pub rotation_ids: Vec<String>,
    #[serde(rename = "bullpen")]
    pub bullpen_ids: Vec<String>,
    #[serde(rename = "bench")]
    pub bench_ids: Vec<String>,
}

impl Record for TeamData {
    const KIND: &'static str = "Team";
}

/// A team in the league.
pub type Team = Entity<TeamData>;

impl Entity<TeamData> {
    /// Fetches the batting lineup, in order.
    pub async fn lineup(&self) -> Result<Vec<Player>> {
        self.players(&self.lineup_ids).await
    }

    /// Fetches the pitching rotation, in order.
    pub async fn rotation(&self) -> Result<Vec<Player>> {
        self.players(&self.rotation_ids).await
    }

    /// Fetches the bullpen.
    pub async fn bullpen(&self) -> Result<Vec<Player>> {
        self.players(&self.bullpen_ids).await
    }

    /// Fetches the bench.
    pub async fn bench(&self) -> Result<Vec<Player>> {
        self.players(&self.bench_ids).await
    }

    // One request per call, never cached.
    async fn players(&self, ids: &[String]) -> Result<Vec<Player>> {
        let raw = api::get_players(self.session(), ids).await?;
        Player::from_json_list(self.session(), raw)
    }
}

impl fmt::Display for Entity<TeamData> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Team(name=\"{}\")", self.full_name)
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decodes_roster_ids_in_order() {
        let raw = json!({
            "_id": "t1",
            "fullName": "Hades Tigers",
            "location": "Hades",
            "nickname": "Tigers",
            "emoji": "0x1F405",
            "slogan": "Hell yeah.",
            "seasonShames": 0,
            "seasonShamings": 1,
            "shameRuns": 0,
            "totalShames": 2,
            "totalShamings": 3,
            "championships": 1,
            "lineup": ["p3", "p1", "p2"],
            "rotation": ["p4"],
            "bullpen": [],
            "bench": ["p5"],
            "teamSpirit": 0
        });

        let team = Team::from_json(&session(), object(raw)).unwrap();

        assert_eq!(team.id(), "t1");
        assert_eq!(team.full_name, "Hades Tigers");
        assert_eq!(team.lineup_ids, vec!["p3", "p1", "p2"]);
        assert_eq!(team.rotation_ids, vec!["p4"]);
        assert!(team.bullpen_ids.is_empty());
        assert_eq!(team.bench_ids, vec!["p5"]);
        assert_eq!(team.total_shamings, 3);
        assert_eq!(team.to_string(), "Team(name=\"Hades Tigers\")");
    }
}
