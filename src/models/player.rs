use super::{Entity, Record};
use serde::Deserialize;
use std::fmt;

/// A point-in-time snapshot of a player's attributes.
///
/// Ratings are conventionally in `0.0..=1.0` but the API does not guarantee
/// it and no range is enforced here.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerData {
    pub name: String,
    pub bat: String,

    pub anticapitalism: f64,
    pub base_thirst: f64,
    pub buoyancy: f64,
    pub chasiness: f64,
    pub coldness: f64,
    pub continuation: f64,
    pub divinity: f64,
    pub ground_friction: f64,
    pub indulgence: f64,
    pub laserlikeness: f64,
    pub martyrdom: f64,
    pub moxie: f64,
    pub musclitude: f64,
    pub omniscience: f64,
    pub overpowerment: f64,
    pub patheticism: f64,
    pub ruthlessness: f64,
    pub shakespearianism: f64,
    pub suppression: f64,
    pub tenaciousness: f64,
    pub thwackability: f64,
    pub tragicness: f64,
    pub unthwackability: f64,
    pub watchfulness: f64,
    pub pressurization: f64,
    pub cinnamon: f64,

    pub total_fingers: i64,
    pub soul: i64,
    pub fate: i64,
    pub deceased: bool,
    pub peanut_allergy: bool,
}

impl Record for PlayerData {
    const KIND: &'static str = "Player";
}

/// A player on some team's roster.
pub type Player = Entity<PlayerData>;

impl fmt::Display for Entity<PlayerData> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Player(name=\"{}\")", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use super::*;

    #[test]
    fn test_decodes_camel_case_attributes() {
        let player = Player::from_json(&session(), object(player("p1", "Nagomi Mcdaniel"))).unwrap();

        assert_eq!(player.id(), "p1");
        assert_eq!(player.name, "Nagomi Mcdaniel");
        assert_eq!(player.base_thirst, 0.2);
        assert_eq!(player.ground_friction, 0.8);
        assert_eq!(player.total_fingers, 10);
        assert_eq!(player.soul, 7);
        assert_eq!(player.fate, 42);
        assert!(!player.deceased);
        assert!(player.peanut_allergy);
    }

    #[test]
    fn test_integer_rating_is_accepted_as_float() {
        let mut raw = object(player("p1", "Nagomi Mcdaniel"));
        raw.insert("moxie".to_string(), serde_json::json!(1));

        let player = Player::from_json(&session(), raw).unwrap();
        assert_eq!(player.moxie, 1.0);
    }

    #[test]
    fn test_display() {
        let player = Player::from_json(&session(), object(player("p1", "Nagomi Mcdaniel"))).unwrap();
        assert_eq!(player.to_string(), "Player(name=\"Nagomi Mcdaniel\")");
    }
}
