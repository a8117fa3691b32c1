//! Typed wrappers around API payloads.
//!
//! Every entity is an [`Entity<T>`]: the object id, a handle to the session
//! that fetched it, and a typed record `T` decoded with serde. Records
//! dereference straight through the entity, so `user.coins` works on a
//! [`User`]. Cross-references such as a team's lineup are plain id lists
//! resolved by explicit async accessors, and every call goes back to the
//! network.

mod player;
mod team;
mod user;

pub use player::{Player, PlayerData};
pub use team::{Team, TeamData};
pub use user::{User, UserData};

use crate::{api::JsonObject, Error, Result, Session};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::ops::Deref;

/// A payload type that can be wrapped in an [`Entity`].
pub trait Record: DeserializeOwned {
    /// Name used in decoding errors.
    const KIND: &'static str;
}

/// An object fetched from the API, tied to the session that fetched it.
#[derive(Debug, Clone)]
pub struct Entity<T> {
    id: String,
    session: Session,
    data: T,
}

impl<T: Record> Entity<T> {
    /// Decodes a raw API object.
    ///
    /// The id is read from `_id`, falling back to `id`. Unknown fields are
    /// ignored; missing or mistyped required fields produce [`Error::Decoding`].
    pub fn from_json(session: &Session, mut object: JsonObject) -> Result<Self> {
        let id = take_id(&mut object).map_err(|message| Error::Decoding {
            entity: T::KIND,
            message,
        })?;

        let data = serde_json::from_value(Value::Object(object)).map_err(|e| Error::Decoding {
            entity: T::KIND,
            message: format!("{} (id {})", e, id),
        })?;

        Ok(Self {
            id,
            session: session.clone(),
            data,
        })
    }

    /// Decodes a list of raw API objects, failing on the first bad one.
    pub fn from_json_list(session: &Session, objects: Vec<JsonObject>) -> Result<Vec<Self>> {
        objects
            .into_iter()
            .map(|object| Self::from_json(session, object))
            .collect()
    }
}

impl<T> Entity<T> {
    /// The object's id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The typed payload.
    pub fn data(&self) -> &T {
        &self.data
    }

    /// Consumes the entity, returning the payload.
    pub fn into_data(self) -> T {
        self.data
    }

    pub(crate) fn session(&self) -> &Session {
        &self.session
    }
}

impl<T> Deref for Entity<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

fn take_id(object: &mut JsonObject) -> std::result::Result<String, String> {
    match object.remove("_id").or_else(|| object.remove("id")) {
        Some(Value::String(id)) => Ok(id),
        Some(other) => Err(format!("expected string id, found {}", other)),
        None => Err("missing field `_id`".to_string()),
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use serde_json::json;

    #[test]
    fn test_id_falls_back_to_plain_id() {
        let mut raw = object(player("p1", "Jessica Telephone"));
        raw.remove("_id");
        raw.insert("id".to_string(), json!("p2"));

        let player = Player::from_json(&session(), raw).unwrap();
        assert_eq!(player.id(), "p2");
    }

    #[test]
    fn test_missing_id_is_decoding_error() {
        let mut raw = object(player("p1", "Jessica Telephone"));
        raw.remove("_id");

        match Player::from_json(&session(), raw) {
            Err(Error::Decoding { entity, message }) => {
                assert_eq!(entity, "Player");
                assert!(message.contains("_id"));
            }
            other => panic!("expected decoding error, got {:?}", other),
        }
    }

    #[test]
    fn test_numeric_id_is_rejected() {
        let mut raw = object(player("p1", "Jessica Telephone"));
        raw.insert("_id".to_string(), json!(17));

        assert!(matches!(
            Player::from_json(&session(), raw),
            Err(Error::Decoding { entity: "Player", .. })
        ));
    }

    #[test]
    fn test_list_fails_on_first_bad_entry() {
        let good = object(player("p1", "Jessica Telephone"));
        let mut bad = object(player("p2", "York Silk"));
        bad.remove("moxie");

        let result = Player::from_json_list(&session(), vec![good, bad]);
        match result {
            Err(Error::Decoding { message, .. }) => {
                assert!(message.contains("moxie"));
                assert!(message.contains("p2"));
            }
            other => panic!("expected decoding error, got {:?}", other),
        }
    }
}
