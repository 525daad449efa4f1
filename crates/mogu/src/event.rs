//! Inbound command events.
//!
//! The chat gateway hands mogu one JSON object per slash-command invocation:
//!
//! ```json
//! {"command": "add-restaurant",
//!  "user": {"id": "1234", "admin": false},
//!  "options": {"name": "Tonkotsu King", "area": "Hongdae", "genre": "Ramen",
//!              "review": "Rich broth, long wait"}}
//! ```
//!
//! Command identifiers and option labels are accepted in English or under
//! the Korean names the bot was originally deployed with.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::dispatch::{Command, CommandKind, Invoker};
use crate::error::{Error, Result};
use crate::restaurant::NewRestaurant;

/// Option labels, English first.
pub mod labels {
    /// Restaurant name.
    pub const NAME: [&str; 2] = ["name", "이름"];
    /// Area.
    pub const AREA: [&str; 2] = ["area", "지역"];
    /// Genre.
    pub const GENRE: [&str; 2] = ["genre", "장르"];
    /// One-line review.
    pub const REVIEW: [&str; 2] = ["review", "한줄평"];
    /// Memo.
    pub const MEMO: [&str; 2] = ["memo", "메모"];
    /// List position.
    pub const POSITION: [&str; 2] = ["position", "번호"];
    /// Search keyword.
    pub const KEYWORD: [&str; 2] = ["keyword", "키워드"];
}

/// A single slash-command invocation as delivered by the gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandEvent {
    /// Command identifier.
    pub command: String,
    /// Who invoked it.
    pub user: EventUser,
    /// Option values keyed by label.
    #[serde(default)]
    pub options: Map<String, Value>,
}

/// The invoking user as seen by the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventUser {
    /// Platform user id.
    pub id: String,
    /// Whether the user holds the administrator permission in this server.
    #[serde(default)]
    pub admin: bool,
}

impl CommandEvent {
    /// Parse one event from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid event object.
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|e| Error::invalid_event(e.to_string()))
    }

    /// The invoking user.
    #[must_use]
    pub fn invoker(&self) -> Invoker {
        Invoker {
            user_id: self.user.id.clone(),
            is_admin: self.user.admin,
        }
    }

    /// Convert the event into a typed command.
    ///
    /// Missing or blank text options become empty strings and are left for
    /// the dispatcher to reject.
    ///
    /// # Errors
    ///
    /// Returns an error if the command identifier is unknown, or if the
    /// delete position is missing or not an integer.
    pub fn to_command(&self) -> Result<Command> {
        let command = match self.command.parse::<CommandKind>()? {
            CommandKind::Add => Command::Add(NewRestaurant {
                name: self.text(&labels::NAME).unwrap_or_default(),
                area: self.text(&labels::AREA).unwrap_or_default(),
                genre: self.text(&labels::GENRE).unwrap_or_default(),
                review: self.text(&labels::REVIEW).unwrap_or_default(),
                memo: self.text(&labels::MEMO),
            }),
            CommandKind::Delete => Command::Delete {
                position: self.integer(&labels::POSITION)?,
            },
            CommandKind::Search => Command::Search {
                keyword: self.text(&labels::KEYWORD).unwrap_or_default(),
            },
            CommandKind::List => Command::List,
        };
        Ok(command)
    }

    fn option(&self, names: &[&str]) -> Option<&Value> {
        names
            .iter()
            .find_map(|name| self.options.get(*name))
            .filter(|value| !value.is_null())
    }

    fn text(&self, names: &[&str]) -> Option<String> {
        self.option(names).map(|value| match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }

    fn integer(&self, names: &[&str]) -> Result<i64> {
        let value = self
            .option(names)
            .ok_or_else(|| Error::invalid_event(format!("missing option '{}'", names[0])))?;

        let parsed = match value {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        };
        parsed.ok_or_else(|| {
            Error::invalid_event(format!("option '{}' must be an integer, got {value}", names[0]))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(raw: &str) -> CommandEvent {
        CommandEvent::from_json(raw).unwrap()
    }

    #[test]
    fn test_add_event() {
        let e = event(
            r#"{"command": "add-restaurant",
                "user": {"id": "42"},
                "options": {"name": "Tonkotsu King", "area": "Hongdae",
                            "genre": "Ramen", "review": "Rich broth"}}"#,
        );
        assert_eq!(e.invoker(), Invoker::member("42"));

        let Command::Add(new) = e.to_command().unwrap() else {
            panic!("expected Add");
        };
        assert_eq!(new.name, "Tonkotsu King");
        assert_eq!(new.review, "Rich broth");
        assert_eq!(new.memo, None);
    }

    #[test]
    fn test_korean_aliases() {
        let e = event(
            r#"{"command": "맛집추가",
                "user": {"id": "42"},
                "options": {"이름": "모츠나베", "지역": "성수", "장르": "일식",
                            "한줄평": "국물이 진함", "메모": "웨이팅 있음"}}"#,
        );
        let Command::Add(new) = e.to_command().unwrap() else {
            panic!("expected Add");
        };
        assert_eq!(new.area, "성수");
        assert_eq!(new.memo.as_deref(), Some("웨이팅 있음"));
    }

    #[test]
    fn test_missing_text_option_becomes_empty() {
        let e = event(
            r#"{"command": "add-restaurant", "user": {"id": "1"}, "options": {"name": "A"}}"#,
        );
        let Command::Add(new) = e.to_command().unwrap() else {
            panic!("expected Add");
        };
        assert_eq!(new.area, "");
        assert_eq!(new.first_missing_field(), Some("area"));
    }

    #[test]
    fn test_delete_event() {
        let e = event(
            r#"{"command": "delete-restaurant", "user": {"id": "1", "admin": true},
                "options": {"position": 3}}"#,
        );
        assert!(e.invoker().is_admin);
        assert_eq!(e.to_command().unwrap(), Command::Delete { position: 3 });
    }

    #[test]
    fn test_delete_position_as_string() {
        let e = event(
            r#"{"command": "맛집삭제", "user": {"id": "1"}, "options": {"번호": " -2 "}}"#,
        );
        assert_eq!(e.to_command().unwrap(), Command::Delete { position: -2 });
    }

    #[test]
    fn test_delete_position_not_integer() {
        let e = event(
            r#"{"command": "delete-restaurant", "user": {"id": "1"},
                "options": {"position": 1.5}}"#,
        );
        let err = e.to_command().unwrap_err();
        assert!(matches!(err, Error::InvalidEvent { .. }));
    }

    #[test]
    fn test_delete_position_missing() {
        let e = event(r#"{"command": "delete-restaurant", "user": {"id": "1"}}"#);
        let err = e.to_command().unwrap_err();
        assert!(err.to_string().contains("position"));
    }

    #[test]
    fn test_search_and_list_events() {
        let e = event(
            r#"{"command": "search-restaurant", "user": {"id": "1"},
                "options": {"keyword": "ramen"}}"#,
        );
        assert_eq!(
            e.to_command().unwrap(),
            Command::Search {
                keyword: "ramen".to_string()
            }
        );

        let e = event(r#"{"command": "list-restaurants", "user": {"id": "1"}}"#);
        assert_eq!(e.to_command().unwrap(), Command::List);
    }

    #[test]
    fn test_unknown_command() {
        let e = event(r#"{"command": "order-pizza", "user": {"id": "1"}}"#);
        assert!(matches!(
            e.to_command().unwrap_err(),
            Error::UnknownCommand { .. }
        ));
    }

    #[test]
    fn test_malformed_event() {
        assert!(CommandEvent::from_json("not json").is_err());
        assert!(CommandEvent::from_json(r#"{"command": "list-restaurants"}"#).is_err());
    }

    #[test]
    fn test_null_option_is_absent() {
        let e = event(
            r#"{"command": "add-restaurant", "user": {"id": "1"},
                "options": {"name": "A", "area": "B", "genre": "C", "review": "D", "memo": null}}"#,
        );
        let Command::Add(new) = e.to_command().unwrap() else {
            panic!("expected Add");
        };
        assert_eq!(new.memo, None);
    }
}
