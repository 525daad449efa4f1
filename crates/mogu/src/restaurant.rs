//! Restaurant record types for mogu.
//!
//! A [`Restaurant`] is one recommendation in the shared list. Records are
//! created by the add command and never edited afterwards.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

/// The ordered list of records as persisted.
///
/// Position in the list (1-based) is the public handle used for deletion.
pub type Collection = Vec<Restaurant>;

/// A single restaurant recommendation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    /// Restaurant name.
    pub name: String,

    /// Neighbourhood or district, e.g. "Hongdae".
    pub area: String,

    /// Cuisine or kind of place, e.g. "Ramen".
    pub genre: String,

    /// One-line review.
    pub review: String,

    /// Free-form tip (waiting times, what to order). Empty when not given.
    #[serde(default)]
    pub memo: String,

    /// When the record was added.
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,

    /// Platform identity of the user who added it.
    pub created_by: String,
}

/// User input for a new record, before trimming and validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewRestaurant {
    /// Restaurant name.
    pub name: String,
    /// Area.
    pub area: String,
    /// Genre.
    pub genre: String,
    /// One-line review.
    pub review: String,
    /// Optional memo.
    pub memo: Option<String>,
}

impl NewRestaurant {
    /// Return a copy with every field trimmed and an absent memo turned into
    /// the empty string.
    #[must_use]
    pub fn trimmed(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            area: self.area.trim().to_string(),
            genre: self.genre.trim().to_string(),
            review: self.review.trim().to_string(),
            memo: Some(
                self.memo
                    .as_deref()
                    .map(str::trim)
                    .unwrap_or_default()
                    .to_string(),
            ),
        }
    }

    /// Name of the first required field that is empty after trimming.
    #[must_use]
    pub fn first_missing_field(&self) -> Option<&'static str> {
        [
            ("name", &self.name),
            ("area", &self.area),
            ("genre", &self.genre),
            ("review", &self.review),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
    }
}

impl Restaurant {
    /// Create a record from user input, stamped with the current time.
    ///
    /// Fields are trimmed; validation is the caller's job. The stamp is cut
    /// to the millisecond precision the file stores, so the record equals
    /// what a later load returns.
    #[must_use]
    pub fn new(input: &NewRestaurant, created_by: impl Into<String>) -> Self {
        Self::new_at(input, created_by, Utc::now())
    }

    /// Like [`Restaurant::new`] with an explicit creation time.
    #[must_use]
    pub fn new_at(
        input: &NewRestaurant,
        created_by: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        let input = input.trimmed();
        Self {
            name: input.name,
            area: input.area,
            genre: input.genre,
            review: input.review,
            memo: input.memo.unwrap_or_default(),
            created_at: created_at.trunc_subsecs(3),
            created_by: created_by.into(),
        }
    }

    /// Check if the record carries a memo.
    #[must_use]
    pub fn has_memo(&self) -> bool {
        !self.memo.is_empty()
    }
}

/// `createdAt` is written as ISO-8601 with millisecond precision, e.g.
/// `2024-05-01T09:30:00.000Z`.
mod timestamp {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &DateTime<Utc>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
