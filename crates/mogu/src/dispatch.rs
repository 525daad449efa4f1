//! Command dispatch for mogu.
//!
//! A [`Command`] plus the [`Invoker`] who sent it goes in, an [`Outcome`]
//! comes out. The dispatcher never formats messages; that is the job of
//! [`render`](crate::render).
//!
//! Each call reloads the list from the [`Store`], so it always sees the
//! latest persisted state. The store sits behind a mutex so that concurrent
//! calls run their load, mutate, save sequences one at a time.

use std::fmt;
use std::str::FromStr;
use std::sync::Mutex;

use serde::Serialize;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::query;
use crate::restaurant::{NewRestaurant, Restaurant};
use crate::store::Store;

/// Most entries shown by a list or search reply.
pub const DISPLAY_LIMIT: usize = 20;

/// The four operations the bot understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    /// Register a restaurant.
    Add,
    /// Remove a restaurant by position (administrators only).
    Delete,
    /// Find restaurants by keyword.
    Search,
    /// Show the full list.
    List,
}

impl CommandKind {
    /// Every command, in registration order.
    pub const ALL: [Self; 4] = [Self::Add, Self::Delete, Self::Search, Self::List];

    /// Canonical command identifier.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Add => "add-restaurant",
            Self::Delete => "delete-restaurant",
            Self::Search => "search-restaurant",
            Self::List => "list-restaurants",
        }
    }

    /// The Korean slash-command name the bot was first deployed with.
    #[must_use]
    pub fn korean_name(self) -> &'static str {
        match self {
            Self::Add => "맛집추가",
            Self::Delete => "맛집삭제",
            Self::Search => "맛집검색",
            Self::List => "맛집리스트",
        }
    }

    /// Check if the command changes the stored list.
    #[must_use]
    pub fn is_mutating(self) -> bool {
        matches!(self, Self::Add | Self::Delete)
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CommandKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim().trim_start_matches('/');
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == s || kind.korean_name() == s)
            .ok_or_else(|| Error::unknown_command(s))
    }
}

/// A parsed command with its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Register a restaurant.
    Add(NewRestaurant),
    /// Remove the restaurant at a 1-based position in the full list.
    Delete {
        /// 1-based position; anything outside the list is rejected.
        position: i64,
    },
    /// Find restaurants whose name, area, or genre contains the keyword.
    Search {
        /// Search keyword.
        keyword: String,
    },
    /// Show the full list.
    List,
}

impl Command {
    /// The kind of this command.
    #[must_use]
    pub fn kind(&self) -> CommandKind {
        match self {
            Self::Add(_) => CommandKind::Add,
            Self::Delete { .. } => CommandKind::Delete,
            Self::Search { .. } => CommandKind::Search,
            Self::List => CommandKind::List,
        }
    }
}

/// Who sent a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invoker {
    /// Platform user id.
    pub user_id: String,
    /// Whether the platform reports the user as an administrator in the
    /// current server.
    pub is_admin: bool,
}

impl Invoker {
    /// A regular member.
    #[must_use]
    pub fn member(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            is_admin: false,
        }
    }

    /// An administrator.
    #[must_use]
    pub fn admin(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            is_admin: true,
        }
    }
}

/// Result of a dispatched command that did not fault.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// A restaurant was stored.
    Added {
        /// The stored record.
        restaurant: Restaurant,
    },
    /// A restaurant was removed.
    Deleted {
        /// The removed record.
        restaurant: Restaurant,
    },
    /// A list or search result.
    Listing(Listing),
    /// The command was refused; nothing changed.
    Rejected {
        /// Why.
        reason: Rejection,
    },
}

impl Outcome {
    /// Check if the command was refused.
    #[must_use]
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }

    fn rejected(reason: Rejection) -> Self {
        Self::Rejected { reason }
    }
}

/// Why a command was refused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Rejection {
    /// A required argument was empty.
    MissingField {
        /// Label of the empty argument.
        field: &'static str,
    },
    /// A restaurant with the same name and area is already stored.
    Duplicate {
        /// Name as given.
        name: String,
        /// Area as given.
        area: String,
    },
    /// The invoker may not run this command.
    PermissionDenied,
    /// No restaurant at that position.
    OutOfRange {
        /// Requested position.
        position: i64,
        /// Number of stored restaurants.
        len: usize,
    },
    /// The search matched nothing.
    NotFound {
        /// Keyword as given.
        keyword: String,
    },
}

/// Entries to show for a list or search command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Listing {
    /// What produced the listing.
    pub kind: ListingKind,
    /// Number of matching records, including those beyond the display cap.
    pub total: usize,
    /// At most [`DISPLAY_LIMIT`] entries, in collection order.
    pub entries: Vec<ListEntry>,
}

impl Listing {
    fn build<'a>(
        kind: ListingKind,
        records: impl ExactSizeIterator<Item = &'a Restaurant>,
    ) -> Self {
        let total = records.len();
        let entries = records
            .take(DISPLAY_LIMIT)
            .enumerate()
            .map(|(idx, restaurant)| ListEntry {
                number: idx + 1,
                restaurant: restaurant.clone(),
            })
            .collect();
        Self {
            kind,
            total,
            entries,
        }
    }

    /// Check if some matches were left out because of the display cap.
    #[must_use]
    pub fn is_truncated(&self) -> bool {
        self.total > self.entries.len()
    }
}

/// Source of a [`Listing`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingKind {
    /// The full list.
    All,
    /// A keyword search.
    Search {
        /// Keyword as given.
        keyword: String,
    },
}

/// One numbered entry of a listing.
///
/// For the full list the number is the delete position. For search results
/// it only counts within the results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListEntry {
    /// 1-based display number.
    pub number: usize,
    /// The record.
    pub restaurant: Restaurant,
}

/// Runs commands against a [`Store`].
#[derive(Debug)]
pub struct Dispatcher {
    store: Mutex<Store>,
    admin_ids: Vec<String>,
}

impl Dispatcher {
    /// Create a dispatcher over the given store with no extra administrators.
    #[must_use]
    pub fn new(store: Store) -> Self {
        Self {
            store: Mutex::new(store),
            admin_ids: Vec::new(),
        }
    }

    /// Create a dispatcher from loaded configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let store = Store::new(config.data_path()).versioned(config.storage.versioned);
        Self::new(store).with_admins(config.bot.admin_ids.clone())
    }

    /// Treat these user ids as administrators regardless of what the
    /// platform reports.
    #[must_use]
    pub fn with_admins(mut self, admin_ids: Vec<String>) -> Self {
        self.admin_ids = admin_ids;
        self
    }

    /// Check if the invoker may run privileged commands.
    #[must_use]
    pub fn is_privileged(&self, invoker: &Invoker) -> bool {
        invoker.is_admin || self.admin_ids.iter().any(|id| id == &invoker.user_id)
    }

    /// Run a command.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written. Business-rule
    /// refusals come back as [`Outcome::Rejected`] instead.
    pub fn dispatch(&self, invoker: &Invoker, command: Command) -> Result<Outcome> {
        let store = self
            .store
            .lock()
            .map_err(|e| Error::internal(format!("store lock poisoned: {e}")))?;

        debug!(command = %command.kind(), user = %invoker.user_id, "Dispatching command");

        match command {
            Command::Add(input) => Self::add(&store, invoker, &input),
            Command::Delete { position } => {
                if !self.is_privileged(invoker) {
                    info!(user = %invoker.user_id, "Delete refused: not an administrator");
                    return Ok(Outcome::rejected(Rejection::PermissionDenied));
                }
                Self::delete(&store, position)
            }
            Command::Search { keyword } => Self::search(&store, &keyword),
            Command::List => Self::list(&store),
        }
    }

    fn add(store: &Store, invoker: &Invoker, input: &NewRestaurant) -> Result<Outcome> {
        if let Some(field) = input.first_missing_field() {
            return Ok(Outcome::rejected(Rejection::MissingField { field }));
        }

        let input = input.trimmed();
        let mut list = store.load()?;

        if query::is_duplicate(&list, &input.name, &input.area) {
            debug!(name = %input.name, area = %input.area, "Rejecting duplicate");
            return Ok(Outcome::rejected(Rejection::Duplicate {
                name: input.name,
                area: input.area,
            }));
        }

        let restaurant = Restaurant::new(&input, invoker.user_id.as_str());
        list.push(restaurant.clone());
        store.save(&list)?;

        info!(
            name = %restaurant.name,
            area = %restaurant.area,
            user = %invoker.user_id,
            total = list.len(),
            "Restaurant added"
        );
        Ok(Outcome::Added { restaurant })
    }

    fn delete(store: &Store, position: i64) -> Result<Outcome> {
        let mut list = store.load()?;

        let index = position
            .checked_sub(1)
            .and_then(|idx| usize::try_from(idx).ok())
            .filter(|&idx| idx < list.len());

        let Some(index) = index else {
            return Ok(Outcome::rejected(Rejection::OutOfRange {
                position,
                len: list.len(),
            }));
        };

        let restaurant = list.remove(index);
        store.save(&list)?;

        info!(
            name = %restaurant.name,
            area = %restaurant.area,
            position,
            total = list.len(),
            "Restaurant deleted"
        );
        Ok(Outcome::Deleted { restaurant })
    }

    fn search(store: &Store, keyword: &str) -> Result<Outcome> {
        // Matching uses the trimmed keyword; replies echo it as typed.
        let needle = keyword.trim();
        if needle.is_empty() {
            return Ok(Outcome::rejected(Rejection::MissingField { field: "keyword" }));
        }

        let list = store.load()?;
        let results = query::search(&list, needle);
        debug!(keyword = needle, matches = results.len(), "Search finished");

        if results.is_empty() {
            return Ok(Outcome::rejected(Rejection::NotFound {
                keyword: keyword.to_string(),
            }));
        }

        Ok(Outcome::Listing(Listing::build(
            ListingKind::Search {
                keyword: keyword.to_string(),
            },
            results.into_iter(),
        )))
    }

    fn list(store: &Store) -> Result<Outcome> {
        let list = store.load()?;
        Ok(Outcome::Listing(Listing::build(ListingKind::All, list.iter())))
    }
}
