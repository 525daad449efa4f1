//! Chat replies for dispatched commands.
//!
//! Turns an [`Outcome`] into the text the bot posts back. Refusals and
//! search results are ephemeral (only the invoker sees them); confirmations
//! and the full list are posted to the channel.

use serde::Serialize;

use crate::dispatch::{
    CommandKind, ListEntry, Listing, ListingKind, Outcome, Rejection, DISPLAY_LIMIT,
};
use crate::error::Error;
use crate::restaurant::Restaurant;

/// The bot's voice.
const VOICE: &str = "🍜";

/// A message ready to post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reply {
    /// Markdown text.
    pub content: String,
    /// Visible only to the invoker.
    pub ephemeral: bool,
}

impl Reply {
    fn public(content: String) -> Self {
        Self {
            content,
            ephemeral: false,
        }
    }

    fn private(content: String) -> Self {
        Self {
            content,
            ephemeral: true,
        }
    }
}

fn voiced(text: &str) -> String {
    format!("{VOICE} {text}")
}

/// Render the outcome of a command.
#[must_use]
pub fn render(outcome: &Outcome) -> Reply {
    match outcome {
        Outcome::Added { restaurant } => Reply::public(added(restaurant)),
        Outcome::Deleted { restaurant } => Reply::public(voiced(&format!(
            "Deleted. **{}** (Area: {}, Genre: {})",
            restaurant.name, restaurant.area, restaurant.genre
        ))),
        Outcome::Listing(listing) => {
            let content = listing_text(listing);
            match listing.kind {
                ListingKind::All => Reply::public(content),
                ListingKind::Search { .. } => Reply::private(content),
            }
        }
        Outcome::Rejected { reason } => Reply::private(voiced(&rejection_text(reason))),
    }
}

/// Render a fault. Details stay in the logs.
#[must_use]
pub fn render_error(error: &Error) -> Reply {
    let text = if error.is_event_error() {
        format!("I didn't understand that command ({error}).")
    } else {
        "Something went wrong on my side. Please try again later.".to_string()
    };
    Reply::private(voiced(&text))
}

fn added(r: &Restaurant) -> String {
    let mut out = format!(
        "✅ **Restaurant saved**\n{}\n\n**Name:** {} · **Area:** {} · **Genre:** {}\n\
         **Review:** {}",
        voiced("I'll keep it tidy so it's easy to find later."),
        r.name,
        r.area,
        r.genre,
        r.review
    );
    if r.has_memo() {
        out.push_str(&format!("\n**Memo:** {}", r.memo));
    }
    out
}

fn rejection_text(reason: &Rejection) -> String {
    match reason {
        Rejection::MissingField { field } => format!("Please fill in the {field}."),
        Rejection::Duplicate { .. } => {
            "That one is already saved. (same name + area)".to_string()
        }
        Rejection::PermissionDenied => "Only administrators can do that.".to_string(),
        Rejection::OutOfRange { .. } => format!(
            "There's no such number. Check the numbers with /{}.",
            CommandKind::List
        ),
        Rejection::NotFound { keyword } => {
            format!("Couldn't find anything for \"{keyword}\". Maybe check the spelling?")
        }
    }
}

fn listing_text(listing: &Listing) -> String {
    let title = match &listing.kind {
        ListingKind::All => format!("All restaurants ({})", listing.total),
        ListingKind::Search { keyword } => {
            format!("Search results: \"{keyword}\" ({})", listing.total)
        }
    };

    let hint = if listing.total == 0 {
        format!("Nothing here yet. Add one with /{}.", CommandKind::Add)
    } else {
        format!("Looking for something? /{} is quicker.", CommandKind::Search)
    };

    let mut out = format!("📌 **{title}**\n{hint}");
    if !listing.entries.is_empty() {
        let lines: Vec<String> = listing.entries.iter().map(entry_text).collect();
        out.push_str(&format!(
            "\n\n__List (up to {DISPLAY_LIMIT} shown)__\n{}",
            lines.join("\n\n")
        ));
    }
    out
}

fn entry_text(entry: &ListEntry) -> String {
    let r = &entry.restaurant;
    let memo = if r.has_memo() {
        format!(" · Memo: {}", r.memo)
    } else {
        String::new()
    };
    format!(
        "**{}. {}**  \nArea: {} · Genre: {}\n_{}_{}",
        entry.number, r.name, r.area, r.genre, r.review, memo
    )
}
