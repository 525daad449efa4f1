//! Lookups over an in-memory restaurant list.
//!
//! All functions here are pure: they take a snapshot of the collection and
//! never touch storage.
//!
//! # Example
//!
//! ```
//! use mogu::query::{is_duplicate, normalize, search};
//!
//! assert_eq!(normalize("  Ramen House "), "ramen house");
//!
//! let list = Vec::new();
//! assert!(!is_duplicate(&list, "Ramen House", "Hongdae"));
//! assert!(search(&list, "ramen").is_empty());
//! ```

use crate::restaurant::Restaurant;

/// Fold text into its comparison key: surrounding whitespace trimmed,
/// lowercased.
#[must_use]
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Check if a record with the same name and area already exists.
///
/// Both fields are compared after [`normalize`], so casing and surrounding
/// whitespace do not matter.
#[must_use]
pub fn is_duplicate(list: &[Restaurant], name: &str, area: &str) -> bool {
    let name = normalize(name);
    let area = normalize(area);
    list.iter()
        .any(|r| normalize(&r.name) == name && normalize(&r.area) == area)
}

/// Records whose name, area, or genre contains the keyword.
///
/// Matching is a single case-insensitive substring test per field. Results
/// keep collection order.
#[must_use]
pub fn search<'a>(list: &'a [Restaurant], keyword: &str) -> Vec<&'a Restaurant> {
    let keyword = normalize(keyword);
    list.iter().filter(|r| matches_keyword(r, &keyword)).collect()
}

fn matches_keyword(record: &Restaurant, keyword: &str) -> bool {
    [&record.name, &record.area, &record.genre]
        .into_iter()
        .any(|field| normalize(field).contains(keyword))
}
