//! On-disk layout of the restaurant file.
//!
//! Two layouts are understood:
//!
//! - the legacy bare JSON array of records (the default on write), and
//! - a versioned envelope `{"version": N, "restaurants": [...]}`.
//!
//! Both are written with two-space indentation so that saving an unchanged
//! collection reproduces the same bytes.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::restaurant::{Collection, Restaurant};

/// The newest envelope version this build reads and writes.
pub const CURRENT_VERSION: u32 = 1;

#[derive(Deserialize)]
#[serde(untagged)]
enum Persisted {
    Legacy(Collection),
    Versioned {
        version: u32,
        restaurants: Collection,
    },
}

#[derive(Serialize)]
struct Envelope<'a> {
    version: u32,
    restaurants: &'a [Restaurant],
}

/// Parse file contents in either layout.
///
/// # Errors
///
/// Returns an error if the contents are not valid JSON in a known layout, or
/// if the envelope version is newer than [`CURRENT_VERSION`].
pub fn decode(raw: &str) -> Result<Collection> {
    match serde_json::from_str::<Persisted>(raw)? {
        Persisted::Legacy(list) => Ok(list),
        Persisted::Versioned {
            version,
            restaurants,
        } => {
            if version > CURRENT_VERSION {
                return Err(Error::UnsupportedVersion {
                    found: version,
                    supported: CURRENT_VERSION,
                });
            }
            Ok(restaurants)
        }
    }
}

/// Serialize a collection, as a bare array or wrapped in the envelope.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn encode(list: &[Restaurant], versioned: bool) -> Result<String> {
    let out = if versioned {
        serde_json::to_string_pretty(&Envelope {
            version: CURRENT_VERSION,
            restaurants: list,
        })?
    } else {
        serde_json::to_string_pretty(list)?
    };
    Ok(out)
}
