//! `mogu` - A chat bot for sharing and searching restaurant recommendations
//!
//! This library provides the command core of the bot: the restaurant record
//! store, the matching rules, and the dispatcher that turns chat commands into
//! outcomes and replies.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod event;
pub mod logging;
pub mod query;
pub mod registry;
pub mod render;
pub mod restaurant;
pub mod serve;
pub mod store;

pub use config::Config;
pub use dispatch::{Command, Dispatcher, Invoker, Outcome};
pub use error::{Error, Result};
pub use logging::init_logging;
pub use restaurant::{NewRestaurant, Restaurant};
pub use store::Store;
