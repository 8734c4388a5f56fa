//! Tracks investment contributions against savings goals.
//!
//! Goals come from a built-in catalog plus whatever the user created, minus whatever the user
//! hid, with per-goal target overrides. All of that configuration, and the contributions
//! themselves, live in a spreadsheet-backed endpoint reached through the [`api::RecordStore`]
//! trait.

pub mod aggregate;
pub mod api;
pub mod args;
pub mod catalog;
pub mod commands;
mod config;
pub mod config_store;
mod error;
pub mod model;
pub mod reconcile;
pub mod service;
mod utils;

#[cfg(test)]
mod test;

pub use api::Mode;
pub use config::Config;
pub use error::{Error, Result, StoreError, SyncFailure, SyncTarget, ValidationError};
pub use service::{Ack, Confirmation, GoalService, PendingSync};
