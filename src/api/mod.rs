//! Access to the spreadsheet-backed endpoint that stores expense, investment and configuration
//! rows.
//!
//! The `RecordStore` trait is deliberately small: list the rows of one kind, append one row. The
//! HTTP implementation talks to the deployed endpoint, and `TestStore` keeps rows in memory so the
//! whole program can run without the network.

mod http_store;
mod test_store;

use crate::model::RecordKind;
use crate::{Config, Result};
use serde_json::Value;

pub(crate) use http_store::HttpStore;
pub use test_store::TestStore;

/// When this environment variable is set to a non-empty value the program uses `TestStore`.
pub const GOALS_IN_TEST_MODE: &str = "GOALS_IN_TEST_MODE";

/// An ordered, append-only store of rows, grouped by kind.
#[async_trait::async_trait]
pub trait RecordStore {
    /// Returns every row of `kind` in the order they were appended.
    async fn list(&mut self, kind: RecordKind) -> Result<Vec<Value>>;

    /// Appends one row. `payload` must be a JSON object; it is tagged with `kind` on the wire.
    async fn append(&mut self, kind: RecordKind, payload: Value) -> Result<()>;
}

/// Chooses which `RecordStore` implementation `store` returns.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Http,
    Test,
}

impl Mode {
    pub fn from_env() -> Self {
        match std::env::var(GOALS_IN_TEST_MODE) {
            Ok(val) if !val.is_empty() => Mode::Test,
            _ => Mode::Http,
        }
    }
}

/// Creates the `RecordStore` for `mode`.
pub fn store(config: &Config, mode: Mode) -> Result<Box<dyn RecordStore + Send>> {
    Ok(match mode {
        Mode::Http => Box::new(HttpStore::new(config.api_url().clone())?),
        Mode::Test => Box::new(TestStore::default()),
    })
}
