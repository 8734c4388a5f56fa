//! Command handlers for the goals CLI.
//!
//! This module contains implementations for all CLI subcommands.

mod create;
mod hide;
mod init;
mod invest;
mod show;
mod target;

use crate::api::{self, Mode};
use crate::catalog::Catalog;
use crate::service::{GoalService, PendingSync};
use crate::{Config, Result};
use serde::Serialize;
use std::fmt::Debug;
use tracing::{debug, info};

pub use create::create;
pub use hide::hide;
pub use init::init;
pub use invest::invest;
pub use show::show;
pub use target::target;

/// The output type for a command: a message for the user and, optionally, structured data.
#[derive(Debug, Clone, Serialize)]
pub struct Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// A message that can be printed to the user regarding the outcome of the command execution.
    message: String,

    /// Any structured data that needs to be output from the call.
    structure: Option<T>,
}

impl<T, S> From<S> for Out<T>
where
    T: Debug + Clone + Serialize,
    S: Into<String>,
{
    fn from(value: S) -> Self {
        Out::new_message(value)
    }
}

impl<T> Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// Create a new `Out` object that has `Some(structure)`.
    pub fn new<S>(message: S, structure: T) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: Some(structure),
        }
    }

    /// Create a new `Out` object that has `None` for `structure`.
    pub fn new_message<S>(message: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: None,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn structure(&self) -> Option<&T> {
        self.structure.as_ref()
    }

    /// Print the message to `info!` and the structured data (if it exists) as JSON to `debug!`.
    pub fn print(&self) {
        info!("{}", self.message);
        if let Some(structure) = self.structure() {
            if let Ok(json) = serde_json::to_string_pretty(structure) {
                debug!("Command output:\n\n{json}\n\n");
            }
        }
    }
}

/// Opens a goal session against the configured endpoint and loads it.
async fn session(config: &Config, mode: Mode) -> Result<GoalService> {
    let store = api::store(config, mode)?;
    let mut service = GoalService::new(store, Catalog::default());
    service.load().await;
    Ok(service)
}

/// Persists `pending`, turning a failed write into an error for the user. The change was already
/// applied locally, so the message says what did not make it.
async fn persist(service: &mut GoalService, pending: PendingSync, what: &str) -> Result<()> {
    service
        .persist(pending)
        .await
        .map_err(|failure| anyhow::Error::new(failure).context(format!("{what} was not saved")))?;
    Ok(())
}
