//! These structs provide the CLI interface for the goals CLI.

use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// goals: track investment contributions against savings goals.
///
/// Contributions and goal settings are stored in a spreadsheet behind a web endpoint. Run
/// `goals init --api-url <URL>` once to point this program at it, then use `goals show` to see
/// how each goal is doing.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the home directory and point it at the spreadsheet endpoint.
    Init(InitArgs),
    /// Show the grand total and the progress of every visible goal.
    Show,
    /// Create a custom goal.
    Create(CreateArgs),
    /// Change the target of a goal.
    Target(TargetArgs),
    /// Hide a goal. Its past contributions still count towards the grand total.
    Hide(HideArgs),
    /// Record a contribution towards a goal.
    Invest(InvestArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where the configuration is held. Defaults to ~/goals
    #[arg(long, env = "GOALS_HOME", default_value_t = default_goals_home())]
    goals_home: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, goals_home: PathBuf) -> Self {
        Self {
            log_level,
            goals_home: goals_home.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn goals_home(&self) -> &DisplayPath {
        &self.goals_home
    }
}

/// Args for the `goals init` command.
#[derive(Debug, Parser, Clone)]
pub struct InitArgs {
    /// The URL of the deployed spreadsheet endpoint.
    #[arg(long)]
    api_url: String,
}

impl InitArgs {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }
}

/// Args for the `goals create` command.
#[derive(Debug, Parser, Clone)]
pub struct CreateArgs {
    /// The name of the goal. Contributions are matched to it by this name, ignoring case.
    #[arg(long)]
    label: String,

    /// How much you want to save, e.g. 50000 or $50,000.
    #[arg(long)]
    target: String,
}

impl CreateArgs {
    pub fn new(label: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            target: target.into(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn target(&self) -> &str {
        &self.target
    }
}

/// Args for the `goals target` command.
#[derive(Debug, Parser, Clone)]
pub struct TargetArgs {
    /// The goal id or label.
    #[arg(long)]
    goal: String,

    /// The new target. Zero removes the target.
    #[arg(long)]
    value: String,
}

impl TargetArgs {
    pub fn new(goal: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            goal: goal.into(),
            value: value.into(),
        }
    }

    pub fn goal(&self) -> &str {
        &self.goal
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Args for the `goals hide` command.
#[derive(Debug, Parser, Clone)]
pub struct HideArgs {
    /// The goal id or label.
    #[arg(long)]
    goal: String,

    /// Do not ask for confirmation.
    #[arg(long, short)]
    yes: bool,
}

impl HideArgs {
    pub fn new(goal: impl Into<String>, yes: bool) -> Self {
        Self {
            goal: goal.into(),
            yes,
        }
    }

    pub fn goal(&self) -> &str {
        &self.goal
    }

    pub fn yes(&self) -> bool {
        self.yes
    }
}

/// Args for the `goals invest` command.
#[derive(Debug, Parser, Clone)]
pub struct InvestArgs {
    /// How much was invested.
    #[arg(long)]
    amount: String,

    /// The goal the money goes towards, by id or label.
    #[arg(long)]
    goal: String,

    /// Where the money was invested, e.g. Nu, Cetes, Bonos, Udibonos or ETFs.
    #[arg(long)]
    place: String,

    /// The date as dd/mm/yyyy. Defaults to today.
    #[arg(long)]
    date: Option<String>,
}

impl InvestArgs {
    pub fn new(
        amount: impl Into<String>,
        goal: impl Into<String>,
        place: impl Into<String>,
        date: Option<String>,
    ) -> Self {
        Self {
            amount: amount.into(),
            goal: goal.into(),
            place: place.into(),
            date,
        }
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn goal(&self) -> &str {
        &self.goal
    }

    pub fn place(&self) -> &str {
        &self.place
    }

    pub fn date(&self) -> Option<&str> {
        self.date.as_deref()
    }
}

fn default_goals_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("goals"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --goals-home or GOALS_HOME instead of relying on the default \
                goals home directory.",
            );
            PathBuf::from("goals")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn path(&self) -> &Path {
        &self.0
    }
}
