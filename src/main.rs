use clap::Parser;
use goal_sync::args::{Args, Command};
use goal_sync::{commands, Config, Mode, Result};
use std::process::ExitCode;
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

pub async fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let home = args.common().goals_home().path();

    // When GOALS_IN_TEST_MODE is set and non-empty, records are kept in memory instead of being
    // sent to the endpoint.
    let mode = Mode::from_env();

    let _: () = match args.command() {
        Command::Init(init_args) => commands::init(home, init_args.api_url()).await?.print(),
        Command::Show => commands::show(Config::load(home).await?, mode)
            .await?
            .print(),
        Command::Create(create_args) => {
            commands::create(Config::load(home).await?, mode, create_args.clone())
                .await?
                .print()
        }
        Command::Target(target_args) => {
            commands::target(Config::load(home).await?, mode, target_args.clone())
                .await?
                .print()
        }
        Command::Hide(hide_args) => {
            commands::hide(Config::load(home).await?, mode, hide_args.clone())
                .await?
                .print()
        }
        Command::Invest(invest_args) => {
            commands::invest(Config::load(home).await?, mode, invest_args.clone())
                .await?
                .print()
        }
    };
    Ok(())
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use default log level for this crate only.
            EnvFilter::new(format!(
                "{}={},{}={}",
                "goal_sync",
                level,
                env!("CARGO_BIN_NAME"),
                level
            ))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
