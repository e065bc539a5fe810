pub mod actions;
pub mod commands;
pub mod config;
pub mod errors;
pub mod readiness;
pub mod targeting;

pub use actions::{parse_response, Action, ActionList, ActionParser, Operation, OperationSchema};
pub use errors::{PilotError, PilotResult};
pub use readiness::{wait_for, wait_till_stable, PollOptions, PollOutcome, StabilityOptions};
pub use targeting::{is_interactive, is_visible, xpath_to_css};

/// Installs the global `tracing` subscriber. `RUST_LOG` wins over `default_filter`.
/// Calling it more than once is harmless.
pub fn init_tracing(default_filter: &str) {
    let result = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .try_init();
    if result.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}

/// Entry point for the `pagepilot` binary.
pub fn run() -> PilotResult<()> {
    // Load .env file if present (ignore error if not found)
    let _ = dotenvy::dotenv();

    let cli = <commands::Cli as clap::Parser>::parse();
    let config = match &cli.config {
        Some(path) => config::load_config_from(path)?,
        None => config::load_config()?,
    };
    init_tracing(&config.logging.filter);

    commands::dispatch(cli.command, &config)
}
