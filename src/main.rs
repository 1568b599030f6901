//! dptn - Debian Package Tracker News
//!
//! Fetches the news of the given packages from the Debian Package Tracker,
//! caches them under `~/.dptn` and prints the cached news matching the
//! search strings.

use std::io;

use clap::Parser;

use dptn::app::App;
use dptn::cli::{Cli, RunConfig};

/// Sets up the stderr logger; `RUST_LOG` wins over the verbosity flag
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = RunConfig::from_cli(&cli)?;
    tracing::debug!(?config, "starting");

    let app = App::new(config)?;
    let mut stdout = io::stdout().lock();
    match app.run(&mut stdout).await {
        Ok(()) => {}
        // The reader of our output went away (e.g. `dptn curl | head`).
        Err(e) if e.is_broken_pipe() => tracing::debug!("output closed early"),
        Err(e) => {
            tracing::error!(error = %e, "run failed");
            return Err(e.into());
        }
    }

    Ok(())
}
