//! Log subscriber setup.
//!
//! Events go to stderr. `RUST_LOG` selects the filter (default `info`);
//! `--verbose` forces `debug`.

use tracing_subscriber::EnvFilter;

use crate::error::CliError;

/// Filter used when `RUST_LOG` is unset or invalid.
const DEFAULT_FILTER: &str = "info";

/// Install the global fmt subscriber.
pub fn init(is_verbose: bool) -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(filter(is_verbose))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|err| CliError::Logging(err.to_string()))
}

fn filter(is_verbose: bool) -> EnvFilter {
    if is_verbose {
        return EnvFilter::new("debug");
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}
