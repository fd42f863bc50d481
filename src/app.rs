//! Process-level glue for the `apollo-sync` binary: exit codes, the
//! `init` hint shown after configuration errors, and log setup.

use apollo_sync::config::{ConfigError, field};
use tracing::Level;
use tracing_subscriber::EnvFilter;

const INIT_HINT: &str = "\nRun 'apollo-sync init' to generate a configuration template.";

pub mod exit_code {
    use std::process::ExitCode;

    pub const SUCCESS: ExitCode = ExitCode::SUCCESS;

    /// Bad arguments, unreadable config file or a missing server/app id.
    pub const CONFIG_ERROR: ExitCode = ExitCode::FAILURE;

    /// `get` found nothing, `dump` could not render, or the runtime failed to start.
    ///
    /// `ExitCode::from` is not `const`, hence a function.
    pub fn runtime_error() -> ExitCode {
        ExitCode::from(2)
    }
}

/// Returns the `init` hint when the error suggests there is no usable
/// config file yet.
fn config_hint(error: &ConfigError) -> Option<&'static str> {
    let needs_template = match error {
        ConfigError::MissingRequired { field: f, .. } => {
            [field::CONFIG_URL, field::APP_ID].contains(f)
        }
        ConfigError::FileRead { .. } => true,
        _ => false,
    };
    needs_template.then_some(INIT_HINT)
}

pub fn print_config_hint(error: &ConfigError) {
    if let Some(hint) = config_hint(error) {
        eprintln!("{hint}");
    }
}

/// Installs the global subscriber.
///
/// `RUST_LOG` wins over `verbose`. Output goes to stderr so `get` and
/// `dump` can be piped.
pub fn setup_tracing(verbose: bool) {
    let default_level = if verbose { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
