//! CLI argument parsing using clap.
//!
//! Defines the command-line interface with all options and subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use super::defaults;

/// apollo-sync: Apollo configuration client
///
/// Keeps configuration namespaces in sync with an Apollo-compatible
/// configuration service, falling back to a local disk cache when the
/// service is unreachable.
#[derive(Debug, Parser)]
#[command(name = "apollo-sync")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run (default: watch)
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Base URL of the configuration service
    #[arg(long = "config-url", env = "APOLLO_CONFIG_URL", global = true)]
    pub config_url: Option<String>,

    /// Application id
    #[arg(long = "app-id", env = "APOLLO_APP_ID", global = true)]
    pub app_id: Option<String>,

    /// Cluster name (default: "default")
    #[arg(long, global = true)]
    pub cluster: Option<String>,

    /// Access key secret used to sign requests
    #[arg(long, env = "APOLLO_SECRET", hide_env_values = true, global = true)]
    pub secret: Option<String>,

    /// Comma-separated namespaces to keep in sync (default: "application")
    #[arg(long, value_name = "NS[,NS...]", global = true)]
    pub namespaces: Option<String>,

    /// Client IP reported to the server (default: discovered)
    #[arg(long, global = true)]
    pub ip: Option<String>,

    /// Directory of the disk cache
    #[arg(long = "cache-dir", global = true)]
    pub cache_dir: Option<PathBuf>,

    /// Disable long polling; only the heartbeat refreshes namespaces
    #[arg(long = "no-background-sync", global = true)]
    pub no_background_sync: bool,

    /// Delay between long polls in seconds
    #[arg(long = "poll-delay", global = true)]
    pub poll_delay: Option<u64>,

    /// Long-poll request timeout in seconds
    #[arg(long = "long-poll-timeout", global = true)]
    pub long_poll_timeout: Option<u64>,

    /// Configuration fetch timeout in seconds
    #[arg(long = "fetch-timeout", global = true)]
    pub fetch_timeout: Option<u64>,

    /// Interval between heartbeat passes in seconds
    #[arg(long = "heartbeat-interval", global = true)]
    pub heartbeat_interval: Option<u64>,

    /// Path to configuration file
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

/// Subcommands for apollo-sync
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Resolve a single key and print its value
    Get {
        /// Key to resolve
        key: String,

        /// Namespace holding the key
        #[arg(long = "in", value_name = "NAMESPACE", default_value = defaults::NAMESPACE)]
        namespace: String,

        /// Value printed when the key is found nowhere
        #[arg(long)]
        default: Option<String>,
    },

    /// Print the merged configuration of all namespaces as JSON
    Dump,

    /// Keep namespaces in sync and log changes until interrupted
    Watch,

    /// Generate a default configuration file
    Init {
        /// Output path for the configuration file
        #[arg(long, short, default_value = defaults::CONFIG_FILE)]
        output: PathBuf,
    },
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parses CLI arguments from an iterator (useful for testing).
    pub fn parse_from_iter<I, T>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(iter)
    }

    /// Returns true if this is the init command.
    #[must_use]
    pub const fn is_init(&self) -> bool {
        matches!(self.command, Some(Command::Init { .. }))
    }

    /// The command to run, `watch` when none was given.
    #[must_use]
    pub fn command_or_default(&self) -> Command {
        self.command.clone().unwrap_or(Command::Watch)
    }
}
