//! Configuration layer for apollo-sync.
//!
//! This module provides:
//! - CLI argument parsing ([`Cli`], [`Command`])
//! - TOML configuration file parsing ([`TomlConfig`])
//! - Validated configuration ([`ValidatedConfig`]) producing
//!   [`ClientOptions`](crate::client::ClientOptions)
//! - Configuration file generation ([`write_default_config`])
//! - Default values ([`defaults`])
//!
//! # Priority
//!
//! Configuration values are resolved with the following priority (highest to lowest):
//!
//! 1. **Explicit CLI arguments** (including `APOLLO_CONFIG_URL`, `APOLLO_APP_ID`
//!    and `APOLLO_SECRET` environment variables)
//! 2. **TOML config file**
//! 3. **Built-in defaults**
//!
//! `config_url` and `app_id` have no default and must come from CLI or TOML.
//!
//! The namespace list from the CLI **replaces** the TOML list entirely.
//!
//! # Boolean Flag Semantics
//!
//! `--no-background-sync` can only disable long polling. Without it the
//! TOML `client.background_sync` value is used, defaulting to enabled.

mod cli;
pub mod defaults;
mod error;
mod toml;
mod validated;

#[cfg(test)]
mod validated_tests;

pub use cli::{Cli, Command};
pub use error::{ConfigError, field};
pub use toml::{TomlConfig, default_config_template};
pub use validated::{ValidatedConfig, write_default_config};
