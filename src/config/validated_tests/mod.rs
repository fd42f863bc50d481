//! Tests for validated configuration.

use super::ConfigError;
use super::cli::Cli;
use super::toml::TomlConfig;
use super::validated::ValidatedConfig;

/// Helper to create CLI args from a slice
fn cli(args: &[&str]) -> Cli {
    let mut full_args = vec!["apollo-sync"];
    full_args.extend(args);
    Cli::parse_from_iter(full_args)
}

/// CLI args with both required fields set
fn cli_with_server(args: &[&str]) -> Cli {
    let mut full_args = vec![
        "--config-url",
        "http://localhost:8080",
        "--app-id",
        "demo-service",
    ];
    full_args.extend(args);
    cli(&full_args)
}

/// Helper to parse TOML config
fn toml(content: &str) -> TomlConfig {
    TomlConfig::parse(content).unwrap()
}

mod precedence_tests;
