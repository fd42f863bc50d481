//! Command execution.
//!
//! `get` and `dump` start a client without long polling, answer from
//! whichever tier has the data and shut down. `watch` keeps the client
//! running and logs change events until a shutdown signal arrives.

use std::collections::BTreeMap;
use std::time::Duration;

use thiserror::Error;
use tokio::signal;

use apollo_sync::config::{Command, ValidatedConfig};
use apollo_sync::transport::HttpClient;
use apollo_sync::{ApolloClient, CacheStore, ClientOptions, ConfigChange};

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// How long `watch` waits for background tasks after a shutdown signal.
///
/// An in-flight long poll is not interrupted, so this bounds the wait.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Error type for runtime execution failures.
#[derive(Debug, Error)]
pub enum RunError {
    /// The key was found in no tier and no default was given.
    #[error("Key '{key}' not found in namespace '{namespace}'")]
    KeyNotFound {
        /// Namespace that was searched
        namespace: String,
        /// Key that was searched for
        key: String,
    },

    /// Failed to render the merged configuration.
    #[error("Failed to render configuration: {0}")]
    Render(#[from] serde_json::Error),

    /// `init` is handled before a runtime exists.
    #[error("Command cannot run against a configuration client")]
    UnsupportedCommand,
}

/// Runs `command` against a client built from `config`.
///
/// # Errors
///
/// Returns an error if a `get` finds nothing and has no default, or the
/// `dump` output cannot be rendered.
#[cfg(not(tarpaulin_include))]
pub async fn execute(config: ValidatedConfig, command: Command) -> Result<(), RunError> {
    match command {
        Command::Get {
            key,
            namespace,
            default,
        } => {
            let client = ApolloClient::builder(one_shot(config.options)).start().await;
            let result = get(&client, &namespace, &key, default.as_deref()).await;
            client.shutdown().await;
            println!("{}", result?);
            Ok(())
        }
        Command::Dump => {
            let client = ApolloClient::builder(one_shot(config.options)).start().await;
            let rendered = render_dump(&client.get_config());
            client.shutdown().await;
            println!("{}", rendered?);
            Ok(())
        }
        Command::Watch => {
            watch(config.options).await;
            Ok(())
        }
        Command::Init { .. } => Err(RunError::UnsupportedCommand),
    }
}

/// Options for commands that answer once and exit.
fn one_shot(options: ClientOptions) -> ClientOptions {
    options.with_background_sync(false)
}

/// Resolves `key`, falling back to `default`.
async fn get<H, D>(
    client: &ApolloClient<H, D>,
    namespace: &str,
    key: &str,
    default: Option<&str>,
) -> Result<String, RunError>
where
    H: HttpClient + 'static,
    D: CacheStore + 'static,
{
    client
        .lookup(namespace, key)
        .await
        .or_else(|| default.map(ToString::to_string))
        .ok_or_else(|| RunError::KeyNotFound {
            namespace: namespace.to_string(),
            key: key.to_string(),
        })
}

fn render_dump(config: &BTreeMap<String, String>) -> Result<String, RunError> {
    Ok(serde_json::to_string_pretty(config)?)
}

fn log_change(change: &ConfigChange) {
    tracing::info!("{change}");
}

/// Keeps the client syncing until a shutdown signal is received.
///
/// Excluded from coverage - requires signal handling.
#[cfg(not(tarpaulin_include))]
async fn watch(options: ClientOptions) {
    let client = ApolloClient::builder(options)
        .with_listener(log_change)
        .start()
        .await;
    tracing::info!(
        "Watching {} namespace(s), {} key(s) cached",
        client.namespaces().len(),
        client.get_config().len()
    );

    shutdown_signal().await;
    tracing::info!("Shutdown signal received, stopping...");

    if tokio::time::timeout(SHUTDOWN_GRACE, client.shutdown())
        .await
        .is_err()
    {
        tracing::warn!("Background sync did not stop in time, abandoning in-flight requests");
    }
}

/// Returns a future that completes when a shutdown signal is received.
///
/// Excluded from coverage - requires OS signal handling.
#[cfg(not(tarpaulin_include))]
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {e}");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}
