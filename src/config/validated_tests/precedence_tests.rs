//! Tests for CLI > TOML > default precedence.

use std::path::PathBuf;

use super::*;

fn full_toml() -> TomlConfig {
    toml(
        r#"
        [server]
        config_url = "http://toml.local:8080"
        app_id = "toml-app"
        cluster = "toml-cluster"
        secret = "toml-secret"

        [client]
        namespaces = ["toml-a", "toml-b"]
        background_sync = false
        ip = "10.0.0.2"

        [cache]
        dir = "/toml/cache"
    "#,
    )
}

#[test]
fn cli_overrides_toml() {
    let cli = cli(&[
        "--config-url",
        "http://cli.local:8080",
        "--app-id",
        "cli-app",
        "--cluster",
        "cli-cluster",
        "--secret",
        "cli-secret",
        "--namespaces",
        "cli-ns",
        "--ip",
        "10.0.0.1",
        "--cache-dir",
        "/cli/cache",
    ]);

    let options = ValidatedConfig::from_raw(&cli, Some(&full_toml()))
        .unwrap()
        .options;

    assert_eq!(options.config_url.host_str(), Some("cli.local"));
    assert_eq!(options.app_id, "cli-app");
    assert_eq!(options.cluster, "cli-cluster");
    assert_eq!(options.secret.as_deref(), Some("cli-secret"));
    assert_eq!(options.namespaces, vec!["cli-ns"]);
    assert_eq!(options.ip.as_deref(), Some("10.0.0.1"));
    assert_eq!(options.cache_dir, PathBuf::from("/cli/cache"));
}

#[test]
fn toml_used_when_cli_absent() {
    let options = ValidatedConfig::from_raw(&cli(&[]), Some(&full_toml()))
        .unwrap()
        .options;

    assert_eq!(options.config_url.host_str(), Some("toml.local"));
    assert_eq!(options.app_id, "toml-app");
    assert_eq!(options.cluster, "toml-cluster");
    assert_eq!(options.secret.as_deref(), Some("toml-secret"));
    assert_eq!(options.namespaces, vec!["toml-a", "toml-b"]);
    assert!(!options.background_sync);
    assert_eq!(options.ip.as_deref(), Some("10.0.0.2"));
    assert_eq!(options.cache_dir, PathBuf::from("/toml/cache"));
}

#[test]
fn defaults_when_neither_set() {
    let options = ValidatedConfig::from_raw(&cli_with_server(&[]), None)
        .unwrap()
        .options;

    assert_eq!(options.cluster, "default");
    assert_eq!(options.secret, None);
    assert_eq!(options.namespaces, vec!["application"]);
    assert!(options.background_sync);
    assert_eq!(options.ip, None);
    assert!(options.cache_dir.ends_with("data/apollo-sync/cache"));
}

#[test]
fn cli_namespaces_replace_toml_namespaces() {
    let cli = cli(&["--namespaces", "only-cli"]);
    let options = ValidatedConfig::from_raw(&cli, Some(&full_toml()))
        .unwrap()
        .options;

    assert_eq!(options.namespaces, vec!["only-cli"]);
}

#[test]
fn namespace_lists_are_normalized() {
    let cli = cli_with_server(&["--namespaces", " application , ,database,application"]);
    let options = ValidatedConfig::from_raw(&cli, None).unwrap().options;

    assert_eq!(options.namespaces, vec!["application", "database"]);
}

#[test]
fn empty_toml_namespace_list_defaults() {
    let toml = toml("[client]\nnamespaces = []");
    let options = ValidatedConfig::from_raw(&cli_with_server(&[]), Some(&toml))
        .unwrap()
        .options;

    assert_eq!(options.namespaces, vec!["application"]);
}

#[test]
fn no_background_sync_flag_wins_over_toml() {
    let toml = toml("[client]\nbackground_sync = true");
    let cli = cli_with_server(&["--no-background-sync"]);

    let options = ValidatedConfig::from_raw(&cli, Some(&toml)).unwrap().options;

    assert!(!options.background_sync);
}

#[test]
fn empty_secret_disables_signing() {
    let cli = cli_with_server(&["--secret", ""]);
    let options = ValidatedConfig::from_raw(&cli, None).unwrap().options;

    assert_eq!(options.secret, None);
}

#[test]
fn verbose_passes_through() {
    let config = ValidatedConfig::from_raw(&cli_with_server(&["-v"]), None).unwrap();

    assert!(config.verbose);
}

#[test]
fn display_hides_secret() {
    let cli = cli_with_server(&["--secret", "s3cr3t"]);
    let rendered = ValidatedConfig::from_raw(&cli, None).unwrap().to_string();

    assert!(rendered.contains("app=demo-service"));
    assert!(rendered.contains("poll_delay: 2s"));
    assert!(!rendered.contains("s3cr3t"));
}
