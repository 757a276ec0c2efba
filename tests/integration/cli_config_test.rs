// Integration tests for command line options flowing into the server configuration

use puppetserver_metrics::cli::build_cli;
use puppetserver_metrics::commands::dashboard::overrides_from;
use puppetserver_metrics::core::PuppetPaths;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn touch(path: &Path, contents: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn user_install(root: &Path) -> PuppetPaths {
    touch(&root.join("home/ssl/certs/ca.pem"), "ca");
    touch(&root.join("home/ssl/certs/bob.pem"), "cert");
    touch(&root.join("home/ssl/private_keys/bob.pem"), "key");
    touch(&root.join("home/puppet.conf"), "[main]\nserver = puppet.lan\n");
    PuppetPaths::new(
        Some(root.join("home")),
        root.join("system"),
        "bob",
        "workstation.lan",
    )
}

#[test]
fn test_defaults_come_from_puppet_conf() {
    let root = TempDir::new().unwrap();
    let paths = user_install(root.path());

    let matches = build_cli()
        .try_get_matches_from(["puppetserver-metrics"])
        .unwrap();
    let config = paths.resolve(&overrides_from(&matches)).unwrap();

    assert_eq!(config.base_url(), "https://puppet.lan:8140");
    assert_eq!(config.tls.cert, root.path().join("home/ssl/certs/bob.pem"));
    assert!(config.use_proxy);
}

#[test]
fn test_command_line_overrides_puppet_conf() {
    let root = TempDir::new().unwrap();
    let paths = user_install(root.path());
    let cert = root.path().join("elsewhere/cert.pem");
    touch(&cert, "cert");

    let matches = build_cli()
        .try_get_matches_from([
            "puppetserver-metrics",
            "--server",
            "compiler02.lan",
            "--port",
            "8141",
            "--cert",
            cert.to_str().unwrap(),
            "--no-proxy",
        ])
        .unwrap();
    let config = paths.resolve(&overrides_from(&matches)).unwrap();

    assert_eq!(config.base_url(), "https://compiler02.lan:8141");
    assert_eq!(config.tls.cert, cert);
    assert!(!config.use_proxy);
}

#[test]
fn test_missing_explicit_cacert_fails() {
    let root = TempDir::new().unwrap();
    let paths = user_install(root.path());
    let missing = root.path().join("nope.pem");

    let matches = build_cli()
        .try_get_matches_from(["puppetserver-metrics", "--cacert", missing.to_str().unwrap()])
        .unwrap();
    let err = paths.resolve(&overrides_from(&matches)).unwrap_err();

    assert!(err.to_string().contains("CA certificate"));
}
