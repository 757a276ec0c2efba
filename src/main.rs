use std::path::PathBuf;

use anyhow::Result;

use puppetserver_metrics::cli::build_cli;
use puppetserver_metrics::{commands, init_logging};

fn main() {
    let argv0 = std::env::args()
        .next()
        .and_then(|arg| {
            PathBuf::from(arg)
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
        })
        .unwrap_or_else(|| "puppetserver-metrics".to_string());

    if let Err(err) = run() {
        eprintln!("{}: {:#}", argv0, err);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let matches = build_cli().get_matches();

    init_logging(
        matches.get_flag("verbose"),
        matches.get_one::<PathBuf>("log-file").map(PathBuf::as_path),
    )?;

    commands::dashboard(&matches)
}
