use clap::{Arg, ArgAction, Command};

/// Command line definition
pub fn build_cli() -> Command {
    Command::new("puppetserver-metrics")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Puppetserver metrics using terminal based graphics")
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Be more verbose")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("interval")
                .long("interval")
                .value_name("SECONDS")
                .help("The interval between updates in seconds")
                .value_parser(clap::value_parser!(u64).range(1..))
                .default_value("3"),
        )
        .arg(
            Arg::new("server")
                .long("server")
                .value_name("HOST")
                .help("The Puppetserver to use (default from puppet.conf, else 'puppet')"),
        )
        .arg(
            Arg::new("port")
                .long("port")
                .value_name("PORT")
                .help("The Puppetserver port (default 8140)")
                .value_parser(clap::value_parser!(u16).range(1..)),
        )
        .arg(
            Arg::new("key")
                .long("key")
                .value_name("FILE")
                .help("The SSL private key used for authentication")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(
            Arg::new("cert")
                .long("cert")
                .value_name("FILE")
                .help("The SSL client certificate")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(
            Arg::new("cacert")
                .long("cacert")
                .value_name("FILE")
                .help("The SSL certificate file to verify the peer")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(
            Arg::new("no-proxy")
                .long("no-proxy")
                .help("Ignore proxy environment variables")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("log-file")
                .long("log-file")
                .value_name("FILE")
                .help("Write log messages to FILE instead of stderr")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
}
