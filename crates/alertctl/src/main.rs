use clap::Parser;
use tracing_subscriber::{filter::LevelFilter, EnvFilter};

fn main() {
    let cli = alertctl::Cli::parse();

    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into()) // Otherwise it's ERROR.
        .from_env_lossy();

    tracing_subscriber::fmt::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(error) = cli.run() {
        tracing::error!(error = ?error, "execution failed");
        std::process::exit(1);
    }
}
