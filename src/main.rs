use anyhow::Result;
use clap::Parser;
use pocketbook::cli::Cli;
use tracing_subscriber::EnvFilter;

/// Log to stderr so command output on stdout stays clean.
/// `RUST_LOG` overrides the level picked from `--verbose`.
fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "pocketbook=info"
    } else {
        "pocketbook=warn"
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    cli.run().await
}
