mod cli;
mod config;
mod contact;
mod controller;
mod github;
mod nav;
mod page;
mod repos;
mod storage;
mod task;
mod theme;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn default_filter(output: &cli::OutputOptions) -> &'static str {
    if output.quiet {
        "warn"
    } else if output.verbose {
        "folio=debug,info"
    } else {
        "folio=info,warn"
    }
}

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();

    // Initialize logging; stdout is reserved for command output
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter(&cli.output).into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::debug!("Starting Folio v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = cli::run(cli).await {
        cli::print_error(&e);
        std::process::exit(1);
    }
}
