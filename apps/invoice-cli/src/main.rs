//! invoice-cli binary
//!
//! Logs go to stderr; set `RUST_LOG` (or put it in `.env`) to change the level.

use anyhow::Result;
use clap::Parser;
use invoice_cli::{run, Args};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let summary = run(&args)?;
    tracing::info!(
        pages = summary.pages,
        bytes = summary.bytes,
        "Wrote {}",
        summary.output.display()
    );
    Ok(())
}
