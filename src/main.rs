//! tasklist CLI
//!
//! Add, complete, filter, and delete prioritized tasks kept in a local
//! key-value store, and inspect that store directly.

use clap::Parser;
use tasklist::cli::Cli;
use tasklist::output::{emit_error, infer_command_name_from_args};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() {
    // Tracing is opt-in via RUST_LOG; invalid or huge filters are ignored.
    let filter = std::env::var("RUST_LOG")
        .ok()
        .and_then(|raw| {
            let raw = raw.trim();
            if raw.is_empty() || raw.len() > 4096 {
                return None;
            }
            EnvFilter::try_new(raw).ok()
        })
        .unwrap_or_else(|| EnvFilter::new("off"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let command = infer_command_name_from_args();
    let cli = Cli::parse();
    let json = cli.json;
    if let Err(err) = cli.run() {
        tracing::debug!(error = %err, command = %command, "command failed");
        let _ = emit_error(&command, &err, json);
        std::process::exit(err.exit_code());
    }
}
