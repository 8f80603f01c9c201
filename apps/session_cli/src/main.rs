mod bridge;
mod config;

use std::{io::Write, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use session_core::CredentialStore;
use shared::domain::CredentialRecord;

use crate::bridge::{runtime::run_script, script::parse_script};

/// Replays a scripted sequence of host events and user actions through the
/// session flow and prints the rendered view after every step.
#[derive(Parser, Debug)]
struct Args {
    /// JSON-lines file of script steps.
    #[arg(long)]
    script: PathBuf,
    /// Settings file; defaults to `session.toml` when present.
    #[arg(long)]
    config: Option<PathBuf>,
    /// JSON array of credentials loaded into the store before the script runs.
    #[arg(long)]
    credentials: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    let settings = config::load_settings(args.config.as_deref())?;
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&settings.log_filter))
        .with_writer(std::io::stderr)
        .init();

    let store = CredentialStore::global();
    if let Some(path) = &args.credentials {
        let raw = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read credentials '{}'", path.display()))?;
        let credentials: Vec<CredentialRecord> = serde_json::from_str(&raw)
            .with_context(|| format!("invalid credentials file '{}'", path.display()))?;
        store.load(credentials);
    }

    let raw = tokio::fs::read_to_string(&args.script)
        .await
        .with_context(|| format!("failed to read script '{}'", args.script.display()))?;
    let steps = parse_script(&raw)?;
    tracing::info!(steps = steps.len(), "replaying session script");

    let mut stdout = std::io::stdout().lock();
    let summary = run_script(steps, &settings, store, &mut stdout).await?;
    stdout.flush()?;

    tracing::info!(
        views = summary.views_written,
        rejected = summary.rejected,
        dropped = summary.dropped_signals,
        finished = summary.sessions_finished,
        signals = summary.signals.len(),
        "script finished"
    );
    Ok(())
}
