//! Main entry point for the lead-tracker binary
//!
//! Reads lead batches produced by a lead source, classifies them against the
//! persisted tracking state and prints the result as JSON for the
//! presentation/export layer.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tokio::io::AsyncReadExt;

use lead_tracker::core::{DEFAULT_RECENT_WINDOW_HOURS, DEFAULT_STORE_KEY};
use lead_tracker::{FileBackend, LeadTracker, MemoryBackend, PersistenceBackend, TrackerConfig};
use shared::{logging, process_debug, ProcessId, RawLead};

/// Duplicate and change detection for business leads
#[derive(Parser)]
#[command(name = "lead-tracker")]
#[command(about = "Classifies business leads as new, unchanged duplicates or updates across runs")]
pub struct Args {
    /// Directory holding the tracked lead state
    #[arg(long, global = true, env = "LEAD_TRACKER_DATA_DIR", default_value = "./data")]
    pub data_dir: PathBuf,

    /// Key the tracked leads are stored under
    #[arg(long, global = true, env = "LEAD_TRACKER_STORE_KEY", default_value = DEFAULT_STORE_KEY)]
    pub store_key: String,

    /// Trailing window in hours for the recently-updated statistic
    #[arg(long, global = true, env = "LEAD_TRACKER_RECENT_HOURS", default_value_t = DEFAULT_RECENT_WINDOW_HOURS)]
    pub recent_hours: u32,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "LEAD_TRACKER_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Keep tracking state in memory only (nothing is read or written on disk)
    #[arg(long, global = true)]
    pub ephemeral: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Classify a JSON batch of leads (array, or object with a `leads` array)
    Ingest {
        /// Input file, or `-` for stdin
        #[arg(default_value = "-")]
        input: String,
    },
    /// Print statistics over every tracked lead
    Stats,
    /// Print every tracked record with statistics
    Export,
    /// Forget every tracked lead
    Reset {
        /// Confirm the destructive reset
        #[arg(long)]
        yes: bool,
    },
}

impl Args {
    fn config(&self) -> TrackerConfig {
        TrackerConfig {
            data_dir: self.data_dir.clone(),
            store_key: self.store_key.clone(),
            recent_window_hours: self.recent_hours,
            log_level: self.log_level.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine
    dotenv::dotenv().ok();
    let args = Args::parse();

    ProcessId::init_cli();
    logging::init_tracing_with_level(Some(&args.log_level));

    let config = args.config();
    let outcome = if args.ephemeral {
        logging::log_startup(ProcessId::current(), "lead tracker (in-memory state)");
        run(MemoryBackend::new(), &config, args.command).await
    } else {
        logging::log_startup(ProcessId::current(), &format!("lead tracker ({})", config.data_dir.display()));
        run(FileBackend::with_base_dir(config.data_dir.clone()), &config, args.command).await
    };

    match &outcome {
        Ok(()) => logging::log_shutdown(ProcessId::current(), "command complete"),
        Err(e) => logging::log_error(ProcessId::current(), "lead tracker command", e),
    }
    outcome
}

async fn run<B: PersistenceBackend>(backend: B, config: &TrackerConfig, command: Command) -> anyhow::Result<()> {
    let tracker = LeadTracker::open(backend, config).await?;

    match command {
        Command::Ingest { input } => {
            let text = read_input(&input)
                .await
                .with_context(|| format!("reading leads from {input}"))?;
            let leads = RawLead::parse_batch(&text).with_context(|| format!("parsing leads from {input}"))?;
            process_debug!(ProcessId::current(), "📥 Read {} leads from {}", leads.len(), input);

            let report = tracker.ingest(leads).await?;
            print_json(&report)?;

            // This process is about to exit, so unsaved state gets one retry here
            let retried = tracker
                .persist_pending()
                .await
                .context("tracked leads could not be persisted; the next run will see them as new")?;
            if retried {
                logging::log_success(ProcessId::current(), "Pending tracked leads persisted on retry");
            }
        }
        Command::Stats => print_json(&tracker.stats().await)?,
        Command::Export => print_json(&tracker.export().await)?,
        Command::Reset { yes } => {
            if !yes {
                anyhow::bail!("refusing to reset without --yes: this permanently forgets every tracked lead");
            }
            tracker.reset().await?;
            logging::log_success(ProcessId::current(), "All tracked leads cleared");
        }
    }

    Ok(())
}

async fn read_input(input: &str) -> std::io::Result<String> {
    if input == "-" {
        let mut text = String::new();
        tokio::io::stdin().read_to_string(&mut text).await?;
        Ok(text)
    } else {
        tokio::fs::read_to_string(input).await
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
