//! Command-line front end for the field call intake agent.

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use fieldcrm::{StderrProgress, compliance_notice, init_logging, rep_banner};
use fieldcrm_config::CrmConfig;
use fieldcrm_core::CrmAgent;
use fieldcrm_core::bootstrap::build_connector;
use fieldcrm_protocol::{CallDate, CallId, SubmitRequest, SubmitResponse};
use fieldcrm_store::RecordStore;
use log::{debug, info};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "fieldcrm", version, about = "Log analyzed field calls to the CRM")]
struct Cli {
    /// Path to a fieldcrm.json5 config file; layered lookup from cwd otherwise
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the next call ID
    NextId,
    /// Analyze a visit note and save it
    Submit {
        #[arg(long)]
        hcp_id: String,
        /// Visit note text
        #[arg(long, conflicts_with = "note_file", required_unless_present = "note_file")]
        note: Option<String>,
        /// File holding the visit note
        #[arg(long)]
        note_file: Option<PathBuf>,
        /// Reuse an existing call ID to update it; allocated when omitted
        #[arg(long)]
        call_id: Option<String>,
        /// Defaults to the configured rep
        #[arg(long)]
        rep_id: Option<String>,
        /// DD/MM/YYYY or YYYY-MM-DD; defaults to today
        #[arg(long)]
        date: Option<String>,
    },
    /// Print the most recent records as JSON
    Recent {
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;

    match cli.command {
        Command::NextId => {
            let store = RecordStore::new(build_connector(&config.store));
            println!("{}", store.allocate_next_id());
        }
        Command::Recent { limit } => {
            let store = RecordStore::new(build_connector(&config.store));
            let rows = store.read_recent(limit.unwrap_or(config.store.recent_limit));
            println!(
                "{}",
                serde_json::to_string_pretty(&rows).context("failed to encode rows")?
            );
        }
        Command::Submit {
            hcp_id,
            note,
            note_file,
            call_id,
            rep_id,
            date,
        } => {
            eprintln!("{}", rep_banner(&config.rep));
            let agent = CrmAgent::from_config(&config)
                .context("failed to build call agent")?
                .with_event_sink(Arc::new(StderrProgress));
            let raw_note = match (note, note_file) {
                (Some(note), _) => note,
                (None, Some(path)) => std::fs::read_to_string(&path)
                    .with_context(|| format!("failed to read note file {}", path.display()))?,
                (None, None) => bail!("either --note or --note-file is required"),
            };
            let call_id = match call_id {
                Some(raw) => CallId::parse(&raw)
                    .with_context(|| format!("invalid call id: {raw}"))?,
                None => agent.allocate_next_id(),
            };
            let call_date = match date {
                Some(raw) => {
                    CallDate::parse(&raw).with_context(|| format!("invalid date: {raw}"))?
                }
                None => CallDate::today(),
            };
            let request = SubmitRequest {
                call_id,
                hcp_id,
                rep_id: rep_id.unwrap_or_else(|| config.rep.id.clone()),
                call_date,
                raw_note,
            };

            let response = match request.check_intake() {
                Ok(()) => {
                    info!("submitting call (call_id={})", request.call_id);
                    agent.submit(&request).await
                }
                Err(err) => SubmitResponse::Failed {
                    error: err.to_string(),
                },
            };
            if let Some(notice) = compliance_notice(&response) {
                eprintln!("{notice}");
            }
            println!(
                "{}",
                serde_json::to_string_pretty(&response).context("failed to encode response")?
            );
            if !response.is_success() {
                std::process::exit(1);
            }
        }
    }
    Ok(())
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<CrmConfig> {
    if let Some(path) = path {
        return CrmConfig::load_from_path(path).context("failed to load config");
    }
    let cwd = std::env::current_dir().context("cwd")?;
    let layered = CrmConfig::load_layered(&cwd).context("failed to load layered config")?;
    debug!("layered config loaded (layers={})", layered.layers.len());
    Ok(layered.config)
}
