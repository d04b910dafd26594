use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::core::config::{load_config, AppConfig};
use crate::core::ledger::UsageLedger;
use crate::core::message::Message;
use crate::core::prompt::{build_context, ResponseLength, ResponseStyle};
use crate::core::session::SessionLog;
use crate::export::{encode_for_download, TranscriptExporter};


#[derive(Parser, Debug)]
#[command(name = "chatledger", version, about = "Chat session bookkeeping and transcript export")]
struct Cli {
    /// Working directory (where a local chatledger.json is looked up)
    #[arg(short = 'c', long = "cwd", env = "CHATLEDGER_CWD")]
    working_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay a recorded session log and export the transcript as a PDF
    Export {
        /// Path to the session log JSON written by the chat frontend
        session_log: PathBuf,

        /// Output path for the PDF (defaults to the configured filename)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also write an HTML download link with the document inlined as base64
        #[arg(long)]
        link: Option<PathBuf>,

        /// Leave the system/context message out of the exported table
        #[arg(long)]
        no_context: bool,
    },

    /// Price a single exchange at the configured token rates
    Cost {
        prompt_tokens: i64,
        completion_tokens: i64,
    },

    /// Assemble the system/context message for a new session
    Context {
        /// Writing style the assistant is asked to answer in
        #[arg(long, value_enum)]
        style: Option<ResponseStyle>,

        /// Response length cap
        #[arg(long, value_enum)]
        length: Option<ResponseLength>,

        /// Uploaded reference document to embed in the context
        #[arg(long)]
        document: Option<PathBuf>,
    },
}

pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config = load_config(cli.working_dir.clone()).context("failed to load configuration")?;

    match cli.command {
        Command::Export {
            session_log,
            output,
            link,
            no_context,
        } => run_export(&config, &session_log, output, link, no_context),
        Command::Cost {
            prompt_tokens,
            completion_tokens,
        } => run_cost(&config, prompt_tokens, completion_tokens),
        Command::Context {
            style,
            length,
            document,
        } => run_context(&config, style, length, document),
    }
}

fn run_context(
    config: &AppConfig,
    style: Option<ResponseStyle>,
    length: Option<ResponseLength>,
    document: Option<PathBuf>,
) -> Result<()> {
    let document_text = match document {
        Some(path) => Some(
            std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read document {}", path.display()))?,
        ),
        None => None,
    };

    let context = build_context(
        style.unwrap_or(config.assistant.style),
        length.unwrap_or(config.assistant.length),
        document_text.as_deref(),
    );
    println!("{context}");
    Ok(())
}

fn run_export(
    config: &AppConfig,
    log_path: &PathBuf,
    output: Option<PathBuf>,
    link: Option<PathBuf>,
    no_context: bool,
) -> Result<()> {
    let content = std::fs::read_to_string(log_path)
        .with_context(|| format!("failed to read session log {}", log_path.display()))?;
    let log = SessionLog::from_json(&content).context("invalid session log")?;

    let session = log.replay(config.pricing).context("failed to replay session")?;
    let summary = session.summary(config.timezone()?);

    println!("session:      {}", session.id);
    println!("finished at:  {}", summary.timestamp.format("%Y-%m-%d %H:%M:%S %:z"));
    println!("exchanges:    {}", log.exchanges.len());
    println!("total tokens: {}", summary.total_tokens);
    println!("total cost:   ${}", summary.total_cost);

    let include_context = config.export.include_context && !no_context;
    let messages: Vec<Message> = if include_context {
        summary.messages.clone()
    } else {
        summary
            .messages
            .iter()
            .filter(|m| m.role != crate::core::message::MessageRole::System)
            .cloned()
            .collect()
    };

    let exporter = TranscriptExporter::default();
    let document = exporter.render(&messages).context("transcript export failed")?;
    info!(bytes = document.len(), "rendered transcript");

    let out_path = output.unwrap_or_else(|| PathBuf::from(&config.export.filename));
    std::fs::write(&out_path, &document)
        .with_context(|| format!("failed to write {}", out_path.display()))?;
    println!("wrote {}", out_path.display());

    if let Some(link_path) = link {
        let filename = out_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| config.export.filename.clone());
        let payload = encode_for_download(&document, &filename);
        std::fs::write(&link_path, payload.html_link("Download conversation history"))
            .with_context(|| format!("failed to write {}", link_path.display()))?;
        println!("wrote {}", link_path.display());
    }

    Ok(())
}

fn run_cost(config: &AppConfig, prompt_tokens: i64, completion_tokens: i64) -> Result<()> {
    let mut ledger = UsageLedger::new(config.pricing);
    ledger.record(prompt_tokens, completion_tokens)?;

    println!("total tokens: {}", ledger.total_tokens());
    println!("total cost:   ${}", ledger.total_cost());
    Ok(())
}
