mod terminal;

use anyhow::Context;
use clap::{Parser, Subcommand};
use keynudge_engine::catalog::Catalog;
use keynudge_engine::cli::{self, OutputHandlers, StreamOptions};
use keynudge_engine::common::Response;
use keynudge_engine::config::{ConfigLoader, KeynudgeConfig};
use keynudge_engine::engine::RecommendationEngine;
use keynudge_engine::ledger::{LearnedLedger, YamlLedgerStore};
use keynudge_engine::manage::{AlwaysConfirm, ClearConfirmation, ClearOutcome, LearnedManager};
use keynudge_engine::presenter::{FixedResponse, PresentationSink};
use std::path::PathBuf;
use std::sync::Arc;
use terminal::{PromptConfirmation, PromptPresenter};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "keynudge", version, about = "Keyboard shortcut suggestions for editor interactions")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Config file (defaults to ./keynudge.yaml, then ~/.keynudge/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Shortcut catalog file, overriding the config
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Learned shortcuts file, overriding the config
    #[arg(long, global = true)]
    ledger: Option<PathBuf>,

    /// Log decisions at debug level
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Read interaction events (JSON lines) and suggest shortcuts
    Watch {
        /// Read events from this file and ask for answers on the terminal.
        /// Without it, events are read from stdin and suggestions only printed.
        #[arg(long)]
        events: Option<String>,

        /// With stdin events, treat every suggestion as acknowledged
        #[arg(long)]
        acknowledge_all: bool,

        /// Skip the tip of the day on startup
        #[arg(long)]
        no_tip: bool,

        /// Also print events that produced no suggestion
        #[arg(long)]
        show_skips: bool,
    },
    /// Manage learned shortcuts
    Learned {
        #[command(subcommand)]
        action: LearnedAction,
    },
    /// List the shortcut catalog
    Catalog {
        /// Only this interaction type (e.g. fileSave)
        #[arg(long = "type")]
        interaction_type: Option<String>,

        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum LearnedAction {
    /// List learned shortcuts
    List {
        #[arg(long)]
        json: bool,
    },
    /// Forget one learned shortcut so it can be suggested again
    Forget {
        #[arg(long)]
        keys: String,
        #[arg(long)]
        action: String,
    },
    /// Forget every learned shortcut
    Clear {
        /// Do not ask for confirmation
        #[arg(long)]
        yes: bool,
    },
}

const OUTPUT: OutputHandlers = OutputHandlers {
    out: |msg| println!("{}", msg),
    err: |msg| eprintln!("{}", msg),
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Logs go to stderr; stdout carries suggestions and listings.
    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let config = match &args.config {
        Some(path) => ConfigLoader::load_from(path)
            .await
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ConfigLoader::load_default().await.context("loading config")?,
    };

    match args.command {
        Command::Watch {
            events,
            acknowledge_all,
            no_tip,
            show_skips,
        } => {
            let catalog = load_catalog(args.catalog.as_ref(), &config).await?;
            let ledger = open_ledger(args.ledger.as_ref(), &config).await?;
            let sink: Arc<dyn PresentationSink> = if events.is_some() {
                Arc::new(PromptPresenter::new())
            } else {
                // Piped input leaves no terminal to answer on.
                Arc::new(FixedResponse(
                    acknowledge_all.then_some(Response::Acknowledge),
                ))
            };
            let tip = config.recommendations.tip_on_startup && !no_tip;
            let engine =
                RecommendationEngine::new(catalog, ledger, sink, config.recommendations);

            if tip {
                cli::tip_of_the_day(&engine, OUTPUT).await;
            }

            let options = StreamOptions {
                report_skips: show_skips,
                ..Default::default()
            };
            let summary = match events {
                Some(path) => cli::run_file(&engine, OUTPUT, &path, options).await,
                None => cli::run_stdin(&engine, OUTPUT, options).await,
            }
            .map_err(|e| anyhow::anyhow!("{}", e))?;

            tracing::info!(
                events = summary.events,
                presented = summary.presented,
                learned = summary.learned,
                errors = summary.errors,
                "Session finished"
            );
        }
        Command::Learned { action } => {
            let ledger = open_ledger(args.ledger.as_ref(), &config).await?;
            let manager = LearnedManager::new(ledger);
            run_learned(&manager, action).await?;
        }
        Command::Catalog {
            interaction_type,
            json,
        } => {
            let catalog = load_catalog(args.catalog.as_ref(), &config).await?;
            let records = match &interaction_type {
                Some(t) => catalog.shortcuts_for_type(t),
                None => catalog.all_records(),
            };
            if json {
                println!("{}", serde_json::to_string_pretty(records)?);
            } else {
                for record in records {
                    println!(
                        "{:<22} {:<20} {}",
                        record.interaction_type, record.shortcut_keys, record.action_description
                    );
                }
            }
        }
    }

    Ok(())
}

async fn load_catalog(
    override_path: Option<&PathBuf>,
    config: &KeynudgeConfig,
) -> anyhow::Result<Arc<Catalog>> {
    let catalog = match override_path.or(config.catalog.path.as_ref()) {
        Some(path) => Catalog::load(path).await?,
        None => Catalog::builtin(),
    };
    Ok(Arc::new(catalog))
}

async fn open_ledger(
    override_path: Option<&PathBuf>,
    config: &KeynudgeConfig,
) -> anyhow::Result<Arc<LearnedLedger>> {
    let path = override_path
        .cloned()
        .unwrap_or_else(|| config.storage.ledger_path());
    let ledger = LearnedLedger::open(Box::new(YamlLedgerStore::new(path.clone())))
        .await
        .with_context(|| format!("opening learned shortcuts {}", path.display()))?;
    Ok(Arc::new(ledger))
}

async fn run_learned(manager: &LearnedManager, action: LearnedAction) -> anyhow::Result<()> {
    match action {
        LearnedAction::List { json } => {
            let entries = manager.list();
            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else if entries.is_empty() {
                println!("No learned shortcuts.");
            } else {
                for entry in entries {
                    println!("{:<20} {}", entry.shortcut_keys, entry.action_description);
                }
            }
        }
        LearnedAction::Forget { keys, action } => {
            if manager.unlearn(&keys, &action).await? {
                println!("Forgot {} ({}).", keys, action);
            } else {
                println!("{} ({}) was not learned.", keys, action);
            }
        }
        LearnedAction::Clear { yes } => {
            let confirmation: Box<dyn ClearConfirmation> = if yes {
                Box::new(AlwaysConfirm)
            } else {
                Box::new(PromptConfirmation::new())
            };
            match manager.clear_all(confirmation.as_ref()).await? {
                ClearOutcome::Cleared { removed } => {
                    println!("Forgot {} learned shortcut(s).", removed)
                }
                ClearOutcome::Cancelled => println!("Cancelled."),
                ClearOutcome::AlreadyEmpty => println!("No learned shortcuts."),
            }
        }
    }
    Ok(())
}
