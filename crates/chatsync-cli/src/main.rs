use anyhow::{Context, Result};
use chatsync_application::SyncSession;
use chatsync_core::conversation::FeedbackTag;
use chatsync_core::remote::RemoteStore;
use chatsync_infrastructure::{ConfigService, HttpRemoteStore};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "chatsync")]
#[command(about = "chatsync - browse and edit remote conversation history", long_about = None)]
struct Cli {
    /// Remote store origin (overrides config file and CHATSYNC_BASE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Config file to read instead of ~/.config/chatsync/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether the remote store is reachable and configured
    Probe,
    /// List conversation history
    History {
        /// Number of pages to load
        #[arg(long, default_value_t = 1)]
        pages: usize,
    },
    /// Rename a conversation
    Rename { conversation_id: String, title: String },
    /// Delete a conversation
    Delete { conversation_id: String },
    /// Delete the whole history
    DeleteAll,
    /// Remove every message of a conversation
    Clear { conversation_id: String },
    /// Record feedback for an assistant message
    Feedback { message_id: String, tag: FeedbackTag },
    /// Ask a question; Ctrl-C cancels the pending answer
    Ask {
        text: String,
        /// Continue an existing conversation
        #[arg(long)]
        conversation: Option<String>,
    },
}

fn init_tracing(json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("chatsync=info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let config_service = match cli.config {
        Some(path) => ConfigService::with_path(path),
        None => ConfigService::new()?,
    };
    let mut config = config_service
        .get_config()
        .with_context(|| format!("Failed to load {}", config_service.path().display()))?;
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }
    tracing::debug!("[main] remote store at {}", config.base_url);

    let remote: Arc<dyn RemoteStore> = Arc::new(HttpRemoteStore::new(&config)?);
    let session = SyncSession::new(remote.clone(), &config);

    match cli.command {
        Commands::Probe => commands::probe::run(remote).await?,
        Commands::History { pages } => commands::history::run(&session, pages).await?,
        Commands::Rename {
            conversation_id,
            title,
        } => commands::mutate::rename(&session, &conversation_id, &title).await?,
        Commands::Delete { conversation_id } => {
            commands::mutate::delete(&session, &conversation_id).await?
        }
        Commands::DeleteAll => commands::mutate::delete_all(&session).await?,
        Commands::Clear { conversation_id } => {
            commands::mutate::clear(&session, &conversation_id).await?
        }
        Commands::Feedback { message_id, tag } => {
            commands::feedback::run(&session, &message_id, tag).await?
        }
        Commands::Ask { text, conversation } => {
            commands::ask::run(&session, &text, conversation.as_deref()).await?
        }
    }

    Ok(())
}
