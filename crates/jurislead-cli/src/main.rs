use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use jurislead_core::Config;
use tracing_subscriber::EnvFilter;

mod commands;
mod display;

use commands::account::{GoogleLoginArgs, LoginArgs};
use commands::analyze::AnalyzeArgs;
use commands::explore::ExploreArgs;
use commands::history::HistoryAction;
use commands::summarize::{OcrArgs, SummarizeArgs};
use commands::timeline::TimelineAction;
use commands::App;

#[derive(Parser)]
#[command(name = "juris")]
#[command(version, about = "Juris-Lead: AI legal analysis and IPC reference", long_about = None)]
struct Cli {
    /// TOML config file.
    #[arg(long, global = true, env = "JURIS_CONFIG")]
    config: Option<PathBuf>,
    /// Backend base URL, overriding config and environment.
    #[arg(long, global = true)]
    base_url: Option<String>,
    /// Local storage file, overriding config and environment.
    #[arg(long, global = true)]
    storage: Option<PathBuf>,
    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search legal topics and IPC sections
    Explore(ExploreArgs),
    /// Show one IPC section with related sections
    Section { id: String },
    #[command(flatten)]
    Stored(StoredCommand),
}

/// Commands that open local storage and may call the backend.
#[derive(Subcommand)]
enum StoredCommand {
    /// Check whether the analysis service is reachable
    Health,
    /// Log in with email and password
    Login(LoginArgs),
    /// Log in with a Google access token
    GoogleLogin(GoogleLoginArgs),
    /// End the session
    Logout,
    /// Show the signed-in profile
    Profile {
        /// Fetch a fresh copy from the backend first.
        #[arg(long)]
        refresh: bool,
    },
    /// Analyze an incident for applicable IPC sections
    Analyze(AnalyzeArgs),
    /// Summarize a legal document
    Summarize(SummarizeArgs),
    /// Extract text from an image
    Ocr(OcrArgs),
    /// Activity history
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },
    /// Case timelines kept on this device
    Timeline {
        #[command(subcommand)]
        action: TimelineAction,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(
    file: Option<&Path>,
    base_url: Option<String>,
    storage: Option<PathBuf>,
) -> anyhow::Result<Config> {
    let mut config = Config::load(file).context("loading configuration")?;
    if let Some(url) = base_url {
        config.api_base_url = url;
    }
    if let Some(path) = storage {
        config.storage_path = path;
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let Cli {
        config,
        base_url,
        storage,
        verbose,
        command,
    } = Cli::parse();
    init_tracing(verbose);
    tracing::debug!("juris v{}", env!("CARGO_PKG_VERSION"));

    match command {
        // The reference commands work offline and need no session.
        Commands::Explore(args) => commands::explore::run(args),
        Commands::Section { id } => commands::explore::section(&id),
        Commands::Stored(command) => {
            let config = load_config(config.as_deref(), base_url, storage)?;
            let app = App::new(&config)?;
            dispatch(&app, command).await
        }
    }
}

async fn dispatch(app: &App, command: StoredCommand) -> anyhow::Result<()> {
    match command {
        StoredCommand::Health => commands::account::health(app).await,
        StoredCommand::Login(args) => commands::account::login(app, args).await,
        StoredCommand::GoogleLogin(args) => commands::account::google_login(app, args).await,
        StoredCommand::Logout => commands::account::logout(app).await,
        StoredCommand::Profile { refresh } => commands::account::profile(app, refresh).await,
        StoredCommand::Analyze(args) => commands::analyze::run(app, args).await,
        StoredCommand::Summarize(args) => commands::summarize::run(app, args).await,
        StoredCommand::Ocr(args) => commands::summarize::ocr(app, args).await,
        StoredCommand::History { action } => commands::history::run(app, action).await,
        StoredCommand::Timeline { action } => commands::timeline::run(app, action),
    }
}
