//! CardShare CLI - command-line client for the CardShare backend.
//!
//! Drives the same request client, device store and session handling the
//! mobile app uses, which makes it handy for scripting and for poking at a
//! backend while developing against it.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::style;
use tracing::{info, warn};

use cs_core::config::AppConfig;
use cs_core::constants::{APP_NAME, APP_VERSION};
use cs_core::error::CsResult;
use cs_core::logging;

/// CardShare - digital business cards, credits and vouchers.
#[derive(Parser)]
#[command(
    name = "cardshare",
    version,
    about = "CardShare client CLI",
    long_about = "A command-line client for the CardShare backend.\n\
                  Manage your cards, credits, vouchers and groups from a terminal."
)]
struct Cli {
    /// Path to the configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Legacy app manifest to read `extra.apiUrl` from.
    #[arg(long, global = true)]
    manifest: Option<PathBuf>,

    /// Enable verbose logging (debug level).
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (text, json).
    #[arg(short = 'f', long, global = true, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// JSON output for scripting.
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the resolved backend, its health and the local session.
    Status,
    /// Log in with a phone number or email address.
    Login {
        /// Phone number or email (prompted when omitted).
        identifier: Option<String>,
        /// Password (prompted when omitted).
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Forget the stored session.
    Logout,
    /// Show the cached user without contacting the backend.
    Whoami,
    /// Fetch the current user's profile.
    Profile,
    /// Business cards.
    Cards {
        #[command(subcommand)]
        action: commands::cards::CardsAction,
    },
    /// Credit balance and transfers.
    Credits {
        #[command(subcommand)]
        action: commands::credits::CreditsAction,
    },
    /// Buy and redeem vouchers.
    Vouchers {
        #[command(subcommand)]
        action: commands::vouchers::VouchersAction,
    },
    /// Groups you belong to.
    Groups {
        #[command(subcommand)]
        action: commands::groups::GroupsAction,
    },
    /// Direct messages.
    Messages {
        #[command(subcommand)]
        action: commands::messages::MessagesAction,
    },
    /// Sponsored ads.
    Ads {
        #[command(subcommand)]
        action: commands::ads::AdsAction,
    },
    /// Push notification registration and inbox.
    Notify {
        #[command(subcommand)]
        action: commands::notify::NotifyAction,
    },
    /// Inspect and edit the device store.
    Store {
        #[command(subcommand)]
        action: commands::store::StoreAction,
    },
    /// Send a raw request through the client.
    Request {
        /// HTTP method (GET, POST, PUT, PATCH, DELETE).
        method: String,
        /// Route under the API prefix, e.g. /cards.
        path: String,
        /// JSON body.
        #[arg(short, long)]
        body: Option<String>,
        /// Make a single attempt.
        #[arg(long)]
        no_retry: bool,
    },
}

impl Commands {
    /// Commands that talk to authenticated routes.
    fn needs_session(&self) -> bool {
        !matches!(
            self,
            Commands::Status
                | Commands::Login { .. }
                | Commands::Logout
                | Commands::Whoami
                | Commands::Store { .. }
        )
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("{} {}", style("error:").red().bold(), e.user_message());
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> CsResult<()> {
    // Load configuration
    let config = match &cli.config {
        Some(path) => AppConfig::load_from_file(path)?,
        None => AppConfig::load_default()?,
    };

    // Initialize logging; fall back to the console when the log dir is unusable
    let _guard = match config
        .effective_log_dir()
        .and_then(|dir| logging::init_from_config(&config.logging, &dir, cli.verbose))
    {
        Ok(guard) => Some(guard),
        Err(e) => {
            logging::init_console_logging(if cli.verbose { "debug" } else { "warn" });
            warn!("file logging unavailable: {e}");
            None
        }
    };

    info!("{APP_NAME} CLI v{APP_VERSION}");

    let ctx = commands::Context::open(config, cli.manifest.as_deref())?;
    if cli.command.needs_session() {
        ctx.ensure_session().await?;
    }

    // Dispatch to command handlers
    match cli.command {
        Commands::Status => commands::status::run(&ctx, cli.format).await,
        Commands::Login { identifier, password } => {
            commands::auth::login(&ctx, identifier, password, cli.format).await
        }
        Commands::Logout => commands::auth::logout(&ctx),
        Commands::Whoami => commands::auth::whoami(&ctx, cli.format),
        Commands::Profile => commands::auth::profile(&ctx, cli.format).await,
        Commands::Cards { action } => commands::cards::run(&ctx, action, cli.format).await,
        Commands::Credits { action } => commands::credits::run(&ctx, action, cli.format).await,
        Commands::Vouchers { action } => commands::vouchers::run(&ctx, action, cli.format).await,
        Commands::Groups { action } => commands::groups::run(&ctx, action, cli.format).await,
        Commands::Messages { action } => commands::messages::run(&ctx, action, cli.format).await,
        Commands::Ads { action } => commands::ads::run(&ctx, action, cli.format).await,
        Commands::Notify { action } => commands::notify::run(&ctx, action, cli.format).await,
        Commands::Store { action } => commands::store::run(&ctx, action, cli.format),
        Commands::Request { method, path, body, no_retry } => {
            commands::request::run(&ctx, &method, &path, body, no_retry, cli.format).await
        }
    }
}
