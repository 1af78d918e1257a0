//! casekit-admin: operator CLI for custom-attribute maintenance.
//!
//! Runs schema migrations, reconciliation batches, value merges, and
//! default-schema administration against the case database. Results are
//! printed to stdout as JSON; logs go to stderr (see [`config`]).

mod commands;
mod config;
mod telemetry;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::{error, info};

use crate::config::AdminConfig;

#[derive(Parser)]
#[command(name = "casekit-admin")]
#[command(author, version, about = "Custom-attribute maintenance for casekit")]
#[command(propagate_version = true)]
struct Cli {
    /// Database URL (overrides DATABASE_URL)
    #[arg(long, global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending schema migrations
    Migrate,

    /// Bring stored custom attributes in line with the defaults
    Reconcile {
        /// Object type (ioc, event, asset, task, note, evidence); all types if omitted
        object_type: Option<String>,
    },

    /// Check a custom-attribute document without touching the database
    Validate {
        /// Document to check ("-" for stdin)
        input: PathBuf,
    },

    /// Write values into an object's custom attributes
    Merge {
        /// Object type of the target
        #[arg(short = 't', long = "type")]
        object_type: String,

        /// Object id; fills a copy of the default template when omitted
        #[arg(short, long)]
        id: Option<i64>,

        /// JSON values, tab -> field -> value ("-" for stdin)
        input: PathBuf,
    },

    /// Administer default custom attributes
    #[command(subcommand)]
    Defaults(DefaultsCommand),
}

#[derive(Subcommand)]
enum DefaultsCommand {
    /// List every administered default
    List,

    /// Print the default schema of one object type
    Show {
        object_type: String,
    },

    /// Validate a document and store it as the default
    Set {
        object_type: String,

        /// Document to store ("-" for stdin)
        input: PathBuf,

        /// Reconcile existing objects after storing
        #[arg(long)]
        reconcile: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match AdminConfig::from_env() {
        Ok(config) => config.with_database_url(cli.database_url.clone()),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    let _log_guard = telemetry::init(&config.log);

    info!(
        log_file = config.log.file.as_deref().unwrap_or("(stderr)"),
        "Logging initialized"
    );

    match run(cli.command, &config).await {
        Ok(code) => code,
        Err(e) => {
            error!(error = %format!("{:#}", e), "Command failed");
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands, config: &AdminConfig) -> anyhow::Result<ExitCode> {
    match command {
        Commands::Validate { input } => commands::validate(&input),
        Commands::Migrate => commands::migrate(&commands::connect(config).await?).await,
        Commands::Reconcile { object_type } => {
            let db = commands::connect(config).await?;
            commands::reconcile(&db, object_type.as_deref()).await
        }
        Commands::Merge {
            object_type,
            id,
            input,
        } => {
            let db = commands::connect(config).await?;
            commands::merge(&db, &object_type, id, &input).await
        }
        Commands::Defaults(cmd) => {
            let db = commands::connect(config).await?;
            match cmd {
                DefaultsCommand::List => commands::list_defaults(&db).await,
                DefaultsCommand::Show { object_type } => {
                    commands::show_default(&db, &object_type).await
                }
                DefaultsCommand::Set {
                    object_type,
                    input,
                    reconcile,
                } => commands::set_default(&db, &object_type, &input, reconcile).await,
            }
        }
    }
}
