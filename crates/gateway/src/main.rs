//! Civicspot - citizen registry backend.

use clap::{Parser, Subcommand};

use common::{logging, AppConfig, Settings};
use gateway_lib::MigrateAction;

#[derive(Parser)]
#[command(name = "civicspot")]
#[command(about = "Citizen registry backend")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Overrides CS_HTTP_SERVER
        #[arg(long)]
        host: Option<String>,
        /// Overrides CS_HTTP_PORT
        #[arg(long)]
        port: Option<u16>,
    },
    /// Database migration commands
    Migrate {
        #[command(subcommand)]
        action: MigrateCommand,
    },
}

#[derive(Subcommand, Clone, Copy)]
enum MigrateCommand {
    /// Run all pending migrations
    Up,
    /// Rollback the last migration
    Down,
    /// Show migration status
    Status,
    /// Drop all tables and re-run migrations
    Fresh,
}

impl From<MigrateCommand> for MigrateAction {
    fn from(command: MigrateCommand) -> Self {
        match command {
            MigrateCommand::Up => MigrateAction::Up,
            MigrateCommand::Down => MigrateAction::Down,
            MigrateCommand::Status => MigrateAction::Status,
            MigrateCommand::Fresh => MigrateAction::Fresh,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Reads .env before the environment
    let settings = Settings::from_env();
    let mut config = AppConfig::from_settings(&settings)?;
    logging::init(&config.log)?;

    match cli.command {
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.http.host = host;
            }
            if let Some(port) = port {
                config.http.port = port;
            }
            tracing::info!(environment = %config.environment, database = ?config.database, "starting");
            gateway_lib::run_server(&config).await?;
        }
        Commands::Migrate { action } => {
            gateway_lib::run_migrations(&config.database, action.into()).await?;
        }
    }

    Ok(())
}
