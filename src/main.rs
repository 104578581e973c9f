use std::sync::Arc;

use clap::Parser;

use authledger_backend::app_data::AppData;
use authledger_backend::cli::{self, Cli};
use authledger_backend::config::{DatabaseConnections, SecretManager, Settings, init_logging};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    init_logging()?;

    let cli = Cli::parse();
    let settings = Settings::from_env()?;
    tracing::debug!(?settings, "Settings loaded");

    if !cli.command.needs_app_data() {
        return cli::migrate::run_migrations(&settings).await;
    }

    let secret_manager = Arc::new(SecretManager::init()?);
    tracing::debug!("{}", secret_manager);

    let connections = DatabaseConnections::connect(&settings).await?;
    connections.migrate().await?;

    let app_data = AppData::init(connections, secret_manager, &settings);

    if let Err(e) = cli::execute_command(cli.command, &app_data).await {
        tracing::error!("Command failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    Ok(())
}
