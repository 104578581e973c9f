use crate::config::{DatabaseConnections, Settings};

/// Run database migrations for the auth and audit databases
///
/// Needs only database settings; secrets are not loaded.
pub async fn run_migrations(settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Running database migrations...");

    let connections = DatabaseConnections::connect(settings).await?;
    connections.migrate().await?;

    tracing::info!("All migrations completed successfully");
    println!("✓ Migrations applied");

    Ok(())
}
