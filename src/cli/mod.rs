// CLI module for operating the auth core from a terminal

pub mod account;
pub mod maintenance;
pub mod migrate;

use clap::{Parser, Subcommand};

use crate::app_data::AppData;

/// Authledger CLI
#[derive(Parser)]
#[command(name = "authledger")]
#[command(about = "Account authentication and audit ledger", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Apply pending migrations to the auth and audit databases
    Migrate,

    /// Register a new account
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Log in and print an access/refresh token pair
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Revoke a token
    Logout {
        #[arg(long)]
        token: String,
    },

    /// Show the account an access token belongs to
    Whoami {
        #[arg(long)]
        token: String,
    },

    /// Delete revocation entries whose token has already expired
    PurgeRevoked,
}

impl Commands {
    /// Whether the command needs secrets and services, not just database connections
    pub fn needs_app_data(&self) -> bool {
        !matches!(self, Self::Migrate)
    }
}

/// Execute a CLI command that runs against a fully initialized [`AppData`]
pub async fn execute_command(
    command: Commands,
    app_data: &AppData,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Migrate => {
            app_data.connections.migrate().await?;
        }
        Commands::Register { email, password } => {
            account::register(&app_data.auth_service, email, password).await?;
        }
        Commands::Login { email, password } => {
            account::login(&app_data.auth_service, email, password).await?;
        }
        Commands::Logout { token } => {
            account::logout(&app_data.auth_service, &app_data.token_service, &token).await?;
        }
        Commands::Whoami { token } => {
            account::whoami(
                &app_data.auth_service,
                &app_data.token_service,
                app_data.revocation_store.as_ref(),
                &token,
            )
            .await?;
        }
        Commands::PurgeRevoked => {
            maintenance::purge_revoked(app_data.revocation_store.as_ref()).await?;
        }
    }

    Ok(())
}
