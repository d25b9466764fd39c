use anyhow::Context;
use clap::{Parser, Subcommand};
use uuid::Uuid;

use crate::auth::issue_token;
use crate::config::AppConfig;
use crate::database::{DatabaseManager, Repositories};
use crate::state::AppState;

#[derive(Parser)]
#[command(name = "budget-api")]
#[command(about = "Budget API - line item catalog and budget projects")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP server (default)")]
    Serve,

    #[command(about = "Print a signed bearer token for an existing user")]
    Token {
        #[arg(long, help = "User id to place in the token subject")]
        user_id: Uuid,
    },
}

pub async fn run(cli: Cli, config: AppConfig) -> anyhow::Result<()> {
    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config).await,
        Commands::Token { user_id } => {
            config.check()?;
            let token = issue_token(&config.security, user_id)?;
            println!("{}", token);
            Ok(())
        }
    }
}

async fn serve(config: AppConfig) -> anyhow::Result<()> {
    config.check()?;
    tracing::info!("Starting Budget API in {:?} mode", config.environment);

    let pool = DatabaseManager::connect(&config.database).await?;
    let bind_addr = config.bind_addr();
    let state = AppState::new(config, Repositories::postgres(pool));

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Budget API listening on http://{}", bind_addr);

    axum::serve(listener, crate::app(state)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_is_the_default() {
        let cli = Cli::try_parse_from(["budget-api"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn token_requires_a_uuid() {
        let id = Uuid::new_v4().to_string();
        let cli = Cli::try_parse_from(["budget-api", "token", "--user-id", &id]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Token { user_id }) if user_id.to_string() == id));
        assert!(Cli::try_parse_from(["budget-api", "token", "--user-id", "nope"]).is_err());
    }
}
