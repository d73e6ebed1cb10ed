//! CLI command definitions and dispatch.

pub mod filter;
pub mod inbox;
pub mod migrate;
pub mod subscription;

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use clap::{Args, Parser, Subcommand};
use tokio_util::sync::CancellationToken;

use crate::output::OutputFormat;
use msgcenter_core::config::AppConfig;
use msgcenter_core::error::AppError;
use msgcenter_core::result::AppResult;
use msgcenter_core::traits::{SecondaryIdentity, SecondaryIdentityResolver};
use msgcenter_database::DatabasePool;
use msgcenter_service::{RequestContext, UserServiceClient};

/// Message center: subscriptions and the unified inbox
#[derive(Debug, Parser)]
#[command(name = "msgcenter", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Apply database migrations
    Migrate,
    /// Subscription filter tools
    Filter(filter::FilterArgs),
    /// Subscription management
    Subscription(subscription::SubscriptionArgs),
    /// Inbox listing and read state
    Inbox(inbox::InboxArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        match &self.command {
            Commands::Migrate => migrate::execute(&self.config).await,
            Commands::Filter(args) => filter::execute(args),
            Commands::Subscription(args) => {
                subscription::execute(args, &self.config, self.format).await
            }
            Commands::Inbox(args) => inbox::execute(args, &self.config, self.format).await,
        }
    }
}

/// Who the command acts as.
#[derive(Debug, Clone, Args)]
pub struct ActorArgs {
    /// Internal user id
    #[arg(long = "user-id")]
    pub user_id: String,

    /// Owner name for subscriptions (defaults to the user id)
    #[arg(long = "user-name")]
    pub user_name: Option<String>,

    /// Use this Gitee login instead of asking the user service
    #[arg(long = "gitee-login")]
    pub gitee_login: Option<String>,
}

impl ActorArgs {
    /// Build a request context cancelled by Ctrl-C.
    pub fn context(&self) -> RequestContext {
        let user_name = self.user_name.clone().unwrap_or_else(|| self.user_id.clone());
        RequestContext::new(self.user_id.clone(), user_name).with_cancel(ctrl_c_token())
    }

    /// Pick the identity resolver: a fixed login when given, else the user service.
    pub fn resolver(&self, config: &AppConfig) -> AppResult<Arc<dyn SecondaryIdentityResolver>> {
        match &self.gitee_login {
            Some(login) => Ok(Arc::new(FixedIdentity(SecondaryIdentity::from_login(
                Some(login.as_str()),
            )))),
            None => Ok(Arc::new(UserServiceClient::new(&config.identity)?)),
        }
    }
}

/// Resolver that always answers with the login given on the command line.
struct FixedIdentity(SecondaryIdentity);

#[async_trait]
impl SecondaryIdentityResolver for FixedIdentity {
    async fn resolve(&self, _user_id: &str) -> AppResult<SecondaryIdentity> {
        Ok(self.0.clone())
    }
}

/// A token cancelled on the first Ctrl-C.
fn ctrl_c_token() -> CancellationToken {
    let token = CancellationToken::new();
    let child = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            child.cancel();
        }
    });
    token
}

/// Helper: load configuration from file and start logging
pub fn load_config(config_path: &str) -> Result<AppConfig, AppError> {
    let config = AppConfig::load(config_path)?;
    crate::init_logging(&config.logging);
    Ok(config)
}

/// Helper: create database pool from config
pub async fn create_db_pool(config: &AppConfig) -> Result<sqlx::PgPool, AppError> {
    let pool = DatabasePool::connect(&config.database).await?;
    Ok(pool.into_pool())
}

/// Read a JSON request body from `--json` or `--file` (`-` for stdin).
pub fn read_json_input(json: Option<&str>, file: Option<&PathBuf>) -> AppResult<String> {
    match (json, file) {
        (Some(json), None) => Ok(json.to_string()),
        (None, Some(path)) if path.as_os_str() == "-" => {
            std::io::read_to_string(std::io::stdin()).map_err(AppError::from)
        }
        (None, Some(path)) => std::fs::read_to_string(path).map_err(AppError::from),
        _ => Err(AppError::validation("pass exactly one of --json or --file")),
    }
}
