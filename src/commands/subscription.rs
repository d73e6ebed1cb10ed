//! Subscription management CLI commands.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use msgcenter_core::error::AppError;
use msgcenter_core::types::SubscriptionId;
use msgcenter_database::repositories::SubscriptionRepository;
use msgcenter_entity::subscription::Subscription;
use msgcenter_filter::SubscribeRequest;
use msgcenter_service::SubscriptionService;

use super::ActorArgs;

/// Arguments for subscription commands
#[derive(Debug, Args)]
pub struct SubscriptionArgs {
    /// Acting user
    #[command(flatten)]
    pub actor: ActorArgs,

    /// Subscription subcommand
    #[command(subcommand)]
    pub command: SubscriptionCommand,
}

/// Subscription subcommands
#[derive(Debug, Subcommand)]
pub enum SubscriptionCommand {
    /// Compile and store a subscription
    Create {
        /// Request as inline JSON
        #[arg(long, conflicts_with = "file")]
        json: Option<String>,
        /// Request JSON file (`-` for stdin)
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// List own and default subscriptions
    List {
        /// Only this source
        #[arg(short, long)]
        source: Option<String>,
    },
    /// Rename a subscription
    Rename {
        /// Subscription id
        id: SubscriptionId,
        /// New name
        name: String,
    },
    /// Delete a subscription
    Delete {
        /// Subscription id
        id: SubscriptionId,
    },
}

/// Subscription display row for table output
#[derive(Debug, Serialize, Tabled)]
struct SubscriptionRow {
    /// Subscription ID
    id: String,
    /// Source
    source: String,
    /// Event type
    event_type: String,
    /// Name
    mode_name: String,
    /// Owner
    owner: String,
    /// Default
    is_default: bool,
    /// Filter document
    filter: String,
}

impl From<&Subscription> for SubscriptionRow {
    fn from(s: &Subscription) -> Self {
        Self {
            id: s.id.to_string(),
            source: s.source.clone(),
            event_type: s.event_type.clone(),
            mode_name: s.mode_name.clone(),
            owner: s.user_name.clone().unwrap_or_else(|| "-".to_string()),
            is_default: s.is_default,
            filter: s.mode_filter.to_string(),
        }
    }
}

/// Execute subscription commands
pub async fn execute(
    args: &SubscriptionArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;
    let pool = super::create_db_pool(&config).await?;
    let service = SubscriptionService::new(Arc::new(SubscriptionRepository::new(pool.clone())));
    let ctx = args.actor.context();

    match &args.command {
        SubscriptionCommand::Create { json, file } => {
            let raw = super::read_json_input(json.as_deref(), file.as_ref())?;
            let request: SubscribeRequest = serde_json::from_str(&raw)?;
            let subscription = service.create(&ctx, &request).await?;
            output::print_success(&format!("Subscription '{}' created", subscription.mode_name));
            output::print_list(&[SubscriptionRow::from(&subscription)], format);
        }
        SubscriptionCommand::List { source } => {
            let subscriptions = service.list(&ctx, source.as_deref()).await?;
            let rows: Vec<SubscriptionRow> = subscriptions.iter().map(SubscriptionRow::from).collect();
            output::print_list(&rows, format);
        }
        SubscriptionCommand::Rename { id, name } => {
            let subscription = service.rename(&ctx, *id, name).await?;
            output::print_success(&format!("Subscription {id} renamed to '{}'", subscription.mode_name));
        }
        SubscriptionCommand::Delete { id } => {
            service.delete(&ctx, *id).await?;
            output::print_success(&format!("Subscription {id} deleted"));
        }
    }

    pool.close().await;
    Ok(())
}
