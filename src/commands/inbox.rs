//! Inbox CLI commands.

use std::sync::Arc;

use clap::{Args, Subcommand, ValueEnum};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use msgcenter_core::error::AppError;
use msgcenter_core::types::PageRequest;
use msgcenter_database::query::{InboxFilter, InboxView, MeetingWindow};
use msgcenter_database::repositories::InboxRepository;
use msgcenter_entity::inbox::InboxMessage;
use msgcenter_service::InboxService;

use super::ActorArgs;

/// Arguments for inbox commands
#[derive(Debug, Args)]
pub struct InboxArgs {
    /// Acting user
    #[command(flatten)]
    pub actor: ActorArgs,

    /// Inbox subcommand
    #[command(subcommand)]
    pub command: InboxCommand,
}

/// Inbox subcommands
#[derive(Debug, Subcommand)]
pub enum InboxCommand {
    /// List one page of an inbox view
    List {
        /// Filters
        #[command(flatten)]
        filter: FilterArgs,
        /// Page number (1-based; smaller values mean the first page)
        #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
        page: i64,
        /// Rows per page (defaults to `inbox.default_page_size`)
        #[arg(long)]
        page_size: Option<u64>,
    },
    /// Mark matching rows read
    Read {
        /// Filters
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Mark matching to-do rows done
    Done {
        /// Filters
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Remove matching rows
    Remove {
        /// Filters
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Mark everything read across all channels
    ReadAll,
}

/// CLI spelling of [`MeetingWindow`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum WindowArg {
    /// Not started yet
    Upcoming,
    /// Already started
    Past,
}

/// View selection and row filters shared by every inbox subcommand.
#[derive(Debug, Clone, Args)]
pub struct FilterArgs {
    /// Inbox view: follow, related, todo, todo-latest, meeting or all
    #[arg(long, default_value = "all")]
    pub view: InboxView,
    /// Source tag or URI
    #[arg(long)]
    pub source: Option<String>,
    /// Read state
    #[arg(long)]
    pub is_read: Option<bool>,
    /// Done state (to-do views)
    #[arg(long)]
    pub is_done: Option<bool>,
    /// Keep only (true) or drop (false) bot activity
    #[arg(long)]
    pub is_bot: Option<bool>,
    /// RFC 3339 lower bound on event time
    #[arg(long)]
    pub since: Option<String>,
    /// Meeting window (meeting view)
    #[arg(long, value_enum)]
    pub meeting: Option<WindowArg>,
    /// Only these keys, comma separated: event ids, or business ids on
    /// to-do views (not accepted by the `all` view)
    #[arg(long, value_delimiter = ',')]
    pub keys: Option<Vec<String>>,
}

impl FilterArgs {
    fn to_filter(&self) -> InboxFilter {
        InboxFilter {
            source: self.source.clone(),
            is_read: self.is_read,
            is_done: self.is_done,
            is_bot: self.is_bot,
            start_time: self.since.clone(),
            meeting: self.meeting.map(|m| match m {
                WindowArg::Upcoming => MeetingWindow::Upcoming,
                WindowArg::Past => MeetingWindow::Past,
            }),
            keys: self.keys.clone(),
        }
    }
}

/// Inbox display row for table output
#[derive(Debug, Serialize, Tabled)]
struct InboxRow {
    /// Channel
    channel: String,
    /// Event time
    time: String,
    /// Source
    source: String,
    /// Type
    event_type: String,
    /// Title
    title: String,
    /// Actor
    actor: String,
    /// Read
    read: bool,
    /// Done
    done: String,
    /// Key
    key: String,
}

impl From<&InboxMessage> for InboxRow {
    fn from(m: &InboxMessage) -> Self {
        Self {
            channel: m.channel.clone(),
            time: m.event_time.format("%Y-%m-%d %H:%M").to_string(),
            source: m.source.clone(),
            event_type: m.event_type.clone(),
            title: m.title.clone(),
            actor: m.actor.clone(),
            read: m.is_read,
            done: m.is_done.map(|d| d.to_string()).unwrap_or_else(|| "-".into()),
            key: m.key().to_string(),
        }
    }
}

/// Execute inbox commands
pub async fn execute(args: &InboxArgs, config_path: &str, format: OutputFormat) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;
    let resolver = args.actor.resolver(&config)?;
    let pool = super::create_db_pool(&config).await?;
    let service = InboxService::new(Arc::new(InboxRepository::new(pool.clone())), resolver);
    let ctx = args.actor.context();

    match &args.command {
        InboxCommand::List {
            filter,
            page,
            page_size,
        } => {
            let page = PageRequest::new(
                (*page).max(1) as u64,
                page_size.unwrap_or(config.inbox.default_page_size),
            );
            let result = service
                .list(&ctx, filter.view, &filter.to_filter(), page)
                .await?;

            match format {
                OutputFormat::Json => output::print_json(&result),
                OutputFormat::Table => {
                    let rows: Vec<InboxRow> = result.items.iter().map(InboxRow::from).collect();
                    output::print_list(&rows, format);
                    output::print_kv("page", &format!("{} / {}", result.page, result.total_pages));
                    output::print_kv("totalCount", &result.total_count.to_string());
                }
            }
        }
        InboxCommand::Read { filter } => {
            let affected = service
                .mark_read(&ctx, filter.view, &filter.to_filter())
                .await?;
            output::print_success(&format!("{affected} row(s) marked read"));
        }
        InboxCommand::Done { filter } => {
            let affected = service
                .mark_done(&ctx, filter.view, &filter.to_filter())
                .await?;
            output::print_success(&format!("{affected} row(s) marked done"));
        }
        InboxCommand::Remove { filter } => {
            let affected = service
                .remove(&ctx, filter.view, &filter.to_filter())
                .await?;
            output::print_success(&format!("{affected} row(s) removed"));
        }
        InboxCommand::ReadAll => {
            let affected = service.mark_all_read(&ctx).await?;
            output::print_success(&format!("{affected} row(s) marked read"));
        }
    }

    pool.close().await;
    Ok(())
}
