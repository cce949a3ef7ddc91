//! Command-line surface.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use domains::{Role, TicketCategory, TicketPriority, TicketStatus};
use serde::de::DeserializeOwned;
use services::PassTab;

/// Parses the stored spelling of a domain enum, e.g. `in_progress`.
fn stored<T: DeserializeOwned>(s: &str) -> Result<T, String> {
    serde_json::from_value(serde_json::Value::String(s.to_string()))
        .map_err(|_| format!("unrecognised value {s:?}"))
}

#[derive(Parser, Debug)]
#[command(name = "abos", version, about = "Building management dashboard store")]
pub struct Cli {
    /// Settings file layered over the defaults
    #[arg(long, global = true, default_value = configs::DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Act as this user instead of the demo user
    #[arg(long, global = true)]
    pub user: Option<String>,

    /// Only used together with --user
    #[arg(long, global = true)]
    pub email: Option<String>,

    /// Only used together with --user
    #[arg(long, global = true, value_parser = stored::<Role>, default_value = "resident")]
    pub role: Role,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Headline numbers for the acting user
    Summary,
    /// Seed empty collections, optionally wiping everything first
    Seed {
        #[arg(long)]
        reset: bool,
    },
    #[command(subcommand)]
    Buildings(BuildingsCommand),
    #[command(subcommand)]
    Tickets(TicketsCommand),
    #[command(subcommand)]
    Visitors(VisitorsCommand),
    #[command(subcommand)]
    Posts(PostsCommand),
    #[command(subcommand)]
    Notifications(NotificationsCommand),
}

#[derive(Args, Debug)]
pub struct Listing {
    #[arg(long)]
    pub building: Option<String>,
    #[arg(long)]
    pub search: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum BuildingsCommand {
    List {
        #[arg(long)]
        search: Option<String>,
    },
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        address: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum TicketsCommand {
    List {
        #[command(flatten)]
        listing: Listing,
        #[arg(long, value_parser = stored::<TicketStatus>)]
        status: Option<TicketStatus>,
    },
    Create {
        #[arg(long)]
        building: String,
        #[arg(long)]
        unit: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        #[arg(long, value_parser = stored::<TicketCategory>)]
        category: TicketCategory,
        #[arg(long, value_parser = stored::<TicketPriority>, default_value = "medium")]
        priority: TicketPriority,
    },
    Status {
        id: String,
        #[arg(value_parser = stored::<TicketStatus>)]
        status: TicketStatus,
    },
    Assign {
        id: String,
        /// Omit to unassign
        #[arg(long)]
        to: Option<String>,
    },
    Counts {
        #[arg(long)]
        building: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum VisitorsCommand {
    List {
        #[command(flatten)]
        listing: Listing,
        /// active, used or expired (expired includes revoked)
        #[arg(long, value_parser = stored::<PassTab>)]
        status: Option<PassTab>,
    },
    /// Find a pass by its gate code, e.g. PASS-3F9A07C2
    Lookup {
        code: String,
    },
    Issue {
        #[arg(long)]
        building: String,
        #[arg(long)]
        visitor: String,
        /// RFC 3339, e.g. 2026-05-10T10:00:00Z
        #[arg(long)]
        from: DateTime<Utc>,
        #[arg(long)]
        to: DateTime<Utc>,
    },
    Revoke {
        id: String,
    },
    Counts {
        #[arg(long)]
        building: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum PostsCommand {
    List(Listing),
    Publish {
        #[arg(long)]
        building: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
    },
    Like {
        id: String,
    },
    Comment {
        id: String,
        text: String,
    },
    Remove {
        id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum NotificationsCommand {
    List,
    Unread,
    Read { id: String },
    ReadAll,
}
