//! Runs one parsed command against the services and prints the result as
//! JSON on stdout.

use std::sync::Arc;

use anyhow::bail;
use domains::{RecordId, Session, UserId, VisitorPass};
use serde::Serialize;
use services::{
    BuildingService, CommunityService, DashboardService, NotificationService, PassRequest,
    PostDraft, Store, TicketDraft, TicketService, VisitorService,
};

use crate::cli::{
    BuildingsCommand, Command, Listing, NotificationsCommand, PostsCommand, TicketsCommand,
    VisitorsCommand,
};

fn print<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Prints the record, or fails with a not-found message.
fn print_found<T: Serialize>(what: &str, id: &str, value: Option<T>) -> anyhow::Result<()> {
    match value {
        Some(v) => print(&v),
        None => bail!("{what} {id} not found"),
    }
}

/// A pass as listed, with its gate code alongside the stored fields.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PassRow {
    code: String,
    #[serde(flatten)]
    pass: VisitorPass,
}

impl From<VisitorPass> for PassRow {
    fn from(pass: VisitorPass) -> Self {
        Self {
            code: pass.pass_code(),
            pass,
        }
    }
}

fn building_filter(listing: &Listing) -> Option<RecordId> {
    listing.building.as_deref().map(RecordId::from)
}

pub async fn run(store: Arc<Store>, session: &Session, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Summary => {
            let summary = DashboardService::new(store).summary(session).await?;
            print(&summary)
        }
        Command::Seed { reset } => {
            if reset {
                store.reset().await?;
            }
            store.initialize().await?;
            let buildings = store.list_buildings().await?.len();
            tracing::info!(buildings, "seed complete");
            Ok(())
        }
        Command::Buildings(cmd) => buildings(BuildingService::new(store), session, cmd).await,
        Command::Tickets(cmd) => tickets(TicketService::new(store), session, cmd).await,
        Command::Visitors(cmd) => visitors(VisitorService::new(store), session, cmd).await,
        Command::Posts(cmd) => posts(CommunityService::new(store), session, cmd).await,
        Command::Notifications(cmd) => {
            notifications(NotificationService::new(store), session, cmd).await
        }
    }
}

async fn buildings(svc: BuildingService, session: &Session, cmd: BuildingsCommand) -> anyhow::Result<()> {
    match cmd {
        BuildingsCommand::List { search } => {
            let list = match search {
                Some(term) => svc.search(&term).await?,
                None => svc.list().await?,
            };
            print(&list)
        }
        BuildingsCommand::Add { name, address } => print(&svc.register(session, &name, &address).await?),
    }
}

async fn tickets(svc: TicketService, session: &Session, cmd: TicketsCommand) -> anyhow::Result<()> {
    match cmd {
        TicketsCommand::List { listing, status } => {
            let building = building_filter(&listing);
            let term = listing.search.unwrap_or_default();
            print(&svc.search(building.as_ref(), status, &term).await?)
        }
        TicketsCommand::Create {
            building,
            unit,
            title,
            description,
            category,
            priority,
        } => {
            let receipt = svc
                .create_ticket(
                    session,
                    TicketDraft {
                        building_id: building.into(),
                        unit_id: unit.into(),
                        title,
                        description,
                        category,
                        priority,
                    },
                )
                .await?;
            if let Err(e) = &receipt.notification {
                tracing::warn!(error = %e, "ticket stored but the creator was not notified");
            }
            print(&receipt.ticket)
        }
        TicketsCommand::Status { id, status } => {
            let updated = svc.update_status(&RecordId::from(id.as_str()), status).await?;
            print_found("ticket", &id, updated)
        }
        TicketsCommand::Assign { id, to } => {
            let updated = svc
                .assign(&RecordId::from(id.as_str()), to.map(UserId::from))
                .await?;
            print_found("ticket", &id, updated)
        }
        TicketsCommand::Counts { building } => {
            let building = building.map(RecordId::from);
            print(&svc.status_counts(building.as_ref()).await?)
        }
    }
}

async fn visitors(svc: VisitorService, session: &Session, cmd: VisitorsCommand) -> anyhow::Result<()> {
    match cmd {
        VisitorsCommand::List { listing, status } => {
            let building = building_filter(&listing);
            let term = listing.search.unwrap_or_default();
            let passes = svc.search(building.as_ref(), status, &term).await?;
            let rows: Vec<PassRow> = passes.into_iter().map(PassRow::from).collect();
            print(&rows)
        }
        VisitorsCommand::Lookup { code } => {
            let pass = svc.find_by_code(&code).await?;
            print_found("visitor pass", &code, pass.map(PassRow::from))
        }
        VisitorsCommand::Issue {
            building,
            visitor,
            from,
            to,
        } => {
            let pass = svc
                .issue_pass(
                    session,
                    PassRequest {
                        building_id: building.into(),
                        visitor_name: visitor,
                        valid_from: from,
                        valid_to: to,
                    },
                )
                .await?;
            print(&pass)
        }
        VisitorsCommand::Revoke { id } => {
            let revoked = svc.revoke(&RecordId::from(id.as_str())).await?;
            print_found("visitor pass", &id, revoked)
        }
        VisitorsCommand::Counts { building } => {
            let building = building.map(RecordId::from);
            print(&svc.status_counts(building.as_ref()).await?)
        }
    }
}

async fn posts(svc: CommunityService, session: &Session, cmd: PostsCommand) -> anyhow::Result<()> {
    match cmd {
        PostsCommand::List(listing) => {
            let building = building_filter(&listing);
            let term = listing.search.unwrap_or_default();
            print(&svc.search(building.as_ref(), &term).await?)
        }
        PostsCommand::Publish {
            building,
            title,
            content,
        } => {
            let post = svc
                .publish(
                    session,
                    PostDraft {
                        building_id: building.into(),
                        title,
                        content,
                    },
                )
                .await?;
            print(&post)
        }
        PostsCommand::Like { id } => {
            let post = svc.toggle_like(session, &RecordId::from(id.as_str())).await?;
            print_found("post", &id, post)
        }
        PostsCommand::Comment { id, text } => {
            let comment = svc
                .comment(session, &RecordId::from(id.as_str()), &text)
                .await?;
            print_found("post", &id, comment)
        }
        PostsCommand::Remove { id } => {
            let post = svc.remove(&RecordId::from(id.as_str())).await?;
            print_found("post", &id, post)
        }
    }
}

async fn notifications(
    svc: NotificationService,
    session: &Session,
    cmd: NotificationsCommand,
) -> anyhow::Result<()> {
    match cmd {
        NotificationsCommand::List => print(&svc.inbox(session).await?),
        NotificationsCommand::Unread => print(&svc.unread_count(session).await?),
        NotificationsCommand::Read { id } => {
            let read = svc.mark_read(session, &RecordId::from(id.as_str())).await?;
            print_found("notification", &id, read)
        }
        NotificationsCommand::ReadAll => {
            let changed = svc.mark_all_read(session).await?;
            print(&serde_json::json!({ "marked": changed }))
        }
    }
}
