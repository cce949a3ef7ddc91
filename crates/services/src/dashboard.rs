//! Headline numbers for the dashboard home page.

use std::sync::Arc;

use domains::{Result, Session, Ticket, TicketStatus, VisitorPassStatus};
use serde::Serialize;

use crate::{observe, Store};

const RECENT_TICKETS: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub buildings: usize,
    pub open_tickets: usize,
    pub in_progress_tickets: usize,
    pub resolved_tickets: usize,
    pub active_visitors: usize,
    pub unread_notifications: usize,
    /// Newest first
    pub recent_tickets: Vec<Ticket>,
}

pub struct DashboardService {
    store: Arc<Store>,
}

impl DashboardService {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    pub async fn summary(&self, session: &Session) -> Result<DashboardSummary> {
        let buildings = observe("dashboard.buildings", self.store.list_buildings().await)?;
        let mut tickets = observe("dashboard.tickets", self.store.list_tickets(None).await)?;
        let passes = observe(
            "dashboard.visitors",
            self.store.list_visitor_passes(None).await,
        )?;
        let unread = observe(
            "dashboard.notifications",
            self.store.unread_count(&session.user_id).await,
        )?;

        let count = |status: TicketStatus| tickets.iter().filter(|t| t.status == status).count();
        let open_tickets = count(TicketStatus::Open);
        let in_progress_tickets = count(TicketStatus::InProgress);
        let resolved_tickets = count(TicketStatus::Resolved);

        tickets.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        tickets.truncate(RECENT_TICKETS);

        Ok(DashboardSummary {
            buildings: buildings.len(),
            open_tickets,
            in_progress_tickets,
            resolved_tickets,
            active_visitors: passes
                .iter()
                .filter(|p| p.status == VisitorPassStatus::Active)
                .count(),
            unread_notifications: unread,
            recent_tickets: tickets,
        })
    }
}
