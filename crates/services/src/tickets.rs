//! Maintenance tickets.
//!
//! Creating a ticket is a two-step operation: the ticket write, then the
//! creator's `ticket_created` notification. The second step has its own
//! result so a failed notice never hides (or undoes) a stored ticket.

use std::sync::Arc;

use domains::{
    notification_kind, NewNotification, NewTicket, Notification, RecordId, Result, Session,
    Ticket, TicketCategory, TicketPriority, TicketStatus, UserId,
};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::{observe, required, Store};

/// What a resident fills in; the creator comes from the session.
#[derive(Debug, Clone)]
pub struct TicketDraft {
    pub building_id: RecordId,
    pub unit_id: RecordId,
    pub title: String,
    pub description: String,
    pub category: TicketCategory,
    pub priority: TicketPriority,
}

#[derive(Debug)]
pub struct TicketReceipt {
    pub ticket: Ticket,
    /// Outcome of the second write
    pub notification: Result<Notification>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketStatusCounts {
    pub all: usize,
    pub open: usize,
    pub in_progress: usize,
    /// Resolved and closed together
    pub resolved: usize,
}

impl TicketStatusCounts {
    pub fn tally(tickets: &[Ticket]) -> Self {
        let mut counts = Self {
            all: tickets.len(),
            ..Self::default()
        };
        for t in tickets {
            match t.status {
                TicketStatus::Open => counts.open += 1,
                TicketStatus::InProgress => counts.in_progress += 1,
                TicketStatus::Resolved | TicketStatus::Closed => counts.resolved += 1,
            }
        }
        counts
    }
}

/// The notice sent to a ticket's creator once it is stored.
pub fn creation_notice(ticket: &Ticket) -> NewNotification {
    let mut data = Map::new();
    data.insert("ticketId".to_string(), Value::String(ticket.id.to_string()));
    NewNotification {
        user_id: ticket.created_by_user_id.clone(),
        kind: notification_kind::TICKET_CREATED.to_string(),
        title: "Ticket created".to_string(),
        body: format!(
            "Your request \"{}\" has been registered successfully",
            ticket.title
        ),
        data,
    }
}

pub struct TicketService {
    store: Arc<Store>,
}

impl TicketService {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    pub async fn create_ticket(&self, session: &Session, draft: TicketDraft) -> Result<TicketReceipt> {
        let title = required("title", &draft.title)?;
        let description = required("description", &draft.description)?;

        let ticket = observe(
            "tickets.create",
            self.store
                .add_ticket(NewTicket {
                    building_id: draft.building_id,
                    unit_id: draft.unit_id,
                    created_by_user_id: session.user_id.clone(),
                    title,
                    description,
                    category: draft.category,
                    priority: draft.priority,
                })
                .await,
        )?;
        tracing::info!(ticket = %ticket.id, user = %session.user_id, "ticket created");

        let notification = observe(
            "tickets.notify_creator",
            self.store.add_notification(creation_notice(&ticket)).await,
        );

        Ok(TicketReceipt {
            ticket,
            notification,
        })
    }

    pub async fn list(&self, building: Option<&RecordId>) -> Result<Vec<Ticket>> {
        observe("tickets.list", self.store.list_tickets(building).await)
    }

    /// Case-insensitive match on title or description, optionally limited to
    /// one exact status. A blank term matches everything.
    pub async fn search(
        &self,
        building: Option<&RecordId>,
        status: Option<TicketStatus>,
        term: &str,
    ) -> Result<Vec<Ticket>> {
        let needle = term.trim().to_lowercase();
        let tickets = self.list(building).await?;
        Ok(tickets
            .into_iter()
            .filter(|t| status.map_or(true, |s| t.status == s))
            .filter(|t| {
                t.title.to_lowercase().contains(&needle)
                    || t.description.to_lowercase().contains(&needle)
            })
            .collect())
    }

    pub async fn update_status(&self, id: &RecordId, status: TicketStatus) -> Result<Option<Ticket>> {
        let updated = observe(
            "tickets.update_status",
            self.store.update_ticket_status(id, status).await,
        )?;
        if updated.is_none() {
            tracing::debug!(ticket = %id, "status change on unknown ticket");
        }
        Ok(updated)
    }

    pub async fn assign(&self, id: &RecordId, assignee: Option<UserId>) -> Result<Option<Ticket>> {
        observe("tickets.assign", self.store.assign_ticket(id, assignee).await)
    }

    pub async fn status_counts(&self, building: Option<&RecordId>) -> Result<TicketStatusCounts> {
        Ok(TicketStatusCounts::tally(&self.list(building).await?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ManualClock, SequentialIds};
    use chrono::Utc;
    use domains::{DomainError, Role};
    use storage_adapters::MemoryKeyValueStore;

    async fn service() -> (TicketService, Arc<Store>) {
        let store = Arc::new(
            Store::open(
                Arc::new(MemoryKeyValueStore::new()),
                Arc::new(ManualClock::new(Utc::now())),
                Arc::new(SequentialIds::new("x")),
            )
            .await
            .unwrap(),
        );
        (TicketService::new(store.clone()), store)
    }

    fn draft(title: &str, description: &str) -> TicketDraft {
        TicketDraft {
            building_id: "b1".into(),
            unit_id: "u1".into(),
            title: title.to_string(),
            description: description.to_string(),
            category: TicketCategory::Repair,
            priority: TicketPriority::High,
        }
    }

    #[tokio::test]
    async fn creation_notifies_the_creator() {
        let (svc, store) = service().await;
        let session = Session::new("resident-7", "ana@example.com", Role::Resident);

        let receipt = svc
            .create_ticket(&session, draft("  Broken intercom ", "No sound"))
            .await
            .unwrap();
        assert_eq!(receipt.ticket.title, "Broken intercom");
        assert_eq!(receipt.ticket.created_by_user_id, session.user_id);

        let notice = receipt.notification.unwrap();
        assert_eq!(notice.user_id, session.user_id);
        assert_eq!(notice.kind, "ticket_created");
        assert!(notice.body.contains("Broken intercom"));
        assert_eq!(notice.data["ticketId"], receipt.ticket.id.as_str());

        let inbox = store.list_notifications(Some(&session.user_id)).await.unwrap();
        assert_eq!(inbox.len(), 1);
    }

    #[tokio::test]
    async fn blank_fields_are_rejected_without_writes() {
        let (svc, store) = service().await;
        let err = svc
            .create_ticket(&Session::demo(), draft("   ", "desc"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert!(svc
            .create_ticket(&Session::demo(), draft("title", ""))
            .await
            .is_err());
        assert_eq!(store.list_tickets(None).await.unwrap().len(), 3);
        assert_eq!(store.list_notifications(None).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn search_matches_title_or_description() {
        let (svc, _) = service().await;
        let hits = svc.search(None, None, "LEAK").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id.as_str(), "t1");

        let hits = svc.search(None, None, "cooling").await.unwrap();
        assert_eq!(hits[0].id.as_str(), "t2");
        assert_eq!(svc.search(None, None, " ").await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn counts_fold_closed_into_resolved() {
        let (svc, _) = service().await;
        svc.update_status(&"t1".into(), TicketStatus::Closed)
            .await
            .unwrap()
            .unwrap();
        let counts = svc.status_counts(None).await.unwrap();
        assert_eq!(
            counts,
            TicketStatusCounts {
                all: 3,
                open: 0,
                in_progress: 1,
                resolved: 2,
            }
        );
    }

    #[tokio::test]
    async fn status_filter_matches_exactly() {
        let (svc, _) = service().await;
        let open = svc.search(None, Some(TicketStatus::Open), "").await.unwrap();
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].id.as_str(), "t1");

        svc.update_status(&"t1".into(), TicketStatus::Closed)
            .await
            .unwrap()
            .unwrap();
        let resolved = svc.search(None, Some(TicketStatus::Resolved), "").await.unwrap();
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].id.as_str(), "t3");
        assert_eq!(
            svc.search(None, Some(TicketStatus::Closed), "leak").await.unwrap()[0].id.as_str(),
            "t1"
        );
        assert!(svc
            .search(None, Some(TicketStatus::InProgress), "leak")
            .await
            .unwrap()
            .is_empty());
    }
}
