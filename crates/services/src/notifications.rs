//! A user's notification inbox.

use std::sync::Arc;

use domains::{Notification, RecordId, Result, Session};

use crate::{observe, Store};

pub struct NotificationService {
    store: Arc<Store>,
}

impl NotificationService {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    /// Newest first.
    pub async fn inbox(&self, session: &Session) -> Result<Vec<Notification>> {
        observe(
            "notifications.inbox",
            self.store.list_notifications(Some(&session.user_id)).await,
        )
    }

    pub async fn unread_count(&self, session: &Session) -> Result<usize> {
        observe(
            "notifications.unread_count",
            self.store.unread_count(&session.user_id).await,
        )
    }

    /// `Ok(None)` if the id is unknown or belongs to another user.
    pub async fn mark_read(&self, session: &Session, id: &RecordId) -> Result<Option<Notification>> {
        let owned = self
            .inbox(session)
            .await?
            .iter()
            .any(|n| &n.id == id);
        if !owned {
            return Ok(None);
        }
        observe("notifications.mark_read", self.store.mark_read(id).await)
    }

    pub async fn mark_all_read(&self, session: &Session) -> Result<usize> {
        let changed = observe(
            "notifications.mark_all_read",
            self.store.mark_all_read(&session.user_id).await,
        )?;
        tracing::debug!(user = %session.user_id, changed, "notifications marked read");
        Ok(changed)
    }
}
