//! # Store
//!
//! The persistence/query layer. Every collection lives under one key of the
//! underlying `KeyValueStore` as a JSON array. Each mutation reads the whole
//! collection, changes it in memory and writes the whole collection back.
//!
//! Lifecycle: `Store::new` -> `initialize` (seed empty collections) -> ready.
//! `Store::open` does both.
//!
//! Lookups by id return `Ok(None)` when the record does not exist; nothing
//! is written in that case.

use std::sync::Arc;

use domains::{
    Building, Clock, Comment, IdGenerator, KeyValueStore, NewBuilding, NewComment,
    NewNotification, NewPost, NewTicket, NewVisitorPass, Notification, Post, PostStatus,
    RecordId, Result, Ticket, TicketStatus, UserId, VisitorPass, VisitorPassStatus,
};
use chrono::{DateTime, SubsecRound, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::Mutex;

use crate::seed;

pub const DEFAULT_KEY_PREFIX: &str = "abos";

/// The six stored collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Buildings,
    Tickets,
    VisitorPasses,
    Posts,
    Comments,
    Notifications,
}

impl Collection {
    pub const ALL: [Collection; 6] = [
        Collection::Buildings,
        Collection::Tickets,
        Collection::VisitorPasses,
        Collection::Posts,
        Collection::Comments,
        Collection::Notifications,
    ];

    fn suffix(self) -> &'static str {
        match self {
            Collection::Buildings => "buildings",
            Collection::Tickets => "tickets",
            Collection::VisitorPasses => "visitors",
            Collection::Posts => "posts",
            Collection::Comments => "comments",
            Collection::Notifications => "notifications",
        }
    }
}

/// A record type stored in one of the collections.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync {
    const COLLECTION: Collection;
    fn id(&self) -> &RecordId;
}

macro_rules! impl_record {
    ($($ty:ty => $collection:ident),* $(,)?) => {
        $(impl Record for $ty {
            const COLLECTION: Collection = Collection::$collection;
            fn id(&self) -> &RecordId {
                &self.id
            }
        })*
    };
}

impl_record! {
    Building => Buildings,
    Ticket => Tickets,
    VisitorPass => VisitorPasses,
    Post => Posts,
    Comment => Comments,
    Notification => Notifications,
}

pub struct Store {
    kv: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
    key_prefix: String,
    /// Serializes read-modify-write cycles within this process. Other
    /// processes sharing the medium still race (last write wins).
    write_lock: Mutex<()>,
}

impl Store {
    pub fn new(
        kv: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        Self {
            kv,
            clock,
            ids,
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }

    /// Constructs the store and seeds every empty collection.
    pub async fn open(
        kv: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
    ) -> Result<Self> {
        let store = Self::new(kv, clock, ids);
        store.initialize().await?;
        Ok(store)
    }

    pub fn key(&self, collection: Collection) -> String {
        format!("{}_{}", self.key_prefix, collection.suffix())
    }

    /// Clock reading at the stored precision, so a returned record equals
    /// the one read back later.
    fn now(&self) -> DateTime<Utc> {
        self.clock.now().trunc_subsecs(3)
    }

    /// Writes the demo records into every collection that is absent, empty
    /// or unreadable. Collections that already hold records are untouched,
    /// so calling this again is a no-op.
    pub async fn initialize(&self) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let now = self.now();
        let mut seeded = Vec::new();

        if self.seed_if_empty(seed::buildings(now)).await? {
            seeded.push(Collection::Buildings);
        }
        if self.seed_if_empty(seed::tickets(now)).await? {
            seeded.push(Collection::Tickets);
        }
        if self.seed_if_empty(seed::visitor_passes(now)).await? {
            seeded.push(Collection::VisitorPasses);
        }
        if self.seed_if_empty(seed::posts(now)).await? {
            seeded.push(Collection::Posts);
        }
        if self.seed_if_empty(seed::comments(now)).await? {
            seeded.push(Collection::Comments);
        }
        if self.seed_if_empty(seed::notifications(now)).await? {
            seeded.push(Collection::Notifications);
        }

        tracing::info!(prefix = %self.key_prefix, ?seeded, "store initialized");
        Ok(())
    }

    /// Removes all six collections from the medium.
    pub async fn reset(&self) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        for collection in Collection::ALL {
            self.kv.remove(&self.key(collection)).await?;
        }
        tracing::info!(prefix = %self.key_prefix, "store reset");
        Ok(())
    }

    // ── Buildings ───────────────────────────────────────────────────────────

    pub async fn list_buildings(&self) -> Result<Vec<Building>> {
        self.read().await
    }

    pub async fn find_building(&self, id: &RecordId) -> Result<Option<Building>> {
        self.find(id).await
    }

    pub async fn add_building(&self, input: NewBuilding) -> Result<Building> {
        let building = Building {
            id: self.ids.next_id(),
            name: input.name,
            address: input.address,
            created_at: self.now(),
        };
        self.append(building).await
    }

    // ── Tickets ─────────────────────────────────────────────────────────────

    pub async fn list_tickets(&self, building: Option<&RecordId>) -> Result<Vec<Ticket>> {
        let tickets: Vec<Ticket> = self.read().await?;
        Ok(match building {
            Some(b) => tickets.into_iter().filter(|t| &t.building_id == b).collect(),
            None => tickets,
        })
    }

    pub async fn find_ticket(&self, id: &RecordId) -> Result<Option<Ticket>> {
        self.find(id).await
    }

    /// Stores a new open, unassigned ticket. Writes nothing else; the
    /// creation notice is the caller's second step.
    pub async fn add_ticket(&self, input: NewTicket) -> Result<Ticket> {
        let now = self.now();
        let ticket = Ticket {
            id: self.ids.next_id(),
            building_id: input.building_id,
            unit_id: input.unit_id,
            created_by_user_id: input.created_by_user_id,
            title: input.title,
            description: input.description,
            category: input.category,
            priority: input.priority,
            status: TicketStatus::Open,
            assigned_to_user_id: None,
            created_at: now,
            updated_at: now,
        };
        self.append(ticket).await
    }

    pub async fn update_ticket_status(
        &self,
        id: &RecordId,
        status: TicketStatus,
    ) -> Result<Option<Ticket>> {
        let now = self.now();
        self.modify(id, |t: &mut Ticket| {
            t.status = status;
            t.updated_at = now;
            true
        })
        .await
    }

    pub async fn assign_ticket(
        &self,
        id: &RecordId,
        assignee: Option<UserId>,
    ) -> Result<Option<Ticket>> {
        let now = self.now();
        self.modify(id, |t: &mut Ticket| {
            t.assigned_to_user_id = assignee;
            t.updated_at = now;
            true
        })
        .await
    }

    // ── Visitor passes ──────────────────────────────────────────────────────

    /// Lists passes after flipping every lapsed active pass to expired and
    /// persisting the result.
    pub async fn list_visitor_passes(
        &self,
        building: Option<&RecordId>,
    ) -> Result<Vec<VisitorPass>> {
        let _guard = self.write_lock.lock().await;
        let passes = self.swept_visitor_passes().await?;
        Ok(match building {
            Some(b) => passes.into_iter().filter(|p| &p.building_id == b).collect(),
            None => passes,
        })
    }

    pub async fn add_visitor_pass(&self, input: NewVisitorPass) -> Result<VisitorPass> {
        let _guard = self.write_lock.lock().await;
        let mut passes = self.swept_visitor_passes().await?;
        let pass = VisitorPass {
            id: self.ids.next_id(),
            building_id: input.building_id,
            resident_id: input.resident_id,
            visitor_name: input.visitor_name,
            valid_from: input.valid_from,
            valid_to: input.valid_to,
            status: VisitorPassStatus::Active,
            created_at: self.now(),
        };
        passes.push(pass.clone());
        self.write(&passes).await?;
        Ok(pass)
    }

    pub async fn update_visitor_pass_status(
        &self,
        id: &RecordId,
        status: VisitorPassStatus,
    ) -> Result<Option<VisitorPass>> {
        let _guard = self.write_lock.lock().await;
        let mut passes = self.swept_visitor_passes().await?;
        let Some(pass) = passes.iter_mut().find(|p| &p.id == id) else {
            return Ok(None);
        };
        pass.status = status;
        let updated = pass.clone();
        self.write(&passes).await?;
        Ok(Some(updated))
    }

    pub async fn revoke_visitor_pass(&self, id: &RecordId) -> Result<Option<VisitorPass>> {
        self.update_visitor_pass_status(id, VisitorPassStatus::Revoked)
            .await
    }

    /// Caller must hold `write_lock`.
    async fn swept_visitor_passes(&self) -> Result<Vec<VisitorPass>> {
        let mut passes: Vec<VisitorPass> = self.read().await?;
        let now = self.now();
        let mut expired = 0usize;
        for pass in passes.iter_mut().filter(|p| p.has_lapsed(now)) {
            pass.status = VisitorPassStatus::Expired;
            expired += 1;
        }
        if expired > 0 {
            self.write(&passes).await?;
            tracing::info!(expired, "visitor passes expired");
        }
        Ok(passes)
    }

    // ── Posts ───────────────────────────────────────────────────────────────

    /// Active posts only, newest first.
    pub async fn list_posts(&self, building: Option<&RecordId>) -> Result<Vec<Post>> {
        let posts: Vec<Post> = self.read().await?;
        Ok(posts
            .into_iter()
            .filter(|p| p.status == PostStatus::Active)
            .filter(|p| building.map_or(true, |b| &p.building_id == b))
            .collect())
    }

    /// Finds a post regardless of status.
    pub async fn find_post(&self, id: &RecordId) -> Result<Option<Post>> {
        self.find(id).await
    }

    pub async fn add_post(&self, input: NewPost) -> Result<Post> {
        let now = self.now();
        let post = Post {
            id: self.ids.next_id(),
            building_id: input.building_id,
            user_id: input.user_id,
            user_name: input.user_name,
            title: input.title,
            content: input.content,
            status: PostStatus::Active,
            likes: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        self.prepend(post).await
    }

    pub async fn update_post_status(
        &self,
        id: &RecordId,
        status: PostStatus,
    ) -> Result<Option<Post>> {
        let now = self.now();
        self.modify(id, |p: &mut Post| {
            p.status = status;
            p.updated_at = now;
            true
        })
        .await
    }

    pub async fn toggle_like(&self, post: &RecordId, user: &UserId) -> Result<Option<Post>> {
        let now = self.now();
        self.modify(post, |p: &mut Post| {
            p.toggle_like(user);
            p.updated_at = now;
            true
        })
        .await
    }

    // ── Comments ────────────────────────────────────────────────────────────

    /// Comments on `post`, oldest first.
    pub async fn list_comments(&self, post: &RecordId) -> Result<Vec<Comment>> {
        let comments: Vec<Comment> = self.read().await?;
        Ok(comments.into_iter().filter(|c| &c.post_id == post).collect())
    }

    pub async fn add_comment(&self, input: NewComment) -> Result<Comment> {
        let comment = Comment {
            id: self.ids.next_id(),
            post_id: input.post_id,
            user_id: input.user_id,
            user_name: input.user_name,
            content: input.content,
            created_at: self.now(),
        };
        self.append(comment).await
    }

    pub async fn comment_count(&self, post: &RecordId) -> Result<usize> {
        Ok(self.list_comments(post).await?.len())
    }

    // ── Notifications ───────────────────────────────────────────────────────

    /// Newest first.
    pub async fn list_notifications(&self, user: Option<&UserId>) -> Result<Vec<Notification>> {
        let notifications: Vec<Notification> = self.read().await?;
        Ok(match user {
            Some(u) => notifications.into_iter().filter(|n| &n.user_id == u).collect(),
            None => notifications,
        })
    }

    pub async fn add_notification(&self, input: NewNotification) -> Result<Notification> {
        let notification = Notification {
            id: self.ids.next_id(),
            user_id: input.user_id,
            kind: input.kind,
            title: input.title,
            body: input.body,
            data: input.data,
            read_at: None,
            created_at: self.now(),
        };
        self.prepend(notification).await
    }

    /// Sets `readAt` if it is not set yet. An already read notification is
    /// returned unchanged.
    pub async fn mark_read(&self, id: &RecordId) -> Result<Option<Notification>> {
        let now = self.now();
        self.modify(id, |n: &mut Notification| {
            if n.read_at.is_some() {
                return false;
            }
            n.read_at = Some(now);
            true
        })
        .await
    }

    /// Marks every unread notification of `user` as read. Returns how many
    /// changed.
    pub async fn mark_all_read(&self, user: &UserId) -> Result<usize> {
        let _guard = self.write_lock.lock().await;
        let mut notifications: Vec<Notification> = self.read().await?;
        let now = self.now();
        let mut changed = 0usize;
        for n in notifications
            .iter_mut()
            .filter(|n| &n.user_id == user && n.read_at.is_none())
        {
            n.read_at = Some(now);
            changed += 1;
        }
        if changed > 0 {
            self.write(&notifications).await?;
        }
        Ok(changed)
    }

    pub async fn unread_count(&self, user: &UserId) -> Result<usize> {
        Ok(self
            .list_notifications(Some(user))
            .await?
            .iter()
            .filter(|n| !n.is_read())
            .count())
    }

    // ── Collection plumbing ─────────────────────────────────────────────────

    /// Reads a whole collection. Absent keys and unparsable JSON both read
    /// as empty; the broken value is left in place until the next write.
    async fn read<T: Record>(&self) -> Result<Vec<T>> {
        let key = self.key(T::COLLECTION);
        let Some(raw) = self.kv.get(&key).await? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str(&raw) {
            Ok(records) => Ok(records),
            Err(e) => {
                tracing::warn!(%key, error = %e, "collection is corrupt, reading as empty");
                Ok(Vec::new())
            }
        }
    }

    async fn write<T: Record>(&self, records: &[T]) -> Result<()> {
        let key = self.key(T::COLLECTION);
        let raw = serde_json::to_string(records)?;
        self.kv.set(&key, raw).await?;
        tracing::debug!(%key, records = records.len(), "collection written");
        Ok(())
    }

    async fn find<T: Record>(&self, id: &RecordId) -> Result<Option<T>> {
        let records: Vec<T> = self.read().await?;
        Ok(records.into_iter().find(|r| r.id() == id))
    }

    async fn append<T: Record>(&self, record: T) -> Result<T> {
        let _guard = self.write_lock.lock().await;
        let mut records: Vec<T> = self.read().await?;
        records.push(record.clone());
        self.write(&records).await?;
        Ok(record)
    }

    async fn prepend<T: Record>(&self, record: T) -> Result<T> {
        let _guard = self.write_lock.lock().await;
        let mut records: Vec<T> = self.read().await?;
        records.insert(0, record.clone());
        self.write(&records).await?;
        Ok(record)
    }

    /// Applies `change` to the record with `id`. `change` returns whether it
    /// altered anything; if not, nothing is written.
    async fn modify<T, F>(&self, id: &RecordId, change: F) -> Result<Option<T>>
    where
        T: Record,
        F: FnOnce(&mut T) -> bool + Send,
    {
        let _guard = self.write_lock.lock().await;
        let mut records: Vec<T> = self.read().await?;
        let Some(record) = records.iter_mut().find(|r| r.id() == id) else {
            return Ok(None);
        };
        let changed = change(record);
        let updated = record.clone();
        if changed {
            self.write(&records).await?;
        }
        Ok(Some(updated))
    }

    /// Caller must hold `write_lock`.
    async fn seed_if_empty<T: Record>(&self, records: Vec<T>) -> Result<bool> {
        if !self.read::<T>().await?.is_empty() {
            return Ok(false);
        }
        self.write(&records).await?;
        Ok(true)
    }
}
