//! # Domain Models
//!
//! These structs represent the records held in the six ABOS collections.
//! Records reference each other by id only; relations are resolved by
//! filtering at read time.
//!
//! All records serialize with camelCase keys so the stored layout matches
//! the one the dashboard has always written.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Opaque identifier of a stored record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Identifier of a user (resident, technician, administrator).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for UserId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

// ── Buildings ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Building {
    pub id: RecordId,
    pub name: String,
    pub address: String,
    #[serde(with = "crate::timestamp")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewBuilding {
    pub name: String,
    pub address: String,
}

// ── Tickets ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketCategory {
    Maintenance,
    Repair,
    Complaint,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketPriority {
    Low,
    Medium,
    High,
    Urgent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Open,
    InProgress,
    Resolved,
    Closed,
}

/// A maintenance request raised by a resident.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: RecordId,
    pub building_id: RecordId,
    pub unit_id: RecordId,
    pub created_by_user_id: UserId,
    pub title: String,
    pub description: String,
    pub category: TicketCategory,
    pub priority: TicketPriority,
    pub status: TicketStatus,
    pub assigned_to_user_id: Option<UserId>,
    #[serde(with = "crate::timestamp")]
    pub created_at: DateTime<Utc>,
    /// Refreshed on every status or assignment change
    #[serde(with = "crate::timestamp")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewTicket {
    pub building_id: RecordId,
    pub unit_id: RecordId,
    pub created_by_user_id: UserId,
    pub title: String,
    pub description: String,
    pub category: TicketCategory,
    pub priority: TicketPriority,
}

// ── Visitor passes ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisitorPassStatus {
    Active,
    /// Terminal
    Used,
    /// Terminal
    Revoked,
    Expired,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitorPass {
    pub id: RecordId,
    pub building_id: RecordId,
    pub resident_id: UserId,
    pub visitor_name: String,
    #[serde(with = "crate::timestamp")]
    pub valid_from: DateTime<Utc>,
    #[serde(with = "crate::timestamp")]
    pub valid_to: DateTime<Utc>,
    pub status: VisitorPassStatus,
    #[serde(with = "crate::timestamp")]
    pub created_at: DateTime<Utc>,
}

impl VisitorPass {
    /// An active pass whose validity window closed before `now`.
    /// Used and revoked passes never lapse.
    pub fn has_lapsed(&self, now: DateTime<Utc>) -> bool {
        self.status == VisitorPassStatus::Active && self.valid_to < now
    }

    /// Code shown at the gate, e.g. `PASS-3F9A07C2`: the last eight
    /// alphanumeric characters of the id, uppercased. For uuid v7 ids these
    /// come from the random tail, not the timestamp prefix.
    pub fn pass_code(&self) -> String {
        let chars: Vec<char> = self
            .id
            .as_str()
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .collect();
        let tail: String = chars[chars.len().saturating_sub(8)..].iter().collect();
        format!("PASS-{}", tail.to_uppercase())
    }
}

#[derive(Debug, Clone)]
pub struct NewVisitorPass {
    pub building_id: RecordId,
    pub resident_id: UserId,
    pub visitor_name: String,
    pub valid_from: DateTime<Utc>,
    pub valid_to: DateTime<Utc>,
}

// ── Community ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostStatus {
    Active,
    /// Hidden from reads but retained
    Deleted,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: RecordId,
    pub building_id: RecordId,
    pub user_id: UserId,
    pub user_name: String,
    pub title: String,
    pub content: String,
    pub status: PostStatus,
    /// Users who liked the post. Treated as a set.
    pub likes: Vec<UserId>,
    #[serde(with = "crate::timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "crate::timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl Post {
    pub fn is_liked_by(&self, user: &UserId) -> bool {
        self.likes.contains(user)
    }

    /// Adds `user` to the likes if absent, removes it otherwise.
    /// Returns whether the post is liked by `user` afterwards.
    pub fn toggle_like(&mut self, user: &UserId) -> bool {
        match self.likes.iter().position(|u| u == user) {
            Some(index) => {
                self.likes.remove(index);
                false
            }
            None => {
                self.likes.push(user.clone());
                true
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewPost {
    pub building_id: RecordId,
    pub user_id: UserId,
    pub user_name: String,
    pub title: String,
    pub content: String,
}

/// Comments are append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: RecordId,
    pub post_id: RecordId,
    pub user_id: UserId,
    pub user_name: String,
    pub content: String,
    #[serde(with = "crate::timestamp")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub post_id: RecordId,
    pub user_id: UserId,
    pub user_name: String,
    pub content: String,
}

// ── Notifications ───────────────────────────────────────────────────────────

/// Well-known values of [`Notification::kind`].
pub mod notification_kind {
    pub const TICKET_CREATED: &str = "ticket_created";
    pub const COMMUNITY_POST: &str = "community_post";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: RecordId,
    pub user_id: UserId,
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub body: String,
    /// Free-form payload, e.g. `{ "ticketId": "..." }`
    #[serde(default)]
    pub data: Map<String, Value>,
    /// Once set, never cleared or overwritten
    #[serde(with = "crate::timestamp::option", default)]
    pub read_at: Option<DateTime<Utc>>,
    #[serde(with = "crate::timestamp")]
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn is_read(&self) -> bool {
        self.read_at.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct NewNotification {
    pub user_id: UserId,
    pub kind: String,
    pub title: String,
    pub body: String,
    pub data: Map<String, Value>,
}
