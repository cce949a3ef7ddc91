//! # services
//!
//! The persistence/query layer ([`Store`]) and the application services the
//! dashboard pages call. Services validate input, act on behalf of an explicit
//! [`domains::Session`] and never let a storage fault escape unlogged.

pub mod buildings;
pub mod clock;
pub mod community;
pub mod dashboard;
pub mod ids;
pub mod notifications;
pub mod seed;
pub mod store;
pub mod tickets;
pub mod visitors;

pub use buildings::BuildingService;
pub use clock::{ManualClock, SystemClock};
pub use community::{CommunityService, PostDraft, PostThread};
pub use dashboard::{DashboardService, DashboardSummary};
pub use ids::{SequentialIds, UuidV7Ids};
pub use notifications::NotificationService;
pub use store::{Collection, Record, Store};
pub use tickets::{creation_notice, TicketDraft, TicketReceipt, TicketService, TicketStatusCounts};
pub use visitors::{PassRequest, PassTab, VisitorPassCounts, VisitorService};

use domains::{DomainError, Result};

/// Logs infrastructure faults at the service boundary. Validation and
/// permission errors are expected outcomes and are not logged.
pub(crate) fn observe<T>(operation: &'static str, result: Result<T>) -> Result<T> {
    if let Err(e) = &result {
        match e {
            DomainError::Validation(_) | DomainError::Forbidden(_) => {}
            DomainError::Storage(_) | DomainError::Serialization(_) => {
                tracing::error!(operation, error = %e, "storage fault");
            }
        }
    }
    result
}

/// Rejects blank input and returns it trimmed.
pub(crate) fn required(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}
