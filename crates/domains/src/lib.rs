//! abos/crates/domains/src/lib.rs
//!
//! Records, ports and errors shared by every ABOS crate. No I/O lives here.

pub mod error;
pub mod models;
pub mod ports;
pub mod session;
pub mod timestamp;

// Re-exporting for easier access in other crates
pub use error::*;
pub use models::*;
pub use ports::*;
pub use session::*;

#[cfg(test)]
mod tests {
    use super::models::*;
    use chrono::{Duration, TimeZone, Utc};

    fn pass(status: VisitorPassStatus, valid_to_offset_hours: i64) -> VisitorPass {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        VisitorPass {
            id: "v1".into(),
            building_id: "b1".into(),
            resident_id: "demo-user-001".into(),
            visitor_name: "Giorgi".to_string(),
            valid_from: now - Duration::days(1),
            valid_to: now + Duration::hours(valid_to_offset_hours),
            status,
            created_at: now - Duration::days(2),
        }
    }

    #[test]
    fn only_active_passes_lapse() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        assert!(pass(VisitorPassStatus::Active, -1).has_lapsed(now));
        assert!(!pass(VisitorPassStatus::Active, 1).has_lapsed(now));
        assert!(!pass(VisitorPassStatus::Used, -1).has_lapsed(now));
        assert!(!pass(VisitorPassStatus::Revoked, -1).has_lapsed(now));
    }

    #[test]
    fn pass_is_valid_up_to_its_closing_instant() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let closing = pass(VisitorPassStatus::Active, 0);
        assert_eq!(closing.valid_to, now);
        assert!(!closing.has_lapsed(now));
        assert!(closing.has_lapsed(now + Duration::milliseconds(1)));
    }

    #[test]
    fn pass_code_uses_the_end_of_the_id() {
        let mut p = pass(VisitorPassStatus::Active, 1);
        p.id = "0199f3c2-7a10-7e55-9b3d-4c1e8f3f9a07".into();
        assert_eq!(p.pass_code(), "PASS-8F3F9A07");
        p.id = "v1".into();
        assert_eq!(p.pass_code(), "PASS-V1");
    }

    #[test]
    fn toggle_like_twice_restores_membership() {
        let now = Utc::now();
        let mut post = Post {
            id: "p1".into(),
            building_id: "b1".into(),
            user_id: "admin-001".into(),
            user_name: "Administrator".to_string(),
            title: "Welcome".to_string(),
            content: "Hello neighbours".to_string(),
            status: PostStatus::Active,
            likes: vec!["someone".into()],
            created_at: now,
            updated_at: now,
        };
        let user: UserId = "demo-user-001".into();

        assert!(post.toggle_like(&user));
        assert!(post.is_liked_by(&user));
        assert!(!post.toggle_like(&user));
        assert_eq!(post.likes, vec![UserId::from("someone")]);
    }

    #[test]
    fn records_use_camel_case_layout() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let ticket = Ticket {
            id: "t1".into(),
            building_id: "b1".into(),
            unit_id: "u1".into(),
            created_by_user_id: "demo-user-001".into(),
            title: "Water leak".to_string(),
            description: "Under the sink".to_string(),
            category: TicketCategory::Repair,
            priority: TicketPriority::High,
            status: TicketStatus::InProgress,
            assigned_to_user_id: None,
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_value(&ticket).unwrap();
        assert_eq!(json["createdByUserId"], "demo-user-001");
        assert_eq!(json["status"], "in_progress");
        assert_eq!(json["createdAt"], "2026-03-01T12:00:00.000Z");
        assert!(json["assignedToUserId"].is_null());
    }

    #[test]
    fn notification_kind_is_stored_as_type() {
        let raw = r#"{
            "id": "n1", "userId": "demo-user-001", "type": "community_post",
            "title": "New post", "body": "An administrator posted",
            "readAt": null, "createdAt": "2026-03-01T12:00:00Z"
        }"#;
        let n: Notification = serde_json::from_str(raw).unwrap();
        assert_eq!(n.kind, notification_kind::COMMUNITY_POST);
        assert!(n.data.is_empty());
        assert!(!n.is_read());
    }
}
