//! Demo records written into empty collections on first start.
//!
//! Timestamps are relative to `now` so a freshly seeded store always looks
//! current: one active pass valid until tomorrow, one used pass from
//! yesterday, and so on.

use chrono::{DateTime, Duration, Utc};
use domains::{
    notification_kind, Building, Comment, Notification, Post, PostStatus, Ticket, TicketCategory,
    TicketPriority, TicketStatus, VisitorPass, VisitorPassStatus,
};
use serde_json::Map;

pub const DEMO_RESIDENT: &str = "demo-user-001";
pub const DEMO_NEIGHBOUR: &str = "demo-user-002";
pub const DEMO_ADMIN: &str = "admin-001";
pub const DEMO_TECHNICIAN: &str = "tech-001";

pub fn buildings(now: DateTime<Utc>) -> Vec<Building> {
    [
        ("b1", "Sunset Apartments", "71 Vazha-Pshavela Ave, Tbilisi"),
        ("b2", "Green Valley Residence", "24 Rustaveli Ave, Tbilisi"),
        ("b3", "Sky Tower", "15 Abashidze St, Tbilisi"),
    ]
    .into_iter()
    .map(|(id, name, address)| Building {
        id: id.into(),
        name: name.to_string(),
        address: address.to_string(),
        created_at: now,
    })
    .collect()
}

pub fn tickets(now: DateTime<Utc>) -> Vec<Ticket> {
    let day = Duration::days(1);
    let ticket = |id: &str,
                  title: &str,
                  description: &str,
                  category,
                  priority,
                  status,
                  assignee: Option<&str>,
                  created_at,
                  updated_at| Ticket {
        id: id.into(),
        building_id: "b1".into(),
        unit_id: "u1".into(),
        created_by_user_id: DEMO_RESIDENT.into(),
        title: title.to_string(),
        description: description.to_string(),
        category,
        priority,
        status,
        assigned_to_user_id: assignee.map(Into::into),
        created_at,
        updated_at,
    };

    vec![
        ticket(
            "t1",
            "Water leak in the bathroom",
            "Water keeps dripping under the bathroom sink",
            TicketCategory::Repair,
            TicketPriority::High,
            TicketStatus::Open,
            None,
            now,
            now,
        ),
        ticket(
            "t2",
            "Air conditioner problem",
            "The air conditioner is not cooling properly",
            TicketCategory::Maintenance,
            TicketPriority::Medium,
            TicketStatus::InProgress,
            Some(DEMO_TECHNICIAN),
            now - day,
            now,
        ),
        ticket(
            "t3",
            "Replace a light bulb",
            "The hallway light bulb burnt out",
            TicketCategory::Maintenance,
            TicketPriority::Low,
            TicketStatus::Resolved,
            Some(DEMO_TECHNICIAN),
            now - day * 2,
            now - day,
        ),
    ]
}

pub fn visitor_passes(now: DateTime<Utc>) -> Vec<VisitorPass> {
    let day = Duration::days(1);
    vec![
        VisitorPass {
            id: "v1".into(),
            building_id: "b1".into(),
            resident_id: DEMO_RESIDENT.into(),
            visitor_name: "Giorgi Gelashvili".to_string(),
            valid_from: now,
            valid_to: now + day,
            status: VisitorPassStatus::Active,
            created_at: now,
        },
        VisitorPass {
            id: "v2".into(),
            building_id: "b1".into(),
            resident_id: DEMO_RESIDENT.into(),
            visitor_name: "Mariam Jorbenadze".to_string(),
            valid_from: now - day,
            valid_to: now - Duration::hours(12),
            status: VisitorPassStatus::Used,
            created_at: now - day * 2,
        },
    ]
}

pub fn posts(now: DateTime<Utc>) -> Vec<Post> {
    let day = Duration::days(1);
    vec![
        Post {
            id: "p1".into(),
            building_id: "b1".into(),
            user_id: DEMO_ADMIN.into(),
            user_name: "Administrator".to_string(),
            title: "Welcome aboard!".to_string(),
            content: "Welcome to our new community platform! Here you can catch up on news, \
                      reach your neighbours and receive important announcements."
                .to_string(),
            status: PostStatus::Active,
            likes: vec![DEMO_RESIDENT.into()],
            created_at: now,
            updated_at: now,
        },
        Post {
            id: "p2".into(),
            building_id: "b1".into(),
            user_id: DEMO_NEIGHBOUR.into(),
            user_name: "Nika Martinenko".to_string(),
            title: "Pool maintenance schedule".to_string(),
            content: "A reminder that the pool is closed for maintenance on Saturday \
                      from 8:00 to 14:00. Thanks for understanding!"
                .to_string(),
            status: PostStatus::Active,
            likes: Vec::new(),
            created_at: now - day,
            updated_at: now - day,
        },
    ]
}

pub fn comments(now: DateTime<Utc>) -> Vec<Comment> {
    vec![Comment {
        id: "c1".into(),
        post_id: "p1".into(),
        user_id: DEMO_NEIGHBOUR.into(),
        user_name: "Nika Martinenko".to_string(),
        content: "Great platform, thank you!".to_string(),
        created_at: now - Duration::hours(1),
    }]
}

pub fn notifications(now: DateTime<Utc>) -> Vec<Notification> {
    vec![
        Notification {
            id: "n1".into(),
            user_id: DEMO_RESIDENT.into(),
            kind: notification_kind::TICKET_CREATED.to_string(),
            title: "New ticket created".to_string(),
            body: "Your request \"Water leak in the bathroom\" has been registered successfully"
                .to_string(),
            data: Map::new(),
            read_at: None,
            created_at: now,
        },
        Notification {
            id: "n2".into(),
            user_id: DEMO_RESIDENT.into(),
            kind: notification_kind::COMMUNITY_POST.to_string(),
            title: "New community post".to_string(),
            body: "The administrator published a new post".to_string(),
            data: Map::new(),
            read_at: None,
            created_at: now - Duration::hours(1),
        },
    ]
}
