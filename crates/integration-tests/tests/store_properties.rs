//! Properties every reimplementation of the store must keep.

use chrono::Duration;
use domains::{
    KeyValueStore, NewBuilding, PostStatus, RecordId, TicketStatus, UserId, VisitorPassStatus,
};
use integration_tests::{harness, start};
use services::Store;

const COLLECTION_SEEDS: [(&str, usize); 6] = [
    ("abos_buildings", 3),
    ("abos_tickets", 3),
    ("abos_visitors", 2),
    ("abos_posts", 2),
    ("abos_comments", 1),
    ("abos_notifications", 2),
];

async fn stored_len(kv: &dyn KeyValueStore, key: &str) -> usize {
    let raw = kv.get(key).await.unwrap().unwrap();
    serde_json::from_str::<Vec<serde_json::Value>>(&raw).unwrap().len()
}

#[tokio::test]
async fn seeding_an_empty_medium_writes_fixed_counts() {
    let h = harness().await;
    for (key, count) in COLLECTION_SEEDS {
        assert_eq!(stored_len(h.kv.as_ref(), key).await, count, "{key}");
    }
}

#[tokio::test]
async fn seeding_is_idempotent() {
    let h = harness().await;
    h.store
        .add_building(NewBuilding {
            name: "Old Town Lofts".to_string(),
            address: "3 Erekle II St".to_string(),
        })
        .await
        .unwrap();
    let before = h.kv.get("abos_buildings").await.unwrap();

    h.store.initialize().await.unwrap();
    h.store.initialize().await.unwrap();

    assert_eq!(h.kv.get("abos_buildings").await.unwrap(), before);
    assert_eq!(stored_len(h.kv.as_ref(), "abos_buildings").await, 4);
    assert_eq!(stored_len(h.kv.as_ref(), "abos_tickets").await, 3);
}

#[tokio::test]
async fn emptied_collection_is_reseeded_on_next_initialize() {
    let h = harness().await;
    h.kv.set("abos_comments", "[]".to_string()).await.unwrap();
    assert_eq!(h.store.comment_count(&"p1".into()).await.unwrap(), 0);

    h.store.initialize().await.unwrap();
    assert_eq!(h.store.comment_count(&"p1".into()).await.unwrap(), 1);
}

#[tokio::test]
async fn lapsed_pass_is_expired_and_persisted() {
    let h = harness().await;
    h.clock.advance(Duration::days(1) + Duration::seconds(1));

    let passes = h.store.list_visitor_passes(None).await.unwrap();
    assert_eq!(passes[0].id.as_str(), "v1");
    assert_eq!(passes[0].status, VisitorPassStatus::Expired);

    // A second, independent store over the same medium sees the stored
    // status even though its clock says the pass is still valid.
    let other = Store::new(
        h.kv.clone(),
        std::sync::Arc::new(services::ManualClock::new(start())),
        std::sync::Arc::new(services::UuidV7Ids),
    );
    let passes = other.list_visitor_passes(None).await.unwrap();
    assert_eq!(passes[0].status, VisitorPassStatus::Expired);
    assert_eq!(passes[1].status, VisitorPassStatus::Used);
}

#[tokio::test]
async fn like_toggle_is_an_involution() {
    let h = harness().await;
    for user in ["demo-user-001", "demo-user-002"] {
        let user = UserId::from(user);
        let original = h.store.find_post(&"p1".into()).await.unwrap().unwrap();
        h.store.toggle_like(&"p1".into(), &user).await.unwrap().unwrap();
        let after = h.store.toggle_like(&"p1".into(), &user).await.unwrap().unwrap();
        assert_eq!(after.likes, original.likes);
        assert_eq!(after.likes.len(), original.likes.len());
    }
}

#[tokio::test]
async fn status_change_on_missing_id_leaves_bytes_untouched() {
    let h = harness().await;
    let before = h.kv.get("abos_tickets").await.unwrap();
    let outcome = h
        .store
        .update_ticket_status(&RecordId::from("nonexistent-id"), TicketStatus::Closed)
        .await
        .unwrap();
    assert!(outcome.is_none());
    assert_eq!(h.kv.get("abos_tickets").await.unwrap(), before);

    assert!(h
        .store
        .update_post_status(&"nonexistent-id".into(), PostStatus::Deleted)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn mark_all_read_never_rewrites_timestamps() {
    let h = harness().await;
    let user = UserId::from("demo-user-001");

    h.store.mark_all_read(&user).await.unwrap();
    let first = h.store.list_notifications(Some(&user)).await.unwrap();
    assert!(first.iter().all(|n| n.read_at.is_some()));

    h.clock.advance(Duration::hours(3));
    h.store.mark_all_read(&user).await.unwrap();
    let second = h.store.list_notifications(Some(&user)).await.unwrap();
    assert_eq!(first, second);
}
