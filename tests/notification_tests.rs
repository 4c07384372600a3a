use clipsync::{
    repositories::{NotificationRepository, SqliteNotificationRepository},
    services::{NotificationError, NotificationService},
    test_utils::test_helpers,
};
use std::sync::Arc;

#[tokio::test]
async fn test_unknown_user_has_no_notifications() {
    let pool = test_helpers::create_test_db().await.unwrap();
    let service = NotificationService::new(Arc::new(SqliteNotificationRepository::new(pool)));
    let ghost = test_helpers::test_identity("user_ghost", "ghost@example.com", "Ghost", "");

    let result = service.list_notifications(Some(&ghost)).await;
    assert!(matches!(result, Err(NotificationError::Empty)));
}

#[tokio::test]
async fn test_lists_notifications_oldest_first() {
    let pool = test_helpers::create_test_db().await.unwrap();
    let repository = Arc::new(SqliteNotificationRepository::new(pool.clone()));
    let service = NotificationService::new(repository.clone());

    let bob_id = test_helpers::insert_test_user(&pool, "user_bob", "bob@example.com", Some("Bob"), None)
        .await
        .unwrap();
    let bob = test_helpers::test_identity("user_bob", "bob@example.com", "Bob", "Marley");

    assert!(matches!(
        service.list_notifications(Some(&bob)).await,
        Err(NotificationError::Empty)
    ));

    repository.append(&bob_id, "first").await.unwrap();
    repository.append(&bob_id, "second").await.unwrap();

    let list = service.list_notifications(Some(&bob)).await.unwrap();
    assert_eq!(list.count, 2);
    assert_eq!(list.notifications[0].content, "first");
    assert_eq!(list.notifications[1].content, "second");
    assert!(list.notifications.iter().all(|n| n.user_id == bob_id));
}

#[tokio::test]
async fn test_notifications_are_per_user() {
    let pool = test_helpers::create_test_db().await.unwrap();
    let repository = Arc::new(SqliteNotificationRepository::new(pool.clone()));
    let service = NotificationService::new(repository.clone());

    let bob_id = test_helpers::insert_test_user(&pool, "user_bob", "bob@example.com", Some("Bob"), None)
        .await
        .unwrap();
    test_helpers::insert_test_user(&pool, "user_carol", "carol@example.com", Some("Carol"), None)
        .await
        .unwrap();
    repository.append(&bob_id, "for bob").await.unwrap();

    let carol = test_helpers::test_identity("user_carol", "carol@example.com", "Carol", "Jones");
    assert!(matches!(
        service.list_notifications(Some(&carol)).await,
        Err(NotificationError::Empty)
    ));
}
