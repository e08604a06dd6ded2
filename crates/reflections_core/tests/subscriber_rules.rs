mod support;

use std::sync::Arc;

use reflections_core::ports::PortError;
use reflections_core::SubscriberService;
use support::MemoryStore;

fn service() -> SubscriberService {
    SubscriberService::new(Arc::new(MemoryStore::default()))
}

#[tokio::test]
async fn subscribe_normalizes_to_lowercase() {
    let service = service();

    let created = service.subscribe("  Foo@Example.COM ").await.unwrap();
    assert_eq!(created.email, "foo@example.com");
    assert!(!created.selected);
}

#[tokio::test]
async fn duplicate_registration_is_rejected_case_insensitively() {
    let service = service();

    service.subscribe("foo@example.com").await.unwrap();
    let err = service.subscribe("Foo@Example.com").await.unwrap_err();
    assert!(matches!(err, PortError::Duplicate(email) if email == "foo@example.com"));

    assert_eq!(service.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn malformed_addresses_are_rejected() {
    let service = service();

    for bad in ["", "plainaddress", "no@tld", "two words@example.com", "@example.com"] {
        let err = service.subscribe(bad).await.unwrap_err();
        assert!(matches!(err, PortError::Invalid(_)), "accepted {bad:?}");
    }
}

#[tokio::test]
async fn selection_toggle_updates_only_listed_addresses() {
    let service = service();

    service.subscribe("a@x.com").await.unwrap();
    service.subscribe("b@x.com").await.unwrap();
    service.subscribe("c@x.com").await.unwrap();

    let updated = service
        .set_selection(&["A@x.com".to_string(), "c@x.com".to_string()], true)
        .await
        .unwrap();
    assert_eq!(updated, 2);

    let mut selected = service.selected_recipients().await.unwrap();
    selected.sort();
    assert_eq!(selected, vec!["a@x.com", "c@x.com"]);

    let updated = service
        .set_selection(&["c@x.com".to_string()], false)
        .await
        .unwrap();
    assert_eq!(updated, 1);
    assert_eq!(service.selected_recipients().await.unwrap(), vec!["a@x.com"]);
}

#[tokio::test]
async fn selection_toggle_skips_unknown_addresses() {
    let service = service();

    service.subscribe("a@x.com").await.unwrap();
    let updated = service
        .set_selection(&["ghost@x.com".to_string()], true)
        .await
        .unwrap();
    assert_eq!(updated, 0);
}

#[tokio::test]
async fn remove_twice_yields_success_then_not_found() {
    let service = service();

    service.subscribe("a@x.com").await.unwrap();
    service.remove("A@x.com").await.unwrap();

    let err = service.remove("a@x.com").await.unwrap_err();
    assert!(matches!(err, PortError::NotFound(_)));
}

#[tokio::test]
async fn new_subscribers_are_not_selected_for_the_newsletter() {
    let service = service();

    service.subscribe("a@x.com").await.unwrap();
    service.subscribe("b@x.com").await.unwrap();

    assert!(service.selected_recipients().await.unwrap().is_empty());
}
