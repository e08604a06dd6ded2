use api_lib::adapters::FileStore;
use reflections_core::domain::{ReflectionEntry, Subscriber};
use reflections_core::ports::{PortError, Store};
use tempfile::tempdir;

fn reflection(id: &str, title: &str, date: &str) -> ReflectionEntry {
    ReflectionEntry {
        id: id.to_string(),
        title: title.to_string(),
        body: format!("{title} body"),
        date: date.to_string(),
    }
}

fn subscriber(email: &str) -> Subscriber {
    Subscriber {
        email: email.to_string(),
        date: "2024-05-01".to_string(),
        selected: false,
    }
}

#[tokio::test]
async fn open_initializes_an_empty_document() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data.json");

    let store = FileStore::open(&path).await.unwrap();
    assert!(path.exists());
    assert!(store.list_reflections().await.unwrap().is_empty());
    assert!(store.list_subscribers().await.unwrap().is_empty());
}

#[tokio::test]
async fn records_survive_a_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data.json");

    {
        let store = FileStore::open(&path).await.unwrap();
        store
            .insert_reflection(reflection("r1", "First", "2024-05-01"))
            .await
            .unwrap();
        store.insert_subscriber(subscriber("a@x.com")).await.unwrap();
    }

    let store = FileStore::open(&path).await.unwrap();
    let reflections = store.list_reflections().await.unwrap();
    assert_eq!(reflections.len(), 1);
    assert_eq!(reflections[0].id, "r1");

    let subscribers = store.list_subscribers().await.unwrap();
    assert_eq!(subscribers.len(), 1);
    assert_eq!(subscribers[0].email, "a@x.com");
}

#[tokio::test]
async fn list_preserves_insertion_order() {
    let dir = tempdir().unwrap();
    let store = FileStore::open(dir.path().join("data.json")).await.unwrap();

    for i in 0..5 {
        store
            .insert_reflection(reflection(&format!("r{i}"), &format!("Entry {i}"), "2024-05-01"))
            .await
            .unwrap();
    }

    let ids: Vec<String> = store
        .list_reflections()
        .await
        .unwrap()
        .into_iter()
        .map(|e| e.id)
        .collect();
    assert_eq!(ids, vec!["r0", "r1", "r2", "r3", "r4"]);
}

#[tokio::test]
async fn replace_swaps_fields_and_misses_are_not_found() {
    let dir = tempdir().unwrap();
    let store = FileStore::open(dir.path().join("data.json")).await.unwrap();

    store
        .insert_reflection(reflection("r1", "Before", "2024-05-01"))
        .await
        .unwrap();

    let updated = store
        .replace_reflection("r1", reflection("r1", "After", "2024-06-01"))
        .await
        .unwrap();
    assert_eq!(updated.title, "After");

    let found = store.find_reflection("r1").await.unwrap().unwrap();
    assert_eq!(found.title, "After");
    assert_eq!(found.date, "2024-06-01");

    let err = store
        .replace_reflection("ghost", reflection("ghost", "Nope", "2024-06-01"))
        .await
        .unwrap_err();
    assert!(matches!(err, PortError::NotFound(_)));
}

#[tokio::test]
async fn delete_reports_whether_the_record_existed() {
    let dir = tempdir().unwrap();
    let store = FileStore::open(dir.path().join("data.json")).await.unwrap();

    store
        .insert_reflection(reflection("r1", "Gone soon", "2024-05-01"))
        .await
        .unwrap();

    assert!(store.delete_reflection("r1").await.unwrap());
    assert!(!store.delete_reflection("r1").await.unwrap());
    assert!(store.find_reflection("r1").await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_subscribers_are_rejected_at_the_store() {
    let dir = tempdir().unwrap();
    let store = FileStore::open(dir.path().join("data.json")).await.unwrap();

    store.insert_subscriber(subscriber("a@x.com")).await.unwrap();
    let err = store
        .insert_subscriber(subscriber("a@x.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, PortError::Duplicate(email) if email == "a@x.com"));
}

#[tokio::test]
async fn selection_updates_are_persisted() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data.json");

    {
        let store = FileStore::open(&path).await.unwrap();
        store.insert_subscriber(subscriber("a@x.com")).await.unwrap();
        store.insert_subscriber(subscriber("b@x.com")).await.unwrap();

        let updated = store
            .set_subscriber_selection(&["b@x.com".to_string()], true)
            .await
            .unwrap();
        assert_eq!(updated, 1);
    }

    let store = FileStore::open(&path).await.unwrap();
    let selected: Vec<String> = store
        .list_subscribers()
        .await
        .unwrap()
        .into_iter()
        .filter(|s| s.selected)
        .map(|s| s.email)
        .collect();
    assert_eq!(selected, vec!["b@x.com"]);
}

#[tokio::test]
async fn corrupt_document_surfaces_a_storage_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data.json");

    let store = FileStore::open(&path).await.unwrap();
    tokio::fs::write(&path, b"not json at all").await.unwrap();

    let err = store.list_reflections().await.unwrap_err();
    assert!(matches!(err, PortError::Storage(_)));
}

#[tokio::test]
async fn missing_fields_in_the_document_default_sanely() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data.json");

    // A legacy document with no subscribers key at all.
    tokio::fs::write(&path, br#"{ "reflections": [] }"#)
        .await
        .unwrap();

    let store = FileStore::open(&path).await.unwrap();
    assert!(store.list_subscribers().await.unwrap().is_empty());
}
