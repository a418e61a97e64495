use super::*;

fn contact(name: &str) -> ValidContact {
    ValidContact {
        name: name.to_string(),
        email: format!("{}@example.com", name.to_ascii_lowercase()),
        message: "Hello, this is long enough.".to_string(),
    }
}

#[tokio::test]
async fn saved_submission_is_retrievable_by_generated_id() {
    let store = MemoryStore::new();
    let saved = store.save_submission(contact("Ann")).await.expect("save");
    assert_eq!(saved.name, "Ann");

    let loaded = store
        .load_submission(saved.id)
        .await
        .expect("load")
        .expect("present");
    assert_eq!(loaded.email, "ann@example.com");
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn generated_ids_are_unique() {
    let store = MemoryStore::new();
    let first = store.save_submission(contact("Ann")).await.expect("save");
    let second = store.save_submission(contact("Ann")).await.expect("save");
    assert_ne!(first.id, second.id);
}

#[tokio::test]
async fn listing_is_most_recent_first() {
    let store = MemoryStore::new();
    for name in ["Ann", "Bob", "Cid"] {
        store.save_submission(contact(name)).await.expect("save");
    }

    let names: Vec<String> = store
        .list_submissions()
        .await
        .expect("list")
        .into_iter()
        .map(|submission| submission.name)
        .collect();
    assert_eq!(names, vec!["Cid", "Bob", "Ann"]);
}

#[tokio::test]
async fn capacity_limit_rejects_without_storing() {
    let store = MemoryStore::with_capacity_limit(1);
    store.save_submission(contact("Ann")).await.expect("save");
    let err = store
        .save_submission(contact("Bob"))
        .await
        .expect_err("full");
    assert!(matches!(err, StorageError::CapacityExceeded { limit: 1 }));
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn duplicate_id_is_rejected() {
    let store = MemoryStore::new();
    let id = SubmissionId::generate();
    store
        .insert_with_id(id, contact("Ann"))
        .await
        .expect("first insert");
    let err = store
        .insert_with_id(id, contact("Bob"))
        .await
        .expect_err("duplicate");
    assert!(matches!(err, StorageError::DuplicateId(dup) if dup == id));
}

#[tokio::test]
async fn clones_share_the_same_submissions() {
    let store = MemoryStore::new();
    let handle = store.clone();
    handle.save_submission(contact("Ann")).await.expect("save");
    assert!(!store.is_empty().await);
}
