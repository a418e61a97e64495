use std::sync::Arc;

use shared::{
    protocol::{ContactField, ContactForm},
    validation::validate_contact,
};
use storage::{MemoryStore, SubmissionStore};

fn form(name: &str, email: &str, message: &str) -> ContactForm {
    ContactForm {
        name: name.into(),
        email: email.into(),
        message: message.into(),
    }
}

#[tokio::test]
async fn validated_contacts_round_trip_through_a_shared_store() {
    let store: Arc<dyn SubmissionStore> = Arc::new(MemoryStore::new());

    let rejected = validate_contact(&form("Al", "bad", "short")).expect_err("invalid");
    assert!(rejected.has_issue_for(ContactField::Email));
    assert!(rejected.has_issue_for(ContactField::Message));
    assert!(store.list_submissions().await.expect("list").is_empty());

    let mut handles = Vec::new();
    for n in 0..8 {
        let store = Arc::clone(&store);
        handles.push(tokio::spawn(async move {
            let contact = validate_contact(&form(
                &format!("Visitor {n}"),
                &format!("visitor{n}@example.com"),
                "I would like to talk about a project.",
            ))
            .expect("valid");
            store.save_submission(contact).await.expect("save")
        }));
    }

    let mut saved = Vec::new();
    for handle in handles {
        saved.push(handle.await.expect("join"));
    }

    let listed = store.list_submissions().await.expect("list");
    assert_eq!(listed.len(), saved.len());
    for pair in listed.windows(2) {
        assert!(pair[0].submitted_at >= pair[1].submitted_at);
    }
    for submission in &saved {
        let loaded = store
            .load_submission(submission.id)
            .await
            .expect("load")
            .expect("present");
        assert_eq!(loaded.email, submission.email);
    }
}
