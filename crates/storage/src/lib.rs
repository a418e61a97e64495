use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use chrono::Utc;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::debug;

use shared::{
    domain::{ContactSubmission, SubmissionId},
    validation::ValidContact,
};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("submission store is full ({limit} entries)")]
    CapacityExceeded { limit: usize },
    #[error("generated submission id {0} is already taken")]
    DuplicateId(SubmissionId),
}

pub type Result<T> = std::result::Result<T, StorageError>;

#[async_trait]
pub trait SubmissionStore: Send + Sync {
    async fn save_submission(&self, contact: ValidContact) -> Result<ContactSubmission>;
    /// Most recent submission first.
    async fn list_submissions(&self) -> Result<Vec<ContactSubmission>>;
    async fn load_submission(&self, id: SubmissionId) -> Result<Option<ContactSubmission>>;
}

#[derive(Debug, Clone)]
struct StoredSubmission {
    sequence: u64,
    submission: ContactSubmission,
}

#[derive(Debug, Default)]
struct MemoryInner {
    next_sequence: u64,
    submissions: HashMap<SubmissionId, StoredSubmission>,
}

/// Process-lifetime store. Nothing survives a restart.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<MemoryInner>>,
    max_entries: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity_limit(max_entries: usize) -> Self {
        Self {
            inner: Arc::default(),
            max_entries: Some(max_entries),
        }
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.submissions.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    async fn insert_with_id(
        &self,
        id: SubmissionId,
        contact: ValidContact,
    ) -> Result<ContactSubmission> {
        let mut inner = self.inner.write().await;
        if let Some(limit) = self.max_entries {
            if inner.submissions.len() >= limit {
                return Err(StorageError::CapacityExceeded { limit });
            }
        }
        if inner.submissions.contains_key(&id) {
            return Err(StorageError::DuplicateId(id));
        }

        let submission = ContactSubmission {
            id,
            name: contact.name,
            email: contact.email,
            message: contact.message,
            submitted_at: Utc::now(),
        };
        let sequence = inner.next_sequence;
        inner.next_sequence += 1;
        inner.submissions.insert(
            id,
            StoredSubmission {
                sequence,
                submission: submission.clone(),
            },
        );
        debug!(%id, sequence, "stored contact submission");
        Ok(submission)
    }
}

#[async_trait]
impl SubmissionStore for MemoryStore {
    async fn save_submission(&self, contact: ValidContact) -> Result<ContactSubmission> {
        self.insert_with_id(SubmissionId::generate(), contact).await
    }

    async fn list_submissions(&self) -> Result<Vec<ContactSubmission>> {
        let inner = self.inner.read().await;
        let mut stored: Vec<&StoredSubmission> = inner.submissions.values().collect();
        stored.sort_by(|a, b| {
            b.submission
                .submitted_at
                .cmp(&a.submission.submitted_at)
                .then(b.sequence.cmp(&a.sequence))
        });
        Ok(stored
            .into_iter()
            .map(|entry| entry.submission.clone())
            .collect())
    }

    async fn load_submission(&self, id: SubmissionId) -> Result<Option<ContactSubmission>> {
        Ok(self
            .inner
            .read()
            .await
            .submissions
            .get(&id)
            .map(|entry| entry.submission.clone()))
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
