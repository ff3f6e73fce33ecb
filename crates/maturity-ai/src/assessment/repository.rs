use serde::{Deserialize, Serialize};

use super::domain::{
    AssessmentDraft, AssessmentId, AssessmentKey, AssessmentRecord, AssessmentType, Question,
    QuestionId, ResponseEntry, UserId, WeightEntry,
};

/// Read access to the question catalog.
pub trait QuestionCatalog: Send + Sync {
    fn list_active_questions(
        &self,
        assessment_type: &AssessmentType,
    ) -> Result<Vec<Question>, StoreError>;
}

/// One response per (user, question); writes overwrite in place.
pub trait ResponseStore: Send + Sync {
    fn get_responses(
        &self,
        user_id: UserId,
        assessment_type: &AssessmentType,
    ) -> Result<Vec<ResponseEntry>, StoreError>;
    fn upsert_response(
        &self,
        user_id: UserId,
        question_id: QuestionId,
        value: f64,
    ) -> Result<(), StoreError>;
    /// Write a whole batch or nothing; returns the number of entries written.
    fn upsert_responses(
        &self,
        user_id: UserId,
        entries: &[ResponseEntry],
    ) -> Result<usize, StoreError>;
}

/// Explicit and default weight rows per assessment type.
pub trait WeightStore: Send + Sync {
    fn get_weights(&self, assessment_type: &AssessmentType) -> Result<Vec<WeightEntry>, StoreError>;
    fn put_weight(&self, entry: WeightEntry) -> Result<(), StoreError>;
    fn remove_weight(
        &self,
        assessment_type: &AssessmentType,
        pillar_code: &str,
    ) -> Result<bool, StoreError>;
}

/// Persistence for assessment records keyed by (user, assessment type, industry).
pub trait AssessmentStore: Send + Sync {
    fn find(&self, key: &AssessmentKey) -> Result<Option<AssessmentRecord>, StoreError>;
    fn insert(&self, draft: AssessmentDraft) -> Result<AssessmentRecord, StoreError>;
    fn update(&self, id: &AssessmentId, draft: AssessmentDraft)
        -> Result<AssessmentRecord, StoreError>;
    /// Insert or overwrite the record for `draft.key` as one atomic step.
    ///
    /// Concurrent upserts for the same key must leave exactly one record holding one
    /// complete draft.
    fn upsert(&self, draft: AssessmentDraft) -> Result<UpsertOutcome, StoreError>;
}

/// Removal of everything stored for a user.
pub trait UserDataStore: Send + Sync {
    /// Delete the user's responses and assessment records together; a failure leaves both.
    fn erase_user(&self, user_id: UserId) -> Result<DeletionSummary, StoreError>;
}

/// Convenience bound for a handle that provides every collaborator.
pub trait AssessmentBackend:
    QuestionCatalog + ResponseStore + WeightStore + AssessmentStore + UserDataStore
{
}

impl<T> AssessmentBackend for T where
    T: QuestionCatalog + ResponseStore + WeightStore + AssessmentStore + UserDataStore
{
}

/// Rows removed by [`UserDataStore::erase_user`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletionSummary {
    pub responses: usize,
    pub assessments: usize,
}

/// Result of an upsert: the stored record and whether it was created.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpsertOutcome {
    pub record: AssessmentRecord,
    pub is_new: bool,
}

/// Error enumeration for storage failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("stored payload could not be encoded or decoded: {0}")]
    Serialization(#[from] serde_json::Error),
}
