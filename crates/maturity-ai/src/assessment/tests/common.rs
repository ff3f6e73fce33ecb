use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::assessment::domain::{
    AssessmentDraft, AssessmentId, AssessmentKey, AssessmentRecord, AssessmentType, Industry,
    PillarRole, Question, QuestionId, ResponseEntry, UserId, WeightEntry,
};
use crate::assessment::memory::MemoryStore;
use crate::assessment::repository::{
    AssessmentStore, DeletionSummary, QuestionCatalog, ResponseStore, StoreError, UpsertOutcome,
    UserDataStore, WeightStore,
};
use crate::assessment::service::{AssessmentService, SubmissionRequest};
use crate::config::ScoringConfig;

pub(super) const PILLARS: [(&str, &str); 4] = [
    ("STR", "AI Strategy"),
    ("DATA", "Data Readiness"),
    ("TECH", "Technology Infrastructure"),
    ("SEC", "Security & Governance"),
];

pub(super) const QUESTIONS_PER_PILLAR: u64 = 3;

pub(super) fn core() -> AssessmentType {
    AssessmentType::new("CORE")
}

pub(super) fn advanced() -> AssessmentType {
    AssessmentType::new("ADVANCED")
}

/// Four pillars of three questions each; ids start at `first_id`.
pub(super) fn catalog(assessment_type: AssessmentType, first_id: u64) -> Vec<Question> {
    let mut questions = Vec::new();
    let mut order = 0;
    for (pillar_index, (code, name)) in PILLARS.iter().enumerate() {
        for offset in 0..QUESTIONS_PER_PILLAR {
            order += 1;
            questions.push(Question {
                id: QuestionId(first_id + pillar_index as u64 * QUESTIONS_PER_PILLAR + offset),
                assessment_type: assessment_type.clone(),
                pillar_code: code.to_string(),
                pillar_name: name.to_string(),
                role: PillarRole::infer(code, name),
                display_order: order,
                active: true,
            });
        }
    }
    questions
}

pub(super) fn seeded_store() -> MemoryStore {
    let mut questions = catalog(core(), 1);
    questions.extend(catalog(advanced(), 101));
    MemoryStore::with_questions(questions)
}

pub(super) fn build_service() -> (AssessmentService<MemoryStore>, Arc<MemoryStore>) {
    let store = Arc::new(seeded_store());
    let service = AssessmentService::new(store.clone(), ScoringConfig::default());
    (service, store)
}

/// Answer every question of the type with the same value.
pub(super) fn uniform_answers(assessment_type: &AssessmentType, value: f64) -> Vec<ResponseEntry> {
    let first_id = if assessment_type == &advanced() { 101 } else { 1 };
    catalog(assessment_type.clone(), first_id)
        .into_iter()
        .map(|question| ResponseEntry {
            question_id: question.id,
            value,
        })
        .collect()
}

/// Answer questions pillar by pillar with the given value for each pillar.
pub(super) fn pillar_answers(
    assessment_type: &AssessmentType,
    per_pillar: [f64; 4],
) -> Vec<ResponseEntry> {
    let first_id = if assessment_type == &advanced() { 101 } else { 1 };
    catalog(assessment_type.clone(), first_id)
        .into_iter()
        .map(|question| {
            let pillar_index = PILLARS
                .iter()
                .position(|(code, _)| *code == question.pillar_code)
                .unwrap_or(0);
            ResponseEntry {
                question_id: question.id,
                value: per_pillar[pillar_index],
            }
        })
        .collect()
}

pub(super) fn submission(
    user_id: u64,
    assessment_type: AssessmentType,
    industry: &str,
    responses: Vec<ResponseEntry>,
) -> SubmissionRequest {
    SubmissionRequest {
        user_id: UserId(user_id),
        assessment_type,
        industry: Industry::new(industry),
        responses,
    }
}

pub(super) fn override_entry(assessment_type: AssessmentType, code: &str, weight: f64) -> WeightEntry {
    WeightEntry {
        assessment_type,
        pillar_code: code.to_string(),
        weight,
        is_default: false,
    }
}

pub(super) fn key(user_id: u64, assessment_type: AssessmentType, industry: &str) -> AssessmentKey {
    AssessmentKey {
        user_id: UserId(user_id),
        assessment_type,
        industry: Industry::new(industry),
    }
}

/// Catalog and reads work; every write fails.
pub(super) struct ReadOnlyStore {
    pub(super) inner: MemoryStore,
}

impl ReadOnlyStore {
    pub(super) fn new() -> Self {
        Self {
            inner: seeded_store(),
        }
    }
}

fn offline() -> StoreError {
    StoreError::Unavailable("database offline".to_string())
}

impl QuestionCatalog for ReadOnlyStore {
    fn list_active_questions(
        &self,
        assessment_type: &AssessmentType,
    ) -> Result<Vec<Question>, StoreError> {
        self.inner.list_active_questions(assessment_type)
    }
}

impl ResponseStore for ReadOnlyStore {
    fn get_responses(
        &self,
        user_id: UserId,
        assessment_type: &AssessmentType,
    ) -> Result<Vec<ResponseEntry>, StoreError> {
        self.inner.get_responses(user_id, assessment_type)
    }

    fn upsert_response(
        &self,
        _user_id: UserId,
        _question_id: QuestionId,
        _value: f64,
    ) -> Result<(), StoreError> {
        Err(offline())
    }

    fn upsert_responses(
        &self,
        _user_id: UserId,
        _entries: &[ResponseEntry],
    ) -> Result<usize, StoreError> {
        Err(offline())
    }
}

impl WeightStore for ReadOnlyStore {
    fn get_weights(&self, assessment_type: &AssessmentType) -> Result<Vec<WeightEntry>, StoreError> {
        self.inner.get_weights(assessment_type)
    }

    fn put_weight(&self, _entry: WeightEntry) -> Result<(), StoreError> {
        Err(offline())
    }

    fn remove_weight(
        &self,
        _assessment_type: &AssessmentType,
        _pillar_code: &str,
    ) -> Result<bool, StoreError> {
        Err(offline())
    }
}

impl AssessmentStore for ReadOnlyStore {
    fn find(&self, key: &AssessmentKey) -> Result<Option<AssessmentRecord>, StoreError> {
        self.inner.find(key)
    }

    fn insert(&self, _draft: AssessmentDraft) -> Result<AssessmentRecord, StoreError> {
        Err(offline())
    }

    fn update(
        &self,
        _id: &AssessmentId,
        _draft: AssessmentDraft,
    ) -> Result<AssessmentRecord, StoreError> {
        Err(offline())
    }

    fn upsert(&self, _draft: AssessmentDraft) -> Result<UpsertOutcome, StoreError> {
        Err(offline())
    }
}

impl UserDataStore for ReadOnlyStore {
    fn erase_user(&self, _user_id: UserId) -> Result<DeletionSummary, StoreError> {
        Err(offline())
    }
}

type Hook = Box<dyn FnOnce() + Send>;

/// Seeded store that counts response writes and can run a callback once, right after
/// the first batch of answers lands.
pub(super) struct HookStore {
    pub(super) inner: MemoryStore,
    pub(super) batch_writes: AtomicUsize,
    pub(super) single_writes: AtomicUsize,
    hook: Mutex<Option<Hook>>,
}

impl HookStore {
    pub(super) fn new() -> Self {
        Self {
            inner: seeded_store(),
            batch_writes: AtomicUsize::new(0),
            single_writes: AtomicUsize::new(0),
            hook: Mutex::new(None),
        }
    }

    pub(super) fn after_first_batch(&self, hook: impl FnOnce() + Send + 'static) {
        *self.hook.lock().expect("hook lock") = Some(Box::new(hook));
    }
}

impl QuestionCatalog for HookStore {
    fn list_active_questions(
        &self,
        assessment_type: &AssessmentType,
    ) -> Result<Vec<Question>, StoreError> {
        self.inner.list_active_questions(assessment_type)
    }
}

impl ResponseStore for HookStore {
    fn get_responses(
        &self,
        user_id: UserId,
        assessment_type: &AssessmentType,
    ) -> Result<Vec<ResponseEntry>, StoreError> {
        self.inner.get_responses(user_id, assessment_type)
    }

    fn upsert_response(
        &self,
        user_id: UserId,
        question_id: QuestionId,
        value: f64,
    ) -> Result<(), StoreError> {
        self.single_writes.fetch_add(1, Ordering::SeqCst);
        self.inner.upsert_response(user_id, question_id, value)
    }

    fn upsert_responses(
        &self,
        user_id: UserId,
        entries: &[ResponseEntry],
    ) -> Result<usize, StoreError> {
        self.batch_writes.fetch_add(1, Ordering::SeqCst);
        let written = self.inner.upsert_responses(user_id, entries)?;
        let hook = self.hook.lock().expect("hook lock").take();
        if let Some(hook) = hook {
            hook();
        }
        Ok(written)
    }
}

impl WeightStore for HookStore {
    fn get_weights(&self, assessment_type: &AssessmentType) -> Result<Vec<WeightEntry>, StoreError> {
        self.inner.get_weights(assessment_type)
    }

    fn put_weight(&self, entry: WeightEntry) -> Result<(), StoreError> {
        self.inner.put_weight(entry)
    }

    fn remove_weight(
        &self,
        assessment_type: &AssessmentType,
        pillar_code: &str,
    ) -> Result<bool, StoreError> {
        self.inner.remove_weight(assessment_type, pillar_code)
    }
}

impl AssessmentStore for HookStore {
    fn find(&self, key: &AssessmentKey) -> Result<Option<AssessmentRecord>, StoreError> {
        self.inner.find(key)
    }

    fn insert(&self, draft: AssessmentDraft) -> Result<AssessmentRecord, StoreError> {
        self.inner.insert(draft)
    }

    fn update(
        &self,
        id: &AssessmentId,
        draft: AssessmentDraft,
    ) -> Result<AssessmentRecord, StoreError> {
        self.inner.update(id, draft)
    }

    fn upsert(&self, draft: AssessmentDraft) -> Result<UpsertOutcome, StoreError> {
        self.inner.upsert(draft)
    }
}

impl UserDataStore for HookStore {
    fn erase_user(&self, user_id: UserId) -> Result<DeletionSummary, StoreError> {
        self.inner.erase_user(user_id)
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
