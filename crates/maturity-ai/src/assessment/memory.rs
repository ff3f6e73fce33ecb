use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};

use super::domain::{
    AssessmentDraft, AssessmentId, AssessmentKey, AssessmentRecord, AssessmentType, Question,
    QuestionId, ResponseEntry, UserId, WeightEntry,
};
use super::repository::{
    AssessmentStore, DeletionSummary, QuestionCatalog, ResponseStore, StoreError, UpsertOutcome,
    UserDataStore, WeightStore,
};

/// In-process store implementing every collaborator behind a single lock.
///
/// Assessment rows keep their breakdown, responses, and insights as JSON columns, and the
/// (user, type, industry) key is the map key, so a second row for a tuple cannot exist.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

#[derive(Debug, Default)]
struct Tables {
    questions: Vec<Question>,
    responses: BTreeMap<(UserId, QuestionId), f64>,
    weights: BTreeMap<(AssessmentType, String), WeightEntry>,
    assessments: BTreeMap<AssessmentKey, AssessmentRow>,
    next_assessment: u64,
}

impl Tables {
    fn next_id(&mut self) -> AssessmentId {
        self.next_assessment += 1;
        AssessmentId(format!("asm-{:06}", self.next_assessment))
    }
}

#[derive(Debug, Clone)]
struct AssessmentRow {
    id: AssessmentId,
    overall_score: f64,
    pillar_scores: String,
    responses: String,
    insights: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl AssessmentRow {
    fn encode(
        id: AssessmentId,
        draft: &AssessmentDraft,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<Self, StoreError> {
        Ok(Self {
            id,
            overall_score: draft.overall_score,
            pillar_scores: serde_json::to_string(&draft.pillar_scores)?,
            responses: serde_json::to_string(&draft.responses)?,
            insights: serde_json::to_string(&draft.insights)?,
            created_at,
            updated_at,
        })
    }

    fn decode(&self, key: &AssessmentKey) -> Result<AssessmentRecord, StoreError> {
        Ok(AssessmentRecord {
            id: self.id.clone(),
            key: key.clone(),
            overall_score: self.overall_score,
            pillar_scores: serde_json::from_str(&self.pillar_scores)?,
            responses: serde_json::from_str(&self.responses)?,
            insights: serde_json::from_str(&self.insights)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_questions(questions: impl IntoIterator<Item = Question>) -> Self {
        let store = Self::default();
        if let Ok(mut tables) = store.tables.lock() {
            tables.questions.extend(questions);
        }
        store
    }

    pub fn add_question(&self, question: Question) -> Result<(), StoreError> {
        let mut tables = self.tables()?;
        tables.questions.retain(|existing| existing.id != question.id);
        tables.questions.push(question);
        Ok(())
    }

    pub fn assessment_count(&self) -> Result<usize, StoreError> {
        Ok(self.tables()?.assessments.len())
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>, StoreError> {
        self.tables
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }
}

impl QuestionCatalog for MemoryStore {
    fn list_active_questions(
        &self,
        assessment_type: &AssessmentType,
    ) -> Result<Vec<Question>, StoreError> {
        let tables = self.tables()?;
        let mut questions: Vec<Question> = tables
            .questions
            .iter()
            .filter(|question| question.active && &question.assessment_type == assessment_type)
            .cloned()
            .collect();
        questions.sort_by_key(|question| (question.display_order, question.id));
        Ok(questions)
    }
}

impl ResponseStore for MemoryStore {
    fn get_responses(
        &self,
        user_id: UserId,
        assessment_type: &AssessmentType,
    ) -> Result<Vec<ResponseEntry>, StoreError> {
        let tables = self.tables()?;
        let responses = tables
            .responses
            .iter()
            .filter(|((owner, question_id), _)| {
                *owner == user_id
                    && tables.questions.iter().any(|question| {
                        question.id == *question_id && &question.assessment_type == assessment_type
                    })
            })
            .map(|((_, question_id), value)| ResponseEntry {
                question_id: *question_id,
                value: *value,
            })
            .collect();
        Ok(responses)
    }

    fn upsert_response(
        &self,
        user_id: UserId,
        question_id: QuestionId,
        value: f64,
    ) -> Result<(), StoreError> {
        self.upsert_responses(user_id, &[ResponseEntry { question_id, value }])
            .map(|_| ())
    }

    fn upsert_responses(
        &self,
        user_id: UserId,
        entries: &[ResponseEntry],
    ) -> Result<usize, StoreError> {
        let mut tables = self.tables()?;
        // Check the whole batch before touching the table.
        for entry in entries {
            if !tables
                .questions
                .iter()
                .any(|question| question.id == entry.question_id)
            {
                return Err(StoreError::NotFound);
            }
        }
        for entry in entries {
            tables
                .responses
                .insert((user_id, entry.question_id), entry.value);
        }
        Ok(entries.len())
    }
}

impl WeightStore for MemoryStore {
    fn get_weights(&self, assessment_type: &AssessmentType) -> Result<Vec<WeightEntry>, StoreError> {
        let tables = self.tables()?;
        Ok(tables
            .weights
            .values()
            .filter(|entry| &entry.assessment_type == assessment_type)
            .cloned()
            .collect())
    }

    fn put_weight(&self, entry: WeightEntry) -> Result<(), StoreError> {
        let mut tables = self.tables()?;
        tables.weights.insert(
            (entry.assessment_type.clone(), entry.pillar_code.clone()),
            entry,
        );
        Ok(())
    }

    fn remove_weight(
        &self,
        assessment_type: &AssessmentType,
        pillar_code: &str,
    ) -> Result<bool, StoreError> {
        let mut tables = self.tables()?;
        Ok(tables
            .weights
            .remove(&(assessment_type.clone(), pillar_code.to_string()))
            .is_some())
    }
}

impl AssessmentStore for MemoryStore {
    fn find(&self, key: &AssessmentKey) -> Result<Option<AssessmentRecord>, StoreError> {
        let tables = self.tables()?;
        tables
            .assessments
            .get(key)
            .map(|row| row.decode(key))
            .transpose()
    }

    fn insert(&self, draft: AssessmentDraft) -> Result<AssessmentRecord, StoreError> {
        let mut tables = self.tables()?;
        if tables.assessments.contains_key(&draft.key) {
            return Err(StoreError::Conflict);
        }
        let now = Utc::now();
        let id = tables.next_id();
        let row = AssessmentRow::encode(id, &draft, now, now)?;
        let record = row.decode(&draft.key)?;
        tables.assessments.insert(draft.key, row);
        Ok(record)
    }

    fn update(
        &self,
        id: &AssessmentId,
        draft: AssessmentDraft,
    ) -> Result<AssessmentRecord, StoreError> {
        let mut tables = self.tables()?;
        let created_at = match tables.assessments.get(&draft.key) {
            Some(existing) if &existing.id == id => existing.created_at,
            Some(_) => return Err(StoreError::Conflict),
            None => return Err(StoreError::NotFound),
        };
        let row = AssessmentRow::encode(id.clone(), &draft, created_at, Utc::now())?;
        let record = row.decode(&draft.key)?;
        tables.assessments.insert(draft.key, row);
        Ok(record)
    }

    fn upsert(&self, draft: AssessmentDraft) -> Result<UpsertOutcome, StoreError> {
        let mut tables = self.tables()?;
        let now = Utc::now();
        let existing = tables
            .assessments
            .get(&draft.key)
            .map(|row| (row.id.clone(), row.created_at));
        let (row, is_new) = match existing {
            Some((id, created_at)) => (AssessmentRow::encode(id, &draft, created_at, now)?, false),
            None => {
                let id = tables.next_id();
                (AssessmentRow::encode(id, &draft, now, now)?, true)
            }
        };
        let record = row.decode(&draft.key)?;
        tables.assessments.insert(draft.key, row);
        Ok(UpsertOutcome { record, is_new })
    }
}

impl UserDataStore for MemoryStore {
    fn erase_user(&self, user_id: UserId) -> Result<DeletionSummary, StoreError> {
        let mut tables = self.tables()?;
        let responses_before = tables.responses.len();
        let assessments_before = tables.assessments.len();
        tables.responses.retain(|(owner, _), _| *owner != user_id);
        tables.assessments.retain(|key, _| key.user_id != user_id);
        Ok(DeletionSummary {
            responses: responses_before - tables.responses.len(),
            assessments: assessments_before - tables.assessments.len(),
        })
    }
}
