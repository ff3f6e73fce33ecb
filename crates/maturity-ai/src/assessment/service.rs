use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::domain::{
    AssessmentDraft, AssessmentId, AssessmentKey, AssessmentRecord, AssessmentType, Industry,
    Insights, PillarScore, Question, ResponseEntry, UserId, WeightEntry,
};
use super::repository::{AssessmentBackend, DeletionSummary, StoreError};
use super::scoring::{percent, NormalizationError, ScoringEngine, ScoringOutcome, WeightProfile};
use super::validation::{ResponseGuard, ValidatedResponse, ValidationError};
use crate::config::ScoringConfig;

/// Service composing the response guard, scoring engine, and storage handle.
pub struct AssessmentService<B> {
    guard: ResponseGuard,
    backend: Arc<B>,
    engine: ScoringEngine,
    writers: WriterLocks,
}

/// One lock per (user, assessment type), the scope shared by the user's stored answers.
///
/// Held across write, read, score, and upsert so every record reflects exactly one
/// submission's answers.
#[derive(Debug, Default)]
struct WriterLocks {
    slots: Mutex<HashMap<(UserId, AssessmentType), Arc<Mutex<()>>>>,
}

impl WriterLocks {
    fn slot(
        &self,
        user_id: UserId,
        assessment_type: &AssessmentType,
    ) -> Result<Arc<Mutex<()>>, StoreError> {
        let mut slots = self
            .slots
            .lock()
            .map_err(|_| StoreError::Unavailable("writer lock table poisoned".to_string()))?;
        // Slots nobody holds are dropped so the table tracks in-flight writers only.
        slots.retain(|_, slot| Arc::strong_count(slot) > 1);
        Ok(slots
            .entry((user_id, assessment_type.clone()))
            .or_default()
            .clone())
    }
}

/// Lightweight progress check, usable before a final submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreProgress {
    pub score: f64,
    /// False when no pillar carried weight; the score is then 0 by definition.
    pub complete: bool,
    pub completion_rate: u32,
    pub total_questions: u32,
    pub answered_questions: u32,
    pub pillar_scores: Vec<PillarScore>,
}

/// Inbound submission. Responses, when present, are recorded before scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionRequest {
    pub user_id: UserId,
    pub assessment_type: AssessmentType,
    pub industry: Industry,
    #[serde(default)]
    pub responses: Vec<ResponseEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionResult {
    pub assessment_id: AssessmentId,
    pub is_new: bool,
    pub overall_score: f64,
    pub complete: bool,
    pub pillar_scores: Vec<PillarScore>,
    pub insights: Insights,
}

impl<B> AssessmentService<B>
where
    B: AssessmentBackend + 'static,
{
    pub fn new(backend: Arc<B>, config: ScoringConfig) -> Self {
        Self {
            guard: ResponseGuard,
            backend,
            engine: ScoringEngine::new(config),
            writers: WriterLocks::default(),
        }
    }

    pub fn backend(&self) -> &Arc<B> {
        &self.backend
    }

    /// Score the responses recorded so far without persisting anything.
    pub fn calculate_score(
        &self,
        user_id: UserId,
        assessment_type: &AssessmentType,
    ) -> Result<ScoreProgress, AssessmentError> {
        let questions = self.backend.list_active_questions(assessment_type)?;
        let (outcome, _) = self.score_stored(user_id, assessment_type, &questions)?;

        let total_questions = outcome.total_questions();
        let answered_questions = outcome.answered_questions();

        Ok(ScoreProgress {
            score: outcome.overall_score(),
            complete: outcome.composite.complete,
            completion_rate: percent(answered_questions, total_questions),
            total_questions,
            answered_questions,
            pillar_scores: outcome.composite.pillar_scores,
        })
    }

    /// Validate and record a batch of answers. Nothing is written if any entry is invalid.
    pub fn record_responses(
        &self,
        user_id: UserId,
        assessment_type: &AssessmentType,
        responses: &[ResponseEntry],
    ) -> Result<usize, AssessmentError> {
        let questions = self.backend.list_active_questions(assessment_type)?;
        let validated = self
            .guard
            .validate_batch(assessment_type, &questions, responses)?;

        let slot = self.writers.slot(user_id, assessment_type)?;
        let _writer = slot.lock().unwrap_or_else(PoisonError::into_inner);
        self.write_responses(user_id, &validated)
    }

    /// Run the full pipeline and upsert the record for (user, type, industry).
    pub fn submit_assessment(
        &self,
        request: SubmissionRequest,
    ) -> Result<SubmissionResult, AssessmentError> {
        let SubmissionRequest {
            user_id,
            assessment_type,
            industry,
            responses,
        } = request;

        self.guard.validate_industry(&industry)?;
        let questions = self.backend.list_active_questions(&assessment_type)?;
        let inline = self
            .guard
            .validate_batch(&assessment_type, &questions, &responses)?;

        // Surface normalization failures before the inline answers are written.
        let stored_weights = self.backend.get_weights(&assessment_type)?;
        self.engine
            .resolve_weights(&assessment_type, &questions, &stored_weights)?;

        let slot = self.writers.slot(user_id, &assessment_type)?;
        let _writer = slot.lock().unwrap_or_else(PoisonError::into_inner);

        self.write_responses(user_id, &inline)?;

        let (outcome, stored_responses) =
            self.score_stored(user_id, &assessment_type, &questions)?;

        let ScoringOutcome {
            composite,
            insights,
            ..
        } = outcome;
        let complete = composite.complete;

        let draft = AssessmentDraft {
            key: AssessmentKey {
                user_id,
                assessment_type: assessment_type.clone(),
                industry: industry.clone(),
            },
            overall_score: composite.overall_score,
            pillar_scores: composite.pillar_scores,
            responses: stored_responses,
            insights,
        };

        let upserted = self.backend.upsert(draft)?;
        let record = upserted.record;

        info!(
            %user_id,
            %assessment_type,
            %industry,
            assessment_id = %record.id,
            overall_score = record.overall_score,
            is_new = upserted.is_new,
            "assessment stored"
        );

        Ok(SubmissionResult {
            assessment_id: record.id,
            is_new: upserted.is_new,
            overall_score: record.overall_score,
            complete,
            pillar_scores: record.pillar_scores,
            insights: record.insights,
        })
    }

    /// Resolved pillar weights for an assessment type.
    pub fn get_weight_profile(
        &self,
        assessment_type: &AssessmentType,
    ) -> Result<WeightProfile, AssessmentError> {
        let questions = self.backend.list_active_questions(assessment_type)?;
        let stored = self.backend.get_weights(assessment_type)?;
        Ok(self
            .engine
            .resolve_weights(assessment_type, &questions, &stored)?)
    }

    /// Store an explicit weight for a pillar, refusing overrides that break normalization.
    pub fn set_weight_override(
        &self,
        assessment_type: &AssessmentType,
        pillar_code: &str,
        weight: f64,
    ) -> Result<WeightProfile, AssessmentError> {
        let questions = self.backend.list_active_questions(assessment_type)?;
        self.guard
            .validate_weight_override(assessment_type, &questions, pillar_code, weight)?;

        let entry = WeightEntry {
            assessment_type: assessment_type.clone(),
            pillar_code: pillar_code.to_string(),
            weight,
            is_default: false,
        };

        let mut candidate: Vec<WeightEntry> = self
            .backend
            .get_weights(assessment_type)?
            .into_iter()
            .filter(|existing| existing.pillar_code != pillar_code)
            .collect();
        candidate.push(entry.clone());
        let profile = self
            .engine
            .resolve_weights(assessment_type, &questions, &candidate)?;

        self.backend.put_weight(entry)?;
        info!(%assessment_type, pillar = pillar_code, weight, "weight override stored");
        Ok(profile)
    }

    /// Drop an explicit weight so the pillar falls back to its default share.
    pub fn clear_weight_override(
        &self,
        assessment_type: &AssessmentType,
        pillar_code: &str,
    ) -> Result<WeightProfile, AssessmentError> {
        if !self.backend.remove_weight(assessment_type, pillar_code)? {
            return Err(StoreError::NotFound.into());
        }
        info!(%assessment_type, pillar = pillar_code, "weight override cleared");
        self.get_weight_profile(assessment_type)
    }

    pub fn get_assessment(&self, key: &AssessmentKey) -> Result<AssessmentRecord, AssessmentError> {
        let record = self.backend.find(key)?.ok_or(StoreError::NotFound)?;
        Ok(record)
    }

    /// Remove a user's responses and assessment records.
    pub fn delete_user(&self, user_id: UserId) -> Result<DeletionSummary, AssessmentError> {
        let summary = self.backend.erase_user(user_id)?;
        info!(
            %user_id,
            assessments = summary.assessments,
            responses = summary.responses,
            "user data deleted"
        );
        Ok(summary)
    }

    /// Score one snapshot of the stored responses; the snapshot is returned alongside.
    fn score_stored(
        &self,
        user_id: UserId,
        assessment_type: &AssessmentType,
        questions: &[Question],
    ) -> Result<(ScoringOutcome, Vec<ResponseEntry>), AssessmentError> {
        let stored = self.backend.get_responses(user_id, assessment_type)?;
        let responses = self.guard.validate_stored(questions, &stored)?;
        let weights = self.backend.get_weights(assessment_type)?;
        let outcome = self
            .engine
            .evaluate(assessment_type, questions, &responses, &weights)?;
        debug!(
            %user_id,
            %assessment_type,
            overall_score = outcome.overall_score(),
            complete = outcome.composite.complete,
            "scored stored responses"
        );
        Ok((outcome, stored))
    }

    fn write_responses(
        &self,
        user_id: UserId,
        responses: &[ValidatedResponse],
    ) -> Result<usize, AssessmentError> {
        if responses.is_empty() {
            return Ok(0);
        }
        let entries: Vec<ResponseEntry> = responses.iter().map(ValidatedResponse::entry).collect();
        Ok(self.backend.upsert_responses(user_id, &entries)?)
    }
}

/// Error raised by the assessment service.
#[derive(Debug, thiserror::Error)]
pub enum AssessmentError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Normalization(#[from] NormalizationError),
    #[error(transparent)]
    Persistence(#[from] StoreError),
}

impl AssessmentError {
    /// Stable label callers can use to tell invalid input apart from storage trouble.
    pub const fn kind(&self) -> &'static str {
        match self {
            AssessmentError::Validation(_) => "validation",
            AssessmentError::Normalization(_) => "normalization",
            AssessmentError::Persistence(StoreError::NotFound) => "not_found",
            AssessmentError::Persistence(_) => "persistence",
        }
    }
}
