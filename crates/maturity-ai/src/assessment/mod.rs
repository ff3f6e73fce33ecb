//! Likert-scale maturity scoring: weight resolution, pillar aggregation, weighted
//! composition, insight generation, and the upsert-backed record manager.

pub mod domain;
pub mod memory;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;
pub mod validation;

#[cfg(test)]
mod tests;

pub use domain::{
    AssessmentDraft, AssessmentId, AssessmentKey, AssessmentRecord, AssessmentType, GapPriority,
    Industry, Insights, MaturityCategory, PillarGap, PillarRole, PillarScore, PillarStrength,
    PillarWeight, Question, QuestionId, ResponseEntry, UserId, WeightEntry,
};
pub use memory::MemoryStore;
pub use repository::{
    AssessmentBackend, AssessmentStore, DeletionSummary, QuestionCatalog, ResponseStore,
    StoreError, UpsertOutcome, UserDataStore, WeightStore,
};
pub use router::assessment_router;
pub use scoring::{CompositeScore, NormalizationError, ScoringEngine, ScoringOutcome, WeightProfile};
pub use service::{
    AssessmentError, AssessmentService, ScoreProgress, SubmissionRequest, SubmissionResult,
};
pub use validation::{LikertValue, ResponseGuard, ValidationError};
