mod aggregate;
mod compose;
mod insights;
mod weights;

pub use compose::CompositeScore;
pub use weights::{NormalizationError, WeightProfile};

pub(crate) use aggregate::percent;

use serde::{Deserialize, Serialize};

use super::domain::{AssessmentType, Insights, PillarScore, Question, WeightEntry};
use super::validation::ValidatedResponse;
use crate::config::ScoringConfig;

/// Stateless evaluator turning catalog, responses, and stored weights into a scored result.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    config: ScoringConfig,
}

impl ScoringEngine {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn resolve_weights(
        &self,
        assessment_type: &AssessmentType,
        questions: &[Question],
        stored: &[WeightEntry],
    ) -> Result<WeightProfile, NormalizationError> {
        let active = aggregate::active_pillars(questions);
        weights::resolve_weights(
            assessment_type,
            &active,
            stored,
            self.config.weight_tolerance,
        )
    }

    pub fn aggregate(
        &self,
        questions: &[Question],
        responses: &[ValidatedResponse],
    ) -> Vec<PillarScore> {
        aggregate::aggregate_pillars(questions, responses)
    }

    pub fn compose(&self, pillar_scores: Vec<PillarScore>, profile: &WeightProfile) -> CompositeScore {
        compose::compose(pillar_scores, &profile.entries)
    }

    pub fn insights(&self, composite: &CompositeScore) -> Insights {
        insights::generate_insights(composite.overall_score, &composite.pillar_scores)
    }

    /// Run the full pipeline: resolve weights, aggregate, compose, and derive insights.
    pub fn evaluate(
        &self,
        assessment_type: &AssessmentType,
        questions: &[Question],
        responses: &[ValidatedResponse],
        stored: &[WeightEntry],
    ) -> Result<ScoringOutcome, NormalizationError> {
        let profile = self.resolve_weights(assessment_type, questions, stored)?;
        let pillar_scores = self.aggregate(questions, responses);
        let composite = self.compose(pillar_scores, &profile);
        let insights = self.insights(&composite);

        Ok(ScoringOutcome {
            composite,
            profile,
            insights,
        })
    }
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self::new(ScoringConfig::default())
    }
}

/// Everything produced by a single scoring pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringOutcome {
    pub composite: CompositeScore,
    pub profile: WeightProfile,
    pub insights: Insights,
}

impl ScoringOutcome {
    pub fn overall_score(&self) -> f64 {
        self.composite.overall_score
    }

    pub fn total_questions(&self) -> u32 {
        self.composite
            .pillar_scores
            .iter()
            .map(|pillar| pillar.total_questions)
            .sum()
    }

    pub fn answered_questions(&self) -> u32 {
        self.composite
            .pillar_scores
            .iter()
            .map(|pillar| pillar.answered_questions)
            .sum()
    }
}
