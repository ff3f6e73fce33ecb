use std::collections::HashMap;

use super::domain::{AssessmentType, Industry, Question, QuestionId, ResponseEntry};

pub const LIKERT_MIN: u8 = 1;
pub const LIKERT_MAX: u8 = 5;

/// Validation errors raised before any state is mutated.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("response to question {question_id} must be an integer between 1 and 5 (found {value})")]
    OutOfRange { question_id: QuestionId, value: f64 },
    #[error("response to question {question_id} must be a whole number (found {value})")]
    NonInteger { question_id: QuestionId, value: f64 },
    #[error("question {question_id} is not an active question of assessment type {assessment_type}")]
    UnknownQuestion {
        question_id: QuestionId,
        assessment_type: AssessmentType,
    },
    #[error("pillar {pillar_code} has no active questions in assessment type {assessment_type}")]
    UnknownPillar {
        pillar_code: String,
        assessment_type: AssessmentType,
    },
    #[error("weight for pillar {pillar_code} must be between 0 and 100 (found {weight})")]
    WeightOutOfRange { pillar_code: String, weight: f64 },
    #[error("industry must not be blank")]
    MissingIndustry,
}

/// A response value proven to sit on the 1-5 Likert scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct LikertValue(u8);

impl LikertValue {
    pub fn get(self) -> u8 {
        self.0
    }

    pub fn parse(question_id: QuestionId, raw: f64) -> Result<Self, ValidationError> {
        if !raw.is_finite() || raw < f64::from(LIKERT_MIN) || raw > f64::from(LIKERT_MAX) {
            return Err(ValidationError::OutOfRange {
                question_id,
                value: raw,
            });
        }
        if raw.fract() != 0.0 {
            return Err(ValidationError::NonInteger {
                question_id,
                value: raw,
            });
        }
        Ok(Self(raw as u8))
    }
}

/// Response that passed the guard and may be aggregated or persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatedResponse {
    pub question_id: QuestionId,
    pub value: LikertValue,
}

impl ValidatedResponse {
    pub fn entry(&self) -> ResponseEntry {
        ResponseEntry {
            question_id: self.question_id,
            value: f64::from(self.value.get()),
        }
    }
}

/// Guard converting raw caller or store input into validated values.
#[derive(Debug, Clone, Default)]
pub struct ResponseGuard;

impl ResponseGuard {
    /// Validate an inbound batch against the active catalog. Any failure rejects the whole batch.
    pub fn validate_batch(
        &self,
        assessment_type: &AssessmentType,
        questions: &[Question],
        entries: &[ResponseEntry],
    ) -> Result<Vec<ValidatedResponse>, ValidationError> {
        let known: HashMap<QuestionId, &Question> = questions
            .iter()
            .filter(|question| question.active && &question.assessment_type == assessment_type)
            .map(|question| (question.id, question))
            .collect();

        entries
            .iter()
            .map(|entry| {
                if !known.contains_key(&entry.question_id) {
                    return Err(ValidationError::UnknownQuestion {
                        question_id: entry.question_id,
                        assessment_type: assessment_type.clone(),
                    });
                }
                let value = LikertValue::parse(entry.question_id, entry.value)?;
                Ok(ValidatedResponse {
                    question_id: entry.question_id,
                    value,
                })
            })
            .collect()
    }

    /// Validate responses read back from storage. Entries for questions that are no longer
    /// active are dropped; malformed values are still rejected.
    pub fn validate_stored(
        &self,
        questions: &[Question],
        entries: &[ResponseEntry],
    ) -> Result<Vec<ValidatedResponse>, ValidationError> {
        let mut validated = Vec::with_capacity(entries.len());
        for entry in entries {
            if !questions.iter().any(|question| question.id == entry.question_id) {
                tracing::debug!(question_id = %entry.question_id, "skipping response for inactive question");
                continue;
            }
            validated.push(ValidatedResponse {
                question_id: entry.question_id,
                value: LikertValue::parse(entry.question_id, entry.value)?,
            });
        }
        Ok(validated)
    }

    pub fn validate_weight_override(
        &self,
        assessment_type: &AssessmentType,
        questions: &[Question],
        pillar_code: &str,
        weight: f64,
    ) -> Result<(), ValidationError> {
        if !weight.is_finite() || !(0.0..=100.0).contains(&weight) {
            return Err(ValidationError::WeightOutOfRange {
                pillar_code: pillar_code.to_string(),
                weight,
            });
        }

        if !questions
            .iter()
            .any(|question| question.active && question.pillar_code == pillar_code)
        {
            return Err(ValidationError::UnknownPillar {
                pillar_code: pillar_code.to_string(),
                assessment_type: assessment_type.clone(),
            });
        }

        Ok(())
    }

    pub fn validate_industry(&self, industry: &Industry) -> Result<(), ValidationError> {
        if industry.as_str().trim().is_empty() {
            Err(ValidationError::MissingIndustry)
        } else {
            Ok(())
        }
    }
}
