use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::super::domain::{AssessmentType, PillarWeight, WeightEntry};

/// Weights are settled in hundredths of a percent so the final sum is exact.
const FULL_HUNDREDTHS: i64 = 10_000;

/// Raised when a weight set cannot be brought to 100%.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NormalizationError {
    #[error("weight for pillar {pillar_code} is negative ({weight})")]
    NegativeWeight { pillar_code: String, weight: f64 },
    #[error("weight for pillar {pillar_code} is not a finite number")]
    NonFiniteWeight { pillar_code: String },
    #[error("weights for assessment type {assessment_type} sum to zero and cannot be normalized")]
    ZeroTotal { assessment_type: AssessmentType },
}

/// Ordered pillar weights for one assessment type, summing to 100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightProfile {
    pub assessment_type: AssessmentType,
    pub entries: Vec<PillarWeight>,
    /// Explicit weights did not sum to 100 and were rescaled proportionally.
    pub rescaled: bool,
    /// Pillar that absorbed the rounding residual, if any residual was left.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub residual_absorbed_by: Option<String>,
}

impl WeightProfile {
    pub fn total(&self) -> f64 {
        self.entries.iter().map(|entry| entry.weight).sum()
    }

    pub fn weight_for(&self, pillar_code: &str) -> f64 {
        self.entries
            .iter()
            .find(|entry| entry.pillar_code == pillar_code)
            .map(|entry| entry.weight)
            .unwrap_or(0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Combine explicit overrides with an even split of the remainder, then normalize.
///
/// `active_pillars` is the catalog order of pillars with at least one active question.
/// Rows flagged `is_default` and rows for inactive pillars are ignored.
pub(crate) fn resolve_weights(
    assessment_type: &AssessmentType,
    active_pillars: &[String],
    stored: &[WeightEntry],
    tolerance: f64,
) -> Result<WeightProfile, NormalizationError> {
    if active_pillars.is_empty() {
        return Ok(WeightProfile {
            assessment_type: assessment_type.clone(),
            entries: Vec::new(),
            rescaled: false,
            residual_absorbed_by: None,
        });
    }

    let mut explicit: HashMap<&str, f64> = HashMap::new();
    for entry in stored.iter().filter(|entry| !entry.is_default) {
        if !active_pillars.iter().any(|code| code == &entry.pillar_code) {
            debug!(
                %assessment_type,
                pillar = %entry.pillar_code,
                "ignoring weight override for pillar without active questions"
            );
            continue;
        }
        if !entry.weight.is_finite() {
            return Err(NormalizationError::NonFiniteWeight {
                pillar_code: entry.pillar_code.clone(),
            });
        }
        if entry.weight < 0.0 {
            return Err(NormalizationError::NegativeWeight {
                pillar_code: entry.pillar_code.clone(),
                weight: entry.weight,
            });
        }
        explicit.insert(entry.pillar_code.as_str(), entry.weight);
    }

    let explicit_sum: f64 = explicit.values().sum();
    let unweighted = active_pillars
        .iter()
        .filter(|code| !explicit.contains_key(code.as_str()))
        .count();
    let default_share = if unweighted > 0 {
        (100.0 - explicit_sum).max(0.0) / unweighted as f64
    } else {
        0.0
    };

    let mut weights: Vec<f64> = active_pillars
        .iter()
        .map(|code| explicit.get(code.as_str()).copied().unwrap_or(default_share))
        .collect();

    let sum: f64 = weights.iter().sum();
    if sum <= 0.0 {
        return Err(NormalizationError::ZeroTotal {
            assessment_type: assessment_type.clone(),
        });
    }

    let rescaled = (sum - 100.0).abs() > tolerance;
    if rescaled {
        warn!(
            %assessment_type,
            original_sum = sum,
            "weight profile does not sum to 100; rescaling proportionally"
        );
        for weight in &mut weights {
            *weight = *weight * 100.0 / sum;
        }
    }

    let mut hundredths: Vec<i64> = weights
        .iter()
        .map(|weight| (weight * 100.0).round() as i64)
        .collect();
    let residual = FULL_HUNDREDTHS - hundredths.iter().sum::<i64>();

    let mut residual_absorbed_by = None;
    if residual != 0 {
        let largest = largest_index(&hundredths);
        hundredths[largest] += residual;
        let pillar = active_pillars[largest].clone();
        debug!(
            %assessment_type,
            pillar = %pillar,
            residual_hundredths = residual,
            "absorbed rounding residual into largest weight"
        );
        residual_absorbed_by = Some(pillar);
    }

    let entries = active_pillars
        .iter()
        .zip(hundredths)
        .map(|(code, value)| PillarWeight {
            pillar_code: code.clone(),
            weight: value as f64 / 100.0,
        })
        .collect();

    Ok(WeightProfile {
        assessment_type: assessment_type.clone(),
        entries,
        rescaled,
        residual_absorbed_by,
    })
}

/// First index holding the maximum value; ties resolve to catalog order.
fn largest_index(values: &[i64]) -> usize {
    let mut best = 0;
    for (index, value) in values.iter().enumerate() {
        if *value > values[best] {
            best = index;
        }
    }
    best
}
