use serde::{Deserialize, Serialize};

use super::super::domain::{PillarScore, PillarWeight};

/// Weighted overall score plus the pillar breakdown it was derived from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeScore {
    /// 0-100 with one decimal of precision.
    pub overall_score: f64,
    /// False when no pillar carried weight, in which case the overall score is 0.
    pub complete: bool,
    pub pillar_scores: Vec<PillarScore>,
}

/// `Σ score × weight / 100`. Pillars present in only one of the lists contribute nothing.
pub(crate) fn compose(pillar_scores: Vec<PillarScore>, weights: &[PillarWeight]) -> CompositeScore {
    if weights.is_empty() {
        return CompositeScore {
            overall_score: 0.0,
            complete: false,
            pillar_scores,
        };
    }

    let weighted: f64 = pillar_scores
        .iter()
        .map(|pillar| {
            let weight = weights
                .iter()
                .find(|entry| entry.pillar_code == pillar.pillar_code)
                .map(|entry| entry.weight)
                .unwrap_or(0.0);
            f64::from(pillar.score) * weight
        })
        .sum();

    let overall_score = ((weighted / 100.0) * 10.0).round() / 10.0;

    CompositeScore {
        overall_score,
        complete: true,
        pillar_scores,
    }
}
