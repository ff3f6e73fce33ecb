use super::super::domain::{
    GapPriority, Insights, MaturityCategory, PillarGap, PillarRole, PillarScore, PillarStrength,
};

const STRENGTH_THRESHOLD: u32 = 70;
const GAP_THRESHOLD: u32 = 60;
const HIGH_PRIORITY_THRESHOLD: u32 = 40;
const STRATEGIC_THRESHOLD: f64 = 50.0;
const DATA_THRESHOLD: u32 = 60;
const SECURITY_THRESHOLD: u32 = 70;

const STRATEGY_RECOMMENDATION: &str =
    "Develop a comprehensive AI strategy aligned with business objectives and secure executive sponsorship";
const FOUNDATIONS_RECOMMENDATION: &str =
    "Invest in foundational capabilities: AI literacy programs, a cross-functional AI team, and a small set of pilot use cases";
const DATA_GOVERNANCE_RECOMMENDATION: &str =
    "Establish a data governance framework covering data quality, ownership, and accessibility before scaling AI initiatives";
const SECURITY_RECOMMENDATION: &str =
    "Strengthen AI security and risk controls, including model access policies, threat monitoring, and incident response";
const CLOSING_RECOMMENDATION: &str =
    "Reassess in six months to track progress and recalibrate priorities against your roadmap";

pub(crate) fn generate_insights(overall_score: f64, pillar_scores: &[PillarScore]) -> Insights {
    let category = MaturityCategory::from_score(overall_score);

    let strengths = pillar_scores
        .iter()
        .filter(|pillar| pillar.score >= STRENGTH_THRESHOLD)
        .map(|pillar| PillarStrength {
            pillar_code: pillar.pillar_code.clone(),
            pillar_name: pillar.pillar_name.clone(),
            score: pillar.score,
        })
        .collect();

    let gaps = pillar_scores
        .iter()
        .filter(|pillar| pillar.score < GAP_THRESHOLD)
        .map(|pillar| PillarGap {
            pillar_code: pillar.pillar_code.clone(),
            pillar_name: pillar.pillar_name.clone(),
            score: pillar.score,
            priority: if pillar.score < HIGH_PRIORITY_THRESHOLD {
                GapPriority::High
            } else {
                GapPriority::Medium
            },
        })
        .collect();

    let mut recommendations = Vec::new();
    // With no pillars there is nothing to base strategic advice on.
    if !pillar_scores.is_empty() && overall_score < STRATEGIC_THRESHOLD {
        recommendations.push(STRATEGY_RECOMMENDATION.to_string());
        recommendations.push(FOUNDATIONS_RECOMMENDATION.to_string());
    }

    if role_below(pillar_scores, PillarRole::Data, DATA_THRESHOLD) {
        recommendations.push(DATA_GOVERNANCE_RECOMMENDATION.to_string());
    }

    if role_below(pillar_scores, PillarRole::Security, SECURITY_THRESHOLD) {
        recommendations.push(SECURITY_RECOMMENDATION.to_string());
    }

    recommendations.push(CLOSING_RECOMMENDATION.to_string());

    Insights {
        category,
        overall_assessment: category.narrative().to_string(),
        strengths,
        gaps,
        recommendations,
    }
}

fn role_below(pillar_scores: &[PillarScore], role: PillarRole, threshold: u32) -> bool {
    pillar_scores
        .iter()
        .any(|pillar| pillar.role == role && pillar.score < threshold)
}
