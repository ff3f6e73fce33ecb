use crate::infra::{seeded_store, SEEDED_TYPES};
use clap::Args;
use maturity_ai::assessment::{
    AssessmentError, AssessmentService, AssessmentType, Industry, QuestionCatalog,
    ResponseEntry, SubmissionRequest, SubmissionResult, UserId,
};
use maturity_ai::config::ScoringConfig;
use maturity_ai::error::AppError;
use std::sync::Arc;

const DEMO_USER: UserId = UserId(1);

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Likert value (1-5) used to answer every question.
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u8).range(1..=5))]
    pub(crate) value: u8,
    /// Assessment type to score (CORE, ADVANCED or FRONTIER).
    #[arg(long, default_value = "CORE")]
    pub(crate) assessment_type: String,
    /// Industry recorded on the assessment.
    #[arg(long, default_value = "Manufacturing")]
    pub(crate) industry: String,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        value,
        assessment_type,
        industry,
    } = args;

    let assessment_type = AssessmentType::new(assessment_type);
    if !SEEDED_TYPES.contains(&assessment_type.as_str()) {
        println!(
            "Note: {assessment_type} is not a seeded type ({}); it has no questions.",
            SEEDED_TYPES.join(", ")
        );
    }

    let store = Arc::new(seeded_store().map_err(AssessmentError::from)?);
    let service = AssessmentService::new(store.clone(), ScoringConfig::default());

    let responses: Vec<ResponseEntry> = store
        .list_active_questions(&assessment_type)
        .map_err(AssessmentError::from)?
        .into_iter()
        .map(|question| ResponseEntry {
            question_id: question.id,
            value: f64::from(value),
        })
        .collect();

    println!("AI maturity demo");
    println!(
        "- {} questions of type {assessment_type} answered with {value}",
        responses.len()
    );

    let request = SubmissionRequest {
        user_id: DEMO_USER,
        assessment_type: assessment_type.clone(),
        industry: Industry::new(industry),
        responses,
    };

    let first = service.submit_assessment(request.clone())?;
    render_result("First submission", &first);

    let second = service.submit_assessment(request)?;
    render_result("Resubmission", &second);

    let profile = service.get_weight_profile(&assessment_type)?;
    println!("\nWeight profile");
    for entry in &profile.entries {
        println!("  - {}: {:.2}", entry.pillar_code, entry.weight);
    }
    if profile.rescaled {
        println!("  (rescaled to sum to 100)");
    }

    Ok(())
}

fn render_result(title: &str, result: &SubmissionResult) {
    let action = if result.is_new { "created" } else { "updated" };
    println!("\n{title}: record {} {action}", result.assessment_id);
    println!(
        "Overall score {:.1} | {}",
        result.overall_score,
        result.insights.category.label()
    );
    println!("{}", result.insights.overall_assessment);

    println!("Pillars:");
    for pillar in &result.pillar_scores {
        println!(
            "  - {} ({}): {} | avg {:.2} | {}/{} answered",
            pillar.pillar_name,
            pillar.pillar_code,
            pillar.score,
            pillar.raw_average,
            pillar.answered_questions,
            pillar.total_questions
        );
    }

    if !result.insights.strengths.is_empty() {
        println!("Strengths:");
        for strength in &result.insights.strengths {
            println!("  - {} ({})", strength.pillar_name, strength.score);
        }
    }
    if !result.insights.gaps.is_empty() {
        println!("Gaps:");
        for gap in &result.insights.gaps {
            println!(
                "  - {} ({}) | {} priority",
                gap.pillar_name,
                gap.score,
                gap.priority.label()
            );
        }
    }
    println!("Recommendations:");
    for recommendation in &result.insights.recommendations {
        println!("  - {recommendation}");
    }
}
