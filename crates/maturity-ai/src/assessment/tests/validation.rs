use super::common::*;

use crate::assessment::domain::{Industry, QuestionId, ResponseEntry};
use crate::assessment::validation::{LikertValue, ResponseGuard, ValidationError};

fn entry(question_id: u64, value: f64) -> ResponseEntry {
    ResponseEntry {
        question_id: QuestionId(question_id),
        value,
    }
}

#[test]
fn likert_bounds_are_inclusive() {
    assert_eq!(LikertValue::parse(QuestionId(1), 1.0).map(LikertValue::get), Ok(1));
    assert_eq!(LikertValue::parse(QuestionId(1), 5.0).map(LikertValue::get), Ok(5));
    assert!(matches!(
        LikertValue::parse(QuestionId(1), 0.0),
        Err(ValidationError::OutOfRange { .. })
    ));
    assert!(matches!(
        LikertValue::parse(QuestionId(1), 6.0),
        Err(ValidationError::OutOfRange { .. })
    ));
    assert!(matches!(
        LikertValue::parse(QuestionId(1), f64::NAN),
        Err(ValidationError::OutOfRange { .. })
    ));
    assert!(matches!(
        LikertValue::parse(QuestionId(1), 3.5),
        Err(ValidationError::NonInteger { .. })
    ));
}

#[test]
fn batch_is_rejected_when_any_entry_fails() {
    let questions = catalog(core(), 1);
    let entries = vec![entry(1, 4.0), entry(2, 5.0), entry(3, 7.0)];

    let error = ResponseGuard
        .validate_batch(&core(), &questions, &entries)
        .expect_err("batch rejected");
    assert_eq!(
        error,
        ValidationError::OutOfRange {
            question_id: QuestionId(3),
            value: 7.0,
        }
    );
}

#[test]
fn batch_rejects_questions_from_other_types() {
    let mut questions = catalog(core(), 1);
    questions.extend(catalog(advanced(), 101));

    let error = ResponseGuard
        .validate_batch(&core(), &questions, &[entry(101, 3.0)])
        .expect_err("foreign question rejected");
    assert!(matches!(error, ValidationError::UnknownQuestion { .. }));
}

#[test]
fn batch_rejects_inactive_questions() {
    let mut questions = catalog(core(), 1);
    questions[0].active = false;

    let error = ResponseGuard
        .validate_batch(&core(), &questions, &[entry(1, 3.0)])
        .expect_err("inactive question rejected");
    assert!(matches!(error, ValidationError::UnknownQuestion { .. }));
}

#[test]
fn stored_responses_skip_retired_questions() {
    // Question 1 left the active catalog after it was answered.
    let questions: Vec<_> = catalog(core(), 1).into_iter().skip(1).collect();
    let stored = vec![entry(1, 2.0), entry(2, 4.0)];

    let validated = ResponseGuard
        .validate_stored(&questions, &stored)
        .expect("stored responses valid");
    assert_eq!(validated.len(), 1);
    assert_eq!(validated[0].entry(), entry(2, 4.0));
}

#[test]
fn stored_responses_with_bad_values_are_rejected() {
    let questions = catalog(core(), 1);
    let error = ResponseGuard
        .validate_stored(&questions, &[entry(2, 9.0)])
        .expect_err("bad stored value rejected");
    assert!(matches!(error, ValidationError::OutOfRange { .. }));
}

#[test]
fn weight_override_bounds() {
    let questions = catalog(core(), 1);
    let guard = ResponseGuard;

    assert!(guard
        .validate_weight_override(&core(), &questions, "SEC", 0.0)
        .is_ok());
    assert!(guard
        .validate_weight_override(&core(), &questions, "SEC", 100.0)
        .is_ok());
    assert!(matches!(
        guard.validate_weight_override(&core(), &questions, "SEC", 100.5),
        Err(ValidationError::WeightOutOfRange { .. })
    ));
    assert!(matches!(
        guard.validate_weight_override(&core(), &questions, "SEC", f64::INFINITY),
        Err(ValidationError::WeightOutOfRange { .. })
    ));
    assert!(matches!(
        guard.validate_weight_override(&core(), &questions, "OPS", 10.0),
        Err(ValidationError::UnknownPillar { .. })
    ));
}

#[test]
fn industry_must_not_be_blank() {
    let guard = ResponseGuard;
    assert!(guard.validate_industry(&Industry::new("Retail")).is_ok());
    assert_eq!(
        guard.validate_industry(&Industry::new("")),
        Err(ValidationError::MissingIndustry)
    );
}
