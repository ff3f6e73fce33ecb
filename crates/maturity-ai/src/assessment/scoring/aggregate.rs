use std::collections::HashMap;

use super::super::domain::{PillarRole, PillarScore, Question, QuestionId};
use super::super::validation::{ValidatedResponse, LIKERT_MAX};

/// Distinct pillar codes of the active questions, in display order of first appearance.
pub(crate) fn active_pillars(questions: &[Question]) -> Vec<String> {
    let mut ordered: Vec<&Question> = questions.iter().filter(|question| question.active).collect();
    ordered.sort_by_key(|question| (question.display_order, question.id));

    let mut pillars: Vec<String> = Vec::new();
    for question in ordered {
        if !pillars.contains(&question.pillar_code) {
            pillars.push(question.pillar_code.clone());
        }
    }
    pillars
}

struct PillarTally<'a> {
    code: &'a str,
    name: &'a str,
    role: PillarRole,
    total: u32,
    answered: u32,
    sum: u32,
}

/// Group active questions by pillar and score the answered ones.
///
/// Every pillar with an active question yields a score, including pillars with no
/// answers, which report a score and completion of zero.
pub(crate) fn aggregate_pillars(
    questions: &[Question],
    responses: &[ValidatedResponse],
) -> Vec<PillarScore> {
    let answers: HashMap<QuestionId, u8> = responses
        .iter()
        .map(|response| (response.question_id, response.value.get()))
        .collect();

    let mut tallies: Vec<PillarTally<'_>> = Vec::new();
    for code in active_pillars(questions) {
        let Some(first) = questions
            .iter()
            .find(|question| question.active && question.pillar_code == code)
        else {
            continue;
        };
        tallies.push(PillarTally {
            code: first.pillar_code.as_str(),
            name: first.pillar_name.as_str(),
            role: first.role,
            total: 0,
            answered: 0,
            sum: 0,
        });
    }

    for question in questions.iter().filter(|question| question.active) {
        let Some(tally) = tallies
            .iter_mut()
            .find(|tally| tally.code == question.pillar_code)
        else {
            continue;
        };
        tally.total += 1;
        if let Some(value) = answers.get(&question.id) {
            tally.answered += 1;
            tally.sum += u32::from(*value);
        }
    }

    tallies.into_iter().map(score_tally).collect()
}

fn score_tally(tally: PillarTally<'_>) -> PillarScore {
    let raw_average = if tally.answered == 0 {
        0.0
    } else {
        f64::from(tally.sum) / f64::from(tally.answered)
    };
    let score = (raw_average / f64::from(LIKERT_MAX) * 100.0).round() as u32;

    PillarScore {
        pillar_code: tally.code.to_string(),
        pillar_name: tally.name.to_string(),
        role: tally.role,
        total_questions: tally.total,
        answered_questions: tally.answered,
        raw_average: (raw_average * 100.0).round() / 100.0,
        score,
        completion_rate: percent(tally.answered, tally.total),
    }
}

/// Integer percentage of `part / whole`, zero when `whole` is zero.
pub(crate) fn percent(part: u32, whole: u32) -> u32 {
    if whole == 0 {
        0
    } else {
        (f64::from(part) / f64::from(whole) * 100.0).round() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::domain::AssessmentType;
    use crate::assessment::validation::LikertValue;

    fn question(id: u64, pillar: &str, order: u32) -> Question {
        Question {
            id: QuestionId(id),
            assessment_type: AssessmentType::new("CORE"),
            pillar_code: pillar.to_string(),
            pillar_name: format!("{pillar} pillar"),
            role: PillarRole::General,
            display_order: order,
            active: true,
        }
    }

    fn answer(id: u64, value: f64) -> ValidatedResponse {
        ValidatedResponse {
            question_id: QuestionId(id),
            value: LikertValue::parse(QuestionId(id), value).expect("valid likert"),
        }
    }

    #[test]
    fn missing_answers_are_excluded_from_average() {
        let questions = vec![question(1, "STR", 1), question(2, "STR", 2), question(3, "STR", 3)];
        let scores = aggregate_pillars(&questions, &[answer(1, 4.0), answer(2, 3.0)]);

        assert_eq!(scores.len(), 1);
        let pillar = &scores[0];
        assert_eq!(pillar.total_questions, 3);
        assert_eq!(pillar.answered_questions, 2);
        assert!((pillar.raw_average - 3.5).abs() < 1e-9);
        assert_eq!(pillar.score, 70);
        assert_eq!(pillar.completion_rate, 67);
    }

    #[test]
    fn unanswered_pillar_reports_zero() {
        let questions = vec![question(1, "STR", 1), question(2, "DATA", 2)];
        let scores = aggregate_pillars(&questions, &[answer(1, 5.0)]);

        let data = scores
            .iter()
            .find(|score| score.pillar_code == "DATA")
            .expect("data pillar present");
        assert_eq!(data.score, 0);
        assert_eq!(data.completion_rate, 0);
        assert_eq!(data.raw_average, 0.0);
        assert!(!data.raw_average.is_nan());
    }

    #[test]
    fn pillars_follow_display_order_and_skip_inactive_questions() {
        let mut retired = question(9, "OLD", 0);
        retired.active = false;
        let questions = vec![question(1, "TECH", 5), question(2, "STR", 1), retired];

        let scores = aggregate_pillars(&questions, &[answer(9, 5.0)]);
        let codes: Vec<&str> = scores.iter().map(|score| score.pillar_code.as_str()).collect();
        assert_eq!(codes, vec!["STR", "TECH"]);
    }

    #[test]
    fn percent_handles_empty_denominator() {
        assert_eq!(percent(0, 0), 0);
        assert_eq!(percent(1, 3), 33);
        assert_eq!(percent(3, 3), 100);
    }
}
