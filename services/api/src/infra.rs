use maturity_ai::assessment::{
    AssessmentType, MemoryStore, PillarRole, Question, QuestionId, StoreError, WeightEntry,
    WeightStore,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

struct PillarSeed {
    code: &'static str,
    name: &'static str,
    questions: u32,
}

const CORE_PILLARS: &[PillarSeed] = &[
    PillarSeed { code: "STR", name: "AI Strategy", questions: 5 },
    PillarSeed { code: "DATA", name: "Data Readiness", questions: 5 },
    PillarSeed { code: "TECH", name: "Technology Infrastructure", questions: 5 },
    PillarSeed { code: "SEC", name: "Security & Governance", questions: 5 },
];

const ADVANCED_PILLARS: &[PillarSeed] = &[
    PillarSeed { code: "STR", name: "AI Strategy", questions: 4 },
    PillarSeed { code: "DATA", name: "Data Readiness", questions: 4 },
    PillarSeed { code: "TECH", name: "Technology Infrastructure", questions: 4 },
    PillarSeed { code: "SEC", name: "Security & Governance", questions: 4 },
    PillarSeed { code: "TAL", name: "Talent & Culture", questions: 4 },
    PillarSeed { code: "ETH", name: "Responsible AI", questions: 4 },
];

const FRONTIER_PILLARS: &[PillarSeed] = &[
    PillarSeed { code: "GEN", name: "Generative AI Adoption", questions: 3 },
    PillarSeed { code: "DATA", name: "Data Platform", questions: 3 },
    PillarSeed { code: "SEC", name: "Model Security", questions: 3 },
];

pub(crate) const SEEDED_TYPES: [&str; 3] = ["CORE", "ADVANCED", "FRONTIER"];

fn seed_type(
    assessment_type: &str,
    pillars: &[PillarSeed],
    first_id: u64,
    questions: &mut Vec<Question>,
) {
    let mut next_id = first_id;
    let mut display_order = 0;
    for pillar in pillars {
        for _ in 0..pillar.questions {
            display_order += 1;
            questions.push(Question {
                id: QuestionId(next_id),
                assessment_type: AssessmentType::new(assessment_type),
                pillar_code: pillar.code.to_string(),
                pillar_name: pillar.name.to_string(),
                role: PillarRole::infer(pillar.code, pillar.name),
                display_order,
                active: true,
            });
            next_id += 1;
        }
    }
}

/// Question catalog used by the demo and the in-memory server.
pub(crate) fn seed_catalog() -> Vec<Question> {
    let mut questions = Vec::new();
    seed_type("CORE", CORE_PILLARS, 1, &mut questions);
    seed_type("ADVANCED", ADVANCED_PILLARS, 101, &mut questions);
    seed_type("FRONTIER", FRONTIER_PILLARS, 201, &mut questions);

    // Retired question; kept so stale answers exercise the inactive path.
    questions.push(Question {
        id: QuestionId(299),
        assessment_type: AssessmentType::new("FRONTIER"),
        pillar_code: "GEN".to_string(),
        pillar_name: "Generative AI Adoption".to_string(),
        role: PillarRole::General,
        display_order: 99,
        active: false,
    });
    questions
}

/// Seeded store with the catalog and the baseline weight rows.
pub(crate) fn seeded_store() -> Result<MemoryStore, StoreError> {
    let store = MemoryStore::with_questions(seed_catalog());
    // Baseline rows only document the even split; the resolver ignores them.
    for pillar in CORE_PILLARS {
        store.put_weight(WeightEntry {
            assessment_type: AssessmentType::new("CORE"),
            pillar_code: pillar.code.to_string(),
            weight: 25.0,
            is_default: true,
        })?;
    }
    Ok(store)
}
