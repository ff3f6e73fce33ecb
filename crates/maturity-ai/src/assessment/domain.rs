use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of the user who owns responses and assessment records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Named question set such as `CORE`, `ADVANCED`, or `FRONTIER`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssessmentType(pub String);

impl AssessmentType {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssessmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Industry the assessment was taken for; part of the record's natural key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Industry(pub String);

impl Industry {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Industry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(pub u64);

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier wrapper for persisted assessment records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssessmentId(pub String);

impl fmt::Display for AssessmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How a pillar participates in role-triggered recommendations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PillarRole {
    Data,
    Security,
    #[default]
    General,
}

impl PillarRole {
    /// Best-effort role detection from a pillar's code and display name.
    pub fn infer(code: &str, name: &str) -> Self {
        let code = code.to_ascii_lowercase();
        let name = name.to_ascii_lowercase();
        if code == "data" || name.contains("data") {
            Self::Data
        } else if code == "sec" || name.contains("secur") {
            Self::Security
        } else {
            Self::General
        }
    }
}

/// Catalog entry for a single Likert question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub assessment_type: AssessmentType,
    pub pillar_code: String,
    pub pillar_name: String,
    #[serde(default)]
    pub role: PillarRole,
    pub display_order: u32,
    pub active: bool,
}

/// Raw answer as received from a caller or read back from the response store.
///
/// The value stays a float at this boundary so non-integer input can be rejected
/// rather than truncated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResponseEntry {
    pub question_id: QuestionId,
    pub value: f64,
}

/// Derived per-pillar breakdown; persisted only as part of an assessment record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PillarScore {
    pub pillar_code: String,
    pub pillar_name: String,
    pub role: PillarRole,
    pub total_questions: u32,
    pub answered_questions: u32,
    /// Mean of the answered values on the 1-5 scale, 0 when nothing was answered.
    pub raw_average: f64,
    /// `round(raw_average / 5 * 100)`.
    pub score: u32,
    /// Answered share of the pillar as an integer percentage.
    pub completion_rate: u32,
}

/// Stored weight row for one pillar of an assessment type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightEntry {
    pub assessment_type: AssessmentType,
    pub pillar_code: String,
    pub weight: f64,
    pub is_default: bool,
}

/// Resolved weight for a pillar, expressed in percent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PillarWeight {
    pub pillar_code: String,
    pub weight: f64,
}

/// Four fixed bands the overall score falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaturityCategory {
    #[serde(rename = "AI Leader")]
    Leader,
    #[serde(rename = "AI Adopter")]
    Adopter,
    #[serde(rename = "AI Explorer")]
    Explorer,
    #[serde(rename = "AI Starter")]
    Starter,
}

impl MaturityCategory {
    pub fn from_score(overall_score: f64) -> Self {
        if overall_score >= 80.0 {
            Self::Leader
        } else if overall_score >= 60.0 {
            Self::Adopter
        } else if overall_score >= 40.0 {
            Self::Explorer
        } else {
            Self::Starter
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            MaturityCategory::Leader => "AI Leader",
            MaturityCategory::Adopter => "AI Adopter",
            MaturityCategory::Explorer => "AI Explorer",
            MaturityCategory::Starter => "AI Starter",
        }
    }

    pub const fn narrative(self) -> &'static str {
        match self {
            MaturityCategory::Leader => {
                "Your organization demonstrates advanced AI maturity with strong capabilities across most pillars."
            }
            MaturityCategory::Adopter => {
                "Your organization shows good AI maturity with solid foundations and room for targeted improvement."
            }
            MaturityCategory::Explorer => {
                "Your organization is in the emerging stage of AI maturity with several areas requiring development."
            }
            MaturityCategory::Starter => {
                "Your organization is at an early stage of AI maturity; focus on building foundational capabilities."
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GapPriority {
    High,
    Medium,
}

impl GapPriority {
    pub const fn label(self) -> &'static str {
        match self {
            GapPriority::High => "High",
            GapPriority::Medium => "Medium",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PillarStrength {
    pub pillar_code: String,
    pub pillar_name: String,
    pub score: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PillarGap {
    pub pillar_code: String,
    pub pillar_name: String,
    pub score: u32,
    pub priority: GapPriority,
}

/// Qualitative summary attached to every scored assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insights {
    pub category: MaturityCategory,
    pub overall_assessment: String,
    pub strengths: Vec<PillarStrength>,
    pub gaps: Vec<PillarGap>,
    pub recommendations: Vec<String>,
}

/// Natural uniqueness tuple for assessment records.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AssessmentKey {
    pub user_id: UserId,
    pub assessment_type: AssessmentType,
    pub industry: Industry,
}

/// Fully computed submission, ready to be written by the assessment store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentDraft {
    pub key: AssessmentKey,
    pub overall_score: f64,
    pub pillar_scores: Vec<PillarScore>,
    pub responses: Vec<ResponseEntry>,
    pub insights: Insights,
}

/// Persisted assessment, one per (user, assessment type, industry).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentRecord {
    pub id: AssessmentId,
    pub key: AssessmentKey,
    pub overall_score: f64,
    pub pillar_scores: Vec<PillarScore>,
    pub responses: Vec<ResponseEntry>,
    pub insights: Insights,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
