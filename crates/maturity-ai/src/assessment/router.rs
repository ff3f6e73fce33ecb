use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;

use super::domain::{AssessmentKey, AssessmentType, Industry, ResponseEntry, UserId};
use super::repository::AssessmentBackend;
use super::service::{AssessmentError, AssessmentService, SubmissionRequest};

type SharedService<B> = State<Arc<AssessmentService<B>>>;

/// Router builder exposing the scoring service as JSON endpoints.
pub fn assessment_router<B>(service: Arc<AssessmentService<B>>) -> Router
where
    B: AssessmentBackend + 'static,
{
    Router::new()
        .route(
            "/api/v1/users/:user_id/assessments/:assessment_type/responses",
            put(record_responses_handler::<B>),
        )
        .route(
            "/api/v1/users/:user_id/assessments/:assessment_type/score",
            get(score_handler::<B>),
        )
        .route(
            "/api/v1/users/:user_id/assessments/:assessment_type/submissions",
            post(submit_handler::<B>),
        )
        .route(
            "/api/v1/users/:user_id/assessments/:assessment_type/industries/:industry",
            get(record_handler::<B>),
        )
        .route(
            "/api/v1/users/:user_id",
            axum::routing::delete(delete_user_handler::<B>),
        )
        .route(
            "/api/v1/assessment-types/:assessment_type/weights",
            get(weight_profile_handler::<B>),
        )
        .route(
            "/api/v1/assessment-types/:assessment_type/weights/:pillar_code",
            put(set_weight_handler::<B>).delete(clear_weight_handler::<B>),
        )
        .with_state(service)
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RecordResponsesBody {
    pub responses: Vec<ResponseEntry>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SubmitBody {
    pub industry: Industry,
    #[serde(default)]
    pub responses: Vec<ResponseEntry>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WeightOverrideBody {
    pub weight: f64,
}

pub(crate) async fn record_responses_handler<B>(
    State(service): SharedService<B>,
    Path((user_id, assessment_type)): Path<(u64, String)>,
    Json(body): Json<RecordResponsesBody>,
) -> Response
where
    B: AssessmentBackend + 'static,
{
    let assessment_type = AssessmentType(assessment_type);
    match service.record_responses(UserId(user_id), &assessment_type, &body.responses) {
        Ok(recorded) => (StatusCode::OK, Json(json!({ "recorded": recorded }))).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn score_handler<B>(
    State(service): SharedService<B>,
    Path((user_id, assessment_type)): Path<(u64, String)>,
) -> Response
where
    B: AssessmentBackend + 'static,
{
    match service.calculate_score(UserId(user_id), &AssessmentType(assessment_type)) {
        Ok(progress) => (StatusCode::OK, Json(progress)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn submit_handler<B>(
    State(service): SharedService<B>,
    Path((user_id, assessment_type)): Path<(u64, String)>,
    Json(body): Json<SubmitBody>,
) -> Response
where
    B: AssessmentBackend + 'static,
{
    let request = SubmissionRequest {
        user_id: UserId(user_id),
        assessment_type: AssessmentType(assessment_type),
        industry: body.industry,
        responses: body.responses,
    };

    match service.submit_assessment(request) {
        Ok(result) => {
            let status = if result.is_new {
                StatusCode::CREATED
            } else {
                StatusCode::OK
            };
            (status, Json(result)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn record_handler<B>(
    State(service): SharedService<B>,
    Path((user_id, assessment_type, industry)): Path<(u64, String, String)>,
) -> Response
where
    B: AssessmentBackend + 'static,
{
    let key = AssessmentKey {
        user_id: UserId(user_id),
        assessment_type: AssessmentType(assessment_type),
        industry: Industry(industry),
    };
    match service.get_assessment(&key) {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn delete_user_handler<B>(
    State(service): SharedService<B>,
    Path(user_id): Path<u64>,
) -> Response
where
    B: AssessmentBackend + 'static,
{
    match service.delete_user(UserId(user_id)) {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn weight_profile_handler<B>(
    State(service): SharedService<B>,
    Path(assessment_type): Path<String>,
) -> Response
where
    B: AssessmentBackend + 'static,
{
    match service.get_weight_profile(&AssessmentType(assessment_type)) {
        Ok(profile) => (StatusCode::OK, Json(profile)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn set_weight_handler<B>(
    State(service): SharedService<B>,
    Path((assessment_type, pillar_code)): Path<(String, String)>,
    Json(body): Json<WeightOverrideBody>,
) -> Response
where
    B: AssessmentBackend + 'static,
{
    match service.set_weight_override(&AssessmentType(assessment_type), &pillar_code, body.weight)
    {
        Ok(profile) => (StatusCode::OK, Json(profile)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn clear_weight_handler<B>(
    State(service): SharedService<B>,
    Path((assessment_type, pillar_code)): Path<(String, String)>,
) -> Response
where
    B: AssessmentBackend + 'static,
{
    match service.clear_weight_override(&AssessmentType(assessment_type), &pillar_code) {
        Ok(profile) => (StatusCode::OK, Json(profile)).into_response(),
        Err(error) => error_response(error),
    }
}

/// Map service failures so callers can tell bad answers apart from storage trouble.
pub(crate) fn error_response(error: AssessmentError) -> Response {
    let status = match &error {
        AssessmentError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        AssessmentError::Normalization(_) => StatusCode::CONFLICT,
        AssessmentError::Persistence(_) if error.kind() == "not_found" => StatusCode::NOT_FOUND,
        AssessmentError::Persistence(_) => {
            warn!(error = %error, "assessment persistence failure");
            StatusCode::SERVICE_UNAVAILABLE
        }
    };

    let payload = json!({
        "kind": error.kind(),
        "error": error.to_string(),
    });
    (status, Json(payload)).into_response()
}
