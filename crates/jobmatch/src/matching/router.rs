use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::compatibility::FeedEntry;
use super::domain::{CandidateId, CandidateProfile, CriterionWeights, JobRequirement, VacancyId};
use super::ranking::RankedCandidate;
use super::repository::{MatchingStore, StoreError};
use super::service::{rank_pool, score_pair, MatchingService, MatchingServiceError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompatibilityRequest {
    pub vacancy: JobRequirement,
    pub candidate: CandidateProfile,
    #[serde(default)]
    pub distance_km: Option<f64>,
}

/// Ad-hoc ranking payload; also the input format of the `rank` CLI command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankRequest {
    pub vacancy: JobRequirement,
    #[serde(default)]
    pub weights: Option<CriterionWeights>,
    pub candidates: Vec<CandidateProfile>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankResponse {
    pub ranked: Vec<RankedCandidate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedView {
    pub candidate_id: CandidateId,
    pub entries: Vec<FeedEntry>,
}

/// Router builder exposing scoring, ranking, and discovery endpoints.
pub fn matching_router<S>(service: Arc<MatchingService<S>>) -> Router
where
    S: MatchingStore + 'static,
{
    Router::new()
        .route("/api/v1/matching/compatibility", post(compatibility_handler))
        .route("/api/v1/matching/rank", post(rank_handler))
        .route(
            "/api/v1/vacancies/:vacancy_id/ranking",
            post(rank_vacancy_handler::<S>).get(stored_ranking_handler::<S>),
        )
        .route(
            "/api/v1/candidates/:candidate_id/feed",
            get(feed_handler::<S>),
        )
        .with_state(service)
}

pub(crate) async fn compatibility_handler(Json(request): Json<CompatibilityRequest>) -> Response {
    let outcome = score_pair(&request.vacancy, &request.candidate, request.distance_km);
    (StatusCode::OK, Json(outcome)).into_response()
}

pub(crate) async fn rank_handler(Json(request): Json<RankRequest>) -> Response {
    let ranked = rank_pool(&request.vacancy, request.weights, &request.candidates);
    (StatusCode::OK, Json(RankResponse { ranked })).into_response()
}

pub(crate) async fn rank_vacancy_handler<S>(
    State(service): State<Arc<MatchingService<S>>>,
    Path(vacancy_id): Path<String>,
) -> Response
where
    S: MatchingStore + 'static,
{
    match service.rank_vacancy(&VacancyId(vacancy_id)) {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn stored_ranking_handler<S>(
    State(service): State<Arc<MatchingService<S>>>,
    Path(vacancy_id): Path<String>,
) -> Response
where
    S: MatchingStore + 'static,
{
    match service.stored_ranking(&VacancyId(vacancy_id)) {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn feed_handler<S>(
    State(service): State<Arc<MatchingService<S>>>,
    Path(candidate_id): Path<String>,
) -> Response
where
    S: MatchingStore + 'static,
{
    let candidate_id = CandidateId(candidate_id);
    match service.discovery_feed(&candidate_id) {
        Ok(entries) => (
            StatusCode::OK,
            Json(FeedView {
                candidate_id,
                entries,
            }),
        )
            .into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: MatchingServiceError) -> Response {
    let status = match &error {
        MatchingServiceError::VacancyNotFound(_)
        | MatchingServiceError::CandidateNotFound(_)
        | MatchingServiceError::RankingNotFound(_)
        | MatchingServiceError::Store(StoreError::NotFound) => StatusCode::NOT_FOUND,
        MatchingServiceError::Store(StoreError::Unavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
        MatchingServiceError::Intake(_) => StatusCode::UNPROCESSABLE_ENTITY,
    };

    let payload = json!({
        "error": error.to_string(),
    });
    (status, Json(payload)).into_response()
}
