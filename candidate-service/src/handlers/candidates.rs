use crate::models::CandidateSummary;
use crate::services::StoreError;
use crate::startup::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

/// Store failures as the HTTP layer reports them.
///
/// The mapping is deliberately coarse:
///
/// | Variant  | Store error kind                           | Response                          |
/// |----------|--------------------------------------------|-----------------------------------|
/// | `Lookup` | `NotFound`, `Transport`, `MalformedQuery`  | 404 `Not Found`                   |
/// | `Update` | any                                        | 500 `Unable to update: <detail>`  |
///
/// Callers of the read routes cannot tell a missing candidate from an
/// unreachable store; the kind is only visible in the logs.
#[derive(Debug)]
pub enum CandidateError {
    Lookup(StoreError),
    Update(StoreError),
}

impl IntoResponse for CandidateError {
    fn into_response(self) -> Response {
        match self {
            CandidateError::Lookup(err) => {
                match &err {
                    StoreError::NotFound => {
                        tracing::info!(kind = err.kind(), "Candidate lookup found nothing")
                    }
                    StoreError::Transport(_) | StoreError::MalformedQuery(_) => {
                        tracing::warn!(kind = err.kind(), "Candidate lookup failed: {}", err)
                    }
                }
                (StatusCode::NOT_FOUND, "Not Found").into_response()
            }
            CandidateError::Update(err) => {
                tracing::error!(kind = err.kind(), "Candidate upsert failed: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Unable to update: {}", err),
                )
                    .into_response()
            }
        }
    }
}

/// `GET /candidate/:name`
pub async fn get_candidate(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Vec<CandidateSummary>>, CandidateError> {
    let found = state
        .store
        .find_by_name(&name)
        .await
        .map_err(CandidateError::Lookup)?;

    if found.is_empty() {
        return Err(CandidateError::Lookup(StoreError::NotFound));
    }

    Ok(Json(found))
}

/// `POST /candidate/:name`
pub async fn post_candidate(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<CandidateSummary>, CandidateError> {
    let candidate = state
        .store
        .upsert(&name)
        .await
        .map_err(CandidateError::Update)?;

    tracing::info!(name = %candidate.candidate_name, "Candidate upserted");

    Ok(Json(candidate.into()))
}

/// `GET /candidates`. An empty collection is a successful empty list.
pub async fn list_candidates(
    State(state): State<AppState>,
) -> Result<Json<Vec<CandidateSummary>>, CandidateError> {
    let candidates = state
        .store
        .list_all()
        .await
        .map_err(CandidateError::Lookup)?;

    Ok(Json(candidates))
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_text(response: Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn every_lookup_kind_collapses_to_not_found() {
        for err in [
            StoreError::NotFound,
            StoreError::Transport("connection reset".into()),
            StoreError::MalformedQuery("bad filter".into()),
        ] {
            let response = CandidateError::Lookup(err).into_response();
            assert_eq!(response.status(), StatusCode::NOT_FOUND);
            assert_eq!(body_text(response).await, "Not Found");
        }
    }

    #[tokio::test]
    async fn update_failure_leaks_store_detail() {
        let response =
            CandidateError::Update(StoreError::Transport("connection reset".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_text(response).await,
            "Unable to update: transport error: connection reset"
        );
    }
}
