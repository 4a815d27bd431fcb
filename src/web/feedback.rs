use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use tracing::{error, warn};

use crate::feedback::{
    FeedbackError, FeedbackFilters, FeedbackRecord, NewFeedback, RatingDistribution,
    StorageUnavailable, SuggestionView, export::suggestions_workbook,
};
use crate::web::{AppState, JsonError, SavedFeedback, json_error, rejected_body};

const XLSX_CONTENT_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

pub async fn submit_feedback(
    State(state): State<AppState>,
    payload: Result<Json<NewFeedback>, JsonRejection>,
) -> Result<Json<SavedFeedback>, JsonError> {
    let Json(payload) = payload.map_err(|rejection| {
        warn!(error = %rejection.body_text(), "rejected feedback payload");
        rejected_body(rejection)
    })?;

    match state.feedback().submit_feedback(payload).await {
        Ok(record) => Ok(Json(SavedFeedback::new(record.id))),
        Err(FeedbackError::InvalidRating(err)) => {
            Err(json_error(StatusCode::BAD_REQUEST, err.to_string()))
        }
        Err(FeedbackError::Storage(err)) => {
            error!(?err, "failed to save feedback");
            Err(json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Could not save to database",
            ))
        }
    }
}

pub async fn rating_stats(
    State(state): State<AppState>,
    Path(category): Path<String>,
    Query(filters): Query<FeedbackFilters>,
) -> Result<Json<RatingDistribution>, JsonError> {
    state
        .feedback()
        .get_distribution(&category, &filters)
        .await
        .map(Json)
        .map_err(|err| storage_error(err, &category, "Stats error"))
}

pub async fn suggestions(
    State(state): State<AppState>,
    Path(category): Path<String>,
    Query(filters): Query<FeedbackFilters>,
) -> Result<Json<Vec<SuggestionView>>, JsonError> {
    state
        .feedback()
        .get_suggestions(&category, &filters)
        .await
        .map(Json)
        .map_err(|err| storage_error(err, &category, "Suggestions error"))
}

pub async fn export_suggestions(
    State(state): State<AppState>,
    Path(category): Path<String>,
    Query(filters): Query<FeedbackFilters>,
) -> Result<Response, JsonError> {
    let views = state
        .feedback()
        .get_suggestions(&category, &filters)
        .await
        .map_err(|err| storage_error(err, &category, "Suggestions error"))?;

    let bytes = suggestions_workbook(&views).map_err(|err| {
        error!(?err, %category, "failed to render suggestions workbook");
        json_error(StatusCode::INTERNAL_SERVER_ERROR, "Export failed")
    })?;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(XLSX_CONTENT_TYPE),
    );
    let filename = sanitize_filename::sanitize(format!("suggestions_{category}.xlsx"));
    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{filename}\""))
        .map_err(|_| json_error(StatusCode::INTERNAL_SERVER_ERROR, "Invalid export filename"))?;
    headers.insert(header::CONTENT_DISPOSITION, disposition);

    Ok((headers, bytes).into_response())
}

pub async fn submitter_history(
    State(state): State<AppState>,
    Path(submitter): Path<String>,
) -> Result<Json<Vec<FeedbackRecord>>, JsonError> {
    state
        .feedback()
        .get_history(&submitter)
        .await
        .map(Json)
        .map_err(|err| {
            error!(?err, %submitter, "failed to load feedback history");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "History error")
        })
}

fn storage_error(err: StorageUnavailable, category: &str, message: &str) -> JsonError {
    error!(?err, %category, "feedback query failed");
    json_error(StatusCode::INTERNAL_SERVER_ERROR, message)
}
