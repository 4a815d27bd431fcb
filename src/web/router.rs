use axum::{
    Router,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::web::{AppState, auth, feedback, report};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/signup", post(auth::signup))
        .route("/api/login", post(auth::login))
        .route("/api/feedback", post(feedback::submit_feedback))
        .route("/api/stats/:category", get(feedback::rating_stats))
        .route("/api/suggestions/:category", get(feedback::suggestions))
        .route(
            "/api/suggestions/:category/export",
            get(feedback::export_suggestions),
        )
        .route("/api/history/:user", get(feedback::submitter_history))
        .route("/reports/:category", get(report::report_page))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> impl IntoResponse {
    StatusCode::OK
}
