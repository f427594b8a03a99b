// src/handlers/analytics.rs

//! Read-only analytics endpoints. Each is a thin wrapper around the
//! corresponding reporter query for the authenticated user.

use axum::{Extension, Json, extract::State, response::IntoResponse};

use crate::{auth::Claims, state::AppState};

/// Overall metrics: tests taken, average/high/low score, improvement rate.
pub async fn overview(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> impl IntoResponse {
    let analytics = state.analytics.read().await;
    Json(analytics.overall_performance(&claims.sub))
}

/// Per-topic standing, best score first.
pub async fn topics(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> impl IntoResponse {
    let analytics = state.analytics.read().await;
    Json(analytics.topic_performance(&claims.sub))
}

/// Per-difficulty standing.
pub async fn difficulties(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> impl IntoResponse {
    let analytics = state.analytics.read().await;
    Json(analytics.difficulty_performance(&claims.sub))
}

/// Recent score series, newest first.
pub async fn trend(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> impl IntoResponse {
    let analytics = state.analytics.read().await;
    Json(analytics.performance_trend(&claims.sub))
}

/// Strong and weak topics with enough data to classify.
pub async fn strengths(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> impl IntoResponse {
    let analytics = state.analytics.read().await;
    Json(analytics.strengths_and_weaknesses(&claims.sub))
}

/// Personalized study suggestions.
pub async fn recommendations(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> impl IntoResponse {
    let analytics = state.analytics.read().await;
    Json(analytics.recommendations(&claims.sub))
}
