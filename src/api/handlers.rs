use std::fmt::Display;

use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    ingest::{filter_to_catalog, normalize_item_id, DatasetStats},
    middleware::RequestId,
    models::{ItemId, Rating, RatingVector, Recommendation},
    services::recommend as recommend_for,
};

use super::AppState;

// Request/Response types

/// A movie id given either as a JSON number or as text
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MovieIdInput {
    Number(i64),
    Text(String),
}

impl Display for MovieIdInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MovieIdInput::Number(id) => write!(f, "{}", id),
            MovieIdInput::Text(id) => write!(f, "{}", id),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RatingInput {
    pub movie_id: MovieIdInput,
    pub rating: Rating,
}

#[derive(Debug, Deserialize)]
pub struct RecommendationRequest {
    pub ratings: Vec<RatingInput>,
    pub top_users: Option<usize>,
    pub top_items: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct RankedTitle {
    pub rank: usize,
    pub movie_id: ItemId,
    pub title: String,
    pub score: f64,
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub recommendations: Vec<RankedTitle>,
    /// Rated movies ignored because the catalog does not know them
    pub dropped_unknown: usize,
}

fn target_from_inputs(inputs: &[RatingInput]) -> AppResult<RatingVector> {
    let mut target = RatingVector::new();
    for input in inputs {
        let item = normalize_item_id(&input.movie_id.to_string())
            .map_err(|e| AppError::InvalidInput(e.to_string()))?;
        if !input.rating.is_finite() {
            return Err(AppError::InvalidInput(format!(
                "rating for movie {} must be a finite number",
                item
            )));
        }
        target.insert(item, input.rating);
    }
    Ok(target)
}

fn ranked(recommendations: Vec<Recommendation>) -> Vec<RankedTitle> {
    recommendations
        .into_iter()
        .enumerate()
        .map(|(idx, rec)| RankedTitle {
            rank: idx + 1,
            movie_id: rec.item,
            title: rec.title,
            score: rec.score,
        })
        .collect()
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Size of the loaded dataset
pub async fn stats(State(state): State<AppState>) -> Json<DatasetStats> {
    Json(state.dataset.stats())
}

/// Recommends movies for the ratings in the request body
pub async fn recommend(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<RecommendationRequest>,
) -> AppResult<Json<RecommendationResponse>> {
    let mut target = target_from_inputs(&request.ratings)?;
    let dropped_unknown = filter_to_catalog(&mut target, &state.dataset.catalog);
    let top_users = request.top_users.unwrap_or(state.defaults.top_users);
    let top_items = request.top_items.unwrap_or(state.defaults.top_items);

    tracing::info!(
        request_id = %request_id,
        rated = target.len(),
        dropped_unknown,
        top_users,
        top_items,
        "Processing recommendation request"
    );

    // The neighbor scan is CPU-bound; keep it off the async workers
    let dataset = state.dataset.clone();
    let recommendations = tokio::task::spawn_blocking(move || {
        recommend_for(&target, &dataset.store, &dataset.catalog, top_users, top_items)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    tracing::info!(
        request_id = %request_id,
        returned = recommendations.len(),
        "Recommendation completed"
    );

    Ok(Json(RecommendationResponse {
        recommendations: ranked(recommendations),
        dropped_unknown,
    }))
}
