use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{
    config::neighborhood_size,
    db::{RatingStore, UserRatings},
    error::{AppError, AppResult, RecommendError},
    middleware::request_id::RequestId,
    models::{Recommendation, SimilarityScore},
    services::RecommenderEngine,
};

use super::AppState;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct RatingUpdate {
    pub rating: f64,
}

#[derive(Debug, Default, Deserialize)]
pub struct RecommendationParams {
    pub limit: Option<usize>,
    pub neighbors: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct RecommendationsResponse {
    pub user: String,
    pub recommendations: Vec<Recommendation>,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct SimilarityResponse {
    pub user_a: String,
    pub user_b: String,
    pub similarity: f64,
}

/// Runs an engine computation on the blocking pool under the store's read lock
async fn with_store<T, F>(state: &AppState, compute: F) -> AppResult<T>
where
    F: FnOnce(&RatingStore) -> Result<T, RecommendError> + Send + 'static,
    T: Send + 'static,
{
    let store = state.store.clone();
    let result = tokio::task::spawn_blocking(move || {
        let guard = store.blocking_read();
        compute(&*guard)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(result?)
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Lists every known user
pub async fn list_users(State(state): State<AppState>) -> Json<Vec<String>> {
    let store = state.store.read().await;
    Json(store.users().map(str::to_string).collect())
}

/// Returns one user's ratings
pub async fn get_ratings(
    State(state): State<AppState>,
    Path(user): Path<String>,
) -> AppResult<Json<UserRatings>> {
    let store = state.store.read().await;
    let ratings = store.ratings_for(&user)?.clone();
    Ok(Json(ratings))
}

/// Records or replaces a rating, registering the user if needed
pub async fn put_rating(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path((user, item)): Path<(String, String)>,
    Json(update): Json<RatingUpdate>,
) -> AppResult<StatusCode> {
    if !update.rating.is_finite() {
        return Err(AppError::InvalidInput("rating must be a finite number".to_string()));
    }

    tracing::info!(
        request_id = %request_id,
        user = %user,
        item = %item,
        rating = update.rating,
        "Storing rating"
    );

    let mut store = state.store.write().await;
    store.insert(user, item, update.rating);

    Ok(StatusCode::NO_CONTENT)
}

/// Ranked recommendations for a user
pub async fn get_recommendations(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(user): Path<String>,
    Query(params): Query<RecommendationParams>,
) -> AppResult<Json<RecommendationsResponse>> {
    let limit = params.limit.unwrap_or(state.config.recommendation_limit);
    let neighborhood = neighborhood_size(params.neighbors.or(state.config.neighborhood_size))?;

    tracing::info!(
        request_id = %request_id,
        user = %user,
        limit,
        neighborhood = ?neighborhood,
        "Processing recommendation request"
    );

    let query_user = user.clone();
    let recommendations = with_store(&state, move |store| {
        RecommenderEngine::new(store)
            .with_neighborhood(neighborhood)
            .recommend_top(&query_user, limit)
    })
    .await?;

    tracing::info!(
        request_id = %request_id,
        count = recommendations.len(),
        "Recommendations ready"
    );

    Ok(Json(RecommendationsResponse {
        user,
        recommendations,
        generated_at: Utc::now(),
    }))
}

/// Similarity of every other user to this one
pub async fn get_neighbors(
    State(state): State<AppState>,
    Path(user): Path<String>,
) -> AppResult<Json<Vec<SimilarityScore>>> {
    let neighbors =
        with_store(&state, move |store| RecommenderEngine::new(store).neighbors(&user)).await?;
    Ok(Json(neighbors))
}

/// Similarity between two users
pub async fn get_similarity(
    State(state): State<AppState>,
    Path((user_a, user_b)): Path<(String, String)>,
) -> AppResult<Json<SimilarityResponse>> {
    let (a, b) = (user_a.clone(), user_b.clone());
    let similarity = with_store(&state, move |store| {
        RecommenderEngine::new(store).similarity(&a, &b)
    })
    .await?;

    Ok(Json(SimilarityResponse {
        user_a,
        user_b,
        similarity,
    }))
}
