//! Public profiles and ratings

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::{Created, DataResponse};
use crate::app::AppState;
use crate::auth::CurrentUser;
use crate::domain::policy;
use crate::domain::ratings::{rating_criteria, CreateRatingRequest, Rating};
use crate::domain::reputation::ReputationView;
use crate::domain::users::UserProfile;
use crate::error::ApiError;
use crate::repo;

#[derive(Serialize)]
pub struct PublicProfileResponse {
    pub profile: UserProfile,
    pub reputation: ReputationView,
    pub ratings: Vec<Rating>,
    pub can_rate: bool,
    /// Shown in the rating form when `can_rate` is true
    pub rating_criteria: &'static [&'static str],
}

/// GET /users/:id
pub async fn get_public_profile(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
    viewer: CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    let (profile, ratings) = tokio::try_join!(
        repo::users::find(&state.db, user_id),
        repo::ratings::list_for_target(&state.db, user_id),
    )?;
    let profile = profile.ok_or_else(|| ApiError::not_found("Usuario no encontrado"))?;

    let can_rate = policy::can_rate(viewer.profile.role, profile.role, viewer.profile.id, profile.id);

    Ok(Json(DataResponse::new(PublicProfileResponse {
        reputation: ReputationView::new(&profile, &ratings),
        rating_criteria: rating_criteria(profile.role),
        can_rate,
        ratings,
        profile,
    })))
}

/// GET /users/:id/ratings
///
/// Newest first.
pub async fn list_ratings(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
    _viewer: CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    let ratings = repo::ratings::list_for_target(&state.db, user_id).await?;
    Ok(Json(DataResponse::new(ratings)))
}

/// POST /users/:id/ratings
///
/// Guarded by the same check that decides whether the rate action is shown.
pub async fn create_rating(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
    viewer: CurrentUser,
    Json(req): Json<CreateRatingRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let subject = repo::users::find(&state.db, user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Usuario no encontrado"))?;

    let me = &viewer.profile;
    if !policy::can_rate(me.role, subject.role, me.id, subject.id) {
        let reason = policy::rate_denial_reason(me.role, subject.role, me.id == subject.id);
        tracing::warn!(author_id = %me.id, target_id = %subject.id, reason, "Rating refused");
        return Err(ApiError::forbidden(reason));
    }

    let new_rating = req.validate()?;

    let rating = repo::ratings::insert(&state.db, me.id, subject.id, &new_rating).await?;

    tracing::info!(
        rating_id = %rating.id,
        author_id = %me.id,
        target_id = %subject.id,
        stars = rating.stars,
        "Rating created"
    );

    Ok(Created(rating))
}
