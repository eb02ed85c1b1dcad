//! Own profile: onboarding, view and edit

use axum::{extract::State, response::IntoResponse, Json};
use std::sync::Arc;

use crate::api::{Created, DataResponse};
use crate::app::AppState;
use crate::auth::{CurrentUser, RequireAuth};
use crate::domain::users::{OnboardingRequest, UpdateProfileRequest};
use crate::error::ApiError;
use crate::repo;

/// POST /onboarding
///
/// Create the caller's profile. The role chosen here is permanent.
pub async fn complete_onboarding(
    State(state): State<Arc<AppState>>,
    auth: RequireAuth,
    Json(req): Json<OnboardingRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let new_profile = req.validate()?;

    let profile = repo::users::insert(&state.db, auth.user_id, &new_profile)
        .await?
        .ok_or_else(|| ApiError::Conflict("El perfil ya existe".to_string()))?;

    tracing::info!(user_id = %auth.user_id, role = %profile.role, "Onboarding completed");

    Ok(Created(profile))
}

/// GET /profile
pub async fn get_my_profile(user: CurrentUser) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(DataResponse::new(user.profile)))
}

/// PUT /profile
///
/// Name, location and phone only; a request that tries to change the role is
/// rejected.
pub async fn update_my_profile(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let changes = req.validate()?;

    let profile = repo::users::update(&state.db, user.profile.id, &changes)
        .await?
        .ok_or_else(|| ApiError::not_found("Perfil no encontrado"))?;

    tracing::info!(user_id = %profile.id, "Profile updated");

    Ok(Json(DataResponse::new(profile)))
}
