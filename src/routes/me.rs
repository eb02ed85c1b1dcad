use axum::{extract::State, response::IntoResponse, Json};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::DataResponse;
use crate::app::AppState;
use crate::auth::{session, RequireAuth, Session};
use crate::domain::policy::Capabilities;
use crate::domain::users::UserProfile;
use crate::error::ApiError;

#[derive(Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MeResponse {
    Ready {
        user_id: Uuid,
        email: Option<String>,
        profile: UserProfile,
        capabilities: Capabilities,
    },
    OnboardingRequired {
        user_id: Uuid,
        email: Option<String>,
    },
}

/// GET /me
///
/// Where the app lands after login: the home layout for the caller's role,
/// or a pointer to onboarding when no profile exists yet.
pub async fn get_me(
    State(state): State<Arc<AppState>>,
    auth: RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    let response = match session::resolve(&state.db, auth.user_id).await? {
        Session::Ready(profile) => MeResponse::Ready {
            user_id: auth.user_id,
            email: auth.email.clone(),
            capabilities: Capabilities::for_role(profile.role),
            profile,
        },
        Session::OnboardingRequired => MeResponse::OnboardingRequired {
            user_id: auth.user_id,
            email: auth.email.clone(),
        },
    };

    Ok(Json(DataResponse::new(response)))
}
