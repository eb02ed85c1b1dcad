//! Session → profile resolution
//!
//! Runs first on every protected endpoint: a verified identity without a
//! `users_public` row is sent to onboarding.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use super::{AuthContext, RequireAuth};
use crate::app::AppState;
use crate::domain::users::UserProfile;
use crate::error::ApiError;
use crate::repo;

/// What the resolver found for an authenticated identity
#[derive(Debug, Clone)]
pub enum Session {
    Ready(UserProfile),
    OnboardingRequired,
}

pub async fn resolve(pool: &PgPool, user_id: Uuid) -> Result<Session, ApiError> {
    let session = match repo::users::find(pool, user_id).await? {
        Some(profile) => Session::Ready(profile),
        None => {
            tracing::debug!(%user_id, "No profile yet, onboarding required");
            Session::OnboardingRequired
        }
    };
    Ok(session)
}

/// Extractor for handlers that need the caller's profile
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub auth: AuthContext,
    pub profile: UserProfile,
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let RequireAuth(auth) = RequireAuth::from_request_parts(parts, state).await?;

        match resolve(&state.db, auth.user_id).await? {
            Session::Ready(profile) => Ok(CurrentUser { auth, profile }),
            Session::OnboardingRequired => Err(ApiError::OnboardingRequired),
        }
    }
}
