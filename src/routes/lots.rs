use axum::{extract::State, response::IntoResponse, Json};
use std::sync::Arc;

use crate::api::{Created, DataResponse};
use crate::app::AppState;
use crate::auth::CurrentUser;
use crate::domain::lots::{CreateLotRequest, Lot};
use crate::domain::policy;
use crate::error::ApiError;
use crate::repo;

/// GET /lots
///
/// The caller's own lots, newest first.
pub async fn list_lots(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    if !policy::can_manage_lots(user.profile.role) {
        return Ok(Json(DataResponse::new(Vec::<Lot>::new())));
    }

    let lots = repo::lots::list_for_owner(&state.db, user.profile.id).await?;
    Ok(Json(DataResponse::new(lots)))
}

/// POST /lots
pub async fn create_lot(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Json(req): Json<CreateLotRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if !policy::can_manage_lots(user.profile.role) {
        return Err(ApiError::forbidden("Solo los productores pueden registrar lotes"));
    }

    let new_lot = req.validate()?;
    let lot = repo::lots::insert(&state.db, user.profile.id, &new_lot).await?;

    tracing::info!(lot_id = %lot.id, owner_id = %user.profile.id, "Lot created");

    Ok(Created(lot))
}
