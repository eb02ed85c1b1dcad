//! Work requests: feed, detail, publish and status changes

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::{Created, DataResponse};
use crate::app::AppState;
use crate::auth::CurrentUser;
use crate::domain::contact;
use crate::domain::feed::{FeedFilter, FeedQuery};
use crate::domain::policy::{self, ListingAccess};
use crate::domain::work_requests::{
    CreateWorkRequest, RequestListing, UpdateRequestStatusRequest,
};
use crate::error::ApiError;
use crate::repo;

#[derive(Serialize)]
pub struct RequestDetailResponse {
    pub request: RequestListing,
    pub is_owner: bool,
    pub contact_link: Option<String>,
    pub can_rate_producer: bool,
}

/// GET /requests
///
/// Producers see their own requests (any status); contractors see every
/// pending one.
pub async fn list_requests(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FeedQuery>,
    user: CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    let filter = FeedFilter::from_query(&query)?;
    let scope = policy::requests_scope(&user.profile);

    let requests = repo::work_requests::list(&state.db, scope).await?;
    let requests = if filter.is_identity() {
        requests
    } else {
        filter.apply(&requests)
    };

    Ok(Json(DataResponse::new(requests)))
}

/// GET /requests/:id
pub async fn get_request(
    State(state): State<Arc<AppState>>,
    Path(request_id): Path<Uuid>,
    user: CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    let request = repo::work_requests::find(&state.db, request_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Solicitud no encontrada"))?;

    let viewer = &user.profile;
    let access = policy::listing_access(viewer.id, request.producer_id, request.is_open());
    if access == ListingAccess::Hidden {
        return Err(ApiError::not_found("Solicitud no encontrada"));
    }
    let is_owner = access == ListingAccess::Owner;

    let (contact_link, can_rate_producer) = match (&request.producer, is_owner) {
        (Some(producer), false) => (
            contact::request_inquiry_link(
                producer.phone.as_deref(),
                producer.display_name(),
                request.service_type.label(),
            ),
            policy::can_rate(viewer.role, producer.role, viewer.id, producer.id),
        ),
        _ => (None, false),
    };

    Ok(Json(DataResponse::new(RequestDetailResponse {
        request,
        is_owner,
        contact_link,
        can_rate_producer,
    })))
}

/// POST /requests
///
/// Either a free-text location or one of the caller's lots is required.
pub async fn create_request(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Json(req): Json<CreateWorkRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if !policy::can_create_request(user.profile.role) {
        return Err(ApiError::forbidden("Solo los productores pueden publicar solicitudes"));
    }

    let new_request = req.validate()?;

    if let Some(lot_id) = new_request.lot_id {
        if !repo::lots::is_owned_by(&state.db, lot_id, user.profile.id).await? {
            return Err(ApiError::validation("El lote seleccionado no existe"));
        }
    }

    let request_id = repo::work_requests::insert(&state.db, user.profile.id, &new_request).await?;

    tracing::info!(
        request_id = %request_id,
        producer_id = %user.profile.id,
        service_type = %new_request.service_type,
        "Request created"
    );

    let request = repo::work_requests::find(&state.db, request_id)
        .await?
        .ok_or_else(|| ApiError::internal("Created request could not be read back"))?;

    Ok(Created(request))
}

/// PATCH /requests/:id/status
///
/// Owners may reopen or close a request; other transitions are not theirs
/// to make.
pub async fn update_request_status(
    State(state): State<Arc<AppState>>,
    Path(request_id): Path<Uuid>,
    user: CurrentUser,
    Json(req): Json<UpdateRequestStatusRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let status = req.validate()?;

    let request = repo::work_requests::find(&state.db, request_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Solicitud no encontrada"))?;

    // Non-owners learn nothing about listings they cannot see
    match policy::listing_access(user.profile.id, request.producer_id, request.is_open()) {
        ListingAccess::Owner => {}
        ListingAccess::Public => {
            return Err(ApiError::forbidden("Solo el dueño puede modificar esta solicitud"))
        }
        ListingAccess::Hidden => return Err(ApiError::not_found("Solicitud no encontrada")),
    }

    let updated =
        repo::work_requests::update_status(&state.db, request_id, user.profile.id, status).await?;
    if !updated {
        return Err(ApiError::not_found("Solicitud no encontrada"));
    }

    tracing::info!(request_id = %request_id, status = status.as_str(), "Request status changed");

    Ok(Json(DataResponse::new(RequestListing { status, ..request })))
}
