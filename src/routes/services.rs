//! Service listings: feed, detail, publish and status changes

use axum::{
    extract::{multipart::MultipartError, Multipart, Path, Query, State},
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
use crate::domain::service_listings::{
    CreateServiceForm, ServiceListing, UpdateServiceStatusRequest,
};
use crate::error::ApiError;
use crate::repo;
use crate::services::ImageUpload;

const IMAGES_FIELD: &str = "images";

#[derive(Serialize)]
pub struct ServiceDetailResponse {
    pub service: ServiceListing,
    pub is_owner: bool,
    /// `None` for the owner and when the contractor has no usable phone
    pub contact_link: Option<String>,
    pub can_rate_contractor: bool,
}

/// GET /services
///
/// Contractors see their own services (any status); producers see every
/// active one. The text and type filters run on top of that scope.
pub async fn list_services(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FeedQuery>,
    user: CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    let filter = FeedFilter::from_query(&query)?;
    let scope = policy::services_scope(&user.profile);

    let services = repo::service_listings::list(&state.db, scope).await?;
    let services = if filter.is_identity() {
        services
    } else {
        filter.apply(&services)
    };

    Ok(Json(DataResponse::new(services)))
}

/// GET /services/:id
pub async fn get_service(
    State(state): State<Arc<AppState>>,
    Path(service_id): Path<Uuid>,
    user: CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    let service = repo::service_listings::find(&state.db, service_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Servicio no encontrado"))?;

    let viewer = &user.profile;
    let access = policy::listing_access(viewer.id, service.contractor_id, service.is_open());
    if access == ListingAccess::Hidden {
        return Err(ApiError::not_found("Servicio no encontrado"));
    }
    let is_owner = access == ListingAccess::Owner;

    let (contact_link, can_rate_contractor) = match (&service.contractor, is_owner) {
        (Some(contractor), false) => (
            contact::service_inquiry_link(
                contractor.phone.as_deref(),
                contractor.display_name(),
                &service.title,
            ),
            policy::can_rate(viewer.role, contractor.role, viewer.id, contractor.id),
        ),
        _ => (None, false),
    };

    Ok(Json(DataResponse::new(ServiceDetailResponse {
        service,
        is_owner,
        contact_link,
        can_rate_contractor,
    })))
}

/// POST /services
///
/// Multipart form: the text fields of the service plus any number of
/// `images` files. Fields are validated before anything is uploaded; images
/// that fail to upload are dropped and the service is still created.
pub async fn create_service(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    if !policy::can_create_service(user.profile.role) {
        return Err(ApiError::forbidden("Solo los contratistas pueden publicar servicios"));
    }

    let mut form = CreateServiceForm::default();
    let mut images = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
        let name = field.name().unwrap_or_default().to_string();

        if name == IMAGES_FIELD {
            let file_name = field.file_name().unwrap_or("image").to_string();
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let bytes = field.bytes().await.map_err(bad_multipart)?;
            if !content_type.starts_with("image/") {
                tracing::warn!(file_name, content_type, "Skipping non-image upload");
            } else if !bytes.is_empty() {
                images.push(ImageUpload {
                    file_name,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
        } else {
            let value = field.text().await.map_err(bad_multipart)?;
            form.set_field(&name, value);
        }
    }

    let new_service = form.validate()?;

    let image_urls = state.storage.upload_all(&images, user.auth.token()).await;
    if image_urls.len() < images.len() {
        tracing::warn!(
            uploaded = image_urls.len(),
            submitted = images.len(),
            "Some service images were not uploaded"
        );
    }

    let service_id =
        repo::service_listings::insert(&state.db, user.profile.id, &new_service, &image_urls)
            .await?;

    tracing::info!(
        service_id = %service_id,
        contractor_id = %user.profile.id,
        images = image_urls.len(),
        "Service created"
    );

    let service = repo::service_listings::find(&state.db, service_id)
        .await?
        .ok_or_else(|| ApiError::internal("Created service could not be read back"))?;

    Ok(Created(service))
}

/// PATCH /services/:id/status
pub async fn update_service_status(
    State(state): State<Arc<AppState>>,
    Path(service_id): Path<Uuid>,
    user: CurrentUser,
    Json(req): Json<UpdateServiceStatusRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let service = repo::service_listings::find(&state.db, service_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Servicio no encontrado"))?;

    // Non-owners learn nothing about listings they cannot see
    match policy::listing_access(user.profile.id, service.contractor_id, service.is_open()) {
        ListingAccess::Owner => {}
        ListingAccess::Public => {
            return Err(ApiError::forbidden("Solo el dueño puede modificar este servicio"))
        }
        ListingAccess::Hidden => return Err(ApiError::not_found("Servicio no encontrado")),
    }

    let updated =
        repo::service_listings::update_status(&state.db, service_id, user.profile.id, req.status)
            .await?;
    if !updated {
        return Err(ApiError::not_found("Servicio no encontrado"));
    }

    tracing::info!(service_id = %service_id, status = req.status.as_str(), "Service status changed");

    Ok(Json(DataResponse::new(ServiceListing {
        status: req.status,
        ..service
    })))
}

fn bad_multipart(e: MultipartError) -> ApiError {
    tracing::warn!(error = %e, "Malformed multipart body");
    ApiError::bad_request(format!("Datos de formulario inválidos: {}", e.body_text()))
}
