//! Maintenance request handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use uuid::Uuid;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{require_manager, CurrentUser};
use crate::api::AppState;
use crate::domain::{
    CreateMaintenanceRequest, MaintenanceFilter, MaintenanceRequest, MaintenanceView,
    UpdateMaintenanceRequest,
};
use crate::errors::AppResult;

pub fn maintenance_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_requests).post(create_request))
        .route(
            "/:id",
            get(get_request).put(update_request).delete(delete_request),
        )
}

#[utoipa::path(
    get,
    path = "/api/maintenance",
    tag = "Maintenance",
    params(MaintenanceFilter),
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Requests, newest first", body = Vec<MaintenanceView>))
)]
pub async fn list_requests(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(filter): Query<MaintenanceFilter>,
) -> AppResult<Json<Vec<MaintenanceView>>> {
    let requests = state
        .maintenance_service
        .list_requests(user.actor(), filter)
        .await?;
    Ok(Json(requests))
}

#[utoipa::path(
    get,
    path = "/api/maintenance/{id}",
    tag = "Maintenance",
    params(("id" = Uuid, Path, description = "Request ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Request found", body = MaintenanceView),
        (status = 403, description = "Not your request"),
        (status = 404, description = "Request not found")
    )
)]
pub async fn get_request(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<MaintenanceView>> {
    Ok(Json(
        state.maintenance_service.get_request(user.actor(), id).await?,
    ))
}

/// File a maintenance request
///
/// Tenants file for themselves; staff must pass `tenant_id`.
#[utoipa::path(
    post,
    path = "/api/maintenance",
    tag = "Maintenance",
    request_body = CreateMaintenanceRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Request filed", body = MaintenanceRequest),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Tenant not found")
    )
)]
pub async fn create_request(
    State(state): State<AppState>,
    user: CurrentUser,
    ValidatedJson(payload): ValidatedJson<CreateMaintenanceRequest>,
) -> AppResult<(StatusCode, Json<MaintenanceRequest>)> {
    let request = state
        .maintenance_service
        .create_request(user.actor(), payload)
        .await?;
    Ok((StatusCode::CREATED, Json(request)))
}

#[utoipa::path(
    put,
    path = "/api/maintenance/{id}",
    tag = "Maintenance",
    params(("id" = Uuid, Path, description = "Request ID")),
    request_body = UpdateMaintenanceRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Request updated", body = MaintenanceRequest),
        (status = 403, description = "Tenants may only reword their own requests"),
        (status = 404, description = "Request not found")
    )
)]
pub async fn update_request(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateMaintenanceRequest>,
) -> AppResult<Json<MaintenanceRequest>> {
    let request = state
        .maintenance_service
        .update_request(user.actor(), id, payload)
        .await?;
    Ok(Json(request))
}

#[utoipa::path(
    delete,
    path = "/api/maintenance/{id}",
    tag = "Maintenance",
    params(("id" = Uuid, Path, description = "Request ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Request deleted"),
        (status = 403, description = "Manager only"),
        (status = 404, description = "Request not found")
    )
)]
pub async fn delete_request(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    require_manager(&user)?;
    state.maintenance_service.delete_request(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
