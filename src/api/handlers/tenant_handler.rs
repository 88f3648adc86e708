//! Tenant onboarding and unit assignment.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use uuid::Uuid;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{require_staff, CurrentUser};
use crate::api::AppState;
use crate::domain::{AssignUnit, CreateTenant, TenantCreated, TenantSummary, UserResponse};
use crate::errors::AppResult;

pub fn tenant_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_tenants).post(create_tenant))
        .route("/:id/assign-unit", post(assign_unit))
        .route("/:id/remove-unit", post(remove_unit))
}

/// Create a tenant account
///
/// The login e-mail is generated and the default password is returned once.
#[utoipa::path(
    post,
    path = "/api/tenants",
    tag = "Tenants",
    request_body = CreateTenant,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Tenant created", body = TenantCreated),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Manager or staff only")
    )
)]
pub async fn create_tenant(
    State(state): State<AppState>,
    user: CurrentUser,
    ValidatedJson(payload): ValidatedJson<CreateTenant>,
) -> AppResult<(StatusCode, Json<TenantCreated>)> {
    require_staff(&user)?;
    let created = state.tenant_service.create_tenant(payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Tenants with unit details and balances
#[utoipa::path(
    get,
    path = "/api/tenants",
    tag = "Tenants",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Tenants", body = Vec<TenantSummary>),
        (status = 403, description = "Manager or staff only")
    )
)]
pub async fn list_tenants(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<TenantSummary>>> {
    require_staff(&user)?;
    Ok(Json(state.tenant_service.list_tenants().await?))
}

/// Move a tenant into a unit
#[utoipa::path(
    post,
    path = "/api/tenants/{id}/assign-unit",
    tag = "Tenants",
    params(("id" = Uuid, Path, description = "Tenant ID")),
    request_body = AssignUnit,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Unit assigned", body = UserResponse),
        (status = 400, description = "Unit is occupied"),
        (status = 403, description = "Manager or staff only"),
        (status = 404, description = "Tenant or unit not found")
    )
)]
pub async fn assign_unit(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(tenant_id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<AssignUnit>,
) -> AppResult<Json<UserResponse>> {
    require_staff(&user)?;
    let tenant = state
        .tenant_service
        .assign_unit(tenant_id, payload.unit_id)
        .await?;
    state.forget_user(tenant_id).await;
    Ok(Json(tenant))
}

/// Move a tenant out; the unit becomes available
#[utoipa::path(
    post,
    path = "/api/tenants/{id}/remove-unit",
    tag = "Tenants",
    params(("id" = Uuid, Path, description = "Tenant ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Unit removed", body = UserResponse),
        (status = 403, description = "Manager or staff only"),
        (status = 404, description = "Tenant not found")
    )
)]
pub async fn remove_unit(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(tenant_id): Path<Uuid>,
) -> AppResult<Json<UserResponse>> {
    require_staff(&user)?;
    let tenant = state.tenant_service.remove_unit(tenant_id).await?;
    state.forget_user(tenant_id).await;
    Ok(Json(tenant))
}
