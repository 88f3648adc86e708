//! Apartment unit handlers.

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
use crate::domain::{CreateUnit, Unit, UnitFilter, UnitResponse, UpdateUnit};
use crate::errors::AppResult;

pub fn unit_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_units).post(create_unit))
        .route("/:id", get(get_unit).put(update_unit).delete(delete_unit))
}

/// List units with their current tenant
#[utoipa::path(
    get,
    path = "/api/units",
    tag = "Units",
    params(UnitFilter),
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Units by building, floor and number", body = Vec<UnitResponse>))
)]
pub async fn list_units(
    State(state): State<AppState>,
    Query(filter): Query<UnitFilter>,
) -> AppResult<Json<Vec<UnitResponse>>> {
    Ok(Json(state.unit_service.list_units(filter).await?))
}

#[utoipa::path(
    get,
    path = "/api/units/{id}",
    tag = "Units",
    params(("id" = Uuid, Path, description = "Unit ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Unit found", body = UnitResponse),
        (status = 404, description = "Unit not found")
    )
)]
pub async fn get_unit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<UnitResponse>> {
    Ok(Json(state.unit_service.get_unit(id).await?))
}

#[utoipa::path(
    post,
    path = "/api/units",
    tag = "Units",
    request_body = CreateUnit,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Unit created", body = Unit),
        (status = 403, description = "Manager only"),
        (status = 409, description = "Unit number already used in this building")
    )
)]
pub async fn create_unit(
    State(state): State<AppState>,
    user: CurrentUser,
    ValidatedJson(payload): ValidatedJson<CreateUnit>,
) -> AppResult<(StatusCode, Json<Unit>)> {
    require_manager(&user)?;
    let unit = state.unit_service.create_unit(payload).await?;
    Ok((StatusCode::CREATED, Json(unit)))
}

#[utoipa::path(
    put,
    path = "/api/units/{id}",
    tag = "Units",
    params(("id" = Uuid, Path, description = "Unit ID")),
    request_body = UpdateUnit,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Unit updated", body = Unit),
        (status = 403, description = "Manager only"),
        (status = 404, description = "Unit not found"),
        (status = 409, description = "Unit number already used in this building")
    )
)]
pub async fn update_unit(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateUnit>,
) -> AppResult<Json<Unit>> {
    require_manager(&user)?;
    Ok(Json(state.unit_service.update_unit(id, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/api/units/{id}",
    tag = "Units",
    params(("id" = Uuid, Path, description = "Unit ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Unit deleted"),
        (status = 400, description = "Unit still has tenants"),
        (status = 403, description = "Manager only"),
        (status = 404, description = "Unit not found")
    )
)]
pub async fn delete_unit(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    require_manager(&user)?;
    state.unit_service.delete_unit(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
