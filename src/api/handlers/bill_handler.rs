//! Bill handlers, including monthly rent generation.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use uuid::Uuid;

use crate::api::extractors::{OptionalJson, ValidatedJson};
use crate::api::middleware::{require_manager, require_staff, CurrentUser};
use crate::api::AppState;
use crate::domain::{
    Bill, BillFilter, BillView, CreateBill, GenerateMonthlyBills, GenerationSummary, UpdateBill,
};
use crate::errors::AppResult;

pub fn bill_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_bills).post(create_bill))
        .route("/my-unpaid", get(my_unpaid))
        .route("/generate-monthly", post(generate_monthly))
        .route("/:id", get(get_bill).put(update_bill).delete(delete_bill))
}

/// List bills, latest due date first
#[utoipa::path(
    get,
    path = "/api/bills",
    tag = "Bills",
    params(BillFilter),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Bills", body = Vec<BillView>),
        (status = 400, description = "Invalid month or year")
    )
)]
pub async fn list_bills(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(filter): Query<BillFilter>,
) -> AppResult<Json<Vec<BillView>>> {
    Ok(Json(state.bill_service.list_bills(user.actor(), filter).await?))
}

/// The caller's unpaid bills, earliest due first
#[utoipa::path(
    get,
    path = "/api/bills/my-unpaid",
    tag = "Bills",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Unpaid and overdue bills; empty for staff", body = Vec<Bill>))
)]
pub async fn my_unpaid(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<Bill>>> {
    Ok(Json(state.bill_service.my_unpaid(user.actor()).await?))
}

#[utoipa::path(
    get,
    path = "/api/bills/{id}",
    tag = "Bills",
    params(("id" = Uuid, Path, description = "Bill ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Bill found", body = BillView),
        (status = 403, description = "Not your bill"),
        (status = 404, description = "Bill not found")
    )
)]
pub async fn get_bill(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<BillView>> {
    Ok(Json(state.bill_service.get_bill(user.actor(), id).await?))
}

/// Create a one-off bill
#[utoipa::path(
    post,
    path = "/api/bills",
    tag = "Bills",
    request_body = CreateBill,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Bill created", body = Bill),
        (status = 403, description = "Manager or staff only"),
        (status = 404, description = "Tenant not found")
    )
)]
pub async fn create_bill(
    State(state): State<AppState>,
    user: CurrentUser,
    ValidatedJson(payload): ValidatedJson<CreateBill>,
) -> AppResult<(StatusCode, Json<Bill>)> {
    require_staff(&user)?;
    let bill = state.bill_service.create_bill(payload).await?;
    Ok((StatusCode::CREATED, Json(bill)))
}

/// Bill the month's rent to every housed tenant
///
/// Safe to repeat: tenants already billed for the month are skipped.
#[utoipa::path(
    post,
    path = "/api/bills/generate-monthly",
    tag = "Bills",
    request_body(content = Option<GenerateMonthlyBills>, description = "Defaults to the current month"),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Generation summary", body = GenerationSummary),
        (status = 400, description = "Invalid month or year"),
        (status = 403, description = "Manager or staff only")
    )
)]
pub async fn generate_monthly(
    State(state): State<AppState>,
    user: CurrentUser,
    OptionalJson(payload): OptionalJson<GenerateMonthlyBills>,
) -> AppResult<Json<GenerationSummary>> {
    require_staff(&user)?;
    let summary = state.bill_service.generate_monthly(payload).await?;
    tracing::info!(
        actor = %user.id,
        period = %summary.period,
        created = summary.created,
        "Rent generation requested"
    );
    Ok(Json(summary))
}

#[utoipa::path(
    put,
    path = "/api/bills/{id}",
    tag = "Bills",
    params(("id" = Uuid, Path, description = "Bill ID")),
    request_body = UpdateBill,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Bill updated", body = Bill),
        (status = 403, description = "Manager or staff only"),
        (status = 404, description = "Bill not found")
    )
)]
pub async fn update_bill(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateBill>,
) -> AppResult<Json<Bill>> {
    require_staff(&user)?;
    Ok(Json(state.bill_service.update_bill(id, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/api/bills/{id}",
    tag = "Bills",
    params(("id" = Uuid, Path, description = "Bill ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Bill deleted"),
        (status = 403, description = "Manager only"),
        (status = 404, description = "Bill not found"),
        (status = 409, description = "Bill has payments")
    )
)]
pub async fn delete_bill(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    require_manager(&user)?;
    state.bill_service.delete_bill(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
