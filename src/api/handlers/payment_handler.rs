//! Payment handlers: manual recording and PayMongo checkout links.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use uuid::Uuid;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{require_role, require_staff, CurrentUser};
use crate::api::AppState;
use crate::domain::{
    CreatePaymentLink, Payment, PaymentLinkCreated, PaymentVerification, PaymentView,
    RecordPayment, UserRole,
};
use crate::errors::AppResult;

pub fn payment_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_payments).post(record_payment))
        .route("/paymongo-create", post(create_payment_link))
        .route("/:id/verify", post(verify_payment))
}

/// List payments, newest first
#[utoipa::path(
    get,
    path = "/api/payments",
    tag = "Payments",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Payments with bill type and tenant name", body = Vec<PaymentView>))
)]
pub async fn list_payments(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<PaymentView>>> {
    Ok(Json(state.payment_service.list_payments(user.actor()).await?))
}

/// Record a payment received at the office
#[utoipa::path(
    post,
    path = "/api/payments",
    tag = "Payments",
    request_body = RecordPayment,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Payment recorded and bill paid", body = Payment),
        (status = 400, description = "Bill already paid"),
        (status = 403, description = "Manager or staff only"),
        (status = 404, description = "Bill not found")
    )
)]
pub async fn record_payment(
    State(state): State<AppState>,
    user: CurrentUser,
    ValidatedJson(payload): ValidatedJson<RecordPayment>,
) -> AppResult<(StatusCode, Json<Payment>)> {
    require_staff(&user)?;
    let payment = state.payment_service.record_manual(payload).await?;
    Ok((StatusCode::CREATED, Json(payment)))
}

/// Open a PayMongo checkout for one of your bills
#[utoipa::path(
    post,
    path = "/api/payments/paymongo-create",
    tag = "Payments",
    request_body = CreatePaymentLink,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Checkout link created", body = PaymentLinkCreated),
        (status = 400, description = "Bill is not payable"),
        (status = 403, description = "Tenants only"),
        (status = 404, description = "Bill not found"),
        (status = 502, description = "PayMongo request failed"),
        (status = 503, description = "PayMongo is not configured")
    )
)]
pub async fn create_payment_link(
    State(state): State<AppState>,
    user: CurrentUser,
    ValidatedJson(payload): ValidatedJson<CreatePaymentLink>,
) -> AppResult<(StatusCode, Json<PaymentLinkCreated>)> {
    require_role(&user, &[UserRole::Tenant])?;
    let created = state
        .payment_service
        .create_link(user.actor(), payload)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Check a checkout link with PayMongo and settle the bill when paid
#[utoipa::path(
    post,
    path = "/api/payments/{id}/verify",
    tag = "Payments",
    params(("id" = Uuid, Path, description = "Payment ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current payment state", body = PaymentVerification),
        (status = 400, description = "Not an online payment"),
        (status = 403, description = "Not your payment"),
        (status = 404, description = "Payment not found"),
        (status = 502, description = "PayMongo request failed"),
        (status = 503, description = "PayMongo is not configured")
    )
)]
pub async fn verify_payment(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<PaymentVerification>> {
    Ok(Json(state.payment_service.verify(user.actor(), id).await?))
}
