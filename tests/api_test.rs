//! Router tests over in-memory services.
//!
//! No database or Redis: `AppState::new` is built from fakes, so these cover
//! routing, authentication, role checks, validation and error mapping.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{NaiveDate, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use apartment_api::api::{create_router, AppState};
use apartment_api::domain::{
    Actor, Bill, BillFilter, BillStatus, BillView, BillingPeriod, CreateBill,
    CreateMaintenanceRequest, CreatePaymentLink, CreateTenant, CreateUnit, CreateUser, Dashboard,
    GenerateMonthlyBills, GenerationSummary, MaintenanceFilter, MaintenanceRequest,
    MaintenanceView, Payment, PaymentLinkCreated, PaymentVerification, PaymentView,
    RecordPayment, TenantCreated, TenantDashboard, TenantSummary, Unit, UnitFilter, UnitResponse,
    UpdateBill, UpdateMaintenanceRequest, UpdateProfile, UpdateUnit, UserFilter, UserResponse,
    UserRole,
};
use apartment_api::errors::{AppError, AppResult};
use apartment_api::services::{
    AuthService, BillService, Claims, DashboardService, MaintenanceService, PaymentService,
    ServiceContainer, TenantService, TokenResponse, UnitService, UserService,
};

// =============================================================================
// Fake services
// =============================================================================

const MANAGER_ID: u128 = 1;
const STAFF_ID: u128 = 2;
const TENANT_ID: u128 = 3;
const DELETED_ID: u128 = 99;

fn profile(id: Uuid) -> Option<UserResponse> {
    let (email, role) = match id.as_u128() {
        MANAGER_ID => ("manager@ancheta.com", UserRole::Manager),
        STAFF_ID => ("staff@ancheta.com", UserRole::Staff),
        TENANT_ID => ("tenant@ancheta.com", UserRole::Tenant),
        _ => return None,
    };

    Some(UserResponse {
        id,
        email: email.to_string(),
        name: format!("Demo {}", role),
        role,
        phone: None,
        unit_id: None,
        unit_number: None,
        floor: None,
        building: None,
        created_at: Utc::now(),
    })
}

fn tenant_bill() -> Bill {
    Bill {
        id: Uuid::from_u128(500),
        tenant_id: Uuid::from_u128(TENANT_ID),
        bill_type: "Rent".to_string(),
        amount_cents: 500_000,
        description: None,
        due_date: NaiveDate::from_ymd_opt(2026, 10, 31).unwrap(),
        status: BillStatus::Unpaid,
        period: Some("2026-10".to_string()),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

/// Tokens are `<role>-token`; `deleted-token` belongs to a removed account.
struct FakeAuth;

#[async_trait]
impl AuthService for FakeAuth {
    async fn login(&self, email: String, password: String) -> AppResult<TokenResponse> {
        if email != "manager@ancheta.com" || password != "password123" {
            return Err(AppError::InvalidCredentials);
        }

        Ok(TokenResponse {
            message: "Login successful".to_string(),
            token: "manager-token".to_string(),
            token_type: "Bearer".to_string(),
            expires_in: 604_800,
            user: profile(Uuid::from_u128(MANAGER_ID)).unwrap(),
        })
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        let id = match token {
            "manager-token" => MANAGER_ID,
            "staff-token" => STAFF_ID,
            "tenant-token" => TENANT_ID,
            "deleted-token" => DELETED_ID,
            _ => return Err(AppError::Unauthorized),
        };

        Ok(Claims {
            sub: Uuid::from_u128(id),
            email: String::new(),
            role: String::new(),
            exp: Utc::now().timestamp() + 3600,
            iat: Utc::now().timestamp(),
        })
    }
}

#[derive(Default)]
struct FakeUsers {
    deleted: Mutex<Vec<Uuid>>,
}

#[async_trait]
impl UserService for FakeUsers {
    async fn current_user(&self, id: Uuid) -> AppResult<UserResponse> {
        profile(id).ok_or_else(|| AppError::not_found("User"))
    }

    async fn list_users(&self, filter: UserFilter) -> AppResult<Vec<UserResponse>> {
        Ok([MANAGER_ID, STAFF_ID, TENANT_ID]
            .into_iter()
            .filter_map(|id| profile(Uuid::from_u128(id)))
            .filter(|u| filter.role.map_or(true, |role| u.role == role))
            .collect())
    }

    async fn get_user(&self, actor: Actor, id: Uuid) -> AppResult<UserResponse> {
        if !actor.can_view(id) {
            return Err(AppError::Forbidden);
        }
        self.current_user(id).await
    }

    async fn create_user(&self, request: CreateUser) -> AppResult<UserResponse> {
        let mut user = profile(Uuid::from_u128(STAFF_ID)).unwrap();
        user.id = Uuid::new_v4();
        user.email = request.email;
        user.name = request.name;
        user.role = request.role;
        Ok(user)
    }

    async fn update_user(
        &self,
        _actor: Actor,
        id: Uuid,
        changes: UpdateProfile,
    ) -> AppResult<UserResponse> {
        let mut user = self.current_user(id).await?;
        if let Some(name) = changes.name {
            user.name = name;
        }
        Ok(user)
    }

    async fn delete_user(&self, actor: Actor, id: Uuid) -> AppResult<()> {
        if actor.id == id {
            return Err(AppError::BadRequest(
                "You cannot delete your own account".to_string(),
            ));
        }
        self.deleted.lock().unwrap().push(id);
        Ok(())
    }
}

struct FakeUnits;

#[async_trait]
impl UnitService for FakeUnits {
    async fn list_units(&self, _filter: UnitFilter) -> AppResult<Vec<UnitResponse>> {
        Ok(vec![])
    }

    async fn get_unit(&self, _id: Uuid) -> AppResult<UnitResponse> {
        Err(AppError::not_found("Unit"))
    }

    async fn create_unit(&self, _request: CreateUnit) -> AppResult<Unit> {
        Err(AppError::conflict("Unit 101 already exists in Building A"))
    }

    async fn update_unit(&self, _id: Uuid, _changes: UpdateUnit) -> AppResult<Unit> {
        Err(AppError::not_found("Unit"))
    }

    async fn delete_unit(&self, _id: Uuid) -> AppResult<()> {
        Err(AppError::BadRequest(
            "Cannot delete a unit with assigned tenants".to_string(),
        ))
    }
}

struct FakeTenants;

#[async_trait]
impl TenantService for FakeTenants {
    async fn create_tenant(&self, request: CreateTenant) -> AppResult<TenantCreated> {
        let mut tenant = profile(Uuid::from_u128(TENANT_ID)).unwrap();
        tenant.id = Uuid::new_v4();
        tenant.name = request.name;
        tenant.email = "tenant2@ancheta.com".to_string();

        Ok(TenantCreated {
            login_email: tenant.email.clone(),
            login_password: "password123".to_string(),
            tenant,
        })
    }

    async fn list_tenants(&self) -> AppResult<Vec<TenantSummary>> {
        Ok(vec![])
    }

    async fn assign_unit(&self, _tenant_id: Uuid, _unit_id: Uuid) -> AppResult<UserResponse> {
        Err(AppError::BadRequest("Unit is already occupied".to_string()))
    }

    async fn remove_unit(&self, tenant_id: Uuid) -> AppResult<UserResponse> {
        profile(tenant_id).ok_or_else(|| AppError::not_found("Tenant"))
    }
}

#[derive(Default)]
struct FakeBills {
    generated: Mutex<Vec<(Option<i32>, Option<u32>)>>,
}

#[async_trait]
impl BillService for FakeBills {
    async fn list_bills(&self, _actor: Actor, _filter: BillFilter) -> AppResult<Vec<BillView>> {
        Ok(vec![])
    }

    async fn my_unpaid(&self, actor: Actor) -> AppResult<Vec<Bill>> {
        if actor.is_tenant() {
            Ok(vec![tenant_bill()])
        } else {
            Ok(vec![])
        }
    }

    async fn get_bill(&self, actor: Actor, _id: Uuid) -> AppResult<BillView> {
        let bill = tenant_bill();
        if !actor.can_view(bill.tenant_id) {
            return Err(AppError::Forbidden);
        }
        Ok(BillView {
            bill,
            tenant_name: Some("Demo tenant".to_string()),
            tenant_email: None,
            unit_number: Some("101".to_string()),
            building: Some("Building A".to_string()),
        })
    }

    async fn create_bill(&self, _request: CreateBill) -> AppResult<Bill> {
        Ok(tenant_bill())
    }

    async fn generate_monthly(
        &self,
        request: GenerateMonthlyBills,
    ) -> AppResult<GenerationSummary> {
        self.generated
            .lock()
            .unwrap()
            .push((request.year, request.month));
        let period = BillingPeriod::resolve(request.year, request.month)?;
        Ok(GenerationSummary::new(period, 2, 0))
    }

    async fn update_bill(&self, _id: Uuid, _changes: UpdateBill) -> AppResult<Bill> {
        Ok(tenant_bill())
    }

    async fn delete_bill(&self, _id: Uuid) -> AppResult<()> {
        Err(AppError::conflict("Bill has payments and cannot be deleted"))
    }

    async fn mark_overdue(&self, _today: NaiveDate) -> AppResult<u64> {
        Ok(0)
    }
}

/// Online payments are not configured.
struct FakePayments;

#[async_trait]
impl PaymentService for FakePayments {
    async fn list_payments(&self, _actor: Actor) -> AppResult<Vec<PaymentView>> {
        Ok(vec![])
    }

    async fn record_manual(&self, _request: RecordPayment) -> AppResult<Payment> {
        Err(AppError::BadRequest("Bill is already paid".to_string()))
    }

    async fn create_link(
        &self,
        _actor: Actor,
        _request: CreatePaymentLink,
    ) -> AppResult<PaymentLinkCreated> {
        Err(AppError::ServiceUnavailable("PayMongo".to_string()))
    }

    async fn verify(&self, _actor: Actor, _payment_id: Uuid) -> AppResult<PaymentVerification> {
        Err(AppError::ServiceUnavailable("PayMongo".to_string()))
    }
}

struct FakeMaintenance;

#[async_trait]
impl MaintenanceService for FakeMaintenance {
    async fn list_requests(
        &self,
        _actor: Actor,
        _filter: MaintenanceFilter,
    ) -> AppResult<Vec<MaintenanceView>> {
        Ok(vec![])
    }

    async fn get_request(&self, _actor: Actor, _id: Uuid) -> AppResult<MaintenanceView> {
        Err(AppError::not_found("Maintenance request"))
    }

    async fn create_request(
        &self,
        actor: Actor,
        request: CreateMaintenanceRequest,
    ) -> AppResult<MaintenanceRequest> {
        if !actor.is_tenant() && request.tenant_id.is_none() {
            return Err(AppError::validation("tenant_id is required"));
        }
        Err(AppError::not_found("Tenant"))
    }

    async fn update_request(
        &self,
        _actor: Actor,
        _id: Uuid,
        _changes: UpdateMaintenanceRequest,
    ) -> AppResult<MaintenanceRequest> {
        Err(AppError::Forbidden)
    }

    async fn delete_request(&self, _id: Uuid) -> AppResult<()> {
        Ok(())
    }
}

struct FakeDashboard;

#[async_trait]
impl DashboardService for FakeDashboard {
    async fn dashboard(&self, _actor: Actor) -> AppResult<Dashboard> {
        Ok(Dashboard::Tenant(TenantDashboard {
            unpaid_bills: Default::default(),
            completed_payments: Default::default(),
            pending_maintenance: 1,
            recent_bills: vec![],
        }))
    }
}

#[derive(Default)]
struct FakeServices {
    users: Arc<FakeUsers>,
    bills: Arc<FakeBills>,
}

impl ServiceContainer for FakeServices {
    fn auth(&self) -> Arc<dyn AuthService> {
        Arc::new(FakeAuth)
    }

    fn users(&self) -> Arc<dyn UserService> {
        self.users.clone()
    }

    fn units(&self) -> Arc<dyn UnitService> {
        Arc::new(FakeUnits)
    }

    fn tenants(&self) -> Arc<dyn TenantService> {
        Arc::new(FakeTenants)
    }

    fn bills(&self) -> Arc<dyn BillService> {
        self.bills.clone()
    }

    fn payments(&self) -> Arc<dyn PaymentService> {
        Arc::new(FakePayments)
    }

    fn maintenance(&self) -> Arc<dyn MaintenanceService> {
        Arc::new(FakeMaintenance)
    }

    fn dashboard(&self) -> Arc<dyn DashboardService> {
        Arc::new(FakeDashboard)
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn app_with(services: &FakeServices) -> Router {
    create_router(AppState::new(services))
}

fn app() -> Router {
    app_with(&FakeServices::default())
}

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        request = request.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

async fn get(uri: &str, token: Option<&str>) -> (StatusCode, Value) {
    send(app(), Method::GET, uri, token, None).await
}

// =============================================================================
// Health & docs
// =============================================================================

#[tokio::test]
async fn test_health_is_degraded_without_database() {
    let (status, body) = get("/api/health", None).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["services"]["database"]["status"], "unhealthy");
    assert_eq!(body["services"]["redis"]["status"], "disabled");
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let (status, body) = get("/api-docs/openapi.json", None).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/api/bills/generate-monthly"].is_object());
}

// =============================================================================
// Authentication
// =============================================================================

#[tokio::test]
async fn test_login_returns_token_and_user() {
    let (status, body) = send(
        app(),
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({"email": "manager@ancheta.com", "password": "password123"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token"], "manager-token");
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["user"]["role"], "manager");
}

#[tokio::test]
async fn test_login_rejects_bad_credentials() {
    let (status, body) = send(
        app(),
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({"email": "manager@ancheta.com", "password": "wrong"})),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn test_login_validates_email() {
    let (status, body) = send(
        app(),
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({"email": "not-an-email", "password": "password123"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(body["error"]["message"], "Invalid email format");
}

#[tokio::test]
async fn test_me_requires_token() {
    let (status, body) = get("/api/auth/me", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");

    let (status, _) = get("/api/auth/me", Some("forged")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_returns_bearer() {
    let (status, body) = get("/api/auth/me", Some("tenant-token")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["email"], "tenant@ancheta.com");
    assert_eq!(body["user"]["role"], "tenant");
}

#[tokio::test]
async fn test_token_for_deleted_account_is_rejected() {
    let (status, _) = get("/api/dashboard", Some("deleted-token")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// =============================================================================
// Role checks
// =============================================================================

#[tokio::test]
async fn test_user_listing_is_staff_only() {
    let (status, body) = get("/api/users", Some("tenant-token")).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "FORBIDDEN");

    let (status, body) = get("/api/users?role=tenant", Some("staff-token")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_tenant_cannot_view_other_users() {
    let uri = format!("/api/users/{}", Uuid::from_u128(MANAGER_ID));
    let (status, _) = get(&uri, Some("tenant-token")).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_user_creation_is_manager_only() {
    let payload = json!({
        "email": "staff2@ancheta.com",
        "password": "password123",
        "name": "Second Staff",
        "role": "staff"
    });

    let (status, _) = send(
        app(),
        Method::POST,
        "/api/users",
        Some("staff-token"),
        Some(payload.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        app(),
        Method::POST,
        "/api/users",
        Some("manager-token"),
        Some(payload),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["email"], "staff2@ancheta.com");
}

#[tokio::test]
async fn test_manager_cannot_delete_self() {
    let services = FakeServices::default();
    let own = format!("/api/users/{}", Uuid::from_u128(MANAGER_ID));
    let (status, _) = send(
        app_with(&services),
        Method::DELETE,
        &own,
        Some("manager-token"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let other = Uuid::from_u128(STAFF_ID);
    let (status, _) = send(
        app_with(&services),
        Method::DELETE,
        &format!("/api/users/{}", other),
        Some("manager-token"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(*services.users.deleted.lock().unwrap(), vec![other]);
}

#[tokio::test]
async fn test_tenant_creation_returns_credentials_once() {
    let (status, body) = send(
        app(),
        Method::POST,
        "/api/tenants",
        Some("staff-token"),
        Some(json!({"name": "Pedro Reyes"})),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["login_email"], "tenant2@ancheta.com");
    assert_eq!(body["login_password"], "password123");
    assert_eq!(body["tenant"]["name"], "Pedro Reyes");
}

#[tokio::test]
async fn test_unit_errors_map_to_status_codes() {
    let (status, body) = send(
        app(),
        Method::POST,
        "/api/units",
        Some("manager-token"),
        Some(json!({"unit_number": "101", "floor": 1, "building": "Building A"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "CONFLICT");

    let (status, _) = send(
        app(),
        Method::POST,
        "/api/units",
        Some("manager-token"),
        Some(json!({"unit_number": "102", "floor": 1, "building": "Building A", "rent_cents": -1})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// =============================================================================
// Bills
// =============================================================================

#[tokio::test]
async fn test_my_unpaid_is_not_captured_by_id_route() {
    let (status, body) = get("/api/bills/my-unpaid", Some("tenant-token")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["amount_cents"], 500_000);

    let (status, body) = get("/api/bills/my-unpaid", Some("staff-token")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_bill_view_is_flattened() {
    let uri = format!("/api/bills/{}", Uuid::from_u128(500));
    let (status, body) = get(&uri, Some("tenant-token")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["bill_type"], "Rent");
    assert_eq!(body["unit_number"], "101");
    assert_eq!(body["status"], "unpaid");
}

#[tokio::test]
async fn test_generate_monthly_accepts_empty_body() {
    let services = FakeServices::default();
    let (status, body) = send(
        app_with(&services),
        Method::POST,
        "/api/bills/generate-monthly",
        Some("manager-token"),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["created"], 2);
    assert_eq!(*services.bills.generated.lock().unwrap(), vec![(None, None)]);
}

#[tokio::test]
async fn test_generate_monthly_validates_month() {
    let (status, body) = send(
        app(),
        Method::POST,
        "/api/bills/generate-monthly",
        Some("staff-token"),
        Some(json!({"year": 2026, "month": 13})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "Month must be between 1 and 12");
}

#[tokio::test]
async fn test_tenant_cannot_generate_bills() {
    let (status, _) = send(
        app(),
        Method::POST,
        "/api/bills/generate-monthly",
        Some("tenant-token"),
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_bill_with_payments_cannot_be_deleted() {
    let uri = format!("/api/bills/{}", Uuid::from_u128(500));
    let (status, _) = send(app(), Method::DELETE, &uri, Some("staff-token"), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(app(), Method::DELETE, &uri, Some("manager-token"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

// =============================================================================
// Payments, maintenance, dashboard
// =============================================================================

#[tokio::test]
async fn test_paymongo_create_is_tenant_only() {
    let payload = json!({"bill_id": Uuid::from_u128(500)});

    let (status, _) = send(
        app(),
        Method::POST,
        "/api/payments/paymongo-create",
        Some("manager-token"),
        Some(payload.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        app(),
        Method::POST,
        "/api/payments/paymongo-create",
        Some("tenant-token"),
        Some(payload),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"]["code"], "SERVICE_UNAVAILABLE");
}

#[tokio::test]
async fn test_manual_payment_requires_staff() {
    let payload = json!({"bill_id": Uuid::from_u128(500), "amount_cents": 500_000});

    let (status, _) = send(
        app(),
        Method::POST,
        "/api/payments",
        Some("tenant-token"),
        Some(payload.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        app(),
        Method::POST,
        "/api/payments",
        Some("staff-token"),
        Some(payload),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_staff_must_name_tenant_for_maintenance() {
    let (status, body) = send(
        app(),
        Method::POST,
        "/api/maintenance",
        Some("staff-token"),
        Some(json!({"title": "Broken light", "description": "Hallway, 2nd floor"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "tenant_id is required");
}

#[tokio::test]
async fn test_dashboard_is_tagged_by_view() {
    let (status, body) = get("/api/dashboard", Some("tenant-token")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["view"], "tenant");
    assert_eq!(body["pending_maintenance"], 1);
}
