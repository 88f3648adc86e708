//! OpenAPI documentation served through Swagger UI.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{
    auth_handler, bill_handler, dashboard_handler, maintenance_handler, payment_handler,
    tenant_handler, unit_handler, user_handler,
};
use crate::domain::{
    AmountStat, AssignUnit, Bill, BillStatus, BillView, CreateBill, CreateMaintenanceRequest,
    CreatePaymentLink, CreateTenant, CreateUnit, CreateUser, Dashboard, GenerateMonthlyBills,
    GenerationSummary, MaintenanceRequest, MaintenanceState, MaintenanceStatus, MaintenanceView,
    Payment, PaymentLinkCreated, PaymentMethod, PaymentStatus, PaymentVerification, PaymentView,
    Priority, RecordPayment, StaffDashboard, TenantCreated, TenantDashboard, TenantSummary, Unit,
    UnitOccupant, UnitResponse, UnitStatus, UpdateBill, UpdateMaintenanceRequest, UpdateProfile,
    UpdateUnit, UserResponse, UserRole,
};
use crate::services::TokenResponse;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Apartment Management API",
        version = "0.1.0",
        description = "Units, tenants, rent billing, PayMongo payments and maintenance requests. Amounts are in centavos."
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        auth_handler::login,
        auth_handler::me,
        user_handler::list_users,
        user_handler::create_user,
        user_handler::get_user,
        user_handler::update_user,
        user_handler::delete_user,
        unit_handler::list_units,
        unit_handler::get_unit,
        unit_handler::create_unit,
        unit_handler::update_unit,
        unit_handler::delete_unit,
        tenant_handler::create_tenant,
        tenant_handler::list_tenants,
        tenant_handler::assign_unit,
        tenant_handler::remove_unit,
        bill_handler::list_bills,
        bill_handler::my_unpaid,
        bill_handler::get_bill,
        bill_handler::create_bill,
        bill_handler::generate_monthly,
        bill_handler::update_bill,
        bill_handler::delete_bill,
        payment_handler::list_payments,
        payment_handler::record_payment,
        payment_handler::create_payment_link,
        payment_handler::verify_payment,
        maintenance_handler::list_requests,
        maintenance_handler::get_request,
        maintenance_handler::create_request,
        maintenance_handler::update_request,
        maintenance_handler::delete_request,
        dashboard_handler::dashboard,
        dashboard_handler::health,
    ),
    components(
        schemas(
            UserRole,
            UserResponse,
            CreateUser,
            UpdateProfile,
            auth_handler::LoginRequest,
            auth_handler::MeResponse,
            TokenResponse,
            UnitStatus,
            MaintenanceStatus,
            Unit,
            UnitOccupant,
            UnitResponse,
            CreateUnit,
            UpdateUnit,
            CreateTenant,
            TenantCreated,
            TenantSummary,
            AssignUnit,
            BillStatus,
            Bill,
            BillView,
            CreateBill,
            UpdateBill,
            GenerateMonthlyBills,
            GenerationSummary,
            PaymentStatus,
            PaymentMethod,
            Payment,
            PaymentView,
            RecordPayment,
            CreatePaymentLink,
            PaymentLinkCreated,
            PaymentVerification,
            Priority,
            MaintenanceState,
            MaintenanceRequest,
            MaintenanceView,
            CreateMaintenanceRequest,
            UpdateMaintenanceRequest,
            AmountStat,
            StaffDashboard,
            TenantDashboard,
            Dashboard,
            dashboard_handler::HealthResponse,
            dashboard_handler::ServiceHealth,
            dashboard_handler::ServiceStatus,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Login and the current account"),
        (name = "Users", description = "Manager and staff accounts"),
        (name = "Units", description = "Apartment units"),
        (name = "Tenants", description = "Tenant onboarding and unit assignment"),
        (name = "Bills", description = "Rent and one-off bills"),
        (name = "Payments", description = "Manual and PayMongo payments"),
        (name = "Maintenance", description = "Maintenance requests"),
        (name = "Dashboard", description = "Summary figures"),
        (name = "Health", description = "Dependency checks")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT token obtained from /api/auth/login"))
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/auth/login",
            "/api/bills/generate-monthly",
            "/api/payments/{id}/verify",
            "/api/tenants/{id}/assign-unit",
            "/api/health",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}
