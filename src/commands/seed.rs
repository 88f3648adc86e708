//! Seed command - Demo data for a fresh database.
//!
//! Goes through the services so the demo rows obey the same rules as
//! anything created over HTTP. Does nothing once any account exists.

use crate::config::{Config, SEED_ACCOUNT_PASSWORD};
use crate::domain::{
    Actor, BillingPeriod, CreateMaintenanceRequest, CreateTenant, CreateUnit, CreateUser,
    GenerateMonthlyBills, MaintenanceStatus, Priority, UserFilter, UserRole,
};
use crate::errors::AppResult;
use crate::infra::Database;
use crate::services::Services;

/// (unit number, floor, type, monthly rent in centavos)
const DEMO_UNITS: &[(&str, i32, &str, i64)] = &[
    ("101", 1, "Studio", 500_000),
    ("102", 1, "1BR", 700_000),
    ("201", 2, "2BR", 1_000_000),
    ("202", 2, "2BR", 1_000_000),
    ("301", 3, "3BR", 1_500_000),
];

const DEMO_BUILDING: &str = "Building A";

pub async fn execute(config: Config) -> AppResult<()> {
    let db = Database::connect(&config).await?;
    let services = Services::from_connection(db.get_connection(), config)?;

    if !services.users.list_users(UserFilter::default()).await?.is_empty() {
        tracing::warn!("Database already has accounts, skipping seed");
        return Ok(());
    }

    let mut unit_ids = Vec::with_capacity(DEMO_UNITS.len());
    for &(number, floor, unit_type, rent_cents) in DEMO_UNITS {
        let unit = services
            .units
            .create_unit(CreateUnit {
                unit_number: number.to_string(),
                floor,
                building: DEMO_BUILDING.to_string(),
                unit_type: Some(unit_type.to_string()),
                rent_cents,
                maintenance_status: Some(MaintenanceStatus::None),
            })
            .await?;
        unit_ids.push(unit.id);
    }
    tracing::info!(count = unit_ids.len(), "Demo units created");

    let manager = services
        .users
        .create_user(CreateUser {
            email: "manager@ancheta.com".into(),
            password: SEED_ACCOUNT_PASSWORD.into(),
            name: "John Manager".into(),
            role: UserRole::Manager,
            phone: Some("09123456789".into()),
        })
        .await?;

    services
        .users
        .create_user(CreateUser {
            email: "staff@ancheta.com".into(),
            password: SEED_ACCOUNT_PASSWORD.into(),
            name: "Jane Staff".into(),
            role: UserRole::Staff,
            phone: Some("09123456790".into()),
        })
        .await?;

    let tenant = services
        .tenants
        .create_tenant(CreateTenant {
            name: "Maria Tenant".into(),
            phone: Some("09123456791".into()),
        })
        .await?;

    if let Some(&first_unit) = unit_ids.first() {
        services.tenants.assign_unit(tenant.tenant.id, first_unit).await?;
    }

    // Next month's rent, so the demo tenant has something to pay
    let next = BillingPeriod::current().next();
    let summary = services
        .bills
        .generate_monthly(GenerateMonthlyBills {
            year: Some(next.year()),
            month: Some(next.month()),
        })
        .await?;

    services
        .maintenance
        .create_request(
            Actor {
                id: manager.id,
                role: manager.role,
            },
            CreateMaintenanceRequest {
                title: "Leaky faucet".into(),
                description: "The kitchen faucet is leaking".into(),
                priority: Some(Priority::Medium),
                tenant_id: Some(tenant.tenant.id),
            },
        )
        .await?;

    tracing::info!(rent_bills = summary.created, "Seed data created");

    println!("\nDemo accounts:");
    println!("  Manager: manager@ancheta.com / {}", SEED_ACCOUNT_PASSWORD);
    println!("  Staff:   staff@ancheta.com / {}", SEED_ACCOUNT_PASSWORD);
    println!("  Tenant:  {} / {}", tenant.login_email, tenant.login_password);

    Ok(())
}
