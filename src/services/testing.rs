//! Mock-backed Unit of Work and fixtures for service tests.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::domain::{
    Actor, Bill, BillStatus, MaintenanceStatus, Payment, PaymentMethod, PaymentStatus, Unit,
    UnitStatus, User, UserRole,
};
use crate::infra::{
    BillRepository, MaintenanceRepository, MockBillRepository, MockMaintenanceRepository,
    MockPaymentRepository, MockUnitRepository, MockUserRepository, PaymentRepository,
    UnitOfWork, UnitRepository, UserRepository,
};

/// Unit of Work over mockall repositories. Unset repositories are fresh
/// mocks, so any unexpected call fails the test.
#[derive(Default)]
pub(crate) struct TestUnitOfWork {
    users: Arc<MockUserRepository>,
    units: Arc<MockUnitRepository>,
    bills: Arc<MockBillRepository>,
    payments: Arc<MockPaymentRepository>,
    maintenance: Arc<MockMaintenanceRepository>,
}

impl TestUnitOfWork {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(mut self, repo: MockUserRepository) -> Self {
        self.users = Arc::new(repo);
        self
    }

    pub fn with_units(mut self, repo: MockUnitRepository) -> Self {
        self.units = Arc::new(repo);
        self
    }

    pub fn with_bills(mut self, repo: MockBillRepository) -> Self {
        self.bills = Arc::new(repo);
        self
    }

    pub fn with_payments(mut self, repo: MockPaymentRepository) -> Self {
        self.payments = Arc::new(repo);
        self
    }

    pub fn with_maintenance(mut self, repo: MockMaintenanceRepository) -> Self {
        self.maintenance = Arc::new(repo);
        self
    }

    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }
}

impl UnitOfWork for TestUnitOfWork {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    fn units(&self) -> Arc<dyn UnitRepository> {
        self.units.clone()
    }

    fn bills(&self) -> Arc<dyn BillRepository> {
        self.bills.clone()
    }

    fn payments(&self) -> Arc<dyn PaymentRepository> {
        self.payments.clone()
    }

    fn maintenance(&self) -> Arc<dyn MaintenanceRepository> {
        self.maintenance.clone()
    }
}

pub(crate) fn user(role: UserRole) -> User {
    let now = Utc::now();
    User {
        id: Uuid::new_v4(),
        email: format!("{}@ancheta.com", role),
        password_hash: "hashed".to_string(),
        name: format!("Test {}", role),
        role,
        phone: None,
        unit_id: None,
        created_at: now,
        updated_at: now,
    }
}

pub(crate) fn actor(role: UserRole) -> Actor {
    user(role).actor()
}

pub(crate) fn unit(rent_cents: i64) -> Unit {
    let now = Utc::now();
    Unit {
        id: Uuid::new_v4(),
        unit_number: "101".to_string(),
        floor: 1,
        building: "Building A".to_string(),
        unit_type: Some("Studio".to_string()),
        rent_cents,
        status: UnitStatus::Available,
        maintenance_status: MaintenanceStatus::None,
        created_at: now,
        updated_at: now,
    }
}

pub(crate) fn bill(tenant_id: Uuid, status: BillStatus, amount_cents: i64) -> Bill {
    let now = Utc::now();
    Bill {
        id: Uuid::new_v4(),
        tenant_id,
        bill_type: "Rent".to_string(),
        amount_cents,
        description: None,
        due_date: NaiveDate::from_ymd_opt(2026, 10, 31).unwrap(),
        status,
        period: None,
        created_at: now,
        updated_at: now,
    }
}

pub(crate) fn payment(bill_id: Uuid, status: PaymentStatus) -> Payment {
    let now = Utc::now();
    Payment {
        id: Uuid::new_v4(),
        bill_id,
        amount_cents: 1_000_000,
        method: PaymentMethod::PayMongo,
        transaction_id: "PAYMONGO-LINK-link_1".to_string(),
        paymongo_link_id: Some("link_1".to_string()),
        checkout_url: Some("https://pm.link/1".to_string()),
        status,
        created_at: now,
        updated_at: now,
    }
}
