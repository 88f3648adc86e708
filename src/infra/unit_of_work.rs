//! Unit of Work: one place services get their repositories from.
//!
//! Multi-row writes that must be atomic (unit assignment, settling a bill)
//! open their own transaction inside the repository method.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use super::repositories::{
    BillRepository, BillStore, MaintenanceRepository, MaintenanceStore, PaymentRepository,
    PaymentStore, UnitRepository, UnitStore, UserRepository, UserStore,
};

/// Repository access for services.
pub trait UnitOfWork: Send + Sync {
    fn users(&self) -> Arc<dyn UserRepository>;

    fn units(&self) -> Arc<dyn UnitRepository>;

    fn bills(&self) -> Arc<dyn BillRepository>;

    fn payments(&self) -> Arc<dyn PaymentRepository>;

    fn maintenance(&self) -> Arc<dyn MaintenanceRepository>;
}

/// Database-backed Unit of Work.
pub struct Persistence {
    users: Arc<UserStore>,
    units: Arc<UnitStore>,
    bills: Arc<BillStore>,
    payments: Arc<PaymentStore>,
    maintenance: Arc<MaintenanceStore>,
}

impl Persistence {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            users: Arc::new(UserStore::new(db.clone())),
            units: Arc::new(UnitStore::new(db.clone())),
            bills: Arc::new(BillStore::new(db.clone())),
            payments: Arc::new(PaymentStore::new(db.clone())),
            maintenance: Arc::new(MaintenanceStore::new(db)),
        }
    }
}

impl UnitOfWork for Persistence {
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
