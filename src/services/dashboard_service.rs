//! Dashboard service - aggregate figures for the landing page.

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::DASHBOARD_RECENT_BILLS;
use crate::domain::{Actor, Dashboard, StaffDashboard, TenantDashboard, UnitStatus, UserRole};
use crate::errors::AppResult;
use crate::infra::UnitOfWork;

use super::container::parallel;

#[async_trait]
pub trait DashboardService: Send + Sync {
    /// Building-wide figures for staff, personal figures for tenants
    async fn dashboard(&self, actor: Actor) -> AppResult<Dashboard>;
}

pub struct DashboardManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> DashboardManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn staff_view(&self) -> AppResult<StaffDashboard> {
        let units = self.uow.units();
        let users = self.uow.users();
        let bills = self.uow.bills();
        let payments = self.uow.payments();
        let maintenance = self.uow.maintenance();

        let (occupancy, activity) = parallel::join2(
            parallel::join4(
                units.count(None),
                units.count(Some(UnitStatus::Occupied)),
                units.count(Some(UnitStatus::Available)),
                users.count_by_role(UserRole::Tenant),
            ),
            parallel::join4(
                bills.stats(None),
                payments.completed_stats(None),
                maintenance.count_pending(None),
                bills.recent(None, DASHBOARD_RECENT_BILLS),
            ),
        )
        .await?;

        let (total_units, occupied_units, available_units, total_tenants) = occupancy;
        let (bill_stats, completed_payments, pending_maintenance, recent_bills) = activity;

        Ok(StaffDashboard {
            total_units,
            occupied_units,
            available_units,
            total_tenants,
            total_bills: bill_stats.total,
            unpaid_bills: bill_stats.outstanding,
            completed_payments,
            pending_maintenance,
            recent_bills,
        })
    }

    async fn tenant_view(&self, actor: Actor) -> AppResult<TenantDashboard> {
        let tenant = Some(actor.id);
        let bills = self.uow.bills();
        let payments = self.uow.payments();
        let maintenance = self.uow.maintenance();

        let (bill_stats, completed_payments, pending_maintenance, recent_bills) = parallel::join4(
            bills.stats(tenant),
            payments.completed_stats(tenant),
            maintenance.count_pending(tenant),
            bills.recent(tenant, DASHBOARD_RECENT_BILLS),
        )
        .await?;

        Ok(TenantDashboard {
            unpaid_bills: bill_stats.outstanding,
            completed_payments,
            pending_maintenance,
            recent_bills,
        })
    }
}

#[async_trait]
impl<U: UnitOfWork> DashboardService for DashboardManager<U> {
    async fn dashboard(&self, actor: Actor) -> AppResult<Dashboard> {
        if actor.is_tenant() {
            Ok(Dashboard::Tenant(self.tenant_view(actor).await?))
        } else {
            Ok(Dashboard::Staff(self.staff_view().await?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AmountStat;
    use crate::infra::{
        BillStats, MockBillRepository, MockMaintenanceRepository, MockPaymentRepository,
        MockUnitRepository, MockUserRepository,
    };
    use crate::services::testing::{self, TestUnitOfWork};
    use mockall::predicate::eq;

    fn bill_stats() -> BillStats {
        BillStats {
            total: 12,
            outstanding: AmountStat {
                count: 3,
                total_cents: 2_500_000,
            },
        }
    }

    fn scoped_mocks(
        tenant: Option<uuid::Uuid>,
    ) -> (MockBillRepository, MockPaymentRepository, MockMaintenanceRepository) {
        let mut bills = MockBillRepository::new();
        bills.expect_stats().with(eq(tenant)).returning(|_| Ok(bill_stats()));
        bills
            .expect_recent()
            .with(eq(tenant), eq(DASHBOARD_RECENT_BILLS))
            .returning(|_, _| Ok(vec![]));

        let mut payments = MockPaymentRepository::new();
        payments.expect_completed_stats().with(eq(tenant)).returning(|_| {
            Ok(AmountStat {
                count: 9,
                total_cents: 9_000_000,
            })
        });

        let mut maintenance = MockMaintenanceRepository::new();
        maintenance
            .expect_count_pending()
            .with(eq(tenant))
            .returning(|_| Ok(2));

        (bills, payments, maintenance)
    }

    #[tokio::test]
    async fn test_staff_dashboard() {
        let (bills, payments, maintenance) = scoped_mocks(None);

        let mut units = MockUnitRepository::new();
        units.expect_count().returning(|status| {
            Ok(match status {
                None => 10,
                Some(UnitStatus::Occupied) => 7,
                Some(UnitStatus::Available) => 3,
            })
        });

        let mut users = MockUserRepository::new();
        users
            .expect_count_by_role()
            .with(eq(UserRole::Tenant))
            .returning(|_| Ok(7));

        let service = DashboardManager::new(
            TestUnitOfWork::new()
                .with_units(units)
                .with_users(users)
                .with_bills(bills)
                .with_payments(payments)
                .with_maintenance(maintenance)
                .into_arc(),
        );

        let Dashboard::Staff(view) = service
            .dashboard(testing::actor(UserRole::Manager))
            .await
            .unwrap()
        else {
            panic!("expected the staff dashboard");
        };

        assert_eq!(view.total_units, 10);
        assert_eq!(view.occupied_units, 7);
        assert_eq!(view.available_units, 3);
        assert_eq!(view.total_tenants, 7);
        assert_eq!(view.total_bills, 12);
        assert_eq!(view.unpaid_bills.total_cents, 2_500_000);
        assert_eq!(view.completed_payments.count, 9);
        assert_eq!(view.pending_maintenance, 2);
    }

    #[tokio::test]
    async fn test_tenant_dashboard_is_scoped() {
        let tenant = testing::actor(UserRole::Tenant);
        let (bills, payments, maintenance) = scoped_mocks(Some(tenant.id));

        let service = DashboardManager::new(
            TestUnitOfWork::new()
                .with_bills(bills)
                .with_payments(payments)
                .with_maintenance(maintenance)
                .into_arc(),
        );

        let Dashboard::Tenant(view) = service.dashboard(tenant).await.unwrap() else {
            panic!("expected the tenant dashboard");
        };

        assert_eq!(view.unpaid_bills.count, 3);
        assert_eq!(view.pending_maintenance, 2);
    }
}
