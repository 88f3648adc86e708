//! Service Container - Centralized service access with parallel execution support.
//!
//! Handlers depend on the service traits, never on the concrete managers.

use std::future::Future;
use std::sync::Arc;

use super::{
    AuthService, BillService, DashboardService, MaintenanceService, PaymentService,
    TenantService, UnitService, UserService,
};
use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::{PayMongoClient, PaymentGateway, Persistence};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Service container trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    fn auth(&self) -> Arc<dyn AuthService>;

    fn users(&self) -> Arc<dyn UserService>;

    fn units(&self) -> Arc<dyn UnitService>;

    fn tenants(&self) -> Arc<dyn TenantService>;

    fn bills(&self) -> Arc<dyn BillService>;

    fn payments(&self) -> Arc<dyn PaymentService>;

    fn maintenance(&self) -> Arc<dyn MaintenanceService>;

    fn dashboard(&self) -> Arc<dyn DashboardService>;
}

/// Concrete implementation of ServiceContainer
#[derive(Clone)]
pub struct Services {
    pub auth: Arc<dyn AuthService>,
    pub users: Arc<dyn UserService>,
    pub units: Arc<dyn UnitService>,
    pub tenants: Arc<dyn TenantService>,
    pub bills: Arc<dyn BillService>,
    pub payments: Arc<dyn PaymentService>,
    pub maintenance: Arc<dyn MaintenanceService>,
    pub dashboard: Arc<dyn DashboardService>,
}

impl Services {
    /// Wire every service over one database connection.
    ///
    /// The PayMongo client is only built when a secret key is configured.
    pub fn from_connection(
        db: Arc<sea_orm::DatabaseConnection>,
        config: Config,
    ) -> AppResult<Self> {
        use super::{
            Authenticator, BillManager, DashboardManager, MaintenanceManager, PaymentManager,
            TenantManager, UnitManager, UserManager,
        };

        let gateway = PayMongoClient::from_config(&config)?
            .map(|client| Arc::new(client) as Arc<dyn PaymentGateway>);
        if gateway.is_none() {
            tracing::warn!("PAYMONGO_SECRET_KEY not set, online payments are disabled");
        }

        let uow = Arc::new(Persistence::new(db));

        Ok(Self {
            tenants: Arc::new(TenantManager::new(uow.clone(), &config)),
            auth: Arc::new(Authenticator::new(uow.clone(), config)),
            users: Arc::new(UserManager::new(uow.clone())),
            units: Arc::new(UnitManager::new(uow.clone())),
            bills: Arc::new(BillManager::new(uow.clone())),
            payments: Arc::new(PaymentManager::new(uow.clone(), gateway)),
            maintenance: Arc::new(MaintenanceManager::new(uow.clone())),
            dashboard: Arc::new(DashboardManager::new(uow)),
        })
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth.clone()
    }

    fn users(&self) -> Arc<dyn UserService> {
        self.users.clone()
    }

    fn units(&self) -> Arc<dyn UnitService> {
        self.units.clone()
    }

    fn tenants(&self) -> Arc<dyn TenantService> {
        self.tenants.clone()
    }

    fn bills(&self) -> Arc<dyn BillService> {
        self.bills.clone()
    }

    fn payments(&self) -> Arc<dyn PaymentService> {
        self.payments.clone()
    }

    fn maintenance(&self) -> Arc<dyn MaintenanceService> {
        self.maintenance.clone()
    }

    fn dashboard(&self) -> Arc<dyn DashboardService> {
        self.dashboard.clone()
    }
}

/// Run independent async operations concurrently on the current task.
///
/// The first error wins and the remaining operations are dropped.
pub mod parallel {
    use super::*;
    use tokio::try_join;

    /// Execute two independent async operations in parallel.
    pub async fn join2<F1, F2, T1, T2>(f1: F1, f2: F2) -> AppResult<(T1, T2)>
    where
        F1: Future<Output = AppResult<T1>>,
        F2: Future<Output = AppResult<T2>>,
    {
        try_join!(f1, f2)
    }

    /// Execute four independent async operations in parallel.
    pub async fn join4<F1, F2, F3, F4, T1, T2, T3, T4>(
        f1: F1,
        f2: F2,
        f3: F3,
        f4: F4,
    ) -> AppResult<(T1, T2, T3, T4)>
    where
        F1: Future<Output = AppResult<T1>>,
        F2: Future<Output = AppResult<T2>>,
        F3: Future<Output = AppResult<T3>>,
        F4: Future<Output = AppResult<T4>>,
    {
        try_join!(f1, f2, f3, f4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;

    #[tokio::test]
    async fn test_parallel_join2() {
        async fn op1() -> AppResult<i32> {
            Ok(1)
        }
        async fn op2() -> AppResult<&'static str> {
            Ok("two")
        }

        let (a, b) = parallel::join2(op1(), op2()).await.unwrap();
        assert_eq!(a, 1);
        assert_eq!(b, "two");
    }

    #[tokio::test]
    async fn test_parallel_join4_propagates_error() {
        let result = parallel::join4(
            async { Ok::<_, AppError>(1u64) },
            async { Err::<u64, _>(AppError::not_found("Unit")) },
            async { Ok::<_, AppError>(3u64) },
            async { Ok::<_, AppError>(4u64) },
        )
        .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
