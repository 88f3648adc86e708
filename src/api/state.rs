//! Application state - Dependency injection container.
//!
//! Handlers reach services through trait objects, so tests can build the
//! router over fakes without a database or Redis.

use std::sync::Arc;
use uuid::Uuid;

use crate::config::Config;
use crate::domain::UserResponse;
use crate::errors::AppResult;
use crate::infra::{Cache, Database};
use crate::services::{
    AuthService, BillService, DashboardService, MaintenanceService, PaymentService,
    ServiceContainer, Services, TenantService, UnitService, UserService,
};

#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthService>,
    pub user_service: Arc<dyn UserService>,
    pub unit_service: Arc<dyn UnitService>,
    pub tenant_service: Arc<dyn TenantService>,
    pub bill_service: Arc<dyn BillService>,
    pub payment_service: Arc<dyn PaymentService>,
    pub maintenance_service: Arc<dyn MaintenanceService>,
    pub dashboard_service: Arc<dyn DashboardService>,
    /// Redis; without it there is no user cache and no rate limiting
    pub cache: Option<Arc<Cache>>,
    /// Only used by the health check
    pub database: Option<Arc<Database>>,
}

impl AppState {
    /// Production wiring over a live database and, when configured, Redis.
    pub fn from_config(
        database: Arc<Database>,
        cache: Option<Arc<Cache>>,
        config: Config,
    ) -> AppResult<Self> {
        let services = Services::from_connection(database.get_connection(), config)?;

        Ok(Self {
            cache,
            ..Self::new(&services).with_database(database)
        })
    }

    /// State over any service container, with no infrastructure attached.
    pub fn new(services: &dyn ServiceContainer) -> Self {
        Self {
            auth_service: services.auth(),
            user_service: services.users(),
            unit_service: services.units(),
            tenant_service: services.tenants(),
            bill_service: services.bills(),
            payment_service: services.payments(),
            maintenance_service: services.maintenance(),
            dashboard_service: services.dashboard(),
            cache: None,
            database: None,
        }
    }

    pub fn with_database(mut self, database: Arc<Database>) -> Self {
        self.database = Some(database);
        self
    }

    /// Cached account for `id`; cache failures count as a miss.
    pub async fn cached_user(&self, id: Uuid) -> Option<UserResponse> {
        let cache = self.cache.as_ref()?;
        match cache.get_user(&id).await {
            Ok(user) => user,
            Err(e) => {
                tracing::warn!(error = %e, user_id = %id, "User cache read failed");
                None
            }
        }
    }

    pub async fn remember_user(&self, user: &UserResponse) {
        if let Some(cache) = &self.cache {
            if let Err(e) = cache.set_user(user).await {
                tracing::warn!(error = %e, user_id = %user.id, "User cache write failed");
            }
        }
    }

    /// Drop a cached account after it changed.
    pub async fn forget_user(&self, id: Uuid) {
        if let Some(cache) = &self.cache {
            if let Err(e) = cache.invalidate_user(&id).await {
                tracing::warn!(error = %e, user_id = %id, "User cache invalidation failed");
            }
        }
    }
}
