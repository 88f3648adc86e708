//! Maintenance service - repair requests filed by or for tenants.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{
    Actor, CreateMaintenanceRequest, MaintenanceFilter, MaintenanceRequest, MaintenanceView,
    NewMaintenanceRequest, UpdateMaintenanceRequest,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

#[async_trait]
pub trait MaintenanceService: Send + Sync {
    async fn list_requests(
        &self,
        actor: Actor,
        filter: MaintenanceFilter,
    ) -> AppResult<Vec<MaintenanceView>>;

    async fn get_request(&self, actor: Actor, id: Uuid) -> AppResult<MaintenanceView>;

    /// Tenants file for themselves; staff must name the tenant
    async fn create_request(
        &self,
        actor: Actor,
        request: CreateMaintenanceRequest,
    ) -> AppResult<MaintenanceRequest>;

    /// Tenants may only reword their own requests
    async fn update_request(
        &self,
        actor: Actor,
        id: Uuid,
        changes: UpdateMaintenanceRequest,
    ) -> AppResult<MaintenanceRequest>;

    async fn delete_request(&self, id: Uuid) -> AppResult<()>;
}

pub struct MaintenanceManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> MaintenanceManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn tenant_for(&self, actor: Actor, requested: Option<Uuid>) -> AppResult<Uuid> {
        if actor.is_tenant() {
            return Ok(actor.id);
        }

        let tenant_id = requested
            .ok_or_else(|| AppError::validation("tenant_id is required"))?;
        self.uow
            .users()
            .find_by_id(tenant_id)
            .await?
            .filter(|user| user.is_tenant())
            .map(|user| user.id)
            .ok_or_not_found("Tenant")
    }
}

#[async_trait]
impl<U: UnitOfWork> MaintenanceService for MaintenanceManager<U> {
    async fn list_requests(
        &self,
        actor: Actor,
        filter: MaintenanceFilter,
    ) -> AppResult<Vec<MaintenanceView>> {
        self.uow
            .maintenance()
            .list(actor.scope(None), filter)
            .await
    }

    async fn get_request(&self, actor: Actor, id: Uuid) -> AppResult<MaintenanceView> {
        let view = self
            .uow
            .maintenance()
            .find_view(id)
            .await?
            .ok_or_not_found("Maintenance request")?;

        if !actor.can_view(view.request.tenant_id) {
            return Err(AppError::Forbidden);
        }
        Ok(view)
    }

    async fn create_request(
        &self,
        actor: Actor,
        request: CreateMaintenanceRequest,
    ) -> AppResult<MaintenanceRequest> {
        let tenant_id = self.tenant_for(actor, request.tenant_id).await?;

        let created = self
            .uow
            .maintenance()
            .create(NewMaintenanceRequest {
                tenant_id,
                title: request.title.trim().to_string(),
                description: request.description,
                priority: request.priority.unwrap_or_default(),
            })
            .await?;

        tracing::info!(request_id = %created.id, tenant_id = %tenant_id, priority = %created.priority, "Maintenance request filed");
        Ok(created)
    }

    async fn update_request(
        &self,
        actor: Actor,
        id: Uuid,
        changes: UpdateMaintenanceRequest,
    ) -> AppResult<MaintenanceRequest> {
        if actor.is_tenant() {
            let existing = self
                .uow
                .maintenance()
                .find_by_id(id)
                .await?
                .ok_or_not_found("Maintenance request")?;

            if existing.tenant_id != actor.id || changes.has_staff_fields() {
                return Err(AppError::Forbidden);
            }
        }

        let updated = self.uow.maintenance().update(id, changes).await?;
        tracing::debug!(request_id = %id, status = %updated.status, "Maintenance request updated");
        Ok(updated)
    }

    async fn delete_request(&self, id: Uuid) -> AppResult<()> {
        self.uow.maintenance().delete(id).await
    }
}
