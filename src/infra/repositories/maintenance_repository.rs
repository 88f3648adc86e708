//! Maintenance request persistence.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::directory;
use super::entities::maintenance_request;
use crate::domain::{
    MaintenanceFilter, MaintenanceRequest, MaintenanceState, MaintenanceView,
    NewMaintenanceRequest, UpdateMaintenanceRequest,
};
use crate::errors::{AppError, AppResult, OptionExt};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait MaintenanceRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<MaintenanceRequest>>;

    async fn find_view(&self, id: Uuid) -> AppResult<Option<MaintenanceView>>;

    /// Newest first; `tenant_id` limits to one tenant's requests
    async fn list(
        &self,
        tenant_id: Option<Uuid>,
        filter: MaintenanceFilter,
    ) -> AppResult<Vec<MaintenanceView>>;

    async fn create(&self, request: NewMaintenanceRequest) -> AppResult<MaintenanceRequest>;

    async fn update(
        &self,
        id: Uuid,
        changes: UpdateMaintenanceRequest,
    ) -> AppResult<MaintenanceRequest>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;

    async fn count_pending(&self, tenant_id: Option<Uuid>) -> AppResult<u64>;
}

pub struct MaintenanceStore {
    db: Arc<DatabaseConnection>,
}

impl MaintenanceStore {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    async fn views(
        &self,
        requests: Vec<maintenance_request::Model>,
    ) -> AppResult<Vec<MaintenanceView>> {
        let residents =
            directory::residents(&*self.db, requests.iter().map(|r| r.tenant_id)).await?;

        requests
            .into_iter()
            .map(|model| {
                let request = MaintenanceRequest::try_from(model)?;
                let resident = residents.get(&request.tenant_id);
                Ok(MaintenanceView {
                    tenant_name: resident.map(|r| r.name.clone()),
                    unit_number: resident.and_then(|r| r.unit_number.clone()),
                    building: resident.and_then(|r| r.building.clone()),
                    request,
                })
            })
            .collect()
    }
}

#[async_trait]
impl MaintenanceRepository for MaintenanceStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<MaintenanceRequest>> {
        maintenance_request::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .map(MaintenanceRequest::try_from)
            .transpose()
    }

    async fn find_view(&self, id: Uuid) -> AppResult<Option<MaintenanceView>> {
        let Some(model) = maintenance_request::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
        else {
            return Ok(None);
        };

        Ok(self.views(vec![model]).await?.pop())
    }

    async fn list(
        &self,
        tenant_id: Option<Uuid>,
        filter: MaintenanceFilter,
    ) -> AppResult<Vec<MaintenanceView>> {
        let mut query = maintenance_request::Entity::find();

        if let Some(tenant_id) = tenant_id {
            query = query.filter(maintenance_request::Column::TenantId.eq(tenant_id));
        }
        if let Some(status) = filter.status {
            query = query.filter(maintenance_request::Column::Status.eq(status.as_str()));
        }
        if let Some(priority) = filter.priority {
            query = query.filter(maintenance_request::Column::Priority.eq(priority.as_str()));
        }

        let requests = query
            .order_by_desc(maintenance_request::Column::CreatedAt)
            .all(&*self.db)
            .await?;

        self.views(requests).await
    }

    async fn create(&self, request: NewMaintenanceRequest) -> AppResult<MaintenanceRequest> {
        let now = Utc::now();
        let model = maintenance_request::ActiveModel {
            id: Set(Uuid::new_v4()),
            tenant_id: Set(request.tenant_id),
            title: Set(request.title),
            description: Set(request.description),
            priority: Set(request.priority.to_string()),
            status: Set(MaintenanceState::Pending.to_string()),
            staff_notes: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&*self.db)
        .await
        .map_err(|e| AppError::from_db_constraint(e, "Tenant does not exist"))?;

        MaintenanceRequest::try_from(model)
    }

    async fn update(
        &self,
        id: Uuid,
        changes: UpdateMaintenanceRequest,
    ) -> AppResult<MaintenanceRequest> {
        let existing = maintenance_request::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_not_found("Maintenance request")?;

        let mut active = existing.into_active_model();
        if let Some(title) = changes.title {
            active.title = Set(title);
        }
        if let Some(description) = changes.description {
            active.description = Set(description);
        }
        if let Some(priority) = changes.priority {
            active.priority = Set(priority.to_string());
        }
        if let Some(status) = changes.status {
            active.status = Set(status.to_string());
        }
        if let Some(notes) = changes.staff_notes {
            active.staff_notes = Set(Some(notes).filter(|n| !n.trim().is_empty()));
        }
        active.updated_at = Set(Utc::now());

        MaintenanceRequest::try_from(active.update(&*self.db).await?)
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = maintenance_request::Entity::delete_by_id(id)
            .exec(&*self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::not_found("Maintenance request"));
        }
        Ok(())
    }

    async fn count_pending(&self, tenant_id: Option<Uuid>) -> AppResult<u64> {
        let mut query = maintenance_request::Entity::find()
            .filter(maintenance_request::Column::Status.eq(MaintenanceState::Pending.as_str()));
        if let Some(tenant_id) = tenant_id {
            query = query.filter(maintenance_request::Column::TenantId.eq(tenant_id));
        }
        Ok(query.count(&*self.db).await?)
    }
}
