//! Unit service - the building inventory.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{CreateUnit, Unit, UnitFilter, UnitResponse, UpdateUnit};
use crate::errors::{AppResult, OptionExt};
use crate::infra::UnitOfWork;

#[async_trait]
pub trait UnitService: Send + Sync {
    async fn list_units(&self, filter: UnitFilter) -> AppResult<Vec<UnitResponse>>;

    async fn get_unit(&self, id: Uuid) -> AppResult<UnitResponse>;

    async fn create_unit(&self, request: CreateUnit) -> AppResult<Unit>;

    /// Occupancy status is never edited here; it follows tenant assignment
    async fn update_unit(&self, id: Uuid, changes: UpdateUnit) -> AppResult<Unit>;

    async fn delete_unit(&self, id: Uuid) -> AppResult<()>;
}

pub struct UnitManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> UnitManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> UnitService for UnitManager<U> {
    async fn list_units(&self, filter: UnitFilter) -> AppResult<Vec<UnitResponse>> {
        self.uow.units().list(filter).await
    }

    async fn get_unit(&self, id: Uuid) -> AppResult<UnitResponse> {
        self.uow
            .units()
            .find_with_tenant(id)
            .await?
            .ok_or_not_found("Unit")
    }

    async fn create_unit(&self, request: CreateUnit) -> AppResult<Unit> {
        let unit = self.uow.units().create(request).await?;
        tracing::info!(unit_id = %unit.id, unit_number = %unit.unit_number, building = %unit.building, "Unit created");
        Ok(unit)
    }

    async fn update_unit(&self, id: Uuid, changes: UpdateUnit) -> AppResult<Unit> {
        self.uow.units().update(id, changes).await
    }

    async fn delete_unit(&self, id: Uuid) -> AppResult<()> {
        self.uow.units().delete(id).await?;
        tracing::info!(unit_id = %id, "Unit deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;
    use crate::infra::MockUnitRepository;
    use crate::services::testing::TestUnitOfWork;

    #[tokio::test]
    async fn test_get_unit_not_found() {
        let mut units = MockUnitRepository::new();
        units.expect_find_with_tenant().returning(|_| Ok(None));

        let service = UnitManager::new(TestUnitOfWork::new().with_units(units).into_arc());
        let err = service.get_unit(Uuid::new_v4()).await.unwrap_err();

        assert!(matches!(err, AppError::NotFound(ref entity) if entity == "Unit"));
    }

    #[tokio::test]
    async fn test_delete_occupied_unit_is_refused() {
        let mut units = MockUnitRepository::new();
        units.expect_delete().returning(|_| {
            Err(AppError::BadRequest(
                "Cannot delete a unit with assigned tenants".into(),
            ))
        });

        let service = UnitManager::new(TestUnitOfWork::new().with_units(units).into_arc());
        let err = service.delete_unit(Uuid::new_v4()).await.unwrap_err();

        assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);
    }
}
