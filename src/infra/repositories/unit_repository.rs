//! Unit persistence.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use super::entities::{unit, user};
use crate::domain::{
    CreateUnit, MaintenanceStatus, Unit, UnitFilter, UnitOccupant, UnitResponse, UnitStatus,
    UpdateUnit,
};
use crate::errors::{AppError, AppResult, OptionExt};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UnitRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Unit>>;

    /// Unit with its occupant
    async fn find_with_tenant(&self, id: Uuid) -> AppResult<Option<UnitResponse>>;

    /// Ordered by building, floor, unit number
    async fn list(&self, filter: UnitFilter) -> AppResult<Vec<UnitResponse>>;

    /// Duplicate (unit number, building) is a conflict
    async fn create(&self, unit: CreateUnit) -> AppResult<Unit>;

    async fn update(&self, id: Uuid, changes: UpdateUnit) -> AppResult<Unit>;

    /// Refuses while a tenant is assigned
    async fn delete(&self, id: Uuid) -> AppResult<()>;

    /// Units with `status`, or all units
    async fn count(&self, status: Option<UnitStatus>) -> AppResult<u64>;
}

pub struct UnitStore {
    db: Arc<DatabaseConnection>,
}

impl UnitStore {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    async fn occupants(&self, unit_ids: Vec<Uuid>) -> AppResult<HashMap<Uuid, UnitOccupant>> {
        if unit_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let tenants = user::Entity::find()
            .filter(user::Column::UnitId.is_in(unit_ids))
            .all(&*self.db)
            .await?;

        Ok(tenants
            .into_iter()
            .filter_map(|tenant| {
                let unit_id = tenant.unit_id?;
                Some((
                    unit_id,
                    UnitOccupant {
                        id: tenant.id,
                        name: tenant.name,
                        email: tenant.email,
                        phone: tenant.phone,
                    },
                ))
            })
            .collect())
    }
}

fn duplicate_unit(err: sea_orm::DbErr) -> AppError {
    AppError::from_db_constraint(err, "A unit with this number already exists in the building")
}

#[async_trait]
impl UnitRepository for UnitStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Unit>> {
        unit::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .map(Unit::try_from)
            .transpose()
    }

    async fn find_with_tenant(&self, id: Uuid) -> AppResult<Option<UnitResponse>> {
        let Some(unit) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        let mut occupants = self.occupants(vec![unit.id]).await?;
        Ok(Some(UnitResponse {
            tenant: occupants.remove(&unit.id),
            unit,
        }))
    }

    async fn list(&self, filter: UnitFilter) -> AppResult<Vec<UnitResponse>> {
        let mut query = unit::Entity::find();

        if let Some(building) = filter.building.filter(|b| !b.trim().is_empty()) {
            query = query.filter(unit::Column::Building.eq(building));
        }
        if let Some(floor) = filter.floor {
            query = query.filter(unit::Column::Floor.eq(floor));
        }
        if let Some(status) = filter.status {
            query = query.filter(unit::Column::Status.eq(status.as_str()));
        }

        let units = query
            .order_by_asc(unit::Column::Building)
            .order_by_asc(unit::Column::Floor)
            .order_by_asc(unit::Column::UnitNumber)
            .all(&*self.db)
            .await?
            .into_iter()
            .map(Unit::try_from)
            .collect::<AppResult<Vec<_>>>()?;

        let mut occupants = self.occupants(units.iter().map(|u| u.id).collect()).await?;

        Ok(units
            .into_iter()
            .map(|unit| UnitResponse {
                tenant: occupants.remove(&unit.id),
                unit,
            })
            .collect())
    }

    async fn create(&self, new_unit: CreateUnit) -> AppResult<Unit> {
        let now = Utc::now();
        let model = unit::ActiveModel {
            id: Set(Uuid::new_v4()),
            unit_number: Set(new_unit.unit_number.trim().to_string()),
            floor: Set(new_unit.floor),
            building: Set(new_unit.building.trim().to_string()),
            unit_type: Set(new_unit.unit_type),
            rent_cents: Set(new_unit.rent_cents),
            status: Set(UnitStatus::Available.to_string()),
            maintenance_status: Set(new_unit
                .maintenance_status
                .unwrap_or(MaintenanceStatus::None)
                .to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&*self.db)
        .await
        .map_err(duplicate_unit)?;

        Unit::try_from(model)
    }

    async fn update(&self, id: Uuid, changes: UpdateUnit) -> AppResult<Unit> {
        let existing = unit::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_not_found("Unit")?;

        let mut active = existing.into_active_model();
        if let Some(unit_number) = changes.unit_number {
            active.unit_number = Set(unit_number.trim().to_string());
        }
        if let Some(floor) = changes.floor {
            active.floor = Set(floor);
        }
        if let Some(building) = changes.building {
            active.building = Set(building.trim().to_string());
        }
        if let Some(unit_type) = changes.unit_type {
            active.unit_type = Set(Some(unit_type).filter(|t| !t.trim().is_empty()));
        }
        if let Some(rent_cents) = changes.rent_cents {
            active.rent_cents = Set(rent_cents);
        }
        if let Some(maintenance_status) = changes.maintenance_status {
            active.maintenance_status = Set(maintenance_status.to_string());
        }
        active.updated_at = Set(Utc::now());

        let model = active.update(&*self.db).await.map_err(duplicate_unit)?;
        Unit::try_from(model)
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let txn = self.db.begin().await?;

        unit::Entity::find_by_id(id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or_not_found("Unit")?;

        let tenants = user::Entity::find()
            .filter(user::Column::UnitId.eq(id))
            .count(&txn)
            .await?;
        if tenants > 0 {
            return Err(AppError::BadRequest(
                "Cannot delete a unit with assigned tenants".into(),
            ));
        }

        unit::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;
        Ok(())
    }

    async fn count(&self, status: Option<UnitStatus>) -> AppResult<u64> {
        let mut query = unit::Entity::find();
        if let Some(status) = status {
            query = query.filter(unit::Column::Status.eq(status.as_str()));
        }
        Ok(query.count(&*self.db).await?)
    }
}
