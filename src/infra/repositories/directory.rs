//! Batch lookup of tenants and their units, used to decorate list views.

use std::collections::HashMap;

use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};
use uuid::Uuid;

use super::entities::{unit, user};
use crate::errors::AppResult;

/// Display details for one tenant.
#[derive(Debug, Clone, Default)]
pub(super) struct Resident {
    pub name: String,
    pub email: String,
    pub unit_number: Option<String>,
    pub building: Option<String>,
}

/// Load display details for every id in `ids` with a single query.
pub(super) async fn residents<C, I>(db: &C, ids: I) -> AppResult<HashMap<Uuid, Resident>>
where
    C: ConnectionTrait,
    I: IntoIterator<Item = Uuid>,
{
    let mut ids: Vec<Uuid> = ids.into_iter().collect();
    ids.sort_unstable();
    ids.dedup();

    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = user::Entity::find()
        .filter(user::Column::Id.is_in(ids))
        .find_also_related(unit::Entity)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(tenant, unit)| {
            let resident = Resident {
                name: tenant.name,
                email: tenant.email,
                unit_number: unit.as_ref().map(|u| u.unit_number.clone()),
                building: unit.map(|u| u.building),
            };
            (tenant.id, resident)
        })
        .collect())
}
