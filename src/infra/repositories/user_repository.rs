//! User and tenant persistence.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    sea_query::{Expr, Func},
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use super::entities::{bill, unit, user};
use crate::config::TENANT_EMAIL_PREFIX;
use crate::domain::{
    NewUser, RentCandidate, TenantSummary, Unit, UnitStatus, UpdateProfile, User, UserFilter,
    UserResponse, UserRole, UserWithUnit,
};
use crate::errors::{AppError, AppResult, OptionExt};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// User joined with the unit they occupy
    async fn find_with_unit(&self, id: Uuid) -> AppResult<Option<UserWithUnit>>;

    /// Insert a user; a taken e-mail is a conflict
    async fn create(&self, user: NewUser) -> AppResult<User>;

    async fn update_profile(&self, id: Uuid, changes: UpdateProfile) -> AppResult<User>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;

    /// Newest first
    async fn list(&self, filter: UserFilter) -> AppResult<Vec<UserWithUnit>>;

    /// Every e-mail of the form `tenant…@…`, for login e-mail sequencing
    async fn tenant_emails(&self) -> AppResult<Vec<String>>;

    /// Tenants with unit details and bill totals, newest first
    async fn tenant_summaries(&self) -> AppResult<Vec<TenantSummary>>;

    /// Move a tenant into a unit, freeing the unit they leave. Atomic.
    async fn assign_unit(&self, tenant_id: Uuid, unit_id: Uuid) -> AppResult<UserWithUnit>;

    /// Clear a tenant's unit and mark it available. Atomic.
    async fn remove_unit(&self, tenant_id: Uuid) -> AppResult<UserWithUnit>;

    /// Tenants who occupy a unit
    async fn rent_candidates(&self) -> AppResult<Vec<RentCandidate>>;

    async fn count_by_role(&self, role: UserRole) -> AppResult<u64>;
}

/// SeaORM-backed user repository
pub struct UserStore {
    db: Arc<DatabaseConnection>,
}

impl UserStore {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

fn with_unit(row: (user::Model, Option<unit::Model>)) -> AppResult<UserWithUnit> {
    let (user, unit) = row;
    Ok(UserWithUnit {
        user: User::try_from(user)?,
        unit: unit.map(Unit::try_from).transpose()?,
    })
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        user::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        user::Entity::find()
            .filter(user::Column::Email.eq(email.trim().to_lowercase()))
            .one(&*self.db)
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn find_with_unit(&self, id: Uuid) -> AppResult<Option<UserWithUnit>> {
        user::Entity::find_by_id(id)
            .find_also_related(unit::Entity)
            .one(&*self.db)
            .await?
            .map(with_unit)
            .transpose()
    }

    async fn create(&self, new_user: NewUser) -> AppResult<User> {
        let now = Utc::now();
        let model = user::ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(new_user.email.trim().to_lowercase()),
            password_hash: Set(new_user.password_hash),
            name: Set(new_user.name),
            role: Set(new_user.role.to_string()),
            phone: Set(new_user.phone),
            unit_id: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&*self.db)
        .await
        .map_err(|e| AppError::from_db_constraint(e, "Email is already registered"))?;

        User::try_from(model)
    }

    async fn update_profile(&self, id: Uuid, changes: UpdateProfile) -> AppResult<User> {
        let existing = user::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_not_found("User")?;

        let mut active = existing.into_active_model();
        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(phone) = changes.phone {
            active.phone = Set(Some(phone).filter(|p| !p.trim().is_empty()));
        }
        active.updated_at = Set(Utc::now());

        User::try_from(active.update(&*self.db).await?)
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let txn = self.db.begin().await?;

        let existing = user::Entity::find_by_id(id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or_not_found("User")?;

        // A departing tenant frees their unit
        if let Some(unit_id) = existing.unit_id {
            set_unit_status(&txn, unit_id, UnitStatus::Available).await?;
        }

        user::Entity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(|e| AppError::from_db_constraint(e, "User has recorded payments"))?;
        txn.commit().await?;
        Ok(())
    }

    async fn list(&self, filter: UserFilter) -> AppResult<Vec<UserWithUnit>> {
        let mut query = user::Entity::find();

        if let Some(role) = filter.role {
            query = query.filter(user::Column::Role.eq(role.as_str()));
        }
        if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let pattern = format!("%{}%", search.to_lowercase());
            query = query.filter(
                Condition::any()
                    .add(Expr::expr(Func::lower(Expr::col(user::Column::Name))).like(&pattern))
                    .add(Expr::expr(Func::lower(Expr::col(user::Column::Email))).like(&pattern)),
            );
        }

        query
            .order_by_desc(user::Column::CreatedAt)
            .find_also_related(unit::Entity)
            .all(&*self.db)
            .await?
            .into_iter()
            .map(with_unit)
            .collect()
    }

    async fn tenant_emails(&self) -> AppResult<Vec<String>> {
        let emails = user::Entity::find()
            .select_only()
            .column(user::Column::Email)
            .filter(user::Column::Role.eq(UserRole::Tenant.as_str()))
            .filter(user::Column::Email.starts_with(TENANT_EMAIL_PREFIX))
            .into_tuple::<String>()
            .all(&*self.db)
            .await?;

        Ok(emails)
    }

    async fn tenant_summaries(&self) -> AppResult<Vec<TenantSummary>> {
        let tenants = user::Entity::find()
            .filter(user::Column::Role.eq(UserRole::Tenant.as_str()))
            .order_by_desc(user::Column::CreatedAt)
            .find_also_related(unit::Entity)
            .all(&*self.db)
            .await?;

        let totals: HashMap<Uuid, (i64, i64)> = bill::Entity::find()
            .select_only()
            .column(bill::Column::TenantId)
            .column_as(Expr::cust("COUNT(*)"), "bill_count")
            .column_as(
                Expr::cust(
                    "COALESCE(SUM(CASE WHEN bills.status IN ('unpaid', 'overdue') \
                     THEN bills.amount_cents ELSE 0 END), 0)::BIGINT",
                ),
                "unpaid_total",
            )
            .group_by(bill::Column::TenantId)
            .into_tuple::<(Uuid, i64, i64)>()
            .all(&*self.db)
            .await?
            .into_iter()
            .map(|(tenant_id, count, unpaid)| (tenant_id, (count, unpaid)))
            .collect();

        tenants
            .into_iter()
            .map(|row| {
                let row = with_unit(row)?;
                let (bill_count, unpaid_total_cents) =
                    totals.get(&row.user.id).copied().unwrap_or_default();
                let unit_type = row.unit.as_ref().and_then(|u| u.unit_type.clone());
                let rent_cents = row.unit.as_ref().map(|u| u.rent_cents);

                Ok(TenantSummary {
                    tenant: UserResponse::from(row),
                    unit_type,
                    rent_cents,
                    bill_count: bill_count.max(0) as u64,
                    unpaid_total_cents,
                })
            })
            .collect()
    }

    async fn assign_unit(&self, tenant_id: Uuid, unit_id: Uuid) -> AppResult<UserWithUnit> {
        let txn = self.db.begin().await?;

        let tenant = user::Entity::find_by_id(tenant_id)
            .filter(user::Column::Role.eq(UserRole::Tenant.as_str()))
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or_not_found("Tenant")?;

        let target = unit::Entity::find_by_id(unit_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or_not_found("Unit")?;

        if tenant.unit_id == Some(unit_id) {
            txn.commit().await?;
            return with_unit((tenant, Some(target)));
        }

        let occupied = user::Entity::find()
            .filter(user::Column::UnitId.eq(unit_id))
            .count(&txn)
            .await?
            > 0;
        if occupied || target.status == UnitStatus::Occupied.as_str() {
            return Err(AppError::BadRequest("Unit is already occupied".into()));
        }

        if let Some(previous) = tenant.unit_id {
            set_unit_status(&txn, previous, UnitStatus::Available).await?;
        }

        let mut active = tenant.into_active_model();
        active.unit_id = Set(Some(unit_id));
        active.updated_at = Set(Utc::now());
        let tenant = active.update(&txn).await?;

        let target = set_unit_status(&txn, unit_id, UnitStatus::Occupied).await?;

        txn.commit().await?;
        with_unit((tenant, Some(target)))
    }

    async fn remove_unit(&self, tenant_id: Uuid) -> AppResult<UserWithUnit> {
        let txn = self.db.begin().await?;

        let tenant = user::Entity::find_by_id(tenant_id)
            .filter(user::Column::Role.eq(UserRole::Tenant.as_str()))
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or_not_found("Tenant")?;

        let Some(unit_id) = tenant.unit_id else {
            txn.commit().await?;
            return with_unit((tenant, None));
        };

        let mut active = tenant.into_active_model();
        active.unit_id = Set(None);
        active.updated_at = Set(Utc::now());
        let tenant = active.update(&txn).await?;

        set_unit_status(&txn, unit_id, UnitStatus::Available).await?;

        txn.commit().await?;
        with_unit((tenant, None))
    }

    async fn rent_candidates(&self) -> AppResult<Vec<RentCandidate>> {
        let rows = user::Entity::find()
            .filter(user::Column::Role.eq(UserRole::Tenant.as_str()))
            .filter(user::Column::UnitId.is_not_null())
            .order_by_asc(user::Column::CreatedAt)
            .find_also_related(unit::Entity)
            .all(&*self.db)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(tenant, unit)| {
                let unit = unit?;
                Some(RentCandidate {
                    tenant_id: tenant.id,
                    tenant_name: tenant.name,
                    unit_id: unit.id,
                    unit_number: unit.unit_number,
                    rent_cents: unit.rent_cents,
                })
            })
            .collect())
    }

    async fn count_by_role(&self, role: UserRole) -> AppResult<u64> {
        let count = user::Entity::find()
            .filter(user::Column::Role.eq(role.as_str()))
            .count(&*self.db)
            .await?;
        Ok(count)
    }
}

async fn set_unit_status<C: sea_orm::ConnectionTrait>(
    db: &C,
    unit_id: Uuid,
    status: UnitStatus,
) -> AppResult<unit::Model> {
    let existing = unit::Entity::find_by_id(unit_id)
        .one(db)
        .await?
        .ok_or_not_found("Unit")?;

    let mut active = existing.into_active_model();
    active.status = Set(status.to_string());
    active.updated_at = Set(Utc::now());
    Ok(active.update(db).await?)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use sea_orm::{DatabaseBackend, MockDatabase, Value};

    use super::*;

    fn tenant_row(unit_id: Option<Uuid>) -> user::Model {
        let now = Utc::now();
        user::Model {
            id: Uuid::new_v4(),
            email: "tenant2@ancheta.com".into(),
            password_hash: "hashed".into(),
            name: "Maria Santos".into(),
            role: "tenant".into(),
            phone: None,
            unit_id,
            created_at: now,
            updated_at: now,
        }
    }

    fn unit_row(id: Uuid, status: UnitStatus) -> unit::Model {
        let now = Utc::now();
        unit::Model {
            id,
            unit_number: "101".into(),
            floor: 1,
            building: "Building A".into(),
            unit_type: Some("Studio".into()),
            rent_cents: 500_000,
            status: status.to_string(),
            maintenance_status: "none".into(),
            created_at: now,
            updated_at: now,
        }
    }

    fn count_row(n: i64) -> BTreeMap<&'static str, Value> {
        BTreeMap::from([("num_items", Value::from(n))])
    }

    #[tokio::test]
    async fn test_assign_unit_rejects_unit_with_occupant() {
        let unit_id = Uuid::new_v4();
        let tenant = tenant_row(None);
        let tenant_id = tenant.id;
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![tenant]])
            .append_query_results([vec![unit_row(unit_id, UnitStatus::Available)]])
            .append_query_results([vec![count_row(1)]])
            .into_connection();
        let store = UserStore::new(Arc::new(db));

        let err = store.assign_unit(tenant_id, unit_id).await.unwrap_err();

        assert!(matches!(err, AppError::BadRequest(ref m) if m == "Unit is already occupied"));
    }

    #[tokio::test]
    async fn test_assign_unit_rejects_unit_marked_occupied() {
        let unit_id = Uuid::new_v4();
        let tenant = tenant_row(None);
        let tenant_id = tenant.id;
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![tenant]])
            .append_query_results([vec![unit_row(unit_id, UnitStatus::Occupied)]])
            .append_query_results([vec![count_row(0)]])
            .into_connection();
        let store = UserStore::new(Arc::new(db));

        let err = store.assign_unit(tenant_id, unit_id).await.unwrap_err();

        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_assign_unit_to_unknown_unit_is_not_found() {
        let tenant = tenant_row(None);
        let tenant_id = tenant.id;
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![tenant]])
            .append_query_results([Vec::<unit::Model>::new()])
            .into_connection();
        let store = UserStore::new(Arc::new(db));

        let err = store.assign_unit(tenant_id, Uuid::new_v4()).await.unwrap_err();

        assert!(matches!(err, AppError::NotFound(ref e) if e == "Unit"));
    }

    #[tokio::test]
    async fn test_tenant_emails_only_reads_tenant_accounts() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![BTreeMap::from([(
                    "email",
                    Value::from("tenant3@ancheta.com"),
                )])]])
                .into_connection(),
        );
        let store = UserStore::new(db.clone());

        let emails = store.tenant_emails().await.unwrap();
        assert_eq!(emails, vec!["tenant3@ancheta.com".to_string()]);

        drop(store);
        let log = Arc::into_inner(db).unwrap().into_transaction_log();
        let sql = format!("{:?}", log[0]);
        assert!(sql.contains("role"));
        assert!(sql.contains("LIKE"));
    }
}
