//! Bill persistence, including the idempotent rent insert.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sea_orm::{
    sea_query::{Expr, OnConflict},
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, Set,
    TransactionTrait,
};
use uuid::Uuid;

use super::directory;
use super::entities::{bill, payment};
use crate::domain::{AmountStat, Bill, BillStatus, BillView, NewBill, UpdateBill};
use crate::errors::{AppError, AppResult, OptionExt};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Resolved bill listing criteria.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BillQuery {
    pub tenant_id: Option<Uuid>,
    pub status: Option<BillStatus>,
    /// Inclusive lower bound on the due date
    pub due_from: Option<NaiveDate>,
    /// Exclusive upper bound on the due date
    pub due_before: Option<NaiveDate>,
}

/// Bill counts for the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BillStats {
    pub total: u64,
    /// Unpaid and overdue bills
    pub outstanding: AmountStat,
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait BillRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Bill>>;

    async fn find_view(&self, id: Uuid) -> AppResult<Option<BillView>>;

    /// Latest due date first
    async fn list(&self, query: BillQuery) -> AppResult<Vec<BillView>>;

    /// A tenant's unpaid bills, earliest due first
    async fn list_unpaid(&self, tenant_id: Uuid) -> AppResult<Vec<Bill>>;

    async fn create(&self, bill: NewBill) -> AppResult<Bill>;

    /// Insert unless the tenant already has a bill for the same period.
    /// Returns whether a row was written.
    async fn insert_if_absent(&self, bill: NewBill) -> AppResult<bool>;

    async fn update(&self, id: Uuid, changes: UpdateBill) -> AppResult<Bill>;

    /// Refuses once a payment references the bill
    async fn delete(&self, id: Uuid) -> AppResult<()>;

    /// Flag unpaid bills due before `today` as overdue; returns how many changed
    async fn mark_overdue(&self, today: NaiveDate) -> AppResult<u64>;

    async fn stats(&self, tenant_id: Option<Uuid>) -> AppResult<BillStats>;

    /// Most recently created first
    async fn recent(&self, tenant_id: Option<Uuid>, limit: u64) -> AppResult<Vec<BillView>>;
}

pub struct BillStore {
    db: Arc<DatabaseConnection>,
}

impl BillStore {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    async fn decorate(&self, bills: Vec<bill::Model>) -> AppResult<Vec<BillView>> {
        decorate_bills(&*self.db, bills).await
    }
}

async fn decorate_bills<C: ConnectionTrait>(
    db: &C,
    bills: Vec<bill::Model>,
) -> AppResult<Vec<BillView>> {
    let residents = directory::residents(db, bills.iter().map(|b| b.tenant_id)).await?;

    bills
        .into_iter()
        .map(|model| {
            let bill = Bill::try_from(model)?;
            let resident = residents.get(&bill.tenant_id).cloned().unwrap_or_default();
            Ok(BillView {
                tenant_name: Some(resident.name).filter(|n| !n.is_empty()),
                tenant_email: Some(resident.email).filter(|e| !e.is_empty()),
                unit_number: resident.unit_number,
                building: resident.building,
                bill,
            })
        })
        .collect()
}

fn scoped(tenant_id: Option<Uuid>) -> Select<bill::Entity> {
    let query = bill::Entity::find();
    match tenant_id {
        Some(tenant_id) => query.filter(bill::Column::TenantId.eq(tenant_id)),
        None => query,
    }
}

fn outstanding() -> Condition {
    Condition::any()
        .add(bill::Column::Status.eq(BillStatus::Unpaid.as_str()))
        .add(bill::Column::Status.eq(BillStatus::Overdue.as_str()))
}

fn new_bill_model(bill: NewBill) -> bill::ActiveModel {
    let now = Utc::now();
    bill::ActiveModel {
        id: Set(Uuid::new_v4()),
        tenant_id: Set(bill.tenant_id),
        bill_type: Set(bill.bill_type),
        amount_cents: Set(bill.amount_cents),
        description: Set(bill.description),
        due_date: Set(bill.due_date),
        status: Set(bill.status.to_string()),
        period: Set(bill.period),
        created_at: Set(now),
        updated_at: Set(now),
    }
}

#[async_trait]
impl BillRepository for BillStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Bill>> {
        bill::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .map(Bill::try_from)
            .transpose()
    }

    async fn find_view(&self, id: Uuid) -> AppResult<Option<BillView>> {
        let Some(model) = bill::Entity::find_by_id(id).one(&*self.db).await? else {
            return Ok(None);
        };
        Ok(self.decorate(vec![model]).await?.pop())
    }

    async fn list(&self, query: BillQuery) -> AppResult<Vec<BillView>> {
        let mut select = scoped(query.tenant_id);

        if let Some(status) = query.status {
            select = select.filter(bill::Column::Status.eq(status.as_str()));
        }
        if let Some(from) = query.due_from {
            select = select.filter(bill::Column::DueDate.gte(from));
        }
        if let Some(before) = query.due_before {
            select = select.filter(bill::Column::DueDate.lt(before));
        }

        let bills = select
            .order_by_desc(bill::Column::DueDate)
            .order_by_desc(bill::Column::CreatedAt)
            .all(&*self.db)
            .await?;

        self.decorate(bills).await
    }

    async fn list_unpaid(&self, tenant_id: Uuid) -> AppResult<Vec<Bill>> {
        bill::Entity::find()
            .filter(bill::Column::TenantId.eq(tenant_id))
            .filter(bill::Column::Status.eq(BillStatus::Unpaid.as_str()))
            .order_by_asc(bill::Column::DueDate)
            .all(&*self.db)
            .await?
            .into_iter()
            .map(Bill::try_from)
            .collect()
    }

    async fn create(&self, new_bill: NewBill) -> AppResult<Bill> {
        let model = new_bill_model(new_bill)
            .insert(&*self.db)
            .await
            .map_err(|e| AppError::from_db_constraint(e, "Bill already exists for this period"))?;

        Bill::try_from(model)
    }

    async fn insert_if_absent(&self, new_bill: NewBill) -> AppResult<bool> {
        let rows = bill::Entity::insert(new_bill_model(new_bill))
            .on_conflict(
                OnConflict::columns([bill::Column::TenantId, bill::Column::Period])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&*self.db)
            .await?;

        Ok(rows > 0)
    }

    async fn update(&self, id: Uuid, changes: UpdateBill) -> AppResult<Bill> {
        let existing = bill::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_not_found("Bill")?;

        let mut active = existing.into_active_model();
        if let Some(bill_type) = changes.bill_type {
            active.bill_type = Set(bill_type);
        }
        if let Some(amount_cents) = changes.amount_cents {
            active.amount_cents = Set(amount_cents);
        }
        if let Some(description) = changes.description {
            active.description = Set(Some(description).filter(|d| !d.trim().is_empty()));
        }
        if let Some(due_date) = changes.due_date {
            active.due_date = Set(due_date);
        }
        if let Some(status) = changes.status {
            active.status = Set(status.to_string());
        }
        active.updated_at = Set(Utc::now());

        Bill::try_from(active.update(&*self.db).await?)
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let txn = self.db.begin().await?;

        bill::Entity::find_by_id(id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or_not_found("Bill")?;

        let payments = payment::Entity::find()
            .filter(payment::Column::BillId.eq(id))
            .count(&txn)
            .await?;
        if payments > 0 {
            return Err(AppError::conflict(
                "Cannot delete a bill that has payments recorded",
            ));
        }

        bill::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;
        Ok(())
    }

    async fn mark_overdue(&self, today: NaiveDate) -> AppResult<u64> {
        let result = bill::Entity::update_many()
            .col_expr(bill::Column::Status, Expr::value(BillStatus::Overdue.as_str()))
            .col_expr(bill::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(bill::Column::Status.eq(BillStatus::Unpaid.as_str()))
            .filter(bill::Column::DueDate.lt(today))
            .exec(&*self.db)
            .await?;

        Ok(result.rows_affected)
    }

    async fn stats(&self, tenant_id: Option<Uuid>) -> AppResult<BillStats> {
        let total = scoped(tenant_id).count(&*self.db).await?;

        let (count, total_cents) = scoped(tenant_id)
            .filter(outstanding())
            .select_only()
            .column_as(Expr::cust("COUNT(*)"), "count")
            .column_as(
                Expr::cust("COALESCE(SUM(bills.amount_cents), 0)::BIGINT"),
                "total",
            )
            .into_tuple::<(i64, i64)>()
            .one(&*self.db)
            .await?
            .unwrap_or_default();

        Ok(BillStats {
            total,
            outstanding: AmountStat {
                count: count.max(0) as u64,
                total_cents,
            },
        })
    }

    async fn recent(&self, tenant_id: Option<Uuid>, limit: u64) -> AppResult<Vec<BillView>> {
        let bills = scoped(tenant_id)
            .order_by_desc(bill::Column::CreatedAt)
            .limit(limit)
            .all(&*self.db)
            .await?;

        self.decorate(bills).await
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Value};

    use super::*;

    fn rent(tenant_id: Uuid) -> NewBill {
        NewBill {
            tenant_id,
            bill_type: "Rent".into(),
            amount_cents: 500_000,
            description: Some("Rent for Unit 101 - November 2026".into()),
            due_date: NaiveDate::from_ymd_opt(2026, 11, 30).unwrap(),
            status: BillStatus::Unpaid,
            period: Some("2026-11".into()),
        }
    }

    fn bill_row(id: Uuid) -> bill::Model {
        let now = Utc::now();
        bill::Model {
            id,
            tenant_id: Uuid::new_v4(),
            bill_type: "Rent".into(),
            amount_cents: 500_000,
            description: None,
            due_date: NaiveDate::from_ymd_opt(2026, 11, 30).unwrap(),
            status: "unpaid".into(),
            period: Some("2026-11".into()),
            created_at: now,
            updated_at: now,
        }
    }

    fn count_row(n: i64) -> BTreeMap<&'static str, Value> {
        BTreeMap::from([("num_items", Value::from(n))])
    }

    fn executed(rows_affected: u64) -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected,
        }
    }

    #[tokio::test]
    async fn test_insert_if_absent_skips_existing_period() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([executed(1), executed(0)])
                .into_connection(),
        );
        let store = BillStore::new(db.clone());
        let tenant_id = Uuid::new_v4();

        assert!(store.insert_if_absent(rent(tenant_id)).await.unwrap());
        assert!(!store.insert_if_absent(rent(tenant_id)).await.unwrap());

        drop(store);
        let log = Arc::into_inner(db).unwrap().into_transaction_log();
        assert_eq!(log.len(), 2);
        let sql = format!("{:?}", log[0]);
        assert!(sql.contains("INSERT INTO"));
        assert!(sql.contains("ON CONFLICT"));
        assert!(sql.contains("tenant_id"));
        assert!(sql.contains("period"));
        assert!(sql.contains("DO NOTHING"));
    }

    #[tokio::test]
    async fn test_delete_refuses_bill_with_payments() {
        let id = Uuid::new_v4();
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![bill_row(id)]])
                .append_query_results([vec![count_row(1)]])
                .into_connection(),
        );
        let store = BillStore::new(db);

        let err = store.delete(id).await.unwrap_err();

        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_delete_removes_bill_without_payments() {
        let id = Uuid::new_v4();
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![bill_row(id)]])
                .append_query_results([vec![count_row(0)]])
                .append_exec_results([executed(1)])
                .into_connection(),
        );
        let store = BillStore::new(db);

        assert!(store.delete(id).await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_unknown_bill_is_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<bill::Model>::new()])
                .into_connection(),
        );
        let store = BillStore::new(db);

        let err = store.delete(Uuid::new_v4()).await.unwrap_err();

        assert!(matches!(err, AppError::NotFound(ref e) if e == "Bill"));
    }
}
