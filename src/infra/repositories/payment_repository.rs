//! Payment persistence.
//!
//! Every write that settles a bill runs in one transaction with the bill
//! update, so a completed payment and a `paid` bill are never observed apart.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, IntoActiveModel, JoinType, QueryFilter, QueryOrder, QuerySelect, RelationTrait,
    Set, TransactionTrait,
};
use uuid::Uuid;

use super::directory;
use super::entities::{bill, payment};
use crate::domain::{AmountStat, BillStatus, NewPayment, Payment, PaymentStatus, PaymentView};
use crate::errors::{AppError, AppResult, OptionExt};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    async fn find_view(&self, id: Uuid) -> AppResult<Option<PaymentView>>;

    /// Newest first; `tenant_id` limits to payments for that tenant's bills
    async fn list(&self, tenant_id: Option<Uuid>) -> AppResult<Vec<PaymentView>>;

    /// Insert a completed payment and mark its bill paid. Atomic.
    async fn record_completed(&self, payment: NewPayment) -> AppResult<Payment>;

    /// Insert a payment awaiting provider confirmation
    async fn create_pending(&self, payment: NewPayment) -> AppResult<Payment>;

    /// Move a pending payment to completed and mark its bill paid. Atomic.
    /// Completing an already-completed payment changes nothing.
    async fn complete(&self, id: Uuid) -> AppResult<Payment>;

    /// Completed payments, optionally for one tenant
    async fn completed_stats(&self, tenant_id: Option<Uuid>) -> AppResult<AmountStat>;
}

pub struct PaymentStore {
    db: Arc<DatabaseConnection>,
}

impl PaymentStore {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

fn new_payment_model(payment: NewPayment) -> payment::ActiveModel {
    let now = Utc::now();
    payment::ActiveModel {
        id: Set(Uuid::new_v4()),
        bill_id: Set(payment.bill_id),
        amount_cents: Set(payment.amount_cents),
        method: Set(payment.method.to_string()),
        transaction_id: Set(payment.transaction_id),
        paymongo_link_id: Set(payment.paymongo_link_id),
        checkout_url: Set(payment.checkout_url),
        status: Set(payment.status.to_string()),
        created_at: Set(now),
        updated_at: Set(now),
    }
}

async fn mark_bill_paid(txn: &DatabaseTransaction, bill: bill::Model) -> AppResult<()> {
    let mut active = bill.into_active_model();
    active.status = Set(BillStatus::Paid.to_string());
    active.updated_at = Set(Utc::now());
    active.update(txn).await?;
    Ok(())
}

async fn views(
    db: &DatabaseConnection,
    rows: Vec<(payment::Model, Option<bill::Model>)>,
) -> AppResult<Vec<PaymentView>> {
    let residents = directory::residents(
        db,
        rows.iter().filter_map(|(_, bill)| bill.as_ref().map(|b| b.tenant_id)),
    )
    .await?;

    rows.into_iter()
        .map(|(payment, bill)| {
            let tenant_id = bill.as_ref().map(|b| b.tenant_id);
            Ok(PaymentView {
                payment: Payment::try_from(payment)?,
                bill_type: bill.map(|b| b.bill_type),
                tenant_name: tenant_id
                    .and_then(|id| residents.get(&id))
                    .map(|r| r.name.clone()),
                tenant_id,
            })
        })
        .collect()
}

#[async_trait]
impl PaymentRepository for PaymentStore {
    async fn find_view(&self, id: Uuid) -> AppResult<Option<PaymentView>> {
        let Some(row) = payment::Entity::find_by_id(id)
            .find_also_related(bill::Entity)
            .one(&*self.db)
            .await?
        else {
            return Ok(None);
        };

        Ok(views(&*self.db, vec![row]).await?.pop())
    }

    async fn list(&self, tenant_id: Option<Uuid>) -> AppResult<Vec<PaymentView>> {
        let mut query = payment::Entity::find().find_also_related(bill::Entity);
        if let Some(tenant_id) = tenant_id {
            query = query.filter(bill::Column::TenantId.eq(tenant_id));
        }

        let rows = query
            .order_by_desc(payment::Column::CreatedAt)
            .all(&*self.db)
            .await?;

        views(&*self.db, rows).await
    }

    async fn record_completed(&self, new_payment: NewPayment) -> AppResult<Payment> {
        let txn = self.db.begin().await?;

        let bill = bill::Entity::find_by_id(new_payment.bill_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or_not_found("Bill")?;

        if bill.status == BillStatus::Paid.as_str() {
            return Err(AppError::BadRequest("Bill is already paid".into()));
        }

        let payment = new_payment_model(NewPayment {
            status: PaymentStatus::Completed,
            ..new_payment
        })
        .insert(&txn)
        .await?;

        mark_bill_paid(&txn, bill).await?;
        txn.commit().await?;

        Payment::try_from(payment)
    }

    async fn create_pending(&self, new_payment: NewPayment) -> AppResult<Payment> {
        let payment = new_payment_model(NewPayment {
            status: PaymentStatus::Pending,
            ..new_payment
        })
        .insert(&*self.db)
        .await?;

        Payment::try_from(payment)
    }

    async fn complete(&self, id: Uuid) -> AppResult<Payment> {
        let txn = self.db.begin().await?;

        let existing = payment::Entity::find_by_id(id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or_not_found("Payment")?;

        if existing.status == PaymentStatus::Completed.as_str() {
            txn.commit().await?;
            return Payment::try_from(existing);
        }

        let bill = bill::Entity::find_by_id(existing.bill_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or_not_found("Bill")?;

        let mut active = existing.into_active_model();
        active.status = Set(PaymentStatus::Completed.to_string());
        active.updated_at = Set(Utc::now());
        let payment = active.update(&txn).await?;

        mark_bill_paid(&txn, bill).await?;
        txn.commit().await?;

        Payment::try_from(payment)
    }

    async fn completed_stats(&self, tenant_id: Option<Uuid>) -> AppResult<AmountStat> {
        let mut query = payment::Entity::find()
            .filter(payment::Column::Status.eq(PaymentStatus::Completed.as_str()));

        if let Some(tenant_id) = tenant_id {
            query = query
                .join(JoinType::InnerJoin, payment::Relation::Bill.def())
                .filter(bill::Column::TenantId.eq(tenant_id));
        }

        let (count, total_cents) = query
            .select_only()
            .column_as(Expr::cust("COUNT(*)"), "count")
            .column_as(
                Expr::cust("COALESCE(SUM(payments.amount_cents), 0)::BIGINT"),
                "total",
            )
            .into_tuple::<(i64, i64)>()
            .one(&*self.db)
            .await?
            .unwrap_or_default();

        Ok(AmountStat {
            count: count.max(0) as u64,
            total_cents,
        })
    }
}
