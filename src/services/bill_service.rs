//! Bill service - manual bills, rent generation and overdue tracking.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::config::BILL_TYPE_RENT;
use crate::domain::{
    Actor, Bill, BillFilter, BillStatus, BillView, BillingPeriod, CreateBill,
    GenerateMonthlyBills, GenerationSummary, NewBill, UpdateBill,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{BillQuery, UnitOfWork};

#[async_trait]
pub trait BillService: Send + Sync {
    /// Tenants only ever see their own bills
    async fn list_bills(&self, actor: Actor, filter: BillFilter) -> AppResult<Vec<BillView>>;

    /// A tenant's unpaid bills, earliest due first; empty for staff
    async fn my_unpaid(&self, actor: Actor) -> AppResult<Vec<Bill>>;

    async fn get_bill(&self, actor: Actor, id: Uuid) -> AppResult<BillView>;

    async fn create_bill(&self, request: CreateBill) -> AppResult<Bill>;

    /// Bill the month's rent to every housed tenant; safe to run repeatedly
    async fn generate_monthly(&self, request: GenerateMonthlyBills)
        -> AppResult<GenerationSummary>;

    async fn update_bill(&self, id: Uuid, changes: UpdateBill) -> AppResult<Bill>;

    async fn delete_bill(&self, id: Uuid) -> AppResult<()>;

    /// Flag unpaid bills past their due date; returns how many changed
    async fn mark_overdue(&self, today: NaiveDate) -> AppResult<u64>;
}

pub struct BillManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> BillManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

fn rent_description(unit_number: &str, period: BillingPeriod) -> String {
    format!("Rent for Unit {} - {}", unit_number, period.label())
}

#[async_trait]
impl<U: UnitOfWork> BillService for BillManager<U> {
    async fn list_bills(&self, actor: Actor, filter: BillFilter) -> AppResult<Vec<BillView>> {
        let due_range = filter.due_range(Utc::now().date_naive())?;

        let query = BillQuery {
            tenant_id: actor.scope(filter.tenant_id),
            status: filter.status,
            due_from: due_range.map(|(from, _)| from),
            due_before: due_range.map(|(_, before)| before),
        };

        self.uow.bills().list(query).await
    }

    async fn my_unpaid(&self, actor: Actor) -> AppResult<Vec<Bill>> {
        if !actor.is_tenant() {
            return Ok(Vec::new());
        }
        self.uow.bills().list_unpaid(actor.id).await
    }

    async fn get_bill(&self, actor: Actor, id: Uuid) -> AppResult<BillView> {
        let view = self
            .uow
            .bills()
            .find_view(id)
            .await?
            .ok_or_not_found("Bill")?;

        if !actor.can_view(view.bill.tenant_id) {
            return Err(AppError::Forbidden);
        }
        Ok(view)
    }

    async fn create_bill(&self, request: CreateBill) -> AppResult<Bill> {
        let tenant = self
            .uow
            .users()
            .find_by_id(request.tenant_id)
            .await?
            .filter(|user| user.is_tenant())
            .ok_or_not_found("Tenant")?;

        let bill = self
            .uow
            .bills()
            .create(NewBill {
                tenant_id: tenant.id,
                bill_type: request.bill_type.trim().to_string(),
                amount_cents: request.amount_cents,
                description: request.description.filter(|d| !d.trim().is_empty()),
                due_date: request.due_date,
                status: BillStatus::Unpaid,
                period: None,
            })
            .await?;

        tracing::info!(bill_id = %bill.id, tenant_id = %tenant.id, amount_cents = bill.amount_cents, "Bill created");
        Ok(bill)
    }

    async fn generate_monthly(
        &self,
        request: GenerateMonthlyBills,
    ) -> AppResult<GenerationSummary> {
        let period = BillingPeriod::resolve(request.year, request.month)?;
        let candidates = self.uow.users().rent_candidates().await?;

        let mut created = 0u64;
        let mut skipped = 0u64;

        for candidate in candidates {
            if candidate.rent_cents <= 0 {
                tracing::debug!(unit_id = %candidate.unit_id, "Unit has no rent set, skipping");
                skipped += 1;
                continue;
            }

            let inserted = self
                .uow
                .bills()
                .insert_if_absent(NewBill {
                    tenant_id: candidate.tenant_id,
                    bill_type: BILL_TYPE_RENT.to_string(),
                    amount_cents: candidate.rent_cents,
                    description: Some(rent_description(&candidate.unit_number, period)),
                    due_date: period.due_date(),
                    status: BillStatus::Unpaid,
                    period: Some(period.key()),
                })
                .await?;

            if inserted {
                created += 1;
            } else {
                skipped += 1;
            }
        }

        tracing::info!(period = %period, created, skipped, "Monthly rent generation finished");
        Ok(GenerationSummary::new(period, created, skipped))
    }

    async fn update_bill(&self, id: Uuid, changes: UpdateBill) -> AppResult<Bill> {
        self.uow.bills().update(id, changes).await
    }

    async fn delete_bill(&self, id: Uuid) -> AppResult<()> {
        self.uow.bills().delete(id).await?;
        tracing::info!(bill_id = %id, "Bill deleted");
        Ok(())
    }

    async fn mark_overdue(&self, today: NaiveDate) -> AppResult<u64> {
        let changed = self.uow.bills().mark_overdue(today).await?;
        if changed > 0 {
            tracing::info!(count = changed, %today, "Bills marked overdue");
        }
        Ok(changed)
    }
}
