//! Payment service - manual recording and PayMongo checkout links.
//!
//! A link payment is recorded `pending` when the link is created and only
//! becomes `completed` (settling its bill) once PayMongo reports it paid.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::{
    PAYMONGO_STATUS_PAID, TRANSACTION_PREFIX_MANUAL, TRANSACTION_PREFIX_PAYMONGO,
};
use crate::domain::{
    Actor, CreatePaymentLink, NewPayment, NewPaymentLink, Payment, PaymentLinkCreated,
    PaymentMethod, PaymentStatus, PaymentVerification, PaymentView, RecordPayment,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{PaymentGateway, UnitOfWork};

#[async_trait]
pub trait PaymentService: Send + Sync {
    /// Tenants see payments for their own bills
    async fn list_payments(&self, actor: Actor) -> AppResult<Vec<PaymentView>>;

    /// Record a payment taken at the office and mark the bill paid
    async fn record_manual(&self, request: RecordPayment) -> AppResult<Payment>;

    /// Open a PayMongo checkout for one of the tenant's unpaid bills
    async fn create_link(
        &self,
        actor: Actor,
        request: CreatePaymentLink,
    ) -> AppResult<PaymentLinkCreated>;

    /// Ask PayMongo whether the checkout was paid and settle it if so
    async fn verify(&self, actor: Actor, payment_id: Uuid) -> AppResult<PaymentVerification>;
}

pub struct PaymentManager<U: UnitOfWork> {
    uow: Arc<U>,
    gateway: Option<Arc<dyn PaymentGateway>>,
}

impl<U: UnitOfWork> PaymentManager<U> {
    /// `gateway` is `None` when PayMongo is not configured
    pub fn new(uow: Arc<U>, gateway: Option<Arc<dyn PaymentGateway>>) -> Self {
        Self { uow, gateway }
    }

    fn gateway(&self) -> AppResult<&Arc<dyn PaymentGateway>> {
        self.gateway
            .as_ref()
            .ok_or_else(|| AppError::ServiceUnavailable("PayMongo".into()))
    }
}

#[async_trait]
impl<U: UnitOfWork> PaymentService for PaymentManager<U> {
    async fn list_payments(&self, actor: Actor) -> AppResult<Vec<PaymentView>> {
        self.uow.payments().list(actor.scope(None)).await
    }

    async fn record_manual(&self, request: RecordPayment) -> AppResult<Payment> {
        let transaction_id = format!(
            "{}-{}",
            TRANSACTION_PREFIX_MANUAL,
            Utc::now().timestamp_millis()
        );

        let payment = self
            .uow
            .payments()
            .record_completed(NewPayment {
                bill_id: request.bill_id,
                amount_cents: request.amount_cents,
                method: PaymentMethod::Manual,
                transaction_id,
                paymongo_link_id: None,
                checkout_url: None,
                status: PaymentStatus::Completed,
            })
            .await?;

        tracing::info!(
            payment_id = %payment.id,
            bill_id = %payment.bill_id,
            amount_cents = payment.amount_cents,
            "Manual payment recorded"
        );
        Ok(payment)
    }

    async fn create_link(
        &self,
        actor: Actor,
        request: CreatePaymentLink,
    ) -> AppResult<PaymentLinkCreated> {
        if !actor.is_tenant() {
            return Err(AppError::Forbidden);
        }
        let gateway = self.gateway()?;

        let bill = self
            .uow
            .bills()
            .find_by_id(request.bill_id)
            .await?
            .filter(|bill| bill.tenant_id == actor.id)
            .ok_or_not_found("Bill")?;

        if !bill.status.is_payable() {
            return Err(AppError::BadRequest("Bill is not unpaid".into()));
        }
        if bill.amount_cents <= 0 {
            return Err(AppError::BadRequest("Invalid bill amount".into()));
        }

        let link = gateway
            .create_link(NewPaymentLink {
                amount_cents: bill.amount_cents,
                description: format!("{} payment", bill.bill_type),
                remarks: format!("Bill #{} due {}", bill.id, bill.due_date),
            })
            .await?;

        let payment = self
            .uow
            .payments()
            .create_pending(NewPayment {
                bill_id: bill.id,
                amount_cents: bill.amount_cents,
                method: PaymentMethod::PayMongo,
                transaction_id: format!("{}-{}", TRANSACTION_PREFIX_PAYMONGO, link.id),
                paymongo_link_id: Some(link.id),
                checkout_url: Some(link.checkout_url.clone()),
                status: PaymentStatus::Pending,
            })
            .await?;

        tracing::info!(payment_id = %payment.id, bill_id = %bill.id, "Pending PayMongo payment recorded");

        Ok(PaymentLinkCreated {
            payment_id: payment.id,
            checkout_url: link.checkout_url,
        })
    }

    async fn verify(&self, actor: Actor, payment_id: Uuid) -> AppResult<PaymentVerification> {
        let view = self
            .uow
            .payments()
            .find_view(payment_id)
            .await?
            .ok_or_not_found("Payment")?;

        let owner = view.tenant_id.ok_or_not_found("Bill")?;
        if !actor.can_view(owner) {
            return Err(AppError::Forbidden);
        }

        if view.payment.is_completed() {
            return Ok(PaymentVerification {
                payment: view.payment,
                provider_status: PAYMONGO_STATUS_PAID.to_string(),
            });
        }

        let link_id = view
            .payment
            .paymongo_link_id
            .clone()
            .ok_or_else(|| AppError::BadRequest("Payment has no payment link".into()))?;

        let link = self.gateway()?.retrieve_link(&link_id).await?;

        if link.status != PAYMONGO_STATUS_PAID {
            tracing::debug!(payment_id = %payment_id, status = %link.status, "Payment link not paid yet");
            return Ok(PaymentVerification {
                payment: view.payment,
                provider_status: link.status,
            });
        }

        let payment = self.uow.payments().complete(payment_id).await?;
        tracing::info!(payment_id = %payment.id, bill_id = %payment.bill_id, "PayMongo payment completed");

        Ok(PaymentVerification {
            payment,
            provider_status: link.status,
        })
    }
}
