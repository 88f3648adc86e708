//! Payments against bills, and the hosted payment links used to collect them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

string_enum! {
    /// Payments only ever move from `pending` to `completed`.
    pub enum PaymentStatus("payment status") {
        Pending => "pending",
        Completed => "completed",
    }
}

string_enum! {
    pub enum PaymentMethod("payment method") {
        Manual => "manual",
        PayMongo => "paymongo",
    }
}

/// Payment domain entity
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Payment {
    pub id: Uuid,
    pub bill_id: Uuid,
    /// Amount in centavos
    pub amount_cents: i64,
    pub method: PaymentMethod,
    #[schema(example = "MANUAL-1760600000000")]
    pub transaction_id: String,
    pub paymongo_link_id: Option<String>,
    pub checkout_url: Option<String>,
    pub status: PaymentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Payment {
    pub fn is_completed(&self) -> bool {
        self.status == PaymentStatus::Completed
    }
}

/// Payment with the bill and tenant it belongs to
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PaymentView {
    #[serde(flatten)]
    pub payment: Payment,
    pub bill_type: Option<String>,
    pub tenant_id: Option<Uuid>,
    pub tenant_name: Option<String>,
}

/// Data required to insert a payment row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPayment {
    pub bill_id: Uuid,
    pub amount_cents: i64,
    pub method: PaymentMethod,
    pub transaction_id: String,
    pub paymongo_link_id: Option<String>,
    pub checkout_url: Option<String>,
    pub status: PaymentStatus,
}

/// Manual payment request (cash, bank deposit)
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RecordPayment {
    pub bill_id: Uuid,
    #[validate(range(min = 1, message = "Amount must be positive"))]
    #[schema(example = 500000)]
    pub amount_cents: i64,
}

/// Online payment request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreatePaymentLink {
    pub bill_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PaymentLinkCreated {
    pub payment_id: Uuid,
    #[schema(example = "https://pm.link/ancheta/test/abc123")]
    pub checkout_url: String,
}

/// Result of checking a payment link with the provider
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PaymentVerification {
    pub payment: Payment,
    /// Link status as reported by the provider, e.g. `unpaid` or `paid`
    #[schema(example = "paid")]
    pub provider_status: String,
}

/// What we ask the provider to create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPaymentLink {
    pub amount_cents: i64,
    pub description: String,
    pub remarks: String,
}

/// A payment link as the provider reports it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentLink {
    pub id: String,
    pub checkout_url: String,
    pub status: String,
}
