//! Bills and billing periods.

use chrono::{DateTime, Datelike, Days, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::errors::{AppError, AppResult};

string_enum! {
    pub enum BillStatus("bill status") {
        Unpaid => "unpaid",
        Paid => "paid",
        Overdue => "overdue",
    }
}

impl BillStatus {
    /// Only unpaid bills can be checked out online.
    pub fn is_payable(&self) -> bool {
        matches!(self, BillStatus::Unpaid)
    }
}

/// A calendar month bills are generated for.
///
/// Keyed as `YYYY-MM`; rent for the period falls due on its last day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BillingPeriod {
    first_day: NaiveDate,
}

impl BillingPeriod {
    pub fn new(year: i32, month: u32) -> AppResult<Self> {
        if !(1..=12).contains(&month) {
            return Err(AppError::validation("Month must be between 1 and 12"));
        }
        if !(1..=9998).contains(&year) {
            return Err(AppError::validation("Year is out of range"));
        }
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(|first_day| Self { first_day })
            .ok_or_else(|| AppError::validation("Invalid billing period"))
    }

    /// The period containing `date`.
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            first_day: date.with_day(1).unwrap_or(date),
        }
    }

    pub fn current() -> Self {
        Self::containing(Utc::now().date_naive())
    }

    /// Fill in whatever the caller left out from the current month.
    pub fn resolve(year: Option<i32>, month: Option<u32>) -> AppResult<Self> {
        let now = Self::current();
        Self::new(year.unwrap_or(now.year()), month.unwrap_or(now.month()))
    }

    pub fn year(&self) -> i32 {
        self.first_day.year()
    }

    pub fn month(&self) -> u32 {
        self.first_day.month()
    }

    /// `2026-10`
    pub fn key(&self) -> String {
        format!("{:04}-{:02}", self.year(), self.month())
    }

    /// `October 2026`
    pub fn label(&self) -> String {
        self.first_day.format("%B %Y").to_string()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first_day
    }

    /// First day of the following period.
    pub fn end_exclusive(&self) -> NaiveDate {
        self.first_day + Months::new(1)
    }

    pub fn last_day(&self) -> NaiveDate {
        self.end_exclusive() - Days::new(1)
    }

    /// Rent for this period is due on its last day.
    pub fn due_date(&self) -> NaiveDate {
        self.last_day()
    }

    pub fn next(&self) -> Self {
        Self {
            first_day: self.end_exclusive(),
        }
    }
}

impl std::fmt::Display for BillingPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.key())
    }
}

/// Bill domain entity
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Bill {
    pub id: Uuid,
    pub tenant_id: Uuid,
    #[schema(example = "Rent")]
    pub bill_type: String,
    /// Amount in centavos
    #[schema(example = 500000)]
    pub amount_cents: i64,
    pub description: Option<String>,
    pub due_date: NaiveDate,
    pub status: BillStatus,
    /// `YYYY-MM` for generated rent bills
    #[schema(example = "2026-10")]
    pub period: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Bill with tenant and unit details
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BillView {
    #[serde(flatten)]
    pub bill: Bill,
    pub tenant_name: Option<String>,
    pub tenant_email: Option<String>,
    pub unit_number: Option<String>,
    pub building: Option<String>,
}

/// Data required to insert a bill row.
#[derive(Debug, Clone)]
pub struct NewBill {
    pub tenant_id: Uuid,
    pub bill_type: String,
    pub amount_cents: i64,
    pub description: Option<String>,
    pub due_date: NaiveDate,
    pub status: BillStatus,
    pub period: Option<String>,
}

/// A tenant who occupies a unit and can therefore be billed rent.
#[derive(Debug, Clone)]
pub struct RentCandidate {
    pub tenant_id: Uuid,
    pub tenant_name: String,
    pub unit_id: Uuid,
    pub unit_number: String,
    pub rent_cents: i64,
}

/// Manual bill creation request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateBill {
    pub tenant_id: Uuid,
    #[validate(length(min = 1, message = "Bill type is required"))]
    #[schema(example = "Water")]
    pub bill_type: String,
    #[validate(range(min = 1, message = "Amount must be positive"))]
    #[schema(example = 45000)]
    pub amount_cents: i64,
    pub description: Option<String>,
    pub due_date: NaiveDate,
}

/// Bill update request
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateBill {
    #[validate(length(min = 1, message = "Bill type cannot be empty"))]
    pub bill_type: Option<String>,
    #[validate(range(min = 1, message = "Amount must be positive"))]
    pub amount_cents: Option<i64>,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub status: Option<BillStatus>,
}

/// Query string for listing bills
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct BillFilter {
    /// Ignored for tenants, who only ever see their own bills
    pub tenant_id: Option<Uuid>,
    pub status: Option<BillStatus>,
    /// Due month, 1-12; without `year` the current year is assumed
    pub month: Option<u32>,
    pub year: Option<i32>,
}

impl BillFilter {
    /// Due-date window `[start, end)` selected by `month` / `year`.
    pub fn due_range(&self, today: NaiveDate) -> AppResult<Option<(NaiveDate, NaiveDate)>> {
        match (self.year, self.month) {
            (None, None) => Ok(None),
            (year, Some(month)) => {
                let period = BillingPeriod::new(year.unwrap_or(today.year()), month)?;
                Ok(Some((period.first_day(), period.end_exclusive())))
            }
            (Some(year), None) => {
                let january = BillingPeriod::new(year, 1)?;
                Ok(Some((january.first_day(), january.first_day() + Months::new(12))))
            }
        }
    }
}

/// Monthly rent generation request; omitted fields default to the current month
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct GenerateMonthlyBills {
    #[schema(example = 2026)]
    pub year: Option<i32>,
    #[validate(range(min = 1, max = 12, message = "Month must be between 1 and 12"))]
    #[schema(example = 10)]
    pub month: Option<u32>,
}

/// Outcome of a rent generation run
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GenerationSummary {
    pub created: u64,
    pub skipped: u64,
    #[schema(example = "2026-10")]
    pub period: String,
    pub message: String,
}

impl GenerationSummary {
    pub fn new(period: BillingPeriod, created: u64, skipped: u64) -> Self {
        let message = if created == 0 {
            format!("No new rent bills for {}; {} already billed or skipped", period.label(), skipped)
        } else {
            format!(
                "Generated {} rent bill(s) for {}; {} skipped",
                created,
                period.label(),
                skipped
            )
        };

        Self {
            created,
            skipped,
            period: period.key(),
            message,
        }
    }
}
