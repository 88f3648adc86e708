//! Tenant accounts and their generated login e-mails.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::config::TENANT_EMAIL_PREFIX;

use super::user::UserResponse;

static TENANT_LOCAL_PART: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i)^{}(\d*)@(.+)$", TENANT_EMAIL_PREFIX))
        .expect("valid tenant e-mail regex")
});

/// Next free tenant login e-mail for `domain`.
///
/// `tenant@domain` counts as number 1, `tenant2@domain` as 2 and so on. The
/// result is one past the highest number in use (compared numerically, so
/// `tenant10` beats `tenant9`). E-mails on other domains are ignored, and so
/// are numbers too large to have a successor.
pub fn next_tenant_email<S: AsRef<str>>(existing: &[S], domain: &str) -> String {
    let next = existing
        .iter()
        .filter_map(|email| {
            let caps = TENANT_LOCAL_PART.captures(email.as_ref().trim())?;
            if !caps[2].eq_ignore_ascii_case(domain) {
                return None;
            }
            let number = match &caps[1] {
                "" => 1u64,
                digits => digits.parse::<u64>().ok()?,
            };
            number.checked_add(1)
        })
        .max();

    match next {
        None => format!("{}@{}", TENANT_EMAIL_PREFIX, domain),
        Some(n) => format!("{}{}@{}", TENANT_EMAIL_PREFIX, n, domain),
    }
}

/// Tenant creation request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateTenant {
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "Juan Dela Cruz")]
    pub name: String,
    #[schema(example = "09171234567")]
    pub phone: Option<String>,
}

/// Returned once, right after a tenant account is created.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TenantCreated {
    pub tenant: UserResponse,
    #[schema(example = "tenant2@ancheta.com")]
    pub login_email: String,
    #[schema(example = "password123")]
    pub login_password: String,
}

/// Tenant row on the tenants page
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TenantSummary {
    #[serde(flatten)]
    pub tenant: UserResponse,
    pub unit_type: Option<String>,
    pub rent_cents: Option<i64>,
    pub bill_count: u64,
    /// Sum of unpaid and overdue bills in centavos
    pub unpaid_total_cents: i64,
}

/// Unit assignment request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct AssignUnit {
    pub unit_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_tenant_gets_plain_address() {
        let none: [&str; 0] = [];
        assert_eq!(next_tenant_email(&none, "ancheta.com"), "tenant@ancheta.com");
    }

    #[test]
    fn test_plain_address_counts_as_one() {
        assert_eq!(
            next_tenant_email(&["tenant@ancheta.com"], "ancheta.com"),
            "tenant2@ancheta.com"
        );
    }

    #[test]
    fn test_numeric_not_lexicographic_maximum() {
        let existing = ["tenant@ancheta.com", "tenant9@ancheta.com", "tenant10@ancheta.com"];
        assert_eq!(next_tenant_email(&existing, "ancheta.com"), "tenant11@ancheta.com");
    }

    #[test]
    fn test_gaps_are_not_reused() {
        let existing = ["tenant@ancheta.com", "tenant5@ancheta.com"];
        assert_eq!(next_tenant_email(&existing, "ancheta.com"), "tenant6@ancheta.com");
    }

    #[test]
    fn test_other_addresses_ignored() {
        let existing = [
            "manager@ancheta.com",
            "tenant7@example.com",
            "tenantx@ancheta.com",
            "mytenant3@ancheta.com",
        ];
        assert_eq!(next_tenant_email(&existing, "ancheta.com"), "tenant@ancheta.com");
    }

    #[test]
    fn test_numbers_without_successor_ignored() {
        let existing = [
            "tenant3@ancheta.com",
            "tenant18446744073709551615@ancheta.com",
            "tenant99999999999999999999999@ancheta.com",
        ];
        assert_eq!(next_tenant_email(&existing, "ancheta.com"), "tenant4@ancheta.com");
    }
}
