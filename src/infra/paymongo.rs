//! PayMongo payment-link client.
//!
//! Only the two calls the checkout flow needs: create a link and read it back.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::{Config, PAYMONGO_TIMEOUT_SECONDS};
use crate::domain::{NewPaymentLink, PaymentLink};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Hosted checkout provider.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_link(&self, link: NewPaymentLink) -> AppResult<PaymentLink>;

    async fn retrieve_link(&self, link_id: &str) -> AppResult<PaymentLink>;
}

#[derive(Debug, Serialize)]
struct LinkRequest<'a> {
    data: LinkRequestData<'a>,
}

#[derive(Debug, Serialize)]
struct LinkRequestData<'a> {
    attributes: LinkRequestAttributes<'a>,
}

#[derive(Debug, Serialize)]
struct LinkRequestAttributes<'a> {
    amount: i64,
    description: &'a str,
    remarks: &'a str,
}

#[derive(Debug, Deserialize)]
struct LinkEnvelope {
    data: LinkResource,
}

#[derive(Debug, Deserialize)]
struct LinkResource {
    id: String,
    attributes: LinkAttributes,
}

#[derive(Debug, Deserialize)]
struct LinkAttributes {
    checkout_url: Option<String>,
    /// Older responses carry the checkout page here
    url: Option<String>,
    #[serde(default)]
    status: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    errors: Vec<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    detail: Option<String>,
}

impl TryFrom<LinkEnvelope> for PaymentLink {
    type Error = AppError;

    fn try_from(envelope: LinkEnvelope) -> Result<Self, Self::Error> {
        let LinkResource { id, attributes } = envelope.data;
        let checkout_url = attributes
            .checkout_url
            .or(attributes.url)
            .filter(|url| !url.is_empty())
            .ok_or_else(|| AppError::provider("checkout link has no URL"))?;

        if id.is_empty() {
            return Err(AppError::provider("checkout link has no id"));
        }

        Ok(PaymentLink {
            id,
            checkout_url,
            status: attributes.status,
        })
    }
}

/// reqwest-backed PayMongo client, authenticated with the secret key.
pub struct PayMongoClient {
    http: reqwest::Client,
    base_url: String,
    secret_key: String,
}

impl PayMongoClient {
    pub fn new(secret_key: impl Into<String>, base_url: impl Into<String>) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(PAYMONGO_TIMEOUT_SECONDS))
            .build()
            .map_err(|e| AppError::internal(format!("HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            secret_key: secret_key.into(),
        })
    }

    /// Client for the configured key; `None` when PayMongo is not set up.
    pub fn from_config(config: &Config) -> AppResult<Option<Self>> {
        config
            .paymongo_secret_key()
            .map(|key| Self::new(key, config.paymongo_api_base.clone()))
            .transpose()
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn read_link(&self, response: reqwest::Response) -> AppResult<PaymentLink> {
        let status = response.status();
        if !status.is_success() {
            let detail = response
                .json::<ErrorEnvelope>()
                .await
                .ok()
                .and_then(|body| body.errors.into_iter().find_map(|e| e.detail))
                .unwrap_or_else(|| status.to_string());
            return Err(AppError::provider(detail));
        }

        let envelope = response
            .json::<LinkEnvelope>()
            .await
            .map_err(|e| AppError::provider(format!("unreadable response: {e}")))?;

        PaymentLink::try_from(envelope)
    }
}

fn transport_error(err: reqwest::Error) -> AppError {
    AppError::provider(format!("request failed: {err}"))
}

#[async_trait]
impl PaymentGateway for PayMongoClient {
    async fn create_link(&self, link: NewPaymentLink) -> AppResult<PaymentLink> {
        let body = LinkRequest {
            data: LinkRequestData {
                attributes: LinkRequestAttributes {
                    amount: link.amount_cents,
                    description: &link.description,
                    remarks: &link.remarks,
                },
            },
        };

        let response = self
            .http
            .post(self.url("links"))
            .basic_auth(&self.secret_key, None::<&str>)
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        let created = self.read_link(response).await?;
        tracing::info!(link_id = %created.id, amount_cents = link.amount_cents, "Payment link created");
        Ok(created)
    }

    async fn retrieve_link(&self, link_id: &str) -> AppResult<PaymentLink> {
        let response = self
            .http
            .get(self.url(&format!("links/{link_id}")))
            .basic_auth(&self.secret_key, None::<&str>)
            .send()
            .await
            .map_err(transport_error)?;

        self.read_link(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_request_shape() {
        let body = LinkRequest {
            data: LinkRequestData {
                attributes: LinkRequestAttributes {
                    amount: 1_250_000,
                    description: "Rent payment",
                    remarks: "Bill #42 due 2025-03-31",
                },
            },
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["data"]["attributes"]["amount"], 1_250_000);
        assert_eq!(json["data"]["attributes"]["description"], "Rent payment");
    }

    #[test]
    fn test_link_response_prefers_checkout_url() {
        let envelope: LinkEnvelope = serde_json::from_value(serde_json::json!({
            "data": {
                "id": "link_abc",
                "attributes": {
                    "checkout_url": "https://pm.link/abc",
                    "url": "https://old.example/abc",
                    "status": "unpaid"
                }
            }
        }))
        .unwrap();

        let link = PaymentLink::try_from(envelope).unwrap();
        assert_eq!(link.id, "link_abc");
        assert_eq!(link.checkout_url, "https://pm.link/abc");
        assert_eq!(link.status, "unpaid");
    }

    #[test]
    fn test_link_response_without_url_is_provider_error() {
        let envelope: LinkEnvelope = serde_json::from_value(serde_json::json!({
            "data": { "id": "link_abc", "attributes": { "status": "unpaid" } }
        }))
        .unwrap();

        let err = PaymentLink::try_from(envelope).unwrap_err();
        assert!(matches!(err, AppError::PaymentProvider(_)));
    }

    #[test]
    fn test_client_requires_configured_key() {
        let config = Config::for_secret("test-secret-key-at-least-32-chars!");
        assert!(PayMongoClient::from_config(&config).unwrap().is_none());
    }

    #[test]
    fn test_url_joins_base() {
        let client = PayMongoClient::new("sk_test", "https://api.paymongo.com/v1/").unwrap();
        assert_eq!(client.url("links/x"), "https://api.paymongo.com/v1/links/x");
    }
}
