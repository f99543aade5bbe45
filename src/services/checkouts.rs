//! Checkouts service.

use percent_encoding::utf8_percent_encode;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tracing::instrument;

use super::{authorized_headers, COMPONENT};
use crate::auth::AccessToken;
use crate::errors::{SumUpError, SumUpResult};
use crate::response::Response;
use crate::transport::{HttpMethod, HttpRequest, HttpTransport};

/// Base path of the checkouts resource.
pub const CHECKOUTS_PATH: &str = "/v0.1/checkouts";

/// Parameters of a new checkout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateCheckout {
    /// Merchant receiving the payment.
    pub merchant_code: String,
    /// Amount to charge, must be positive.
    pub amount: f64,
    /// ISO 4217 currency code.
    pub currency: String,
    /// Caller-side unique reference.
    pub checkout_reference: String,
    /// Free text description.
    pub description: String,
    /// Email of the paying SumUp user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pay_from_email: Option<String>,
    /// Callback URL for checkout status updates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_url: Option<String>,
    /// Redirect target after 3DS.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,
}

impl CreateCheckout {
    /// Creates checkout parameters with the mandatory fields.
    pub fn new(
        amount: f64,
        currency: impl Into<String>,
        checkout_reference: impl Into<String>,
        merchant_code: impl Into<String>,
    ) -> Self {
        Self {
            merchant_code: merchant_code.into(),
            amount,
            currency: currency.into(),
            checkout_reference: checkout_reference.into(),
            description: String::new(),
            pay_from_email: None,
            return_url: None,
            redirect_url: None,
        }
    }

    /// Sets the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the paying user's email.
    pub fn pay_from_email(mut self, email: impl Into<String>) -> Self {
        self.pay_from_email = Some(email.into());
        self
    }

    /// Sets the return URL.
    pub fn return_url(mut self, url: impl Into<String>) -> Self {
        self.return_url = Some(url.into());
        self
    }

    /// Sets the redirect URL.
    pub fn redirect_url(mut self, url: impl Into<String>) -> Self {
        self.redirect_url = Some(url.into());
        self
    }

    fn validate(&self) -> SumUpResult<()> {
        if !(self.amount.is_finite() && self.amount > 0.0) {
            return Err(SumUpError::missing_argument("amount"));
        }
        require(&self.currency, "currency")?;
        require(&self.checkout_reference, "checkout reference id")?;
        require(&self.merchant_code, "merchant code")
    }
}

fn require(value: &str, name: &str) -> SumUpResult<()> {
    if value.is_empty() {
        Err(SumUpError::missing_argument(name))
    } else {
        Ok(())
    }
}

fn checkout_path(checkout_id: &str) -> String {
    format!(
        "{}/{}",
        CHECKOUTS_PATH,
        utf8_percent_encode(checkout_id, COMPONENT)
    )
}

/// Checkouts service.
pub struct Checkouts {
    transport: Arc<dyn HttpTransport>,
    access_token: AccessToken,
}

impl Checkouts {
    /// Creates a new checkouts service.
    pub fn new(transport: Arc<dyn HttpTransport>, access_token: AccessToken) -> Self {
        Self {
            transport,
            access_token,
        }
    }

    /// Creates a checkout.
    #[instrument(skip(self, checkout), fields(reference = %checkout.checkout_reference))]
    pub async fn create(&self, checkout: CreateCheckout) -> SumUpResult<Response> {
        checkout.validate()?;
        let body = serde_json::to_value(&checkout)?;
        self.send(HttpRequest::new(HttpMethod::Post, CHECKOUTS_PATH).with_body(body))
            .await
    }

    /// Fetches a checkout by id.
    #[instrument(skip(self))]
    pub async fn find_by_id(&self, checkout_id: &str) -> SumUpResult<Response> {
        require(checkout_id, "checkout id")?;
        self.send(HttpRequest::new(HttpMethod::Get, checkout_path(checkout_id)))
            .await
    }

    /// Fetches the checkouts carrying a reference.
    #[instrument(skip(self))]
    pub async fn find_by_reference_id(&self, reference_id: &str) -> SumUpResult<Response> {
        require(reference_id, "reference id")?;
        let path = format!(
            "{}?checkout_reference={}",
            CHECKOUTS_PATH,
            utf8_percent_encode(reference_id, COMPONENT)
        );
        self.send(HttpRequest::new(HttpMethod::Get, path)).await
    }

    /// Deactivates a checkout.
    #[instrument(skip(self))]
    pub async fn delete(&self, checkout_id: &str) -> SumUpResult<Response> {
        require(checkout_id, "checkout id")?;
        self.send(HttpRequest::new(HttpMethod::Delete, checkout_path(checkout_id)))
            .await
    }

    /// Pays a checkout with a tokenized card of a customer.
    #[instrument(skip(self, card_token))]
    pub async fn pay(
        &self,
        checkout_id: &str,
        customer_id: &str,
        card_token: &str,
        installments: u32,
    ) -> SumUpResult<Response> {
        require(checkout_id, "checkout id")?;
        require(customer_id, "customer id")?;
        require(card_token, "card token")?;
        if installments == 0 {
            return Err(SumUpError::missing_argument("installments"));
        }

        let body = json!({
            "payment_type": "card",
            "customer_id": customer_id,
            "token": card_token,
            "installments": installments,
        });
        self.send(HttpRequest::new(HttpMethod::Put, checkout_path(checkout_id)).with_body(body))
            .await
    }

    async fn send(&self, request: HttpRequest) -> SumUpResult<Response> {
        let request = request.with_headers(authorized_headers(&self.access_token));
        self.transport.send(request).await
    }
}
