//! Wire types for the Payment Link API.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Body of `POST /payment-link`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentLinkRequest {
    pub external_id: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    pub description: String,
    pub customer: Customer,
    pub items: Vec<LineItem>,
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Customer {
    pub given_names: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineItem {
    pub name: String,
    pub quantity: u32,
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
    pub category: String,
    pub url: String,
}

/// Successful response of `POST /payment-link`. Only `invoice_url` is required by the
/// desk; the rest is surfaced when the provider sends it.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentLinkResponse {
    #[serde(default)]
    pub invoice_url: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub expiry_date: Option<String>,
}

/// A created hosted payment link, as returned to desk clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentLink {
    pub external_id: String,
    pub invoice_url: String,
    pub amount: Decimal,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<String>,
}
