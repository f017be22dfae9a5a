//! Payment Link API client.

use crate::config::UpstreamSettings;
use crate::error::DeskError;
use crate::models::{PaymentLinkRequest, PaymentLinkResponse};
use reqwest::Client;
use service_core::observability::TracedClientExt;

#[derive(Clone)]
pub struct PaymentLinkClient {
    client: Client,
    settings: UpstreamSettings,
}

impl PaymentLinkClient {
    pub fn new(settings: UpstreamSettings) -> Self {
        Self {
            client: Client::new(),
            settings,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.settings.base_url
    }

    /// Create a hosted payment link.
    ///
    /// A non-success status aborts without decoding the body; a success without an
    /// `invoice_url` is treated as a failure too.
    pub async fn create_payment_link(
        &self,
        request: &PaymentLinkRequest,
        request_id: Option<&str>,
    ) -> Result<PaymentLinkResponse, DeskError> {
        let url = self.settings.endpoint("/payment-link");

        let response = self
            .client
            .traced_post(&url)
            .json(request)
            .send_with_request_id(request_id)
            .await
            .map_err(|e| {
                tracing::error!(url = %url, error = %e, "Payment link request failed");
                DeskError::Network(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!(
                external_id = %request.external_id,
                status = %status,
                "Payment link API returned an error status"
            );
            return Err(DeskError::PaymentLinkFailed(
                "Failed to create payment link.".to_string(),
            ));
        }

        let body = response.text().await?;
        let created: PaymentLinkResponse = serde_json::from_str(&body).map_err(|e| {
            tracing::error!(external_id = %request.external_id, error = %e, "Payment link API returned invalid JSON");
            DeskError::PaymentLinkFailed("Failed to create payment link.".to_string())
        })?;

        match created.invoice_url.as_deref() {
            Some(invoice_url) if !invoice_url.trim().is_empty() => {
                tracing::info!(
                    external_id = %request.external_id,
                    amount = %request.amount,
                    invoice_url = %invoice_url,
                    "Payment link created"
                );
                Ok(created)
            }
            _ => {
                tracing::error!(external_id = %request.external_id, "Payment link response has no invoice_url");
                Err(DeskError::PaymentLinkFailed(
                    "Payment link response did not include an invoice URL.".to_string(),
                ))
            }
        }
    }
}
