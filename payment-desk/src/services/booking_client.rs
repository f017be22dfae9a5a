//! Booking Lookup API client.

use crate::config::UpstreamSettings;
use crate::error::DeskError;
use crate::models::BookingRecord;
use reqwest::Client;
use serde::Serialize;
use service_core::observability::TracedClientExt;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BookingLookupRequest<'a> {
    booking_id: &'a str,
}

#[derive(Clone)]
pub struct BookingClient {
    client: Client,
    settings: UpstreamSettings,
}

impl BookingClient {
    pub fn new(settings: UpstreamSettings) -> Self {
        Self {
            client: Client::new(),
            settings,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.settings.base_url
    }

    /// Fetch the booking record for `booking_id`. One request, no retry.
    pub async fn fetch_booking(
        &self,
        booking_id: &str,
        request_id: Option<&str>,
    ) -> Result<BookingRecord, DeskError> {
        let url = self.settings.endpoint("/booking");

        let response = self
            .client
            .traced_post(&url)
            .json(&BookingLookupRequest { booking_id })
            .send_with_request_id(request_id)
            .await
            .map_err(|e| {
                tracing::error!(url = %url, error = %e, "Booking lookup request failed");
                DeskError::Network(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(
                booking_id = %booking_id,
                status = %status,
                "Booking API returned an error status"
            );
            return Err(DeskError::LookupFailed(
                "Failed to fetch reservation data.".to_string(),
            ));
        }

        let body = response.text().await?;
        let value: serde_json::Value = serde_json::from_str(&body).map_err(|e| {
            tracing::error!(booking_id = %booking_id, error = %e, "Booking API returned invalid JSON");
            DeskError::LookupFailed("Failed to fetch reservation data.".to_string())
        })?;

        tracing::debug!(booking_id = %booking_id, "Booking record received");
        Ok(BookingRecord::from_json(value))
    }
}
