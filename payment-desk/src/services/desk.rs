//! Drives one form session through lookup and payment-link creation.

use serde::Deserialize;
use uuid::Uuid;

use super::metrics::{record_lookup, record_payment_link};
use super::{BookingClient, PaymentLinkClient};
use crate::billing::{
    build_payment_link_request, compute_billing_summary, default_payment_fields, AmountInput,
    PaymentLinkFields,
};
use crate::error::DeskError;
use crate::models::PaymentLink;
use crate::session::{Lookup, SessionStore};

/// Payment-link form as submitted. Omitted fields fall back to the session's lookup.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentLinkForm {
    #[serde(default, alias = "firstName")]
    pub first_name: Option<String>,
    #[serde(default, alias = "lastName")]
    pub last_name: Option<String>,
    #[serde(default)]
    pub amount: Option<AmountInput>,
    #[serde(default)]
    pub description: Option<String>,
}

impl PaymentLinkForm {
    fn resolve(self, lookup: Option<&Lookup>) -> PaymentLinkFields {
        let summary = lookup.map(|l| &l.summary);
        let defaults = lookup.map(|l| &l.defaults);

        PaymentLinkFields {
            first_name: self
                .first_name
                .or_else(|| summary.map(|s| s.first_name.clone()))
                .unwrap_or_default(),
            last_name: self
                .last_name
                .or_else(|| summary.map(|s| s.last_name.clone()))
                .unwrap_or_default(),
            description: self
                .description
                .or_else(|| defaults.map(|d| d.description.clone()))
                .unwrap_or_default(),
            amount: self
                .amount
                .or_else(|| defaults.map(|d| AmountInput::Text(d.amount.clone())))
                .unwrap_or_else(|| AmountInput::Text(String::new())),
            booking_id: lookup.map(|l| l.booking_id.clone()),
        }
    }
}

pub struct PaymentDesk {
    bookings: BookingClient,
    payment_links: PaymentLinkClient,
    sessions: SessionStore,
}

impl PaymentDesk {
    pub fn new(
        bookings: BookingClient,
        payment_links: PaymentLinkClient,
        sessions: SessionStore,
    ) -> Self {
        Self {
            bookings,
            payment_links,
            sessions,
        }
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Look up a booking for the session and derive its billing summary.
    ///
    /// The upstream call runs on its own task, so the session always leaves `looking_up`
    /// even if the caller goes away. The result is returned to the caller even when the
    /// session moved on in the meantime; it is only stored if the session was still
    /// waiting for it.
    pub async fn lookup(
        &self,
        session_id: Uuid,
        booking_id: &str,
        request_id: Option<&str>,
    ) -> Result<Lookup, DeskError> {
        self.sessions.snapshot(session_id)?;

        let booking_id = booking_id.trim();
        if booking_id.is_empty() {
            return Err(DeskError::Validation("Booking ID is required.".to_string()));
        }

        let ticket = self.sessions.begin_lookup(session_id, booking_id)?;
        tracing::info!(session_id = %session_id, booking_id = %booking_id, "Looking up booking");

        let bookings = self.bookings.clone();
        let sessions = self.sessions.clone();
        let booking_id = booking_id.to_string();
        let request_id = request_id.map(str::to_string);

        let call = tokio::spawn(async move {
            let result = fetch_lookup(&bookings, &booking_id, request_id.as_deref()).await;
            record_lookup(match &result {
                Ok(_) => "success",
                Err(e) => e.kind(),
            });

            let applied = sessions.finish_lookup(
                session_id,
                ticket,
                result.as_ref().cloned().map_err(ToString::to_string),
            );
            if !applied {
                tracing::warn!(
                    session_id = %session_id,
                    booking_id = %booking_id,
                    "Session changed while lookup was in flight; result not applied"
                );
            }

            if let Err(e) = &result {
                tracing::warn!(booking_id = %booking_id, error = %e, kind = e.kind(), "Booking lookup failed");
            }
            result
        });

        call.await.unwrap_or_else(|e| {
            tracing::error!(session_id = %session_id, error = %e, "Lookup task aborted");
            let err = DeskError::LookupFailed("Failed to fetch reservation data.".to_string());
            self.sessions
                .finish_lookup(session_id, ticket, Err(err.to_string()));
            Err(err)
        })
    }

    /// Create a hosted payment link from the submitted form, filling gaps from the
    /// session's lookup. Like lookups, the upstream call outlives a dropped request.
    pub async fn create_payment_link(
        &self,
        session_id: Uuid,
        form: PaymentLinkForm,
        request_id: Option<&str>,
    ) -> Result<PaymentLink, DeskError> {
        let (ticket, request) = self
            .sessions
            .begin_payment_link(session_id, |lookup| {
                build_payment_link_request(&form.resolve(lookup))
            })
            .map_err(|e| {
                if matches!(e, DeskError::Validation(_)) {
                    record_payment_link(e.kind());
                }
                e
            })?;

        tracing::info!(
            session_id = %session_id,
            external_id = %request.external_id,
            amount = %request.amount,
            "Creating payment link"
        );

        let payment_links = self.payment_links.clone();
        let sessions = self.sessions.clone();
        let request_id = request_id.map(str::to_string);

        let call = tokio::spawn(async move {
            let result = payment_links
                .create_payment_link(&request, request_id.as_deref())
                .await
                .map(|created| PaymentLink {
                    external_id: request.external_id.clone(),
                    invoice_url: created.invoice_url.unwrap_or_default(),
                    amount: request.amount,
                    description: request.description.clone(),
                    invoice_id: created.id,
                    status: created.status,
                    expiry_date: created.expiry_date,
                });
            record_payment_link(match &result {
                Ok(_) => "success",
                Err(e) => e.kind(),
            });

            let applied = sessions.finish_payment_link(
                session_id,
                ticket,
                result.as_ref().cloned().map_err(ToString::to_string),
            );
            if !applied {
                tracing::warn!(
                    session_id = %session_id,
                    external_id = %request.external_id,
                    "Session changed while payment link was in flight; result not applied"
                );
            }
            result
        });

        call.await.unwrap_or_else(|e| {
            tracing::error!(session_id = %session_id, error = %e, "Payment link task aborted");
            let err = DeskError::PaymentLinkFailed("Failed to create payment link.".to_string());
            self.sessions
                .finish_payment_link(session_id, ticket, Err(err.to_string()));
            Err(err)
        })
    }
}

async fn fetch_lookup(
    bookings: &BookingClient,
    booking_id: &str,
    request_id: Option<&str>,
) -> Result<Lookup, DeskError> {
    let record = bookings.fetch_booking(booking_id, request_id).await?;
    let summary = compute_billing_summary(&record)?;
    let defaults = default_payment_fields(&summary, booking_id);

    tracing::info!(
        booking_id = %booking_id,
        total_amount = %summary.total_amount,
        balance = %summary.balance,
        "Billing summary derived"
    );

    Ok(Lookup {
        booking_id: booking_id.to_string(),
        summary,
        defaults,
    })
}
