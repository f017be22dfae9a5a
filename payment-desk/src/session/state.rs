use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::billing::{BillingSummary, PaymentDefaults};
use crate::error::DeskError;
use crate::models::{PaymentLink, PaymentLinkRequest};

/// A successful booking lookup: the derived summary and the form defaults.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Lookup {
    pub booking_id: String,
    pub summary: BillingSummary,
    pub defaults: PaymentDefaults,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum FormState {
    Idle,
    LookingUp {
        booking_id: String,
    },
    LookupSucceeded {
        lookup: Lookup,
    },
    LookupFailed {
        booking_id: String,
        error: String,
    },
    CreatingLink {
        lookup: Option<Lookup>,
        external_id: String,
    },
    LinkCreated {
        lookup: Option<Lookup>,
        link: PaymentLink,
    },
    LinkFailed {
        lookup: Option<Lookup>,
        error: String,
    },
}

impl FormState {
    /// Name of the upstream call currently outstanding, if any.
    pub fn in_flight(&self) -> Option<&'static str> {
        match self {
            FormState::LookingUp { .. } => Some("lookup"),
            FormState::CreatingLink { .. } => Some("payment link"),
            _ => None,
        }
    }

    /// The lookup the form is currently built on.
    pub fn lookup(&self) -> Option<&Lookup> {
        match self {
            FormState::LookupSucceeded { lookup } => Some(lookup),
            FormState::CreatingLink { lookup, .. }
            | FormState::LinkCreated { lookup, .. }
            | FormState::LinkFailed { lookup, .. } => lookup.as_ref(),
            FormState::Idle | FormState::LookingUp { .. } | FormState::LookupFailed { .. } => {
                None
            }
        }
    }
}

/// Proof that the holder started the session's current upstream call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    attempt: u64,
}

#[derive(Debug, Clone)]
pub struct FormSession {
    id: Uuid,
    state: FormState,
    attempt: u64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub session_id: Uuid,
    #[serde(flatten)]
    pub state: FormState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FormSession {
    pub fn new(id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id,
            state: FormState::Idle,
            attempt: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.id,
            state: self.state.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    fn transition(&mut self, state: FormState) {
        self.state = state;
        self.updated_at = Utc::now();
    }

    fn next_ticket(&mut self) -> Ticket {
        self.attempt += 1;
        Ticket {
            attempt: self.attempt,
        }
    }

    fn ensure_idle(&self) -> Result<(), DeskError> {
        match self.state.in_flight() {
            Some(action) => Err(DeskError::Busy { action }),
            None => Ok(()),
        }
    }

    /// Start a lookup. Whatever the form held before is dropped.
    pub fn begin_lookup(&mut self, booking_id: &str) -> Result<Ticket, DeskError> {
        self.ensure_idle()?;
        let ticket = self.next_ticket();
        self.transition(FormState::LookingUp {
            booking_id: booking_id.to_string(),
        });
        Ok(ticket)
    }

    /// Apply a lookup result. Returns `false` when the ticket is stale and nothing changed.
    pub fn finish_lookup(&mut self, ticket: Ticket, outcome: Result<Lookup, String>) -> bool {
        let booking_id = match &self.state {
            FormState::LookingUp { booking_id } if ticket.attempt == self.attempt => {
                booking_id.clone()
            }
            _ => return false,
        };

        let next = match outcome {
            Ok(lookup) => FormState::LookupSucceeded { lookup },
            Err(error) => FormState::LookupFailed { booking_id, error },
        };
        self.transition(next);
        true
    }

    /// Build the payment-link request from the current lookup (if any) and start the
    /// call. A rejected build leaves the session untouched.
    pub fn begin_payment_link<F>(
        &mut self,
        build: F,
    ) -> Result<(Ticket, PaymentLinkRequest), DeskError>
    where
        F: FnOnce(Option<&Lookup>) -> Result<PaymentLinkRequest, DeskError>,
    {
        self.ensure_idle()?;
        let request = build(self.state.lookup())?;

        let lookup = self.state.lookup().cloned();
        let ticket = self.next_ticket();
        self.transition(FormState::CreatingLink {
            lookup,
            external_id: request.external_id.clone(),
        });
        Ok((ticket, request))
    }

    /// Apply a payment-link result. Returns `false` when the ticket is stale.
    pub fn finish_payment_link(
        &mut self,
        ticket: Ticket,
        outcome: Result<PaymentLink, String>,
    ) -> bool {
        let lookup = match &self.state {
            FormState::CreatingLink { lookup, .. } if ticket.attempt == self.attempt => {
                lookup.clone()
            }
            _ => return false,
        };

        let next = match outcome {
            Ok(link) => FormState::LinkCreated { lookup, link },
            Err(error) => FormState::LinkFailed { lookup, error },
        };
        self.transition(next);
        true
    }

    /// Back to an empty form. Outstanding tickets become stale.
    pub fn reset(&mut self) {
        self.attempt += 1;
        self.transition(FormState::Idle);
    }
}
