use chrono::{Duration, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use uuid::Uuid;

use super::state::{FormSession, Lookup, SessionSnapshot, Ticket};
use crate::error::DeskError;
use crate::models::{PaymentLink, PaymentLinkRequest};

/// In-memory form sessions. Entry guards are only held inside these synchronous
/// methods, never across an upstream call.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<DashMap<Uuid, FormSession>>,
    idle_timeout: Duration,
}

impl SessionStore {
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
            idle_timeout,
        }
    }

    /// Open a new, empty form session. Sessions idle for longer than the timeout are
    /// dropped first.
    pub fn create(&self) -> SessionSnapshot {
        let pruned = self.prune_idle();
        if pruned > 0 {
            tracing::debug!(pruned, "Evicted idle form sessions");
        }

        let session = FormSession::new(Uuid::new_v4());
        let snapshot = session.snapshot();
        self.sessions.insert(session.id(), session);
        snapshot
    }

    pub fn snapshot(&self, id: Uuid) -> Result<SessionSnapshot, DeskError> {
        self.sessions
            .get(&id)
            .map(|session| session.snapshot())
            .ok_or(DeskError::SessionNotFound(id))
    }

    pub fn reset(&self, id: Uuid) -> Result<SessionSnapshot, DeskError> {
        self.with_session(id, |session| {
            session.reset();
            Ok(session.snapshot())
        })
    }

    pub fn remove(&self, id: Uuid) -> Result<(), DeskError> {
        self.sessions
            .remove(&id)
            .map(|_| ())
            .ok_or(DeskError::SessionNotFound(id))
    }

    pub fn begin_lookup(&self, id: Uuid, booking_id: &str) -> Result<Ticket, DeskError> {
        self.with_session(id, |session| session.begin_lookup(booking_id))
    }

    /// Returns whether the outcome was applied; a removed session counts as stale.
    pub fn finish_lookup(&self, id: Uuid, ticket: Ticket, outcome: Result<Lookup, String>) -> bool {
        self.sessions
            .get_mut(&id)
            .map(|mut session| session.finish_lookup(ticket, outcome))
            .unwrap_or(false)
    }

    pub fn begin_payment_link<F>(
        &self,
        id: Uuid,
        build: F,
    ) -> Result<(Ticket, PaymentLinkRequest), DeskError>
    where
        F: FnOnce(Option<&Lookup>) -> Result<PaymentLinkRequest, DeskError>,
    {
        self.with_session(id, |session| session.begin_payment_link(build))
    }

    pub fn finish_payment_link(
        &self,
        id: Uuid,
        ticket: Ticket,
        outcome: Result<PaymentLink, String>,
    ) -> bool {
        self.sessions
            .get_mut(&id)
            .map(|mut session| session.finish_payment_link(ticket, outcome))
            .unwrap_or(false)
    }

    /// Drop sessions untouched for longer than the idle timeout, keeping any with a
    /// call still in flight.
    pub fn prune_idle(&self) -> usize {
        let cutoff = Utc::now() - self.idle_timeout;
        let before = self.sessions.len();
        self.sessions.retain(|_, session| {
            session.updated_at() >= cutoff || session.state().in_flight().is_some()
        });
        before.saturating_sub(self.sessions.len())
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    fn with_session<T>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut FormSession) -> Result<T, DeskError>,
    ) -> Result<T, DeskError> {
        let mut session = self
            .sessions
            .get_mut(&id)
            .ok_or(DeskError::SessionNotFound(id))?;
        f(&mut session)
    }
}
