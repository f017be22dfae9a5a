//! Per-visitor form sessions.
//!
//! Each session is a small state machine over the lookup → payment-link flow. At most
//! one upstream call is in flight per session, and a call's result only lands if the
//! session is still waiting for that exact call.

pub mod state;
pub mod store;

pub use state::{FormSession, FormState, Lookup, SessionSnapshot, Ticket};
pub use store::SessionStore;
