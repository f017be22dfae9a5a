pub mod billing;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;
pub mod session;
pub mod startup;

use services::PaymentDesk;
use std::sync::Arc;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub desk: Arc<PaymentDesk>,
}

impl AppState {
    pub fn new(desk: Arc<PaymentDesk>) -> Self {
        Self { desk }
    }
}
