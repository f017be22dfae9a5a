pub mod app;
pub mod lookup;
pub mod metrics;
pub mod payment_link;
pub mod sessions;
