pub mod booking_client;
pub mod desk;
pub mod metrics;
pub mod payment_link_client;

pub use booking_client::BookingClient;
pub use desk::{PaymentDesk, PaymentLinkForm};
pub use metrics::{get_metrics, init_metrics};
pub use payment_link_client::PaymentLinkClient;
