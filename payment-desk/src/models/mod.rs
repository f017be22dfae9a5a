pub mod booking;
pub mod payment_link;

pub use booking::{BookingRecord, BookingTransaction, ExtraCharge, Reservation, Reservations};
pub use payment_link::{
    Customer, LineItem, PaymentLink, PaymentLinkRequest, PaymentLinkResponse,
};
