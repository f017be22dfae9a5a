//! Billing derivation: booking record → billing summary → payment-link request.

pub mod amount;
pub mod external_id;
pub mod payment_link;
pub mod summary;

pub use amount::{coerce_decimal, format_money, parse_amount};
pub use external_id::{external_id, EXTERNAL_ID_PREFIX};
pub use payment_link::{
    build_payment_link_request, default_payment_fields, AmountInput, PaymentDefaults,
    PaymentLinkFields, CURRENCY,
};
pub use summary::{compute_billing_summary, BillingSummary};
