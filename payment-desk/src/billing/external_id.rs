use chrono::Utc;
use std::sync::atomic::{AtomicI64, Ordering};

pub const EXTERNAL_ID_PREFIX: &str = "levo-hotel-booking-id-";

static LAST_ISSUED_MILLIS: AtomicI64 = AtomicI64::new(0);

/// Unix milliseconds, bumped past the last value handed out so two calls in the same
/// millisecond still differ.
fn next_timestamp_millis() -> i64 {
    let now = Utc::now().timestamp_millis();
    let mut last = LAST_ISSUED_MILLIS.load(Ordering::Relaxed);
    loop {
        let candidate = now.max(last + 1);
        match LAST_ISSUED_MILLIS.compare_exchange_weak(
            last,
            candidate,
            Ordering::AcqRel,
            Ordering::Relaxed,
        ) {
            Ok(_) => return candidate,
            Err(actual) => last = actual,
        }
    }
}

/// External id for the payment provider: the booking id when one was looked up,
/// otherwise a unique timestamp.
pub fn external_id(booking_id: Option<&str>) -> String {
    match booking_id.map(str::trim).filter(|id| !id.is_empty()) {
        Some(id) => format!("{}{}", EXTERNAL_ID_PREFIX, id),
        None => format!("{}{}", EXTERNAL_ID_PREFIX, next_timestamp_millis()),
    }
}
