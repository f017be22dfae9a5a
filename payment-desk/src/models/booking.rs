//! Booking record as returned by the Booking Lookup API.
//!
//! The upstream shape is not under our control, so every field is optional and
//! decoding never fails on a shape mismatch: objects that don't fit decode as their
//! default, lists that are not arrays decode as empty, and monetary leaves are kept
//! as raw JSON for the billing code to coerce.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct BookingRecord {
    #[serde(rename = "Reservations", deserialize_with = "lenient")]
    pub reservations: Option<Reservations>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Reservations {
    #[serde(rename = "Reservation", deserialize_with = "lenient_list")]
    pub reservation: Vec<Reservation>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Reservation {
    #[serde(rename = "FirstName")]
    pub first_name: Option<Value>,
    #[serde(rename = "LastName")]
    pub last_name: Option<Value>,
    #[serde(rename = "BookingTran", deserialize_with = "lenient_list")]
    pub booking_tran: Vec<BookingTransaction>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct BookingTransaction {
    #[serde(rename = "TotalAmountAfterTax")]
    pub total_amount_after_tax: Option<Value>,
    #[serde(rename = "TotalPayment")]
    pub total_payment: Option<Value>,
    #[serde(rename = "RateplanName")]
    pub rateplan_name: Option<Value>,
    #[serde(rename = "ExtraCharge", deserialize_with = "lenient_list")]
    pub extra_charge: Vec<ExtraCharge>,
}

/// One extra charge line. Fields other than `AmountAfterTax` are kept verbatim so the
/// front end can show whatever the booking engine sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtraCharge {
    #[serde(
        rename = "AmountAfterTax",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub amount_after_tax: Option<Value>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl BookingRecord {
    /// Decode an already-parsed response body. Anything that is not an object yields an
    /// empty record.
    pub fn from_json(value: Value) -> Self {
        serde_json::from_value(value).unwrap_or_default()
    }

    /// First transaction of the first reservation, with its reservation.
    pub fn first_transaction(&self) -> Option<(&Reservation, &BookingTransaction)> {
        let reservation = self.reservations.as_ref()?.reservation.first()?;
        let transaction = reservation.booking_tran.first()?;
        Some((reservation, transaction))
    }
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => items
            .into_iter()
            .map(|item| serde_json::from_value(item).unwrap_or_default())
            .collect(),
        _ => Vec::new(),
    })
}
