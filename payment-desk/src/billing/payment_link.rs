use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::amount::{format_money, parse_amount};
use super::external_id::external_id;
use super::summary::BillingSummary;
use crate::error::DeskError;
use crate::models::{Customer, LineItem, PaymentLinkRequest};

pub const CURRENCY: &str = "PHP";
pub const LINE_ITEM_NAME: &str = "Levo Hotel Room Accommodation";
pub const LINE_ITEM_CATEGORY: &str = "Room Accommodation";
pub const LINE_ITEM_URL: &str = "https://www.levohotel.com";

/// Pre-filled, user-editable payment-link form values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentDefaults {
    pub amount: String,
    pub description: String,
}

/// The amount always defaults to the balance, sign preserved; a zero balance means
/// nothing is owed and the user has to type an amount in.
pub fn default_payment_fields(summary: &BillingSummary, booking_id: &str) -> PaymentDefaults {
    PaymentDefaults {
        amount: format_money(summary.balance),
        description: format!(
            "{} {} booking no: {}",
            summary.first_name, summary.last_name, booking_id
        ),
    }
}

/// Amount as typed into the form or as a number.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
    Text(String),
    Value(Decimal),
}

impl AmountInput {
    pub fn parse(&self) -> Option<Decimal> {
        match self {
            AmountInput::Text(raw) => parse_amount(raw),
            AmountInput::Value(amount) => Some(*amount),
        }
    }
}

impl From<&str> for AmountInput {
    fn from(raw: &str) -> Self {
        AmountInput::Text(raw.to_string())
    }
}

impl From<String> for AmountInput {
    fn from(raw: String) -> Self {
        AmountInput::Text(raw)
    }
}

impl From<Decimal> for AmountInput {
    fn from(amount: Decimal) -> Self {
        AmountInput::Value(amount)
    }
}

/// Current form fields at submission time.
#[derive(Debug, Clone, Validate)]
pub struct PaymentLinkFields {
    #[validate(custom(function = "not_blank"))]
    pub first_name: String,
    #[validate(custom(function = "not_blank"))]
    pub last_name: String,
    #[validate(custom(function = "not_blank"))]
    pub description: String,
    pub amount: AmountInput,
    /// Set when the link follows a booking lookup.
    pub booking_id: Option<String>,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

pub fn build_payment_link_request(
    fields: &PaymentLinkFields,
) -> Result<PaymentLinkRequest, DeskError> {
    fields.validate().map_err(|e| {
        tracing::debug!(errors = %e, "Payment link fields rejected");
        DeskError::Validation("missing identity/description fields".to_string())
    })?;

    let amount = fields
        .amount
        .parse()
        .filter(|amount| amount.is_sign_positive() && !amount.is_zero())
        .ok_or_else(|| DeskError::Validation("amount must be greater than zero".to_string()))?;

    Ok(PaymentLinkRequest {
        external_id: external_id(fields.booking_id.as_deref()),
        amount,
        description: fields.description.clone(),
        customer: Customer {
            given_names: format!("{} {}", fields.first_name, fields.last_name),
        },
        items: vec![LineItem {
            name: LINE_ITEM_NAME.to_string(),
            quantity: 1,
            price: amount,
            category: LINE_ITEM_CATEGORY.to_string(),
            url: LINE_ITEM_URL.to_string(),
        }],
        currency: CURRENCY.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::billing::EXTERNAL_ID_PREFIX;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn fields(amount: impl Into<AmountInput>) -> PaymentLinkFields {
        PaymentLinkFields {
            first_name: "Ana".to_string(),
            last_name: "Reyes".to_string(),
            description: "Ana Reyes booking no: 7781".to_string(),
            amount: amount.into(),
            booking_id: Some("7781".to_string()),
        }
    }

    fn summary(balance: &str) -> BillingSummary {
        BillingSummary {
            first_name: "Ana".to_string(),
            last_name: "Reyes".to_string(),
            subtotal: dec("1000"),
            extra_charges_total: Decimal::ZERO,
            total_amount: dec("1000"),
            total_payment: dec("1000") - dec(balance),
            balance: dec(balance),
            extra_charge_details: Vec::new(),
            rate_plan_name: None,
        }
    }

    #[test]
    fn defaults_use_balance_and_booking_details() {
        let defaults = default_payment_fields(&summary("750"), "7781");
        assert_eq!(defaults.amount, "750.00");
        assert_eq!(defaults.description, "Ana Reyes booking no: 7781");
    }

    #[test]
    fn defaults_keep_zero_and_negative_balances() {
        assert_eq!(default_payment_fields(&summary("0"), "1").amount, "0.00");
        assert_eq!(default_payment_fields(&summary("-200"), "1").amount, "-200.00");
    }

    #[test]
    fn builds_request_for_looked_up_booking() {
        let request = build_payment_link_request(&fields("750.00")).unwrap();

        assert_eq!(request.external_id, "levo-hotel-booking-id-7781");
        assert_eq!(request.amount, dec("750"));
        assert_eq!(request.description, "Ana Reyes booking no: 7781");
        assert_eq!(request.customer.given_names, "Ana Reyes");
        assert_eq!(request.currency, "PHP");
        assert_eq!(request.items.len(), 1);

        let item = &request.items[0];
        assert_eq!(item.name, "Levo Hotel Room Accommodation");
        assert_eq!(item.quantity, 1);
        assert_eq!(item.price, request.amount);
        assert_eq!(item.category, "Room Accommodation");
        assert_eq!(item.url, "https://www.levohotel.com");
    }

    #[test]
    fn serializes_upstream_field_names() {
        let request = build_payment_link_request(&fields("99.50")).unwrap();
        let body = serde_json::to_value(&request).unwrap();

        assert_eq!(body["externalId"], "levo-hotel-booking-id-7781");
        assert_eq!(body["amount"], "99.50");
        assert_eq!(body["customer"]["given_names"], "Ana Reyes");
        assert_eq!(body["items"][0]["price"], "99.50");
        assert_eq!(body["currency"], "PHP");
    }

    #[test]
    fn rejects_non_positive_or_unparsable_amounts() {
        for amount in ["0", "0.00", "", "   ", "abc", "-10", "1.2.3", "1_000"] {
            let err = build_payment_link_request(&fields(amount)).unwrap_err();
            assert!(
                matches!(err, DeskError::Validation(ref m) if m == "amount must be greater than zero"),
                "amount {:?} should be rejected",
                amount
            );
        }
        assert!(build_payment_link_request(&fields(Decimal::ZERO)).is_err());
    }

    #[test]
    fn accepts_smallest_positive_amount() {
        let request = build_payment_link_request(&fields("0.01")).unwrap();
        assert_eq!(request.amount, dec("0.01"));

        let request = build_payment_link_request(&fields(dec("12.5"))).unwrap();
        assert_eq!(request.amount, dec("12.5"));
    }

    #[test]
    fn rejects_blank_identity_or_description_before_amount() {
        let mut missing_first = fields("100");
        missing_first.first_name = String::new();
        let mut missing_last = fields("0");
        missing_last.last_name = "  ".to_string();
        let mut missing_description = fields("100");
        missing_description.description = String::new();

        for f in [missing_first, missing_last, missing_description] {
            let err = build_payment_link_request(&f).unwrap_err();
            assert!(
                matches!(err, DeskError::Validation(ref m) if m == "missing identity/description fields")
            );
        }
    }

    #[test]
    fn ad_hoc_links_get_timestamp_ids() {
        let mut first = fields("100");
        first.booking_id = None;
        let second = first.clone();

        let a = build_payment_link_request(&first).unwrap().external_id;
        let b = build_payment_link_request(&second).unwrap().external_id;

        for id in [&a, &b] {
            let suffix = id.strip_prefix(EXTERNAL_ID_PREFIX).unwrap();
            assert!(suffix.chars().all(|c| c.is_ascii_digit()));
        }
        assert_ne!(a, b);
    }

    #[test]
    fn amount_input_accepts_strings_and_numbers() {
        let text: AmountInput = serde_json::from_value(serde_json::json!("10.25")).unwrap();
        let number: AmountInput = serde_json::from_value(serde_json::json!(10.25)).unwrap();
        assert_eq!(text.parse(), Some(dec("10.25")));
        assert_eq!(number.parse(), Some(dec("10.25")));
    }
}
