use rust_decimal::Decimal;
use serde::Serialize;

use super::amount::{coerce_decimal, coerce_text, money_scale};
use crate::error::DeskError;
use crate::models::{BookingRecord, ExtraCharge};

/// Billing view of one reservation.
///
/// `total_amount` is always `subtotal + extra_charges_total` and `balance` is always
/// `total_amount - total_payment`; both are derived once here and never edited.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BillingSummary {
    pub first_name: String,
    pub last_name: String,
    pub subtotal: Decimal,
    pub extra_charges_total: Decimal,
    pub total_amount: Decimal,
    pub total_payment: Decimal,
    /// Negative when the guest has overpaid.
    pub balance: Decimal,
    pub extra_charge_details: Vec<ExtraCharge>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_plan_name: Option<String>,
}

pub fn compute_billing_summary(record: &BookingRecord) -> Result<BillingSummary, DeskError> {
    let (reservation, transaction) = record
        .first_transaction()
        .ok_or_else(|| DeskError::NotFound("No reservation data found".to_string()))?;

    let subtotal = coerce_decimal(transaction.total_amount_after_tax.as_ref());
    let total_payment = coerce_decimal(transaction.total_payment.as_ref());
    let extra_charges_total = transaction
        .extra_charge
        .iter()
        .map(|charge| coerce_decimal(charge.amount_after_tax.as_ref()))
        .fold(Decimal::ZERO, |sum, amount| sum.saturating_add(amount));

    let total_amount = subtotal.saturating_add(extra_charges_total);
    let balance = total_amount.saturating_sub(total_payment);

    Ok(BillingSummary {
        first_name: coerce_text(reservation.first_name.as_ref()).unwrap_or_default(),
        last_name: coerce_text(reservation.last_name.as_ref()).unwrap_or_default(),
        subtotal: money_scale(subtotal),
        extra_charges_total: money_scale(extra_charges_total),
        total_amount: money_scale(total_amount),
        total_payment: money_scale(total_payment),
        balance: money_scale(balance),
        extra_charge_details: transaction.extra_charge.clone(),
        rate_plan_name: coerce_text(transaction.rateplan_name.as_ref()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn record(transaction: Value) -> BookingRecord {
        BookingRecord::from_json(json!({
            "Reservations": { "Reservation": [ {
                "FirstName": "Juan",
                "LastName": "Dela Cruz",
                "BookingTran": [ transaction ]
            } ] }
        }))
    }

    #[test]
    fn derives_totals_and_balance() {
        let summary = compute_billing_summary(&record(json!({
            "TotalAmountAfterTax": "1000.00",
            "TotalPayment": "400.00",
            "RateplanName": "Room Only",
            "ExtraCharge": [ { "AmountAfterTax": "150.00" } ]
        })))
        .unwrap();

        assert_eq!(summary.first_name, "Juan");
        assert_eq!(summary.last_name, "Dela Cruz");
        assert_eq!(summary.subtotal, dec("1000.00"));
        assert_eq!(summary.extra_charges_total, dec("150.00"));
        assert_eq!(summary.total_amount, dec("1150.00"));
        assert_eq!(summary.total_payment, dec("400.00"));
        assert_eq!(summary.balance, dec("750.00"));
        assert_eq!(summary.rate_plan_name.as_deref(), Some("Room Only"));
        assert_eq!(summary.extra_charge_details.len(), 1);
    }

    #[test]
    fn missing_extra_charges_leave_total_equal_to_subtotal() {
        let summary = compute_billing_summary(&record(json!({
            "TotalAmountAfterTax": "2450.75",
            "TotalPayment": "0"
        })))
        .unwrap();

        assert_eq!(summary.extra_charges_total, Decimal::ZERO);
        assert_eq!(summary.total_amount, summary.subtotal);
        assert_eq!(summary.total_amount, dec("2450.75"));
        assert!(summary.extra_charge_details.is_empty());
    }

    #[test]
    fn bad_extra_charge_entries_count_as_zero() {
        let summary = compute_billing_summary(&record(json!({
            "TotalAmountAfterTax": 500,
            "ExtraCharge": [
                { "AmountAfterTax": "100.50" },
                { "AmountAfterTax": "free" },
                { "Description": "no amount" },
                { "AmountAfterTax": 49.5 }
            ]
        })))
        .unwrap();

        assert_eq!(summary.extra_charges_total, dec("150"));
        assert_eq!(summary.total_amount, dec("650"));
        assert_eq!(summary.extra_charge_details.len(), 4);
    }

    #[test]
    fn total_always_matches_its_parts() {
        let charges = ["10", "0.01", "x", "", "-5", "1e2"];
        for n in 0..=charges.len() {
            let extra: Vec<Value> = charges[..n]
                .iter()
                .map(|a| json!({ "AmountAfterTax": a }))
                .collect();
            let summary = compute_billing_summary(&record(json!({
                "TotalAmountAfterTax": "300.10",
                "TotalPayment": "42",
                "ExtraCharge": extra
            })))
            .unwrap();

            let expected_extra: Decimal = summary
                .extra_charge_details
                .iter()
                .map(|c| coerce_decimal(c.amount_after_tax.as_ref()))
                .sum();
            assert_eq!(summary.extra_charges_total, expected_extra);
            assert_eq!(summary.total_amount, summary.subtotal + expected_extra);
            assert_eq!(summary.balance, summary.total_amount - summary.total_payment);
        }
    }

    #[test]
    fn monetary_fields_serialize_with_two_fraction_digits() {
        let summary = compute_billing_summary(&record(json!({
            "TotalAmountAfterTax": "1000.00",
            "TotalPayment": 400
        })))
        .unwrap();

        let body = serde_json::to_value(&summary).unwrap();
        assert_eq!(body["subtotal"], "1000.00");
        assert_eq!(body["extra_charges_total"], "0.00");
        assert_eq!(body["total_amount"], "1000.00");
        assert_eq!(body["total_payment"], "400.00");
        assert_eq!(body["balance"], "600.00");
    }

    #[test]
    fn overpayment_gives_negative_balance() {
        let summary = compute_billing_summary(&record(json!({
            "TotalAmountAfterTax": "800.00",
            "TotalPayment": "1000.00"
        })))
        .unwrap();

        assert_eq!(summary.balance, dec("-200.00"));
    }

    #[test]
    fn unparsable_totals_default_to_zero() {
        let summary = compute_billing_summary(&record(json!({
            "TotalAmountAfterTax": "TBD",
            "TotalPayment": null
        })))
        .unwrap();

        assert_eq!(summary.subtotal, Decimal::ZERO);
        assert_eq!(summary.total_payment, Decimal::ZERO);
        assert_eq!(summary.balance, Decimal::ZERO);
    }

    #[test]
    fn missing_names_default_to_empty() {
        let record = BookingRecord::from_json(json!({
            "Reservations": { "Reservation": [ { "BookingTran": [ {} ] } ] }
        }));
        let summary = compute_billing_summary(&record).unwrap();

        assert_eq!(summary.first_name, "");
        assert_eq!(summary.last_name, "");
        assert!(summary.rate_plan_name.is_none());
    }

    #[test]
    fn no_transaction_is_not_found() {
        let empty_cases = [
            json!({}),
            json!({ "Reservations": {} }),
            json!({ "Reservations": { "Reservation": [] } }),
            json!({ "Reservations": { "Reservation": [ { "FirstName": "A" } ] } }),
            json!({ "Reservations": { "Reservation": [ { "BookingTran": [] } ] } }),
        ];

        for body in empty_cases {
            let err = compute_billing_summary(&BookingRecord::from_json(body)).unwrap_err();
            assert!(matches!(err, DeskError::NotFound(ref msg) if msg == "No reservation data found"));
        }
    }

    #[test]
    fn repeated_derivation_is_identical() {
        let input = record(json!({
            "TotalAmountAfterTax": "1000.00",
            "TotalPayment": "400.00",
            "ExtraCharge": [ { "AmountAfterTax": "150.00", "Code": "EB" } ]
        }));

        let first = compute_billing_summary(&input).unwrap();
        let second = compute_billing_summary(&input).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}
