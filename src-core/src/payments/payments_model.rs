use std::collections::BTreeMap;

use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::money;

/// Wire body for a split payment. Amounts travel as decimal strings; unknown
/// keys anywhere in the body are rejected rather than silently ignored.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SplitPaymentRequest {
    pub total_amount: String,
    #[serde(default)]
    pub allocations: SourceAllocations,
    #[serde(default)]
    pub voucher_allocations: BTreeMap<String, String>,
    #[serde(default)]
    pub restaurant_id: Option<String>,
}

/// The closed set of non-voucher value sources.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SourceAllocations {
    #[serde(default)]
    pub personal: Option<String>,
    #[serde(default)]
    pub cashback: Option<String>,
    #[serde(default)]
    pub credit: Option<String>,
}

/// One voucher's share of an allocation.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VoucherAllocation {
    pub voucher_id: String,
    pub amount: String,
}

/// A parsed, exact-arithmetic allocation request. Transient: nothing is
/// persisted until the commit succeeds. Voucher allocations are held in
/// ascending id order, which is also the debit order.
#[derive(Debug, Clone)]
pub struct AllocationRequest {
    pub total_amount: Decimal,
    pub personal: Decimal,
    pub cashback: Decimal,
    pub credit: Decimal,
    pub vouchers: Vec<(String, Decimal)>,
    pub restaurant_id: Option<String>,
}

impl AllocationRequest {
    /// Parses the wire body. Every amount must be a plain decimal with at
    /// most two decimals; anything else is a malformed request, rejected
    /// before the allocation reason codes apply.
    pub fn parse(wire: &SplitPaymentRequest) -> Result<AllocationRequest> {
        let parse_opt = |raw: &Option<String>| -> Result<Decimal> {
            match raw {
                Some(raw) => money::parse_amount(raw),
                None => Ok(Decimal::ZERO),
            }
        };

        let mut vouchers = Vec::with_capacity(wire.voucher_allocations.len());
        for (voucher_id, raw) in &wire.voucher_allocations {
            vouchers.push((voucher_id.clone(), money::parse_amount(raw)?));
        }

        Ok(AllocationRequest {
            total_amount: money::parse_amount(&wire.total_amount)?,
            personal: parse_opt(&wire.allocations.personal)?,
            cashback: parse_opt(&wire.allocations.cashback)?,
            credit: parse_opt(&wire.allocations.credit)?,
            vouchers,
            restaurant_id: wire.restaurant_id.clone(),
        })
    }

    /// Sum of every allocated source in integer minor units.
    pub fn allocated_minor_units(&self) -> i64 {
        money::minor_units(self.personal)
            + money::minor_units(self.cashback)
            + money::minor_units(self.credit)
            + self
                .vouchers
                .iter()
                .map(|(_, amount)| money::minor_units(*amount))
                .sum::<i64>()
    }
}

/// Issued on a successful commit; immutable except for `redeemed_at`, which
/// the external settlement flow stamps.
#[derive(
    Queryable, Identifiable, Selectable, PartialEq, Serialize, Deserialize, Debug, Clone,
)]
#[diesel(table_name = crate::schema::payment_codes)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct PaymentCode {
    pub id: String,
    pub code: String,
    pub customer_id: String,
    pub restaurant_id: Option<String>,
    pub total_amount: String,
    pub personal_amount: String,
    pub cashback_amount: String,
    pub credit_amount: String,
    pub voucher_breakdown: String,
    pub created_at: String,
    pub redeemed_at: Option<String>,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::payment_codes)]
pub struct NewPaymentCode {
    pub id: String,
    pub code: String,
    pub customer_id: String,
    pub restaurant_id: Option<String>,
    pub total_amount: String,
    pub personal_amount: String,
    pub cashback_amount: String,
    pub credit_amount: String,
    pub voucher_breakdown: String,
    pub created_at: String,
    pub redeemed_at: Option<String>,
}

/// Per-source breakdown as returned to the caller.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AllocationBreakdown {
    pub personal: String,
    pub cashback: String,
    pub credit: String,
    pub vouchers: Vec<VoucherAllocation>,
}

/// Payment code as shown to the caller, with the stored breakdown column
/// unpacked.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentCodeDetails {
    pub code: String,
    pub customer_id: String,
    pub restaurant_id: Option<String>,
    pub total_amount: String,
    pub breakdown: AllocationBreakdown,
    pub created_at: String,
    pub redeemed_at: Option<String>,
}

impl PaymentCode {
    pub fn into_details(self) -> Result<PaymentCodeDetails> {
        let vouchers: Vec<VoucherAllocation> = serde_json::from_str(&self.voucher_breakdown)?;
        Ok(PaymentCodeDetails {
            code: self.code,
            customer_id: self.customer_id,
            restaurant_id: self.restaurant_id,
            total_amount: self.total_amount,
            breakdown: AllocationBreakdown {
                personal: self.personal_amount,
                cashback: self.cashback_amount,
                credit: self.credit_amount,
                vouchers,
            },
            created_at: self.created_at,
            redeemed_at: self.redeemed_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn wire(total: &str, personal: Option<&str>, vouchers: &[(&str, &str)]) -> SplitPaymentRequest {
        SplitPaymentRequest {
            total_amount: total.to_string(),
            allocations: SourceAllocations {
                personal: personal.map(str::to_string),
                cashback: None,
                credit: None,
            },
            voucher_allocations: vouchers
                .iter()
                .map(|(id, amount)| (id.to_string(), amount.to_string()))
                .collect(),
            restaurant_id: None,
        }
    }

    #[test]
    fn parses_and_orders_voucher_allocations() {
        let parsed = AllocationRequest::parse(&wire(
            "60.00",
            Some("10.00"),
            &[("v2", "30.00"), ("v1", "20.00")],
        ))
        .unwrap();
        assert_eq!(parsed.personal, dec!(10.00));
        assert_eq!(
            parsed.vouchers,
            vec![
                ("v1".to_string(), dec!(20.00)),
                ("v2".to_string(), dec!(30.00))
            ]
        );
        assert_eq!(parsed.allocated_minor_units(), 6000);
    }

    #[test]
    fn rejects_sub_cent_allocations() {
        assert!(AllocationRequest::parse(&wire("10.00", Some("10.005"), &[])).is_err());
    }

    #[test]
    fn unknown_allocation_keys_are_rejected_on_the_wire() {
        let raw = r#"{
            "totalAmount": "10.00",
            "allocations": {"personal": "10.00", "points": "5.00"}
        }"#;
        assert!(serde_json::from_str::<SplitPaymentRequest>(raw).is_err());
    }

    #[test]
    fn missing_sections_default_to_zero() {
        let raw = r#"{"totalAmount": "5.00"}"#;
        let wire: SplitPaymentRequest = serde_json::from_str(raw).unwrap();
        let parsed = AllocationRequest::parse(&wire).unwrap();
        assert_eq!(parsed.personal, Decimal::ZERO);
        assert_eq!(parsed.allocated_minor_units(), 0);
    }
}
