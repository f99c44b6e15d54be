use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use log::warn;
use rust_decimal::Decimal;

use super::payments_errors::PaymentError;
use super::payments_model::AllocationRequest;
use crate::credits::{CreditAccount, CreditStatus};
use crate::money;
use crate::vouchers::Voucher;
use crate::wallet::Wallet;

/// The state an allocation is checked against. Always read inside the same
/// transaction that performs the debits; a snapshot handed to a client
/// earlier is never trusted.
pub struct SnapshotSources<'a> {
    pub wallet: Option<&'a Wallet>,
    pub credit_account: Option<&'a CreditAccount>,
    /// Vouchers found by id, regardless of owner; ownership is checked here.
    pub vouchers: &'a BTreeMap<String, Voucher>,
    pub now: DateTime<Utc>,
}

/// Validates an allocation against current capacities. Checks run in a fixed
/// order and stop at the first failure; no side effects.
pub fn validate_allocation(
    customer_id: &str,
    request: &AllocationRequest,
    sources: &SnapshotSources,
) -> Result<(), PaymentError> {
    if request.total_amount <= Decimal::ZERO {
        return Err(PaymentError::ZeroOrNegativeTotal);
    }

    // A negative allocation must never be read as a debit reversal.
    if request.personal < Decimal::ZERO
        || request.cashback < Decimal::ZERO
        || request.credit < Decimal::ZERO
        || request.vouchers.iter().any(|(_, a)| *a < Decimal::ZERO)
    {
        return Err(PaymentError::NegativeAllocation);
    }

    // Exact cover, compared in integer minor units.
    if request.allocated_minor_units() != money::minor_units(request.total_amount) {
        return Err(PaymentError::AmountMismatch);
    }

    let personal_capacity = sources
        .wallet
        .map(Wallet::personal_balance_decimal)
        .unwrap_or(Decimal::ZERO);
    if request.personal > personal_capacity {
        return Err(PaymentError::PersonalInsufficient);
    }

    let cashback_capacity = sources
        .wallet
        .map(Wallet::cashback_balance_decimal)
        .unwrap_or(Decimal::ZERO);
    if request.cashback > cashback_capacity {
        return Err(PaymentError::CashbackInsufficient);
    }

    if request.credit > Decimal::ZERO {
        let account = match sources.credit_account {
            Some(account) if account.status_enum() == CreditStatus::Approved => account,
            _ => return Err(PaymentError::CreditUnavailable),
        };
        if request.credit > account.available_credit() {
            return Err(PaymentError::CreditInsufficient);
        }
    }

    for (voucher_id, amount) in &request.vouchers {
        let voucher = match sources.vouchers.get(voucher_id) {
            Some(voucher) => voucher,
            None => return Err(PaymentError::VoucherNotFound(voucher_id.clone())),
        };
        if voucher.customer_id != customer_id {
            // Cross-customer reference: a correct client can never produce
            // this, so record it for investigation without revealing the
            // voucher's existence to the caller.
            warn!(
                "customer {} referenced voucher {} owned by another customer",
                customer_id, voucher_id
            );
            return Err(PaymentError::VoucherNotFound(voucher_id.clone()));
        }
        let remaining = if voucher.is_expired(sources.now) {
            Decimal::ZERO
        } else {
            voucher.remaining_value()
        };
        if *amount > remaining {
            return Err(PaymentError::VoucherInsufficient(voucher_id.clone()));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payments::payments_model::AllocationRequest;
    use rust_decimal_macros::dec;

    fn wallet(personal: &str, cashback: &str) -> Wallet {
        Wallet {
            customer_id: "c1".to_string(),
            personal_balance: personal.to_string(),
            cashback_balance: cashback.to_string(),
            cashback_earned: cashback.to_string(),
            created_at: "2025-06-20T00:00:00+00:00".to_string(),
            updated_at: "2025-06-20T00:00:00+00:00".to_string(),
        }
    }

    fn approved_credit(limit: &str, used: &str) -> CreditAccount {
        CreditAccount {
            customer_id: "c1".to_string(),
            status: "approved".to_string(),
            credit_limit: limit.to_string(),
            used_credit: used.to_string(),
            interest_rate: "0.00".to_string(),
            payment_term_days: 30,
            credit_type_id: Some("ct-starter".to_string()),
            created_at: "2025-06-20T00:00:00+00:00".to_string(),
            updated_at: "2025-06-20T00:00:00+00:00".to_string(),
        }
    }

    fn voucher(id: &str, owner: &str, total_meals: i32, price: &str, spent: &str) -> Voucher {
        Voucher {
            id: id.to_string(),
            customer_id: owner.to_string(),
            restaurant_id: "r1".to_string(),
            total_meals,
            used_meals: 0,
            purchase_price: price.to_string(),
            spent_value: spent.to_string(),
            expires_at: None,
            created_at: "2025-06-20T00:00:00+00:00".to_string(),
            updated_at: "2025-06-20T00:00:00+00:00".to_string(),
        }
    }

    fn request(
        total: Decimal,
        personal: Decimal,
        cashback: Decimal,
        credit: Decimal,
        vouchers: Vec<(&str, Decimal)>,
    ) -> AllocationRequest {
        AllocationRequest {
            total_amount: total,
            personal,
            cashback,
            credit,
            vouchers: vouchers
                .into_iter()
                .map(|(id, amount)| (id.to_string(), amount))
                .collect(),
            restaurant_id: None,
        }
    }

    fn check(
        request: &AllocationRequest,
        wallet: Option<&Wallet>,
        credit: Option<&CreditAccount>,
        vouchers: &BTreeMap<String, Voucher>,
    ) -> Result<(), PaymentError> {
        validate_allocation(
            "c1",
            request,
            &SnapshotSources {
                wallet,
                credit_account: credit,
                vouchers,
                now: Utc::now(),
            },
        )
    }

    #[test]
    fn rejects_non_positive_totals() {
        let w = wallet("10.00", "0.00");
        let none = BTreeMap::new();
        let r = request(dec!(0), dec!(0), dec!(0), dec!(0), vec![]);
        assert_eq!(
            check(&r, Some(&w), None, &none),
            Err(PaymentError::ZeroOrNegativeTotal)
        );
        let r = request(dec!(-5), dec!(-5), dec!(0), dec!(0), vec![]);
        assert_eq!(
            check(&r, Some(&w), None, &none),
            Err(PaymentError::ZeroOrNegativeTotal)
        );
    }

    #[test]
    fn rejects_negative_allocations_before_summing() {
        let w = wallet("100.00", "100.00");
        let none = BTreeMap::new();
        // -10 + 60 would sum to 50; the negative leg must fail first
        let r = request(dec!(50), dec!(-10), dec!(60), dec!(0), vec![]);
        assert_eq!(
            check(&r, Some(&w), None, &none),
            Err(PaymentError::NegativeAllocation)
        );
    }

    #[test]
    fn enforces_the_exact_sum_invariant() {
        let w = wallet("100.00", "100.00");
        let none = BTreeMap::new();
        let r = request(dec!(50.00), dec!(30.00), dec!(19.99), dec!(0), vec![]);
        assert_eq!(
            check(&r, Some(&w), None, &none),
            Err(PaymentError::AmountMismatch)
        );
        let r = request(dec!(50.00), dec!(30.00), dec!(20.01), dec!(0), vec![]);
        assert_eq!(
            check(&r, Some(&w), None, &none),
            Err(PaymentError::AmountMismatch)
        );
        let r = request(dec!(50.00), dec!(30.00), dec!(20.00), dec!(0), vec![]);
        assert_eq!(check(&r, Some(&w), None, &none), Ok(()));
    }

    #[test]
    fn personal_capacity_is_boundary_inclusive() {
        let w = wallet("10.00", "0.00");
        let none = BTreeMap::new();
        let r = request(dec!(10.01), dec!(10.01), dec!(0), dec!(0), vec![]);
        assert_eq!(
            check(&r, Some(&w), None, &none),
            Err(PaymentError::PersonalInsufficient)
        );
        let r = request(dec!(10.00), dec!(10.00), dec!(0), dec!(0), vec![]);
        assert_eq!(check(&r, Some(&w), None, &none), Ok(()));
    }

    #[test]
    fn a_missing_wallet_reads_as_zero_capacity() {
        let none = BTreeMap::new();
        let r = request(dec!(1.00), dec!(1.00), dec!(0), dec!(0), vec![]);
        assert_eq!(
            check(&r, None, None, &none),
            Err(PaymentError::PersonalInsufficient)
        );
    }

    #[test]
    fn cashback_capacity_is_enforced() {
        let w = wallet("0.00", "5.00");
        let none = BTreeMap::new();
        let r = request(dec!(5.01), dec!(0), dec!(5.01), dec!(0), vec![]);
        assert_eq!(
            check(&r, Some(&w), None, &none),
            Err(PaymentError::CashbackInsufficient)
        );
    }

    #[test]
    fn credit_requires_an_approved_line() {
        let w = wallet("0.00", "0.00");
        let none = BTreeMap::new();
        let r = request(dec!(10.00), dec!(0), dec!(0), dec!(10.00), vec![]);
        assert_eq!(
            check(&r, Some(&w), None, &none),
            Err(PaymentError::CreditUnavailable)
        );

        let mut pending = approved_credit("100.00", "0.00");
        pending.status = "pending".to_string();
        assert_eq!(
            check(&r, Some(&w), Some(&pending), &none),
            Err(PaymentError::CreditUnavailable)
        );
    }

    #[test]
    fn credit_capacity_uses_the_derived_available_amount() {
        let w = wallet("0.00", "0.00");
        let none = BTreeMap::new();
        let account = approved_credit("100.00", "60.00");
        let r = request(dec!(40.01), dec!(0), dec!(0), dec!(40.01), vec![]);
        assert_eq!(
            check(&r, Some(&w), Some(&account), &none),
            Err(PaymentError::CreditInsufficient)
        );
        let r = request(dec!(40.00), dec!(0), dec!(0), dec!(40.00), vec![]);
        assert_eq!(check(&r, Some(&w), Some(&account), &none), Ok(()));
    }

    #[test]
    fn zero_credit_allocation_needs_no_credit_line() {
        let w = wallet("10.00", "0.00");
        let none = BTreeMap::new();
        let r = request(dec!(10.00), dec!(10.00), dec!(0), dec!(0), vec![]);
        assert_eq!(check(&r, Some(&w), None, &none), Ok(()));
    }

    #[test]
    fn unknown_vouchers_are_rejected() {
        let w = wallet("0.00", "0.00");
        let none = BTreeMap::new();
        let r = request(dec!(10.00), dec!(0), dec!(0), dec!(0), vec![("v9", dec!(10.00))]);
        assert_eq!(
            check(&r, Some(&w), None, &none),
            Err(PaymentError::VoucherNotFound("v9".to_string()))
        );
    }

    #[test]
    fn foreign_vouchers_read_as_not_found_regardless_of_value() {
        let w = wallet("0.00", "0.00");
        let mut vouchers = BTreeMap::new();
        vouchers.insert(
            "v1".to_string(),
            voucher("v1", "someone-else", 3, "30.00", "0.00"),
        );
        let r = request(dec!(10.00), dec!(0), dec!(0), dec!(0), vec![("v1", dec!(10.00))]);
        assert_eq!(
            check(&r, Some(&w), None, &vouchers),
            Err(PaymentError::VoucherNotFound("v1".to_string()))
        );
    }

    #[test]
    fn voucher_capacity_is_remaining_value() {
        let w = wallet("0.00", "0.00");
        let mut vouchers = BTreeMap::new();
        vouchers.insert("v1".to_string(), voucher("v1", "c1", 3, "30.00", "25.00"));
        let r = request(dec!(5.01), dec!(0), dec!(0), dec!(0), vec![("v1", dec!(5.01))]);
        assert_eq!(
            check(&r, Some(&w), None, &vouchers),
            Err(PaymentError::VoucherInsufficient("v1".to_string()))
        );
        let r = request(dec!(5.00), dec!(0), dec!(0), dec!(0), vec![("v1", dec!(5.00))]);
        assert_eq!(check(&r, Some(&w), None, &vouchers), Ok(()));
    }

    #[test]
    fn expired_vouchers_have_no_capacity() {
        let w = wallet("0.00", "0.00");
        let mut expired = voucher("v1", "c1", 3, "30.00", "0.00");
        expired.expires_at = Some("2000-01-01T00:00:00+00:00".to_string());
        let mut vouchers = BTreeMap::new();
        vouchers.insert("v1".to_string(), expired);
        let r = request(dec!(1.00), dec!(0), dec!(0), dec!(0), vec![("v1", dec!(1.00))]);
        assert_eq!(
            check(&r, Some(&w), None, &vouchers),
            Err(PaymentError::VoucherInsufficient("v1".to_string()))
        );
    }

    #[test]
    fn a_full_five_source_split_passes() {
        let w = wallet("50.00", "20.00");
        let account = approved_credit("100.00", "90.00");
        let mut vouchers = BTreeMap::new();
        vouchers.insert("v1".to_string(), voucher("v1", "c1", 3, "30.00", "0.00"));
        vouchers.insert("v2".to_string(), voucher("v2", "c1", 2, "20.00", "10.00"));
        let r = request(
            dec!(120.00),
            dec!(50.00),
            dec!(20.00),
            dec!(10.00),
            vec![("v1", dec!(30.00)), ("v2", dec!(10.00))],
        );
        assert_eq!(check(&r, Some(&w), Some(&account), &vouchers), Ok(()));
    }
}
