mod common;

use common::*;
use dinepay_core::errors::Error;
use dinepay_core::payments::{PaymentError, SourceAllocations, SplitPaymentRequest};

fn split_request(
    total: &str,
    personal: Option<&str>,
    cashback: Option<&str>,
    credit: Option<&str>,
    vouchers: &[(&str, &str)],
) -> SplitPaymentRequest {
    SplitPaymentRequest {
        total_amount: total.to_string(),
        allocations: SourceAllocations {
            personal: personal.map(str::to_string),
            cashback: cashback.map(str::to_string),
            credit: credit.map(str::to_string),
        },
        voucher_allocations: vouchers
            .iter()
            .map(|(id, amount)| (id.to_string(), amount.to_string()))
            .collect(),
        restaurant_id: Some("r1".to_string()),
    }
}

#[tokio::test]
async fn end_to_end_split_payment_drains_all_sources() {
    let engine = build_engine();
    seed_wallet(&engine, "c1", "50.00", "20.00");
    seed_voucher(&engine, "v1", "c1", 3, "30.00").await;

    let request = split_request(
        "100.00",
        Some("50.00"),
        Some("20.00"),
        None,
        &[("v1", "30.00")],
    );

    let details = engine
        .payment_service
        .commit_split_payment("c1", request.clone())
        .await
        .unwrap();

    assert!(details.code.starts_with("DP-"));
    assert_eq!(details.total_amount, "100.00");
    assert_eq!(details.breakdown.personal, "50.00");
    assert_eq!(details.breakdown.cashback, "20.00");
    assert_eq!(details.breakdown.vouchers.len(), 1);
    assert_eq!(details.breakdown.vouchers[0].amount, "30.00");
    assert!(details.redeemed_at.is_none());

    let overview = engine.wallet_service.get_wallet_overview("c1").unwrap();
    assert_eq!(overview.personal_balance, "0.00");
    assert_eq!(overview.cashback.balance, "0.00");
    // fully spent voucher no longer shows as a spendable source
    assert!(overview.vouchers.is_empty());

    let ledger = engine
        .wallet_service
        .get_wallet_transactions("c1", None)
        .unwrap();
    assert_eq!(ledger.len(), 1);
    assert_eq!(ledger[0].transaction_type, "split_payment");
    assert_eq!(ledger[0].amount, "-50.00");
    assert_eq!(ledger[0].balance_after, "0.00");

    // Replaying the identical request must fail: every capacity is now zero.
    let replay = engine
        .payment_service
        .commit_split_payment("c1", request)
        .await;
    assert!(matches!(
        replay,
        Err(Error::Payment(PaymentError::PersonalInsufficient))
    ));
}

#[tokio::test]
async fn a_failed_commit_leaves_every_balance_untouched() {
    let engine = build_engine();
    seed_wallet(&engine, "c1", "50.00", "20.00");
    seed_voucher(&engine, "v1", "c1", 3, "30.00").await;

    // A walk-in redemption consumes a meal after the client saw remaining
    // value 30.00 but before it commits.
    consume_meal(&engine, "v1");

    let request = split_request(
        "100.00",
        Some("50.00"),
        Some("20.00"),
        None,
        &[("v1", "30.00")],
    );
    let result = engine.payment_service.commit_split_payment("c1", request).await;
    assert!(matches!(
        result,
        Err(Error::Payment(PaymentError::VoucherInsufficient(_)))
    ));

    // No source was debited.
    let overview = engine.wallet_service.get_wallet_overview("c1").unwrap();
    assert_eq!(overview.personal_balance, "50.00");
    assert_eq!(overview.cashback.balance, "20.00");
    assert_eq!(overview.vouchers.len(), 1);
    assert_eq!(overview.vouchers[0].remaining_value, "20.00");
    assert!(engine
        .payment_service
        .list_payment_codes("c1")
        .unwrap()
        .is_empty());
    assert!(engine
        .wallet_service
        .get_wallet_transactions("c1", None)
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn overview_recomputes_voucher_value_on_every_read() {
    let engine = build_engine();
    seed_voucher(&engine, "v1", "c1", 3, "30.00").await;

    let overview = engine.wallet_service.get_wallet_overview("c1").unwrap();
    assert_eq!(overview.vouchers[0].remaining_value, "30.00");

    consume_meal(&engine, "v1");

    let overview = engine.wallet_service.get_wallet_overview("c1").unwrap();
    assert_eq!(overview.vouchers[0].remaining_value, "20.00");
    assert_eq!(overview.vouchers[0].used_meals, 1);
}

#[tokio::test]
async fn another_customers_voucher_is_never_spendable() {
    let engine = build_engine();
    seed_wallet(&engine, "c1", "0.00", "0.00");
    seed_voucher(&engine, "v1", "someone-else", 3, "30.00").await;

    let request = split_request("10.00", None, None, None, &[("v1", "10.00")]);
    let result = engine.payment_service.commit_split_payment("c1", request).await;
    assert!(matches!(
        result,
        Err(Error::Payment(PaymentError::VoucherNotFound(_)))
    ));

    // The foreign voucher is untouched.
    let overview = engine
        .wallet_service
        .get_wallet_overview("someone-else")
        .unwrap();
    assert_eq!(overview.vouchers[0].remaining_value, "30.00");
}

#[tokio::test]
async fn paying_with_credit_consumes_the_approved_line() {
    let engine = build_engine();
    approve_credit(&engine, "c1", "100.00");

    let request = split_request("40.00", None, None, Some("40.00"), &[]);
    engine
        .payment_service
        .commit_split_payment("c1", request)
        .await
        .unwrap();

    let overview = engine.wallet_service.get_wallet_overview("c1").unwrap();
    assert_eq!(overview.credit.status, "approved");
    assert_eq!(overview.credit.used_credit.as_deref(), Some("40.00"));
    assert_eq!(overview.credit.available_credit.as_deref(), Some("60.00"));

    // 60.01 now exceeds the remaining line.
    let request = split_request("60.01", None, None, Some("60.01"), &[]);
    let result = engine.payment_service.commit_split_payment("c1", request).await;
    assert!(matches!(
        result,
        Err(Error::Payment(PaymentError::CreditInsufficient))
    ));
}

#[tokio::test]
async fn concurrent_commits_cannot_jointly_overdraw_a_source() {
    let engine = build_engine();
    seed_wallet(&engine, "c1", "50.00", "0.00");

    let request = split_request("50.00", Some("50.00"), None, None, &[]);
    let first = engine
        .payment_service
        .commit_split_payment("c1", request.clone());
    let second = engine.payment_service.commit_split_payment("c1", request);

    let (first, second) = tokio::join!(first, second);
    let successes = [&first, &second].iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1);

    let failure = if first.is_err() { first } else { second };
    assert!(matches!(
        failure,
        Err(Error::Payment(PaymentError::PersonalInsufficient))
    ));

    let overview = engine.wallet_service.get_wallet_overview("c1").unwrap();
    assert_eq!(overview.personal_balance, "0.00");
    assert_eq!(engine.payment_service.list_payment_codes("c1").unwrap().len(), 1);
}

#[tokio::test]
async fn best_effort_validation_reports_without_mutating() {
    let engine = build_engine();
    seed_wallet(&engine, "c1", "10.00", "0.00");

    let ok = split_request("10.00", Some("10.00"), None, None, &[]);
    engine
        .payment_service
        .validate_split_payment("c1", &ok)
        .unwrap();

    let short = split_request("10.01", Some("10.01"), None, None, &[]);
    let result = engine.payment_service.validate_split_payment("c1", &short);
    assert!(matches!(
        result,
        Err(Error::Payment(PaymentError::PersonalInsufficient))
    ));

    // validation alone never debits
    let overview = engine.wallet_service.get_wallet_overview("c1").unwrap();
    assert_eq!(overview.personal_balance, "10.00");
}
