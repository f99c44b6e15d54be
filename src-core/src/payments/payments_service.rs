use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use diesel::sqlite::SqliteConnection;
use diesel::Connection;
use log::{debug, info};
use rust_decimal::Decimal;
use uuid::Uuid;

use super::payments_model::{
    AllocationRequest, NewPaymentCode, PaymentCodeDetails, SplitPaymentRequest, VoucherAllocation,
};
use super::payments_traits::{PaymentCodeRepositoryTrait, PaymentServiceTrait};
use super::payments_validator::{validate_allocation, SnapshotSources};
use crate::constants::PAYMENT_CODE_PREFIX;
use crate::credits::CreditRepositoryTrait;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{Error, Result};
use crate::money;
use crate::vouchers::{Voucher, VoucherRepositoryTrait};
use crate::wallet::{NewWalletTransaction, Wallet, WalletRepositoryTrait};

/// Validates and settles split payments. Commits run as a single job on the
/// write actor: validation, every source debit and the payment-code insert
/// share one immediate transaction, so concurrent commits are serialized and
/// a failure at any point leaves no source debited.
pub struct PaymentService {
    pool: Arc<DbPool>,
    writer: WriteHandle,
    wallet_repository: Arc<dyn WalletRepositoryTrait>,
    voucher_repository: Arc<dyn VoucherRepositoryTrait>,
    credit_repository: Arc<dyn CreditRepositoryTrait>,
    payment_code_repository: Arc<dyn PaymentCodeRepositoryTrait>,
}

impl PaymentService {
    pub fn new(
        pool: Arc<DbPool>,
        writer: WriteHandle,
        wallet_repository: Arc<dyn WalletRepositoryTrait>,
        voucher_repository: Arc<dyn VoucherRepositoryTrait>,
        credit_repository: Arc<dyn CreditRepositoryTrait>,
        payment_code_repository: Arc<dyn PaymentCodeRepositoryTrait>,
    ) -> Self {
        PaymentService {
            pool,
            writer,
            wallet_repository,
            voucher_repository,
            credit_repository,
            payment_code_repository,
        }
    }
}

/// Reads the sources an allocation touches and validates against them. Used
/// by both the best-effort pre-check and the commit, always on the caller's
/// connection so commit-time validation shares the debit transaction.
fn load_and_validate(
    conn: &mut SqliteConnection,
    wallet_repository: &Arc<dyn WalletRepositoryTrait>,
    credit_repository: &Arc<dyn CreditRepositoryTrait>,
    voucher_repository: &Arc<dyn VoucherRepositoryTrait>,
    customer_id: &str,
    request: &AllocationRequest,
) -> Result<Option<Wallet>> {
    let wallet = wallet_repository.get_wallet_with_conn(conn, customer_id)?;
    let credit_account = credit_repository.get_account_with_conn(conn, customer_id)?;

    let mut vouchers: BTreeMap<String, Voucher> = BTreeMap::new();
    for (voucher_id, _) in &request.vouchers {
        if let Some(voucher) = voucher_repository.find_with_conn(conn, voucher_id)? {
            vouchers.insert(voucher_id.clone(), voucher);
        }
    }

    validate_allocation(
        customer_id,
        request,
        &SnapshotSources {
            wallet: wallet.as_ref(),
            credit_account: credit_account.as_ref(),
            vouchers: &vouchers,
            now: Utc::now(),
        },
    )
    .map_err(Error::Payment)?;

    Ok(wallet)
}

#[async_trait]
impl PaymentServiceTrait for PaymentService {
    fn validate_split_payment(
        &self,
        customer_id: &str,
        request: &SplitPaymentRequest,
    ) -> Result<()> {
        let parsed = AllocationRequest::parse(request)?;
        let mut conn = get_connection(&self.pool)?;
        conn.transaction::<_, Error, _>(|conn| {
            load_and_validate(
                conn,
                &self.wallet_repository,
                &self.credit_repository,
                &self.voucher_repository,
                customer_id,
                &parsed,
            )?;
            Ok(())
        })
    }

    async fn commit_split_payment(
        &self,
        customer_id: &str,
        request: SplitPaymentRequest,
    ) -> Result<PaymentCodeDetails> {
        let parsed = AllocationRequest::parse(&request)?;
        debug!(
            "Committing split payment of {} for customer {}",
            parsed.total_amount, customer_id
        );

        let wallet_repository = self.wallet_repository.clone();
        let credit_repository = self.credit_repository.clone();
        let voucher_repository = self.voucher_repository.clone();
        let payment_code_repository = self.payment_code_repository.clone();
        let customer_id = customer_id.to_string();

        let code = self
            .writer
            .exec(move |conn| {
                let wallet = load_and_validate(
                    conn,
                    &wallet_repository,
                    &credit_repository,
                    &voucher_repository,
                    &customer_id,
                    &parsed,
                )?;

                let now = Utc::now().to_rfc3339();
                let code_id = Uuid::new_v4().to_string();
                let code_value =
                    format!("{}-{}", PAYMENT_CODE_PREFIX, Uuid::new_v4().simple());

                // Debits in stable order: personal, cashback, credit, then
                // vouchers by ascending id.
                if parsed.personal > Decimal::ZERO || parsed.cashback > Decimal::ZERO {
                    let balance_before = wallet
                        .as_ref()
                        .map(Wallet::personal_balance_decimal)
                        .unwrap_or(Decimal::ZERO);
                    let updated = wallet_repository.debit_balances_with_conn(
                        conn,
                        &customer_id,
                        parsed.personal,
                        parsed.cashback,
                    )?;
                    if parsed.personal > Decimal::ZERO {
                        wallet_repository.record_transaction_with_conn(
                            conn,
                            NewWalletTransaction {
                                id: Uuid::new_v4().to_string(),
                                customer_id: customer_id.clone(),
                                transaction_type: "split_payment".to_string(),
                                amount: money::format_amount(-parsed.personal),
                                description: Some(format!("Split payment {}", code_value)),
                                balance_before: money::format_amount(balance_before),
                                balance_after: updated.personal_balance.clone(),
                                payment_code_id: Some(code_id.clone()),
                                created_at: now.clone(),
                            },
                        )?;
                    }
                }

                if parsed.credit > Decimal::ZERO {
                    credit_repository.debit_credit_with_conn(conn, &customer_id, parsed.credit)?;
                }

                let mut voucher_debits: Vec<VoucherAllocation> = Vec::new();
                for (voucher_id, amount) in &parsed.vouchers {
                    if *amount > Decimal::ZERO {
                        voucher_repository.debit_value_with_conn(conn, voucher_id, *amount)?;
                        voucher_debits.push(VoucherAllocation {
                            voucher_id: voucher_id.clone(),
                            amount: money::format_amount(*amount),
                        });
                    }
                }

                payment_code_repository.insert_with_conn(
                    conn,
                    NewPaymentCode {
                        id: code_id,
                        code: code_value,
                        customer_id: customer_id.clone(),
                        restaurant_id: parsed.restaurant_id.clone(),
                        total_amount: money::format_amount(parsed.total_amount),
                        personal_amount: money::format_amount(parsed.personal),
                        cashback_amount: money::format_amount(parsed.cashback),
                        credit_amount: money::format_amount(parsed.credit),
                        voucher_breakdown: serde_json::to_string(&voucher_debits)?,
                        created_at: now,
                        redeemed_at: None,
                    },
                )
            })
            .await?;

        info!(
            "Issued payment code {} for customer {} over {}",
            code.code, code.customer_id, code.total_amount
        );
        code.into_details()
    }

    fn list_payment_codes(&self, customer_id: &str) -> Result<Vec<PaymentCodeDetails>> {
        self.payment_code_repository
            .list_by_customer(customer_id)?
            .into_iter()
            .map(|code| code.into_details())
            .collect()
    }
}
