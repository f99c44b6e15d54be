use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use diesel::Connection;
use log::debug;

use super::wallet_model::{CashbackOverview, WalletOverview, WalletTransaction};
use super::wallet_traits::{WalletRepositoryTrait, WalletServiceTrait};
use crate::constants::DEFAULT_TRANSACTION_LIMIT;
use crate::credits::{CreditOverview, CreditRepositoryTrait};
use crate::db::{get_connection, DbPool};
use crate::errors::{Error, Result};
use crate::money;
use crate::vouchers::{VoucherOverview, VoucherRepositoryTrait};

/// Assembles the wallet overview from every value source. Balances are read
/// within one transaction so the snapshot is internally consistent, and
/// voucher remaining values are recomputed on every call -- meals may have
/// been consumed at the restaurant since the last read.
pub struct WalletService {
    pool: Arc<DbPool>,
    wallet_repository: Arc<dyn WalletRepositoryTrait>,
    voucher_repository: Arc<dyn VoucherRepositoryTrait>,
    credit_repository: Arc<dyn CreditRepositoryTrait>,
}

impl WalletService {
    pub fn new(
        pool: Arc<DbPool>,
        wallet_repository: Arc<dyn WalletRepositoryTrait>,
        voucher_repository: Arc<dyn VoucherRepositoryTrait>,
        credit_repository: Arc<dyn CreditRepositoryTrait>,
    ) -> Self {
        WalletService {
            pool,
            wallet_repository,
            voucher_repository,
            credit_repository,
        }
    }
}

#[async_trait]
impl WalletServiceTrait for WalletService {
    fn get_wallet_overview(&self, customer_id: &str) -> Result<WalletOverview> {
        debug!("Assembling wallet overview for customer {}", customer_id);
        let now = Utc::now();
        let mut conn = get_connection(&self.pool)?;

        conn.transaction::<WalletOverview, Error, _>(|conn| {
            let wallet = self.wallet_repository.get_wallet_with_conn(conn, customer_id)?;
            let credit_account = self
                .credit_repository
                .get_account_with_conn(conn, customer_id)?;
            let live_request = self
                .credit_repository
                .find_live_request_with_conn(conn, customer_id)?;
            let vouchers = self
                .voucher_repository
                .list_by_customer_with_conn(conn, customer_id)?;
            let group_discounts = self
                .wallet_repository
                .list_group_discounts_with_conn(conn, customer_id)?;

            let (personal_balance, cashback_balance, cashback_earned) = match &wallet {
                Some(wallet) => (
                    money::format_amount(wallet.personal_balance_decimal()),
                    money::format_amount(wallet.cashback_balance_decimal()),
                    money::format_amount(wallet.cashback_earned_decimal()),
                ),
                None => (
                    "0.00".to_string(),
                    "0.00".to_string(),
                    "0.00".to_string(),
                ),
            };

            Ok(WalletOverview {
                customer_id: customer_id.to_string(),
                personal_balance,
                cashback: CashbackOverview {
                    balance: cashback_balance,
                    lifetime_earned: cashback_earned,
                },
                credit: CreditOverview::from_state(credit_account.as_ref(), live_request.is_some()),
                vouchers: vouchers
                    .iter()
                    .filter(|v| v.is_active(now))
                    .map(VoucherOverview::from)
                    .collect(),
                group_discounts,
                as_of: now.to_rfc3339(),
            })
        })
    }

    fn get_wallet_transactions(
        &self,
        customer_id: &str,
        limit: Option<i64>,
    ) -> Result<Vec<WalletTransaction>> {
        let limit = limit.unwrap_or(DEFAULT_TRANSACTION_LIMIT).clamp(1, 200);
        self.wallet_repository.get_transactions(customer_id, limit)
    }
}
