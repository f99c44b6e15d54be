use async_trait::async_trait;
use diesel::sqlite::SqliteConnection;
use rust_decimal::Decimal;

use super::wallet_model::{
    GroupDiscount, NewWalletTransaction, Wallet, WalletOverview, WalletTransaction,
};
use crate::errors::Result;

/// Trait defining the contract for wallet repository operations.
#[async_trait]
pub trait WalletRepositoryTrait: Send + Sync {
    fn get_wallet(&self, customer_id: &str) -> Result<Option<Wallet>>;
    fn get_wallet_with_conn(
        &self,
        conn: &mut SqliteConnection,
        customer_id: &str,
    ) -> Result<Option<Wallet>>;
    fn get_transactions(&self, customer_id: &str, limit: i64) -> Result<Vec<WalletTransaction>>;
    fn list_group_discounts_with_conn(
        &self,
        conn: &mut SqliteConnection,
        customer_id: &str,
    ) -> Result<Vec<GroupDiscount>>;
    /// Subtracts the personal and cashback portions of a commit. The caller
    /// has already validated capacity inside the same transaction.
    fn debit_balances_with_conn(
        &self,
        conn: &mut SqliteConnection,
        customer_id: &str,
        personal: Decimal,
        cashback: Decimal,
    ) -> Result<Wallet>;
    /// Adds to the personal balance, creating the wallet row on first use.
    fn credit_personal_with_conn(
        &self,
        conn: &mut SqliteConnection,
        customer_id: &str,
        amount: Decimal,
    ) -> Result<Wallet>;
    fn record_transaction_with_conn(
        &self,
        conn: &mut SqliteConnection,
        new_transaction: NewWalletTransaction,
    ) -> Result<()>;
}

/// Trait defining the contract for wallet service operations.
#[async_trait]
pub trait WalletServiceTrait: Send + Sync {
    /// Assembles a consistent snapshot of all value sources. Pure read.
    fn get_wallet_overview(&self, customer_id: &str) -> Result<WalletOverview>;
    fn get_wallet_transactions(
        &self,
        customer_id: &str,
        limit: Option<i64>,
    ) -> Result<Vec<WalletTransaction>>;
}
