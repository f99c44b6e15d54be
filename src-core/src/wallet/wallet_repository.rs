use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use rust_decimal::Decimal;

use super::wallet_model::{
    GroupDiscount, NewWallet, NewWalletTransaction, Wallet, WalletTransaction,
};
use super::wallet_traits::WalletRepositoryTrait;
use crate::db::{get_connection, DbPool};
use crate::errors::Result;
use crate::money;
use crate::schema::{loyalty_groups, loyalty_memberships, wallet_transactions, wallets};

pub struct WalletRepository {
    pool: Arc<DbPool>,
}

impl WalletRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        WalletRepository { pool }
    }
}

#[async_trait]
impl WalletRepositoryTrait for WalletRepository {
    fn get_wallet(&self, customer_id: &str) -> Result<Option<Wallet>> {
        let mut conn = get_connection(&self.pool)?;
        self.get_wallet_with_conn(&mut conn, customer_id)
    }

    fn get_wallet_with_conn(
        &self,
        conn: &mut SqliteConnection,
        customer_id: &str,
    ) -> Result<Option<Wallet>> {
        Ok(wallets::table
            .find(customer_id)
            .first::<Wallet>(conn)
            .optional()?)
    }

    fn get_transactions(&self, customer_id: &str, limit: i64) -> Result<Vec<WalletTransaction>> {
        let mut conn = get_connection(&self.pool)?;
        Ok(wallet_transactions::table
            .filter(wallet_transactions::customer_id.eq(customer_id))
            .order(wallet_transactions::created_at.desc())
            .limit(limit)
            .load::<WalletTransaction>(&mut conn)?)
    }

    fn list_group_discounts_with_conn(
        &self,
        conn: &mut SqliteConnection,
        customer_id: &str,
    ) -> Result<Vec<GroupDiscount>> {
        let rows: Vec<(String, String, String)> = loyalty_memberships::table
            .inner_join(loyalty_groups::table)
            .filter(loyalty_memberships::customer_id.eq(customer_id))
            .filter(loyalty_groups::is_active.eq(true))
            .select((
                loyalty_groups::restaurant_id,
                loyalty_groups::name,
                loyalty_groups::discount_percentage,
            ))
            .load(conn)?;

        Ok(rows
            .into_iter()
            .map(|(restaurant_id, group_name, discount_percentage)| GroupDiscount {
                restaurant_id,
                group_name,
                discount_percentage,
            })
            .collect())
    }

    fn debit_balances_with_conn(
        &self,
        conn: &mut SqliteConnection,
        customer_id: &str,
        personal: Decimal,
        cashback: Decimal,
    ) -> Result<Wallet> {
        let wallet = wallets::table.find(customer_id).first::<Wallet>(conn)?;
        let new_personal = wallet.personal_balance_decimal() - personal;
        let new_cashback = wallet.cashback_balance_decimal() - cashback;

        diesel::update(wallets::table.find(customer_id))
            .set((
                wallets::personal_balance.eq(money::format_amount(new_personal)),
                wallets::cashback_balance.eq(money::format_amount(new_cashback)),
                wallets::updated_at.eq(Utc::now().to_rfc3339()),
            ))
            .execute(conn)?;

        Ok(wallets::table.find(customer_id).first::<Wallet>(conn)?)
    }

    fn credit_personal_with_conn(
        &self,
        conn: &mut SqliteConnection,
        customer_id: &str,
        amount: Decimal,
    ) -> Result<Wallet> {
        let now = Utc::now().to_rfc3339();
        let existing = self.get_wallet_with_conn(conn, customer_id)?;

        match existing {
            Some(wallet) => {
                let new_balance = wallet.personal_balance_decimal() + amount;
                diesel::update(wallets::table.find(customer_id))
                    .set((
                        wallets::personal_balance.eq(money::format_amount(new_balance)),
                        wallets::updated_at.eq(&now),
                    ))
                    .execute(conn)?;
            }
            None => {
                let wallet = NewWallet {
                    customer_id: customer_id.to_string(),
                    personal_balance: money::format_amount(amount),
                    cashback_balance: "0.00".to_string(),
                    cashback_earned: "0.00".to_string(),
                    created_at: now.clone(),
                    updated_at: now,
                };
                diesel::insert_into(wallets::table)
                    .values(&wallet)
                    .execute(conn)?;
            }
        }

        Ok(wallets::table.find(customer_id).first::<Wallet>(conn)?)
    }

    fn record_transaction_with_conn(
        &self,
        conn: &mut SqliteConnection,
        new_transaction: NewWalletTransaction,
    ) -> Result<()> {
        diesel::insert_into(wallet_transactions::table)
            .values(&new_transaction)
            .execute(conn)?;
        Ok(())
    }
}
