use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::credits::CreditOverview;
use crate::money;
use crate::vouchers::VoucherOverview;

/// Per-customer balance row: spendable cash plus accumulated cashback.
#[derive(
    Queryable, Identifiable, Selectable, PartialEq, Serialize, Deserialize, Debug, Clone,
)]
#[diesel(table_name = crate::schema::wallets)]
#[diesel(primary_key(customer_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct Wallet {
    pub customer_id: String,
    pub personal_balance: String,
    pub cashback_balance: String,
    pub cashback_earned: String,
    pub created_at: String,
    pub updated_at: String,
}

impl Wallet {
    pub fn personal_balance_decimal(&self) -> Decimal {
        money::parse_stored(&self.personal_balance)
    }

    pub fn cashback_balance_decimal(&self) -> Decimal {
        money::parse_stored(&self.cashback_balance)
    }

    pub fn cashback_earned_decimal(&self) -> Decimal {
        money::parse_stored(&self.cashback_earned)
    }
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::wallets)]
pub struct NewWallet {
    pub customer_id: String,
    pub personal_balance: String,
    pub cashback_balance: String,
    pub cashback_earned: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Append-only record of a personal-balance mutation.
#[derive(
    Queryable, Identifiable, Selectable, PartialEq, Serialize, Deserialize, Debug, Clone,
)]
#[diesel(table_name = crate::schema::wallet_transactions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct WalletTransaction {
    pub id: String,
    pub customer_id: String,
    pub transaction_type: String,
    pub amount: String,
    pub description: Option<String>,
    pub balance_before: String,
    pub balance_after: String,
    pub payment_code_id: Option<String>,
    pub created_at: String,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::wallet_transactions)]
pub struct NewWalletTransaction {
    pub id: String,
    pub customer_id: String,
    pub transaction_type: String,
    pub amount: String,
    pub description: Option<String>,
    pub balance_before: String,
    pub balance_after: String,
    pub payment_code_id: Option<String>,
    pub created_at: String,
}

/// Display-only discount from a restaurant loyalty group; never
/// allocation-relevant.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GroupDiscount {
    pub restaurant_id: String,
    pub group_name: String,
    pub discount_percentage: String,
}

/// Cashback section of the overview: what is spendable now and what has been
/// earned over the account's lifetime.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CashbackOverview {
    pub balance: String,
    pub lifetime_earned: String,
}

/// Point-in-time snapshot of every value source a customer can pay from.
/// Derived, never persisted; capacities are only valid as of `as_of`.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct WalletOverview {
    pub customer_id: String,
    pub personal_balance: String,
    pub cashback: CashbackOverview,
    pub credit: CreditOverview,
    pub vouchers: Vec<VoucherOverview>,
    pub group_discounts: Vec<GroupDiscount>,
    pub as_of: String,
}
