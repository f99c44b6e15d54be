use chrono::{DateTime, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::money;

/// A prepaid meal package bought from one restaurant.
///
/// `used_meals` counts whole meals consumed at the restaurant (walk-in
/// redemption, recorded outside this engine); `spent_value` is the value the
/// payment engine has debited. The remaining value is always derived fresh
/// from both -- never cached.
#[derive(
    Queryable, Identifiable, Selectable, PartialEq, Serialize, Deserialize, Debug, Clone,
)]
#[diesel(table_name = crate::schema::vouchers)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct Voucher {
    pub id: String,
    pub customer_id: String,
    pub restaurant_id: String,
    pub total_meals: i32,
    pub used_meals: i32,
    pub purchase_price: String,
    pub spent_value: String,
    pub expires_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Voucher {
    pub fn purchase_price_decimal(&self) -> Decimal {
        money::parse_stored(&self.purchase_price)
    }

    pub fn spent_value_decimal(&self) -> Decimal {
        money::parse_stored(&self.spent_value)
    }

    /// Unspent value: the worth of the meals not yet consumed at the
    /// restaurant, minus what the engine has already debited.
    pub fn remaining_value(&self) -> Decimal {
        if self.total_meals <= 0 {
            return Decimal::ZERO;
        }
        let meals_left = Decimal::from((self.total_meals - self.used_meals).max(0));
        let gross = money::round2(
            meals_left * self.purchase_price_decimal() / Decimal::from(self.total_meals),
        );
        (gross - self.spent_value_decimal()).max(Decimal::ZERO)
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match &self.expires_at {
            Some(raw) => DateTime::parse_from_rfc3339(raw)
                .map(|t| t.with_timezone(&Utc) <= now)
                .unwrap_or(false),
            None => false,
        }
    }

    /// A voucher is spendable while it is not expired and still carries value.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        !self.is_expired(now) && self.remaining_value() > Decimal::ZERO
    }
}

/// Input for creating a voucher (purchase flow lives outside the engine; this
/// is used by provisioning and tests).
#[derive(Insertable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::vouchers)]
#[serde(rename_all = "camelCase")]
pub struct NewVoucher {
    pub id: Option<String>,
    pub customer_id: String,
    pub restaurant_id: String,
    pub total_meals: i32,
    pub used_meals: i32,
    pub purchase_price: String,
    pub spent_value: String,
    pub expires_at: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// Voucher as shown on the wallet overview, with the remaining value
/// computed at read time.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VoucherOverview {
    pub id: String,
    pub restaurant_id: String,
    pub total_meals: i32,
    pub used_meals: i32,
    pub purchase_price: String,
    pub remaining_value: String,
    pub expires_at: Option<String>,
}

impl From<&Voucher> for VoucherOverview {
    fn from(voucher: &Voucher) -> Self {
        VoucherOverview {
            id: voucher.id.clone(),
            restaurant_id: voucher.restaurant_id.clone(),
            total_meals: voucher.total_meals,
            used_meals: voucher.used_meals,
            purchase_price: voucher.purchase_price.clone(),
            remaining_value: money::format_amount(voucher.remaining_value()),
            expires_at: voucher.expires_at.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn voucher(total_meals: i32, used_meals: i32, price: &str, spent: &str) -> Voucher {
        Voucher {
            id: "v1".to_string(),
            customer_id: "c1".to_string(),
            restaurant_id: "r1".to_string(),
            total_meals,
            used_meals,
            purchase_price: price.to_string(),
            spent_value: spent.to_string(),
            expires_at: None,
            created_at: "2025-06-20T00:00:00+00:00".to_string(),
            updated_at: "2025-06-20T00:00:00+00:00".to_string(),
        }
    }

    #[test]
    fn remaining_value_derives_from_meals_and_spent_value() {
        assert_eq!(voucher(3, 0, "30.00", "0.00").remaining_value(), dec!(30.00));
        assert_eq!(voucher(3, 1, "30.00", "0.00").remaining_value(), dec!(20.00));
        assert_eq!(voucher(3, 1, "30.00", "15.00").remaining_value(), dec!(5.00));
        assert_eq!(voucher(3, 3, "30.00", "0.00").remaining_value(), Decimal::ZERO);
    }

    #[test]
    fn remaining_value_rounds_uneven_meal_values() {
        // 100.00 over 3 meals: 2 meals left round to 66.67
        assert_eq!(voucher(3, 1, "100.00", "0.00").remaining_value(), dec!(66.67));
    }

    #[test]
    fn remaining_value_never_goes_negative() {
        assert_eq!(voucher(3, 2, "30.00", "15.00").remaining_value(), Decimal::ZERO);
    }

    #[test]
    fn expiry_gates_activity() {
        let mut v = voucher(3, 0, "30.00", "0.00");
        let now = Utc::now();
        assert!(v.is_active(now));
        v.expires_at = Some("2000-01-01T00:00:00+00:00".to_string());
        assert!(!v.is_active(now));
    }
}
