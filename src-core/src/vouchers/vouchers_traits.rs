use async_trait::async_trait;
use diesel::sqlite::SqliteConnection;
use rust_decimal::Decimal;

use super::vouchers_model::{NewVoucher, Voucher};
use crate::errors::Result;

/// Trait defining the contract for voucher repository operations.
///
/// The `*_with_conn` methods run on a caller-provided connection so the
/// committer can read and debit vouchers inside its own transaction.
#[async_trait]
pub trait VoucherRepositoryTrait: Send + Sync {
    fn list_by_customer(&self, customer_id: &str) -> Result<Vec<Voucher>>;
    fn list_by_customer_with_conn(
        &self,
        conn: &mut SqliteConnection,
        customer_id: &str,
    ) -> Result<Vec<Voucher>>;
    fn find_with_conn(
        &self,
        conn: &mut SqliteConnection,
        voucher_id: &str,
    ) -> Result<Option<Voucher>>;
    fn debit_value_with_conn(
        &self,
        conn: &mut SqliteConnection,
        voucher_id: &str,
        amount: Decimal,
    ) -> Result<Voucher>;
    async fn create(&self, new_voucher: NewVoucher) -> Result<Voucher>;
}
