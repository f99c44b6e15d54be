use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::vouchers_model::{NewVoucher, Voucher};
use super::vouchers_traits::VoucherRepositoryTrait;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::Result;
use crate::money;
use crate::schema::vouchers;

pub struct VoucherRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl VoucherRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        VoucherRepository { pool, writer }
    }
}

#[async_trait]
impl VoucherRepositoryTrait for VoucherRepository {
    fn list_by_customer(&self, customer_id: &str) -> Result<Vec<Voucher>> {
        let mut conn = get_connection(&self.pool)?;
        self.list_by_customer_with_conn(&mut conn, customer_id)
    }

    fn list_by_customer_with_conn(
        &self,
        conn: &mut SqliteConnection,
        customer_id: &str,
    ) -> Result<Vec<Voucher>> {
        Ok(vouchers::table
            .filter(vouchers::customer_id.eq(customer_id))
            .order(vouchers::id.asc())
            .load::<Voucher>(conn)?)
    }

    fn find_with_conn(
        &self,
        conn: &mut SqliteConnection,
        voucher_id: &str,
    ) -> Result<Option<Voucher>> {
        Ok(vouchers::table
            .find(voucher_id)
            .first::<Voucher>(conn)
            .optional()?)
    }

    fn debit_value_with_conn(
        &self,
        conn: &mut SqliteConnection,
        voucher_id: &str,
        amount: Decimal,
    ) -> Result<Voucher> {
        let voucher = vouchers::table.find(voucher_id).first::<Voucher>(conn)?;
        let new_spent = voucher.spent_value_decimal() + amount;

        diesel::update(vouchers::table.find(voucher_id))
            .set((
                vouchers::spent_value.eq(money::format_amount(new_spent)),
                vouchers::updated_at.eq(Utc::now().to_rfc3339()),
            ))
            .execute(conn)?;

        Ok(vouchers::table.find(voucher_id).first::<Voucher>(conn)?)
    }

    async fn create(&self, new_voucher: NewVoucher) -> Result<Voucher> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Voucher> {
                let now = Utc::now().to_rfc3339();
                let id = new_voucher
                    .id
                    .clone()
                    .unwrap_or_else(|| Uuid::new_v4().to_string());
                let created_at = new_voucher.created_at.clone().unwrap_or_else(|| now.clone());
                let updated_at = new_voucher.updated_at.clone().unwrap_or(now);
                let record = NewVoucher {
                    id: Some(id.clone()),
                    created_at: Some(created_at),
                    updated_at: Some(updated_at),
                    ..new_voucher
                };

                diesel::insert_into(vouchers::table)
                    .values(&record)
                    .execute(conn)?;

                Ok(vouchers::table.find(&id).first::<Voucher>(conn)?)
            })
            .await
    }
}
