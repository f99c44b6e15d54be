use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use super::payments_model::{NewPaymentCode, PaymentCode};
use super::payments_traits::PaymentCodeRepositoryTrait;
use crate::db::{get_connection, DbPool};
use crate::errors::Result;
use crate::schema::payment_codes;

pub struct PaymentCodeRepository {
    pool: Arc<DbPool>,
}

impl PaymentCodeRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        PaymentCodeRepository { pool }
    }
}

#[async_trait]
impl PaymentCodeRepositoryTrait for PaymentCodeRepository {
    fn insert_with_conn(
        &self,
        conn: &mut SqliteConnection,
        new_code: NewPaymentCode,
    ) -> Result<PaymentCode> {
        diesel::insert_into(payment_codes::table)
            .values(&new_code)
            .execute(conn)?;

        Ok(payment_codes::table
            .find(&new_code.id)
            .first::<PaymentCode>(conn)?)
    }

    fn list_by_customer(&self, customer_id: &str) -> Result<Vec<PaymentCode>> {
        let mut conn = get_connection(&self.pool)?;
        Ok(payment_codes::table
            .filter(payment_codes::customer_id.eq(customer_id))
            .order(payment_codes::created_at.desc())
            .load::<PaymentCode>(&mut conn)?)
    }
}
