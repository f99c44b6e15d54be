use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use rust_decimal::Decimal;

use super::credits_model::{CreditAccount, CreditRequest, CreditType, NewCreditRequest};
use super::credits_traits::CreditRepositoryTrait;
use crate::db::{get_connection, DbPool};
use crate::errors::Result;
use crate::money;
use crate::schema::{credit_accounts, credit_requests, credit_types};

pub struct CreditRepository {
    pool: Arc<DbPool>,
}

impl CreditRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        CreditRepository { pool }
    }
}

#[async_trait]
impl CreditRepositoryTrait for CreditRepository {
    fn get_account(&self, customer_id: &str) -> Result<Option<CreditAccount>> {
        let mut conn = get_connection(&self.pool)?;
        self.get_account_with_conn(&mut conn, customer_id)
    }

    fn get_account_with_conn(
        &self,
        conn: &mut SqliteConnection,
        customer_id: &str,
    ) -> Result<Option<CreditAccount>> {
        Ok(credit_accounts::table
            .find(customer_id)
            .first::<CreditAccount>(conn)
            .optional()?)
    }

    fn list_active_types(&self) -> Result<Vec<CreditType>> {
        let mut conn = get_connection(&self.pool)?;
        Ok(credit_types::table
            .filter(credit_types::is_active.eq(true))
            .order(credit_types::display_order.asc())
            .load::<CreditType>(&mut conn)?)
    }

    fn find_type_with_conn(
        &self,
        conn: &mut SqliteConnection,
        credit_type_id: &str,
    ) -> Result<Option<CreditType>> {
        Ok(credit_types::table
            .find(credit_type_id)
            .first::<CreditType>(conn)
            .optional()?)
    }

    fn find_live_request_with_conn(
        &self,
        conn: &mut SqliteConnection,
        customer_id: &str,
    ) -> Result<Option<CreditRequest>> {
        Ok(credit_requests::table
            .filter(credit_requests::customer_id.eq(customer_id))
            .filter(credit_requests::status.eq_any(["pending", "approved"]))
            .order(credit_requests::created_at.desc())
            .first::<CreditRequest>(conn)
            .optional()?)
    }

    fn insert_request_with_conn(
        &self,
        conn: &mut SqliteConnection,
        new_request: NewCreditRequest,
    ) -> Result<CreditRequest> {
        diesel::insert_into(credit_requests::table)
            .values(&new_request)
            .execute(conn)?;

        Ok(credit_requests::table
            .find(&new_request.id)
            .first::<CreditRequest>(conn)?)
    }

    fn debit_credit_with_conn(
        &self,
        conn: &mut SqliteConnection,
        customer_id: &str,
        amount: Decimal,
    ) -> Result<CreditAccount> {
        let account = credit_accounts::table
            .find(customer_id)
            .first::<CreditAccount>(conn)?;
        let new_used = account.used_credit_decimal() + amount;

        diesel::update(credit_accounts::table.find(customer_id))
            .set((
                credit_accounts::used_credit.eq(money::format_amount(new_used)),
                credit_accounts::updated_at.eq(Utc::now().to_rfc3339()),
            ))
            .execute(conn)?;

        Ok(credit_accounts::table
            .find(customer_id)
            .first::<CreditAccount>(conn)?)
    }
}
