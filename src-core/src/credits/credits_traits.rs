use async_trait::async_trait;
use diesel::sqlite::SqliteConnection;
use rust_decimal::Decimal;

use super::credits_model::{
    CreditAccount, CreditRequest, CreditRequestPayload, CreditType, NewCreditRequest,
};
use crate::errors::Result;

/// Trait defining the contract for credit repository operations.
#[async_trait]
pub trait CreditRepositoryTrait: Send + Sync {
    fn get_account(&self, customer_id: &str) -> Result<Option<CreditAccount>>;
    fn get_account_with_conn(
        &self,
        conn: &mut SqliteConnection,
        customer_id: &str,
    ) -> Result<Option<CreditAccount>>;
    fn list_active_types(&self) -> Result<Vec<CreditType>>;
    fn find_type_with_conn(
        &self,
        conn: &mut SqliteConnection,
        credit_type_id: &str,
    ) -> Result<Option<CreditType>>;
    fn find_live_request_with_conn(
        &self,
        conn: &mut SqliteConnection,
        customer_id: &str,
    ) -> Result<Option<CreditRequest>>;
    fn insert_request_with_conn(
        &self,
        conn: &mut SqliteConnection,
        new_request: NewCreditRequest,
    ) -> Result<CreditRequest>;
    /// Consumes approved credit inside a commit transaction.
    fn debit_credit_with_conn(
        &self,
        conn: &mut SqliteConnection,
        customer_id: &str,
        amount: Decimal,
    ) -> Result<CreditAccount>;
}

/// Trait defining the contract for credit service operations.
#[async_trait]
pub trait CreditServiceTrait: Send + Sync {
    fn list_credit_types(&self) -> Result<Vec<CreditType>>;
    async fn submit_credit_request(
        &self,
        customer_id: &str,
        payload: CreditRequestPayload,
    ) -> Result<CreditRequest>;
}
