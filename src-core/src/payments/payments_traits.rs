use async_trait::async_trait;
use diesel::sqlite::SqliteConnection;

use super::payments_model::{NewPaymentCode, PaymentCode, PaymentCodeDetails, SplitPaymentRequest};
use crate::errors::Result;

/// Trait defining the contract for payment-code repository operations.
#[async_trait]
pub trait PaymentCodeRepositoryTrait: Send + Sync {
    fn insert_with_conn(
        &self,
        conn: &mut SqliteConnection,
        new_code: NewPaymentCode,
    ) -> Result<PaymentCode>;
    fn list_by_customer(&self, customer_id: &str) -> Result<Vec<PaymentCode>>;
}

/// Trait defining the contract for split-payment service operations.
#[async_trait]
pub trait PaymentServiceTrait: Send + Sync {
    /// Best-effort pre-check for live UI feedback. The commit re-validates
    /// inside its own transaction; a pass here is no promise.
    fn validate_split_payment(
        &self,
        customer_id: &str,
        request: &SplitPaymentRequest,
    ) -> Result<()>;
    /// Validates and debits every allocated source atomically, issuing a
    /// payment code only when the full amount is covered exactly.
    async fn commit_split_payment(
        &self,
        customer_id: &str,
        request: SplitPaymentRequest,
    ) -> Result<PaymentCodeDetails>;
    fn list_payment_codes(&self, customer_id: &str) -> Result<Vec<PaymentCodeDetails>>;
}
