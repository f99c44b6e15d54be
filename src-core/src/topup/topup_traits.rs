use async_trait::async_trait;
use diesel::sqlite::SqliteConnection;

use super::topup_model::{NewTopUpIntent, TopUpCallback, TopUpIntent, TopUpStatus};
use crate::errors::Result;

/// Trait defining the contract for top-up repository operations.
#[async_trait]
pub trait TopUpRepositoryTrait: Send + Sync {
    fn insert_intent_with_conn(
        &self,
        conn: &mut SqliteConnection,
        new_intent: NewTopUpIntent,
    ) -> Result<TopUpIntent>;
    fn find_by_reference_with_conn(
        &self,
        conn: &mut SqliteConnection,
        external_reference: &str,
    ) -> Result<Option<TopUpIntent>>;
    fn set_status_with_conn(
        &self,
        conn: &mut SqliteConnection,
        intent_id: &str,
        status: TopUpStatus,
    ) -> Result<TopUpIntent>;
}

/// Trait defining the contract for top-up service operations.
#[async_trait]
pub trait TopUpServiceTrait: Send + Sync {
    /// Issues the external reference later echoed back by the processor.
    async fn create_intent(&self, customer_id: &str, amount: &str) -> Result<TopUpIntent>;
    /// Applies one processor confirmation. Idempotent on the reference:
    /// replays return `duplicate` and never double-credit.
    async fn apply_top_up(&self, external_reference: &str, amount: &str) -> Result<TopUpIntent>;
    /// Routes a processor callback to apply or fail the intent.
    async fn process_callback(&self, callback: TopUpCallback) -> Result<TopUpIntent>;
}
