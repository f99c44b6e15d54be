use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info, warn};
use rust_decimal::Decimal;
use uuid::Uuid;

use super::topup_errors::TopUpError;
use super::topup_model::{NewTopUpIntent, TopUpCallback, TopUpIntent, TopUpStatus};
use super::topup_traits::{TopUpRepositoryTrait, TopUpServiceTrait};
use crate::constants::MAX_TOPUP_AMOUNT;
use crate::db::WriteHandle;
use crate::errors::{Error, Result, ValidationError};
use crate::money;
use crate::wallet::{NewWalletTransaction, WalletRepositoryTrait};

/// Bridges external payment-processor confirmations into personal-balance
/// credits. The engine performs no retries of its own; the processor may
/// replay a confirmation, and the unique external reference absorbs it.
pub struct TopUpService {
    writer: WriteHandle,
    repository: Arc<dyn TopUpRepositoryTrait>,
    wallet_repository: Arc<dyn WalletRepositoryTrait>,
}

impl TopUpService {
    pub fn new(
        writer: WriteHandle,
        repository: Arc<dyn TopUpRepositoryTrait>,
        wallet_repository: Arc<dyn WalletRepositoryTrait>,
    ) -> Self {
        TopUpService {
            writer,
            repository,
            wallet_repository,
        }
    }
}

/// Positive and within the platform ceiling, exact to the cent.
fn check_amount(raw: &str) -> Result<Decimal> {
    let amount = match money::parse_amount(raw) {
        Ok(amount) => amount,
        Err(_) => return Err(TopUpError::InvalidAmount.into()),
    };
    let max = money::parse_stored(MAX_TOPUP_AMOUNT);
    if amount <= Decimal::ZERO || amount > max {
        return Err(TopUpError::InvalidAmount.into());
    }
    Ok(amount)
}

#[async_trait]
impl TopUpServiceTrait for TopUpService {
    async fn create_intent(&self, customer_id: &str, amount: &str) -> Result<TopUpIntent> {
        let amount = check_amount(amount)?;
        debug!(
            "Creating top-up intent of {} for customer {}",
            amount, customer_id
        );

        let repository = self.repository.clone();
        let customer_id = customer_id.to_string();
        self.writer
            .exec(move |conn| {
                let now = Utc::now().to_rfc3339();
                repository.insert_intent_with_conn(
                    conn,
                    NewTopUpIntent {
                        id: Uuid::new_v4().to_string(),
                        external_reference: Uuid::new_v4().to_string(),
                        customer_id,
                        requested_amount: money::format_amount(amount),
                        status: TopUpStatus::Created.as_str().to_string(),
                        created_at: now.clone(),
                        updated_at: now,
                    },
                )
            })
            .await
    }

    async fn apply_top_up(&self, external_reference: &str, amount: &str) -> Result<TopUpIntent> {
        let amount = check_amount(amount)?;

        let repository = self.repository.clone();
        let wallet_repository = self.wallet_repository.clone();
        let external_reference = external_reference.to_string();
        let intent = self
            .writer
            .exec(move |conn| {
                let intent = repository
                    .find_by_reference_with_conn(conn, &external_reference)?
                    .ok_or(Error::TopUp(TopUpError::UnknownReference))?;

                if intent.status_enum() == TopUpStatus::Completed {
                    return Err(TopUpError::Duplicate.into());
                }

                let before = wallet_repository
                    .get_wallet_with_conn(conn, &intent.customer_id)?
                    .map(|w| w.personal_balance_decimal())
                    .unwrap_or(Decimal::ZERO);
                let updated = wallet_repository.credit_personal_with_conn(
                    conn,
                    &intent.customer_id,
                    amount,
                )?;
                wallet_repository.record_transaction_with_conn(
                    conn,
                    NewWalletTransaction {
                        id: Uuid::new_v4().to_string(),
                        customer_id: intent.customer_id.clone(),
                        transaction_type: "topup".to_string(),
                        amount: money::format_amount(amount),
                        description: Some(format!("Wallet top-up {}", external_reference)),
                        balance_before: money::format_amount(before),
                        balance_after: updated.personal_balance.clone(),
                        payment_code_id: None,
                        created_at: Utc::now().to_rfc3339(),
                    },
                )?;

                repository.set_status_with_conn(conn, &intent.id, TopUpStatus::Completed)
            })
            .await?;

        info!(
            "Applied top-up {} of {} for customer {}",
            intent.external_reference, amount, intent.customer_id
        );
        Ok(intent)
    }

    async fn process_callback(&self, callback: TopUpCallback) -> Result<TopUpIntent> {
        match callback.status.as_str() {
            "succeeded" => {
                self.apply_top_up(&callback.external_reference, &callback.amount)
                    .await
            }
            "failed" | "canceled" => {
                warn!(
                    "Top-up {} reported as {} by the processor",
                    callback.external_reference, callback.status
                );
                let repository = self.repository.clone();
                let external_reference = callback.external_reference.clone();
                self.writer
                    .exec(move |conn| {
                        let intent = repository
                            .find_by_reference_with_conn(conn, &external_reference)?
                            .ok_or(Error::TopUp(TopUpError::UnknownReference))?;
                        if intent.status_enum() == TopUpStatus::Completed {
                            return Err(TopUpError::Duplicate.into());
                        }
                        repository.set_status_with_conn(conn, &intent.id, TopUpStatus::Failed)
                    })
                    .await
            }
            other => Err(Error::Validation(ValidationError::InvalidInput(format!(
                "unknown top-up status '{}'",
                other
            )))),
        }
    }
}
