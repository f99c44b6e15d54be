use diesel::prelude::*;
use serde::{Deserialize, Serialize};

/// Lifecycle of a top-up intent: `created` when the reference is issued,
/// `completed` exactly once on a successful processor callback, `failed` on
/// a failed or cancelled one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopUpStatus {
    Created,
    Completed,
    Failed,
}

impl TopUpStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TopUpStatus::Created => "created",
            TopUpStatus::Completed => "completed",
            TopUpStatus::Failed => "failed",
        }
    }

    pub fn parse(raw: &str) -> TopUpStatus {
        match raw {
            "completed" => TopUpStatus::Completed,
            "failed" => TopUpStatus::Failed,
            _ => TopUpStatus::Created,
        }
    }
}

/// A pending external-processor top-up, keyed by the reference handed to the
/// processor. The unique reference is what makes the bridge idempotent.
#[derive(
    Queryable, Identifiable, Selectable, PartialEq, Serialize, Deserialize, Debug, Clone,
)]
#[diesel(table_name = crate::schema::topup_intents)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct TopUpIntent {
    pub id: String,
    pub external_reference: String,
    pub customer_id: String,
    pub requested_amount: String,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

impl TopUpIntent {
    pub fn status_enum(&self) -> TopUpStatus {
        TopUpStatus::parse(&self.status)
    }
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::topup_intents)]
pub struct NewTopUpIntent {
    pub id: String,
    pub external_reference: String,
    pub customer_id: String,
    pub requested_amount: String,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Processor confirmation delivered by webhook or redirect callback.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TopUpCallback {
    pub external_reference: String,
    pub amount: String,
    pub status: String,
}
