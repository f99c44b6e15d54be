use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::money;

/// Credit lifecycle as driven by the external approval workflow. The engine
/// treats the status as read-only input; only `used_credit` is ever mutated
/// here, and only inside a commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreditStatus {
    NotRequested,
    Pending,
    Approved,
    Rejected,
}

impl CreditStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CreditStatus::NotRequested => "not_requested",
            CreditStatus::Pending => "pending",
            CreditStatus::Approved => "approved",
            CreditStatus::Rejected => "rejected",
        }
    }

    /// Unknown stored values read as `not_requested`: nothing short of the
    /// literal `approved` unlocks spending.
    pub fn parse(raw: &str) -> CreditStatus {
        match raw {
            "pending" => CreditStatus::Pending,
            "approved" => CreditStatus::Approved,
            "rejected" => CreditStatus::Rejected,
            _ => CreditStatus::NotRequested,
        }
    }
}

/// Per-customer credit line state.
#[derive(
    Queryable, Identifiable, Selectable, PartialEq, Serialize, Deserialize, Debug, Clone,
)]
#[diesel(table_name = crate::schema::credit_accounts)]
#[diesel(primary_key(customer_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct CreditAccount {
    pub customer_id: String,
    pub status: String,
    pub credit_limit: String,
    pub used_credit: String,
    pub interest_rate: String,
    pub payment_term_days: i32,
    pub credit_type_id: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl CreditAccount {
    pub fn status_enum(&self) -> CreditStatus {
        CreditStatus::parse(&self.status)
    }

    pub fn credit_limit_decimal(&self) -> Decimal {
        money::parse_stored(&self.credit_limit)
    }

    pub fn used_credit_decimal(&self) -> Decimal {
        money::parse_stored(&self.used_credit)
    }

    pub fn available_credit(&self) -> Decimal {
        (self.credit_limit_decimal() - self.used_credit_decimal()).max(Decimal::ZERO)
    }
}

/// Admin-managed catalog entry a customer picks when applying for credit.
#[derive(
    Queryable, Identifiable, Selectable, PartialEq, Serialize, Deserialize, Debug, Clone,
)]
#[diesel(table_name = crate::schema::credit_types)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct CreditType {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub amount: Option<String>,
    pub is_custom_amount: bool,
    pub min_custom_amount: Option<String>,
    pub max_custom_amount: Option<String>,
    pub interest_rate: String,
    pub payment_term_days: i32,
    pub display_order: i32,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl CreditType {
    pub fn amount_decimal(&self) -> Option<Decimal> {
        self.amount.as_deref().map(money::parse_stored)
    }

    pub fn min_custom_decimal(&self) -> Option<Decimal> {
        self.min_custom_amount.as_deref().map(money::parse_stored)
    }

    pub fn max_custom_decimal(&self) -> Option<Decimal> {
        self.max_custom_amount.as_deref().map(money::parse_stored)
    }
}

/// A customer's application for a line of credit.
#[derive(
    Queryable, Identifiable, Selectable, PartialEq, Serialize, Deserialize, Debug, Clone,
)]
#[diesel(table_name = crate::schema::credit_requests)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct CreditRequest {
    pub id: String,
    pub customer_id: String,
    pub credit_type_id: String,
    pub requested_amount: String,
    pub full_name: String,
    pub national_id: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub region: String,
    pub employment_status: Option<String>,
    pub monthly_income: Option<String>,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::credit_requests)]
pub struct NewCreditRequest {
    pub id: String,
    pub customer_id: String,
    pub credit_type_id: String,
    pub requested_amount: String,
    pub full_name: String,
    pub national_id: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub region: String,
    pub employment_status: Option<String>,
    pub monthly_income: Option<String>,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Applicant details submitted with a credit request.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantProfile {
    pub full_name: String,
    pub national_id: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub region: String,
    #[serde(default)]
    pub employment_status: Option<String>,
    #[serde(default)]
    pub monthly_income: Option<String>,
}

/// Wire payload for submitting a credit request.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreditRequestPayload {
    pub credit_type_id: String,
    pub requested_amount: String,
    pub applicant_profile: ApplicantProfile,
}

/// Credit section of the wallet overview. Limit and terms are only surfaced
/// once the line is approved.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreditOverview {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credit_limit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub used_credit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_credit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interest_rate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_term_days: Option<i32>,
}

impl CreditOverview {
    /// Derives the displayed status. The account row is written only by the
    /// external approval workflow; a submitted-but-undecided application
    /// reads as `pending` from the live request instead.
    pub fn from_state(account: Option<&CreditAccount>, has_live_request: bool) -> Self {
        if let Some(account) = account {
            if account.status_enum() == CreditStatus::Approved {
                return CreditOverview {
                    status: CreditStatus::Approved.as_str().to_string(),
                    credit_limit: Some(account.credit_limit.clone()),
                    used_credit: Some(account.used_credit.clone()),
                    available_credit: Some(money::format_amount(account.available_credit())),
                    interest_rate: Some(account.interest_rate.clone()),
                    payment_term_days: Some(account.payment_term_days),
                };
            }
        }

        let mut status = account
            .map(CreditAccount::status_enum)
            .unwrap_or(CreditStatus::NotRequested);
        if status == CreditStatus::NotRequested && has_live_request {
            status = CreditStatus::Pending;
        }

        CreditOverview {
            status: status.as_str().to_string(),
            credit_limit: None,
            used_credit: None,
            available_credit: None,
            interest_rate: None,
            payment_term_days: None,
        }
    }
}
