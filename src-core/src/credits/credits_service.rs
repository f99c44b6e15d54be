use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use lazy_static::lazy_static;
use log::{debug, info};
use regex::Regex;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::cnp::is_valid_cnp;
use super::credits_errors::CreditError;
use super::credits_model::{
    CreditRequest, CreditRequestPayload, CreditStatus, CreditType, NewCreditRequest,
};
use super::credits_traits::{CreditRepositoryTrait, CreditServiceTrait};
use crate::db::WriteHandle;
use crate::errors::{Error, Result, ValidationError};
use crate::money;

lazy_static! {
    static ref PHONE_RE: Regex = Regex::new(r"^\+?[0-9][0-9 .\-]{5,17}$").unwrap();
}

pub struct CreditService {
    repository: Arc<dyn CreditRepositoryTrait>,
    writer: WriteHandle,
}

impl CreditService {
    pub fn new(repository: Arc<dyn CreditRepositoryTrait>, writer: WriteHandle) -> Self {
        CreditService { repository, writer }
    }
}

/// Field-level checks that need no database state. Returns the parsed
/// requested amount.
pub(crate) fn validate_payload(payload: &CreditRequestPayload) -> Result<Decimal> {
    let profile = &payload.applicant_profile;
    let required = [
        ("fullName", &profile.full_name),
        ("nationalId", &profile.national_id),
        ("phone", &profile.phone),
        ("address", &profile.address),
        ("city", &profile.city),
        ("region", &profile.region),
    ];
    for (field, value) in required {
        if value.trim().is_empty() {
            return Err(CreditError::MissingRequiredField(field.to_string()).into());
        }
    }

    if !is_valid_cnp(profile.national_id.trim()) {
        return Err(CreditError::InvalidNationalId.into());
    }

    if !PHONE_RE.is_match(profile.phone.trim()) {
        return Err(Error::Validation(ValidationError::InvalidInput(
            "invalid phone number".to_string(),
        )));
    }

    let amount = money::parse_amount(&payload.requested_amount)?;
    if amount <= Decimal::ZERO {
        return Err(CreditError::AmountOutOfRange.into());
    }
    Ok(amount)
}

/// Enforces the catalog bounds: fixed types must be requested at their exact
/// amount, custom types within their configured range.
pub(crate) fn check_amount_against_type(
    amount: Decimal,
    credit_type: &CreditType,
) -> std::result::Result<(), CreditError> {
    if credit_type.is_custom_amount {
        let min = credit_type.min_custom_decimal().unwrap_or(Decimal::ZERO);
        let max = credit_type.max_custom_decimal().unwrap_or(Decimal::ZERO);
        if amount < min || amount > max {
            return Err(CreditError::AmountOutOfRange);
        }
    } else {
        let fixed = credit_type.amount_decimal().unwrap_or(Decimal::ZERO);
        if amount != fixed {
            return Err(CreditError::AmountOutOfRange);
        }
    }
    Ok(())
}

#[async_trait]
impl CreditServiceTrait for CreditService {
    fn list_credit_types(&self) -> Result<Vec<CreditType>> {
        self.repository.list_active_types()
    }

    async fn submit_credit_request(
        &self,
        customer_id: &str,
        payload: CreditRequestPayload,
    ) -> Result<CreditRequest> {
        debug!(
            "Submitting credit request for customer {} (type {})",
            customer_id, payload.credit_type_id
        );
        let amount = validate_payload(&payload)?;

        let repository = self.repository.clone();
        let customer_id = customer_id.to_string();
        let request = self
            .writer
            .exec(move |conn| {
                let credit_type = repository
                    .find_type_with_conn(conn, &payload.credit_type_id)?
                    .ok_or_else(|| {
                        Error::NotFound(format!("credit type {}", payload.credit_type_id))
                    })?;
                if !credit_type.is_active {
                    return Err(CreditError::CreditTypeInactive.into());
                }
                check_amount_against_type(amount, &credit_type).map_err(Error::from)?;

                if let Some(existing) = repository.find_live_request_with_conn(conn, &customer_id)?
                {
                    return Err(match CreditStatus::parse(&existing.status) {
                        CreditStatus::Approved => CreditError::AlreadyApproved.into(),
                        _ => CreditError::AlreadyPending.into(),
                    });
                }
                if let Some(account) = repository.get_account_with_conn(conn, &customer_id)? {
                    match account.status_enum() {
                        CreditStatus::Approved => {
                            return Err(CreditError::AlreadyApproved.into())
                        }
                        CreditStatus::Pending => return Err(CreditError::AlreadyPending.into()),
                        _ => {}
                    }
                }

                let now = Utc::now().to_rfc3339();
                let profile = payload.applicant_profile;
                let new_request = NewCreditRequest {
                    id: Uuid::new_v4().to_string(),
                    customer_id: customer_id.clone(),
                    credit_type_id: credit_type.id.clone(),
                    requested_amount: money::format_amount(amount),
                    full_name: profile.full_name.trim().to_string(),
                    national_id: profile.national_id.trim().to_string(),
                    phone: profile.phone.trim().to_string(),
                    address: profile.address.trim().to_string(),
                    city: profile.city.trim().to_string(),
                    region: profile.region.trim().to_string(),
                    employment_status: profile.employment_status,
                    monthly_income: profile.monthly_income,
                    status: "pending".to_string(),
                    created_at: now.clone(),
                    updated_at: now,
                };
                // The credit account row stays untouched: only the external
                // approval workflow moves `credit.status`.
                repository.insert_request_with_conn(conn, new_request)
            })
            .await?;

        info!(
            "Credit request {} recorded for customer {}",
            request.id, request.customer_id
        );
        Ok(request)
    }
}
