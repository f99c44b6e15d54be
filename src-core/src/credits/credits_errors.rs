use thiserror::Error;

/// Rejection reasons for the credit request workflow. Client-correctable;
/// surfaced with a stable reason code and never logged as system failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CreditError {
    #[error("a credit request is already pending")]
    AlreadyPending,

    #[error("credit is already approved")]
    AlreadyApproved,

    #[error("the selected credit type is not available")]
    CreditTypeInactive,

    #[error("requested amount is outside the credit type's bounds")]
    AmountOutOfRange,

    #[error("national id failed validation")]
    InvalidNationalId,

    #[error("required field '{0}' is missing")]
    MissingRequiredField(String),
}

impl CreditError {
    /// Stable snake_case reason code for the wire.
    pub fn reason(&self) -> &'static str {
        match self {
            CreditError::AlreadyPending => "already_pending",
            CreditError::AlreadyApproved => "already_approved",
            CreditError::CreditTypeInactive => "credit_type_inactive",
            CreditError::AmountOutOfRange => "amount_out_of_range",
            CreditError::InvalidNationalId => "invalid_national_id",
            CreditError::MissingRequiredField(_) => "missing_required_field",
        }
    }
}
