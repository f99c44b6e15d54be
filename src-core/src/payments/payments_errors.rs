use thiserror::Error;

/// Rejection reasons for split-payment validation, in the order the checks
/// run. Client-correctable; surfaced with a stable reason code, and never a
/// partial mutation: any of these rolls the whole commit back.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PaymentError {
    #[error("total amount must be positive")]
    ZeroOrNegativeTotal,

    #[error("allocations must not be negative")]
    NegativeAllocation,

    #[error("allocations do not add up to the total amount")]
    AmountMismatch,

    #[error("personal balance is insufficient")]
    PersonalInsufficient,

    #[error("cashback balance is insufficient")]
    CashbackInsufficient,

    #[error("credit is not available")]
    CreditUnavailable,

    #[error("available credit is insufficient")]
    CreditInsufficient,

    #[error("voucher {0} not found")]
    VoucherNotFound(String),

    #[error("voucher {0} has insufficient remaining value")]
    VoucherInsufficient(String),
}

impl PaymentError {
    /// Stable snake_case reason code for the wire.
    pub fn reason(&self) -> &'static str {
        match self {
            PaymentError::ZeroOrNegativeTotal => "zero_or_negative_total",
            PaymentError::NegativeAllocation => "negative_allocation",
            PaymentError::AmountMismatch => "amount_mismatch",
            PaymentError::PersonalInsufficient => "personal_insufficient",
            PaymentError::CashbackInsufficient => "cashback_insufficient",
            PaymentError::CreditUnavailable => "credit_unavailable",
            PaymentError::CreditInsufficient => "credit_insufficient",
            PaymentError::VoucherNotFound(_) => "voucher_not_found",
            PaymentError::VoucherInsufficient(_) => "voucher_insufficient",
        }
    }
}
