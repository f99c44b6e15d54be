use thiserror::Error;

/// Rejection reasons for the top-up bridge.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TopUpError {
    #[error("this top-up confirmation was already applied")]
    Duplicate,

    #[error("top-up amount is invalid")]
    InvalidAmount,

    #[error("no top-up intent matches this reference")]
    UnknownReference,
}

impl TopUpError {
    /// Stable snake_case reason code for the wire.
    pub fn reason(&self) -> &'static str {
        match self {
            TopUpError::Duplicate => "duplicate",
            TopUpError::InvalidAmount => "invalid_amount",
            TopUpError::UnknownReference => "unknown_reference",
        }
    }
}
