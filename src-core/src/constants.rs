/// Prefix for issued payment codes
pub const PAYMENT_CODE_PREFIX: &str = "DP";

/// Minor-unit scale for all money amounts (two decimals, bani/cents)
pub const MONEY_SCALE: u32 = 2;

/// Platform ceiling for a single wallet top-up
pub const MAX_TOPUP_AMOUNT: &str = "10000.00";

/// Default page size for wallet transaction history
pub const DEFAULT_TRANSACTION_LIMIT: i64 = 20;
