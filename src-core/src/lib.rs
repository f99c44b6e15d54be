pub mod db;

pub mod credits;
pub mod payments;
pub mod topup;
pub mod vouchers;
pub mod wallet;

pub mod constants;
pub mod errors;
pub mod money;
pub mod schema;

pub use errors::{Error, Result};
