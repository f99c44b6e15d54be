pub mod topup_errors;
pub mod topup_model;
pub mod topup_repository;
pub mod topup_service;
pub mod topup_traits;

pub use topup_errors::TopUpError;
pub use topup_model::{NewTopUpIntent, TopUpCallback, TopUpIntent, TopUpStatus};
pub use topup_repository::TopUpRepository;
pub use topup_service::TopUpService;
pub use topup_traits::{TopUpRepositoryTrait, TopUpServiceTrait};
