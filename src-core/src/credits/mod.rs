pub mod cnp;
pub mod credits_errors;
pub mod credits_model;
pub mod credits_repository;
pub mod credits_service;
pub mod credits_traits;

pub use credits_errors::CreditError;
pub use credits_model::{
    ApplicantProfile, CreditAccount, CreditOverview, CreditRequest, CreditRequestPayload,
    CreditStatus, CreditType, NewCreditRequest,
};
pub use credits_repository::CreditRepository;
pub use credits_service::CreditService;
pub use credits_traits::{CreditRepositoryTrait, CreditServiceTrait};
