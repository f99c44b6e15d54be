pub mod payments_errors;
pub mod payments_model;
pub mod payments_repository;
pub mod payments_service;
pub mod payments_traits;
pub mod payments_validator;

pub use payments_errors::PaymentError;
pub use payments_model::{
    AllocationBreakdown, AllocationRequest, NewPaymentCode, PaymentCode, PaymentCodeDetails,
    SourceAllocations, SplitPaymentRequest, VoucherAllocation,
};
pub use payments_repository::PaymentCodeRepository;
pub use payments_service::PaymentService;
pub use payments_traits::{PaymentCodeRepositoryTrait, PaymentServiceTrait};
pub use payments_validator::{validate_allocation, SnapshotSources};
