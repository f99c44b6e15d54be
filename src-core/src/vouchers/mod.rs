pub mod vouchers_model;
pub mod vouchers_repository;
pub mod vouchers_traits;

pub use vouchers_model::{NewVoucher, Voucher, VoucherOverview};
pub use vouchers_repository::VoucherRepository;
pub use vouchers_traits::VoucherRepositoryTrait;
