pub mod wallet_model;
pub mod wallet_repository;
pub mod wallet_service;
pub mod wallet_traits;

pub use wallet_model::{
    CashbackOverview, GroupDiscount, NewWallet, NewWalletTransaction, Wallet, WalletOverview,
    WalletTransaction,
};
pub use wallet_repository::WalletRepository;
pub use wallet_service::WalletService;
pub use wallet_traits::{WalletRepositoryTrait, WalletServiceTrait};
