use std::sync::Arc;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::Config;
use dinepay_core::{
    credits::{CreditRepository, CreditRepositoryTrait, CreditService, CreditServiceTrait},
    db::{self, write_actor},
    payments::{
        PaymentCodeRepository, PaymentCodeRepositoryTrait, PaymentService, PaymentServiceTrait,
    },
    topup::{TopUpRepository, TopUpRepositoryTrait, TopUpService, TopUpServiceTrait},
    vouchers::{VoucherRepository, VoucherRepositoryTrait},
    wallet::{WalletRepository, WalletRepositoryTrait, WalletService, WalletServiceTrait},
};

pub struct AppState {
    pub wallet_service: Arc<dyn WalletServiceTrait>,
    pub payment_service: Arc<dyn PaymentServiceTrait>,
    pub credit_service: Arc<dyn CreditServiceTrait>,
    pub topup_service: Arc<dyn TopUpServiceTrait>,
}

pub fn init_tracing() {
    let fmt_layer = fmt::layer().json().with_current_span(false);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = write_actor::spawn_writer((*pool).clone());

    let wallet_repository: Arc<dyn WalletRepositoryTrait> =
        Arc::new(WalletRepository::new(pool.clone()));
    let voucher_repository: Arc<dyn VoucherRepositoryTrait> =
        Arc::new(VoucherRepository::new(pool.clone(), writer.clone()));
    let credit_repository: Arc<dyn CreditRepositoryTrait> =
        Arc::new(CreditRepository::new(pool.clone()));
    let payment_code_repository: Arc<dyn PaymentCodeRepositoryTrait> =
        Arc::new(PaymentCodeRepository::new(pool.clone()));
    let topup_repository: Arc<dyn TopUpRepositoryTrait> = Arc::new(TopUpRepository::new());

    let wallet_service: Arc<dyn WalletServiceTrait> = Arc::new(WalletService::new(
        pool.clone(),
        wallet_repository.clone(),
        voucher_repository.clone(),
        credit_repository.clone(),
    ));
    let payment_service: Arc<dyn PaymentServiceTrait> = Arc::new(PaymentService::new(
        pool.clone(),
        writer.clone(),
        wallet_repository.clone(),
        voucher_repository.clone(),
        credit_repository.clone(),
        payment_code_repository.clone(),
    ));
    let credit_service: Arc<dyn CreditServiceTrait> =
        Arc::new(CreditService::new(credit_repository.clone(), writer.clone()));
    let topup_service: Arc<dyn TopUpServiceTrait> = Arc::new(TopUpService::new(
        writer,
        topup_repository,
        wallet_repository,
    ));

    Ok(Arc::new(AppState {
        wallet_service,
        payment_service,
        credit_service,
        topup_service,
    }))
}
