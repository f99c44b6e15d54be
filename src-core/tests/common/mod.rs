use std::sync::Arc;

use chrono::Utc;
use diesel::prelude::*;
use tempfile::TempDir;

use dinepay_core::credits::{
    CreditRepository, CreditRepositoryTrait, CreditService, CreditServiceTrait,
};
use dinepay_core::db::{self, DbPool, WriteHandle};
use dinepay_core::payments::{
    PaymentCodeRepository, PaymentCodeRepositoryTrait, PaymentService, PaymentServiceTrait,
};
use dinepay_core::topup::{TopUpRepository, TopUpRepositoryTrait, TopUpService, TopUpServiceTrait};
use dinepay_core::vouchers::{NewVoucher, VoucherRepository, VoucherRepositoryTrait};
use dinepay_core::wallet::{WalletRepository, WalletRepositoryTrait, WalletService, WalletServiceTrait};

/// A fully wired engine over a throwaway database. The temp dir must stay
/// alive for as long as the engine is used.
pub struct TestEngine {
    pub pool: Arc<DbPool>,
    pub writer: WriteHandle,
    pub voucher_repository: Arc<dyn VoucherRepositoryTrait>,
    pub wallet_service: Arc<dyn WalletServiceTrait>,
    pub payment_service: Arc<dyn PaymentServiceTrait>,
    pub credit_service: Arc<dyn CreditServiceTrait>,
    pub topup_service: Arc<dyn TopUpServiceTrait>,
    _tmp: TempDir,
}

pub fn build_engine() -> TestEngine {
    let tmp = tempfile::tempdir().expect("Failed to create temp dir");
    let db_path = tmp.path().join("engine.db");
    let db_path = db::init(db_path.to_str().unwrap()).expect("Failed to initialize database");
    let pool = db::create_pool(&db_path).expect("Failed to create database pool");
    db::run_migrations(&pool).expect("Failed to run migrations");
    let writer = db::spawn_writer((*pool).clone());

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
        writer.clone(),
        topup_repository,
        wallet_repository.clone(),
    ));

    TestEngine {
        pool,
        writer,
        voucher_repository,
        wallet_service,
        payment_service,
        credit_service,
        topup_service,
        _tmp: tmp,
    }
}

pub fn seed_wallet(engine: &TestEngine, customer_id: &str, personal: &str, cashback: &str) {
    use dinepay_core::schema::wallets;
    let mut conn = engine.pool.get().unwrap();
    let now = Utc::now().to_rfc3339();
    diesel::insert_into(wallets::table)
        .values((
            wallets::customer_id.eq(customer_id),
            wallets::personal_balance.eq(personal),
            wallets::cashback_balance.eq(cashback),
            wallets::cashback_earned.eq(cashback),
            wallets::created_at.eq(&now),
            wallets::updated_at.eq(&now),
        ))
        .execute(&mut conn)
        .unwrap();
}

pub async fn seed_voucher(
    engine: &TestEngine,
    id: &str,
    customer_id: &str,
    total_meals: i32,
    purchase_price: &str,
) {
    engine
        .voucher_repository
        .create(NewVoucher {
            id: Some(id.to_string()),
            customer_id: customer_id.to_string(),
            restaurant_id: "r1".to_string(),
            total_meals,
            used_meals: 0,
            purchase_price: purchase_price.to_string(),
            spent_value: "0.00".to_string(),
            expires_at: None,
            created_at: None,
            updated_at: None,
        })
        .await
        .unwrap();
}

/// Simulates the external approval actor granting a credit line.
pub fn approve_credit(engine: &TestEngine, customer_id: &str, limit: &str) {
    use dinepay_core::schema::credit_accounts;
    let mut conn = engine.pool.get().unwrap();
    let now = Utc::now().to_rfc3339();
    diesel::insert_into(credit_accounts::table)
        .values((
            credit_accounts::customer_id.eq(customer_id),
            credit_accounts::status.eq("approved"),
            credit_accounts::credit_limit.eq(limit),
            credit_accounts::used_credit.eq("0.00"),
            credit_accounts::interest_rate.eq("0.00"),
            credit_accounts::payment_term_days.eq(30),
            credit_accounts::credit_type_id.eq::<Option<String>>(None),
            credit_accounts::created_at.eq(&now),
            credit_accounts::updated_at.eq(&now),
        ))
        .execute(&mut conn)
        .unwrap();
}

/// Simulates a walk-in meal redemption recorded outside the engine.
pub fn consume_meal(engine: &TestEngine, voucher_id: &str) {
    use dinepay_core::schema::vouchers;
    let mut conn = engine.pool.get().unwrap();
    diesel::update(vouchers::table.find(voucher_id))
        .set(vouchers::used_meals.eq(vouchers::used_meals + 1))
        .execute(&mut conn)
        .unwrap();
}
