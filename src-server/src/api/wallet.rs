use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use dinepay_core::wallet::{WalletOverview, WalletTransaction};

use crate::error::ApiResult;
use crate::main_lib::AppState;

#[derive(serde::Deserialize)]
struct TransactionsQuery {
    limit: Option<i64>,
}

async fn get_wallet_overview(
    Path(customer_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<WalletOverview>> {
    let overview = state.wallet_service.get_wallet_overview(&customer_id)?;
    Ok(Json(overview))
}

async fn get_wallet_transactions(
    Path(customer_id): Path<String>,
    Query(query): Query<TransactionsQuery>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<WalletTransaction>>> {
    let transactions = state
        .wallet_service
        .get_wallet_transactions(&customer_id, query.limit)?;
    Ok(Json(transactions))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/customers/{customer_id}/wallet/overview",
            get(get_wallet_overview),
        )
        .route(
            "/customers/{customer_id}/wallet/transactions",
            get(get_wallet_transactions),
        )
}
