use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use dinepay_core::payments::{PaymentCodeDetails, SplitPaymentRequest};
use serde_json::json;

use crate::error::ApiResult;
use crate::main_lib::AppState;

async fn commit_split_payment(
    Path(customer_id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(request): Json<SplitPaymentRequest>,
) -> ApiResult<Json<PaymentCodeDetails>> {
    let details = state
        .payment_service
        .commit_split_payment(&customer_id, request)
        .await?;
    Ok(Json(details))
}

// Best-effort pre-check for live UI feedback; the commit re-validates inside
// its own transaction.
async fn validate_split_payment(
    Path(customer_id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(request): Json<SplitPaymentRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    state
        .payment_service
        .validate_split_payment(&customer_id, &request)?;
    Ok(Json(json!({ "valid": true })))
}

async fn list_payment_codes(
    Path(customer_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<PaymentCodeDetails>>> {
    let codes = state.payment_service.list_payment_codes(&customer_id)?;
    Ok(Json(codes))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/customers/{customer_id}/wallet/split-payment",
            post(commit_split_payment),
        )
        .route(
            "/customers/{customer_id}/wallet/split-payment/validate",
            post(validate_split_payment),
        )
        .route(
            "/customers/{customer_id}/payment-codes",
            get(list_payment_codes),
        )
}
