use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use dinepay_core::credits::{CreditRequest, CreditRequestPayload, CreditType};

use crate::error::ApiResult;
use crate::main_lib::AppState;

async fn list_credit_types(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<CreditType>>> {
    let types = state.credit_service.list_credit_types()?;
    Ok(Json(types))
}

async fn submit_credit_request(
    Path(customer_id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreditRequestPayload>,
) -> ApiResult<Json<CreditRequest>> {
    let request = state
        .credit_service
        .submit_credit_request(&customer_id, payload)
        .await?;
    Ok(Json(request))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/credit-types", get(list_credit_types))
        .route(
            "/customers/{customer_id}/credit-requests",
            post(submit_credit_request),
        )
}
