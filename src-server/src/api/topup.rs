use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::post,
    Json, Router,
};
use dinepay_core::topup::{TopUpCallback, TopUpIntent};

use crate::error::ApiResult;
use crate::main_lib::AppState;

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateIntentRequest {
    amount: String,
}

// Issues the reference the external processor echoes back; the checkout
// session itself is the processor's business.
async fn create_topup_intent(
    Path(customer_id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateIntentRequest>,
) -> ApiResult<Json<TopUpIntent>> {
    let intent = state
        .topup_service
        .create_intent(&customer_id, &request.amount)
        .await?;
    Ok(Json(intent))
}

async fn topup_callback(
    State(state): State<Arc<AppState>>,
    Json(callback): Json<TopUpCallback>,
) -> ApiResult<Json<TopUpIntent>> {
    let intent = state.topup_service.process_callback(callback).await?;
    Ok(Json(intent))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/customers/{customer_id}/wallet/topup/create-intent",
            post(create_topup_intent),
        )
        .route("/webhooks/topup", post(topup_callback))
}
