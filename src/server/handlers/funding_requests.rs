use axum::{
    extract::{Query, State},
    response::Json,
};
use serde_json::{json, Value};

use crate::errors::ApiResult;
use crate::filters::FilterParams;
use crate::server::app::AppState;
use crate::services::FundingRequestService;

pub async fn table(
    State(state): State<AppState>,
    Query(params): Query<FilterParams>,
) -> ApiResult<Json<Value>> {
    let rows = FundingRequestService::new(state.client.clone())
        .table(&params)
        .await?;
    Ok(Json(json!({ "data": rows })))
}
