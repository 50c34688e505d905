use axum::{
    extract::{Query, State},
    response::Json,
};
use serde_json::{json, Value};

use crate::errors::ApiResult;
use crate::filters::FilterParams;
use crate::server::app::AppState;
use crate::services::DisbursementService;

pub async fn treemap(
    State(state): State<AppState>,
    Query(params): Query<FilterParams>,
) -> ApiResult<Json<Value>> {
    let tree = DisbursementService::new(state.client.clone())
        .treemap(&params)
        .await?;
    Ok(Json(json!({ "data": tree })))
}

pub async fn table(
    State(state): State<AppState>,
    Query(params): Query<FilterParams>,
) -> ApiResult<Json<Value>> {
    let rows = DisbursementService::new(state.client.clone())
        .table(&params)
        .await?;
    Ok(Json(json!({ "data": rows })))
}

pub async fn time_cycle(
    State(state): State<AppState>,
    Query(params): Query<FilterParams>,
) -> ApiResult<Json<Value>> {
    let bars = DisbursementService::new(state.client.clone())
        .time_cycle(&params)
        .await?;
    Ok(Json(json!({ "data": bars })))
}
