use axum::{
    extract::{Query, State},
    response::Json,
};
use serde_json::{json, Value};

use crate::errors::ApiResult;
use crate::filters::FilterParams;
use crate::server::app::AppState;
use crate::services::PledgeService;

pub async fn time_cycle(
    State(state): State<AppState>,
    Query(params): Query<FilterParams>,
) -> ApiResult<Json<Value>> {
    let bars = PledgeService::new(state.client.clone())
        .time_cycle(&params)
        .await?;
    Ok(Json(json!({ "data": bars })))
}

pub async fn table(
    State(state): State<AppState>,
    Query(params): Query<FilterParams>,
) -> ApiResult<Json<Value>> {
    let rows = PledgeService::new(state.client.clone())
        .table(&params)
        .await?;
    Ok(Json(json!({ "data": rows })))
}
