use axum::{
    extract::{Query, State},
    response::Json,
};
use serde_json::{json, Value};

use crate::errors::ApiResult;
use crate::filters::FilterParams;
use crate::server::app::AppState;
use crate::services::EligibilityService;

pub async fn table(
    State(state): State<AppState>,
    Query(params): Query<FilterParams>,
) -> ApiResult<Json<Value>> {
    let rows = EligibilityService::new(state.client.clone())
        .table(&params)
        .await?;
    Ok(Json(json!({ "data": rows })))
}

pub async fn heatmap(
    State(state): State<AppState>,
    Query(params): Query<FilterParams>,
) -> ApiResult<Json<Value>> {
    let cells = EligibilityService::new(state.client.clone())
        .heatmap(&params)
        .await?;
    Ok(Json(json!({ "data": cells })))
}
