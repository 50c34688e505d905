use axum::{
    extract::{Query, State},
    response::Json,
};
use serde_json::{json, Value};

use crate::errors::ApiResult;
use crate::filters::FilterParams;
use crate::server::app::AppState;
use crate::services::BudgetService;

pub async fn treemap(
    State(state): State<AppState>,
    Query(params): Query<FilterParams>,
) -> ApiResult<Json<Value>> {
    let tree = BudgetService::new(state.client.clone())
        .treemap(&params)
        .await?;
    Ok(Json(json!({ "data": tree })))
}

pub async fn flow(
    State(state): State<AppState>,
    Query(params): Query<FilterParams>,
) -> ApiResult<Json<Value>> {
    let sankey = BudgetService::new(state.client.clone())
        .flow(&params)
        .await?;
    Ok(Json(json!({ "data": sankey })))
}

pub async fn table(
    State(state): State<AppState>,
    Query(params): Query<FilterParams>,
) -> ApiResult<Json<Value>> {
    let rows = BudgetService::new(state.client.clone())
        .table(&params)
        .await?;
    Ok(Json(json!({ "data": rows })))
}
