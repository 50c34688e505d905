use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use serde_json::{json, Value};

use crate::errors::ApiResult;
use crate::filters::FilterParams;
use crate::server::app::AppState;
use crate::services::GrantService;

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<FilterParams>,
) -> ApiResult<Json<Value>> {
    let grants = GrantService::new(state.client.clone()).list(&params).await?;
    Ok(Json(json!({ "count": grants.count, "data": grants.data })))
}

pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let grant = GrantService::new(state.client.clone()).detail(&id).await?;
    Ok(Json(json!({ "data": grant })))
}
