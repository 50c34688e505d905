use axum::{
    extract::{Query, State},
    response::Json,
};
use serde_json::{json, Value};

use crate::errors::ApiResult;
use crate::filters::FilterParams;
use crate::server::app::AppState;
use crate::services::DocumentService;

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<FilterParams>,
) -> ApiResult<Json<Value>> {
    let rows = DocumentService::new(state.client.clone())
        .list(&params)
        .await?;
    Ok(Json(json!({ "data": rows })))
}
