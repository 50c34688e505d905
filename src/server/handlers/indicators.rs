use axum::{
    extract::{Query, State},
    response::Json,
};
use serde_json::{json, Value};

use crate::errors::ApiResult;
use crate::filters::FilterParams;
use crate::server::app::AppState;
use crate::services::IndicatorService;

pub async fn series(
    State(state): State<AppState>,
    Query(params): Query<FilterParams>,
) -> ApiResult<Json<Value>> {
    let series = IndicatorService::new(state.client.clone())
        .series(&params)
        .await?;
    Ok(Json(json!({ "data": series })))
}
