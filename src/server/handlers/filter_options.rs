use axum::{
    extract::{Path, State},
    response::Json,
};
use serde_json::{json, Value};

use crate::errors::ApiResult;
use crate::server::app::AppState;
use crate::services::FilterOptionService;

pub async fn options(
    State(state): State<AppState>,
    Path(dimension): Path<String>,
) -> ApiResult<Json<Value>> {
    let options = FilterOptionService::new(state.client.clone())
        .options(&dimension)
        .await?;
    Ok(Json(json!({ "data": options })))
}
