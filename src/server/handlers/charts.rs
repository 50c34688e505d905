use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::ListQuery;
use crate::database::entities::{charts, charts::Entity as Charts};
use crate::errors::{ApiError, ApiResult};
use crate::server::app::AppState;

#[derive(Serialize, Deserialize)]
pub struct CreateChartRequest {
    pub name: String,
    #[serde(rename = "vizType")]
    pub viz_type: String,
    pub owner: String,
    #[serde(rename = "datasetId")]
    pub dataset_id: Option<i32>,
    #[serde(default = "empty_object")]
    pub mapping: Value,
    #[serde(default = "empty_object", rename = "vizOptions")]
    pub viz_options: Value,
    #[serde(default = "empty_object", rename = "appliedFilters")]
    pub applied_filters: Value,
    #[serde(default)]
    pub public: bool,
}

#[derive(Serialize, Deserialize)]
pub struct UpdateChartRequest {
    pub name: Option<String>,
    #[serde(rename = "vizType")]
    pub viz_type: Option<String>,
    #[serde(rename = "datasetId")]
    pub dataset_id: Option<i32>,
    pub mapping: Option<Value>,
    #[serde(rename = "vizOptions")]
    pub viz_options: Option<Value>,
    #[serde(rename = "appliedFilters")]
    pub applied_filters: Option<Value>,
    pub public: Option<bool>,
}

fn empty_object() -> Value {
    json!({})
}

pub async fn list_charts(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<charts::Model>>, StatusCode> {
    let mut find = Charts::find().order_by_asc(charts::Column::Id);
    if let Some(owner) = &query.owner {
        find = find.filter(charts::Column::Owner.eq(owner.as_str()));
    }
    if let Some(q) = &query.q {
        find = find.filter(charts::Column::Name.contains(q));
    }

    let charts = find
        .all(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(Json(charts))
}

pub async fn create_chart(
    State(state): State<AppState>,
    Json(payload): Json<CreateChartRequest>,
) -> Result<Json<charts::Model>, StatusCode> {
    let now = Utc::now();
    let chart = charts::ActiveModel {
        name: Set(payload.name),
        viz_type: Set(payload.viz_type),
        owner: Set(payload.owner),
        dataset_id: Set(payload.dataset_id),
        mapping: Set(payload.mapping.to_string()),
        viz_options: Set(payload.viz_options.to_string()),
        applied_filters: Set(payload.applied_filters.to_string()),
        public: Set(payload.public),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let chart = chart.insert(&state.db).await.map_err(|err| {
        tracing::error!("Database error creating chart: {}", err);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(Json(chart))
}

pub async fn get_chart(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<charts::Model>, StatusCode> {
    let chart = Charts::find_by_id(id)
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;

    Ok(Json(chart))
}

pub async fn update_chart(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateChartRequest>,
) -> Result<Json<charts::Model>, StatusCode> {
    let chart = Charts::find_by_id(id)
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;

    let mut chart: charts::ActiveModel = chart.into();
    if let Some(name) = payload.name {
        chart.name = Set(name);
    }
    if let Some(viz_type) = payload.viz_type {
        chart.viz_type = Set(viz_type);
    }
    if let Some(dataset_id) = payload.dataset_id {
        chart.dataset_id = Set(Some(dataset_id));
    }
    if let Some(mapping) = payload.mapping {
        chart.mapping = Set(mapping.to_string());
    }
    if let Some(viz_options) = payload.viz_options {
        chart.viz_options = Set(viz_options.to_string());
    }
    if let Some(applied_filters) = payload.applied_filters {
        chart.applied_filters = Set(applied_filters.to_string());
    }
    if let Some(public) = payload.public {
        chart.public = Set(public);
    }
    chart.updated_at = Set(Utc::now());

    let chart = chart
        .update(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(Json(chart))
}

pub async fn delete_chart(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, StatusCode> {
    let chart = Charts::find_by_id(id)
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;

    Charts::delete_by_id(chart.id)
        .exec(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(StatusCode::NO_CONTENT)
}

/// Render a stored chart through the out-of-process renderer. Failures
/// come back as the structured error body, never as a crash.
pub async fn render_chart(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<Value>> {
    let chart = Charts::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("chart", id.to_string()))?;

    let rendered = state.render.render(&chart).await?;

    Ok(Json(json!({ "id": chart.id, "render": rendered })))
}
