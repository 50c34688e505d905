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
use crate::database::entities::{reports, reports::Entity as Reports};
use crate::server::app::AppState;

#[derive(Serialize, Deserialize)]
pub struct CreateReportRequest {
    pub name: String,
    pub owner: String,
    #[serde(default = "empty_object")]
    pub heading: Value,
    /// Rows of chart-id references with layout metadata. The ids are not
    /// checked against the charts table.
    #[serde(default = "empty_array")]
    pub rows: Value,
    #[serde(default)]
    pub public: bool,
}

#[derive(Serialize, Deserialize)]
pub struct UpdateReportRequest {
    pub name: Option<String>,
    pub heading: Option<Value>,
    pub rows: Option<Value>,
    pub public: Option<bool>,
}

fn empty_object() -> Value {
    json!({})
}

fn empty_array() -> Value {
    json!([])
}

pub async fn list_reports(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<reports::Model>>, StatusCode> {
    let mut find = Reports::find().order_by_asc(reports::Column::Id);
    if let Some(owner) = &query.owner {
        find = find.filter(reports::Column::Owner.eq(owner.as_str()));
    }
    if let Some(q) = &query.q {
        find = find.filter(reports::Column::Name.contains(q));
    }

    let reports = find
        .all(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(Json(reports))
}

pub async fn create_report(
    State(state): State<AppState>,
    Json(payload): Json<CreateReportRequest>,
) -> Result<Json<reports::Model>, StatusCode> {
    let now = Utc::now();
    let report = reports::ActiveModel {
        name: Set(payload.name),
        owner: Set(payload.owner),
        heading: Set(payload.heading.to_string()),
        rows: Set(payload.rows.to_string()),
        public: Set(payload.public),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let report = report.insert(&state.db).await.map_err(|err| {
        tracing::error!("Database error creating report: {}", err);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(Json(report))
}

pub async fn get_report(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<reports::Model>, StatusCode> {
    let report = Reports::find_by_id(id)
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;

    Ok(Json(report))
}

pub async fn update_report(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateReportRequest>,
) -> Result<Json<reports::Model>, StatusCode> {
    let report = Reports::find_by_id(id)
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;

    let mut report: reports::ActiveModel = report.into();
    if let Some(name) = payload.name {
        report.name = Set(name);
    }
    if let Some(heading) = payload.heading {
        report.heading = Set(heading.to_string());
    }
    if let Some(rows) = payload.rows {
        report.rows = Set(rows.to_string());
    }
    if let Some(public) = payload.public {
        report.public = Set(public);
    }
    report.updated_at = Set(Utc::now());

    let report = report
        .update(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(Json(report))
}

pub async fn delete_report(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, StatusCode> {
    let report = Reports::find_by_id(id)
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;

    Reports::delete_by_id(report.id)
        .exec(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(StatusCode::NO_CONTENT)
}
