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
use crate::database::entities::{datasets, datasets::Entity as Datasets};
use crate::errors::{ApiError, ApiResult};
use crate::server::app::AppState;

#[derive(Serialize, Deserialize)]
pub struct CreateDatasetRequest {
    pub name: String,
    pub category: Option<String>,
    pub owner: String,
    #[serde(default)]
    pub public: bool,
}

#[derive(Serialize, Deserialize)]
pub struct UpdateDatasetRequest {
    pub name: Option<String>,
    pub category: Option<String>,
    pub public: Option<bool>,
}

pub async fn list_datasets(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<datasets::Model>>, StatusCode> {
    let mut find = Datasets::find().order_by_asc(datasets::Column::Id);
    if let Some(owner) = &query.owner {
        find = find.filter(datasets::Column::Owner.eq(owner.as_str()));
    }
    if let Some(q) = &query.q {
        find = find.filter(datasets::Column::Name.contains(q));
    }

    let datasets = find
        .all(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(Json(datasets))
}

pub async fn create_dataset(
    State(state): State<AppState>,
    Json(payload): Json<CreateDatasetRequest>,
) -> Result<Json<datasets::Model>, StatusCode> {
    let now = Utc::now();
    let dataset = datasets::ActiveModel {
        name: Set(payload.name),
        category: Set(payload.category),
        owner: Set(payload.owner),
        public: Set(payload.public),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let dataset = dataset.insert(&state.db).await.map_err(|err| {
        tracing::error!("Database error creating dataset: {}", err);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(Json(dataset))
}

pub async fn get_dataset(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<datasets::Model>, StatusCode> {
    let dataset = Datasets::find_by_id(id)
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;

    Ok(Json(dataset))
}

pub async fn update_dataset(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateDatasetRequest>,
) -> Result<Json<datasets::Model>, StatusCode> {
    let dataset = Datasets::find_by_id(id)
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;

    let mut dataset: datasets::ActiveModel = dataset.into();
    if let Some(name) = payload.name {
        dataset.name = Set(name);
    }
    if let Some(category) = payload.category {
        dataset.category = Set(Some(category));
    }
    if let Some(public) = payload.public {
        dataset.public = Set(public);
    }
    dataset.updated_at = Set(Utc::now());

    let dataset = dataset
        .update(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(Json(dataset))
}

/// Deleting a dataset also drops its parsed-data snapshot; the snapshot is
/// worthless without the metadata record.
pub async fn delete_dataset(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, StatusCode> {
    let dataset = Datasets::find_by_id(id)
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;

    Datasets::delete_by_id(dataset.id)
        .exec(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    if let Err(err) = state.snapshots.remove(id).await {
        tracing::warn!("Failed to remove snapshot for dataset {}: {}", id, err);
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Accept a parsed row array and write the per-dataset snapshot file the
/// renderer reads.
pub async fn upload_dataset_data(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(rows): Json<Value>,
) -> ApiResult<Json<Value>> {
    Datasets::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("dataset", id.to_string()))?;

    state.snapshots.write(id, &rows).await?;

    let count = rows.as_array().map(Vec::len).unwrap_or(0);
    Ok(Json(json!({ "id": id, "rows": count })))
}
