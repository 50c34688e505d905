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
use crate::database::entities::{data_themes, data_themes::Entity as DataThemes};
use crate::server::app::AppState;

#[derive(Serialize, Deserialize)]
pub struct CreateDataThemeRequest {
    pub name: String,
    pub owner: String,
    /// Tabs of mixed text and visualization blocks.
    #[serde(default = "empty_array")]
    pub tabs: Value,
    #[serde(default)]
    pub public: bool,
}

#[derive(Serialize, Deserialize)]
pub struct UpdateDataThemeRequest {
    pub name: Option<String>,
    pub tabs: Option<Value>,
    pub public: Option<bool>,
}

fn empty_array() -> Value {
    json!([])
}

pub async fn list_data_themes(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<data_themes::Model>>, StatusCode> {
    let mut find = DataThemes::find().order_by_asc(data_themes::Column::Id);
    if let Some(owner) = &query.owner {
        find = find.filter(data_themes::Column::Owner.eq(owner.as_str()));
    }
    if let Some(q) = &query.q {
        find = find.filter(data_themes::Column::Name.contains(q));
    }

    let themes = find
        .all(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(Json(themes))
}

pub async fn create_data_theme(
    State(state): State<AppState>,
    Json(payload): Json<CreateDataThemeRequest>,
) -> Result<Json<data_themes::Model>, StatusCode> {
    let now = Utc::now();
    let theme = data_themes::ActiveModel {
        name: Set(payload.name),
        owner: Set(payload.owner),
        tabs: Set(payload.tabs.to_string()),
        public: Set(payload.public),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let theme = theme.insert(&state.db).await.map_err(|err| {
        tracing::error!("Database error creating data theme: {}", err);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(Json(theme))
}

pub async fn get_data_theme(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<data_themes::Model>, StatusCode> {
    let theme = DataThemes::find_by_id(id)
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;

    Ok(Json(theme))
}

pub async fn update_data_theme(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateDataThemeRequest>,
) -> Result<Json<data_themes::Model>, StatusCode> {
    let theme = DataThemes::find_by_id(id)
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;

    let mut theme: data_themes::ActiveModel = theme.into();
    if let Some(name) = payload.name {
        theme.name = Set(name);
    }
    if let Some(tabs) = payload.tabs {
        theme.tabs = Set(tabs.to_string());
    }
    if let Some(public) = payload.public {
        theme.public = Set(public);
    }
    theme.updated_at = Set(Utc::now());

    let theme = theme
        .update(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(Json(theme))
}

pub async fn delete_data_theme(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, StatusCode> {
    let theme = DataThemes::find_by_id(id)
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;

    DataThemes::delete_by_id(theme.id)
        .exec(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(StatusCode::NO_CONTENT)
}
