use std::sync::Arc;

use anyhow::Result;
use axum::{
    routing::{delete, get, patch, post},
    Router,
};
use sea_orm::DatabaseConnection;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};

use super::handlers::{
    budgets, charts, data_themes, datasets, disbursements, documents, eligibility, filter_options,
    funding_requests, grants, health, indicators, pledges_contributions, reports,
};
use crate::render::RenderService;
use crate::settings::Settings;
use crate::snapshots::SnapshotStore;
use crate::upstream::DataApiClient;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub client: DataApiClient,
    pub snapshots: SnapshotStore,
    pub render: Arc<RenderService>,
}

pub async fn create_app(
    db: DatabaseConnection,
    settings: &Settings,
    cors_origin: Option<&str>,
) -> Result<Router> {
    let snapshots = SnapshotStore::new(&settings.data_dir);
    let state = AppState {
        db,
        client: DataApiClient::new(&settings.upstream_base_url),
        snapshots: snapshots.clone(),
        render: Arc::new(RenderService::new(settings, snapshots)),
    };

    let cors = match cors_origin {
        Some(origin) => CorsLayer::new()
            .allow_origin(origin.parse::<axum::http::HeaderValue>()?)
            .allow_methods(Any)
            .allow_headers(Any),
        None => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    };

    let app = Router::new()
        // Health check endpoint
        .route("/health", get(health::health_check))
        // API v1 routes
        .nest("/api/v1", api_v1_routes())
        // Add middleware
        .layer(ServiceBuilder::new().layer(cors))
        .with_state(state);

    Ok(app)
}

fn api_v1_routes() -> Router<AppState> {
    Router::new()
        // Chart definition routes
        .route("/charts", get(charts::list_charts))
        .route("/charts", post(charts::create_chart))
        .route("/charts/:id", get(charts::get_chart))
        .route("/charts/:id", patch(charts::update_chart))
        .route("/charts/:id", delete(charts::delete_chart))
        .route("/charts/:id/render", post(charts::render_chart))
        // Report routes
        .route("/reports", get(reports::list_reports))
        .route("/reports", post(reports::create_report))
        .route("/reports/:id", get(reports::get_report))
        .route("/reports/:id", patch(reports::update_report))
        .route("/reports/:id", delete(reports::delete_report))
        // Dataset routes
        .route("/datasets", get(datasets::list_datasets))
        .route("/datasets", post(datasets::create_dataset))
        .route("/datasets/:id", get(datasets::get_dataset))
        .route("/datasets/:id", patch(datasets::update_dataset))
        .route("/datasets/:id", delete(datasets::delete_dataset))
        .route("/datasets/:id/data", post(datasets::upload_dataset_data))
        // Data theme routes
        .route("/data-themes", get(data_themes::list_data_themes))
        .route("/data-themes", post(data_themes::create_data_theme))
        .route("/data-themes/:id", get(data_themes::get_data_theme))
        .route("/data-themes/:id", patch(data_themes::update_data_theme))
        .route("/data-themes/:id", delete(data_themes::delete_data_theme))
        // Aggregation routes
        .route("/grants", get(grants::list))
        .route("/grants/:id", get(grants::detail))
        .route("/budgets/treemap", get(budgets::treemap))
        .route("/budgets/flow", get(budgets::flow))
        .route("/budgets/table", get(budgets::table))
        .route("/disbursements/treemap", get(disbursements::treemap))
        .route("/disbursements/table", get(disbursements::table))
        .route("/disbursements/time-cycle", get(disbursements::time_cycle))
        .route("/eligibility/table", get(eligibility::table))
        .route("/eligibility/heatmap", get(eligibility::heatmap))
        .route(
            "/pledges-contributions/time-cycle",
            get(pledges_contributions::time_cycle),
        )
        .route(
            "/pledges-contributions/table",
            get(pledges_contributions::table),
        )
        .route("/funding-requests/table", get(funding_requests::table))
        .route("/documents", get(documents::list))
        .route("/indicators", get(indicators::series))
        .route("/filter-options/:dimension", get(filter_options::options))
}
