pub mod app;
pub mod handlers;

use anyhow::Result;
use sea_orm_migration::prelude::*;
use tracing::info;

use crate::database::{connection::*, migrations::Migrator};
use crate::settings::Settings;

pub async fn start_server(settings: Settings, cors_origin: Option<&str>) -> Result<()> {
    let database_url = get_database_url(Some(settings.database_path.as_str()));
    let db = establish_connection(&database_url).await?;

    // Run migrations
    Migrator::up(&db, None).await?;
    info!("Database migrations completed");

    let port = settings.port;
    let app = app::create_app(db, &settings, cors_origin).await?;

    log_routes();

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
    info!("Server running on http://0.0.0.0:{}", port);

    axum::serve(listener, app).await?;

    Ok(())
}

fn log_routes() {
    info!("API Endpoints:");
    info!("  /health                     - Health check");
    info!("  /api/v1/charts              - Chart definitions (CRUD, render)");
    info!("  /api/v1/reports             - Report definitions (CRUD)");
    info!("  /api/v1/datasets            - Dataset metadata and parsed data");
    info!("  /api/v1/data-themes         - Data theme definitions (CRUD)");
    info!("  /api/v1/*                   - Aggregation endpoints (budgets, disbursements, ...)");
}
