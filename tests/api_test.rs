//! API integration tests
//!
//! CRUD and snapshot behavior for the chart/report/dataset/data-theme
//! endpoints, against a temp-file SQLite database.

use anyhow::Result;
use axum::http::StatusCode;
use axum_test::TestServer;
use grantflow::database::{connection::establish_connection, setup_database};
use grantflow::server::app::create_app;
use grantflow::settings::Settings;
use serde_json::{json, Value};
use tempfile::{NamedTempFile, TempDir};

fn test_settings(data_dir: &TempDir) -> Settings {
    Settings {
        port: 0,
        database_path: ":memory:".to_string(),
        data_dir: data_dir.path().to_path_buf(),
        // Nothing listens here; aggregation endpoints are not under test.
        upstream_base_url: "http://127.0.0.1:9/v4/odata".to_string(),
        renderer_command: "true".to_string(),
        renderer_script: data_dir.path().join("missing-renderer.js"),
        render_timeout_secs: 5,
        log_level: None,
    }
}

/// Create a test server over a temp-file database.
async fn setup_test_server(data_dir: &TempDir) -> Result<(TestServer, NamedTempFile)> {
    let temp_file = NamedTempFile::new()?;
    let db_url = format!("sqlite://{}?mode=rwc", temp_file.path().display());

    let db = establish_connection(&db_url).await?;
    setup_database(&db).await?;

    let app = create_app(db, &test_settings(data_dir), None).await?;
    let server = TestServer::new(app)?;

    Ok((server, temp_file))
}

#[tokio::test]
async fn test_health_endpoint() -> Result<()> {
    let data_dir = TempDir::new()?;
    let (server, _db) = setup_test_server(&data_dir).await?;

    let response = server.get("/health").await;

    assert_eq!(response.status_code(), StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body["service"], "grantflow");
    assert_eq!(body["status"], "healthy");
    assert!(body["version"].is_string());

    Ok(())
}

#[tokio::test]
async fn test_charts_crud_api() -> Result<()> {
    let data_dir = TempDir::new()?;
    let (server, _db) = setup_test_server(&data_dir).await?;

    // Create
    let create_payload = json!({
        "name": "Disbursements by component",
        "vizType": "treemap",
        "owner": "auth0|tester",
        "mapping": {"value": "amount"},
        "public": false
    });

    let response = server.post("/api/v1/charts").json(&create_payload).await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let chart: Value = response.json();
    let chart_id = chart["id"].as_i64().unwrap();
    assert_eq!(chart["name"], "Disbursements by component");
    assert_eq!(chart["viz_type"], "treemap");
    assert_eq!(chart["mapping"], "{\"value\":\"amount\"}");

    // List
    let response = server.get("/api/v1/charts").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let charts: Vec<Value> = response.json();
    assert_eq!(charts.len(), 1);
    assert_eq!(charts[0]["id"], chart_id);

    // List filtered by owner
    let response = server
        .get("/api/v1/charts")
        .add_query_param("owner", "somebody-else")
        .await;
    let charts: Vec<Value> = response.json();
    assert!(charts.is_empty());

    // Get
    let response = server.get(&format!("/api/v1/charts/{}", chart_id)).await;
    assert_eq!(response.status_code(), StatusCode::OK);

    // Update
    let response = server
        .patch(&format!("/api/v1/charts/{}", chart_id))
        .json(&json!({"name": "Renamed chart", "public": true}))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let updated: Value = response.json();
    assert_eq!(updated["name"], "Renamed chart");
    assert_eq!(updated["public"], true);
    assert_eq!(updated["viz_type"], "treemap");

    // Delete
    let response = server
        .delete(&format!("/api/v1/charts/{}", chart_id))
        .await;
    assert_eq!(response.status_code(), StatusCode::NO_CONTENT);

    let response = server.get(&format!("/api/v1/charts/{}", chart_id)).await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn test_reports_crud_api() -> Result<()> {
    let data_dir = TempDir::new()?;
    let (server, _db) = setup_test_server(&data_dir).await?;

    let create_payload = json!({
        "name": "Annual overview",
        "owner": "auth0|tester",
        "heading": {"title": "Annual overview", "description": "2024"},
        "rows": [{"charts": [1, 2], "layout": "half-half"}],
        "public": true
    });

    let response = server.post("/api/v1/reports").json(&create_payload).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let report: Value = response.json();
    let report_id = report["id"].as_i64().unwrap();

    // Referenced chart ids are stored verbatim, not validated.
    let stored_rows: Value = serde_json::from_str(report["rows"].as_str().unwrap())?;
    assert_eq!(stored_rows[0]["charts"][0], 1);

    let response = server
        .patch(&format!("/api/v1/reports/{}", report_id))
        .json(&json!({"rows": []}))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let updated: Value = response.json();
    assert_eq!(updated["rows"], "[]");

    let response = server
        .delete(&format!("/api/v1/reports/{}", report_id))
        .await;
    assert_eq!(response.status_code(), StatusCode::NO_CONTENT);

    Ok(())
}

#[tokio::test]
async fn test_datasets_and_snapshots() -> Result<()> {
    let data_dir = TempDir::new()?;
    let (server, _db) = setup_test_server(&data_dir).await?;

    let response = server
        .post("/api/v1/datasets")
        .json(&json!({
            "name": "Upload 2024-03",
            "category": "finance",
            "owner": "auth0|tester"
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let dataset: Value = response.json();
    let dataset_id = dataset["id"].as_i64().unwrap();

    // Upload parsed rows; the snapshot file appears on disk.
    let rows = json!([{"country": "KEN", "value": 10}, {"country": "UGA", "value": 7}]);
    let response = server
        .post(&format!("/api/v1/datasets/{}/data", dataset_id))
        .json(&rows)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["rows"], 2);

    let snapshot_path = data_dir
        .path()
        .join("parsed")
        .join(format!("{}.json", dataset_id));
    assert!(snapshot_path.exists());

    // Uploading against a missing dataset is a structured 404.
    let response = server
        .post("/api/v1/datasets/9999/data")
        .json(&rows)
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["error"], "not_found");

    // Deleting the dataset removes the snapshot too.
    let response = server
        .delete(&format!("/api/v1/datasets/{}", dataset_id))
        .await;
    assert_eq!(response.status_code(), StatusCode::NO_CONTENT);
    assert!(!snapshot_path.exists());

    Ok(())
}

#[tokio::test]
async fn test_data_themes_crud_api() -> Result<()> {
    let data_dir = TempDir::new()?;
    let (server, _db) = setup_test_server(&data_dir).await?;

    let response = server
        .post("/api/v1/data-themes")
        .json(&json!({
            "name": "HIV overview",
            "owner": "auth0|tester",
            "tabs": [{"title": "Intro", "blocks": [{"type": "text", "content": "..."}]}]
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let theme: Value = response.json();
    let theme_id = theme["id"].as_i64().unwrap();

    let response = server.get("/api/v1/data-themes?q=HIV").await;
    let themes: Vec<Value> = response.json();
    assert_eq!(themes.len(), 1);
    assert_eq!(themes[0]["id"], theme_id);

    let response = server.get("/api/v1/data-themes?q=malaria").await;
    let themes: Vec<Value> = response.json();
    assert!(themes.is_empty());

    Ok(())
}
