//! Aggregation endpoint behavior under failure
//!
//! The upstream client points at an address where nothing listens, so
//! every upstream-backed endpoint must come back with the uniform 502
//! structured body instead of crashing. Static-data endpoints still work.

use anyhow::Result;
use axum::http::StatusCode;
use axum_test::TestServer;
use grantflow::database::{connection::establish_connection, setup_database};
use grantflow::server::app::create_app;
use grantflow::settings::Settings;
use serde_json::{json, Value};
use tempfile::TempDir;

async fn setup_test_server(data_dir: &TempDir) -> Result<TestServer> {
    let db = establish_connection("sqlite::memory:").await?;
    setup_database(&db).await?;

    let settings = Settings {
        port: 0,
        database_path: ":memory:".to_string(),
        data_dir: data_dir.path().to_path_buf(),
        upstream_base_url: "http://127.0.0.1:9/v4/odata".to_string(),
        renderer_command: "true".to_string(),
        renderer_script: data_dir.path().join("missing-renderer.js"),
        render_timeout_secs: 5,
        log_level: None,
    };

    let app = create_app(db, &settings, None).await?;
    Ok(TestServer::new(app)?)
}

#[tokio::test]
async fn upstream_failure_is_a_structured_502() -> Result<()> {
    let data_dir = TempDir::new()?;
    let server = setup_test_server(&data_dir).await?;

    // Each entry is (path, query params). The query params are delivered via
    // the test client's query-param API rather than inlined in the path, which
    // this axum-test version does not split out of a relative path.
    let cases: [(&str, &[(&str, &str)]); 12] = [
        ("/api/v1/grants", &[("components", "HIV")]),
        ("/api/v1/budgets/treemap", &[]),
        ("/api/v1/budgets/flow", &[]),
        ("/api/v1/budgets/table", &[]),
        ("/api/v1/disbursements/treemap", &[]),
        ("/api/v1/disbursements/time-cycle", &[]),
        ("/api/v1/eligibility/table", &[("geographies", "KEN")]),
        ("/api/v1/pledges-contributions/table", &[]),
        ("/api/v1/funding-requests/table", &[]),
        ("/api/v1/documents", &[]),
        ("/api/v1/indicators", &[]),
        ("/api/v1/filter-options/components", &[]),
    ];
    for (path, query) in cases {
        let mut request = server.get(path);
        for (key, value) in query {
            request = request.add_query_param(key, value);
        }
        let response = request.await;
        assert_eq!(
            response.status_code(),
            StatusCode::BAD_GATEWAY,
            "unexpected status for {}",
            path
        );
        let body: Value = response.json();
        assert_eq!(body["error"], "upstream_unavailable", "body for {}", path);
        assert!(body["message"].is_string());
    }

    Ok(())
}

#[tokio::test]
async fn eligibility_without_geographies_is_a_400() -> Result<()> {
    let data_dir = TempDir::new()?;
    let server = setup_test_server(&data_dir).await?;

    for path in ["/api/v1/eligibility/table", "/api/v1/eligibility/heatmap"] {
        let response = server.get(path).await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["error"], "missing_parameter");
        assert_eq!(body["message"], "'geographies' parameter is required");
    }

    Ok(())
}

#[tokio::test]
async fn geography_filter_options_need_no_upstream() -> Result<()> {
    let data_dir = TempDir::new()?;
    let server = setup_test_server(&data_dir).await?;

    let response = server.get("/api/v1/filter-options/geographies").await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body: Value = response.json();
    let options = body["data"].as_array().unwrap();
    assert!(options.len() > 50);
    assert!(options
        .iter()
        .any(|option| option["value"] == "KEN" && option["label"] == "Kenya"));

    Ok(())
}

#[tokio::test]
async fn unknown_filter_dimension_is_a_404() -> Result<()> {
    let data_dir = TempDir::new()?;
    let server = setup_test_server(&data_dir).await?;

    let response = server.get("/api/v1/filter-options/colors").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["error"], "not_found");

    Ok(())
}

#[tokio::test]
async fn render_without_snapshot_is_an_error_payload() -> Result<()> {
    let data_dir = TempDir::new()?;
    let server = setup_test_server(&data_dir).await?;

    // A chart pointing at a dataset that has no parsed-data snapshot.
    let response = server
        .post("/api/v1/charts")
        .json(&json!({
            "name": "Orphan chart",
            "vizType": "barchart",
            "owner": "auth0|tester",
            "datasetId": 1234
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let chart: Value = response.json();
    let chart_id = chart["id"].as_i64().unwrap();

    let response = server
        .post(&format!("/api/v1/charts/{}/render", chart_id))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_GATEWAY);
    let body: Value = response.json();
    assert_eq!(body["error"], "render_failed");
    assert_eq!(body["message"], "no parsed data snapshot for dataset 1234");

    Ok(())
}

#[tokio::test]
async fn render_of_missing_chart_is_a_404() -> Result<()> {
    let data_dir = TempDir::new()?;
    let server = setup_test_server(&data_dir).await?;

    let response = server.post("/api/v1/charts/31337/render").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["error"], "not_found");

    Ok(())
}
