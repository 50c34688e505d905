use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use serde::Serialize;
use serde_json::Value;
use tokio::process::Command;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use crate::database::entities::charts;
use crate::errors::RenderError;
use crate::settings::Settings;
use crate::snapshots::SnapshotStore;

/// What the out-of-process renderer reads: the chart definition plus the
/// dataset's parsed rows.
#[derive(Serialize)]
struct RenderRequest<'a> {
    body: &'a Value,
    #[serde(rename = "chartData")]
    chart_data: &'a Value,
}

/// Drives the bundled chart renderer: write a request file, run the
/// renderer on it, read back `<request>_rendered.json`, delete both.
///
/// Renders of the same chart id serialize on a per-id lock, and request
/// files are named by a per-request UUID, so concurrent renders cannot
/// clobber each other's temp files. The renderer runs under a hard
/// timeout.
pub struct RenderService {
    render_dir: PathBuf,
    command: String,
    script: PathBuf,
    timeout: Duration,
    snapshots: SnapshotStore,
    locks: DashMap<i32, Arc<Mutex<()>>>,
}

impl RenderService {
    pub fn new(settings: &Settings, snapshots: SnapshotStore) -> Self {
        Self {
            render_dir: settings.data_dir.join("render"),
            command: settings.renderer_command.clone(),
            script: settings.renderer_script.clone(),
            timeout: Duration::from_secs(settings.render_timeout_secs),
            snapshots,
            locks: DashMap::new(),
        }
    }

    pub async fn render(&self, chart: &charts::Model) -> Result<Value, RenderError> {
        let lock = self
            .locks
            .entry(chart.id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let _guard = lock.lock().await;

        let dataset_id = chart.dataset_id.ok_or(RenderError::NoDataset)?;
        let chart_data = self
            .snapshots
            .read(dataset_id)
            .await?
            .ok_or(RenderError::MissingSnapshot(dataset_id))?;
        let body = chart_body(chart);

        tokio::fs::create_dir_all(&self.render_dir).await?;
        let request_id = Uuid::new_v4();
        let request_path = self.render_dir.join(format!("{}.json", request_id));
        let output_path = self.render_dir.join(format!("{}_rendered.json", request_id));

        let request = RenderRequest {
            body: &body,
            chart_data: &chart_data,
        };
        let bytes = serde_json::to_vec(&request).map_err(std::io::Error::from)?;
        tokio::fs::write(&request_path, bytes).await?;

        debug!(chart_id = chart.id, request = %request_path.display(), "rendering chart");
        let run = self.run_renderer(&request_path, &output_path).await;

        // Both temp files go away whether the render worked or not.
        let _ = tokio::fs::remove_file(&request_path).await;
        let rendered = match run {
            Ok(()) => read_rendered(&output_path).await,
            Err(err) => Err(err),
        };
        let _ = tokio::fs::remove_file(&output_path).await;

        rendered
    }

    async fn run_renderer(
        &self,
        request_path: &Path,
        output_path: &Path,
    ) -> Result<(), RenderError> {
        let mut command = Command::new(&self.command);
        command
            .arg(&self.script)
            .arg(request_path)
            .arg(output_path)
            .kill_on_drop(true);

        let status = match tokio::time::timeout(self.timeout, command.status()).await {
            Ok(result) => result?,
            Err(_) => return Err(RenderError::Timeout(self.timeout.as_secs())),
        };

        if !status.success() {
            return Err(RenderError::RendererFailed(status.to_string()));
        }
        Ok(())
    }
}

/// The stored chart definition, with its JSON text columns inflated. A
/// column that does not parse is forwarded as null; the renderer reports
/// its own validation errors.
fn chart_body(chart: &charts::Model) -> Value {
    serde_json::json!({
        "id": chart.id,
        "name": chart.name,
        "vizType": chart.viz_type,
        "mapping": parse_or_null(&chart.mapping),
        "vizOptions": parse_or_null(&chart.viz_options),
        "appliedFilters": parse_or_null(&chart.applied_filters),
    })
}

fn parse_or_null(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or(Value::Null)
}

async fn read_rendered(path: &Path) -> Result<Value, RenderError> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(RenderError::BadOutput(
                "renderer wrote no output file".to_string(),
            ))
        }
        Err(err) => return Err(err.into()),
    };
    serde_json::from_slice(&bytes).map_err(|err| RenderError::BadOutput(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tempfile::TempDir;

    fn test_settings(dir: &TempDir, command: &str, script: &Path) -> Settings {
        Settings {
            port: 0,
            database_path: ":memory:".to_string(),
            data_dir: dir.path().to_path_buf(),
            upstream_base_url: "http://127.0.0.1:9".to_string(),
            renderer_command: command.to_string(),
            renderer_script: script.to_path_buf(),
            render_timeout_secs: 5,
            log_level: None,
        }
    }

    fn test_chart(dataset_id: Option<i32>) -> charts::Model {
        let now = Utc::now();
        charts::Model {
            id: 1,
            name: "Test chart".to_string(),
            viz_type: "treemap".to_string(),
            owner: "auth0|tester".to_string(),
            dataset_id,
            mapping: "{}".to_string(),
            viz_options: "{}".to_string(),
            applied_filters: "{}".to_string(),
            public: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn missing_snapshot_is_a_typed_error() {
        let dir = TempDir::new().unwrap();
        let settings = test_settings(&dir, "true", Path::new("unused"));
        let service = RenderService::new(&settings, SnapshotStore::new(dir.path()));

        let err = service.render(&test_chart(Some(42))).await.unwrap_err();
        assert!(matches!(err, RenderError::MissingSnapshot(42)));
    }

    #[tokio::test]
    async fn chart_without_dataset_is_a_typed_error() {
        let dir = TempDir::new().unwrap();
        let settings = test_settings(&dir, "true", Path::new("unused"));
        let service = RenderService::new(&settings, SnapshotStore::new(dir.path()));

        let err = service.render(&test_chart(None)).await.unwrap_err();
        assert!(matches!(err, RenderError::NoDataset));
    }

    #[tokio::test]
    async fn renderer_output_comes_back_and_temp_files_are_gone() {
        let dir = TempDir::new().unwrap();
        let script_path = dir.path().join("fake-renderer.sh");
        // A stand-in renderer: copy the request file to the output path.
        std::fs::write(&script_path, "cp \"$1\" \"$2\"\n").unwrap();

        let settings = test_settings(&dir, "/bin/sh", &script_path);
        let snapshots = SnapshotStore::new(dir.path());
        snapshots
            .write(42, &serde_json::json!([{"x": 1}]))
            .await
            .unwrap();
        let service = RenderService::new(&settings, snapshots);

        let rendered = service.render(&test_chart(Some(42))).await.unwrap();
        assert_eq!(rendered["body"]["vizType"], "treemap");
        assert_eq!(rendered["chartData"][0]["x"], 1);

        let leftovers: Vec<_> = std::fs::read_dir(dir.path().join("render"))
            .unwrap()
            .collect();
        assert!(leftovers.is_empty());
    }

    #[tokio::test]
    async fn failing_renderer_is_reported_not_thrown() {
        let dir = TempDir::new().unwrap();
        let script_path = dir.path().join("fake-renderer.sh");
        std::fs::write(&script_path, "exit 3\n").unwrap();

        let settings = test_settings(&dir, "/bin/sh", &script_path);
        let snapshots = SnapshotStore::new(dir.path());
        snapshots.write(42, &serde_json::json!([])).await.unwrap();
        let service = RenderService::new(&settings, snapshots);

        let err = service.render(&test_chart(Some(42))).await.unwrap_err();
        assert!(matches!(err, RenderError::RendererFailed(_)));
    }
}
