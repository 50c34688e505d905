use std::io;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

/// Per-dataset parsed-data files on disk, the input the out-of-process
/// renderer reads. One JSON file per dataset id under `<data_dir>/parsed/`.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    root: PathBuf,
}

impl SnapshotStore {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            root: data_dir.join("parsed"),
        }
    }

    fn path(&self, dataset_id: i32) -> PathBuf {
        self.root.join(format!("{}.json", dataset_id))
    }

    pub async fn write(&self, dataset_id: i32, rows: &Value) -> io::Result<()> {
        tokio::fs::create_dir_all(&self.root).await?;
        let path = self.path(dataset_id);
        let bytes = serde_json::to_vec(rows)?;
        tokio::fs::write(&path, bytes).await?;
        debug!(dataset_id, path = %path.display(), "wrote parsed data snapshot");
        Ok(())
    }

    pub async fn read(&self, dataset_id: i32) -> io::Result<Option<Value>> {
        match tokio::fs::read(self.path(dataset_id)).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }

    pub async fn remove(&self, dataset_id: i32) -> io::Result<()> {
        match tokio::fs::remove_file(self.path(dataset_id)).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[tokio::test]
    async fn write_read_remove_roundtrip() {
        let dir = TempDir::new().unwrap();
        let store = SnapshotStore::new(dir.path());

        assert_eq!(store.read(7).await.unwrap(), None);

        let rows = json!([{"a": 1}, {"a": 2}]);
        store.write(7, &rows).await.unwrap();
        assert_eq!(store.read(7).await.unwrap(), Some(rows));

        store.remove(7).await.unwrap();
        assert_eq!(store.read(7).await.unwrap(), None);

        // Removing twice is fine.
        store.remove(7).await.unwrap();
    }
}
