use serde_json::Value;
use tracing::warn;

use crate::errors::UpstreamError;
use crate::filters::UpstreamQuery;

/// One page of upstream rows plus the total count when `$count` was asked
/// for.
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub rows: Vec<Value>,
    pub total: u64,
}

/// The single client every endpoint shares for the upstream data API.
///
/// All failures funnel through `UpstreamError` so callers surface them the
/// same way; nothing here swallows an error into an empty result.
#[derive(Clone)]
pub struct DataApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl DataApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the `value` row array the OData convention wraps results in.
    pub async fn fetch_rows(&self, query: &UpstreamQuery) -> Result<Vec<Value>, UpstreamError> {
        Ok(self.fetch(query).await?.rows)
    }

    /// Fetch one page of rows together with the `@odata.count` total.
    pub async fn fetch_page(&self, query: &UpstreamQuery) -> Result<Page, UpstreamError> {
        self.fetch(query).await
    }

    async fn fetch(&self, query: &UpstreamQuery) -> Result<Page, UpstreamError> {
        let url = format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            query.resource()
        );

        let response = self
            .http
            .get(&url)
            .query(&query.params())
            .send()
            .await
            .map_err(|err| {
                warn!(url = %url, error = %err, "upstream request failed");
                UpstreamError::Transport(err)
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(url = %url, status = %status, "upstream returned error status");
            return Err(UpstreamError::Status(status));
        }

        let body: Value = response.json().await.map_err(|err| {
            warn!(url = %url, error = %err, "upstream body was not json");
            UpstreamError::Transport(err)
        })?;

        let rows = match body.get("value").and_then(Value::as_array) {
            Some(rows) => rows.clone(),
            None => {
                warn!(url = %url, "upstream payload missing value array");
                return Err(UpstreamError::Shape("missing value array".to_string()));
            }
        };

        let total = body
            .get("@odata.count")
            .and_then(Value::as_u64)
            .unwrap_or(rows.len() as u64);

        Ok(Page { rows, total })
    }
}
