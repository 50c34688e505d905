use serde_json::{json, Value};

use crate::common::field_str;
use crate::errors::ApiResult;
use crate::filters::{compile_filter, FilterParams, UpstreamQuery};
use crate::mappings;
use crate::upstream::DataApiClient;

/// Funding request submissions, flattened for the dashboard table.
pub struct FundingRequestService {
    client: DataApiClient,
}

impl FundingRequestService {
    pub fn new(client: DataApiClient) -> Self {
        Self { client }
    }

    pub async fn table(&self, params: &FilterParams) -> ApiResult<Vec<Value>> {
        let mapping = mappings::domain("funding_requests");
        let query =
            UpstreamQuery::new(mapping.resource.as_str()).filter(compile_filter(params, mapping));
        let upstream_rows = self.client.fetch_rows(&query).await?;

        let mut rows: Vec<Value> = upstream_rows
            .iter()
            .map(|row| {
                json!({
                    "location": field_str(row, mapping.path("location")),
                    "component": field_str(row, mapping.path("component")),
                    "window": field_str(row, mapping.path("window")),
                    "approach": field_str(row, mapping.path("approach")),
                    "trpOutcome": field_str(row, mapping.path("trpOutcome")),
                    "submissionDate": field_str(row, mapping.path("submissionDate")),
                    "cycle": field_str(row, mapping.path("cycle")),
                })
            })
            .collect();

        rows.sort_by(|a, b| {
            let location = a["location"].as_str().cmp(&b["location"].as_str());
            location.then(a["submissionDate"].as_str().cmp(&b["submissionDate"].as_str()))
        });
        Ok(rows)
    }
}
