use serde_json::Value;

use crate::aggregate::{group_tree, to_time_cycle, Level, SortOrder, TimeCycleBar, TreeNode};
use crate::errors::ApiResult;
use crate::filters::{compile_filter, FilterParams, UpstreamQuery};
use crate::mappings::{self, DomainMapping};
use crate::upstream::DataApiClient;

/// Disbursement charts: money actually paid out, by component, location
/// and year.
pub struct DisbursementService {
    client: DataApiClient,
}

impl DisbursementService {
    pub fn new(client: DataApiClient) -> Self {
        Self { client }
    }

    pub async fn treemap(&self, params: &FilterParams) -> ApiResult<Vec<TreeNode>> {
        let mapping = mappings::domain("disbursements");
        let rows = self.fetch(params, mapping).await?;
        Ok(group_tree(
            &rows,
            &[
                Level::new(mapping.path("component")),
                Level::new(mapping.path("location")),
            ],
            Some(mapping.path("value")),
            SortOrder::ValueDesc,
            &mapping.colors,
        ))
    }

    pub async fn table(&self, params: &FilterParams) -> ApiResult<Vec<TreeNode>> {
        let mapping = mappings::domain("disbursements");
        let rows = self.fetch(params, mapping).await?;
        Ok(group_tree(
            &rows,
            &[
                Level::new(mapping.path("location")),
                Level::new(mapping.path("grant")),
            ],
            Some(mapping.path("value")),
            SortOrder::Label,
            &[],
        ))
    }

    pub async fn time_cycle(&self, params: &FilterParams) -> ApiResult<Vec<TimeCycleBar>> {
        let mapping = mappings::domain("disbursements");
        let rows = self.fetch(params, mapping).await?;
        Ok(to_time_cycle(
            &rows,
            mapping.path("year"),
            Some(mapping.path("value")),
        ))
    }

    async fn fetch(&self, params: &FilterParams, mapping: &DomainMapping) -> ApiResult<Vec<Value>> {
        let query =
            UpstreamQuery::new(mapping.resource.as_str()).filter(compile_filter(params, mapping));
        Ok(self.client.fetch_rows(&query).await?)
    }
}
