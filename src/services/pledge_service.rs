use serde_json::Value;

use crate::aggregate::{group_tree, to_time_cycle, Level, SortOrder, TimeCycleBar, TreeNode};
use crate::errors::ApiResult;
use crate::filters::{compile_filter, FilterParams, UpstreamQuery};
use crate::mappings::{self, DomainMapping};
use crate::upstream::DataApiClient;

/// Pledges and contributions from donors, summed over time and broken
/// down per donor.
pub struct PledgeService {
    client: DataApiClient,
}

impl PledgeService {
    pub fn new(client: DataApiClient) -> Self {
        Self { client }
    }

    pub async fn time_cycle(&self, params: &FilterParams) -> ApiResult<Vec<TimeCycleBar>> {
        let mapping = mappings::domain("pledges_contributions");
        let rows = self.fetch(params, mapping).await?;
        Ok(to_time_cycle(
            &rows,
            mapping.path("year"),
            Some(mapping.path("value")),
        ))
    }

    /// Donor rows with a pledge/contribution breakdown beneath each donor.
    pub async fn table(&self, params: &FilterParams) -> ApiResult<Vec<TreeNode>> {
        let mapping = mappings::domain("pledges_contributions");
        let rows = self.fetch(params, mapping).await?;
        Ok(group_tree(
            &rows,
            &[
                Level::new(mapping.path("donor")),
                Level::new(mapping.path("indicator")),
            ],
            Some(mapping.path("value")),
            SortOrder::ValueDesc,
            &mapping.colors,
        ))
    }

    async fn fetch(&self, params: &FilterParams, mapping: &DomainMapping) -> ApiResult<Vec<Value>> {
        let query =
            UpstreamQuery::new(mapping.resource.as_str()).filter(compile_filter(params, mapping));
        Ok(self.client.fetch_rows(&query).await?)
    }
}
