use crate::aggregate::{group_tree, Level, SortOrder, TreeNode};
use crate::errors::ApiResult;
use crate::filters::{compile_filter, FilterParams, UpstreamQuery};
use crate::mappings;
use crate::upstream::DataApiClient;

/// Financial indicator series: one node per indicator with its yearly
/// values beneath it.
pub struct IndicatorService {
    client: DataApiClient,
}

impl IndicatorService {
    pub fn new(client: DataApiClient) -> Self {
        Self { client }
    }

    pub async fn series(&self, params: &FilterParams) -> ApiResult<Vec<TreeNode>> {
        let mapping = mappings::domain("indicators");
        let query =
            UpstreamQuery::new(mapping.resource.as_str()).filter(compile_filter(params, mapping));
        let rows = self.client.fetch_rows(&query).await?;
        Ok(group_tree(
            &rows,
            &[
                Level::new(mapping.path("indicator")),
                Level::new(mapping.path("year")),
            ],
            Some(mapping.path("value")),
            SortOrder::Label,
            &mapping.colors,
        ))
    }
}
