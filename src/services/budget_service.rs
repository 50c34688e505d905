use serde_json::Value;

use crate::aggregate::{group_tree, to_sankey, Level, Sankey, SortOrder, TreeNode};
use crate::errors::ApiResult;
use crate::filters::{compile_filter, FilterParams, UpstreamQuery};
use crate::mappings::{self, DomainMapping};
use crate::upstream::DataApiClient;

/// Budget charts: where signed money is planned to go, by component and
/// cost category.
pub struct BudgetService {
    client: DataApiClient,
}

impl BudgetService {
    pub fn new(client: DataApiClient) -> Self {
        Self { client }
    }

    pub async fn treemap(&self, params: &FilterParams) -> ApiResult<Vec<TreeNode>> {
        let mapping = mappings::domain("budgets");
        let rows = self.fetch(params, mapping).await?;
        Ok(group_tree(
            &rows,
            &[
                Level::new(mapping.path("component")),
                Level::new(mapping.path("costCategory")),
            ],
            Some(mapping.path("value")),
            SortOrder::ValueDesc,
            &mapping.colors,
        ))
    }

    pub async fn flow(&self, params: &FilterParams) -> ApiResult<Sankey> {
        let mapping = mappings::domain("budgets");
        let rows = self.fetch(params, mapping).await?;
        let tree = group_tree(
            &rows,
            &[
                Level::new(mapping.path("component")),
                Level::new(mapping.path("costCategory")),
                Level::new(mapping.path("costSubCategory")),
            ],
            Some(mapping.path("value")),
            SortOrder::ValueDesc,
            &[],
        );
        Ok(to_sankey("Total budget", &tree))
    }

    pub async fn table(&self, params: &FilterParams) -> ApiResult<Vec<TreeNode>> {
        let mapping = mappings::domain("budgets");
        let rows = self.fetch(params, mapping).await?;
        Ok(group_tree(
            &rows,
            &[
                Level::new(mapping.path("location")),
                Level::new(mapping.path("component")),
                Level::new(mapping.path("costCategory")),
            ],
            Some(mapping.path("value")),
            SortOrder::Label,
            &[],
        ))
    }

    async fn fetch(&self, params: &FilterParams, mapping: &DomainMapping) -> ApiResult<Vec<Value>> {
        let query =
            UpstreamQuery::new(mapping.resource.as_str()).filter(compile_filter(params, mapping));
        Ok(self.client.fetch_rows(&query).await?)
    }
}
