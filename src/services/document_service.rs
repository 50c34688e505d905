use crate::aggregate::{group_tree, Level, SortOrder, TreeNode};
use crate::errors::ApiResult;
use crate::filters::{compile_filter, FilterParams, UpstreamQuery};
use crate::mappings;
use crate::upstream::DataApiClient;

/// Published documents grouped by location and document type; values are
/// document counts.
pub struct DocumentService {
    client: DataApiClient,
}

impl DocumentService {
    pub fn new(client: DataApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, params: &FilterParams) -> ApiResult<Vec<TreeNode>> {
        let mapping = mappings::domain("documents");
        let query =
            UpstreamQuery::new(mapping.resource.as_str()).filter(compile_filter(params, mapping));
        let rows = self.client.fetch_rows(&query).await?;
        Ok(group_tree(
            &rows,
            &[
                Level::new(mapping.path("location")),
                Level::new(mapping.path("type")),
            ],
            None,
            SortOrder::Label,
            &[],
        ))
    }
}
