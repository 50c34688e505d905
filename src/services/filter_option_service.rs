use serde::Serialize;

use crate::common::field_str;
use crate::errors::{ApiError, ApiResult};
use crate::filters::UpstreamQuery;
use crate::geography;
use crate::mappings;
use crate::upstream::DataApiClient;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FilterOption {
    pub label: String,
    pub value: String,
}

/// Option lists for the dashboard's filter panel. Geographies come from
/// the static trees; the rest are distinct-value queries against the
/// upstream API.
pub struct FilterOptionService {
    client: DataApiClient,
}

impl FilterOptionService {
    pub fn new(client: DataApiClient) -> Self {
        Self { client }
    }

    pub async fn options(&self, dimension: &str) -> ApiResult<Vec<FilterOption>> {
        match dimension {
            "geographies" => Ok(geography::country_options()
                .into_iter()
                .map(|(label, value)| FilterOption { label, value })
                .collect()),
            "components" => self.distinct("grants", "components").await,
            "status" => self.distinct("grants", "status").await,
            "donors" => self.distinct("pledges_contributions", "donors").await,
            other => Err(ApiError::NotFound("filter dimension", other.to_string())),
        }
    }

    async fn distinct(&self, domain: &str, key: &str) -> ApiResult<Vec<FilterOption>> {
        let mapping = mappings::domain(domain);
        let field = mapping
            .field(key)
            .ok_or_else(|| ApiError::NotFound("filter dimension", key.to_string()))?;

        let query = UpstreamQuery::new(mapping.resource.as_str())
            .apply(format!("groupby(({}))", field));
        let rows = self.client.fetch_rows(&query).await?;

        // groupby responses nest the field the same way $filter paths do.
        let row_path = field.replace('/', ".");
        let mut options: Vec<FilterOption> = rows
            .iter()
            .filter_map(|row| field_str(row, &row_path))
            .map(|value| FilterOption {
                label: value.clone(),
                value,
            })
            .collect();
        options.sort_by(|a, b| a.label.cmp(&b.label));
        options.dedup();
        Ok(options)
    }
}
