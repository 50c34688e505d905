use serde_json::{json, Value};

use crate::aggregate::{to_heatmap, HeatmapCell};
use crate::common::field_str;
use crate::errors::{ApiError, ApiResult};
use crate::filters::{compile_filter, FilterParams, UpstreamQuery};
use crate::mappings::{self, DomainMapping};
use crate::upstream::DataApiClient;

/// Eligibility decisions for a country: which components were eligible in
/// which year. Both shapes are scoped to an explicit geography.
pub struct EligibilityService {
    client: DataApiClient,
}

impl EligibilityService {
    pub fn new(client: DataApiClient) -> Self {
        Self { client }
    }

    pub async fn table(&self, params: &FilterParams) -> ApiResult<Vec<Value>> {
        let mapping = mappings::domain("eligibility");
        let mut rows: Vec<Value> = self
            .fetch(params, mapping)
            .await?
            .iter()
            .map(|row| {
                json!({
                    "year": field_str(row, mapping.path("year")),
                    "component": field_str(row, mapping.path("component")),
                    "status": field_str(row, mapping.path("status")),
                    "incomeLevel": field_str(row, mapping.path("incomeLevel")),
                    "diseaseBurden": field_str(row, mapping.path("diseaseBurden")),
                })
            })
            .collect();

        // Latest year first, components alphabetical within it.
        rows.sort_by(|a, b| {
            let year = b["year"].as_str().cmp(&a["year"].as_str());
            year.then(a["component"].as_str().cmp(&b["component"].as_str()))
        });
        Ok(rows)
    }

    pub async fn heatmap(&self, params: &FilterParams) -> ApiResult<Vec<HeatmapCell>> {
        let mapping = mappings::domain("eligibility");
        let rows = self.fetch(params, mapping).await?;
        Ok(to_heatmap(
            &rows,
            mapping.path("component"),
            mapping.path("year"),
            mapping.path("status"),
        ))
    }

    async fn fetch(&self, params: &FilterParams, mapping: &DomainMapping) -> ApiResult<Vec<Value>> {
        if params
            .geographies
            .as_deref()
            .map(str::trim)
            .filter(|geographies| !geographies.is_empty())
            .is_none()
        {
            return Err(ApiError::MissingParameter("geographies"));
        }
        let query =
            UpstreamQuery::new(mapping.resource.as_str()).filter(compile_filter(params, mapping));
        Ok(self.client.fetch_rows(&query).await?)
    }
}
