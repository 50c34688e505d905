use serde::Serialize;
use serde_json::{json, Value};

use crate::common::{field_f64, field_str};
use crate::errors::{ApiError, ApiResult};
use crate::filters::{compile_filter, FilterParams, UpstreamQuery};
use crate::mappings;
use crate::upstream::DataApiClient;

const DEFAULT_PAGE_SIZE: u64 = 10;

#[derive(Debug, Serialize)]
pub struct GrantList {
    pub count: u64,
    pub data: Vec<Value>,
}

/// The grant list and detail views.
pub struct GrantService {
    client: DataApiClient,
}

impl GrantService {
    pub fn new(client: DataApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, params: &FilterParams) -> ApiResult<GrantList> {
        let mapping = mappings::domain("grants");
        let page = params.page.unwrap_or(1).max(1);
        let page_size = params.page_size.unwrap_or(DEFAULT_PAGE_SIZE).max(1);

        let query = UpstreamQuery::new(mapping.resource.as_str())
            .filter(compile_filter(params, mapping))
            .order_by("code")
            .count()
            .page(page, page_size);

        let result = self.client.fetch_page(&query).await?;
        let data = result
            .rows
            .iter()
            .map(|row| project_grant(row, mapping))
            .collect();

        Ok(GrantList {
            count: result.total,
            data,
        })
    }

    pub async fn detail(&self, grant_id: &str) -> ApiResult<Value> {
        let mapping = mappings::domain("grants");
        let params = FilterParams {
            grant_id: Some(grant_id.to_string()),
            ..Default::default()
        };
        let query = UpstreamQuery::new(mapping.resource.as_str()).filter(compile_filter(&params, mapping));

        let rows = self.client.fetch_rows(&query).await?;
        rows.into_iter()
            .map(|row| project_grant(&row, mapping))
            .next()
            .ok_or_else(|| ApiError::NotFound("grant", grant_id.to_string()))
    }
}

fn project_grant(row: &Value, mapping: &mappings::DomainMapping) -> Value {
    json!({
        "code": field_str(row, mapping.path("code")),
        "title": field_str(row, mapping.path("title")),
        "location": field_str(row, mapping.path("location")),
        "component": field_str(row, mapping.path("component")),
        "principalRecipient": field_str(row, mapping.path("partner")),
        "status": field_str(row, mapping.path("status")),
        "cycle": field_str(row, mapping.path("cycle")),
        "signedAmount": field_f64(row, mapping.path("value")),
    })
}
