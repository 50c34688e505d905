/// A typed upstream request: the resource path plus the OData query options
/// the dashboard endpoints use. Assembled parameters go through the HTTP
/// client's own encoder, so no hand-built query strings exist anywhere.
#[derive(Debug, Clone, Default)]
pub struct UpstreamQuery {
    resource: String,
    filter: Option<String>,
    apply: Option<String>,
    select: Option<String>,
    order_by: Option<String>,
    count: bool,
    top: Option<u64>,
    skip: Option<u64>,
}

impl UpstreamQuery {
    pub fn new(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            ..Default::default()
        }
    }

    pub fn filter(mut self, filter: Option<String>) -> Self {
        self.filter = filter;
        self
    }

    pub fn apply(mut self, apply: impl Into<String>) -> Self {
        self.apply = Some(apply.into());
        self
    }

    pub fn select(mut self, select: impl Into<String>) -> Self {
        self.select = Some(select.into());
        self
    }

    pub fn order_by(mut self, order_by: impl Into<String>) -> Self {
        self.order_by = Some(order_by.into());
        self
    }

    pub fn count(mut self) -> Self {
        self.count = true;
        self
    }

    /// 1-based page plus page size, translated into `$top`/`$skip`.
    pub fn page(mut self, page: u64, page_size: u64) -> Self {
        self.top = Some(page_size);
        self.skip = Some(page.saturating_sub(1).saturating_mul(page_size));
        self
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(filter) = &self.filter {
            params.push(("$filter", filter.clone()));
        }
        if let Some(apply) = &self.apply {
            params.push(("$apply", apply.clone()));
        }
        if let Some(select) = &self.select {
            params.push(("$select", select.clone()));
        }
        if let Some(order_by) = &self.order_by {
            params.push(("$orderby", order_by.clone()));
        }
        if self.count {
            params.push(("$count", "true".to_string()));
        }
        if let Some(top) = self.top {
            params.push(("$top", top.to_string()));
        }
        if let Some(skip) = self.skip {
            params.push(("$skip", skip.to_string()));
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_filter_means_no_filter_parameter() {
        let query = UpstreamQuery::new("budgets").filter(None);
        assert!(query.params().iter().all(|(key, _)| *key != "$filter"));
    }

    #[test]
    fn filter_is_carried_verbatim() {
        let query = UpstreamQuery::new("budgets")
            .filter(Some("component/name in ('HIV')".to_string()));
        assert_eq!(
            query.params(),
            vec![("$filter", "component/name in ('HIV')".to_string())]
        );
    }

    #[test]
    fn paging_translates_to_top_and_skip() {
        let query = UpstreamQuery::new("grants").page(3, 25);
        let params = query.params();
        assert!(params.contains(&("$top", "25".to_string())));
        assert!(params.contains(&("$skip", "50".to_string())));
    }

    #[test]
    fn page_one_skips_nothing() {
        let params = UpstreamQuery::new("grants").page(1, 10).params();
        assert!(params.contains(&("$skip", "0".to_string())));
    }
}
