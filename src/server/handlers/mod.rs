use serde::Deserialize;

/// Common list-endpoint query: filter by owner and/or name substring.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub owner: Option<String>,
    pub q: Option<String>,
}

pub mod budgets;
pub mod charts;
pub mod data_themes;
pub mod datasets;
pub mod disbursements;
pub mod documents;
pub mod eligibility;
pub mod filter_options;
pub mod funding_requests;
pub mod grants;
pub mod health;
pub mod indicators;
pub mod pledges_contributions;
pub mod reports;
