pub mod query;

pub use query::UpstreamQuery;

use serde::Deserialize;

use crate::common::split_values;
use crate::geography;
use crate::mappings::DomainMapping;

/// The flat parameter bag a dashboard request carries. Every value is the
/// raw comma-separated query string; unrecognized query parameters never
/// reach this struct.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FilterParams {
    pub geographies: Option<String>,
    pub components: Option<String>,
    pub status: Option<String>,
    pub partners: Option<String>,
    pub donors: Option<String>,
    #[serde(rename = "donorTypes")]
    pub donor_types: Option<String>,
    pub periods: Option<String>,
    pub cycles: Option<String>,
    #[serde(rename = "grantId")]
    pub grant_id: Option<String>,
    pub q: Option<String>,
    pub page: Option<u64>,
    #[serde(rename = "pageSize")]
    pub page_size: Option<u64>,
}

impl FilterParams {
    fn list(raw: &Option<String>) -> Vec<String> {
        raw.as_deref().map(split_values).unwrap_or_default()
    }
}

/// Compile a parameter bag into an OData filter clause for one domain.
///
/// For each recognized, non-empty key that the domain maps, emit a
/// `field in ('a','b')` sub-clause; the free-text `q` becomes an OR of
/// `contains()` over the domain's search fields. Sub-clauses join with
/// ` AND `. An empty bag compiles to `None` and the request carries no
/// `$filter` at all.
pub fn compile_filter(params: &FilterParams, mapping: &DomainMapping) -> Option<String> {
    let mut clauses: Vec<String> = Vec::new();

    if let Some(field) = mapping.field("geographies") {
        let tokens = FilterParams::list(&params.geographies);
        if !tokens.is_empty() {
            let mut codes = geography::expand(&tokens);
            if codes.is_empty() {
                // Tokens the trees do not know still constrain the query
                // verbatim rather than silently matching everything.
                codes = tokens;
            }
            clauses.push(in_clause(field, &codes));
        }
    }

    let keyed = [
        ("components", &params.components),
        ("status", &params.status),
        ("partners", &params.partners),
        ("donors", &params.donors),
        ("donorTypes", &params.donor_types),
        ("periods", &params.periods),
        ("cycles", &params.cycles),
        ("grantId", &params.grant_id),
    ];
    for (key, raw) in keyed {
        let values = FilterParams::list(raw);
        if values.is_empty() {
            continue;
        }
        if let Some(field) = mapping.field(key) {
            clauses.push(in_clause(field, &values));
        }
    }

    if let Some(q) = params.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
        if !mapping.search.is_empty() {
            let contains: Vec<String> = mapping
                .search
                .iter()
                .map(|field| format!("contains({},'{}')", field, escape_value(q)))
                .collect();
            clauses.push(format!("({})", contains.join(" OR ")));
        }
    }

    if clauses.is_empty() {
        None
    } else {
        Some(clauses.join(" AND "))
    }
}

fn in_clause(field: &str, values: &[String]) -> String {
    let quoted: Vec<String> = values
        .iter()
        .map(|value| format!("'{}'", escape_value(value)))
        .collect();
    format!("{} in ({})", field, quoted.join(","))
}

/// Single quotes are doubled, the upstream API's own escaping convention.
/// This is deliberately the only transformation applied to user values.
fn escape_value(value: &str) -> String {
    value.replace('\'', "''")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mappings;

    #[test]
    fn one_sub_clause_per_non_empty_key() {
        let params = FilterParams {
            components: Some("HIV,TB".to_string()),
            status: Some("Active".to_string()),
            ..Default::default()
        };
        let clause = compile_filter(&params, mappings::domain("grants")).unwrap();
        assert_eq!(
            clause,
            "component/name in ('HIV','TB') AND status/code in ('Active')"
        );
    }

    #[test]
    fn empty_bag_compiles_to_none() {
        let params = FilterParams::default();
        assert_eq!(compile_filter(&params, mappings::domain("grants")), None);
    }

    #[test]
    fn blank_values_contribute_no_clause() {
        let params = FilterParams {
            components: Some(" , ,".to_string()),
            ..Default::default()
        };
        assert_eq!(compile_filter(&params, mappings::domain("grants")), None);
    }

    #[test]
    fn unmapped_keys_are_ignored() {
        // The documents domain maps no donor field.
        let params = FilterParams {
            donors: Some("Germany".to_string()),
            ..Default::default()
        };
        assert_eq!(compile_filter(&params, mappings::domain("documents")), None);
    }

    #[test]
    fn geography_tokens_expand_to_leaf_codes() {
        let params = FilterParams {
            geographies: Some("Southern Africa".to_string()),
            ..Default::default()
        };
        let clause = compile_filter(&params, mappings::domain("grants")).unwrap();
        assert_eq!(
            clause,
            "geography/code in ('BWA','LSO','NAM','SWZ','ZAF')"
        );
    }

    #[test]
    fn unknown_geography_tokens_pass_through() {
        let params = FilterParams {
            geographies: Some("XXX".to_string()),
            ..Default::default()
        };
        let clause = compile_filter(&params, mappings::domain("grants")).unwrap();
        assert_eq!(clause, "geography/code in ('XXX')");
    }

    #[test]
    fn search_becomes_contains_over_search_fields() {
        let params = FilterParams {
            q: Some("malaria".to_string()),
            ..Default::default()
        };
        let clause = compile_filter(&params, mappings::domain("documents")).unwrap();
        assert_eq!(clause, "(contains(title,'malaria'))");
    }

    #[test]
    fn single_quotes_are_doubled() {
        let params = FilterParams {
            geographies: Some("Cote d'Ivoire".to_string()),
            ..Default::default()
        };
        let clause = compile_filter(&params, mappings::domain("grants")).unwrap();
        assert_eq!(clause, "geography/code in ('CIV')");

        let params = FilterParams {
            q: Some("People's Republic".to_string()),
            ..Default::default()
        };
        let clause = compile_filter(&params, mappings::domain("documents")).unwrap();
        assert_eq!(clause, "(contains(title,'People''s Republic'))");
    }
}
