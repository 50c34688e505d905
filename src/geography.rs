use std::collections::BTreeSet;

use include_dir::{include_dir, Dir};
use once_cell::sync::Lazy;
use serde::Deserialize;

static GEOGRAPHY_DIR: Dir<'_> = include_dir!("config/geography");

/// One node in a geography tree: a region when `children` is non-empty,
/// otherwise a country leaf carrying its ISO3 code.
#[derive(Debug, Clone, Deserialize)]
pub struct GeoNode {
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub children: Vec<GeoNode>,
}

/// The three hierarchy views (standard regions, portfolio views, board
/// constituencies), deserialized once from the embedded config.
static TREES: Lazy<Vec<Vec<GeoNode>>> = Lazy::new(|| {
    GEOGRAPHY_DIR
        .files()
        .iter()
        .map(|file| {
            serde_json::from_slice(file.contents()).unwrap_or_else(|err| {
                panic!("invalid geography tree {}: {}", file.path().display(), err)
            })
        })
        .collect()
});

/// Expand geography tokens into the set of leaf country ISO3 codes.
///
/// A token may name a top-level region, a sub-region one level down, or a
/// single country (by code or name). Unknown tokens contribute nothing. The
/// result is deduplicated and sorted.
pub fn expand<I, S>(tokens: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut codes = BTreeSet::new();

    for token in tokens {
        let token = token.as_ref().trim();
        if token.is_empty() {
            continue;
        }
        for tree in TREES.iter() {
            for region in tree {
                if eq_ignore_case(&region.name, token) {
                    collect_leaves(region, &mut codes);
                    continue;
                }
                for sub in &region.children {
                    if !sub.children.is_empty() && eq_ignore_case(&sub.name, token) {
                        collect_leaves(sub, &mut codes);
                    }
                }
                collect_leaf_matches(region, token, &mut codes);
            }
        }
    }

    codes.into_iter().collect()
}

/// All known countries as (name, ISO3) pairs, deduplicated across the
/// three views and sorted by name. Feeds the dashboard's filter panel.
pub fn country_options() -> Vec<(String, String)> {
    let mut options: Vec<(String, String)> = Vec::new();
    let mut seen = BTreeSet::new();
    for tree in TREES.iter() {
        for region in tree {
            collect_options(region, &mut options, &mut seen);
        }
    }
    options.sort();
    options
}

fn collect_options(
    node: &GeoNode,
    out: &mut Vec<(String, String)>,
    seen: &mut BTreeSet<String>,
) {
    if node.children.is_empty() {
        if let Some(code) = &node.code {
            if seen.insert(code.clone()) {
                out.push((node.name.clone(), code.clone()));
            }
        }
        return;
    }
    for child in &node.children {
        collect_options(child, out, seen);
    }
}

fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

fn collect_leaves(node: &GeoNode, out: &mut BTreeSet<String>) {
    if node.children.is_empty() {
        if let Some(code) = &node.code {
            out.insert(code.clone());
        }
        return;
    }
    for child in &node.children {
        collect_leaves(child, out);
    }
}

fn collect_leaf_matches(node: &GeoNode, token: &str, out: &mut BTreeSet<String>) {
    if node.children.is_empty() {
        if let Some(code) = &node.code {
            if eq_ignore_case(code, token) || eq_ignore_case(&node.name, token) {
                out.insert(code.clone());
            }
        }
        return;
    }
    for child in &node.children {
        collect_leaf_matches(child, token, out);
    }
}
