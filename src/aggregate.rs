use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use crate::common::{field_f64, field_str};

/// Ordering applied to sibling groups. Each endpoint pins its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    ValueDesc,
    Label,
}

/// One grouping level: the row path that keys the group and an optional
/// path for the display label (defaults to the key itself).
#[derive(Debug, Clone)]
pub struct Level {
    pub key_path: String,
    pub label_path: Option<String>,
}

impl Level {
    pub fn new(key_path: impl Into<String>) -> Self {
        Self {
            key_path: key_path.into(),
            label_path: None,
        }
    }

    pub fn with_label(key_path: impl Into<String>, label_path: impl Into<String>) -> Self {
        Self {
            key_path: key_path.into(),
            label_path: Some(label_path.into()),
        }
    }
}

/// The nested shape treemap, table and sankey builders consume.
#[derive(Debug, Clone, Serialize, Default, PartialEq)]
pub struct TreeNode {
    pub name: String,
    pub value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeNode>,
}

/// Group flat rows into a nested tree, summing `value_path` at every level.
///
/// Rows group in first-seen order before sorting, the first row of a group
/// supplies its display label, and the color cycle applies to the top level
/// only. `value_path: None` counts rows instead of summing a field.
///
/// The leaf sum always equals the flat sum of the value field over the
/// input rows; rows missing a key path group under the empty key rather
/// than being dropped.
pub fn group_tree(
    rows: &[Value],
    levels: &[Level],
    value_path: Option<&str>,
    order: SortOrder,
    colors: &[String],
) -> Vec<TreeNode> {
    let refs: Vec<&Value> = rows.iter().collect();
    group_level(&refs, levels, value_path, order, Some(colors))
}

fn group_level(
    rows: &[&Value],
    levels: &[Level],
    value_path: Option<&str>,
    order: SortOrder,
    colors: Option<&[String]>,
) -> Vec<TreeNode> {
    let (level, rest) = match levels.split_first() {
        Some(split) => split,
        None => return Vec::new(),
    };

    let mut groups: IndexMap<String, Vec<&Value>> = IndexMap::new();
    for row in rows {
        let key = field_str(row, &level.key_path).unwrap_or_default();
        groups.entry(key).or_default().push(*row);
    }

    let mut nodes: Vec<TreeNode> = groups
        .into_iter()
        .map(|(key, members)| {
            let name = level
                .label_path
                .as_deref()
                .and_then(|path| field_str(members[0], path))
                .unwrap_or(key);
            let children = if rest.is_empty() {
                Vec::new()
            } else {
                group_level(&members, rest, value_path, order, None)
            };
            let value = if children.is_empty() {
                sum_values(&members, value_path)
            } else {
                children.iter().map(|child| child.value).sum()
            };
            TreeNode {
                name,
                value,
                color: None,
                children,
            }
        })
        .collect();

    sort_nodes(&mut nodes, order);

    if let Some(colors) = colors {
        if !colors.is_empty() {
            for (index, node) in nodes.iter_mut().enumerate() {
                node.color = Some(colors[index % colors.len()].clone());
            }
        }
    }

    nodes
}

fn sum_values(rows: &[&Value], value_path: Option<&str>) -> f64 {
    match value_path {
        Some(path) => rows.iter().map(|row| field_f64(row, path)).sum(),
        None => rows.len() as f64,
    }
}

fn sort_nodes(nodes: &mut [TreeNode], order: SortOrder) {
    match order {
        SortOrder::ValueDesc => nodes.sort_by(|a, b| b.value.total_cmp(&a.value)),
        SortOrder::Label => nodes.sort_by(|a, b| a.name.cmp(&b.name)),
    }
}

//
// Sankey
//

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SankeyNode {
    pub name: String,
    pub level: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SankeyLink {
    pub source: String,
    pub target: String,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct Sankey {
    pub nodes: Vec<SankeyNode>,
    pub links: Vec<SankeyLink>,
}

/// Flatten a grouped tree into sankey nodes and links under a synthetic
/// root. Nodes appearing under several parents merge; parallel links merge
/// by summing.
pub fn to_sankey(root_name: &str, tree: &[TreeNode]) -> Sankey {
    let mut sankey = Sankey::default();
    sankey.nodes.push(SankeyNode {
        name: root_name.to_string(),
        level: 0,
    });
    for node in tree {
        add_sankey_branch(&mut sankey, root_name, node, 1);
    }
    sankey
}

fn add_sankey_branch(sankey: &mut Sankey, parent: &str, node: &TreeNode, level: usize) {
    if !sankey.nodes.iter().any(|existing| existing.name == node.name) {
        sankey.nodes.push(SankeyNode {
            name: node.name.clone(),
            level,
        });
    }
    if let Some(link) = sankey
        .links
        .iter_mut()
        .find(|link| link.source == parent && link.target == node.name)
    {
        link.value += node.value;
    } else {
        sankey.links.push(SankeyLink {
            source: parent.to_string(),
            target: node.name.clone(),
            value: node.value,
        });
    }
    for child in &node.children {
        add_sankey_branch(sankey, &node.name, child, level + 1);
    }
}

//
// Heatmap
//

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HeatmapCell {
    pub row: String,
    pub column: String,
    pub value: String,
}

/// Reshape rows into (row, column, value) cells. Later rows win when the
/// upstream repeats a cell.
pub fn to_heatmap(
    rows: &[Value],
    row_path: &str,
    column_path: &str,
    value_path: &str,
) -> Vec<HeatmapCell> {
    let mut cells: IndexMap<(String, String), String> = IndexMap::new();
    for row in rows {
        let row_key = field_str(row, row_path).unwrap_or_default();
        let column_key = field_str(row, column_path).unwrap_or_default();
        let value = field_str(row, value_path).unwrap_or_default();
        cells.insert((row_key, column_key), value);
    }
    cells
        .into_iter()
        .map(|((row, column), value)| HeatmapCell { row, column, value })
        .collect()
}

//
// Time cycle
//

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TimeCycleBar {
    pub year: String,
    pub value: f64,
    pub cumulative: f64,
}

/// Year-keyed sums in ascending year order with a running total, the shape
/// the dashboard's bar-over-time components consume.
pub fn to_time_cycle(rows: &[Value], year_path: &str, value_path: Option<&str>) -> Vec<TimeCycleBar> {
    let mut sums: IndexMap<String, f64> = IndexMap::new();
    for row in rows {
        let year = field_str(row, year_path).unwrap_or_default();
        let value = match value_path {
            Some(path) => field_f64(row, path),
            None => 1.0,
        };
        *sums.entry(year).or_insert(0.0) += value;
    }
    sums.sort_keys();

    let mut cumulative = 0.0;
    sums.into_iter()
        .map(|(year, value)| {
            cumulative += value;
            TimeCycleBar {
                year,
                value,
                cumulative,
            }
        })
        .collect()
}
