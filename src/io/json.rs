//! Dual graphs in the networkx JSON layouts used by districting toolkits:
//! adjacency (`"adjacency": [[{"id": ..}, ..], ..]`) or node-link (`"links": [{"source": .., "target": ..}, ..]`).

use std::{
    collections::{BTreeSet, HashMap},
    fs,
    path::Path,
};

use anyhow::{Context, Result, bail, ensure};
use serde_json::Value;
use tracing::debug;

use crate::{
    graph::{Graph, WeightMatrix},
    io::Assignment,
};

/// Largest magnitude at which every integer is exactly representable as `f64`.
const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

/// Read a dual graph from `path`, optionally taking the initial plan from node attribute `assignment_col`.
pub fn read_dual_graph(path: &Path, assignment_col: Option<&str>) -> Result<(Graph, Option<Assignment>)> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("[io::json] Failed to read dual graph: {}", path.display()))?;
    parse_dual_graph(&text, assignment_col)
        .with_context(|| format!("[io::json] Failed to load dual graph from {}", path.display()))
}

/// Parse a dual graph from JSON text.
///
/// Every node attribute that is numeric on all nodes becomes a weight series:
/// an integer series when every value is integral, a real series otherwise.
/// The assignment column is excluded from the weights.
pub fn parse_dual_graph(text: &str, assignment_col: Option<&str>) -> Result<(Graph, Option<Assignment>)> {
    let json: Value = serde_json::from_str(text).context("[io::json] Failed to parse JSON")?;

    let nodes = json.get("nodes").and_then(Value::as_array)
        .context("[io::json] Missing 'nodes' array")?;
    let ids = nodes.iter().enumerate()
        .map(|(i, node)| node.get("id").and_then(label).with_context(|| format!("[io::json] Node {i} has no usable 'id'")))
        .collect::<Result<Vec<_>>>()?;

    let index = ids.iter().enumerate()
        .map(|(i, id)| (id.as_str(), i as u32))
        .collect::<HashMap<_, _>>();
    ensure!(index.len() == ids.len(), "[io::json] Node ids are not unique");

    let lookup = |value: Option<&Value>| -> Result<u32> {
        let id = value.and_then(label).context("[io::json] Edge endpoint has no usable id")?;
        index.get(id.as_str()).copied().with_context(|| format!("[io::json] Edge references unknown node '{id}'"))
    };

    let mut adjacency = vec![Vec::new(); ids.len()];
    if let Some(rows) = json.get("adjacency").and_then(Value::as_array) {
        ensure!(rows.len() == ids.len(), "[io::json] 'adjacency' has {} rows for {} nodes", rows.len(), ids.len());
        for (u, row) in rows.iter().enumerate() {
            let row = row.as_array().with_context(|| format!("[io::json] Adjacency row {u} is not an array"))?;
            for entry in row {
                adjacency[u].push(lookup(entry.get("id"))?);
            }
        }
    } else if let Some(links) = json.get("links").or_else(|| json.get("edges")).and_then(Value::as_array) {
        for link in links {
            let (u, v) = (lookup(link.get("source"))?, lookup(link.get("target"))?);
            adjacency[u as usize].push(v);
            adjacency[v as usize].push(u);
        }
    } else {
        bail!("[io::json] Missing 'adjacency' or 'links'");
    }

    let weights = node_weights(nodes, assignment_col)?;
    let graph = Graph::new(ids, &adjacency, weights)?;

    let assignment = assignment_col
        .map(|column| {
            let labels = nodes.iter().map(|node| node.get(column).and_then(label)).collect();
            Assignment::from_node_labels(&graph, labels)
                .with_context(|| format!("[io::json] Invalid assignment column '{column}'"))
        })
        .transpose()?;

    Ok((graph, assignment))
}

/// Render a node id or district label, accepting strings and integral numbers.
fn label(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => match n.as_i64() {
            Some(i) => Some(i.to_string()),
            None => n.as_f64().filter(|f| f.fract() == 0.0 && f.abs() < MAX_EXACT_INT).map(|f| (f as i64).to_string()),
        },
        _ => None,
    }
}

/// Integral value of a JSON number, if it has one.
fn as_integer(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        value.as_f64().filter(|f| f.fract() == 0.0 && f.abs() < MAX_EXACT_INT).map(|f| f as i64)
    })
}

fn node_weights(nodes: &[Value], assignment_col: Option<&str>) -> Result<WeightMatrix> {
    let keys = nodes.iter()
        .filter_map(Value::as_object)
        .flat_map(|attributes| attributes.keys().cloned())
        .filter(|key| key != "id" && Some(key.as_str()) != assignment_col)
        .collect::<BTreeSet<_>>();

    let mut ints = HashMap::new();
    let mut reals = HashMap::new();
    for key in keys {
        let values = nodes.iter().map(|node| node.get(&key)).collect::<Vec<_>>();
        if let Some(column) = values.iter().map(|&value| value.and_then(as_integer)).collect::<Option<Vec<_>>>() {
            ints.insert(key, column);
        } else if let Some(column) = values.iter().map(|&value| value.and_then(Value::as_f64)).collect::<Option<Vec<_>>>() {
            reals.insert(key, column);
        } else {
            debug!(column = %key, "skipping non-numeric node attribute");
        }
    }

    Ok(WeightMatrix::new(nodes.len(), ints, reals)?)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::graph::WeightType;

    const ADJACENCY: &str = r#"{
        "directed": false,
        "multigraph": false,
        "graph": [],
        "nodes": [
            {"id": 0, "GEOID": "17001", "TOTPOP": 10, "HISP": 2, "AREA": 1.5, "CD": 3},
            {"id": 1, "GEOID": "17003", "TOTPOP": 12.0, "HISP": 9, "AREA": 2.0, "CD": 3},
            {"id": 2, "GEOID": "17005", "TOTPOP": 11, "HISP": 1, "AREA": 0.5, "CD": 11}
        ],
        "adjacency": [
            [{"id": 1}],
            [{"id": 0}, {"id": 2}],
            [{"id": 1}]
        ]
    }"#;

    #[test]
    fn parses_adjacency_layout() {
        let (graph, assignment) = parse_dual_graph(ADJACENCY, Some("CD")).unwrap();
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.node_index("2"), Some(2));

        let weights = graph.node_weights();
        assert_eq!(weights.series_type("TOTPOP"), Some(WeightType::I64));
        assert_eq!(weights.get_i64("TOTPOP", 1), Some(12));
        assert_eq!(weights.series_type("AREA"), Some(WeightType::F64));
        assert_eq!(weights.series_type("GEOID"), None);
        assert_eq!(weights.series_type("CD"), None);

        let assignment = assignment.unwrap();
        assert_eq!(assignment.districts, vec![0, 0, 1]);
        assert_eq!(assignment.labels.label(1), Some("11"));
    }

    #[test]
    fn parses_node_link_layout() {
        let text = r#"{
            "nodes": [{"id": "a", "POP": 1}, {"id": "b", "POP": 2}, {"id": "c", "POP": 3}],
            "links": [{"source": "a", "target": "b"}, {"source": "c", "target": "b"}]
        }"#;
        let (graph, assignment) = parse_dual_graph(text, None).unwrap();
        assert!(assignment.is_none());
        assert_eq!(graph.degree(graph.node_index("b").unwrap()), 2);
        assert_eq!(graph.node_weights().get_i64("POP", 2), Some(3));
    }

    #[test]
    fn rejects_unknown_neighbors_and_missing_labels() {
        let unknown = r#"{"nodes": [{"id": 0}, {"id": 1}], "adjacency": [[{"id": 1}], [{"id": 7}]]}"#;
        assert!(parse_dual_graph(unknown, None).is_err());

        let unlabeled = r#"{"nodes": [{"id": 0, "CD": 1}, {"id": 1}], "adjacency": [[{"id": 1}], [{"id": 0}]]}"#;
        assert!(parse_dual_graph(unlabeled, Some("CD")).is_err());

        let asymmetric = r#"{"nodes": [{"id": 0}, {"id": 1}], "adjacency": [[{"id": 1}], []]}"#;
        assert!(parse_dual_graph(asymmetric, None).is_err());
    }

    #[test]
    fn reads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(ADJACENCY.as_bytes()).unwrap();

        let (graph, assignment) = read_dual_graph(file.path(), Some("CD")).unwrap();
        assert_eq!(graph.node_count(), 3);
        let partition = assignment.unwrap().partition(graph.into()).unwrap();
        assert_eq!(partition.num_districts(), 2);
        assert_eq!(partition.num_cut_edges(), 1);

        assert!(read_dual_graph(Path::new("/nonexistent/graph.json"), None).is_err());
    }
}
