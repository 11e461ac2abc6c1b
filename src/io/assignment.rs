use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::{graph::Graph, partition::Partition};

/// External district labels, indexed by internal district id.
///
/// Labels are ordered numerically when every label is an integer and
/// lexicographically otherwise, so an enacted plan numbered 1..=17 maps to
/// districts 0..17 in order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DistrictLabels {
    labels: Vec<String>,
}

impl DistrictLabels {
    pub fn from_labels<'a>(labels: impl IntoIterator<Item = &'a str>) -> Self {
        let mut labels = labels.into_iter().map(str::to_string).collect::<Vec<_>>();
        if labels.iter().all(|label| label.parse::<i64>().is_ok()) {
            labels.sort_by_key(|label| label.parse::<i64>().unwrap_or_default());
        } else {
            labels.sort();
        }
        labels.dedup();
        Self { labels }
    }

    #[inline] pub fn len(&self) -> usize { self.labels.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.labels.is_empty() }

    /// Internal id of the district labeled `label`.
    pub fn index_of(&self, label: &str) -> Option<u32> {
        self.labels.iter().position(|l| l == label).map(|i| i as u32)
    }

    /// External label of district `district`.
    pub fn label(&self, district: u32) -> Option<&str> {
        self.labels.get(district as usize).map(String::as_str)
    }
}

/// An initial districting plan read from a file, aligned with a graph's node order.
#[derive(Clone, Debug)]
pub struct Assignment {
    pub labels: DistrictLabels,
    pub districts: Vec<u32>, // internal district id per node
}

impl Assignment {
    /// Build from one external label per node. Every node must be labeled.
    pub fn from_node_labels(graph: &Graph, node_labels: Vec<Option<String>>) -> Result<Self> {
        let node_labels = node_labels.into_iter().enumerate()
            .map(|(node, label)| label.with_context(|| format!("[io] Node '{}' has no district label", graph.node_id(node))))
            .collect::<Result<Vec<_>>>()?;

        let labels = DistrictLabels::from_labels(node_labels.iter().map(String::as_str));
        let districts = node_labels.iter()
            .map(|label| labels.index_of(label).with_context(|| format!("[io] Unknown district label '{label}'")))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { labels, districts })
    }

    #[inline] pub fn num_districts(&self) -> u32 { self.labels.len() as u32 }

    /// Validate the plan against `graph` as a partition.
    pub fn partition(&self, graph: Arc<Graph>) -> crate::Result<Partition> {
        Partition::new(graph, self.num_districts(), self.districts.clone())
    }
}
