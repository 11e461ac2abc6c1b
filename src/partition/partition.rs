use std::{collections::HashMap, sync::Arc};

use crate::{
    error::{Error, Result},
    graph::Graph,
    partition::{CutEdgeSet, Flip, PartitionSet},
};

/// An assignment of every node of a dual graph to one of `num_districts`
/// contiguous, non-empty districts. Immutable once constructed.
#[derive(Clone, Debug)]
pub struct Partition {
    graph: Arc<Graph>,          // Shared, read-only dual graph
    parts: PartitionSet,        // Sets of nodes in each district
    cut_edges: CutEdgeSet,      // Edges whose endpoints lie in different districts
    flip: Option<Flip>,         // Flip that derived this partition from its parent
}

impl Partition {
    /// Construct a partition from an explicit assignment vector indexed by node.
    ///
    /// Fails with `InvalidAssignment` unless every node is assigned a district in
    /// `[0, num_districts)`, every district is non-empty, and every district is contiguous.
    pub fn new(graph: impl Into<Arc<Graph>>, num_districts: u32, assignments: Vec<u32>) -> Result<Self> {
        let graph: Arc<Graph> = graph.into();
        if num_districts == 0 {
            return Err(Error::InvalidAssignment("num_districts must be at least 1".into()))
        }
        if assignments.len() != graph.node_count() {
            return Err(Error::InvalidAssignment(format!(
                "{} assignments for {} nodes", assignments.len(), graph.node_count()
            )))
        }
        if let Some(node) = assignments.iter().position(|&d| d >= num_districts) {
            return Err(Error::InvalidAssignment(format!(
                "node '{}' assigned to district {} outside [0, {num_districts})", graph.node_id(node), assignments[node]
            )))
        }

        let parts = PartitionSet::from_assignments(num_districts as usize, &assignments);
        if let Some(empty) = parts.iter_sets().position(|set| set.is_empty()) {
            return Err(Error::InvalidAssignment(format!("district {empty} is empty")))
        }

        // Full scan for cut edges.
        let mut cut_edges = CutEdgeSet::new(graph.edge_count());
        for edge in 0..graph.edge_count() {
            let (u, v) = graph.endpoints(edge);
            if assignments[u] != assignments[v] { cut_edges.insert(edge) }
        }

        let partition = Self { graph, parts, cut_edges, flip: None };
        if let Some(district) = (0..num_districts).find(|&d| !partition.is_contiguous(d)) {
            return Err(Error::InvalidAssignment(format!("district {district} is not contiguous")))
        }

        Ok(partition)
    }

    /// Construct a partition from a map of node identifiers to districts.
    /// Fails with `UnknownNode` for identifiers absent from the graph.
    pub fn from_node_map(graph: impl Into<Arc<Graph>>, num_districts: u32, assignments: &HashMap<String, u32>) -> Result<Self> {
        let graph: Arc<Graph> = graph.into();

        let mut dense = vec![None; graph.node_count()];
        for (id, &district) in assignments {
            let node = graph.node_index(id).ok_or_else(|| Error::UnknownNode(id.clone()))?;
            dense[node] = Some(district);
        }

        let dense = dense.into_iter().enumerate()
            .map(|(node, district)| district.ok_or_else(|| {
                Error::InvalidAssignment(format!("node '{}' has no district", graph.node_id(node)))
            }))
            .collect::<Result<Vec<_>>>()?;

        Self::new(graph, num_districts, dense)
    }

    /// Derive a new partition by applying a two-district flip.
    /// Cut edges and district membership are patched only around the moved nodes.
    pub fn with_flip(&self, flip: &Flip) -> Result<Self> {
        let mut parts = self.parts.clone();
        for m in flip.moves() {
            if self.assignment(m.node) != m.from {
                return Err(Error::InvalidAssignment(format!(
                    "flip expects node '{}' in district {}, found {}", self.graph.node_id(m.node), m.from, self.assignment(m.node)
                )))
            }
            parts.move_to(m.node, m.to);
        }

        let (a, b) = flip.pair();
        if parts.get(a as usize).is_empty() || parts.get(b as usize).is_empty() {
            return Err(Error::InvalidAssignment(format!("flip empties district {}", if parts.get(a as usize).is_empty() { a } else { b })))
        }

        let mut cut_edges = self.cut_edges.clone();
        for m in flip.moves() {
            for (v, edge) in self.graph.edges_with_ids(m.node) {
                cut_edges.set(edge, parts.find(m.node) != parts.find(v));
            }
        }

        let partition = Self { graph: self.graph.clone(), parts, cut_edges, flip: Some(flip.clone()) };
        debug_assert!(partition.is_contiguous(a) && partition.is_contiguous(b), "flip broke contiguity of ({a}, {b})");

        Ok(partition)
    }

    /// Get the number of districts.
    #[inline] pub fn num_districts(&self) -> u32 { self.parts.num_sets() as u32 }

    /// Get the number of nodes in the underlying graph.
    #[inline] pub fn num_nodes(&self) -> usize { self.graph.node_count() }

    /// Get a reference to the underlying graph.
    #[inline] pub fn graph(&self) -> &Graph { &self.graph }

    /// Get a shared handle to the underlying graph.
    #[inline] pub fn graph_handle(&self) -> Arc<Graph> { self.graph.clone() }

    /// Get the district assignment of a given node index.
    #[inline] pub fn assignment(&self, node: usize) -> u32 { self.parts.find(node) }

    /// Get the district assignment of a node by identifier.
    pub fn assignment_of(&self, node_id: &str) -> Result<u32> {
        self.graph.node_index(node_id)
            .map(|node| self.assignment(node))
            .ok_or_else(|| Error::UnknownNode(node_id.to_string()))
    }

    /// Get a complete slice of assignments for each node.
    #[inline] pub fn assignments(&self) -> &[u32] { self.parts.assignments() }

    /// Get the nodes in a given district.
    #[inline] pub fn nodes_in(&self, district: u32) -> &[usize] { self.parts.get(district as usize) }

    /// Get the undirected ids of all cut edges.
    #[inline] pub fn cut_edge_ids(&self) -> &[usize] { self.cut_edges.as_slice() }

    /// Get the number of cut edges.
    #[inline] pub fn num_cut_edges(&self) -> usize { self.cut_edges.len() }

    /// Check whether an undirected edge is a cut edge.
    #[inline] pub fn is_cut_edge(&self, edge: usize) -> bool { self.cut_edges.contains(edge) }

    /// Iterator over cut edges as `(u, v)` node pairs with `u < v`.
    pub fn cut_edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cut_edges.as_slice().iter().map(|&edge| self.graph.endpoints(edge))
    }

    /// The districts on either side of a cut edge, smaller id first.
    pub fn districts_of_edge(&self, edge: usize) -> (u32, u32) {
        let (u, v) = self.graph.endpoints(edge);
        let (a, b) = (self.assignment(u), self.assignment(v));
        (a.min(b), a.max(b))
    }

    /// The flip that derived this partition from its parent, if any.
    #[inline] pub fn flip(&self) -> Option<&Flip> { self.flip.as_ref() }
}
