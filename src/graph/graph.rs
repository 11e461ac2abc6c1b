use std::collections::VecDeque;

use ahash::AHashMap;

use crate::{error::{Error, Result}, graph::WeightMatrix};

/// An undirected dual graph in compressed sparse row format.
///
/// Every undirected edge `{u, v}` is stored as two half-edges (`u -> v` and
/// `v -> u`) that share one undirected edge id in `0..edge_count()`.
#[derive(Debug)]
pub struct Graph {
    size: usize,
    offsets: Vec<u32>,
    edges: Vec<u32>,              // neighbor for each half-edge
    edge_ids: Vec<u32>,           // undirected edge id for each half-edge
    endpoints: Vec<(u32, u32)>,   // undirected edge id -> (u, v) with u < v
    node_ids: Vec<String>,
    index: AHashMap<String, usize>,
    node_weights: WeightMatrix,
}

impl Graph {
    /// Construct a graph from node identifiers, adjacency lists and node weights.
    ///
    /// Fails with `InvalidGraph` if the adjacency is asymmetric, contains
    /// self-loops, duplicate or out-of-range neighbors, or the graph is empty
    /// or disconnected.
    pub fn new(node_ids: Vec<String>, edges: &[Vec<u32>], node_weights: WeightMatrix) -> Result<Self> {
        let size = node_ids.len();
        if size == 0 { return Err(Error::InvalidGraph("graph has no nodes".into())) }
        if edges.len() != size {
            return Err(Error::InvalidGraph(format!("{} adjacency lists for {size} nodes", edges.len())))
        }
        if node_weights.num_rows() != size {
            return Err(Error::InvalidGraph(format!("{} weight rows for {size} nodes", node_weights.num_rows())))
        }

        let mut index = AHashMap::with_capacity(size);
        for (i, id) in node_ids.iter().enumerate() {
            if index.insert(id.clone(), i).is_some() {
                return Err(Error::InvalidGraph(format!("duplicate node id '{id}'")))
            }
        }

        // Assign undirected edge ids to the (u < v) half-edges.
        let mut endpoints = Vec::new();
        let mut lookup = AHashMap::new();
        for (u, neighbors) in edges.iter().enumerate() {
            for &v in neighbors {
                let v = v as usize;
                if v >= size {
                    return Err(Error::InvalidGraph(format!("node '{}' has out-of-range neighbor {v}", node_ids[u])))
                }
                if v == u {
                    return Err(Error::InvalidGraph(format!("node '{}' has a self-loop", node_ids[u])))
                }
                if u < v {
                    if lookup.insert((u, v), endpoints.len() as u32).is_some() {
                        return Err(Error::InvalidGraph(format!("duplicate edge '{}'-'{}'", node_ids[u], node_ids[v])))
                    }
                    endpoints.push((u as u32, v as u32));
                }
            }
        }

        // Resolve ids for every half-edge, which also checks symmetry.
        let mut edge_ids = Vec::with_capacity(endpoints.len() * 2);
        let mut seen = vec![0u8; endpoints.len()];
        for (u, neighbors) in edges.iter().enumerate() {
            for &v in neighbors {
                let key = (u.min(v as usize), u.max(v as usize));
                let Some(&id) = lookup.get(&key) else {
                    return Err(Error::InvalidGraph(format!("edge '{}'-'{}' is not symmetric", node_ids[u], node_ids[v as usize])))
                };
                seen[id as usize] += 1;
                edge_ids.push(id);
            }
        }
        if let Some(id) = seen.iter().position(|&count| count != 2) {
            let (u, v) = endpoints[id];
            return Err(Error::InvalidGraph(format!("edge '{}'-'{}' is not symmetric", node_ids[u as usize], node_ids[v as usize])))
        }

        let graph = Self {
            size,
            offsets: std::iter::once(0u32).chain(
                edges.iter()
                    .map(|v| v.len() as u32)
                    .scan(0u32, |acc, len| {*acc += len; Some(*acc)})
            ).collect::<Vec<u32>>(),
            edges: edges.iter().flatten().copied().collect(),
            edge_ids,
            endpoints,
            node_ids,
            index,
            node_weights,
        };

        if !graph.is_connected() {
            return Err(Error::InvalidGraph("graph is not connected".into()))
        }

        Ok(graph)
    }

    /// Construct a graph from node identifiers and an undirected edge list.
    pub fn from_edge_list(node_ids: Vec<String>, edge_list: &[(usize, usize)], node_weights: WeightMatrix) -> Result<Self> {
        let mut edges = vec![Vec::new(); node_ids.len()];
        for &(u, v) in edge_list {
            if u >= node_ids.len() || v >= node_ids.len() {
                return Err(Error::InvalidGraph(format!("edge ({u}, {v}) is out of range")))
            }
            edges[u].push(v as u32);
            edges[v].push(u as u32);
        }
        Self::new(node_ids, &edges, node_weights)
    }

    /// Get the number of nodes in the graph.
    #[inline] pub fn node_count(&self) -> usize { self.size }

    /// Get the number of undirected edges in the graph.
    #[inline] pub fn edge_count(&self) -> usize { self.endpoints.len() }

    /// Get a reference to the node weights matrix.
    #[inline] pub fn node_weights(&self) -> &WeightMatrix { &self.node_weights }

    /// Get the identifier of a node.
    #[inline] pub fn node_id(&self, node: usize) -> &str { &self.node_ids[node] }

    /// Look up a node index by identifier.
    #[inline] pub fn node_index(&self, id: &str) -> Option<usize> { self.index.get(id).copied() }

    /// Get the endpoints `(u, v)` with `u < v` of an undirected edge.
    #[inline]
    pub fn endpoints(&self, edge: usize) -> (usize, usize) {
        let (u, v) = self.endpoints[edge];
        (u as usize, v as usize)
    }

    /// Get the range of half-edges for a given node.
    #[inline]
    fn range(&self, node: usize) -> std::ops::Range<usize> {
        self.offsets[node] as usize .. self.offsets[node + 1] as usize
    }

    /// Get the degree (number of neighbors) of a given node.
    #[inline] pub fn degree(&self, node: usize) -> usize { self.range(node).len() }

    /// Get the ith neighbor of a given node.
    #[inline]
    pub fn edge(&self, node: usize, i: usize) -> Option<usize> {
        self.range(node).nth(i).map(|v| self.edges[v] as usize)
    }

    /// Get an iterator over the neighbors of a given node.
    #[inline]
    pub fn edges(&self, node: usize) -> impl Iterator<Item = usize> + '_ {
        self.range(node).map(move |v| self.edges[v] as usize)
    }

    /// Get an iterator over the neighbors of a given node with their undirected edge ids.
    #[inline]
    pub fn edges_with_ids(&self, node: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.range(node).map(move |v| (self.edges[v] as usize, self.edge_ids[v] as usize))
    }

    /// Check whether every node is reachable from node 0.
    fn is_connected(&self) -> bool {
        let mut visited = vec![false; self.size];
        let mut queue = VecDeque::from([0]);
        visited[0] = true;
        let mut seen = 1;
        while let Some(u) = queue.pop_front() {
            for v in self.edges(u) {
                if !visited[v] {
                    visited[v] = true;
                    seen += 1;
                    queue.push_back(v);
                }
            }
        }
        seen == self.size
    }
}
