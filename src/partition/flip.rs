use ahash::AHashSet;

use crate::{error::{Error, Result}, partition::Partition};

/// A single node changing district.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodeMove {
    pub node: usize,
    pub from: u32,
    pub to: u32,
}

/// A reassignment of nodes between exactly two districts, resolved against the
/// partition it was built from. Nodes that keep their district are dropped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Flip {
    pair: (u32, u32),
    moves: Vec<NodeMove>,
}

impl Flip {
    /// Build a flip of `(node, new district)` targets restricted to the district `pair`.
    pub fn new(partition: &Partition, pair: (u32, u32), targets: impl IntoIterator<Item = (usize, u32)>) -> Result<Self> {
        let (a, b) = pair;
        if a == b || a >= partition.num_districts() || b >= partition.num_districts() {
            return Err(Error::InvalidAssignment(format!(
                "flip pair ({a}, {b}) must be two distinct districts in range [0, {})", partition.num_districts()
            )))
        }

        let mut seen = AHashSet::new();
        let mut moves = Vec::new();
        for (node, to) in targets {
            if node >= partition.num_nodes() { return Err(Error::UnknownNode(format!("#{node}"))) }
            if !seen.insert(node) {
                return Err(Error::InvalidAssignment(format!("node '{}' appears twice in flip", partition.graph().node_id(node))))
            }

            let from = partition.assignment(node);
            if (from != a && from != b) || (to != a && to != b) {
                return Err(Error::InvalidAssignment(format!(
                    "flip of node '{}' ({from} -> {to}) leaves district pair ({a}, {b})", partition.graph().node_id(node)
                )))
            }
            if from != to { moves.push(NodeMove { node, from, to }) }
        }

        Ok(Self { pair, moves })
    }

    /// Build a flip from node identifiers rather than indices.
    pub fn from_ids<'a>(partition: &Partition, pair: (u32, u32), targets: impl IntoIterator<Item = (&'a str, u32)>) -> Result<Self> {
        let targets = targets.into_iter()
            .map(|(id, to)| {
                partition.graph().node_index(id)
                    .map(|node| (node, to))
                    .ok_or_else(|| Error::UnknownNode(id.to_string()))
            })
            .collect::<Result<Vec<_>>>()?;

        Self::new(partition, pair, targets)
    }

    /// The two districts this flip is restricted to.
    #[inline] pub fn pair(&self) -> (u32, u32) { self.pair }

    /// The effective node moves.
    #[inline] pub fn moves(&self) -> &[NodeMove] { &self.moves }

    /// Number of nodes that change district.
    #[inline] pub fn len(&self) -> usize { self.moves.len() }

    /// Returns true if no node changes district.
    #[inline] pub fn is_empty(&self) -> bool { self.moves.is_empty() }
}
