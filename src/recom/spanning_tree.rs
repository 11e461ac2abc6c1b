use ahash::AHashMap;
use rand::{Rng, seq::{IndexedRandom, SliceRandom}};

use crate::partition::Partition;

/// Subgraph induced by the nodes of two districts, relabeled `0..len`.
#[derive(Debug)]
pub(crate) struct Subgraph {
    nodes: Vec<usize>,          // local -> global node index
    adjacency: Vec<Vec<usize>>, // local neighbor lists
}

impl Subgraph {
    /// Induced subgraph over the union of districts `a` and `b`.
    pub(crate) fn induced(partition: &Partition, (a, b): (u32, u32)) -> Self {
        let nodes = partition.nodes_in(a).iter()
            .chain(partition.nodes_in(b))
            .copied()
            .collect::<Vec<_>>();
        let local = nodes.iter().enumerate()
            .map(|(i, &u)| (u, i))
            .collect::<AHashMap<_, _>>();

        let graph = partition.graph();
        let adjacency = nodes.iter()
            .map(|&u| graph.edges(u).filter_map(|v| local.get(&v).copied()).collect())
            .collect();

        Self { nodes, adjacency }
    }

    #[inline] pub(crate) fn len(&self) -> usize { self.nodes.len() }

    /// Global node index of local node `i`.
    #[inline] pub(crate) fn global(&self, i: usize) -> usize { self.nodes[i] }

    #[inline] pub(crate) fn nodes(&self) -> &[usize] { &self.nodes }

    pub(crate) fn is_connected(&self) -> bool {
        if self.nodes.is_empty() { return false }

        let mut seen = vec![false; self.len()];
        let mut stack = vec![0];
        seen[0] = true;
        let mut count = 1;
        while let Some(u) = stack.pop() {
            for &v in &self.adjacency[u] {
                if !seen[v] {
                    seen[v] = true;
                    count += 1;
                    stack.push(v);
                }
            }
        }
        count == self.len()
    }
}

/// Rooted spanning tree over a `Subgraph`, laid out so that every subtree is a
/// contiguous slice of the preorder.
#[derive(Debug)]
pub(crate) struct SpanningTree {
    parent: Vec<usize>, // parent[root] = root
    order: Vec<usize>,  // preorder over local nodes, order[0] = root
    index: Vec<usize>,  // position of each node in `order`
    size: Vec<usize>,   // subtree sizes
}

impl SpanningTree {
    /// Draw a uniformly random spanning tree with Wilson's algorithm.
    /// Returns None if `subgraph` is empty or disconnected.
    pub(crate) fn random(subgraph: &Subgraph, rng: &mut impl Rng) -> Option<Self> {
        let n = subgraph.len();
        if !subgraph.is_connected() { return None }

        let mut nodes = (0..n).collect::<Vec<_>>();
        nodes.shuffle(rng);
        let root = nodes[0];

        let mut in_tree = vec![false; n];
        let mut next = vec![root; n];
        in_tree[root] = true;

        // Random walk until the tree is hit, remembering only the last exit
        // from each node; following those exits afterwards traces the
        // loop-erased path.
        for &start in &nodes[1..] {
            let mut u = start;
            while !in_tree[u] {
                next[u] = *subgraph.adjacency[u].choose(rng)?;
                u = next[u];
            }

            let mut u = start;
            while !in_tree[u] {
                in_tree[u] = true;
                u = next[u];
            }
        }

        let parent = next;
        let mut children = vec![Vec::new(); n];
        for &u in &nodes[1..] {
            children[parent[u]].push(u);
        }

        // Iterative preorder from the root, filling subtree sizes on exit.
        let mut order = Vec::with_capacity(n);
        let mut index = vec![0; n];
        let mut size = vec![1; n];
        let mut stack = vec![(root, false)];
        while let Some((u, entered)) = stack.pop() {
            if !entered {
                index[u] = order.len();
                order.push(u);
                stack.push((u, true));
                for &v in children[u].iter().rev() {
                    stack.push((v, false));
                }
            } else {
                size[u] += children[u].iter().map(|&v| size[v]).sum::<usize>();
            }
        }

        Some(Self { parent, order, index, size })
    }

    #[inline] pub(crate) fn len(&self) -> usize { self.order.len() }

    #[inline] pub(crate) fn root(&self) -> usize { self.order[0] }

    #[inline] pub(crate) fn parent(&self, node: usize) -> usize { self.parent[node] }

    #[inline] pub(crate) fn order(&self) -> &[usize] { &self.order }

    /// Position of `node` in the preorder and the size of its subtree.
    #[inline] pub(crate) fn span(&self, node: usize) -> (usize, usize) { (self.index[node], self.size[node]) }

    /// Nodes of the subtree hanging below `node`.
    #[inline]
    pub(crate) fn subtree(&self, node: usize) -> &[usize] {
        let (index, size) = self.span(node);
        &self.order[index..index + size]
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, sync::Arc};

    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::graph::{Graph, WeightMatrix};

    /// 3x3 grid, rows split into districts 0 (top row) and 1 (rest).
    fn grid() -> Partition {
        let mut edges = vec![];
        for r in 0..3 {
            for c in 0..3 {
                let u = r * 3 + c;
                if c < 2 { edges.push((u, u + 1)) }
                if r < 2 { edges.push((u, u + 3)) }
            }
        }
        let weights = WeightMatrix::new(9, HashMap::from([("POP".to_string(), vec![1; 9])]), HashMap::new()).unwrap();
        let graph = Graph::from_edge_list((0..9).map(|i| i.to_string()).collect(), &edges, weights).unwrap();
        Partition::new(Arc::new(graph), 2, vec![0, 0, 0, 1, 1, 1, 1, 1, 1]).unwrap()
    }

    #[test]
    fn induced_subgraph_keeps_only_internal_edges() {
        let partition = grid();
        let subgraph = Subgraph::induced(&partition, (0, 1));
        assert_eq!(subgraph.len(), 9);
        assert!(subgraph.is_connected());

        let edges = subgraph.adjacency.iter().map(Vec::len).sum::<usize>() / 2;
        assert_eq!(edges, 12);
    }

    #[test]
    fn disconnected_subgraph_yields_no_tree() {
        let weights = WeightMatrix::empty(4);
        let graph = Graph::from_edge_list((0..4).map(|i| i.to_string()).collect(), &[(0, 1), (1, 2), (2, 3)], weights).unwrap();
        let partition = Partition::new(Arc::new(graph), 3, vec![0, 1, 2, 2]).unwrap();

        // Districts 0 and 2 are separated by district 1.
        let subgraph = Subgraph::induced(&partition, (0, 2));
        assert!(!subgraph.is_connected());
        assert!(SpanningTree::random(&subgraph, &mut StdRng::seed_from_u64(0)).is_none());
    }

    #[test]
    fn tree_spans_every_node() {
        let partition = grid();
        let subgraph = Subgraph::induced(&partition, (0, 1));
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..20 {
            let tree = SpanningTree::random(&subgraph, &mut rng).unwrap();
            assert_eq!(tree.len(), 9);
            assert_eq!(tree.parent(tree.root()), tree.root());
            assert_eq!(tree.subtree(tree.root()).len(), 9);

            let mut sorted = tree.order().to_vec();
            sorted.sort_unstable();
            assert_eq!(sorted, (0..9).collect::<Vec<_>>());

            // Every tree edge is a subgraph edge, and subtrees are consistent with parents.
            for &u in &tree.order()[1..] {
                let p = tree.parent(u);
                assert!(subgraph.adjacency[u].contains(&p));
                let (index, size) = tree.span(p);
                let (child_index, child_size) = tree.span(u);
                assert!(index < child_index && child_index + child_size <= index + size);
            }
        }
    }

    #[test]
    fn same_seed_same_tree() {
        let partition = grid();
        let subgraph = Subgraph::induced(&partition, (0, 1));
        let a = SpanningTree::random(&subgraph, &mut StdRng::seed_from_u64(42)).unwrap();
        let b = SpanningTree::random(&subgraph, &mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(a.order(), b.order());
        assert_eq!(a.parent, b.parent);
    }

    #[test]
    fn trees_of_a_cycle_are_roughly_uniform() {
        // A 4-cycle has exactly 4 spanning trees, one per missing edge.
        let weights = WeightMatrix::empty(4);
        let graph = Graph::from_edge_list((0..4).map(|i| i.to_string()).collect(), &[(0, 1), (1, 2), (2, 3), (3, 0)], weights).unwrap();
        let partition = Partition::new(Arc::new(graph), 2, vec![0, 0, 1, 1]).unwrap();
        let subgraph = Subgraph::induced(&partition, (0, 1));
        let mut rng = StdRng::seed_from_u64(3);

        let mut counts = [0usize; 4];
        for _ in 0..4000 {
            let tree = SpanningTree::random(&subgraph, &mut rng).unwrap();
            let mut present = [false; 4];
            for &u in &tree.order()[1..] {
                let (x, y) = (subgraph.global(u), subgraph.global(tree.parent(u)));
                let edge = match (x.min(y), x.max(y)) {
                    (0, 1) => 0, (1, 2) => 1, (2, 3) => 2, _ => 3,
                };
                present[edge] = true;
            }
            counts[present.iter().position(|&p| !p).unwrap()] += 1;
        }
        for count in counts {
            assert!((800..1200).contains(&count), "{counts:?}");
        }
    }
}
