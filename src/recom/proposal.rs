use rand::{Rng, seq::IndexedRandom};
use tracing::trace;

use crate::{
    error::{Error, Result},
    partition::{Flip, Partition},
    recom::{
        RecomParams,
        balanced_cut::choose_cut,
        spanning_tree::{SpanningTree, Subgraph},
    },
};

/// Recombination proposal: merge two adjacent districts and re-split them
/// along a population-balanced edge of a uniformly random spanning tree.
#[derive(Clone, Debug)]
pub struct Recom {
    params: RecomParams,
}

impl Recom {
    pub fn new(params: RecomParams) -> Self { Self { params } }

    #[inline] pub fn params(&self) -> &RecomParams { &self.params }

    /// Choose a district pair through a uniformly random cut edge, returned as `(lower, higher)`.
    /// None if the partition has no cut edges.
    pub fn select_pair(&self, partition: &Partition, rng: &mut impl Rng) -> Option<(u32, u32)> {
        let &edge = partition.cut_edge_ids().choose(rng)?;
        Some(partition.districts_of_edge(edge))
    }

    /// Re-split districts `pair` into two balanced halves.
    ///
    /// Draws up to `node_repeats` spanning trees of the merged districts and
    /// fails with `BipartitionFailure` if none admits a balanced cut. The
    /// subtree below the cut goes to `pair.0`, the rest to `pair.1`.
    pub fn bipartition(&self, partition: &Partition, pair: (u32, u32), rng: &mut impl Rng) -> Result<Flip> {
        let RecomParams { pop_series, ideal_pop, epsilon, node_repeats } = &self.params;
        let column = partition.graph().node_weights().column_i64(pop_series).ok_or_else(|| {
            Error::InvalidConfig(format!("population series '{pop_series}' is not an integer node series"))
        })?;

        let subgraph = Subgraph::induced(partition, pair);
        let pops = subgraph.nodes().iter().map(|&u| column[u]).collect::<Vec<_>>();

        let mut drawn = 0;
        for attempt in 1..=*node_repeats {
            let Some(tree) = SpanningTree::random(&subgraph, rng) else {
                trace!(?pair, "merged districts are not connected");
                break
            };
            drawn += 1;
            let Some(cut) = choose_cut(&tree, &pops, *ideal_pop, *epsilon, rng) else {
                trace!(?pair, attempt, "spanning tree has no balanced cut");
                continue
            };

            debug_assert_ne!(cut, tree.root());
            let mut side = vec![pair.1; subgraph.len()];
            for &u in tree.subtree(cut) {
                side[u] = pair.0;
            }
            trace!(
                ?pair, attempt,
                edge = ?(subgraph.global(tree.parent(cut)), subgraph.global(cut)),
                size = tree.subtree(cut).len(),
                "found balanced cut",
            );

            return Flip::new(partition, pair, side.into_iter().enumerate().map(|(u, d)| (subgraph.global(u), d)))
        }

        Err(Error::BipartitionFailure { pair, attempts: drawn })
    }

    /// Propose a new partition that differs from `partition` in one pair of districts.
    pub fn propose(&self, partition: &Partition, rng: &mut impl Rng) -> Result<Partition> {
        let pair = self.select_pair(partition, rng).ok_or_else(|| {
            Error::InvalidAssignment("partition has no cut edges to recombine".into())
        })?;
        let flip = self.bipartition(partition, pair, rng)?;
        partition.with_flip(&flip)
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, sync::Arc};

    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::graph::{Graph, WeightMatrix};

    fn path(pops: Vec<i64>, assignments: Vec<u32>, k: u32) -> Partition {
        let n = pops.len();
        let weights = WeightMatrix::new(n, HashMap::from([("POP".to_string(), pops)]), HashMap::new()).unwrap();
        let edges = (1..n).map(|i| (i - 1, i)).collect::<Vec<_>>();
        let graph = Graph::from_edge_list((0..n).map(|i| format!("p{i}")).collect(), &edges, weights).unwrap();
        Partition::new(Arc::new(graph), k, assignments).unwrap()
    }

    #[test]
    fn pair_comes_from_a_cut_edge() {
        let partition = path(vec![1; 6], vec![0, 0, 1, 1, 2, 2], 3);
        let recom = Recom::new(RecomParams::new("POP", 2.0, 0.0, 1).unwrap());
        let mut rng = StdRng::seed_from_u64(0);
        for _ in 0..20 {
            let pair = recom.select_pair(&partition, &mut rng).unwrap();
            assert!(pair == (0, 1) || pair == (1, 2));
        }
    }

    #[test]
    fn exact_split_of_a_path() {
        let partition = path(vec![5; 6], vec![0, 1, 1, 1, 1, 1], 2);
        let recom = Recom::new(RecomParams::new("POP", 15.0, 0.0, 1).unwrap());
        let next = recom.propose(&partition, &mut StdRng::seed_from_u64(11)).unwrap();

        let assignments = next.assignments();
        assert!(assignments == [0, 0, 0, 1, 1, 1] || assignments == [1, 1, 1, 0, 0, 0]);
        assert_eq!(next.num_cut_edges(), 1);
        assert_eq!(next.flip().unwrap().pair(), (0, 1));
    }

    #[test]
    fn only_the_pair_changes() {
        let partition = path(vec![2; 9], vec![0, 0, 0, 1, 1, 1, 2, 2, 2], 3);
        let recom = Recom::new(RecomParams::new("POP", 6.0, 0.4, 3).unwrap());
        let mut rng = StdRng::seed_from_u64(5);

        let flip = recom.bipartition(&partition, (1, 2), &mut rng).unwrap();
        assert!(flip.moves().iter().all(|m| m.node >= 3));
        let next = partition.with_flip(&flip).unwrap();
        assert_eq!(&next.assignments()[..3], &[0, 0, 0]);
        assert!(next.check_contiguity());
    }

    #[test]
    fn unbalanceable_pair_fails_after_node_repeats() {
        let partition = path(vec![1, 1, 10], vec![0, 0, 1], 2);
        let recom = Recom::new(RecomParams::new("POP", 6.0, 0.1, 4).unwrap());
        let result = recom.propose(&partition, &mut StdRng::seed_from_u64(0));
        assert!(matches!(result, Err(Error::BipartitionFailure { pair: (0, 1), attempts: 4 })));
    }

    #[test]
    fn disconnected_pair_draws_no_trees() {
        let partition = path(vec![1; 6], vec![0, 0, 1, 1, 2, 2], 3);
        let recom = Recom::new(RecomParams::new("POP", 2.0, 0.5, 5).unwrap());
        let result = recom.bipartition(&partition, (0, 2), &mut StdRng::seed_from_u64(3));
        assert!(matches!(result, Err(Error::BipartitionFailure { pair: (0, 2), attempts: 0 })));
    }

    #[test]
    fn missing_population_series_is_a_config_error() {
        let partition = path(vec![1, 1], vec![0, 1], 2);
        let recom = Recom::new(RecomParams::new("TOTPOP", 1.0, 0.1, 1).unwrap());
        let result = recom.propose(&partition, &mut StdRng::seed_from_u64(0));
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }
}
