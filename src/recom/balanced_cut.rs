use rand::{Rng, seq::IndexedRandom};

use crate::{constraints::population_within, recom::spanning_tree::SpanningTree};

/// Every tree node `u` such that cutting the edge `(parent[u], u)` leaves both
/// sides within `epsilon` of `ideal_pop`. `pops` is indexed by tree node.
///
/// Subtree populations are read off prefix sums over the preorder, so each
/// edge is evaluated once in O(1).
pub(crate) fn balanced_cuts(tree: &SpanningTree, pops: &[i64], ideal_pop: f64, epsilon: f64) -> Vec<usize> {
    let mut prefix = Vec::with_capacity(tree.len() + 1);
    prefix.push(0i64);
    for &u in tree.order() {
        prefix.push(prefix[prefix.len() - 1] + pops[u]);
    }
    let total = prefix[tree.len()];

    tree.order()[1..].iter() // order[0] is the root, which has no parent edge
        .copied()
        .filter(|&u| {
            let (index, size) = tree.span(u);
            let below = prefix[index + size] - prefix[index];
            population_within(below, ideal_pop, epsilon) && population_within(total - below, ideal_pop, epsilon)
        })
        .collect()
}

/// Choose uniformly among the balanced cuts of `tree`, if any.
pub(crate) fn choose_cut(tree: &SpanningTree, pops: &[i64], ideal_pop: f64, epsilon: f64, rng: &mut impl Rng) -> Option<usize> {
    balanced_cuts(tree, pops, ideal_pop, epsilon).choose(rng).copied()
}
