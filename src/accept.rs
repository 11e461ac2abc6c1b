use std::sync::Arc;

use rand::{Rng, RngCore};

use crate::chain::Plan;

/// Threshold below which a score increase is treated as no change.
const EPSILON: f64 = 1e-10;

/// Final accept/reject decision over a constraint-satisfying proposal.
pub trait Acceptance {
    fn decide(&self, current: &Plan, proposed: &Plan, rng: &mut dyn RngCore) -> bool;
}

/// Accept every proposal that passes the constraints.
#[derive(Clone, Copy, Debug, Default)]
pub struct AlwaysAccept;

impl Acceptance for AlwaysAccept {
    #[inline]
    fn decide(&self, _current: &Plan, _proposed: &Plan, _rng: &mut dyn RngCore) -> bool { true }
}

/// Metropolis-Hastings rule over an energy `score` (lower is better) at inverse temperature `beta`.
#[derive(Clone)]
pub struct MetropolisHastings {
    score: Arc<dyn Fn(&Plan) -> f64 + Send + Sync>,
    beta: f64,
}

impl MetropolisHastings {
    pub fn new(beta: f64, score: impl Fn(&Plan) -> f64 + Send + Sync + 'static) -> Self {
        Self { score: Arc::new(score), beta }
    }

    #[inline] pub fn beta(&self) -> f64 { self.beta }
}

/// Probability of moving to a state whose score is `delta` higher.
/// Returns 1.0 for improvements, otherwise `exp(-beta * delta)`.
fn acceptance_probability(delta: f64, beta: f64) -> f64 {
    if delta < EPSILON { 1.0 } else { (-beta * delta).exp() }
}

impl Acceptance for MetropolisHastings {
    fn decide(&self, current: &Plan, proposed: &Plan, rng: &mut dyn RngCore) -> bool {
        let delta = (self.score)(proposed) - (self.score)(current);
        let probability = acceptance_probability(delta, self.beta);
        probability >= 1.0 || rng.random::<f64>() < probability
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::{
        graph::{Graph, WeightMatrix},
        partition::Partition,
        updaters::{Updater, UpdaterRegistry},
    };

    fn plans() -> (Plan, Plan) {
        let weights = WeightMatrix::new(3, HashMap::from([("POP".to_string(), vec![1, 1, 1])]), HashMap::new()).unwrap();
        let graph = Arc::new(Graph::from_edge_list(vec!["a".into(), "b".into(), "c".into()], &[(0, 1), (1, 2), (2, 0)], weights).unwrap());
        let registry = UpdaterRegistry::new(&graph, [("cut edges", Updater::cut_edge_count())]).unwrap();
        let plan = |assignments| {
            let partition = Partition::new(graph.clone(), 2, assignments).unwrap();
            let values = registry.evaluate_full(&partition);
            Plan::new(partition, values)
        };
        (plan(vec![0, 0, 1]), plan(vec![0, 1, 1]))
    }

    #[test]
    fn probability_matches_boltzmann_factor() {
        assert_eq!(acceptance_probability(-1.0, 2.0), 1.0);
        assert_eq!(acceptance_probability(0.0, 2.0), 1.0);
        assert!((acceptance_probability(1.0, 2.0) - (-2.0f64).exp()).abs() < 1e-12);
    }

    #[test]
    fn always_accept_accepts() {
        let (a, b) = plans();
        assert!(AlwaysAccept.decide(&a, &b, &mut StdRng::seed_from_u64(0)));
    }

    #[test]
    fn metropolis_rejects_worse_plans_at_high_beta() {
        let (a, b) = plans();
        let mut rng = StdRng::seed_from_u64(0);
        // Score the plans by the population of district 0.
        let score = |plan: &Plan| plan.partition().nodes_in(0).len() as f64 * 100.0;
        let rule = MetropolisHastings::new(1.0, score);

        // b has one fewer node in district 0 and is always accepted from a.
        assert!((0..50).all(|_| rule.decide(&a, &b, &mut rng)));
        // The reverse costs 100 and is accepted with probability e^-100.
        assert!((0..50).all(|_| !rule.decide(&b, &a, &mut rng)));
    }

    #[test]
    fn metropolis_at_zero_beta_accepts_everything() {
        let (a, b) = plans();
        let rule = MetropolisHastings::new(0.0, |plan: &Plan| plan.partition().nodes_in(0).len() as f64);
        let mut rng = StdRng::seed_from_u64(1);
        assert!((0..50).all(|_| rule.decide(&b, &a, &mut rng)));
    }
}
