use crate::{
    constraints::Constraint,
    error::{Error, Result},
    partition::Partition,
    updaters::{Shape, UpdaterRegistry, Values},
};

/// Check `|pop - ideal| <= epsilon * ideal`.
///
/// Populations are exact integers; the comparison is done once in `f64`, so a
/// tolerance of 0 admits exactly the populations equal to `ideal`.
#[inline]
pub fn population_within(pop: i64, ideal: f64, epsilon: f64) -> bool {
    (pop as f64 - ideal).abs() <= epsilon * ideal
}

/// Every district's population lies within `epsilon` of `ideal_pop`.
#[derive(Clone, Debug)]
pub struct WithinPercentOfIdeal {
    pop_key: String,
    ideal_pop: f64,
    epsilon: f64,
}

impl WithinPercentOfIdeal {
    /// Bound the population tally registered under `pop_key`.
    pub fn new(pop_key: &str, ideal_pop: f64, epsilon: f64) -> Self {
        Self { pop_key: pop_key.to_string(), ideal_pop, epsilon }
    }

    /// Bound populations around the mean district population of `values`.
    pub fn from_initial(pop_key: &str, values: &Values, epsilon: f64) -> Result<Self> {
        let counts = values.counts(pop_key).ok_or_else(|| Error::InvalidConfig(
            format!("population tally '{pop_key}' is not registered")
        ))?;
        if counts.is_empty() {
            return Err(Error::InvalidConfig("population tally has no districts".into()))
        }

        let total: i64 = counts.iter().sum();
        Ok(Self::new(pop_key, total as f64 / counts.len() as f64, epsilon))
    }

    #[inline] pub fn ideal_pop(&self) -> f64 { self.ideal_pop }

    #[inline] pub fn epsilon(&self) -> f64 { self.epsilon }
}

impl Constraint for WithinPercentOfIdeal {
    fn name(&self) -> &str { "population" }

    fn check(&self, _partition: &Partition, values: &Values) -> bool {
        values.counts(&self.pop_key)
            .is_some_and(|counts| counts.iter().all(|&pop| population_within(pop, self.ideal_pop, self.epsilon)))
    }

    fn validate(&self, registry: &UpdaterRegistry) -> Result<()> {
        match registry.shape(&self.pop_key) {
            Some(Shape::Counts) => Ok(()),
            Some(shape) => Err(Error::InvalidConfig(format!(
                "population constraint needs an integer tally, '{}' yields {shape:?}", self.pop_key
            ))),
            None => Err(Error::InvalidConfig(format!("population tally '{}' is not registered", self.pop_key))),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, sync::Arc};

    use super::*;
    use crate::{
        graph::{Graph, WeightMatrix},
        updaters::Updater,
    };

    fn setup(pops: Vec<i64>, assignments: Vec<u32>) -> (UpdaterRegistry, Partition) {
        let n = pops.len();
        let weights = WeightMatrix::new(n, HashMap::from([("POP".to_string(), pops)]), HashMap::new()).unwrap();
        let edges = (1..n).map(|i| (i - 1, i)).collect::<Vec<_>>();
        let graph = Arc::new(Graph::from_edge_list((0..n).map(|i| i.to_string()).collect(), &edges, weights).unwrap());
        let registry = UpdaterRegistry::new(&graph, [("population", Updater::tally("POP"))]).unwrap();
        let k = assignments.iter().max().map_or(1, |&d| d + 1);
        (registry, Partition::new(graph, k, assignments).unwrap())
    }

    #[test]
    fn tolerance_bound_is_inclusive() {
        assert!(population_within(100, 100.0, 0.0));
        assert!(!population_within(101, 100.0, 0.0));
        assert!(population_within(110, 100.0, 0.1));
        assert!(population_within(90, 100.0, 0.1));
        assert!(!population_within(111, 100.0, 0.1));
    }

    #[test]
    fn checks_every_district() {
        let (registry, partition) = setup(vec![10, 10, 10, 12], vec![0, 0, 1, 1]);
        let values = registry.evaluate_full(&partition);

        assert!(WithinPercentOfIdeal::new("population", 21.0, 0.05).check(&partition, &values));
        assert!(!WithinPercentOfIdeal::new("population", 21.0, 0.02).check(&partition, &values));
    }

    #[test]
    fn ideal_from_initial_values() {
        let (registry, partition) = setup(vec![5, 5, 5, 5, 5, 5], vec![0, 0, 1, 1, 1, 1]);
        let values = registry.evaluate_full(&partition);

        let constraint = WithinPercentOfIdeal::from_initial("population", &values, 0.0).unwrap();
        assert_eq!(constraint.ideal_pop(), 15.0);
        assert!(!constraint.check(&partition, &values));
        assert!(WithinPercentOfIdeal::from_initial("missing", &values, 0.0).is_err());
    }

    #[test]
    fn validate_requires_a_registered_tally() {
        let (registry, _) = setup(vec![1, 1], vec![0, 1]);
        assert!(WithinPercentOfIdeal::new("population", 1.0, 0.1).validate(&registry).is_ok());
        assert!(matches!(
            WithinPercentOfIdeal::new("pop", 1.0, 0.1).validate(&registry),
            Err(Error::InvalidConfig(_))
        ));
    }
}
