use std::sync::Arc;

use crate::{
    constraints::Constraint,
    error::Result,
    partition::Partition,
    updaters::{UpdaterRegistry, Values},
};

/// Conjunction of constraints, checked in insertion order.
#[derive(Clone, Default)]
pub struct Validator {
    constraints: Vec<Arc<dyn Constraint>>,
}

impl Validator {
    pub fn new() -> Self { Self::default() }

    /// Add a constraint.
    pub fn with(mut self, constraint: impl Constraint + 'static) -> Self {
        self.constraints.push(Arc::new(constraint));
        self
    }

    #[inline] pub fn len(&self) -> usize { self.constraints.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.constraints.is_empty() }

    /// Check every constraint, stopping at the first failure.
    pub fn check(&self, partition: &Partition, values: &Values) -> bool {
        self.first_failing(partition, values).is_none()
    }

    /// Name of the first constraint that rejects `partition`.
    pub fn first_failing(&self, partition: &Partition, values: &Values) -> Option<&str> {
        self.constraints.iter()
            .find(|constraint| !constraint.check(partition, values))
            .map(|constraint| constraint.name())
    }

    /// Validate every constraint against `registry`.
    pub fn validate(&self, registry: &UpdaterRegistry) -> Result<()> {
        self.constraints.iter().try_for_each(|constraint| constraint.validate(registry))
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, sync::Arc};

    use super::*;
    use crate::{
        constraints::{Contiguous, WithinPercentOfIdeal},
        graph::{Graph, WeightMatrix},
        updaters::Updater,
    };

    #[test]
    fn reports_first_failing_constraint() {
        let weights = WeightMatrix::new(3, HashMap::from([("POP".to_string(), vec![1, 1, 4])]), HashMap::new()).unwrap();
        let graph = Arc::new(Graph::from_edge_list(vec!["a".into(), "b".into(), "c".into()], &[(0, 1), (1, 2)], weights).unwrap());
        let registry = UpdaterRegistry::new(&graph, [("population", Updater::tally("POP"))]).unwrap();
        let partition = Partition::new(graph, 2, vec![0, 0, 1]).unwrap();
        let values = registry.evaluate_full(&partition);

        let validator = Validator::new()
            .with(Contiguous)
            .with(WithinPercentOfIdeal::new("population", 3.0, 0.25));
        assert_eq!(validator.len(), 2);
        assert!(validator.validate(&registry).is_ok());
        assert_eq!(validator.first_failing(&partition, &values), Some("population"));
        assert!(!validator.check(&partition, &values));

        assert!(Validator::new().with(Contiguous).check(&partition, &values));
        assert!(Validator::new().check(&partition, &values));
    }
}
