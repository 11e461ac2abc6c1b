use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    graph::Graph,
    recom::RecomParams,
};

fn default_node_repeats() -> usize { 1 }
fn default_max_attempts() -> usize { 100 }

/// Run parameters of a recombination chain.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChainConfig {
    /// Number of districts, fixed for the run.
    pub num_districts: u32,
    /// Integer node series holding total population.
    pub pop_col: String,
    /// Target population per district; total population / `num_districts` when absent.
    #[serde(default)]
    pub ideal_pop: Option<f64>,
    /// Maximum fractional deviation of a district's population from the ideal.
    pub pop_tolerance: f64,
    /// Spanning trees drawn per district pair before re-selecting a pair.
    #[serde(default = "default_node_repeats")]
    pub node_repeats: usize,
    /// Proposals tried per step before the chain gives up.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,
    /// Number of plans emitted, including the initial one.
    pub total_steps: usize,
    #[serde(default)]
    pub seed: u64,
}

impl ChainConfig {
    pub fn new(num_districts: u32, pop_col: &str, pop_tolerance: f64, total_steps: usize) -> Self {
        Self {
            num_districts,
            pop_col: pop_col.to_string(),
            ideal_pop: None,
            pop_tolerance,
            node_repeats: default_node_repeats(),
            max_attempts: default_max_attempts(),
            total_steps,
            seed: 0,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_ideal_pop(mut self, ideal_pop: f64) -> Self {
        self.ideal_pop = Some(ideal_pop);
        self
    }

    pub fn with_node_repeats(mut self, node_repeats: usize) -> Self {
        self.node_repeats = node_repeats;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Check parameter ranges.
    pub fn validate(&self) -> Result<()> {
        if self.num_districts < 2 {
            return Err(Error::InvalidConfig(format!("num_districts must be at least 2, got {}", self.num_districts)))
        }
        if !(0.0..1.0).contains(&self.pop_tolerance) {
            return Err(Error::InvalidConfig(format!("pop_tolerance must be in [0, 1), got {}", self.pop_tolerance)))
        }
        if self.node_repeats == 0 {
            return Err(Error::InvalidConfig("node_repeats must be at least 1".into()))
        }
        if self.max_attempts == 0 {
            return Err(Error::InvalidConfig("max_attempts must be at least 1".into()))
        }
        if let Some(ideal) = self.ideal_pop {
            if !(ideal.is_finite() && ideal > 0.0) {
                return Err(Error::InvalidConfig(format!("ideal_pop must be positive, got {ideal}")))
            }
        }
        Ok(())
    }

    /// The configured ideal population, or the graph's total population split evenly.
    pub fn ideal_pop_for(&self, graph: &Graph) -> Result<f64> {
        if let Some(ideal) = self.ideal_pop { return Ok(ideal) }

        let column = graph.node_weights().column_i64(&self.pop_col).ok_or_else(|| {
            Error::InvalidConfig(format!("population column '{}' is not an integer node series", self.pop_col))
        })?;
        let total: i64 = column.iter().sum();
        Ok(total as f64 / self.num_districts as f64)
    }

    /// Validated proposal parameters for `graph`.
    pub fn recom_params(&self, graph: &Graph) -> Result<RecomParams> {
        self.validate()?;
        RecomParams::new(&self.pop_col, self.ideal_pop_for(graph)?, self.pop_tolerance, self.node_repeats)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::graph::WeightMatrix;

    #[test]
    fn defaults_fill_optional_fields() {
        let config: ChainConfig = serde_json::from_str(
            r#"{"num_districts": 17, "pop_col": "TOTPOP", "pop_tolerance": 0.02, "total_steps": 1000}"#
        ).unwrap();
        assert_eq!(config, ChainConfig::new(17, "TOTPOP", 0.02, 1000));
        assert_eq!(config.node_repeats, 1);
        assert_eq!(config.max_attempts, 100);
        assert_eq!(config.seed, 0);
        assert_eq!(config.ideal_pop, None);
    }

    #[test]
    fn validate_rejects_out_of_range_values() {
        let base = ChainConfig::new(2, "POP", 0.05, 10);
        assert!(base.validate().is_ok());
        assert!(ChainConfig { num_districts: 1, ..base.clone() }.validate().is_err());
        assert!(ChainConfig { pop_tolerance: 1.0, ..base.clone() }.validate().is_err());
        assert!(ChainConfig { pop_tolerance: -0.01, ..base.clone() }.validate().is_err());
        assert!(base.clone().with_node_repeats(0).validate().is_err());
        assert!(base.clone().with_max_attempts(0).validate().is_err());
        assert!(base.clone().with_ideal_pop(0.0).validate().is_err());
    }

    #[test]
    fn ideal_pop_derived_from_total() {
        let weights = WeightMatrix::new(3, HashMap::from([("POP".to_string(), vec![3, 4, 5])]), HashMap::new()).unwrap();
        let graph = Graph::from_edge_list(vec!["a".into(), "b".into(), "c".into()], &[(0, 1), (1, 2)], weights).unwrap();

        let config = ChainConfig::new(2, "POP", 0.1, 1);
        assert_eq!(config.ideal_pop_for(&graph).unwrap(), 6.0);
        assert_eq!(config.clone().with_ideal_pop(7.5).ideal_pop_for(&graph).unwrap(), 7.5);

        let params = config.recom_params(&graph).unwrap();
        assert_eq!(params.ideal_pop, 6.0);
        assert_eq!(params.node_repeats, 1);
        assert!(ChainConfig::new(2, "TOTPOP", 0.1, 1).recom_params(&graph).is_err());
    }
}
