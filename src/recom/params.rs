use crate::error::{Error, Result};

/// Immutable configuration of a recombination proposal.
#[derive(Clone, Debug, PartialEq)]
pub struct RecomParams {
    pub pop_series: String, // integer node series balanced by the cut
    pub ideal_pop: f64,     // target population per district
    pub epsilon: f64,       // allowed fractional deviation from `ideal_pop`
    pub node_repeats: usize, // spanning trees drawn per district pair
}

impl RecomParams {
    pub fn new(pop_series: &str, ideal_pop: f64, epsilon: f64, node_repeats: usize) -> Result<Self> {
        if !(ideal_pop.is_finite() && ideal_pop > 0.0) {
            return Err(Error::InvalidConfig(format!("ideal_pop must be positive, got {ideal_pop}")))
        }
        if !(0.0..1.0).contains(&epsilon) {
            return Err(Error::InvalidConfig(format!("epsilon must be in [0, 1), got {epsilon}")))
        }
        if node_repeats == 0 {
            return Err(Error::InvalidConfig("node_repeats must be at least 1".into()))
        }
        Ok(Self { pop_series: pop_series.to_string(), ideal_pop, epsilon, node_repeats })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range_parameters() {
        assert!(RecomParams::new("POP", 100.0, 0.05, 1).is_ok());
        assert!(RecomParams::new("POP", 100.0, 0.0, 1).is_ok());
        assert!(RecomParams::new("POP", 0.0, 0.05, 1).is_err());
        assert!(RecomParams::new("POP", f64::NAN, 0.05, 1).is_err());
        assert!(RecomParams::new("POP", 100.0, 1.0, 1).is_err());
        assert!(RecomParams::new("POP", 100.0, -0.1, 1).is_err());
        assert!(RecomParams::new("POP", 100.0, 0.05, 0).is_err());
    }
}
