use crate::updaters::{Shape, Updater, Value};

impl Updater {
    /// Number of districts where the `group` tally is at least `threshold` of the `total` tally.
    /// Districts with zero total never count. Both must name tallies registered earlier.
    pub fn majority_districts(group: &str, total: &str, threshold: f64) -> Self {
        let (group_key, total_key) = (group.to_string(), total.to_string());
        Self::full(Shape::Scalar, move |_, values| {
            let (Some(group), Some(total)) = (values.counts(&group_key), values.counts(&total_key)) else {
                return Value::Scalar(0)
            };
            Value::Scalar(group.iter().zip(total)
                .filter(|&(&count, &population)| population > 0 && count as f64 >= threshold * population as f64)
                .count() as i64)
        })
        .depends_on(group, Shape::Counts)
        .depends_on(total, Shape::Counts)
    }

    /// Per-district population deviation `pop / ideal - 1` for a population tally.
    pub fn population_deviation(population: &str, ideal_pop: f64) -> Self {
        let key = population.to_string();
        Self::full(Shape::Reals, move |_, values| {
            Value::Reals(values.counts(&key).unwrap_or_default().iter()
                .map(|&pop| pop as f64 / ideal_pop - 1.0)
                .collect())
        })
        .depends_on(population, Shape::Counts)
    }
}
