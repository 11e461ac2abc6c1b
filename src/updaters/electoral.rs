use crate::updaters::{Shape, Updater, Value};

impl Updater {
    /// Number of districts where `party` takes a strict majority of the two-party vote.
    /// `party` and `opponent` must name vote tallies registered earlier.
    pub fn districts_won(party: &str, opponent: &str) -> Self {
        let (party_key, opponent_key) = (party.to_string(), opponent.to_string());
        Self::full(Shape::Scalar, move |_, values| {
            let (Some(party), Some(opponent)) = (values.counts(&party_key), values.counts(&opponent_key)) else {
                return Value::Scalar(0)
            };
            Value::Scalar(party.iter().zip(opponent)
                .filter(|&(&votes, &other)| votes > other)
                .count() as i64)
        })
        .depends_on(party, Shape::Counts)
        .depends_on(opponent, Shape::Counts)
    }

    /// Per-district share of the two-party vote won by `party` (0 for districts with no votes).
    pub fn vote_share(party: &str, opponent: &str) -> Self {
        let (party_key, opponent_key) = (party.to_string(), opponent.to_string());
        Self::full(Shape::Reals, move |_, values| {
            let (Some(party), Some(opponent)) = (values.counts(&party_key), values.counts(&opponent_key)) else {
                return Value::Reals(vec![])
            };
            Value::Reals(party.iter().zip(opponent)
                .map(|(&votes, &other)| {
                    let total = votes + other;
                    if total == 0 { 0.0 } else { votes as f64 / total as f64 }
                })
                .collect())
        })
        .depends_on(party, Shape::Counts)
        .depends_on(opponent, Shape::Counts)
    }
}
