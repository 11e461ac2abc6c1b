use crate::{constraints::Constraint, partition::Partition, updaters::Values};

/// Every district induces a connected subgraph.
///
/// Recombination preserves contiguity on its own; this check is for plans
/// produced by other means.
#[derive(Clone, Copy, Debug, Default)]
pub struct Contiguous;

impl Constraint for Contiguous {
    fn name(&self) -> &str { "contiguous" }

    fn check(&self, partition: &Partition, _values: &Values) -> bool {
        match partition.flip() {
            // Only the recombined pair can have changed.
            Some(flip) => {
                let (a, b) = flip.pair();
                partition.is_contiguous(a) && partition.is_contiguous(b)
            }
            None => partition.check_contiguity(),
        }
    }
}
