mod contiguous;
mod population;
mod validator;

pub use contiguous::Contiguous;
pub use population::{WithinPercentOfIdeal, population_within};
pub use validator::Validator;

use crate::{error::Result, partition::Partition, updaters::{UpdaterRegistry, Values}};

/// A named predicate over a partition and its updater outputs.
///
/// A failing check is an ordinary outcome: the chain discards the proposal and
/// draws another.
pub trait Constraint: Send + Sync {
    /// Name reported when the constraint rejects the initial partition.
    fn name(&self) -> &str;

    /// Check whether `partition` satisfies the constraint.
    fn check(&self, partition: &Partition, values: &Values) -> bool;

    /// Verify that every updater this constraint reads is registered.
    fn validate(&self, _registry: &UpdaterRegistry) -> Result<()> { Ok(()) }
}
