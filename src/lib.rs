#![doc = "Recombination Markov chain ensembles for redistricting analysis"]
mod accept;
mod chain;
mod constraints;
mod error;
mod graph;
mod partition;
mod recom;
mod stats;
mod updaters;

pub mod io;

#[doc(inline)]
pub use error::{Error, Result};

#[doc(inline)]
pub use graph::{Graph, WeightMatrix, WeightType};

#[doc(inline)]
pub use partition::{Flip, NodeMove, Partition};

#[doc(inline)]
pub use updaters::{FullFn, IncrementalFn, Shape, Strategy, Updater, UpdaterRegistry, Value, Values};

#[doc(inline)]
pub use recom::{Recom, RecomParams};

#[doc(inline)]
pub use constraints::{Constraint, Contiguous, Validator, WithinPercentOfIdeal, population_within};

#[doc(inline)]
pub use accept::{Acceptance, AlwaysAccept, MetropolisHastings};

#[doc(inline)]
pub use chain::{ChainConfig, ChainStep, MarkovChain, Phase, Plan};

#[doc(inline)]
pub use stats::{Ensemble, Report, Summary};
