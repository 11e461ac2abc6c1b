use thiserror::Error;

/// Errors produced while building or running a districting chain.
#[derive(Debug, Error)]
pub enum Error {
    /// The dual graph is malformed (asymmetric, self-loops, out-of-range ids) or disconnected.
    #[error("invalid graph: {0}")]
    InvalidGraph(String),

    /// An assignment or flip references a node that is not part of the graph.
    #[error("unknown node '{0}'")]
    UnknownNode(String),

    /// A node to district assignment is incomplete, out of range, or violates contiguity.
    #[error("invalid assignment: {0}")]
    InvalidAssignment(String),

    /// A chain or proposal parameter is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// An updater references a missing series, a missing dependency, or a duplicate name.
    #[error("invalid updater '{name}': {reason}")]
    InvalidUpdater { name: String, reason: String },

    /// The initial partition fails one of the chain's constraints.
    #[error("initial partition violates constraint '{0}'")]
    InvalidInitialState(String),

    /// No population-balanced cut was found for a district pair within the tree retry budget.
    /// Recoverable: the chain retries with a fresh pair.
    #[error("no balanced bipartition of districts {} and {} after {attempts} spanning trees", .pair.0, .pair.1)]
    BipartitionFailure { pair: (u32, u32), attempts: usize },

    /// The per-step proposal budget was exhausted before a valid proposal was found.
    #[error("proposal budget exhausted at step {step} after {attempts} attempts (last pair: {})", fmt_pair(.pair))]
    ProposalExhausted { step: usize, pair: Option<(u32, u32)>, attempts: usize },
}

pub type Result<T> = std::result::Result<T, Error>;

fn fmt_pair(pair: &Option<(u32, u32)>) -> String {
    match pair {
        Some((a, b)) => format!("{a}, {b}"),
        None => "none".to_string(),
    }
}
