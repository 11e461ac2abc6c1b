use std::path::PathBuf;

/// Recombination Markov chain ensembles for redistricting
#[derive(clap::Parser, Debug)]
#[command(name = "districtor", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Run a ReCom chain from an initial plan and summarize the ensemble
    Run(RunArgs),
}

#[derive(clap::Args, Debug)]
pub struct RunArgs {
    /// Dual graph in networkx JSON (adjacency or node-link layout)
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub graph: PathBuf,

    /// Node attribute holding the initial district of each node
    #[arg(short, long)]
    pub assignment: Option<String>,

    /// Initial plan as a CSV of node id, district (instead of --assignment)
    #[arg(long, value_hint = clap::ValueHint::FilePath, conflicts_with = "assignment")]
    pub plan: Option<PathBuf>,

    /// Chain configuration in JSON; flags override its values
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Node attribute holding total population [default: TOTPOP]
    #[arg(long)]
    pub pop_col: Option<String>,

    /// Sub-population attribute to tally per district (repeatable)
    #[arg(long = "tally")]
    pub tallies: Vec<String>,

    /// Two-party election as DEM,REP vote attributes
    #[arg(long, value_delimiter = ',', num_args = 2)]
    pub election: Vec<String>,

    /// Number of districts [default: number of districts in the initial plan]
    #[arg(short, long)]
    pub districts: Option<u32>,

    /// Population tolerance as a fraction of the ideal [default: 0.02]
    #[arg(short, long)]
    pub epsilon: Option<f64>,

    /// Spanning trees drawn per district pair [default: 1]
    #[arg(long)]
    pub node_repeats: Option<usize>,

    /// Proposals tried per step before giving up [default: 100]
    #[arg(long)]
    pub max_attempts: Option<usize>,

    /// Plans to emit, including the initial plan [default: 1000]
    #[arg(short, long)]
    pub steps: Option<usize>,

    /// Random seed [default: 0]
    #[arg(long)]
    pub seed: Option<u64>,

    /// Output report file, defaults to stdout
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,
}
