use std::{fs, sync::Arc};

use anyhow::{Context, Result, bail};
use districtor::{
    AlwaysAccept, ChainConfig, Ensemble, MarkovChain, Updater, UpdaterRegistry, Validator, WithinPercentOfIdeal,
    io::{read_assignment_csv, read_dual_graph},
};
use tracing::info;

use crate::cli::{Cli, RunArgs};

const POPULATION: &str = "district population";

pub fn run(_cli: &Cli, args: &RunArgs) -> Result<()> {
    info!(path = %args.graph.display(), "loading dual graph");
    let (graph, from_column) = read_dual_graph(&args.graph, args.assignment.as_deref())?;
    let assignment = match (&args.plan, from_column) {
        (Some(path), _) => read_assignment_csv(path, &graph)?,
        (None, Some(assignment)) => assignment,
        (None, None) => bail!("[run] an initial plan is required: pass --assignment COLUMN or --plan FILE"),
    };
    info!(nodes = graph.node_count(), edges = graph.edge_count(), districts = assignment.num_districts(), "loaded graph");

    let config = chain_config(args, assignment.num_districts())?;
    let graph = Arc::new(graph);
    let partition = assignment.partition(graph.clone())?;

    let ideal_pop = config.ideal_pop_for(&graph)?;
    let registry = UpdaterRegistry::new(&graph, updaters(&config.pop_col, ideal_pop, &args.tallies, &args.election))?;
    let validator = Validator::new()
        .with(WithinPercentOfIdeal::new(POPULATION, ideal_pop, config.pop_tolerance));

    let mut chain = MarkovChain::new(config, partition, registry, validator, AlwaysAccept)?;
    let mut ensemble = Ensemble::new();
    chain.run_into(&mut ensemble)?;

    let report = serde_json::to_string_pretty(&ensemble.report())
        .context("[run] Failed to serialize report")?;
    match &args.output {
        Some(path) => {
            fs::write(path, report).with_context(|| format!("[run] Failed to write report: {}", path.display()))?;
            info!(path = %path.display(), "wrote report");
        }
        None => println!("{report}"),
    }

    Ok(())
}

/// Config file values (or defaults), overridden by command-line flags.
fn chain_config(args: &RunArgs, plan_districts: u32) -> Result<ChainConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("[run] Failed to read config: {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("[run] Failed to parse config: {}", path.display()))?
        }
        None => ChainConfig::new(plan_districts, "TOTPOP", 0.02, 1000),
    };

    if let Some(districts) = args.districts { config.num_districts = districts }
    if let Some(pop_col) = &args.pop_col { config.pop_col = pop_col.clone() }
    if let Some(epsilon) = args.epsilon { config.pop_tolerance = epsilon }
    if let Some(node_repeats) = args.node_repeats { config.node_repeats = node_repeats }
    if let Some(max_attempts) = args.max_attempts { config.max_attempts = max_attempts }
    if let Some(steps) = args.steps { config.total_steps = steps }
    if let Some(seed) = args.seed { config.seed = seed }

    config.validate()?;
    Ok(config)
}

/// Cut edges, population with its deviation from `ideal_pop`, the requested
/// tallies with their majority-district counts, and the election with its
/// districts-won count.
fn updaters(pop_col: &str, ideal_pop: f64, tallies: &[String], election: &[String]) -> Vec<(String, Updater)> {
    let mut updaters = vec![
        ("cut edges".to_string(), Updater::cut_edge_count()),
        (POPULATION.to_string(), Updater::tally(pop_col)),
        ("population deviation".to_string(), Updater::population_deviation(POPULATION, ideal_pop)),
    ];

    for group in tallies {
        let name = format!("district {group}");
        updaters.push((name.clone(), Updater::tally(group)));
        updaters.push((format!("{group} majority"), Updater::majority_districts(&name, POPULATION, 0.5)));
    }

    if let [party, opponent] = election {
        updaters.push((party.clone(), Updater::tally(party)));
        updaters.push((opponent.clone(), Updater::tally(opponent)));
        updaters.push((format!("{party} won"), Updater::districts_won(party, opponent)));
    }

    updaters
}
