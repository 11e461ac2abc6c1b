use std::{iter::FusedIterator, sync::Arc};

use rand::{SeedableRng, rngs::StdRng};
use tracing::{debug, info, trace, warn};

use crate::{
    accept::{Acceptance, AlwaysAccept},
    chain::ChainConfig,
    constraints::{Validator, population_within},
    error::{Error, Result},
    partition::{Flip, Partition},
    recom::Recom,
    stats::Ensemble,
    updaters::{UpdaterRegistry, Values},
};

/// A partition together with its updater outputs.
#[derive(Clone, Debug)]
pub struct Plan {
    partition: Arc<Partition>,
    values: Arc<Values>,
}

impl Plan {
    pub fn new(partition: Partition, values: Values) -> Self {
        Self { partition: Arc::new(partition), values: Arc::new(values) }
    }

    #[inline] pub fn partition(&self) -> &Partition { &self.partition }

    #[inline] pub fn values(&self) -> &Values { &self.values }
}

/// One record of the chain's output.
#[derive(Clone, Debug)]
pub struct ChainStep {
    pub index: usize,
    pub plan: Plan,
    /// False when the acceptance rule kept the previous plan.
    pub accepted: bool,
}

/// Where the chain is within its current step.
///
/// Between calls to `next` a chain is `Idle`, `Done` or `Failed`. The other
/// phases only exist while a step is being produced and are reported in
/// `trace` logs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Proposing,
    Constraining,
    Accepted,
    Failed,
    Done,
}

/// A finite, single-pass recombination Markov chain.
///
/// Yields the initial plan as step 0 followed by one plan per transition until
/// `total_steps` plans have been produced. An error ends the sequence.
pub struct MarkovChain<A: Acceptance = AlwaysAccept> {
    config: ChainConfig,
    recom: Recom,
    registry: UpdaterRegistry,
    validator: Validator,
    accept: A,
    rng: StdRng,
    current: Plan,
    emitted: usize,
    phase: Phase,
}

impl<A: Acceptance> MarkovChain<A> {
    /// Validate the configuration, updaters, constraints and initial partition.
    ///
    /// Fails with `InvalidInitialState` naming the first constraint the
    /// initial partition violates. Every initial district must also lie within
    /// `pop_tolerance` of the ideal population, reported as `"population"`.
    pub fn new(
        config: ChainConfig,
        initial: Partition,
        registry: UpdaterRegistry,
        validator: Validator,
        accept: A,
    ) -> Result<Self> {
        config.validate()?;
        if initial.num_districts() != config.num_districts {
            return Err(Error::InvalidConfig(format!(
                "initial partition has {} districts, expected {}", initial.num_districts(), config.num_districts
            )))
        }
        validator.validate(&registry)?;

        let recom = Recom::new(config.recom_params(initial.graph())?);
        let params = recom.params();
        let column = initial.graph().node_weights().column_i64(&params.pop_series).ok_or_else(|| {
            Error::InvalidConfig(format!("population series '{}' is not an integer node series", params.pop_series))
        })?;
        for district in 0..initial.num_districts() {
            let pop: i64 = initial.nodes_in(district).iter().map(|&u| column[u]).sum();
            if !population_within(pop, params.ideal_pop, params.epsilon) {
                debug!(district, pop, ideal = params.ideal_pop, "initial district outside the population tolerance");
                return Err(Error::InvalidInitialState("population".into()))
            }
        }

        let values = registry.evaluate_full(&initial);
        if let Some(name) = validator.first_failing(&initial, &values) {
            return Err(Error::InvalidInitialState(name.to_string()))
        }

        let rng = StdRng::seed_from_u64(config.seed);
        let phase = if config.total_steps == 0 { Phase::Done } else { Phase::Idle };

        Ok(Self { config, recom, registry, validator, accept, rng, current: Plan::new(initial, values), emitted: 0, phase })
    }

    #[inline] pub fn phase(&self) -> Phase { self.phase }

    #[inline] pub fn config(&self) -> &ChainConfig { &self.config }

    /// The most recently emitted plan (the initial plan before any step).
    #[inline] pub fn current(&self) -> &Plan { &self.current }

    /// Number of plans emitted so far.
    #[inline] pub fn emitted(&self) -> usize { self.emitted }

    /// Drain the chain into `ensemble`, stopping at the first error.
    pub fn run_into(&mut self, ensemble: &mut Ensemble) -> Result<()> {
        for step in self.by_ref() {
            ensemble.record(&step?);
        }
        Ok(())
    }

    fn enter(&mut self, phase: Phase) {
        trace!(step = self.emitted, ?phase, "chain phase");
        self.phase = phase;
    }

    /// Finish a step: advance the counter and emit the current plan.
    fn emit(&mut self, accepted: bool) -> ChainStep {
        let step = ChainStep { index: self.emitted, plan: self.current.clone(), accepted };
        self.emitted += 1;
        self.phase = if self.emitted >= self.config.total_steps { Phase::Done } else { Phase::Idle };
        if self.phase == Phase::Done {
            info!(steps = self.emitted, "chain finished");
        }
        step
    }

    /// Propose, constrain and decide until one transition is produced or the
    /// attempt budget runs out.
    fn transition(&mut self) -> Result<ChainStep> {
        let step = self.emitted;
        let max_attempts = self.config.max_attempts;
        let mut last_pair = None;

        for attempt in 1..=max_attempts {
            if attempt == max_attempts / 2 + 1 && attempt > 1 {
                warn!(step, attempt, max_attempts, "step has used half of its proposal budget");
            }

            self.enter(Phase::Proposing);
            let proposal = match self.recom.propose(&self.current.partition, &mut self.rng) {
                Ok(proposal) => proposal,
                Err(Error::BipartitionFailure { pair, attempts }) => {
                    debug!(step, attempt, ?pair, trees = attempts, "bipartition failed, selecting a new pair");
                    last_pair = Some(pair);
                    continue
                }
                Err(err) => return Err(err),
            };
            last_pair = proposal.flip().map(Flip::pair);

            self.enter(Phase::Constraining);
            let values = self.registry.evaluate(&proposal, Some(&self.current.values));
            if let Some(constraint) = self.validator.first_failing(&proposal, &values) {
                debug!(step, attempt, pair = ?last_pair, constraint, "proposal rejected by constraint");
                continue
            }

            let proposed = Plan::new(proposal, values);
            let accepted = self.accept.decide(&self.current, &proposed, &mut self.rng);
            self.enter(Phase::Accepted);
            if accepted {
                self.current = proposed;
            } else {
                debug!(step, attempt, "proposal rejected by acceptance rule");
            }
            return Ok(self.emit(accepted))
        }

        Err(Error::ProposalExhausted { step, pair: last_pair, attempts: max_attempts })
    }
}

impl<A: Acceptance> Iterator for MarkovChain<A> {
    type Item = Result<ChainStep>;

    fn next(&mut self) -> Option<Self::Item> {
        if matches!(self.phase, Phase::Done | Phase::Failed) { return None }

        if self.emitted == 0 {
            info!(
                steps = self.config.total_steps,
                districts = self.config.num_districts,
                epsilon = self.config.pop_tolerance,
                seed = self.config.seed,
                "starting chain",
            );
            return Some(Ok(self.emit(true)))
        }

        match self.transition() {
            Ok(step) => Some(Ok(step)),
            Err(err) => {
                self.phase = Phase::Failed;
                Some(Err(err))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.phase {
            Phase::Done | Phase::Failed => (0, Some(0)),
            _ => (0, Some(self.config.total_steps - self.emitted)),
        }
    }
}

impl<A: Acceptance> FusedIterator for MarkovChain<A> {}
