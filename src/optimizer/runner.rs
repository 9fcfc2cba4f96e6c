//! The stepwise optimizer engine.

use std::fmt;

use rand::rngs::StdRng;
use tracing::instrument;

use super::config::{OptimizerConfig, Strategy};
use super::convergence::is_nominally_converged;
use super::history::{AgentRecord, History};
use crate::agent::{check_reported, Agent};
use crate::error::{ConfigError, OptimizerError};
use crate::ga::{GaConfig, Population};
use crate::problem::{Constraint, ProblemEncoding};
use crate::pso::Swarm;
use crate::random::{clamp_unit, rng_from};

#[derive(Debug, Clone)]
enum Engine {
    Ga {
        population: Population,
        config: GaConfig,
    },
    Pso(Swarm),
}

impl Engine {
    fn len(&self) -> usize {
        match self {
            Engine::Ga { population, .. } => population.len(),
            Engine::Pso(swarm) => swarm.len(),
        }
    }

    fn coordinates(&self, index: usize) -> Option<&[f64]> {
        match self {
            Engine::Ga { population, .. } => population.individual(index).map(|i| i.coordinates()),
            Engine::Pso(swarm) => swarm.particle(index).map(|p| p.coordinates()),
        }
    }

    fn set_fitness(&mut self, index: usize, fitness: f64) -> Result<AgentRecord, OptimizerError> {
        match self {
            Engine::Ga { population, .. } => {
                population.set_fitness(index, fitness)?;
                Ok(AgentRecord {
                    coordinates: population.individuals()[index].genes().to_vec(),
                    fitness,
                })
            }
            Engine::Pso(swarm) => {
                swarm.set_fitness(index, fitness)?;
                Ok(AgentRecord {
                    coordinates: swarm.particles()[index].position().to_vec(),
                    fitness,
                })
            }
        }
    }

    fn reset(&mut self) {
        match self {
            Engine::Ga { population, .. } => population.clear_fitness(),
            Engine::Pso(swarm) => swarm.reset(),
        }
    }
}

fn records<A: Agent>(agents: &[A]) -> Vec<AgentRecord> {
    agents.iter().filter_map(AgentRecord::of).collect()
}

/// `true` when the decoded `genes` pass every constraint.
fn satisfies<P: ProblemEncoding>(
    encoding: &P,
    constraints: &[Constraint<P::Params>],
    genes: &[f64],
) -> bool {
    if constraints.is_empty() {
        return true;
    }
    let params = encoding.decode(genes);
    constraints.iter().all(|c| c(&params))
}

/// Black-box optimizer driven one fitness report at a time.
///
/// The caller owns the evaluation loop: it asks for an agent's decoded
/// parameters with [`translate`], runs its own (possibly slow, multi-frame)
/// simulation, and reports the result with [`record_fitness`]. Agents are
/// reported in round-robin order; once every agent of a generation (GA) or
/// step (PSO) has reported, the optimizer ranks them, records history,
/// tests convergence and produces the next set of agents.
///
/// Higher fitness is better.
///
/// # Examples
///
/// ```
/// use u_stepopt::ga::GaConfig;
/// use u_stepopt::optimizer::{Optimizer, OptimizerConfig, Strategy};
/// use u_stepopt::problem::VectorEncoding;
/// use u_stepopt::space::ParameterSpace;
///
/// let encoding = VectorEncoding::new(ParameterSpace::uniform("x", 1, 0.0, 1.0).unwrap());
/// let mut opt = Optimizer::new(
///     encoding,
///     Strategy::Ga(GaConfig::default().with_population_size(10)),
///     OptimizerConfig::default().with_seed(7),
/// )
/// .unwrap();
///
/// opt.start_evolving();
/// let mut index = 0;
/// while !opt.should_terminate() {
///     let x = opt.translate(index).unwrap()[0];
///     if opt.record_fitness(index, -(x - 0.7).powi(2)).unwrap() {
///         break;
///     }
///     index = (index + 1) % opt.size();
/// }
/// assert!(opt.apply_fittest().is_some());
/// ```
///
/// [`translate`]: Optimizer::translate
/// [`record_fitness`]: Optimizer::record_fitness
pub struct Optimizer<P: ProblemEncoding> {
    encoding: P,
    config: OptimizerConfig,
    strategy: Strategy,
    engine: Engine,
    constraints: Vec<Constraint<P::Params>>,
    rng: StdRng,
    evaluations: usize,
    generation: usize,
    started: bool,
    converged: bool,
    rollbacks: usize,
    best: Option<AgentRecord>,
    history: History,
}

impl<P: ProblemEncoding> Optimizer<P> {
    /// Creates an optimizer with a random first agent.
    ///
    /// Every configuration value is validated before any agent is created.
    #[instrument(level = "debug", skip_all, fields(strategy = strategy.name(), size = strategy.size()))]
    pub fn new(encoding: P, strategy: Strategy, config: OptimizerConfig) -> Result<Self, ConfigError> {
        Self::build(encoding, strategy, config, None)
    }

    /// Creates an optimizer whose first agent encodes `existing`, so the run
    /// never ends up worse than the caller's current design.
    #[instrument(level = "debug", skip_all, fields(strategy = strategy.name(), size = strategy.size()))]
    pub fn with_existing_design(
        encoding: P,
        strategy: Strategy,
        config: OptimizerConfig,
        existing: &P::Design,
    ) -> Result<Self, ConfigError> {
        encoding.space().validate()?;
        let seed = encoding.seed_first_agent(existing)?;
        encoding.space().check_len(seed.len())?;
        let seed: Vec<f64> = seed.into_iter().map(clamp_unit).collect();
        Self::build(encoding, strategy, config, Some(seed))
    }

    fn build(
        encoding: P,
        strategy: Strategy,
        config: OptimizerConfig,
        seed: Option<Vec<f64>>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        strategy.validate()?;
        encoding.space().validate()?;

        let dimensions = encoding.dimension_count();
        let mut rng = rng_from(config.seed);
        let engine = match &strategy {
            Strategy::Ga(ga) => Engine::Ga {
                population: Population::new(
                    ga.population_size,
                    dimensions,
                    ga.selection,
                    seed.as_deref(),
                    config.search_method,
                    &mut rng,
                ),
                config: ga.clone(),
            },
            Strategy::Pso(pso) => Engine::Pso(Swarm::new(
                pso,
                dimensions,
                seed.as_deref(),
                config.search_method,
                &mut rng,
            )),
        };
        tracing::debug!(dimensions, seeded = seed.is_some(), "optimizer created");

        Ok(Self {
            history: History::new(config.max_generations),
            encoding,
            config,
            strategy,
            engine,
            constraints: Vec::new(),
            rng,
            evaluations: 0,
            generation: 0,
            started: false,
            converged: false,
            rollbacks: 0,
            best: None,
        })
    }

    /// Adds a constraint on decoded parameters (builder form).
    pub fn with_constraint(mut self, constraint: Constraint<P::Params>) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Adds a constraint on decoded parameters.
    ///
    /// The GA ranks individuals that break a constraint below every one
    /// that satisfies it, never breeds from them while a satisfying
    /// survivor exists, and redraws children that break one. A generation
    /// is rolled back to its checkpoint when some child cannot be repaired.
    /// Only satisfying individuals become the best so far. The swarm never
    /// discards a step and ignores constraints.
    pub fn add_constraint(&mut self, constraint: Constraint<P::Params>) {
        self.constraints.push(constraint);
    }

    /// Starts a run: resets counters, history, the converged flag and every
    /// agent's fitness. Must precede the first [`record_fitness`].
    ///
    /// [`record_fitness`]: Optimizer::record_fitness
    pub fn start_evolving(&mut self) {
        self.engine.reset();
        self.history.clear();
        self.evaluations = 0;
        self.generation = 0;
        self.rollbacks = 0;
        self.converged = false;
        self.best = None;
        self.started = true;

        if matches!(self.engine, Engine::Pso(_)) && !self.constraints.is_empty() {
            tracing::warn!(
                message = "constraints are not checked by the particle swarm",
                count = self.constraints.len()
            );
        }
        tracing::info!(
            strategy = self.strategy.name(),
            size = self.size(),
            max_generations = self.config.max_generations,
            "evolution started"
        );
    }

    /// Decoded parameters of agent `index` in the generation in flight.
    pub fn translate(&self, index: usize) -> Result<P::Params, OptimizerError> {
        let coordinates = self
            .engine
            .coordinates(index)
            .ok_or(OptimizerError::IndexOutOfRange {
                index,
                size: self.size(),
            })?;
        Ok(self.encoding.decode(coordinates))
    }

    /// Decoded parameters of the fittest agent evaluated so far this run.
    pub fn translate_best(&self) -> Option<P::Params> {
        self.best
            .as_ref()
            .map(|b| self.encoding.decode(&b.coordinates))
    }

    /// Reports the fitness of agent `index` and returns the converged flag.
    ///
    /// When this is the last report of a generation (GA) or step (PSO) the
    /// optimizer advances before returning.
    ///
    /// # Errors
    ///
    /// - [`OptimizerError::NotStarted`] before [`start_evolving`].
    /// - [`OptimizerError::UnevaluatedFitness`] if `fitness` is NaN.
    /// - [`OptimizerError::IndexOutOfRange`] for a bad `index`.
    /// - [`OptimizerError::Unevaluated`] if a generation ends while some
    ///   agent never reported; report that agent and the generation ends
    ///   on the next call.
    ///
    /// [`start_evolving`]: Optimizer::start_evolving
    pub fn record_fitness(&mut self, index: usize, fitness: f64) -> Result<bool, OptimizerError> {
        if !self.started {
            return Err(OptimizerError::NotStarted);
        }
        let fitness = check_reported(fitness)?;
        let record = self.engine.set_fitness(index, fitness)?;

        if self.evaluations == 0 {
            self.history.record_best(0, record.clone());
        }
        // the swarm does not check constraints
        let admissible = matches!(self.engine, Engine::Pso(_))
            || satisfies(&self.encoding, &self.constraints, &record.coordinates);
        if admissible && self.best.as_ref().is_none_or(|b| record.fitness > b.fitness) {
            self.best = Some(record);
        }

        let size = self.engine.len();
        if self.evaluations % size == size - 1 {
            self.end_generation()?;
        }
        self.evaluations += 1;
        Ok(self.converged)
    }

    fn end_generation(&mut self) -> Result<(), OptimizerError> {
        let Self {
            ref encoding,
            ref config,
            ref constraints,
            ref mut engine,
            ref mut rng,
            ref mut history,
            ref mut generation,
            ref mut converged,
            ref mut rollbacks,
            ..
        } = *self;
        let current = *generation;
        let threshold = config.convergence_threshold;

        match engine {
            Engine::Ga {
                population,
                config: ga,
            } => {
                let feasible = |genes: &[f64]| satisfies(encoding, constraints, genes);
                let feasible_count = population.rank_feasible_first(feasible)?;
                history.record_population(current, records(population.individuals()));
                population.save_checkpoint();
                let settled = is_nominally_converged(population.individuals(), threshold);

                let rejected = population.evolve(ga, feasible_count, feasible, rng)?;
                if let Some(record) = population
                    .individuals()
                    .first()
                    .filter(|top| feasible(top.genes()))
                    .and_then(AgentRecord::of)
                {
                    history.record_best(current + 1, record);
                }

                if let Some(slot) = rejected {
                    population.restore_checkpoint();
                    *rollbacks += 1;
                    tracing::warn!(
                        message = "no child satisfies the constraints, generation rolled back",
                        generation = current,
                        slot
                    );
                } else {
                    *converged = settled;
                    if !settled && config.search_method.is_global() {
                        population.mutate(ga.mutation_rate, rng);
                    }
                }
            }
            Engine::Pso(swarm) => {
                swarm.rank()?;
                history.record_population(current, records(swarm.particles()));
                if let (Some(position), Some(fitness)) =
                    (swarm.global_best(), swarm.global_best_fitness())
                {
                    history.record_best(
                        current + 1,
                        AgentRecord {
                            coordinates: position.to_vec(),
                            fitness,
                        },
                    );
                }
                *converged = is_nominally_converged(swarm.particles(), threshold);
                if !*converged {
                    swarm.advance(rng);
                }
            }
        }

        *generation += 1;
        tracing::debug!(
            generation = current,
            best = ?history.best(current + 1).map(|r| r.fitness),
            converged = *converged,
            "generation complete"
        );
        if *converged {
            tracing::info!(generation = current, "nominal convergence reached");
        }
        Ok(())
    }

    /// Normalized coordinates of the fittest agent evaluated so far this run,
    /// or `None` before the first report.
    pub fn apply_fittest(&self) -> Option<&[f64]> {
        self.best.as_ref().map(|b| b.coordinates.as_slice())
    }

    /// Coordinates and fitness of the fittest agent evaluated this run.
    pub fn fittest(&self) -> Option<&AgentRecord> {
        self.best.as_ref()
    }

    /// `true` once the generation counter reaches the configured maximum.
    pub fn should_terminate(&self) -> bool {
        self.generation >= self.config.max_generations
    }

    /// Best-agent history decoded to domain parameters, baseline first.
    pub fn decoded_best_history(&self) -> Vec<P::Params> {
        self.history
            .best_records()
            .map(|r| self.encoding.decode(&r.coordinates))
            .collect()
    }

    /// Every agent of generation `generation` decoded to domain parameters.
    pub fn decoded_population(&self, generation: usize) -> Option<Vec<P::Params>> {
        self.history.population(generation).map(|agents| {
            agents
                .iter()
                .map(|r| self.encoding.decode(&r.coordinates))
                .collect()
        })
    }

    pub fn is_converged(&self) -> bool {
        self.converged
    }

    /// Completed generations (GA) or steps (PSO) this run.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Fitness reports accepted this run.
    pub fn evaluations(&self) -> usize {
        self.evaluations
    }

    /// Generations rolled back because a child could not be made to
    /// satisfy the constraints.
    pub fn rollbacks(&self) -> usize {
        self.rollbacks
    }

    /// Agents per generation or step.
    pub fn size(&self) -> usize {
        self.engine.len()
    }

    pub fn dimension_count(&self) -> usize {
        self.encoding.dimension_count()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn encoding(&self) -> &P {
        &self.encoding
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    pub fn strategy(&self) -> &Strategy {
        &self.strategy
    }

    /// The GA population, when running the genetic algorithm.
    pub fn population(&self) -> Option<&Population> {
        match &self.engine {
            Engine::Ga { population, .. } => Some(population),
            Engine::Pso(_) => None,
        }
    }

    /// The swarm, when running particle swarm optimization.
    pub fn swarm(&self) -> Option<&Swarm> {
        match &self.engine {
            Engine::Pso(swarm) => Some(swarm),
            Engine::Ga { .. } => None,
        }
    }
}

impl<P: ProblemEncoding + fmt::Debug> fmt::Debug for Optimizer<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Optimizer")
            .field("encoding", &self.encoding)
            .field("config", &self.config)
            .field("strategy", &self.strategy)
            .field("constraints", &self.constraints.len())
            .field("generation", &self.generation)
            .field("evaluations", &self.evaluations)
            .field("converged", &self.converged)
            .field("best", &self.best)
            .finish_non_exhaustive()
    }
}
