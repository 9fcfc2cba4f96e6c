//! GA population: initialization, ranking, checkpointing and evolution.

use super::config::GaConfig;
use super::selection::Selection;
use super::types::Individual;
use crate::agent::{rank_descending, Agent};
use crate::error::OptimizerError;
use crate::optimizer::SearchMethod;
use crate::random::{clamp_unit, gaussian_in_unit};
use rand::Rng;

/// Draws per child before a rejected child rolls the generation back.
const CHILD_ATTEMPTS: usize = 8;

/// Fixed-size collection of [`Individual`]s.
///
/// The population is evolved in place one generation at a time. Before
/// each evolution the ranked generation is stored as a checkpoint so a
/// generation that violates a constraint can be rolled back.
#[derive(Debug, Clone)]
pub struct Population {
    individuals: Vec<Individual>,
    checkpoint: Option<Vec<Individual>>,
    selection: Selection,
}

impl Population {
    /// Creates a population of `size` individuals with `dimensions` genes.
    ///
    /// Individual 0 (the first-born) takes `seed` when given. With
    /// [`SearchMethod::Global`] every other gene is uniform in `[0, 1)`;
    /// with [`SearchMethod::Local`] the remaining individuals are scattered
    /// around the first-born with Gaussian noise of the given radius.
    pub fn new<R: Rng>(
        size: usize,
        dimensions: usize,
        selection: Selection,
        seed: Option<&[f64]>,
        method: SearchMethod,
        rng: &mut R,
    ) -> Self {
        let mut individuals = Vec::with_capacity(size);
        let first = match seed {
            Some(genes) => Individual::new(genes.to_vec()),
            None => Individual::random(dimensions, rng),
        };
        individuals.push(first);

        for _ in 1..size {
            let ind = match method {
                SearchMethod::Global => Individual::random(dimensions, rng),
                SearchMethod::Local { radius } => Individual::new(
                    individuals[0]
                        .genes()
                        .iter()
                        .map(|&g| gaussian_in_unit(g, radius, rng))
                        .collect(),
                ),
            };
            individuals.push(ind);
        }

        Self {
            individuals,
            checkpoint: None,
            selection,
        }
    }

    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    pub fn individual(&self, index: usize) -> Option<&Individual> {
        self.individuals.get(index)
    }

    /// Stores the fitness of individual `index`.
    pub fn set_fitness(&mut self, index: usize, fitness: f64) -> Result<(), OptimizerError> {
        let size = self.len();
        self.individuals
            .get_mut(index)
            .ok_or(OptimizerError::IndexOutOfRange { index, size })?
            .set_fitness(fitness)
    }

    /// Marks every individual unevaluated.
    pub fn clear_fitness(&mut self) {
        self.individuals.iter_mut().for_each(Individual::clear_fitness);
    }

    /// Sorts the population fittest first.
    ///
    /// Fails if any individual is unevaluated.
    pub fn rank(&mut self) -> Result<(), OptimizerError> {
        rank_descending(&mut self.individuals)
    }

    /// Ranks the population with every individual accepted by `feasible`
    /// ahead of every rejected one, fittest first within each group.
    /// Returns the number of accepted individuals.
    pub fn rank_feasible_first(
        &mut self,
        feasible: impl Fn(&[f64]) -> bool,
    ) -> Result<usize, OptimizerError> {
        self.rank()?;
        // stable sort keeps the fitness order inside each group
        self.individuals.sort_by_cached_key(|ind| !feasible(ind.genes()));
        Ok(self
            .individuals
            .iter()
            .position(|ind| !feasible(ind.genes()))
            .unwrap_or(self.individuals.len()))
    }

    /// Stores the current individuals for a later [`restore_checkpoint`].
    ///
    /// [`restore_checkpoint`]: Population::restore_checkpoint
    pub fn save_checkpoint(&mut self) {
        self.checkpoint = Some(self.individuals.clone());
    }

    pub fn checkpoint(&self) -> Option<&[Individual]> {
        self.checkpoint.as_deref()
    }

    /// Replaces the individuals with the last checkpoint.
    ///
    /// Returns `false` if no checkpoint was saved.
    pub fn restore_checkpoint(&mut self) -> bool {
        match &self.checkpoint {
            Some(saved) => {
                self.individuals.clone_from(saved);
                true
            }
            None => false,
        }
    }

    /// Produces the next generation in place from a ranked population.
    ///
    /// The first `config.survivor_count()` individuals are kept unchanged
    /// (with their fitness). Every remaining slot is refilled with a child
    /// of two parents chosen among the first `parents` survivors. With
    /// probability `crossover_rate` the child blends its parents gene by
    /// gene (`beta * a + (1 - beta) * b`, `beta` uniform); otherwise it is
    /// the fitter parent jittered by a Gaussian as wide as the parents'
    /// spread in that gene, so it never duplicates a survivor while the
    /// parents still disagree.
    ///
    /// A child rejected by `accept` is redrawn from fresh parents with
    /// mutation applied. After a fixed number of draws the slot is given up
    /// and returned; later slots are left untouched. Children are
    /// unevaluated.
    pub fn evolve<R: Rng>(
        &mut self,
        config: &GaConfig,
        parents: usize,
        accept: impl Fn(&[f64]) -> bool,
        rng: &mut R,
    ) -> Result<Option<usize>, OptimizerError> {
        if let Some(index) = self.individuals.iter().position(|i| !i.is_evaluated()) {
            return Err(OptimizerError::Unevaluated { index });
        }

        let n = self.len();
        let survivors = config.survivor_count().clamp(1, n);
        let parents = parents.clamp(1, survivors);
        let pool: Vec<f64> = self.individuals[..parents]
            .iter()
            .filter_map(Agent::fitness)
            .collect();
        let spread = spread(&self.individuals[..parents]);

        for slot in survivors..n {
            let mut child = self.breed(&pool, &spread, config.crossover_rate, rng);
            let mut draws = 1;
            while !accept(child.as_slice()) {
                if draws == CHILD_ATTEMPTS {
                    return Ok(Some(slot));
                }
                child = self.breed(&pool, &spread, config.crossover_rate, rng);
                mutate_genes(&mut child, config.mutation_rate, rng);
                draws += 1;
            }
            self.individuals[slot] = Individual::new(child);
        }
        Ok(None)
    }

    fn breed<R: Rng>(
        &self,
        pool: &[f64],
        spread: &[f64],
        crossover_rate: f64,
        rng: &mut R,
    ) -> Vec<f64> {
        let mut a = self.selection.select(pool, rng);
        let mut b = self.selection.select(pool, rng);
        if pool.len() > 1 {
            // a few redraws to avoid selfing
            for _ in 0..3 {
                if a != b {
                    break;
                }
                b = self.selection.select(pool, rng);
            }
        }
        if b < a {
            std::mem::swap(&mut a, &mut b);
        }

        let fitter = self.individuals[a].genes();
        if rng.random_range(0.0..1.0) < crossover_rate {
            fitter
                .iter()
                .zip(self.individuals[b].genes())
                .map(|(&x, &y)| {
                    let beta: f64 = rng.random_range(0.0..1.0);
                    clamp_unit(beta * x + (1.0 - beta) * y)
                })
                .collect()
        } else {
            fitter
                .iter()
                .zip(spread)
                .map(|(&g, &width)| gaussian_in_unit(g, width, rng))
                .collect()
        }
    }

    /// Redraws each gene uniformly with probability `mutation_rate`.
    ///
    /// Individual 0 is left untouched so the fittest survivor of a ranked
    /// population is never lost. Mutated individuals become unevaluated.
    pub fn mutate<R: Rng>(&mut self, mutation_rate: f64, rng: &mut R) {
        if mutation_rate <= 0.0 {
            return;
        }
        for ind in self.individuals.iter_mut().skip(1) {
            for i in 0..ind.genes().len() {
                if rng.random_range(0.0..1.0) < mutation_rate {
                    ind.set_gene(i, rng.random_range(0.0..1.0));
                }
            }
        }
    }
}

/// Population standard deviation of each gene.
fn spread(individuals: &[Individual]) -> Vec<f64> {
    let n = individuals.len() as f64;
    let dimensions = individuals.first().map_or(0, |i| i.genes().len());
    (0..dimensions)
        .map(|d| {
            let mean = individuals.iter().map(|i| i.gene(d)).sum::<f64>() / n;
            let variance = individuals
                .iter()
                .map(|i| (i.gene(d) - mean).powi(2))
                .sum::<f64>()
                / n;
            variance.sqrt()
        })
        .collect()
}

fn mutate_genes<R: Rng>(genes: &mut [f64], mutation_rate: f64, rng: &mut R) {
    if mutation_rate <= 0.0 {
        return;
    }
    for g in genes {
        if rng.random_range(0.0..1.0) < mutation_rate {
            *g = rng.random_range(0.0..1.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;

    fn evaluated(pop: &mut Population, f: impl Fn(&[f64]) -> f64) {
        for i in 0..pop.len() {
            let fit = f(pop.individuals()[i].genes());
            pop.set_fitness(i, fit).unwrap();
        }
    }

    #[test]
    fn test_first_born_is_seed() {
        let mut rng = create_rng(3);
        let pop = Population::new(
            8,
            2,
            Selection::Roulette,
            Some(&[0.25, 0.75]),
            SearchMethod::Global,
            &mut rng,
        );
        assert_eq!(pop.len(), 8);
        assert_eq!(pop.individuals()[0].genes(), &[0.25, 0.75]);
        for ind in pop.individuals() {
            assert!(ind.genes().iter().all(|g| (0.0..1.0).contains(g)));
        }
    }

    #[test]
    fn test_local_search_concentrates_near_seed() {
        let mut rng = create_rng(3);
        let pop = Population::new(
            50,
            1,
            Selection::Roulette,
            Some(&[0.5]),
            SearchMethod::Local { radius: 0.01 },
            &mut rng,
        );
        for ind in pop.individuals() {
            assert!((ind.gene(0) - 0.5).abs() < 0.1, "gene {}", ind.gene(0));
        }
    }

    #[test]
    fn test_rank_requires_evaluation() {
        let mut rng = create_rng(3);
        let mut pop = Population::new(4, 1, Selection::Rank, None, SearchMethod::Global, &mut rng);
        pop.set_fitness(0, 1.0).unwrap();
        assert!(matches!(pop.rank(), Err(OptimizerError::Unevaluated { .. })));
    }

    #[test]
    fn test_set_fitness_out_of_range() {
        let mut rng = create_rng(3);
        let mut pop = Population::new(4, 1, Selection::Rank, None, SearchMethod::Global, &mut rng);
        assert_eq!(
            pop.set_fitness(4, 1.0),
            Err(OptimizerError::IndexOutOfRange { index: 4, size: 4 })
        );
    }

    fn config(size: usize, crossover_rate: f64) -> GaConfig {
        GaConfig::default()
            .with_population_size(size)
            .with_crossover_rate(crossover_rate)
    }

    fn ranked(size: usize, dims: usize, seed: u64) -> Population {
        let mut rng = create_rng(seed);
        let mut pop = Population::new(size, dims, Selection::Roulette, None, SearchMethod::Global, &mut rng);
        evaluated(&mut pop, |g| g.iter().sum());
        pop.rank().unwrap();
        pop
    }

    #[test]
    fn test_evolve_keeps_survivors_and_size() {
        let mut rng = create_rng(11);
        let mut pop = ranked(10, 3, 11);
        let top: Vec<Individual> = pop.individuals()[..5].to_vec();

        let rejected = pop.evolve(&config(10, 0.9), 5, |_| true, &mut rng).unwrap();

        assert_eq!(rejected, None);
        assert_eq!(pop.len(), 10);
        assert_eq!(&pop.individuals()[..5], top.as_slice());
        for child in &pop.individuals()[5..] {
            assert!(!child.is_evaluated());
            assert!(child.genes().iter().all(|g| (0.0..1.0).contains(g)));
        }
    }

    #[test]
    fn test_evolve_requires_evaluation() {
        let mut rng = create_rng(11);
        let mut pop = Population::new(4, 1, Selection::Rank, None, SearchMethod::Global, &mut rng);
        pop.set_fitness(0, 1.0).unwrap();
        assert_eq!(
            pop.evolve(&config(4, 0.5), 2, |_| true, &mut rng),
            Err(OptimizerError::Unevaluated { index: 1 })
        );
    }

    #[test]
    fn test_children_lie_between_parents() {
        let mut rng = create_rng(5);
        let mut pop = Population::new(6, 1, Selection::Rank, None, SearchMethod::Global, &mut rng);
        evaluated(&mut pop, |g| g[0]);
        pop.rank().unwrap();
        let lo = pop.individuals()[..3].iter().map(|i| i.gene(0)).fold(1.0, f64::min);
        let hi = pop.individuals()[..3].iter().map(|i| i.gene(0)).fold(0.0, f64::max);

        pop.evolve(&config(6, 1.0), 3, |_| true, &mut rng).unwrap();

        for child in &pop.individuals()[3..] {
            assert!(child.gene(0) >= lo - 1e-12 && child.gene(0) <= hi + 1e-12);
        }
    }

    #[test]
    fn test_copied_children_are_not_clones() {
        let mut rng = create_rng(21);
        let mut pop = ranked(12, 2, 21);
        let survivors: Vec<Individual> = pop.individuals()[..6].to_vec();

        pop.evolve(&config(12, 0.0), 6, |_| true, &mut rng).unwrap();

        for child in &pop.individuals()[6..] {
            assert!(survivors.iter().all(|s| s.genes() != child.genes()));
            assert!(child.genes().iter().all(|g| (0.0..1.0).contains(g)));
        }
    }

    #[test]
    fn test_single_parent_is_copied_exactly() {
        let mut rng = create_rng(4);
        let mut pop = ranked(8, 3, 4);
        let parent = pop.individuals()[0].genes().to_vec();

        pop.evolve(&config(8, 0.0), 1, |_| true, &mut rng).unwrap();

        for child in &pop.individuals()[4..] {
            assert_eq!(child.genes(), parent.as_slice());
        }
    }

    #[test]
    fn test_rejected_child_is_redrawn() {
        let mut rng = create_rng(6);
        let mut pop = ranked(10, 1, 6);
        // half of the unit interval is acceptable
        let rejected = pop
            .evolve(&config(10, 0.5).with_mutation_rate(1.0), 5, |g| g[0] < 0.5, &mut rng)
            .unwrap();
        match rejected {
            None => assert!(pop.individuals()[5..].iter().all(|c| c.gene(0) < 0.5)),
            Some(slot) => assert!(slot >= 5),
        }
    }

    #[test]
    fn test_hopeless_child_gives_up_after_fixed_draws() {
        let mut rng = create_rng(6);
        let mut pop = ranked(10, 2, 6);
        let before = pop.individuals().to_vec();
        let draws = std::cell::Cell::new(0);

        let rejected = pop
            .evolve(
                &config(10, 0.5),
                5,
                |_| {
                    draws.set(draws.get() + 1);
                    false
                },
                &mut rng,
            )
            .unwrap();

        assert_eq!(rejected, Some(5));
        assert_eq!(draws.get(), CHILD_ATTEMPTS);
        assert_eq!(pop.individuals(), before.as_slice());
    }

    #[test]
    fn test_rank_feasible_first() {
        let mut pop = ranked(10, 2, 13);
        let feasible = |g: &[f64]| g[0] < 0.5;
        let count = pop.individuals().iter().filter(|i| feasible(i.genes())).count();

        assert_eq!(pop.rank_feasible_first(feasible).unwrap(), count);

        let (head, tail) = pop.individuals().split_at(count);
        assert!(head.iter().all(|i| feasible(i.genes())));
        assert!(tail.iter().all(|i| !feasible(i.genes())));
        for group in [head, tail] {
            assert!(group.windows(2).all(|w| w[0].fitness() >= w[1].fitness()));
        }
    }

    #[test]
    fn test_checkpoint_restore_is_exact() {
        let mut rng = create_rng(9);
        let mut pop = Population::new(8, 2, Selection::Roulette, None, SearchMethod::Global, &mut rng);
        assert!(!pop.restore_checkpoint());

        evaluated(&mut pop, |g| -g[0]);
        pop.rank().unwrap();
        pop.save_checkpoint();
        let before = pop.individuals().to_vec();

        pop.evolve(&config(8, 1.0), 2, |_| true, &mut rng).unwrap();
        pop.mutate(1.0, &mut rng);
        assert_ne!(pop.individuals(), before.as_slice());

        assert!(pop.restore_checkpoint());
        assert_eq!(pop.individuals(), before.as_slice());
    }

    #[test]
    fn test_mutate_spares_first() {
        let mut rng = create_rng(9);
        let mut pop = Population::new(5, 4, Selection::Roulette, None, SearchMethod::Global, &mut rng);
        let first = pop.individuals()[0].clone();
        pop.mutate(1.0, &mut rng);
        assert_eq!(pop.individuals()[0], first);
        for ind in pop.individuals() {
            assert!(ind.genes().iter().all(|g| (0.0..1.0).contains(g)));
        }
    }

    #[test]
    fn test_mutate_zero_rate_is_noop() {
        let mut rng = create_rng(9);
        let mut pop = Population::new(5, 4, Selection::Roulette, None, SearchMethod::Global, &mut rng);
        let before = pop.individuals().to_vec();
        pop.mutate(0.0, &mut rng);
        assert_eq!(pop.individuals(), before.as_slice());
    }
}
