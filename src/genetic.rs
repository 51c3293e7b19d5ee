//! Genetic optimizer for one day's stop order.
//!
//! Individuals are permutations of indices into the day's seed stops. Index
//! `0` and the last index are the anchors and never move; everything in
//! between is the gene sequence. Every individual that enters a population
//! has passed [`GeneticOptimizer::check_arrival_time`].
//!
//! One generation is rank → select (roulette + elitism) → ordered crossover
//! → inversion mutation. The loop runs `num_generations + 1` times and the
//! reported route is the best of the last population.

use rand::seq::SliceRandom;
use rand::Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::config::{GaParams, PlannerConfig};
use crate::error::{OptimizeError, SamplingStage};
use crate::haversine::DistanceMatrix;
use crate::hours::fits_window;
use crate::tour::{fitness_for, order_distance, Route, Stop};

/// One candidate ordering of a day's stops.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Individual {
    order: Vec<usize>,
}

impl Individual {
    pub fn new(order: Vec<usize>) -> Self {
        Self { order }
    }

    pub fn order(&self) -> &[usize] {
        &self.order
    }
}

/// Result of a full optimizer run.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizeOutcome {
    pub route: Route,
    pub distance: f64,
    pub generations_run: usize,
    /// Best distance of the initial population, then of every generation.
    pub best_distance_per_generation: Vec<f64>,
    pub params: GaParams,
}

/// Optimizer bound to one day's seed stops.
#[derive(Debug, Clone)]
pub struct GeneticOptimizer<'a> {
    stops: &'a [Stop],
    matrix: DistanceMatrix,
    params: GaParams,
    config: &'a PlannerConfig,
}

impl<'a> GeneticOptimizer<'a> {
    /// Optimizer using the configured parameter row for this problem size.
    pub fn new(stops: &'a [Stop], config: &'a PlannerConfig) -> Self {
        let interior = stops.len().saturating_sub(2);
        let params = config.params.for_interior_count(interior);
        Self::build(stops, config, params)
    }

    /// Optimizer with explicit parameters.
    pub fn with_params(
        stops: &'a [Stop],
        config: &'a PlannerConfig,
        params: GaParams,
    ) -> Result<Self, OptimizeError> {
        params.validate()?;
        Ok(Self::build(stops, config, params))
    }

    fn build(stops: &'a [Stop], config: &'a PlannerConfig, params: GaParams) -> Self {
        let points: Vec<(f64, f64)> = stops.iter().map(Stop::coordinates).collect();
        Self {
            stops,
            matrix: DistanceMatrix::for_points(&points),
            params,
            config,
        }
    }

    pub fn params(&self) -> GaParams {
        self.params
    }

    pub fn interior_count(&self) -> usize {
        self.stops.len().saturating_sub(2)
    }

    /// The seed's own order, `0..len`.
    pub fn seed_order(&self) -> Vec<usize> {
        (0..self.stops.len()).collect()
    }

    /// Whether every interior stop is open for its full stay in this order
    /// and departs by the end of the day.
    ///
    /// The walk starts at the day start and advances one transit allowance
    /// before each arrival and one stay after it. Windows are the ones each
    /// stop carried from seeding, not a fresh catalog lookup.
    pub fn check_arrival_time(&self, order: &[usize]) -> bool {
        if order.len() < 3 {
            return true;
        }
        let stay = self.config.stay_time;
        let mut clock = self.config.start_time;
        for &index in &order[1..order.len() - 1] {
            clock += self.config.transit_allowance;
            let Some(stop) = self.stops.get(index) else {
                return false;
            };
            if !fits_window(clock, &stop.open_times, stay) || !self.config.departs_by_end(clock) {
                return false;
            }
            clock += stay;
        }
        true
    }

    pub fn distance(&self, order: &[usize]) -> f64 {
        order_distance(order, &self.matrix, self.config.include_return_leg)
    }

    pub fn fitness(&self, order: &[usize]) -> f64 {
        fitness_for(self.distance(order))
    }

    /// Population of feasible individuals built by rejection sampling.
    ///
    /// The seed order goes first when it is feasible itself.
    pub fn initial_population<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<Vec<Individual>, OptimizeError> {
        let size = self.params.population_size;
        let seed = self.seed_order();
        let mut population = Vec::with_capacity(size);

        if self.interior_count() == 0 {
            population.resize(size, Individual::new(seed));
            return Ok(population);
        }

        if self.check_arrival_time(&seed) {
            population.push(Individual::new(seed.clone()));
        }

        let last = seed.len() - 1;
        while population.len() < size {
            let mut sampled = None;
            for _ in 0..self.config.max_attempts {
                let mut order = seed.clone();
                order[1..last].shuffle(rng);
                if self.check_arrival_time(&order) {
                    sampled = Some(order);
                    break;
                }
            }
            match sampled {
                Some(order) => population.push(Individual::new(order)),
                None => return Err(self.exhausted(SamplingStage::Initialization)),
            }
        }

        Ok(population)
    }

    /// `(index, fitness)` pairs, fittest first. Ties keep population order.
    pub fn rank(&self, population: &[Individual]) -> Vec<(usize, f64)> {
        let fitness: Vec<f64> = if self.config.parallel_ranking {
            population
                .par_iter()
                .map(|individual| self.fitness(&individual.order))
                .collect()
        } else {
            population
                .iter()
                .map(|individual| self.fitness(&individual.order))
                .collect()
        };

        let mut ranked: Vec<(usize, f64)> = fitness.into_iter().enumerate().collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        ranked
    }

    /// Population indices of the mating pool: elites first, then roulette draws.
    pub fn select<R: Rng + ?Sized>(&self, ranked: &[(usize, f64)], rng: &mut R) -> Vec<usize> {
        let size = self.params.population_size;
        let elites = self.params.num_elites.min(ranked.len());
        let mut selected: Vec<usize> = ranked.iter().take(elites).map(|(index, _)| *index).collect();
        if ranked.is_empty() {
            return selected;
        }

        let total: f64 = ranked.iter().map(|(_, fitness)| fitness).sum();
        let mut cumulative = Vec::with_capacity(ranked.len());
        let mut running = 0.0;
        for (_, fitness) in ranked {
            running += 100.0 * fitness / total;
            cumulative.push(running);
        }

        for _ in elites..size {
            let position = if running > 0.0 && running.is_finite() {
                let pick = rng.gen_range(0.0..running);
                cumulative
                    .iter()
                    .position(|&weight| pick < weight)
                    .unwrap_or(ranked.len() - 1)
            } else {
                rng.gen_range(0..ranked.len())
            };
            selected.push(ranked[position].0);
        }

        selected
    }

    /// Ordered crossover keeping `parent_a`'s outer shell.
    ///
    /// For cut boundaries `p1 < p2`, the child is `a[..p1]`, then `b`'s
    /// interior genes not already in the shell (in `b`'s order), then
    /// `a[p2..]`. Cut points are redrawn until the child is feasible.
    pub fn crossover<R: Rng + ?Sized>(
        &self,
        parent_a: &Individual,
        parent_b: &Individual,
        rng: &mut R,
    ) -> Result<Individual, OptimizeError> {
        let interior = parent_a.order.len().saturating_sub(2);
        if interior < 2 {
            return Ok(parent_a.clone());
        }

        for _ in 0..self.config.max_attempts {
            let (p1, p2) = cut_points(interior, rng);
            let child = splice(&parent_a.order, &parent_b.order, p1, p2);
            if self.check_arrival_time(&child) {
                return Ok(Individual::new(child));
            }
        }

        Err(self.exhausted(SamplingStage::Crossover))
    }

    /// Reverse a random interior segment until the result is feasible.
    pub fn mutate<R: Rng + ?Sized>(
        &self,
        individual: &mut Individual,
        rng: &mut R,
    ) -> Result<(), OptimizeError> {
        let interior = individual.order.len().saturating_sub(2);
        if interior < 2 {
            return Ok(());
        }

        for _ in 0..self.config.max_attempts {
            let first = rng.gen_range(1..=interior);
            let mut second = rng.gen_range(1..interior);
            if second >= first {
                second += 1;
            }
            let (lo, hi) = (first.min(second), first.max(second));

            individual.order[lo..=hi].reverse();
            if self.check_arrival_time(&individual.order) {
                return Ok(());
            }
            individual.order[lo..=hi].reverse();
        }

        Err(self.exhausted(SamplingStage::Mutation))
    }

    /// Breed the next population from `population`.
    ///
    /// Elites are carried unchanged and skip mutation. An elite that fails
    /// the feasibility re-check is dropped and its slot goes to one more
    /// crossover child, so the size stays `population_size`.
    pub fn next_generation<R: Rng + ?Sized>(
        &self,
        population: &[Individual],
        rng: &mut R,
    ) -> Result<Vec<Individual>, OptimizeError> {
        if population.is_empty() {
            return Err(OptimizeError::InvalidParams("population is empty".to_string()));
        }

        let size = self.params.population_size;
        let ranked = self.rank(population);
        let selected = self.select(&ranked, rng);
        let elite_count = self.params.num_elites.min(selected.len());

        let mut next: Vec<Individual> = Vec::with_capacity(size);
        for &index in &selected[..elite_count] {
            let elite = &population[index];
            if self.check_arrival_time(&elite.order) {
                next.push(elite.clone());
            }
        }
        let kept_elites = next.len();

        let mut pool: Vec<&Individual> = selected.iter().map(|&index| &population[index]).collect();
        pool.shuffle(rng);
        let pool_len = pool.len();
        for i in 0..size - kept_elites {
            let parent_a = pool[i % pool_len];
            let parent_b = pool[pool_len - 1 - i % pool_len];
            next.push(self.crossover(parent_a, parent_b, rng)?);
        }

        // Elites skip mutation so the best distance never rises between
        // generations.
        for individual in next.iter_mut().skip(kept_elites) {
            if rng.gen_bool(self.params.mutation_rate) {
                self.mutate(individual, rng)?;
            }
        }

        Ok(next)
    }

    /// Fittest individual of a population.
    pub fn best<'p>(&self, population: &'p [Individual]) -> Option<&'p Individual> {
        self.rank(population)
            .first()
            .and_then(|(index, _)| population.get(*index))
    }

    /// Run the full generation loop.
    ///
    /// Days with fewer than two interior stops have a single ordering and
    /// are returned unchanged.
    #[instrument(skip_all, level = "debug", fields(interior = self.interior_count()))]
    pub fn run<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<OptimizeOutcome, OptimizeError> {
        let seed = self.seed_order();
        if self.interior_count() < 2 {
            let distance = self.distance(&seed);
            return Ok(OptimizeOutcome {
                route: Route::new(self.stops.to_vec()),
                distance,
                generations_run: 0,
                best_distance_per_generation: vec![distance],
                params: self.params,
            });
        }

        let mut population = self.initial_population(rng)?;
        let mut history = Vec::with_capacity(self.params.num_generations + 2);
        history.push(self.best_distance(&population));

        for _ in 0..=self.params.num_generations {
            population = self.next_generation(&population, rng)?;
            history.push(self.best_distance(&population));
        }

        let best = self
            .best(&population)
            .cloned()
            .unwrap_or_else(|| Individual::new(seed));
        let distance = self.distance(&best.order);

        debug!(
            population = self.params.population_size,
            generations = self.params.num_generations + 1,
            seed_distance = history.first().copied().unwrap_or(distance),
            distance,
            "optimized day"
        );

        Ok(OptimizeOutcome {
            route: self.to_route(&best),
            distance,
            generations_run: self.params.num_generations + 1,
            best_distance_per_generation: history,
            params: self.params,
        })
    }

    /// Materialize an individual as a route re-timed on the planner grid.
    pub fn to_route(&self, individual: &Individual) -> Route {
        let stops = individual
            .order
            .iter()
            .filter_map(|&index| self.stops.get(index).cloned())
            .collect();
        let mut route = Route::new(stops);
        route.assign_grid_times(self.config);
        route
    }

    fn best_distance(&self, population: &[Individual]) -> f64 {
        self.best(population)
            .map(|individual| self.distance(&individual.order))
            .unwrap_or(f64::INFINITY)
    }

    fn exhausted(&self, stage: SamplingStage) -> OptimizeError {
        OptimizeError::ExhaustedRejectionSampling {
            stage,
            attempts: self.config.max_attempts,
        }
    }
}

/// Optimize one day's seed stops with the configured parameter row.
pub fn optimize_day<R: Rng + ?Sized>(
    stops: &[Stop],
    config: &PlannerConfig,
    rng: &mut R,
) -> Result<OptimizeOutcome, OptimizeError> {
    GeneticOptimizer::new(stops, config).run(rng)
}

/// Two distinct slice boundaries in `1..=interior + 1`, ascending.
fn cut_points<R: Rng + ?Sized>(interior: usize, rng: &mut R) -> (usize, usize) {
    let first = rng.gen_range(1..=interior + 1);
    let mut second = rng.gen_range(1..=interior);
    if second >= first {
        second += 1;
    }
    (first.min(second), first.max(second))
}

fn splice(parent_a: &[usize], parent_b: &[usize], p1: usize, p2: usize) -> Vec<usize> {
    let head = &parent_a[..p1];
    let tail = &parent_a[p2..];

    let mut in_shell = vec![false; parent_a.len()];
    for &gene in head.iter().chain(tail) {
        if let Some(flag) = in_shell.get_mut(gene) {
            *flag = true;
        }
    }

    let interior_b = &parent_b[1..parent_b.len().saturating_sub(1).max(1)];
    let middle = interior_b
        .iter()
        .copied()
        .filter(|&gene| !in_shell.get(gene).copied().unwrap_or(true));

    head.iter()
        .copied()
        .chain(middle)
        .chain(tail.iter().copied())
        .collect()
}
