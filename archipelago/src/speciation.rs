//! An island speciation strategy splits the population
//! into a fixed number of islands, evolved semi-independently.
//! New genomes are generated from seed mutations while the
//! islands fill up, and from mutation and crossover afterwards.
//! Periodic extinction events erase the least promising
//! islands, which are then repopulated from the survivors.
mod config;
mod errors;
mod genome_factory;
mod island;
pub mod logging;
mod shared;

pub use config::{IslandRankingMethod, Rates, RepopulationMethod, StrategyConfig};
pub use errors::{ConfigError, GenerationError, InsertionError};
use genome_factory::{FactoryError, GenomeFactory};
pub use island::{Island, IslandStatus};
use island::member_fitness;
pub use shared::SharedStrategy;

use crate::{Genome, GenomeOperators};

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use std::fmt;
use std::sync::Arc;

/// Result of handing an evaluated genome to the strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The genome was discarded.
    Rejected,
    /// The genome was kept, and is the best seen so far.
    NewGlobalBest,
    /// The genome was kept.
    Accepted,
}

impl InsertOutcome {
    /// Returns whether the genome was kept by an island.
    pub fn is_accepted(self) -> bool {
        !matches!(self, Self::Rejected)
    }
}

/// Transformation applied to each copy of the seed genome.
struct SeedModifier<G>(Arc<dyn Fn(&mut G, &mut dyn RngCore) + Send + Sync>);

impl<G> SeedModifier<G> {
    fn new<F>(modifier: F) -> SeedModifier<G>
    where
        F: Fn(&mut G, &mut dyn RngCore) + Send + Sync + 'static,
    {
        SeedModifier(Arc::new(modifier))
    }

    fn apply(&self, genome: &mut G, rng: &mut dyn RngCore) {
        (self.0)(genome, rng)
    }
}

impl<G> Clone for SeedModifier<G> {
    fn clone(&self) -> Self {
        SeedModifier(Arc::clone(&self.0))
    }
}

impl<G> fmt::Debug for SeedModifier<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SeedModifier")
    }
}

/// An island-based speciation strategy.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IslandSpeciationStrategy<G> {
    islands: Vec<Island<G>>,
    seed_genome: G,
    global_best_genome: Option<G>,
    generation_island: usize,
    generated_genomes: usize,
    inserted_genomes: usize,
    extinctions: usize,
    extinction_pending: bool,
    rates: Rates,
    config: StrategyConfig,
    #[serde(skip)]
    seed_modifier: Option<SeedModifier<G>>,
}

impl<G: Genome> IslandSpeciationStrategy<G> {
    /// Creates a new strategy with `config.number_of_islands`
    /// empty islands, which will be filled with mutated
    /// copies of `seed_genome`.
    ///
    /// The generation rates are rescaled to sum to 1.
    ///
    /// # Errors
    /// Returns an error if the configuration can not be used:
    /// no islands, zero-sized islands, invalid rates, or
    /// an extinction event that would leave too few survivors.
    ///
    /// # Examples
    /// ```
    /// use archipelago::{IslandSpeciationStrategy, StrategyConfig};
    /// # use archipelago_real::RealGenome;
    ///
    /// let config = StrategyConfig {
    ///     number_of_islands: 4,
    ///     max_island_size: 10,
    ///     mutation_rate: 0.7,
    ///     intra_island_crossover_rate: 0.2,
    ///     inter_island_crossover_rate: 0.1,
    ///     ..StrategyConfig::zero()
    /// };
    /// # let seed = RealGenome::new(vec![0.0; 8]);
    /// // With `seed` a suitable type implementing `Genome`...
    /// let strategy = IslandSpeciationStrategy::new(config, seed).unwrap();
    ///
    /// assert_eq!(strategy.islands().count(), 4);
    /// assert!(!strategy.islands_full());
    /// ```
    pub fn new(
        config: StrategyConfig,
        seed_genome: G,
    ) -> Result<IslandSpeciationStrategy<G>, ConfigError> {
        let rates = config.validate()?;
        Ok(IslandSpeciationStrategy {
            islands: (0..config.number_of_islands)
                .map(|id| Island::new(id, config.max_island_size))
                .collect(),
            seed_genome,
            global_best_genome: None,
            generation_island: 0,
            generated_genomes: 0,
            inserted_genomes: 0,
            extinctions: 0,
            extinction_pending: false,
            rates,
            config,
            seed_modifier: None,
        })
    }

    /// Creates a new strategy whose islands are filled with copies
    /// of `seed_genome` transformed by `modifier` before being
    /// stirred. Used to start from a previously evolved genome,
    /// e.g. adapting it to a new set of inputs.
    ///
    /// The modifier is not serialized with the strategy.
    ///
    /// # Errors
    /// Returns an error if the configuration can not be used,
    /// as with [`new`](IslandSpeciationStrategy::new).
    ///
    /// # Examples
    /// ```
    /// use archipelago::{IslandSpeciationStrategy, StrategyConfig};
    /// use archipelago_real::{RealConfig, RealGenome, RealOperators};
    /// use rand::SeedableRng;
    ///
    /// let trained = RealGenome::new(vec![0.5, -0.5]);
    /// let mut strategy = IslandSpeciationStrategy::with_seed_modifier(
    ///     StrategyConfig::zero(),
    ///     trained,
    ///     |genome: &mut RealGenome, _rng: &mut dyn rand::RngCore| {
    ///         *genome = RealGenome::new(genome.values().iter().map(|v| v * 2.0).collect());
    ///     },
    /// )
    /// .unwrap();
    /// # let mut operators = RealOperators::new(RealConfig { length: 2, ..RealConfig::zero() });
    /// # let mut rng = rand::rngs::StdRng::seed_from_u64(0);
    ///
    /// let genome = strategy.generate_genome(&mut rng, &mut operators, 0).unwrap();
    /// assert_eq!(genome.values(), &[1.0, -1.0]);
    /// assert!(!strategy.seed_was_minimal());
    /// ```
    pub fn with_seed_modifier<F>(
        config: StrategyConfig,
        seed_genome: G,
        modifier: F,
    ) -> Result<IslandSpeciationStrategy<G>, ConfigError>
    where
        F: Fn(&mut G, &mut dyn RngCore) + Send + Sync + 'static,
    {
        let mut strategy = Self::new(config, seed_genome)?;
        strategy.seed_modifier = Some(SeedModifier::new(modifier));
        Ok(strategy)
    }

    /// Returns whether islands are filled with plain copies of the
    /// seed genome, rather than modified ones.
    pub fn seed_was_minimal(&self) -> bool {
        self.seed_modifier.is_none()
    }

    /// Generates a new, unevaluated genome.
    ///
    /// While some island is not full, islands are visited
    /// round-robin and the genome is either a copy of the seed
    /// with `stir_mutations` mutations (islands being filled for
    /// the first time) or a repopulation genome (erased islands).
    /// Once every island is full, a random island is chosen and
    /// the genome is a mutant of one of its members, a crossover
    /// of two of its members, or a crossover of one of its members
    /// with the best member of another island, according to the
    /// normalized rates. Inter-island children belong to the first
    /// chosen island.
    ///
    /// # Errors
    /// Returns an error if the operators failed on each of
    /// `max_generation_attempts` attempts, or if an erased island
    /// can not be repopulated.
    pub fn generate_genome<R, O>(
        &mut self,
        rng: &mut R,
        operators: &mut O,
        stir_mutations: usize,
    ) -> Result<G, GenerationError>
    where
        R: Rng,
        O: GenomeOperators<G>,
    {
        let rng: &mut dyn RngCore = rng;
        let fill_island = self.next_unfilled_island();
        let attempts = self.config.max_generation_attempts;
        let mut failure = (fill_island.unwrap_or(0), String::new());

        for attempt in 1..=attempts {
            let mut factory = GenomeFactory::new(
                &self.islands,
                &self.seed_genome,
                self.seed_modifier.as_ref(),
                self.global_best_genome.as_ref(),
                &self.config,
                &self.rates,
                operators,
            );
            let generated = match fill_island {
                Some(island) => match self.islands[island].status() {
                    IslandStatus::Repopulating => factory.repopulation_genome(island, rng),
                    _ => factory.stirred_seed(island, stir_mutations, rng),
                }
                .map(|genome| (island, genome)),
                None => factory.bred_genome(rng),
            };

            match generated {
                Ok((island, genome)) => return Ok(self.hand_out(island, genome)),
                Err(FactoryError::Operator { island, source }) => {
                    log::debug!(
                        "generation attempt {}/{} for island {} failed: {}",
                        attempt,
                        attempts,
                        island,
                        source
                    );
                    failure = (island, source.to_string());
                }
                Err(FactoryError::NoRepopulationSource { island, survivors }) => {
                    return Err(GenerationError::NoRepopulationSource { island, survivors });
                }
            }
        }

        let (island, last_error) = failure;
        Err(GenerationError::AttemptsExhausted {
            island,
            generated_genomes: self.generated_genomes,
            attempts,
            last_error,
        })
    }

    /// Advances the round-robin cursor to the next island
    /// that is not full, if any.
    fn next_unfilled_island(&mut self) -> Option<usize> {
        let count = self.islands.len();
        let island = (0..count)
            .map(|offset| (self.generation_island + offset) % count)
            .find(|&i| !self.islands[i].is_full())?;
        self.generation_island = (island + 1) % count;
        Some(island)
    }

    fn hand_out(&mut self, island: usize, mut genome: G) -> G {
        genome.set_fitness(None);
        genome.set_island(island);
        genome.set_generation_id(self.generated_genomes);
        self.generated_genomes += 1;
        genome
    }

    /// Hands an evaluated genome to the strategy, which keeps
    /// it in the island it is tagged with, or discards it.
    ///
    /// A genome is appended to an island with free space.
    /// In a full island it replaces the worst member if it is
    /// strictly better, and is rejected otherwise. Genomes
    /// generated for an island before it was erased, and genomes
    /// no better than a structurally identical member, are also
    /// rejected. An accepted genome strictly better than every
    /// genome seen so far becomes the new global best.
    ///
    /// Accepted insertions may trigger an extinction event.
    ///
    /// # Errors
    /// Returns an error if the genome has not been evaluated,
    /// or is not tagged with one of the strategy's islands.
    pub fn insert_genome(&mut self, genome: G) -> Result<InsertOutcome, InsertionError> {
        let fitness = genome.fitness().ok_or(InsertionError::Unevaluated {
            generation_id: genome.generation_id(),
        })?;
        if fitness.is_nan() {
            return Err(InsertionError::NanFitness {
                generation_id: genome.generation_id(),
            });
        }
        let island = genome
            .island()
            .filter(|&i| i < self.islands.len())
            .ok_or(InsertionError::UnknownIsland {
                island: genome.island(),
                number_of_islands: self.islands.len(),
            })?;

        let generation_id = genome.generation_id();
        let position = match self.islands[island].insert_genome(genome) {
            Some(position) => position,
            None => {
                log::debug!(
                    "island {} rejected genome {:?} with fitness {}",
                    island,
                    generation_id,
                    fitness
                );
                return Ok(InsertOutcome::Rejected);
            }
        };
        self.inserted_genomes += 1;

        let is_new_best = self
            .global_best_genome
            .as_ref()
            .map_or(true, |best| fitness < member_fitness(best));
        let outcome = if is_new_best {
            log::info!(
                "new global best genome {:?} on island {} with fitness {}",
                generation_id,
                island,
                fitness
            );
            self.global_best_genome = self.islands[island].get(position).cloned();
            InsertOutcome::NewGlobalBest
        } else {
            InsertOutcome::Accepted
        };

        if self.extinction_due() {
            self.extinction_pending = true;
        }
        if self.extinction_pending && self.all_islands_filled() {
            self.extinction_pending = false;
            self.trigger_extinction();
        } else if self.extinction_pending {
            log::debug!(
                "extinction held after {} inserted genomes until every island is filled",
                self.inserted_genomes
            );
        }
        Ok(outcome)
    }

    fn extinction_due(&self) -> bool {
        let interval = self.config.extinction_event_generation_number;
        if interval == 0 || self.inserted_genomes % interval != 0 {
            return false;
        }
        if !self.config.repeat_extinction && self.extinctions > 0 {
            return false;
        }
        match self.config.max_genomes {
            Some(max_genomes) => max_genomes.saturating_sub(self.inserted_genomes) >= interval,
            None => true,
        }
    }

    /// Returns whether every island has completed its
    /// (re)population and was not erased since.
    fn all_islands_filled(&self) -> bool {
        self.islands
            .iter()
            .all(|i| i.status() == IslandStatus::Filled && !i.is_erased())
    }

    /// Runs an extinction event immediately, erasing up to
    /// `islands_to_exterminate` of the worst ranked islands.
    /// Returns the erased islands.
    ///
    /// This is called automatically by [`insert_genome`]; it
    /// is exposed for drivers keeping their own generation count.
    /// Automatic events falling due while some island is still
    /// being (re)populated are held until every island is filled.
    ///
    /// The best ranked island is never erased, and no island is
    /// erased unless enough completely filled islands are left
    /// for the configured repopulation method.
    ///
    /// [`insert_genome`]: IslandSpeciationStrategy::insert_genome
    pub fn trigger_extinction(&mut self) -> Vec<usize> {
        let ranking = match self.config.island_ranking_method {
            IslandRankingMethod::EraseWorst => self.rank_islands(),
        };
        let required = self.config.repopulation_method.required_survivors();
        let mut survivors = self
            .islands
            .iter()
            .filter(|i| i.status() == IslandStatus::Filled && !i.is_erased())
            .count();

        let mut erased = Vec::with_capacity(self.config.islands_to_exterminate);
        for &index in ranking.iter().take(ranking.len().saturating_sub(1)) {
            if erased.len() == self.config.islands_to_exterminate {
                break;
            }
            let filled = self.islands[index].status() == IslandStatus::Filled;
            let remaining = if filled { survivors - 1 } else { survivors };
            if remaining < required {
                log::warn!(
                    "extinction stopped after {} island(s) to keep {} surviving island(s)",
                    erased.len(),
                    required
                );
                break;
            }
            if filled {
                survivors -= 1;
            }
            self.islands[index].erase(self.generated_genomes);
            erased.push(index);
        }

        self.extinctions += 1;
        log::info!(
            "extinction event {} after {} inserted genomes erased islands {:?}, repopulating with {}",
            self.extinctions,
            self.inserted_genomes,
            erased,
            self.config.repopulation_method
        );
        erased
    }

    /// Ranks the islands by the fitness of their best member,
    /// from worst to best. Erased and empty islands are left out.
    /// Ties keep index order.
    ///
    /// # Examples
    /// ```
    /// use archipelago::{Genome, IslandSpeciationStrategy, StrategyConfig};
    /// use archipelago_real::{RealConfig, RealOperators};
    /// use rand::SeedableRng;
    ///
    /// let config = StrategyConfig {
    ///     number_of_islands: 4,
    ///     ..StrategyConfig::zero()
    /// };
    /// # let real_config = RealConfig { length: 2, ..RealConfig::zero() };
    /// # let seed = archipelago_real::RealGenome::new(vec![0.0; 2]);
    /// let mut strategy = IslandSpeciationStrategy::new(config, seed).unwrap();
    /// let mut operators = RealOperators::new(real_config);
    /// let mut rng = rand::rngs::StdRng::seed_from_u64(0);
    ///
    /// for fitness in [5.0, 2.0, 2.0, 8.0] {
    ///     let mut genome = strategy.generate_genome(&mut rng, &mut operators, 0).unwrap();
    ///     genome.set_fitness(Some(fitness));
    ///     strategy.insert_genome(genome).unwrap();
    /// }
    ///
    /// assert_eq!(strategy.rank_islands(), vec![3, 0, 1, 2]);
    /// assert_eq!(strategy.worst_island_by_best_genome(), Some(3));
    /// ```
    pub fn rank_islands(&self) -> Vec<usize> {
        let mut ranked: Vec<(usize, f64)> = self
            .islands
            .iter()
            .filter(|i| i.is_source())
            .filter_map(|i| i.best_fitness().map(|fitness| (i.id(), fitness)))
            .collect();
        ranked.sort_by(|(_, f1), (_, f2)| {
            f2.partial_cmp(f1)
                .unwrap_or_else(|| panic!("invalid genome fitnesses detected (NaN)"))
        });
        ranked.into_iter().map(|(id, _)| id).collect()
    }

    /// Returns the island whose best member is the worst
    /// among all islands' best members.
    pub fn worst_island_by_best_genome(&self) -> Option<usize> {
        self.rank_islands().first().copied()
    }

    /// Returns the island whose best member is the best
    /// among all islands' best members.
    pub fn best_island_by_best_genome(&self) -> Option<usize> {
        self.rank_islands().last().copied()
    }

    /// Returns the best genome currently in a non-erased island,
    /// or `None` if no genome has been inserted.
    pub fn best_genome(&self) -> Option<&G> {
        self.extreme_genome(Island::best_genome, |candidate, current| candidate < current)
    }

    /// Returns the worst genome currently in a non-erased island,
    /// or `None` if no genome has been inserted.
    pub fn worst_genome(&self) -> Option<&G> {
        self.extreme_genome(Island::worst_genome, |candidate, current| candidate > current)
    }

    fn extreme_genome<'s, E, F>(&'s self, extreme_of: E, replaces: F) -> Option<&'s G>
    where
        E: Fn(&'s Island<G>) -> Option<&'s G>,
        F: Fn(f64, f64) -> bool,
    {
        let mut extreme: Option<&G> = None;
        for genome in self.islands.iter().filter(|i| !i.is_erased()).filter_map(extreme_of) {
            match extreme {
                Some(current) if !replaces(member_fitness(genome), member_fitness(current)) => {}
                _ => extreme = Some(genome),
            }
        }
        extreme
    }

    /// Returns the fitness of the best genome in the islands.
    ///
    /// # Panics
    /// This function will panic if no genome has been inserted yet.
    pub fn best_fitness(&self) -> f64 {
        self.best_genome()
            .map(member_fitness)
            .unwrap_or_else(|| panic!("no genome has been inserted yet"))
    }

    /// Returns the fitness of the worst genome in the islands.
    ///
    /// # Panics
    /// This function will panic if no genome has been inserted yet.
    pub fn worst_fitness(&self) -> f64 {
        self.worst_genome()
            .map(member_fitness)
            .unwrap_or_else(|| panic!("no genome has been inserted yet"))
    }

    /// Returns the best genome ever inserted. Unlike
    /// [`best_genome`], this copy survives extinction events.
    ///
    /// [`best_genome`]: IslandSpeciationStrategy::best_genome
    pub fn global_best_genome(&self) -> Option<&G> {
        self.global_best_genome.as_ref()
    }

    /// Returns whether every island is at capacity.
    pub fn islands_full(&self) -> bool {
        self.islands.iter().all(Island::is_full)
    }

    /// Returns the number of genomes handed out by
    /// [`generate_genome`](IslandSpeciationStrategy::generate_genome).
    pub fn generated_genomes(&self) -> usize {
        self.generated_genomes
    }

    /// Returns the number of genomes accepted by an island.
    pub fn inserted_genomes(&self) -> usize {
        self.inserted_genomes
    }

    /// Returns the number of extinction events so far.
    pub fn extinctions(&self) -> usize {
        self.extinctions
    }

    pub fn islands(&self) -> impl Iterator<Item = &Island<G>> {
        self.islands.iter()
    }

    pub fn island(&self, id: usize) -> Option<&Island<G>> {
        self.islands.get(id)
    }

    pub fn config(&self) -> &StrategyConfig {
        &self.config
    }

    /// Returns the generation rates after normalization.
    pub fn rates(&self) -> Rates {
        self.rates
    }

    /// Returns comma-separated column names matching
    /// [`strategy_information_values`].
    ///
    /// [`strategy_information_values`]: IslandSpeciationStrategy::strategy_information_values
    pub fn strategy_information_headers(&self) -> String {
        self.islands
            .iter()
            .map(|i| format!("Island_{0}_best_fitness,Island_{0}_worst_fitness", i.id()))
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Returns each island's best and worst fitness as
    /// comma-separated values. Empty islands leave blank fields.
    pub fn strategy_information_values(&self) -> String {
        let field = |fitness: Option<f64>| fitness.map(|f| f.to_string()).unwrap_or_default();
        self.islands
            .iter()
            .map(|i| format!("{},{}", field(i.best_fitness()), field(i.worst_fitness())))
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl<G: Genome> fmt::Display for IslandSpeciationStrategy<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "IslandSpeciationStrategy: {} generated, {} inserted, {} extinction(s)",
            self.generated_genomes, self.inserted_genomes, self.extinctions
        )?;
        if let Some(best) = &self.global_best_genome {
            write!(f, ", global best fitness {}", member_fitness(best))?;
        }
        for island in &self.islands {
            write!(f, "\n{}", island)?;
        }
        Ok(())
    }
}
