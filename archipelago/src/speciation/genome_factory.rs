use super::config::{Branch, Rates, RepopulationMethod, StrategyConfig};
use super::island::{member_fitness, Island, IslandStatus};
use super::SeedModifier;
use crate::{Genome, GenomeOperators};

use rand::{Rng, RngCore};

/// Failure of a single generation attempt.
pub(super) enum FactoryError<E> {
    /// The genome operators failed; another attempt may succeed.
    Operator { island: usize, source: E },
    /// The island can not be repopulated with the current survivors.
    NoRepopulationSource { island: usize, survivors: usize },
}

/// Auxiliary type for genome generation.
/// Borrows the strategy's islands and produces a single
/// unevaluated genome per call, according to the phase
/// of the target island and the configured rates.
pub(super) struct GenomeFactory<'a, G, O> {
    islands: &'a [Island<G>],
    seed_genome: &'a G,
    seed_modifier: Option<&'a SeedModifier<G>>,
    global_best_genome: Option<&'a G>,
    config: &'a StrategyConfig,
    rates: &'a Rates,
    operators: &'a mut O,
}

impl<'a, G, O> GenomeFactory<'a, G, O>
where
    G: Genome,
    O: GenomeOperators<G>,
{
    pub(super) fn new(
        islands: &'a [Island<G>],
        seed_genome: &'a G,
        seed_modifier: Option<&'a SeedModifier<G>>,
        global_best_genome: Option<&'a G>,
        config: &'a StrategyConfig,
        rates: &'a Rates,
        operators: &'a mut O,
    ) -> GenomeFactory<'a, G, O> {
        GenomeFactory {
            islands,
            seed_genome,
            seed_modifier,
            global_best_genome,
            config,
            rates,
            operators,
        }
    }

    /// Copies the seed genome, applies the seed modifier if
    /// any, then `stir_mutations` mutations.
    pub(super) fn stirred_seed(
        &mut self,
        island: usize,
        stir_mutations: usize,
        rng: &mut dyn RngCore,
    ) -> Result<G, FactoryError<O::Error>> {
        let mut genome = self.seed_genome.clone();
        if let Some(modifier) = self.seed_modifier {
            modifier.apply(&mut genome, rng);
        }
        self.mutate(island, stir_mutations, &mut genome, rng)?;
        Ok(genome)
    }

    /// Generates a genome for an island erased by an
    /// extinction event, using the configured repopulation method.
    pub(super) fn repopulation_genome(
        &mut self,
        island: usize,
        rng: &mut dyn RngCore,
    ) -> Result<G, FactoryError<O::Error>> {
        let mut genome = match self.config.repopulation_method {
            RepopulationMethod::BestGenome => self
                .global_best_genome
                .or_else(|| {
                    self.best_surviving_island(island)
                        .and_then(|i| self.islands[i].best_genome())
                })
                .ok_or(FactoryError::NoRepopulationSource {
                    island,
                    survivors: 0,
                })?
                .clone(),
            RepopulationMethod::BestIsland => {
                let best_island = self.best_surviving_island(island).ok_or(
                    FactoryError::NoRepopulationSource {
                        island,
                        survivors: 0,
                    },
                )?;
                self.islands[best_island]
                    .random_genome(rng)
                    .unwrap_or_else(|| panic!("no members in surviving island {}", best_island))
                    .clone()
            }
            method @ (RepopulationMethod::RandomParents | RepopulationMethod::BestParents) => {
                self.parents_repopulation(island, method, rng)?
            }
        };
        let mutations = self.config.repopulation_mutations;
        self.mutate(island, mutations, &mut genome, rng)?;
        Ok(genome)
    }

    /// Crosses over one parent from each of two distinct surviving
    /// islands. Parents are random members, or each island's best
    /// member with [`RepopulationMethod::BestParents`].
    fn parents_repopulation(
        &mut self,
        island: usize,
        method: RepopulationMethod,
        rng: &mut dyn RngCore,
    ) -> Result<G, FactoryError<O::Error>> {
        let survivors = self.surviving_islands(island);
        let (first, second) = crate::rng::distinct_pair(rng, survivors.len()).ok_or(
            FactoryError::NoRepopulationSource {
                island,
                survivors: survivors.len(),
            },
        )?;
        let parent1 = self.parent_from(survivors[first], method, rng);
        let parent2 = self.parent_from(survivors[second], method, rng);
        self.crossover(island, parent1, parent2, rng)
    }

    fn parent_from(
        &self,
        source: usize,
        method: RepopulationMethod,
        rng: &mut dyn RngCore,
    ) -> &'a G {
        let islands = self.islands;
        let genome = match method {
            RepopulationMethod::BestParents => islands[source].best_genome(),
            _ => islands[source].random_genome(rng),
        };
        genome.unwrap_or_else(|| panic!("no members in surviving island {}", source))
    }

    /// Generates a genome once every island is full, choosing
    /// a target island uniformly and a branch by the rates.
    /// Returns the target island along with the genome.
    pub(super) fn bred_genome(
        &mut self,
        rng: &mut dyn RngCore,
    ) -> Result<(usize, G), FactoryError<O::Error>> {
        let r: f64 = rng.gen();
        let islands = self.islands;
        let target = rng.gen_range(0..islands.len());
        let island = &islands[target];

        let genome = match self.rates.branch(r) {
            Branch::IntraIslandCrossover => match island.two_random_genomes(rng) {
                Some((parent1, parent2)) => self.crossover(target, parent1, parent2, rng)?,
                None => self.mutated_member(target, rng)?,
            },
            Branch::InterIslandCrossover => {
                match crate::rng::index_excluding(rng, islands.len(), target) {
                    Some(other) => {
                        let parent1 = self.random_member(target, rng);
                        let parent2 = islands[other]
                            .best_genome()
                            .unwrap_or_else(|| panic!("no members in full island {}", other));
                        self.crossover(target, parent1, parent2, rng)?
                    }
                    None => self.mutated_member(target, rng)?,
                }
            }
            Branch::Mutation => self.mutated_member(target, rng)?,
        };
        Ok((target, genome))
    }

    fn mutated_member(
        &mut self,
        island: usize,
        rng: &mut dyn RngCore,
    ) -> Result<G, FactoryError<O::Error>> {
        let mut genome = self.random_member(island, rng).clone();
        self.mutate(island, 1, &mut genome, rng)?;
        Ok(genome)
    }

    fn random_member(&self, island: usize, rng: &mut dyn RngCore) -> &'a G {
        let islands = self.islands;
        islands[island]
            .random_genome(rng)
            .unwrap_or_else(|| panic!("no members in island {}", island))
    }

    /// Islands that completed (re)population and were not erased,
    /// excluding `island`.
    fn surviving_islands(&self, island: usize) -> Vec<usize> {
        self.islands
            .iter()
            .filter(|i| i.id() != island && i.status() == IslandStatus::Filled && !i.is_erased())
            .map(|i| i.id())
            .collect()
    }

    fn best_surviving_island(&self, island: usize) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for index in self.surviving_islands(island) {
            if let Some(fitness) = self.islands[index].best_fitness() {
                if best.map_or(true, |(_, current)| fitness < current) {
                    best = Some((index, fitness));
                }
            }
        }
        best.map(|(index, _)| index)
    }

    fn mutate(
        &mut self,
        island: usize,
        count: usize,
        genome: &mut G,
        rng: &mut dyn RngCore,
    ) -> Result<(), FactoryError<O::Error>> {
        if count == 0 {
            return Ok(());
        }
        self.operators
            .mutate(count, genome, rng)
            .map_err(|source| FactoryError::Operator { island, source })
    }

    /// Crosses over two parents, passing the more fit one first.
    fn crossover(
        &mut self,
        island: usize,
        parent1: &G,
        parent2: &G,
        rng: &mut dyn RngCore,
    ) -> Result<G, FactoryError<O::Error>> {
        let (more_fit, less_fit) = if member_fitness(parent2) < member_fitness(parent1) {
            (parent2, parent1)
        } else {
            (parent1, parent2)
        };
        self.operators
            .crossover(more_fit, less_fit, rng)
            .map_err(|source| FactoryError::Operator { island, source })
    }
}
