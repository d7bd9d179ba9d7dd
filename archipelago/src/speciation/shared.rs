use super::{GenerationError, InsertOutcome, InsertionError, IslandSpeciationStrategy};

use crate::{Genome, GenomeOperators};

use rand::Rng;

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A handle to a strategy shared between worker threads.
///
/// Generation and insertion each take the write lock for
/// the whole operation, so every call observes and leaves
/// a consistent strategy. Genome evaluation happens outside
/// the lock, between the two calls.
///
/// Cloning the handle yields another reference to the
/// same strategy.
#[derive(Debug)]
pub struct SharedStrategy<G> {
    inner: Arc<RwLock<IslandSpeciationStrategy<G>>>,
}

impl<G> Clone for SharedStrategy<G> {
    fn clone(&self) -> Self {
        SharedStrategy {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<G: Genome> SharedStrategy<G> {
    pub fn new(strategy: IslandSpeciationStrategy<G>) -> SharedStrategy<G> {
        SharedStrategy {
            inner: Arc::new(RwLock::new(strategy)),
        }
    }

    /// See [`IslandSpeciationStrategy::generate_genome`].
    pub fn generate_genome<R, O>(
        &self,
        rng: &mut R,
        operators: &mut O,
        stir_mutations: usize,
    ) -> Result<G, GenerationError>
    where
        R: Rng,
        O: GenomeOperators<G>,
    {
        self.write().generate_genome(rng, operators, stir_mutations)
    }

    /// See [`IslandSpeciationStrategy::insert_genome`].
    pub fn insert_genome(&self, genome: G) -> Result<InsertOutcome, InsertionError> {
        self.write().insert_genome(genome)
    }

    /// Locks the strategy for reading.
    ///
    /// # Panics
    /// This function will panic if a thread panicked
    /// while holding the lock.
    pub fn read(&self) -> RwLockReadGuard<'_, IslandSpeciationStrategy<G>> {
        self.inner
            .read()
            .unwrap_or_else(|_| panic!("strategy lock poisoned"))
    }

    /// Locks the strategy for writing.
    ///
    /// # Panics
    /// This function will panic if a thread panicked
    /// while holding the lock.
    pub fn write(&self) -> RwLockWriteGuard<'_, IslandSpeciationStrategy<G>> {
        self.inner
            .write()
            .unwrap_or_else(|_| panic!("strategy lock poisoned"))
    }

    /// Returns the strategy if this is the last handle to it.
    pub fn try_unwrap(self) -> Result<IslandSpeciationStrategy<G>, SharedStrategy<G>> {
        match Arc::try_unwrap(self.inner) {
            Ok(lock) => Ok(lock
                .into_inner()
                .unwrap_or_else(|_| panic!("strategy lock poisoned"))),
            Err(inner) => Err(SharedStrategy { inner }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::speciation::{RepopulationMethod, StrategyConfig};
    use crate::testing::{TestGenome, TestOperators};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn concurrent_workers_keep_invariants() {
        let strategy = IslandSpeciationStrategy::new(
            StrategyConfig {
                number_of_islands: 4,
                max_island_size: 8,
                mutation_rate: 0.6,
                intra_island_crossover_rate: 0.2,
                inter_island_crossover_rate: 0.2,
                repopulation_method: RepopulationMethod::BestGenome,
                extinction_event_generation_number: 40,
                repopulation_mutations: 2,
                islands_to_exterminate: 1,
                repeat_extinction: true,
                ..StrategyConfig::zero()
            },
            TestGenome::seed(),
        )
        .unwrap();
        let shared = SharedStrategy::new(strategy);

        std::thread::scope(|scope| {
            for worker in 0..4u64 {
                let shared = shared.clone();
                scope.spawn(move || {
                    let mut rng = StdRng::seed_from_u64(worker);
                    let mut operators = TestOperators::default();
                    for _ in 0..100 {
                        let mut genome = shared.generate_genome(&mut rng, &mut operators, 1).unwrap();
                        genome.set_fitness(Some(rng.gen_range(0.0..10.0)));
                        shared.insert_genome(genome).unwrap();
                    }
                });
            }
        });

        let strategy = shared.try_unwrap().unwrap();
        assert_eq!(strategy.generated_genomes(), 400);
        assert!(strategy.inserted_genomes() <= 400);
        assert!(strategy.extinctions() > 0);
        assert!(strategy.islands().all(|i| i.len() <= i.capacity()));
        let best = strategy.global_best_genome().unwrap().fitness().unwrap();
        assert!(strategy
            .islands()
            .flat_map(|i| i.genomes())
            .all(|g| best <= g.fitness().unwrap()));
    }

    #[test]
    fn handles_share_one_strategy() {
        let shared = SharedStrategy::new(
            IslandSpeciationStrategy::new(StrategyConfig::zero(), TestGenome::seed()).unwrap(),
        );
        let other = shared.clone();
        let mut rng = StdRng::seed_from_u64(0);
        let mut genome = other
            .generate_genome(&mut rng, &mut TestOperators::default(), 0)
            .unwrap();
        genome.set_fitness(Some(1.0));
        assert_eq!(shared.insert_genome(genome).unwrap(), InsertOutcome::NewGlobalBest);
        assert_eq!(shared.read().inserted_genomes(), 1);
        let shared = shared.try_unwrap().unwrap_err();
        drop(other);
        assert!(shared.try_unwrap().is_ok());
    }
}
