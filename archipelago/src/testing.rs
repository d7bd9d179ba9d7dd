//! Minimal genome and operators used by the unit tests.
use crate::{Genome, GenomeOperators};

use rand::RngCore;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TestGenome {
    pub value: f64,
    pub fitness: Option<f64>,
    pub island: Option<usize>,
    pub generation_id: Option<usize>,
    pub hash: Option<u64>,
    pub mutations: usize,
    pub parent_islands: Option<(Option<usize>, Option<usize>)>,
}

impl TestGenome {
    pub fn seed() -> TestGenome {
        TestGenome {
            value: 0.0,
            fitness: None,
            island: None,
            generation_id: None,
            hash: None,
            mutations: 0,
            parent_islands: None,
        }
    }

    pub fn evaluated(generation_id: usize, island: usize, fitness: f64) -> TestGenome {
        TestGenome {
            fitness: Some(fitness),
            island: Some(island),
            generation_id: Some(generation_id),
            ..TestGenome::seed()
        }
    }

    pub fn with_hash(mut self, hash: u64) -> TestGenome {
        self.hash = Some(hash);
        self
    }
}

impl Genome for TestGenome {
    fn fitness(&self) -> Option<f64> {
        self.fitness
    }

    fn set_fitness(&mut self, fitness: Option<f64>) {
        self.fitness = fitness;
    }

    fn island(&self) -> Option<usize> {
        self.island
    }

    fn set_island(&mut self, island: usize) {
        self.island = Some(island);
    }

    fn generation_id(&self) -> Option<usize> {
        self.generation_id
    }

    fn set_generation_id(&mut self, generation_id: usize) {
        self.generation_id = Some(generation_id);
    }

    fn structural_hash(&self) -> Option<u64> {
        self.hash
    }
}

#[derive(Debug, Error)]
#[error("operator failure #{0}")]
pub(crate) struct TestOperatorError(pub usize);

/// Counts operator calls, and fails the first
/// `failures` of them.
#[derive(Debug, Default)]
pub(crate) struct TestOperators {
    pub mutations: usize,
    pub crossovers: usize,
    pub failures: usize,
    failed: usize,
}

impl TestOperators {
    pub fn failing(failures: usize) -> TestOperators {
        TestOperators {
            failures,
            ..TestOperators::default()
        }
    }

    fn check_failure(&mut self) -> Result<(), TestOperatorError> {
        if self.failed < self.failures {
            self.failed += 1;
            Err(TestOperatorError(self.failed))
        } else {
            Ok(())
        }
    }
}

impl GenomeOperators<TestGenome> for TestOperators {
    type Error = TestOperatorError;

    fn mutate(
        &mut self,
        count: usize,
        genome: &mut TestGenome,
        _rng: &mut dyn RngCore,
    ) -> Result<(), TestOperatorError> {
        self.check_failure()?;
        self.mutations += 1;
        genome.mutations += count;
        genome.value += count as f64;
        Ok(())
    }

    fn crossover(
        &mut self,
        more_fit: &TestGenome,
        less_fit: &TestGenome,
        _rng: &mut dyn RngCore,
    ) -> Result<TestGenome, TestOperatorError> {
        self.check_failure()?;
        self.crossovers += 1;
        Ok(TestGenome {
            value: (more_fit.value + less_fit.value) / 2.0,
            parent_islands: Some((more_fit.island, less_fit.island)),
            ..TestGenome::seed()
        })
    }
}
