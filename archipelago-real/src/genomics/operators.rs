use super::{RealConfig, RealGenome, RealOperatorError};

use archipelago::GenomeOperators;

use ahash::RandomState;
use rand::{Rng, RngCore};

use std::hash::{BuildHasher, Hash, Hasher};

/// Mutation and crossover of [`RealGenome`]s.
#[derive(Clone)]
pub struct RealOperators {
    config: RealConfig,
    hasher: RandomState,
}

impl RealOperators {
    /// Returns operators following `config`.
    ///
    /// # Examples
    /// ```
    /// use archipelago::GenomeOperators;
    /// use archipelago_real::{RealConfig, RealGenome, RealOperators};
    /// use rand::SeedableRng;
    ///
    /// let mut operators = RealOperators::new(RealConfig {
    ///     length: 2,
    ///     nudge_chance: 1.0,
    ///     nudge_power: 0.5,
    ///     bound: 1.0,
    ///     ..RealConfig::zero()
    /// });
    /// let mut rng = rand::rngs::StdRng::seed_from_u64(0);
    /// let mut genome = RealGenome::new(vec![0.9, -0.9]);
    ///
    /// operators.mutate(10, &mut genome, &mut rng).unwrap();
    /// assert!(genome.values().iter().all(|v| v.abs() <= 1.0));
    /// ```
    pub fn new(config: RealConfig) -> RealOperators {
        RealOperators {
            config,
            // Fixed seeds keep structural hashes stable across runs.
            hasher: RandomState::with_seeds(0x5eed, 0xa7c4, 0x1e1a, 0x9b0d),
        }
    }

    pub fn config(&self) -> &RealConfig {
        &self.config
    }

    fn check_length(&self, genome: &RealGenome) -> Result<(), RealOperatorError> {
        if genome.len() == self.config.length {
            Ok(())
        } else {
            Err(RealOperatorError::LengthMismatch {
                expected: self.config.length,
                found: genome.len(),
            })
        }
    }

    fn nudge(&self, value: f64, rng: &mut dyn RngCore) -> f64 {
        let bound = self.config.bound;
        if rng.gen::<f64>() < self.config.reset_chance {
            rng.gen_range(-bound..=bound)
        } else {
            let power = self.config.nudge_power;
            (value + rng.gen_range(-power..=power)).clamp(-bound, bound)
        }
    }

    /// Hashes the genome's values, rounded to
    /// the configured resolution.
    fn structure_of(&self, values: &[f64]) -> Option<u64> {
        let resolution = self.config.structure_resolution;
        if resolution <= 0.0 {
            return None;
        }
        let mut hasher = self.hasher.build_hasher();
        for value in values {
            ((value / resolution).round() as i64).hash(&mut hasher);
        }
        Some(hasher.finish())
    }
}

impl GenomeOperators<RealGenome> for RealOperators {
    type Error = RealOperatorError;

    fn mutate(
        &mut self,
        count: usize,
        genome: &mut RealGenome,
        rng: &mut dyn RngCore,
    ) -> Result<(), RealOperatorError> {
        self.check_length(genome)?;
        for _ in 0..count {
            for i in 0..genome.len() {
                if rng.gen::<f64>() < self.config.nudge_chance {
                    let value = genome.values()[i];
                    genome.values_mut()[i] = self.nudge(value, rng);
                }
            }
        }
        genome.set_structure(self.structure_of(genome.values()));
        Ok(())
    }

    fn crossover(
        &mut self,
        more_fit: &RealGenome,
        less_fit: &RealGenome,
        rng: &mut dyn RngCore,
    ) -> Result<RealGenome, RealOperatorError> {
        if more_fit.len() != less_fit.len() {
            return Err(RealOperatorError::ParentLengthMismatch(
                more_fit.len(),
                less_fit.len(),
            ));
        }
        self.check_length(more_fit)?;
        let values: Vec<f64> = more_fit
            .values()
            .iter()
            .zip(less_fit.values())
            .map(|(a, b)| {
                if rng.gen::<f64>() < self.config.mate_by_averaging_chance {
                    (a + b) / 2.0
                } else if rng.gen::<bool>() {
                    *a
                } else {
                    *b
                }
            })
            .collect();
        let mut child = RealGenome::new(values);
        child.set_structure(self.structure_of(child.values()));
        Ok(child)
    }
}
