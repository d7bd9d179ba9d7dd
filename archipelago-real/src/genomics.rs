mod config;
mod errors;
mod operators;

pub use config::RealConfig;
pub use errors::RealOperatorError;
pub use operators::RealOperators;

use archipelago::Genome;

use serde::{Deserialize, Serialize};

use std::fmt;

/// A fixed-length vector of real values.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RealGenome {
    values: Vec<f64>,
    fitness: Option<f64>,
    island: Option<usize>,
    generation_id: Option<usize>,
    structure: Option<u64>,
}

impl RealGenome {
    /// Returns a new unevaluated genome holding `values`.
    ///
    /// # Examples
    /// ```
    /// use archipelago::Genome;
    /// use archipelago_real::RealGenome;
    ///
    /// let genome = RealGenome::new(vec![1.0, -2.0]);
    ///
    /// assert_eq!(genome.values(), &[1.0, -2.0]);
    /// assert_eq!(genome.fitness(), None);
    /// assert_eq!(genome.island(), None);
    /// ```
    pub fn new(values: Vec<f64>) -> RealGenome {
        RealGenome {
            values,
            fitness: None,
            island: None,
            generation_id: None,
            structure: None,
        }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub(crate) fn values_mut(&mut self) -> &mut [f64] {
        &mut self.values
    }

    pub(crate) fn set_structure(&mut self, structure: Option<u64>) {
        self.structure = structure;
    }
}

impl Genome for RealGenome {
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
        self.structure
    }
}

impl fmt::Display for RealGenome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RealGenome [")?;
        for (i, value) in self.values.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{:.4}", value)?;
        }
        write!(f, "]")?;
        if let Some(fitness) = self.fitness {
            write!(f, " (fitness {})", fitness)?;
        }
        Ok(())
    }
}
