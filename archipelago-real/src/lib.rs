//! # archipelago-real
//! A real-valued vector implementation of the [`archipelago`] crate's
//! `Genome` and `GenomeOperators` traits.
//!
//! Provides a [`RealGenome`] type, a fixed-length vector of `f64`s,
//! and the [`RealOperators`] acting on it:
//! - mutation nudges (or resets) each value with a configured chance,
//!   keeping values within a bound.
//! - crossover picks each value from either parent, or averages them.
//!
//! [`RealGenome`]: crate::genomics::RealGenome
//! [`RealOperators`]: crate::genomics::RealOperators
//!
//! # Example usage: one generated genome
//! ```
//! use archipelago::{Genome, IslandSpeciationStrategy, StrategyConfig};
//! use archipelago_real::{RealConfig, RealGenome, RealOperators};
//! use rand::SeedableRng;
//!
//! let config = RealConfig {
//!     length: 3,
//!     nudge_chance: 1.0,
//!     nudge_power: 0.5,
//!     bound: 2.0,
//!     ..RealConfig::zero()
//! };
//! let mut strategy =
//!     IslandSpeciationStrategy::new(StrategyConfig::zero(), RealGenome::new(vec![0.0; 3])).unwrap();
//! let mut operators = RealOperators::new(config);
//! let mut rng = rand::rngs::StdRng::seed_from_u64(0);
//!
//! let genome = strategy.generate_genome(&mut rng, &mut operators, 1).unwrap();
//! assert_eq!(genome.island(), Some(0));
//! assert!(genome.values().iter().all(|v| v.abs() <= 0.5));
//! ```

pub mod genomics;

pub use genomics::{RealConfig, RealGenome, RealOperatorError, RealOperators};
