//! An island model for steady-state evolutionary search.
//!
//! The population is split into a fixed number of bounded islands,
//! evolved semi-independently. Islands are first filled with mutated
//! copies of a seed genome; afterwards new genomes are produced by
//! mutation, crossover within an island, or crossover between islands.
//! Periodic extinction events erase the least promising islands and
//! refill them from the survivors.
//!
//! The strategy is agnostic to the genome representation: any type
//! implementing [`Genome`] can be evolved, with the variation operators
//! supplied through [`GenomeOperators`]. A real-valued vector genome is
//! provided by the `archipelago-real` crate.
//!
//! Genomes are generated and inserted one at a time, so evaluation can
//! happen anywhere in between, e.g. on a pool of worker threads sharing
//! a [`SharedStrategy`]. Lower fitness is better.
//!
//! # Example usage: minimizing the sphere function, using `archipelago-real`
//! ```
//! use archipelago::{Genome, IslandSpeciationStrategy, RepopulationMethod, StrategyConfig};
//! use archipelago_real::{RealConfig, RealGenome, RealOperators};
//! use rand::SeedableRng;
//!
//! fn sphere(genome: &RealGenome) -> f64 {
//!     genome.values().iter().map(|x| x * x).sum()
//! }
//!
//! fn main() {
//!     let real_config = RealConfig {
//!         length: 4,
//!         nudge_chance: 0.5,
//!         nudge_power: 0.5,
//!         bound: 5.0,
//!         ..RealConfig::zero()
//!     };
//!
//!     let config = StrategyConfig {
//!         number_of_islands: 4,
//!         max_island_size: 10,
//!         mutation_rate: 0.6,
//!         intra_island_crossover_rate: 0.3,
//!         inter_island_crossover_rate: 0.1,
//!         repopulation_method: RepopulationMethod::BestGenome,
//!         extinction_event_generation_number: 200,
//!         repopulation_mutations: 2,
//!         islands_to_exterminate: 1,
//!         repeat_extinction: true,
//!         ..StrategyConfig::zero()
//!     };
//!
//!     let seed = RealGenome::new(vec![3.0; 4]);
//!     let mut strategy = IslandSpeciationStrategy::new(config, seed).unwrap();
//!     let mut operators = RealOperators::new(real_config);
//!     let mut rng = rand::rngs::StdRng::seed_from_u64(42);
//!
//!     for _ in 0..1000 {
//!         let mut genome = strategy.generate_genome(&mut rng, &mut operators, 3).unwrap();
//!         genome.set_fitness(Some(sphere(&genome)));
//!         strategy.insert_genome(genome).unwrap();
//!     }
//!
//!     assert!(strategy.best_fitness() < sphere(&RealGenome::new(vec![3.0; 4])));
//! }
//! ```

mod genome;
mod rng;
mod speciation;
#[cfg(test)]
mod testing;

pub use genome::*;
pub use speciation::*;
