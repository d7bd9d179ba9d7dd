use archipelago::logging::{EvolutionLogger, ReportingLevel, Stats};
use archipelago::{
    Genome, IslandSpeciationStrategy, RepopulationMethod, SharedStrategy, StrategyConfig,
};
use archipelago_real::{RealConfig, RealGenome, RealOperators};

use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Run parameters, loaded from a RON file.
#[derive(Clone, Debug, Serialize, Deserialize)]
struct RunConfig {
    strategy: StrategyConfig,
    genome: RealConfig,
    /// Value every coordinate of the seed genome starts at.
    seed_value: f64,
    workers: usize,
    evaluations: usize,
    stir_mutations: usize,
    seed: u64,
    /// Evaluations between logged snapshots.
    log_interval: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        let evaluations = 20_000;
        RunConfig {
            strategy: StrategyConfig {
                number_of_islands: 8,
                max_island_size: 20,
                mutation_rate: 0.6,
                intra_island_crossover_rate: 0.3,
                inter_island_crossover_rate: 0.1,
                repopulation_method: RepopulationMethod::BestParents,
                extinction_event_generation_number: 2_000,
                repopulation_mutations: 2,
                islands_to_exterminate: 2,
                repeat_extinction: true,
                max_genomes: Some(evaluations),
                ..StrategyConfig::zero()
            },
            genome: RealConfig {
                length: 10,
                nudge_chance: 0.3,
                nudge_power: 0.5,
                reset_chance: 0.05,
                bound: 5.0,
                mate_by_averaging_chance: 0.4,
                structure_resolution: 1e-3,
            },
            seed_value: 4.0,
            workers: 4,
            evaluations,
            stir_mutations: 5,
            seed: 42,
            log_interval: 5_000,
        }
    }
}

fn sphere(genome: &RealGenome) -> f64 {
    genome.values().iter().map(|x| x * x).sum()
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    if args.get(1).map(String::as_str) == Some("--example") {
        let pretty = ron::ser::PrettyConfig::default();
        match ron::ser::to_string_pretty(&RunConfig::default(), pretty) {
            Ok(config) => println!("{}", config),
            Err(e) => eprintln!("Error writing example configuration: {}", e),
        }
        return;
    }

    let config: RunConfig = match args.get(1) {
        Some(path) => {
            let text = fs::read_to_string(path).unwrap_or_else(|e| {
                eprintln!("Error reading config file: {}", e);
                std::process::exit(1);
            });
            ron::from_str(&text).unwrap_or_else(|e| {
                eprintln!("Error parsing config: {}", e);
                std::process::exit(1);
            })
        }
        None => RunConfig::default(),
    };

    let seed_genome = RealGenome::new(vec![config.seed_value; config.genome.length]);
    let strategy = IslandSpeciationStrategy::new(config.strategy.clone(), seed_genome)
        .unwrap_or_else(|e| {
            eprintln!("Invalid strategy configuration: {}", e);
            std::process::exit(1);
        });

    let strategy = run(&config, SharedStrategy::new(strategy));

    println!("{}", strategy);
    if let Some(best) = strategy.global_best_genome() {
        println!("Best genome: {}", best);
        match ron::to_string(best) {
            Ok(best) => println!("{}", best),
            Err(e) => eprintln!("{}", e),
        }
    }
}

/// Evolves the shared strategy with `config.workers` threads
/// until `config.evaluations` genomes have been evaluated.
fn run(
    config: &RunConfig,
    shared: SharedStrategy<RealGenome>,
) -> IslandSpeciationStrategy<RealGenome> {
    let evaluations = AtomicUsize::new(0);
    let logger = Mutex::new(EvolutionLogger::new(ReportingLevel::IslandChampions));
    let fitnesses = Mutex::new(vec![]);

    (0..config.workers).into_par_iter().for_each(|worker| {
        let mut rng = StdRng::seed_from_u64(config.seed.wrapping_add(worker as u64));
        let mut operators = RealOperators::new(config.genome.clone());

        while evaluations.fetch_add(1, Ordering::Relaxed) < config.evaluations {
            let mut genome =
                match shared.generate_genome(&mut rng, &mut operators, config.stir_mutations) {
                    Ok(genome) => genome,
                    Err(e) => {
                        log::error!("worker {} stopped: {}", worker, e);
                        break;
                    }
                };
            let fitness = sphere(&genome);
            genome.set_fitness(Some(fitness));
            fitnesses
                .lock()
                .unwrap_or_else(|_| panic!("fitness record poisoned"))
                .push(fitness);

            if let Err(e) = shared.insert_genome(genome) {
                log::error!("worker {} stopped: {}", worker, e);
                break;
            }

            let inserted = shared.read().inserted_genomes();
            if config.log_interval > 0 && inserted % config.log_interval == 0 {
                let mut logger = logger
                    .lock()
                    .unwrap_or_else(|_| panic!("logger poisoned"));
                logger.log(&shared.read());
                if let Some(log) = logger.last() {
                    log::info!("{}", log);
                }
            }
        }
    });

    let fitnesses = fitnesses
        .into_inner()
        .unwrap_or_else(|_| panic!("fitness record poisoned"));
    println!(
        "Evaluated {} genomes, fitness {:?}",
        fitnesses.len(),
        Stats::from(fitnesses.into_iter())
    );

    shared
        .try_unwrap()
        .unwrap_or_else(|_| panic!("strategy still shared after all workers finished"))
}
