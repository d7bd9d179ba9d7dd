use super::IslandSpeciationStrategy;
use super::island::member_fitness;

use crate::Genome;

use std::fmt;

/// Defines different possible reporting levels for logging.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportingLevel {
    /// Clones every island member.
    AllGenomes,
    /// Clones each island's best member.
    IslandChampions,
    /// Clones only the global best genome.
    GlobalBest,
    /// Clones no genomes.
    NoGenomes,
}

/// A snapshot of a strategy.
#[derive(Clone, Debug)]
pub struct Log<G> {
    pub generated_genomes: usize,
    pub inserted_genomes: usize,
    pub extinctions: usize,
    pub global_best_fitness: Option<f64>,
    /// Fitness statistics per island, `None` for empty islands.
    pub island_stats: Vec<Option<Stats>>,
    pub sample: GenerationMemberRecord<G>,
}

impl<G> fmt::Display for Log<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Log {{\n\
            \tgenerated_genomes: {}\n\
            \tinserted_genomes: {}\n\
            \textinctions: {}\n\
            \tglobal_best_fitness: {:?}\n\
            {}}}",
            self.generated_genomes,
            self.inserted_genomes,
            self.extinctions,
            self.global_best_fitness,
            self.island_stats
                .iter()
                .enumerate()
                .map(|(i, stats)| format!("\tisland {}: {:?}\n", i, stats))
                .collect::<Vec<_>>()
                .join("")
        )
    }
}

/// A struct for reporting basic statistical data.
#[derive(Clone, Debug, PartialEq)]
pub struct Stats {
    pub maximum: f64,
    pub minimum: f64,
    pub mean: f64,
    pub median: f64,
}

impl Stats {
    /// Returns statistics about numbers in a sequence,
    /// or `None` if the sequence is empty.
    ///
    /// # Examples
    /// ```
    /// use archipelago::logging::Stats;
    ///
    /// let stats = Stats::from([-2.0, -1.0, 0.5, 1.0, 1.5].iter().copied()).unwrap();
    /// assert_eq!(stats.maximum, 1.5);
    /// assert_eq!(stats.minimum, -2.0);
    /// assert_eq!(stats.mean, 0.0);
    /// assert_eq!(stats.median, 0.5);
    /// ```
    pub fn from(data: impl Iterator<Item = f64>) -> Option<Stats> {
        let mut data: Vec<f64> = data.collect();
        if data.is_empty() {
            return None;
        }
        let (mut max, mut min, mut sum) = (f64::MIN, f64::MAX, 0.0);
        for d in &data {
            max = d.max(max);
            min = d.min(min);
            sum += d;
        }
        let mean = sum / data.len() as f64;

        data.sort_by(|a, b| {
            a.partial_cmp(b)
                .unwrap_or_else(|| panic!("invalid statistic detected (NaN)"))
        });
        let mid = data.len() / 2;
        let median = if data.len() % 2 == 0 {
            (data[mid - 1] + data[mid]) / 2.0
        } else {
            data[mid]
        };

        Some(Stats {
            maximum: max,
            minimum: min,
            mean,
            median,
        })
    }
}

/// A reporting-level dependant store
/// of genomes from a strategy.
#[derive(Clone, Debug)]
pub enum GenerationMemberRecord<G> {
    /// Island ids and their members.
    Islands(Vec<(usize, Vec<G>)>),
    /// Island ids and their best members, for non-empty islands.
    IslandChampions(Vec<(usize, G)>),
    /// Only the global best genome.
    GlobalBest(G),
    /// Empty.
    None,
}

/// A log of the evolution of a strategy over time.
#[derive(Clone, Debug)]
pub struct EvolutionLogger<G> {
    reporting_level: ReportingLevel,
    logs: Vec<Log<G>>,
}

impl<G: Genome> EvolutionLogger<G> {
    /// Returns a logger with the appropiate reporting level.
    ///
    /// # Examples
    /// ```
    /// # use archipelago_real::RealGenome as G;
    /// use archipelago::logging::{EvolutionLogger, ReportingLevel};
    ///
    /// // With `G` a suitable type implementing `Genome`...
    /// let logger = EvolutionLogger::<G>::new(ReportingLevel::NoGenomes);
    /// ```
    pub fn new(reporting_level: ReportingLevel) -> EvolutionLogger<G> {
        EvolutionLogger {
            reporting_level,
            logs: vec![],
        }
    }

    /// Store a snapshot of a strategy.
    ///
    /// # Examples
    /// ```
    /// # use archipelago_real::RealGenome as G;
    /// use archipelago::{IslandSpeciationStrategy, StrategyConfig};
    /// use archipelago::logging::{EvolutionLogger, ReportingLevel};
    ///
    /// // With `G` a suitable type implementing `Genome`...
    /// let mut logger = EvolutionLogger::<G>::new(ReportingLevel::NoGenomes);
    /// # let seed = G::new(vec![0.0; 4]);
    /// let strategy = IslandSpeciationStrategy::new(StrategyConfig::zero(), seed).unwrap();
    ///
    /// // Do something with the strategy...
    /// // Then log a snapshot.
    /// logger.log(&strategy);
    /// assert_eq!(logger.iter().count(), 1);
    /// ```
    pub fn log(&mut self, strategy: &IslandSpeciationStrategy<G>) {
        let sample = match self.reporting_level {
            ReportingLevel::AllGenomes => GenerationMemberRecord::Islands(
                strategy
                    .islands()
                    .map(|i| (i.id(), i.genomes().cloned().collect()))
                    .collect(),
            ),
            ReportingLevel::IslandChampions => GenerationMemberRecord::IslandChampions(
                strategy
                    .islands()
                    .filter_map(|i| i.best_genome().map(|g| (i.id(), g.clone())))
                    .collect(),
            ),
            ReportingLevel::GlobalBest => match strategy.global_best_genome() {
                Some(best) => GenerationMemberRecord::GlobalBest(best.clone()),
                None => GenerationMemberRecord::None,
            },
            ReportingLevel::NoGenomes => GenerationMemberRecord::None,
        };
        self.logs.push(Log {
            generated_genomes: strategy.generated_genomes(),
            inserted_genomes: strategy.inserted_genomes(),
            extinctions: strategy.extinctions(),
            global_best_fitness: strategy.global_best_genome().map(member_fitness),
            island_stats: strategy
                .islands()
                .map(|i| Stats::from(i.genomes().map(member_fitness)))
                .collect(),
            sample,
        })
    }

    /// Iterate over all logged snapshots.
    ///
    /// # Examples
    /// ```
    /// # use archipelago_real::RealGenome as G;
    /// use archipelago::logging::{EvolutionLogger, ReportingLevel};
    ///
    /// // With `G` a suitable type implementing `Genome`...
    /// let logger = EvolutionLogger::<G>::new(ReportingLevel::AllGenomes);
    /// // Log some stuff... then
    /// for log in logger.iter() {
    ///     println!("{}", log);
    /// }
    /// ```
    pub fn iter(&self) -> impl Iterator<Item = &Log<G>> {
        self.logs.iter()
    }

    /// Returns the most recent snapshot.
    pub fn last(&self) -> Option<&Log<G>> {
        self.logs.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::speciation::StrategyConfig;
    use crate::testing::{TestGenome, TestOperators};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn strategy() -> IslandSpeciationStrategy<TestGenome> {
        let mut rng = StdRng::seed_from_u64(0);
        let mut operators = TestOperators::default();
        let mut strategy = IslandSpeciationStrategy::new(
            StrategyConfig {
                number_of_islands: 3,
                max_island_size: 2,
                ..StrategyConfig::zero()
            },
            TestGenome::seed(),
        )
        .unwrap();
        for fitness in [4.0, 1.0, 2.0, 6.0] {
            let mut genome = strategy.generate_genome(&mut rng, &mut operators, 1).unwrap();
            genome.set_fitness(Some(fitness));
            strategy.insert_genome(genome).unwrap();
        }
        strategy
    }

    #[test]
    fn stats() {
        let odd = Stats::from([3.0, 1.0, 2.0].iter().copied()).unwrap();
        assert_eq!(odd.median, 2.0);
        let even = Stats::from([4.0, 1.0, 3.0, 2.0].iter().copied()).unwrap();
        assert_eq!(even.median, 2.5);
        assert_eq!(even.mean, 2.5);
        assert_eq!(even.maximum, 4.0);
        assert_eq!(even.minimum, 1.0);
        assert_eq!(Stats::from(std::iter::empty()), None);
    }

    #[test]
    fn snapshot_counters_and_stats() {
        let strategy = strategy();
        let mut logger = EvolutionLogger::new(ReportingLevel::NoGenomes);
        logger.log(&strategy);
        let log = logger.last().unwrap();
        assert_eq!(log.generated_genomes, 4);
        assert_eq!(log.inserted_genomes, 4);
        assert_eq!(log.extinctions, 0);
        assert_eq!(log.global_best_fitness, Some(1.0));
        assert_eq!(log.island_stats[0].as_ref().unwrap().median, 5.0);
        assert_eq!(log.island_stats[1].as_ref().unwrap().maximum, 1.0);
        assert_eq!(log.island_stats[2].as_ref().unwrap().minimum, 2.0);
        assert!(matches!(log.sample, GenerationMemberRecord::None));
        assert!(log.to_string().contains("global_best_fitness: Some(1.0)"));
    }

    #[test]
    fn reporting_levels() {
        let strategy = strategy();

        let mut logger = EvolutionLogger::new(ReportingLevel::AllGenomes);
        logger.log(&strategy);
        match &logger.last().unwrap().sample {
            GenerationMemberRecord::Islands(islands) => {
                assert_eq!(islands.len(), 3);
                assert_eq!(islands[0].1.len(), 2);
            }
            other => panic!("unexpected record {:?}", other),
        }

        let mut logger = EvolutionLogger::new(ReportingLevel::IslandChampions);
        logger.log(&strategy);
        match &logger.last().unwrap().sample {
            GenerationMemberRecord::IslandChampions(champions) => {
                let fitnesses: Vec<_> = champions.iter().map(|(id, g)| (*id, g.fitness)).collect();
                assert_eq!(fitnesses, vec![(0, Some(4.0)), (1, Some(1.0)), (2, Some(2.0))]);
            }
            other => panic!("unexpected record {:?}", other),
        }

        let mut logger = EvolutionLogger::new(ReportingLevel::GlobalBest);
        logger.log(&strategy);
        logger.log(&strategy);
        assert_eq!(logger.iter().count(), 2);
        assert!(matches!(
            &logger.last().unwrap().sample,
            GenerationMemberRecord::GlobalBest(g) if g.fitness == Some(1.0)
        ));
    }
}
