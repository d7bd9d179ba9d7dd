use super::errors::ConfigError;

use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// Method used to choose which islands are erased
/// during an extinction event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum IslandRankingMethod {
    /// Erase the islands whose best genomes are the worst.
    EraseWorst,
}

/// Method used to refill an island after it has been erased.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RepopulationMethod {
    /// Mutated copies of the global best genome.
    BestGenome,
    /// Crossover of random members of two surviving islands.
    RandomParents,
    /// Crossover of the best members of two surviving islands.
    BestParents,
    /// Mutated copies of members of the best surviving island.
    BestIsland,
}

impl RepopulationMethod {
    /// Returns whether the method breeds from two surviving islands.
    pub fn uses_parents(self) -> bool {
        matches!(self, Self::RandomParents | Self::BestParents)
    }

    /// Minimum number of islands that must survive
    /// an extinction event for this method to work.
    pub(crate) fn required_survivors(self) -> usize {
        if self.uses_parents() {
            2
        } else {
            1
        }
    }
}

impl FromStr for IslandRankingMethod {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "EraseWorst" => Ok(Self::EraseWorst),
            other => Err(ConfigError::UnknownRankingMethod(other.to_owned())),
        }
    }
}

impl FromStr for RepopulationMethod {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bestGenome" => Ok(Self::BestGenome),
            "randomParents" => Ok(Self::RandomParents),
            "bestParents" => Ok(Self::BestParents),
            "bestIsland" => Ok(Self::BestIsland),
            other => Err(ConfigError::UnknownRepopulationMethod(other.to_owned())),
        }
    }
}

impl fmt::Display for IslandRankingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EraseWorst => write!(f, "EraseWorst"),
        }
    }
}

impl fmt::Display for RepopulationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BestGenome => write!(f, "bestGenome"),
            Self::RandomParents => write!(f, "randomParents"),
            Self::BestParents => write!(f, "bestParents"),
            Self::BestIsland => write!(f, "bestIsland"),
        }
    }
}

/// Configuration data for an island speciation strategy.
///
/// # Note
/// The three generation rates need not sum to 1;
/// they are rescaled when the strategy is built.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StrategyConfig {
    /// Number of islands. Fixed for the strategy's lifetime.
    pub number_of_islands: usize,
    /// Maximum number of genomes in an island.
    pub max_island_size: usize,
    /// Relative frequency of mutation once all islands are full.
    pub mutation_rate: f64,
    /// Relative frequency of crossover between two members
    /// of the same island.
    pub intra_island_crossover_rate: f64,
    /// Relative frequency of crossover between members
    /// of different islands. Forced to 0 with a single island.
    pub inter_island_crossover_rate: f64,
    /// How islands are chosen for extinction.
    pub island_ranking_method: IslandRankingMethod,
    /// How erased islands are refilled.
    pub repopulation_method: RepopulationMethod,
    /// Number of inserted genomes between extinction
    /// events. 0 disables extinction.
    pub extinction_event_generation_number: usize,
    /// Mutations applied to each genome generated
    /// while repopulating an island.
    pub repopulation_mutations: usize,
    /// Islands erased per extinction event.
    pub islands_to_exterminate: usize,
    /// Whether extinction recurs every
    /// [`extinction_event_generation_number`] insertions,
    /// or fires only once.
    ///
    /// [`extinction_event_generation_number`]: StrategyConfig::extinction_event_generation_number
    pub repeat_extinction: bool,
    /// Expected total number of insertions in the search.
    /// If set, no extinction is triggered when fewer than
    /// one extinction interval of insertions remain.
    pub max_genomes: Option<usize>,
    /// Attempts made at generating a genome before
    /// giving up when the genome operators fail.
    pub max_generation_attempts: usize,
}

impl StrategyConfig {
    /// Returns a minimal default configuration:
    /// a single island of size 1, pure mutation,
    /// no extinction, and 10 generation attempts.
    ///
    /// # Note
    /// This value is not suitable for use in most experiments.
    /// It is meant as a way to abbreviate configuration
    /// instantiation, or to fill in unused values.
    ///
    /// # Examples
    /// ```
    /// use archipelago::StrategyConfig;
    ///
    /// let cfg = StrategyConfig {
    ///     number_of_islands: 4,
    ///     max_island_size: 10,
    ///     // Default the rest...
    ///     ..StrategyConfig::zero()
    /// };
    /// ```
    pub const fn zero() -> StrategyConfig {
        StrategyConfig {
            number_of_islands: 1,
            max_island_size: 1,
            mutation_rate: 1.0,
            intra_island_crossover_rate: 0.0,
            inter_island_crossover_rate: 0.0,
            island_ranking_method: IslandRankingMethod::EraseWorst,
            repopulation_method: RepopulationMethod::BestGenome,
            extinction_event_generation_number: 0,
            repopulation_mutations: 0,
            islands_to_exterminate: 0,
            repeat_extinction: false,
            max_genomes: None,
            max_generation_attempts: 10,
        }
    }

    /// Checks the configuration and returns the normalized rates.
    pub(crate) fn validate(&self) -> Result<Rates, ConfigError> {
        if self.number_of_islands == 0 {
            return Err(ConfigError::NoIslands);
        }
        if self.max_island_size == 0 {
            return Err(ConfigError::EmptyIslands);
        }
        if self.max_generation_attempts == 0 {
            return Err(ConfigError::NoGenerationAttempts);
        }
        if self.islands_to_exterminate > 0 {
            let survivors = self
                .number_of_islands
                .saturating_sub(self.islands_to_exterminate);
            let required = self.repopulation_method.required_survivors();
            if survivors < required {
                return Err(ConfigError::TooManyExterminations {
                    islands_to_exterminate: self.islands_to_exterminate,
                    number_of_islands: self.number_of_islands,
                    required_survivors: required,
                });
            }
        }
        Rates::normalized(
            self.mutation_rate,
            self.intra_island_crossover_rate,
            if self.number_of_islands == 1 {
                0.0
            } else {
                self.inter_island_crossover_rate
            },
        )
    }
}

/// The three generation rates, rescaled to sum to 1.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rates {
    pub mutation: f64,
    pub intra_island_crossover: f64,
    pub inter_island_crossover: f64,
}

/// Kind of genome produced once all islands are full.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Branch {
    Mutation,
    IntraIslandCrossover,
    InterIslandCrossover,
}

impl Rates {
    fn normalized(mutation: f64, intra: f64, inter: f64) -> Result<Rates, ConfigError> {
        for (name, value) in [
            ("mutation_rate", mutation),
            ("intra_island_crossover_rate", intra),
            ("inter_island_crossover_rate", inter),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidRate { name, value });
            }
        }
        let sum = mutation + intra + inter;
        if sum <= 0.0 || !sum.is_finite() {
            return Err(ConfigError::DegenerateRates);
        }
        Ok(Rates {
            mutation: mutation / sum,
            intra_island_crossover: intra / sum,
            inter_island_crossover: inter / sum,
        })
    }

    /// Maps a uniform sample in [0, 1) to a branch.
    pub(crate) fn branch(&self, r: f64) -> Branch {
        if r < self.mutation {
            Branch::Mutation
        } else if r < self.mutation + self.intra_island_crossover
            || self.inter_island_crossover == 0.0
        {
            Branch::IntraIslandCrossover
        } else {
            Branch::InterIslandCrossover
        }
    }
}
