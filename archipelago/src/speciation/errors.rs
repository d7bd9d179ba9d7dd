use thiserror::Error;

/// An error type indicating an unusable strategy configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The strategy was configured with no islands.
    #[error("number_of_islands must be at least 1")]
    NoIslands,
    /// Islands were configured with no capacity.
    #[error("max_island_size must be at least 1")]
    EmptyIslands,
    /// A generation rate is negative or not a number.
    #[error("{name} must be a finite non-negative number, got {value}")]
    InvalidRate { name: &'static str, value: f64 },
    /// The generation rates cannot be rescaled to sum to 1.
    #[error("generation rates sum to zero (inter-island crossover is disabled with a single island)")]
    DegenerateRates,
    /// An extinction event would leave too few islands
    /// to repopulate from.
    #[error(
        "exterminating {islands_to_exterminate} of {number_of_islands} islands leaves fewer \
         than the {required_survivors} survivors needed for repopulation"
    )]
    TooManyExterminations {
        islands_to_exterminate: usize,
        number_of_islands: usize,
        required_survivors: usize,
    },
    /// Genome generation was allowed no attempts.
    #[error("max_generation_attempts must be at least 1")]
    NoGenerationAttempts,
    /// An unrecognized island ranking method name.
    #[error("unknown island ranking method {0:?}")]
    UnknownRankingMethod(String),
    /// An unrecognized repopulation method name.
    #[error("unknown repopulation method {0:?}")]
    UnknownRepopulationMethod(String),
}

/// An error type indicating a failure to generate a genome.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The genome operators failed on every attempt.
    #[error(
        "failed to generate a genome for island {island} after {attempts} attempts \
         ({generated_genomes} genomes generated so far): {last_error}"
    )]
    AttemptsExhausted {
        island: usize,
        generated_genomes: usize,
        attempts: usize,
        last_error: String,
    },
    /// A repopulating island has no islands to breed from.
    #[error("island {island} cannot be repopulated: only {survivors} surviving island(s)")]
    NoRepopulationSource { island: usize, survivors: usize },
}

/// An error type indicating a genome that can not
/// be handed to the strategy.
#[derive(Debug, Error)]
pub enum InsertionError {
    /// The genome has no fitness value.
    #[error("attempted insertion of unevaluated genome (generation id {generation_id:?})")]
    Unevaluated { generation_id: Option<usize> },
    /// The genome's fitness is NaN and can not be ranked.
    #[error("attempted insertion of genome with NaN fitness (generation id {generation_id:?})")]
    NanFitness { generation_id: Option<usize> },
    /// The genome's island id is missing or out of range.
    #[error("attempted insertion into island {island:?} of {number_of_islands}")]
    UnknownIsland {
        island: Option<usize>,
        number_of_islands: usize,
    },
}
