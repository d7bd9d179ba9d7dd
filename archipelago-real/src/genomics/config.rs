use serde::{Deserialize, Serialize};

/// Configuration data for real-valued genome operators.
///
/// # Note
/// All quantities expressing probabilities
/// should be in the range [0.0, 1.0]. Using
/// values that are not in this bound may result
/// in odd behaviours and/or incorrect programs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RealConfig {
    /// Number of values in a genome.
    pub length: usize,
    /// Chance of each value being changed by a mutation.
    pub nudge_chance: f64,
    /// Magnitude of bound on the uniform distribution
    /// of value nudges. It is assumed to be lesser than [`bound`].
    ///
    /// [`bound`]: RealConfig::bound
    pub nudge_power: f64,
    /// Chance that a changed value is reset to a random
    /// value within [`bound`] instead of being nudged.
    ///
    /// [`bound`]: RealConfig::bound
    pub reset_chance: f64,
    /// Maximum magnitude of a value.
    pub bound: f64,
    /// Chance that a value is averaged between parents during
    /// crossover, instead of copied from a randomly chosen parent.
    pub mate_by_averaging_chance: f64,
    /// Granularity at which values are compared when deciding
    /// whether two genomes have the same structure. 0 disables
    /// structural comparison.
    pub structure_resolution: f64,
}

impl RealConfig {
    /// Returns a "zero-valued" default configuration.
    /// All values are 0.
    ///
    /// # Note
    /// This value is not suitable for use in most experiments.
    /// It is meant as a way to fill in unused values during
    /// configuration instantiation.
    ///
    /// # Examples
    /// ```
    /// use archipelago_real::RealConfig;
    ///
    /// let cfg1 = RealConfig::zero();
    ///
    /// let cfg2 = RealConfig {
    ///     // Specify some values here...
    ///     length: 10,
    ///     nudge_chance: 0.2,
    ///     // Default the rest...
    ///     ..RealConfig::zero()
    /// };
    /// ```
    pub const fn zero() -> RealConfig {
        RealConfig {
            length: 0,
            nudge_chance: 0.0,
            nudge_power: 0.0,
            reset_chance: 0.0,
            bound: 0.0,
            mate_by_averaging_chance: 0.0,
            structure_resolution: 0.0,
        }
    }
}
