use rand::RngCore;

/// An interface for genomes that can be managed by
/// an [`IslandSpeciationStrategy`].
///
/// The strategy never looks inside a genome: it only reads
/// and writes the bookkeeping values exposed here, and
/// changes genomes through a [`GenomeOperators`] implementation.
///
/// [`IslandSpeciationStrategy`]: crate::IslandSpeciationStrategy
pub trait Genome: Clone {
    /// Returns the genome's fitness, or `None` if it
    /// has not been evaluated yet.
    ///
    /// Lower values are better.
    fn fitness(&self) -> Option<f64>;

    /// Sets (or clears) the genome's fitness.
    fn set_fitness(&mut self, fitness: Option<f64>);

    /// Returns the island the genome was generated for.
    fn island(&self) -> Option<usize>;

    /// Tags the genome with the island that owns it.
    fn set_island(&mut self, island: usize);

    /// Returns the value of the strategy's generation
    /// counter when the genome was handed out.
    fn generation_id(&self) -> Option<usize>;

    /// Sets the genome's generation id.
    fn set_generation_id(&mut self, generation_id: usize);

    /// Returns a hash of the genome's structure, if the
    /// representation supports one. Islands keep at most
    /// one member per structural hash.
    fn structural_hash(&self) -> Option<u64> {
        None
    }
}

/// Mutation and crossover operators for a genome representation.
///
/// Implementors may keep mutable state across calls (e.g. an
/// innovation history), hence the `&mut self` receivers.
pub trait GenomeOperators<G> {
    /// Error returned when an operator cannot produce
    /// a valid genome.
    type Error: std::error::Error;

    /// Applies `count` mutations to `genome` in place.
    fn mutate(&mut self, count: usize, genome: &mut G, rng: &mut dyn RngCore)
        -> Result<(), Self::Error>;

    /// Combines two genomes into a child. `more_fit` is
    /// the parent with the better (lower) fitness.
    ///
    /// Must not modify either parent.
    fn crossover(&mut self, more_fit: &G, less_fit: &G, rng: &mut dyn RngCore)
        -> Result<G, Self::Error>;
}
