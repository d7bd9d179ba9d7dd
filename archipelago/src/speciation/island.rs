use crate::Genome;

use ahash::RandomState;
use rand::seq::SliceRandom;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use std::collections::HashMap;
use std::fmt;

/// Lifecycle stage of an island.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IslandStatus {
    /// Being filled with mutated copies of the seed genome.
    Initializing,
    /// Has reached capacity since it was created or last erased.
    Filled,
    /// Erased by an extinction event and being refilled.
    Repopulating,
}

impl fmt::Display for IslandStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Initializing => write!(f, "initializing"),
            Self::Filled => write!(f, "filled"),
            Self::Repopulating => write!(f, "repopulating"),
        }
    }
}

/// Islands are bounded sub-populations of genomes,
/// evolved semi-independently from each other.
///
/// Members keep their insertion order. Once the island
/// is full, a new genome only gets in by replacing the
/// current worst member. If genomes report a
/// [structural hash], at most one member per hash is kept.
///
/// [structural hash]: crate::Genome::structural_hash
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Island<G> {
    id: usize,
    capacity: usize,
    genomes: Vec<G>,
    status: IslandStatus,
    erased: bool,
    erased_generation_id: Option<usize>,
    structures: HashMap<u64, usize, RandomState>,
}

/// Returns a member's fitness. Members are always evaluated.
pub(crate) fn member_fitness<G: Genome>(genome: &G) -> f64 {
    genome
        .fitness()
        .unwrap_or_else(|| panic!("island member without fitness detected"))
}

impl<G: Genome> Island<G> {
    /// Creates a new, empty island.
    ///
    /// # Examples
    /// ```
    /// use archipelago::Island;
    /// # use archipelago_real::RealGenome;
    ///
    /// // With `RealGenome` a suitable type implementing `Genome`...
    /// let island = Island::<RealGenome>::new(3, 10);
    ///
    /// assert_eq!(island.id(), 3);
    /// assert!(island.is_empty());
    /// assert!(!island.is_full());
    /// ```
    pub fn new(id: usize, capacity: usize) -> Island<G> {
        Island {
            id,
            capacity,
            genomes: Vec::with_capacity(capacity),
            status: IslandStatus::Initializing,
            erased: false,
            erased_generation_id: None,
            structures: HashMap::default(),
        }
    }

    /// Returns the island's index in its strategy.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Returns the maximum number of members.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.genomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genomes.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.genomes.len() >= self.capacity
    }

    pub fn status(&self) -> IslandStatus {
        self.status
    }

    /// Returns whether the island was cleared by an extinction
    /// event and has not accepted a genome since.
    pub fn is_erased(&self) -> bool {
        self.erased
    }

    /// Returns whether the island can be used as a source of
    /// parents: it holds genomes and is not waiting on repopulation.
    pub fn is_source(&self) -> bool {
        !self.erased && !self.genomes.is_empty()
    }

    /// Returns an iterator over the island's members,
    /// in insertion order.
    pub fn genomes(&self) -> impl Iterator<Item = &G> {
        self.genomes.iter()
    }

    /// Returns the member at `position`.
    pub fn get(&self, position: usize) -> Option<&G> {
        self.genomes.get(position)
    }

    /// Returns the member with the lowest fitness.
    /// Ties go to the earliest inserted member.
    ///
    /// # Examples
    /// ```
    /// use archipelago::{Genome, Island};
    /// # use archipelago_real::RealGenome;
    ///
    /// let mut island = Island::new(0, 5);
    /// # let mut g = RealGenome::new(vec![0.0]);
    /// // With `g` a genome tagged for island 0...
    /// for fitness in [3.0, 1.0, 2.0] {
    ///     let mut genome = g.clone();
    ///     genome.set_fitness(Some(fitness));
    ///     island.insert_genome(genome);
    /// }
    ///
    /// assert_eq!(island.best_fitness(), Some(1.0));
    /// assert_eq!(island.worst_fitness(), Some(3.0));
    /// ```
    pub fn best_genome(&self) -> Option<&G> {
        self.best_index().map(|i| &self.genomes[i])
    }

    /// Returns the member with the highest fitness.
    /// Ties go to the earliest inserted member.
    pub fn worst_genome(&self) -> Option<&G> {
        self.worst_index().map(|i| &self.genomes[i])
    }

    pub fn best_fitness(&self) -> Option<f64> {
        self.best_genome().map(member_fitness)
    }

    pub fn worst_fitness(&self) -> Option<f64> {
        self.worst_genome().map(member_fitness)
    }

    fn best_index(&self) -> Option<usize> {
        self.extreme_index(|candidate, current| candidate < current)
    }

    fn worst_index(&self) -> Option<usize> {
        self.extreme_index(|candidate, current| candidate > current)
    }

    fn extreme_index<F>(&self, replaces: F) -> Option<usize>
    where
        F: Fn(f64, f64) -> bool,
    {
        let mut extreme: Option<(usize, f64)> = None;
        for (i, genome) in self.genomes.iter().enumerate() {
            let fitness = member_fitness(genome);
            match extreme {
                Some((_, current)) if !replaces(fitness, current) => {}
                _ => extreme = Some((i, fitness)),
            }
        }
        extreme.map(|(i, _)| i)
    }

    /// Attempts to add an evaluated genome to the island.
    /// Returns the position the genome was placed at, or
    /// `None` if it was rejected.
    ///
    /// A genome is rejected if it was generated before the
    /// island was last erased, if it is not better than an
    /// existing member with the same structure, or if the
    /// island is full and it is not better than the worst member.
    ///
    /// # Panics
    /// This function will panic if the genome has no fitness,
    /// as islands only rank evaluated genomes.
    pub fn insert_genome(&mut self, genome: G) -> Option<usize> {
        if self.is_stale(&genome) {
            log::debug!(
                "island {} rejected genome {:?} generated before its erasure",
                self.id,
                genome.generation_id()
            );
            return None;
        }
        let fitness = member_fitness(&genome);
        let hash = genome.structural_hash();

        let position = match hash.and_then(|h| self.structures.get(&h).copied()) {
            Some(duplicate) => {
                if fitness < member_fitness(&self.genomes[duplicate]) {
                    self.genomes[duplicate] = genome;
                    duplicate
                } else {
                    return None;
                }
            }
            None if !self.is_full() => {
                self.genomes.push(genome);
                self.genomes.len() - 1
            }
            None => {
                let worst = self.worst_index()?;
                if fitness < member_fitness(&self.genomes[worst]) {
                    let displaced = std::mem::replace(&mut self.genomes[worst], genome);
                    self.forget_structure(&displaced, worst);
                    worst
                } else {
                    return None;
                }
            }
        };

        if let Some(hash) = hash {
            self.structures.insert(hash, position);
        }
        self.erased = false;
        if self.is_full() {
            self.status = IslandStatus::Filled;
        }
        Some(position)
    }

    fn is_stale(&self, genome: &G) -> bool {
        match (self.erased_generation_id, genome.generation_id()) {
            (Some(erased_at), Some(generated_at)) => generated_at < erased_at,
            _ => false,
        }
    }

    fn forget_structure(&mut self, displaced: &G, position: usize) {
        if let Some(hash) = displaced.structural_hash() {
            if self.structures.get(&hash) == Some(&position) {
                self.structures.remove(&hash);
            }
        }
    }

    /// Removes every member and marks the island as erased.
    /// Genomes generated before `generation_id` will be
    /// rejected from now on.
    pub(crate) fn erase(&mut self, generation_id: usize) {
        self.genomes.clear();
        self.structures.clear();
        self.erased = true;
        self.erased_generation_id = Some(generation_id);
        self.status = IslandStatus::Repopulating;
    }

    /// Returns a uniformly chosen member.
    pub(crate) fn random_genome(&self, rng: &mut dyn RngCore) -> Option<&G> {
        self.genomes.choose(rng)
    }

    /// Returns two distinct, uniformly chosen members.
    pub(crate) fn two_random_genomes(&self, rng: &mut dyn RngCore) -> Option<(&G, &G)> {
        crate::rng::distinct_pair(rng, self.genomes.len())
            .map(|(a, b)| (&self.genomes[a], &self.genomes[b]))
    }
}

impl<G: Genome> fmt::Display for Island<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Island {} ({}{}): {}/{} genomes",
            self.id,
            self.status,
            if self.erased { ", erased" } else { "" },
            self.genomes.len(),
            self.capacity
        )?;
        if let (Some(best), Some(worst)) = (self.best_fitness(), self.worst_fitness()) {
            write!(f, ", best fitness {}, worst fitness {}", best, worst)?;
        }
        for genome in &self.genomes {
            write!(
                f,
                "\n\tgenome {:?}: fitness {}",
                genome.generation_id(),
                member_fitness(genome)
            )?;
        }
        Ok(())
    }
}
