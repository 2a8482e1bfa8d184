/*!
Configuration of a context and the surrounding worker.

All options are fixed before a solve begins; a clone of the configuration travels with each
worker, and nothing here is revised mid-search.
*/

/// The polarity given to the first branch of a decision.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Polarity {
    /// Try the polarity under which the picked literal satisfies its clause.
    Greedy,

    /// Try the polarity under which the picked literal falsifies its clause.
    Opposite,

    /// Always try true first.
    AlwaysTrue,

    /// Always try false first.
    AlwaysFalse,
}

/// The primary configuration structure.
#[derive(Clone, Debug)]
pub struct Config {
    /// The arity of the worker tree: each worker has up to this many children.
    pub branching_factor: usize,

    /// The heuristic used to order the two branches of a decision.
    pub polarity: Polarity,

    /// Flip the first branch polarity at random, regardless of the heuristic.
    pub random_first_pick: bool,

    /// Derive cell completions from the grid structure directly, without searching clauses.
    ///
    /// Only effective for formulas built from a grid.
    pub smart_propagation: bool,

    /// Learn a clause from each conflict and backjump, instead of backtracking one level.
    pub conflict_learning: bool,

    /// How many learned clauses the clause database holds.
    ///
    /// Compressed snapshots cover the original clauses only, so the bound has no bearing on
    /// the handoff layout.
    /// Once reached, conflicts fall back to chronological backtracking.
    pub conflict_clause_limit: usize,

    /// A seed for the source of randomness.
    pub seed: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            branching_factor: 2,
            polarity: Polarity::Greedy,
            random_first_pick: false,
            smart_propagation: true,
            conflict_learning: true,
            conflict_clause_limit: 128,
            seed: 0,
        }
    }
}
