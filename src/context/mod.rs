/*!
A context maintains a formula and the machinery of a solve.

Procedures relevant to a solve are implemented on contexts, spread across the
[procedures](crate::procedures) module by concern.

Contexts are generic over their source of randomness, which breaks the decision heuristic's ties.
[Context] fixes the source to the bundled [MinimalPCG32], seeded from the configuration, so that
any solve may be replayed exactly.
*/

use rand::{Rng, SeedableRng};

use crate::{
    config::Config,
    db::task::TaskStack,
    formula::Formula,
    generic::minimal_pcg::MinimalPCG32,
    structures::literal::Literal,
};

/// Counts of the operations made during a solve.
#[derive(Clone, Copy, Debug, Default)]
pub struct Counters {
    /// Decisions applied.
    pub decisions: u64,

    /// Forced assignments applied.
    pub propagations: u64,

    /// Conflicts hit.
    pub conflicts: u64,

    /// Clauses learned and stored.
    pub learned: u64,
}

/// A context over some source of randomness.
pub struct GenericContext<R: Rng> {
    /// The formula under evaluation.
    pub formula: Formula,

    /// Pending search tasks.
    pub tasks: TaskStack,

    /// The configuration of the context.
    pub config: Config,

    /// Counts of the operations made.
    pub counters: Counters,

    /// Learned clauses awaiting a worker to share them, collected only when sharing is on.
    pub learned_outbox: Vec<Vec<Literal>>,

    /// Whether learned clauses are collected for sharing.
    pub share_learned: bool,

    /// The source of randomness.
    pub rng: R,
}

impl<R: Rng> GenericContext<R> {
    /// A context over the formula, with the given source of randomness.
    ///
    /// The formula is sealed, fixing its compressed-state layout.
    pub fn with_rng(mut formula: Formula, config: Config, rng: R) -> Self {
        formula.seal(config.conflict_clause_limit);
        GenericContext {
            formula,
            tasks: TaskStack::default(),
            config,
            counters: Counters::default(),
            learned_outbox: Vec::default(),
            share_learned: false,
            rng,
        }
    }
}

/// A context using the bundled pseudorandom generator.
pub type Context = GenericContext<MinimalPCG32>;

impl Context {
    /// A context over the formula, seeded from the configuration.
    pub fn from_formula(formula: Formula, config: Config) -> Self {
        let rng = MinimalPCG32::seed_from_u64(config.seed);
        Self::with_rng(formula, config, rng)
    }
}
