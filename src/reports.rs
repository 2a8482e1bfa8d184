//! High-level reports on the outcome of a solve.

/// The outcome of a solve, as seen by one worker.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Report {
    /// The worker found a complete valuation satisfying the formula.
    Satisfiable,

    /// The search space is exhausted with no satisfying valuation.
    ///
    /// From a single worker this is local exhaustion confirmed by every neighbour; the implicit
    /// abort protocol ensures each worker reaches the same conclusion.
    Unsatisfiable,

    /// Another worker ended the solve, either with a solution or an external abort.
    Aborted,

    /// No conclusion was reached.
    Unknown,
}

impl std::fmt::Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Satisfiable => write!(f, "satisfiable"),
            Self::Unsatisfiable => write!(f, "unsatisfiable"),
            Self::Aborted => write!(f, "aborted"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}
