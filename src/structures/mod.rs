//! Abstract elements of a solve: literals and clauses.

pub mod clause;
pub mod literal;
