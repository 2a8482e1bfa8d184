//! Clauses --- fixed, ordered disjunctions of literals.
//!
//! The literal list of a clause is set at creation and never revised.
//! All bookkeeping about how much of a clause the current valuation has consumed lives with the
//! [clause database](crate::db::clause), not the clause itself.

use crate::structures::literal::Literal;

/// The stable index of a clause in the [clause database](crate::db::clause).
///
/// Ids are never reused, and a dropped clause remains addressable by its id.
pub type ClauseId = u32;

/// An immutable disjunction of literals.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Clause {
    literals: Vec<Literal>,
}

impl Clause {
    /// A clause over the given literals, in the given (fixed) order.
    pub fn new(literals: Vec<Literal>) -> Self {
        Clause { literals }
    }

    /// The literals of the clause, in fixed order.
    pub fn literals(&self) -> &[Literal] {
        &self.literals
    }

    /// The count of literals in the clause.
    pub fn len(&self) -> usize {
        self.literals.len()
    }

    /// True if the clause holds no literals.
    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    /// The polarity the clause requires of `variable`, if the variable appears in the clause.
    pub fn polarity_of(&self, variable: crate::structures::literal::VariableId) -> Option<bool> {
        self.literals
            .iter()
            .find(|literal| literal.variable() == variable)
            .map(|literal| literal.polarity())
    }
}

impl std::fmt::Display for Clause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(")?;
        for (index, literal) in self.literals.iter().enumerate() {
            if index > 0 {
                write!(f, " \\/ ")?;
            }
            write!(f, "{literal}")?;
        }
        write!(f, ")")
    }
}
