//! Literals --- variables paired with a (boolean) polarity.
//!
//! A literal with polarity `true` is satisfied when its variable is valued true, and falsified
//! when the variable is valued false; dually for polarity `false`.
//!
//! Literals are ordered by variable and then polarity, with `false` strictly less than `true`,
//! and are hashable for straightforward use as indices of maps.

/// The index of a variable in the [variable table](crate::db::variable).
pub type VariableId = u32;

/// A variable paired with a polarity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Literal {
    variable: VariableId,
    polarity: bool,
}

impl Literal {
    /// A fresh literal, specified by pairing a variable with a polarity.
    pub fn new(variable: VariableId, polarity: bool) -> Self {
        Literal { variable, polarity }
    }

    /// The variable of the literal.
    pub fn variable(&self) -> VariableId {
        self.variable
    }

    /// The polarity of the literal.
    pub fn polarity(&self) -> bool {
        self.polarity
    }

    /// The negation of the literal.
    pub fn negate(&self) -> Self {
        Literal {
            variable: self.variable,
            polarity: !self.polarity,
        }
    }
}

impl std::fmt::Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.polarity {
            true => write!(f, "{}", self.variable),
            false => write!(f, "-{}", self.variable),
        }
    }
}
