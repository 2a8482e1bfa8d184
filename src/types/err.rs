//! Error types used in the library.
//!
//! Two classes of failure are kept apart:
//!
//! - Errors in this module mark broken invariants --- a variable valued both ways, a stale clause
//!   id, a malformed task stack.
//!   These are unrecoverable programming-contract failures and propagate to the caller, which is
//!   expected to abort with diagnostics.
//! - Search-level failure --- a clause falsified by propagation --- is ordinary control flow and
//!   is *not* represented here.
//!   See [PropagationOutcome](crate::procedures::propagate::PropagationOutcome).
//
//  Names of the error enums overlap with corresponding structs, so err::{self} is often used to
//  prefix use of the types with `err::`.

use crate::structures::clause::ClauseId;
use crate::structures::literal::VariableId;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    Analysis(AnalysisError),
    Build(BuildError),
    ClauseDb(ClauseDbError),
    Journal(JournalError),
    Parse(ParseError),
    Transfer(TransferError),
    Variable(VariableError),

    /// A state no sequence of sound operations leads to.
    InvalidState,
}

/// Noted errors during conflict analysis.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AnalysisError {
    /// A literal of a conflicting clause was not valued.
    UnassignedLiteral(VariableId),
}

impl From<AnalysisError> for ErrorKind {
    fn from(e: AnalysisError) -> Self {
        ErrorKind::Analysis(e)
    }
}

/// Noted errors when building a formula.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildError {
    /// The side length of a puzzle is not the square of its block size.
    GridShape,

    /// A given cell lies outside the grid, or its value is out of range.
    GivenOutOfRange,

    /// Two given cells occupy the same position with different values.
    ConflictingGivens,

    /// A clause mentions a variable the table does not hold.
    UnknownVariable(VariableId),

    /// Clauses were added after the formula was sealed.
    Sealed,
}

impl From<BuildError> for ErrorKind {
    fn from(e: BuildError) -> Self {
        ErrorKind::Build(e)
    }
}

/// Errors in the clause database.
///
/// Each of these marks a stale or malformed access, and is fatal.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ClauseDbError {
    /// A clause id beyond the stored range.
    StaleId(ClauseId),

    /// A drop of a clause which is already dropped, or a restore of one which is not.
    DropMismatch(ClauseId),

    /// An active clause with no live literals was found outside of conflict handling.
    DeadActiveClause(ClauseId),
}

impl From<ClauseDbError> for ErrorKind {
    fn from(e: ClauseDbError) -> Self {
        ErrorKind::ClauseDb(e)
    }
}

/// Errors in the undo journal.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum JournalError {
    /// A backtrack with no open decision frame.
    NoOpenFrame,

    /// An insertion at a depth or position the journal does not hold.
    OutOfRange,
}

impl From<JournalError> for ErrorKind {
    fn from(e: JournalError) -> Self {
        ErrorKind::Journal(e)
    }
}

/// Errors during puzzle parsing.
///
/// Malformed input fails fast, before any worker begins a search.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ParseError {
    /// The `n sqrt_n count` header is missing or malformed.
    Header,

    /// Some problem with the given at the line.
    Given(usize),

    /// Fewer givens than the header promised.
    MissingGivens,
}

impl From<ParseError> for ErrorKind {
    fn from(e: ParseError) -> Self {
        ErrorKind::Parse(e)
    }
}

/// Errors while compressing or reconstructing search state.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TransferError {
    /// A compressed state whose word count does not match the formula layout.
    WordCount,

    /// A variable marked both true and false in a compressed state.
    Inconsistent(VariableId),
}

impl From<TransferError> for ErrorKind {
    fn from(e: TransferError) -> Self {
        ErrorKind::Transfer(e)
    }
}

/// Errors in the variable table.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum VariableError {
    /// An assignment of a variable which already holds a value.
    DoubleAssignment(VariableId),

    /// A clear of a variable which holds no value.
    NotAssigned(VariableId),
}

impl From<VariableError> for ErrorKind {
    fn from(e: VariableError) -> Self {
        ErrorKind::Variable(e)
    }
}
