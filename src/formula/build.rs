/*!
Building formulas from Sudoku puzzles.

A puzzle of side `n` (with `n` the square of a block side) becomes a formula over `n³` variables,
one per (value, row, column) triple, with the variable true exactly when the cell holds the
value.

The encoding enumerates:

- per cell, at most one value: a binary clause per value pair,
- per cell, at least one value: an n-ary positive clause,
- per row, column and block, at most one cell per value: a binary clause per cell pair.

Given cells enter as unit clauses, so the usual propagation machinery applies them with no
special casing.

The accepted file format is a whitespace-separated stream: a header `n sqrt_n count`, then
`count` given entries of the shape `value 1 row col`.
The second field is a cell count, fixed at one; sum constraints over larger cell groups are not
supported.
*/

use crate::{
    db::variable::GridCell,
    formula::{Formula, Grid},
    misc::log::targets,
    structures::{
        clause::ClauseId,
        literal::{Literal, VariableId},
    },
    types::err,
};

/// One given cell of a puzzle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Given {
    pub row: u16,
    pub col: u16,

    /// The value of the cell, one-based.
    pub value: u16,
}

/// A parsed puzzle, not yet encoded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Puzzle {
    /// Side length of the grid.
    pub n: u16,

    /// Side length of a block.
    pub sqrt_n: u16,

    /// The given cells.
    pub givens: Vec<Given>,
}

impl Puzzle {
    /// Parses a puzzle from its file representation.
    pub fn parse(text: &str) -> Result<Self, err::ParseError> {
        let mut tokens = text.split_whitespace();
        let mut header = || -> Option<u16> { tokens.next()?.parse().ok() };

        let n = header().ok_or(err::ParseError::Header)?;
        let sqrt_n = header().ok_or(err::ParseError::Header)?;
        let count = header().ok_or(err::ParseError::Header)? as usize;

        let mut givens = Vec::with_capacity(count);
        for index in 0..count {
            let mut field = || -> Option<u16> { tokens.next()?.parse().ok() };
            let value = field().ok_or(err::ParseError::MissingGivens)?;
            let cells = field().ok_or(err::ParseError::MissingGivens)?;
            if cells != 1 {
                return Err(err::ParseError::Given(index));
            }
            let row = field().ok_or(err::ParseError::Given(index))?;
            let col = field().ok_or(err::ParseError::Given(index))?;
            givens.push(Given { row, col, value });
        }
        Ok(Puzzle { n, sqrt_n, givens })
    }

    /// Encodes the puzzle as a formula.
    pub fn formula(&self) -> Result<Formula, err::BuildError> {
        sudoku_formula(self.n, self.sqrt_n, &self.givens)
    }
}

/// The variable of a (value, row, column) triple, with `k` the zero-based value.
fn variable_of(n: u16, k: u16, row: u16, col: u16) -> VariableId {
    let n = n as VariableId;
    (k as VariableId * n * n) + (row as VariableId * n) + col as VariableId
}

/// A binary clause requiring at most one of two variables.
fn exclusion(variable_a: VariableId, variable_b: VariableId) -> Vec<Literal> {
    vec![
        Literal::new(variable_a, false),
        Literal::new(variable_b, false),
    ]
}

/// Encodes a Sudoku grid with the given cells fixed.
pub fn sudoku_formula(
    n: u16,
    sqrt_n: u16,
    givens: &[Given],
) -> Result<Formula, err::BuildError> {
    if sqrt_n * sqrt_n != n || n == 0 {
        return Err(err::BuildError::GridShape);
    }
    for given in givens {
        if given.row >= n || given.col >= n || given.value == 0 || given.value > n {
            return Err(err::BuildError::GivenOutOfRange);
        }
        for other in givens {
            if other.row == given.row && other.col == given.col && other.value != given.value {
                return Err(err::BuildError::ConflictingGivens);
            }
        }
    }

    let mut formula = Formula::new((n as usize).pow(3));
    for k in 0..n {
        for row in 0..n {
            for col in 0..n {
                formula.variables.set_cell(
                    variable_of(n, k, row, col),
                    GridCell {
                        row,
                        col,
                        value: k + 1,
                    },
                );
            }
        }
    }

    // Per cell, at most one value.
    for row in 0..n {
        for col in 0..n {
            for k1 in 0..n {
                for k2 in (k1 + 1)..n {
                    formula.add_clause(exclusion(
                        variable_of(n, k1, row, col),
                        variable_of(n, k2, row, col),
                    ))?;
                }
            }
        }
    }

    // Per cell, at least one value; these clauses anchor the grid map.
    let mut cell_clause: Vec<ClauseId> = Vec::with_capacity(n as usize * n as usize);
    for row in 0..n {
        for col in 0..n {
            let literals = (0..n)
                .map(|k| Literal::new(variable_of(n, k, row, col), true))
                .collect();
            cell_clause.push(formula.add_clause(literals)?);
        }
    }

    // Per row and value, at most one column.
    for k in 0..n {
        for row in 0..n {
            for col1 in 0..n {
                for col2 in (col1 + 1)..n {
                    formula.add_clause(exclusion(
                        variable_of(n, k, row, col1),
                        variable_of(n, k, row, col2),
                    ))?;
                }
            }
        }
    }

    // Per column and value, at most one row.
    for k in 0..n {
        for col in 0..n {
            for row1 in 0..n {
                for row2 in (row1 + 1)..n {
                    formula.add_clause(exclusion(
                        variable_of(n, k, row1, col),
                        variable_of(n, k, row2, col),
                    ))?;
                }
            }
        }
    }

    // Per block and value, at most one cell, skipping pairs a row or column rule covers.
    for k in 0..n {
        for block_row in 0..sqrt_n {
            for block_col in 0..sqrt_n {
                for local1 in 0..n {
                    for local2 in (local1 + 1)..n {
                        let row1 = (block_row * sqrt_n) + (local1 / sqrt_n);
                        let col1 = (block_col * sqrt_n) + (local1 % sqrt_n);
                        let row2 = (block_row * sqrt_n) + (local2 / sqrt_n);
                        let col2 = (block_col * sqrt_n) + (local2 % sqrt_n);
                        if row1 == row2 || col1 == col2 {
                            continue;
                        }
                        formula.add_clause(exclusion(
                            variable_of(n, k, row1, col1),
                            variable_of(n, k, row2, col2),
                        ))?;
                    }
                }
            }
        }
    }

    // Givens enter as unit clauses.
    for given in givens {
        let variable = variable_of(n, given.value - 1, given.row, given.col);
        formula.add_clause(vec![Literal::new(variable, true)])?;
    }

    formula.grid = Some(Grid {
        n,
        sqrt_n,
        cell_clause,
    });
    log::debug!(
        target: targets::BUILD,
        "Encoded {n}x{n} puzzle: {} variables, {} clauses, {} givens",
        formula.variable_count(),
        formula.clauses.count(),
        givens.len()
    );
    Ok(formula)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_reads_header_and_givens() {
        let puzzle = Puzzle::parse("4 2 2\n3 1 0 0\n1 1 2 3\n").unwrap();
        assert_eq!(puzzle.n, 4);
        assert_eq!(puzzle.sqrt_n, 2);
        assert_eq!(
            puzzle.givens,
            vec![
                Given {
                    row: 0,
                    col: 0,
                    value: 3
                },
                Given {
                    row: 2,
                    col: 3,
                    value: 1
                },
            ]
        );
    }

    #[test]
    fn parse_rejects_sum_constraints() {
        assert_eq!(
            Puzzle::parse("4 2 1\n7 2 0 0 0 1\n"),
            Err(err::ParseError::Given(0))
        );
    }

    #[test]
    fn encoding_counts_match_the_enumeration() {
        let n = 4_usize;
        let formula = sudoku_formula(4, 2, &[]).unwrap();
        assert_eq!(formula.variable_count(), n * n * n);

        // Pairwise rules per scope, plus one at-least-one clause per cell.
        let pairs = n * (n - 1) / 2;
        let cell_rules = n * n * pairs + n * n;
        let row_rules = n * n * pairs;
        let col_rules = n * n * pairs;
        // Within a block, pairs sharing a row or column are covered elsewhere.
        let block_rules = n * n * (pairs - 2 * 2 * 1);
        assert_eq!(
            formula.clauses.count(),
            cell_rules + row_rules + col_rules + block_rules
        );
    }

    #[test]
    fn conflicting_givens_are_rejected() {
        let givens = [
            Given {
                row: 0,
                col: 0,
                value: 1,
            },
            Given {
                row: 0,
                col: 0,
                value: 2,
            },
        ];
        assert_eq!(
            sudoku_formula(4, 2, &givens).unwrap_err(),
            err::BuildError::ConflictingGivens
        );
    }
}
