use weaver_sat::{
    config::Config,
    context::Context,
    db::variable::Implier,
    formula::build::{sudoku_formula, Given, Puzzle},
    procedures::solve::IterationOutcome,
    reports::Report,
};

fn givens_from_rows(rows: &[&str]) -> Vec<Given> {
    let mut givens = Vec::default();
    for (row, text) in rows.iter().enumerate() {
        for (col, ch) in text.chars().enumerate() {
            if let Some(value) = ch.to_digit(10) {
                if value != 0 {
                    givens.push(Given {
                        row: row as u16,
                        col: col as u16,
                        value: value as u16,
                    });
                }
            }
        }
    }
    givens
}

fn assert_valid_board(board: &[Vec<u16>], sqrt_n: usize, givens: &[Given]) {
    let n = board.len();
    let expected: Vec<u16> = (1..=n as u16).collect();

    for row in board {
        let mut values = row.clone();
        values.sort_unstable();
        assert_eq!(values, expected);
    }
    for col in 0..n {
        let mut values: Vec<u16> = board.iter().map(|row| row[col]).collect();
        values.sort_unstable();
        assert_eq!(values, expected);
    }
    for block_row in 0..sqrt_n {
        for block_col in 0..sqrt_n {
            let mut values = Vec::with_capacity(n);
            for r in 0..sqrt_n {
                for c in 0..sqrt_n {
                    values.push(board[block_row * sqrt_n + r][block_col * sqrt_n + c]);
                }
            }
            values.sort_unstable();
            assert_eq!(values, expected);
        }
    }
    for given in givens {
        assert_eq!(board[given.row as usize][given.col as usize], given.value);
    }
}

#[test]
fn four_by_four_from_text() {
    let text = "4 2 5
        1 1 0 0
        4 1 0 3
        4 1 1 1
        4 1 2 2
        4 1 3 0";
    let puzzle = Puzzle::parse(text).unwrap();
    assert_eq!(puzzle.n, 4);
    assert_eq!(puzzle.givens.len(), 5);

    let formula = puzzle.formula().unwrap();
    let mut ctx = Context::from_formula(formula, Config::default());
    assert_eq!(ctx.solve().unwrap(), Report::Satisfiable);

    let board = ctx.formula.sudoku_board().unwrap();
    assert_valid_board(&board, 2, &puzzle.givens);
}

#[test]
fn four_by_four_empty_grid() {
    let formula = sudoku_formula(4, 2, &[]).unwrap();
    let mut ctx = Context::from_formula(formula, Config::default());
    assert_eq!(ctx.solve().unwrap(), Report::Satisfiable);
    assert_valid_board(&ctx.formula.sudoku_board().unwrap(), 2, &[]);
}

#[test]
fn four_by_four_unsatisfiable() {
    // The same value twice in one row passes the build checks but refutes the row exclusion.
    let givens = [
        Given { row: 0, col: 0, value: 1 },
        Given { row: 0, col: 2, value: 1 },
    ];
    let formula = sudoku_formula(4, 2, &givens).unwrap();
    let mut ctx = Context::from_formula(formula, Config::default());
    assert_eq!(ctx.solve().unwrap(), Report::Unsatisfiable);
}

// The lower-left block needs {1, 3} in its bottom two cells, but that row already holds a 1,
// so every branch runs into a conflict somewhere down the search.
fn indirectly_refuted_givens() -> Vec<Given> {
    vec![
        Given { row: 1, col: 2, value: 3 },
        Given { row: 2, col: 0, value: 4 },
        Given { row: 2, col: 1, value: 2 },
        Given { row: 3, col: 3, value: 1 },
    ]
}

#[test]
fn four_by_four_chronological_refutation() {
    let givens = indirectly_refuted_givens();
    let formula = sudoku_formula(4, 2, &givens).unwrap();
    let config = Config {
        conflict_learning: false,
        ..Config::default()
    };
    let mut ctx = Context::from_formula(formula, config);
    assert_eq!(ctx.solve().unwrap(), Report::Unsatisfiable);
}

#[test]
fn open_frames_track_decision_depth() {
    let givens = indirectly_refuted_givens();
    let formula = sudoku_formula(4, 2, &givens).unwrap();
    let config = Config {
        conflict_learning: false,
        ..Config::default()
    };
    let mut ctx = Context::from_formula(formula, config);

    loop {
        let outcome = ctx.solve_iteration().unwrap();
        let decisions = (0..ctx.formula.variable_count() as u32)
            .filter(|&variable| {
                ctx.formula.value_of(variable).is_some()
                    && matches!(ctx.formula.variables.implier_of(variable), Implier::Decision)
            })
            .count();
        assert_eq!(ctx.formula.depth() as usize, decisions);
        if outcome != IterationOutcome::Proceeding {
            assert_eq!(outcome, IterationOutcome::Exhausted);
            break;
        }
    }
}

#[test]
fn nine_by_nine() {
    let rows = [
        "530070000",
        "600195000",
        "098000060",
        "800060003",
        "400803001",
        "700020006",
        "060000280",
        "000419005",
        "000080079",
    ];
    let givens = givens_from_rows(&rows);
    let formula = sudoku_formula(9, 3, &givens).unwrap();
    let mut ctx = Context::from_formula(formula, Config::default());
    assert_eq!(ctx.solve().unwrap(), Report::Satisfiable);
    assert_valid_board(&ctx.formula.sudoku_board().unwrap(), 3, &givens);
}
