use weaver_sat::{
    config::{Config, Polarity},
    context::Context,
    formula::Formula,
    reports::Report,
    structures::literal::Literal,
};

fn formula_over(variable_count: usize, clauses: &[&[(u32, bool)]]) -> Formula {
    let mut formula = Formula::new(variable_count);
    for clause in clauses {
        let literals = clause
            .iter()
            .map(|(variable, polarity)| Literal::new(*variable, *polarity))
            .collect();
        formula.add_clause(literals).unwrap();
    }
    formula
}

fn satisfies(ctx: &Context, clauses: &[&[(u32, bool)]]) -> bool {
    clauses.iter().all(|clause| {
        clause
            .iter()
            .any(|(variable, polarity)| ctx.formula.value_of(*variable) == Some(*polarity))
    })
}

#[test]
fn three_variable_chain() {
    let clauses: &[&[(u32, bool)]] = &[
        &[(0, true), (1, true)],
        &[(0, false), (2, true)],
        &[(1, false), (2, false)],
    ];
    let mut ctx = Context::from_formula(formula_over(3, clauses), Config::default());
    assert_eq!(ctx.solve().unwrap(), Report::Satisfiable);
    assert!(satisfies(&ctx, clauses));
}

#[test]
fn contradictory_units() {
    let clauses: &[&[(u32, bool)]] = &[&[(0, true)], &[(0, false)]];
    let mut ctx = Context::from_formula(formula_over(1, clauses), Config::default());
    assert_eq!(ctx.solve().unwrap(), Report::Unsatisfiable);
}

// Three pigeons into two holes, with variable 2i + j placing pigeon i in hole j.
fn pigeonhole() -> Vec<Vec<(u32, bool)>> {
    let mut clauses: Vec<Vec<(u32, bool)>> = Vec::default();
    for pigeon in 0..3u32 {
        clauses.push(vec![(2 * pigeon, true), (2 * pigeon + 1, true)]);
    }
    for hole in 0..2u32 {
        for first in 0..3u32 {
            for second in (first + 1)..3 {
                clauses.push(vec![(2 * first + hole, false), (2 * second + hole, false)]);
            }
        }
    }
    clauses
}

#[test]
fn pigeonhole_with_learning() {
    let clauses = pigeonhole();
    let borrowed: Vec<&[(u32, bool)]> = clauses.iter().map(|c| c.as_slice()).collect();
    let mut ctx = Context::from_formula(formula_over(6, &borrowed), Config::default());
    assert_eq!(ctx.solve().unwrap(), Report::Unsatisfiable);
    assert_ne!(ctx.counters.conflicts, 0);
}

#[test]
fn pigeonhole_chronological() {
    let clauses = pigeonhole();
    let borrowed: Vec<&[(u32, bool)]> = clauses.iter().map(|c| c.as_slice()).collect();
    let config = Config {
        conflict_learning: false,
        ..Config::default()
    };
    let mut ctx = Context::from_formula(formula_over(6, &borrowed), config);
    assert_eq!(ctx.solve().unwrap(), Report::Unsatisfiable);
    assert_eq!(ctx.counters.learned, 0);
}

#[test]
fn polarity_heuristics_agree_on_satisfiability() {
    let clauses: &[&[(u32, bool)]] = &[
        &[(0, true), (1, false), (2, true)],
        &[(1, true), (2, false)],
        &[(0, false), (1, true)],
    ];
    for polarity in [
        Polarity::Greedy,
        Polarity::Opposite,
        Polarity::AlwaysTrue,
        Polarity::AlwaysFalse,
    ] {
        let config = Config {
            polarity,
            ..Config::default()
        };
        let mut ctx = Context::from_formula(formula_over(3, clauses), config);
        assert_eq!(ctx.solve().unwrap(), Report::Satisfiable);
        assert!(satisfies(&ctx, clauses));
    }
}

#[test]
fn model_is_total_after_solve() {
    let clauses: &[&[(u32, bool)]] = &[&[(0, true), (1, true)]];
    let mut ctx = Context::from_formula(formula_over(4, clauses), Config::default());
    assert_eq!(ctx.solve().unwrap(), Report::Satisfiable);
    for variable in 0..4 {
        assert!(ctx.formula.value_of(variable).is_some());
    }
}
