use std::thread;

use weaver_sat::{
    config::Config,
    context::Context,
    db::variable::{Implier, Tag},
    dist::{
        message::{Message, Transport},
        state::ThiefRecord,
        transport::ChannelTransport,
        worker::Worker,
    },
    formula::{build::sudoku_formula, Formula},
    generic::MinimalPCG32,
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

fn run_tree(formulas: Vec<Formula>) -> Vec<(Report, Worker<MinimalPCG32, ChannelTransport>)> {
    let transports = ChannelTransport::grid(formulas.len());
    let mut handles = Vec::with_capacity(formulas.len());
    for (rank, (formula, transport)) in formulas.into_iter().zip(transports).enumerate() {
        let mut config = Config::default();
        config.seed = rank as u64;
        handles.push(thread::spawn(move || {
            let mut worker = Worker::new(Context::from_formula(formula, config), transport);
            let report = worker.run().unwrap();
            (report, worker)
        }));
    }
    handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect()
}

#[test]
fn two_workers_solve_a_grid() {
    let formulas = vec![
        sudoku_formula(4, 2, &[]).unwrap(),
        sudoku_formula(4, 2, &[]).unwrap(),
    ];
    let outcomes = run_tree(formulas);

    let winners: Vec<_> = outcomes
        .iter()
        .filter(|(report, _)| *report == Report::Satisfiable)
        .collect();
    assert!(!winners.is_empty());
    for (report, _) in &outcomes {
        assert!(matches!(report, Report::Satisfiable | Report::Aborted));
    }
    let board = winners[0].1.context.formula.sudoku_board().unwrap();
    assert_eq!(board.len(), 4);
}

#[test]
fn three_workers_agree_on_refutation() {
    // Three pigeons into two holes, with variable 2i + j placing pigeon i in hole j.
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
    let borrowed: Vec<&[(u32, bool)]> = clauses.iter().map(|c| c.as_slice()).collect();

    let formulas = vec![
        formula_over(6, &borrowed),
        formula_over(6, &borrowed),
        formula_over(6, &borrowed),
    ];
    for (report, _) in run_tree(formulas) {
        assert_eq!(report, Report::Unsatisfiable);
    }
}

#[test]
fn satisfied_clause_from_peer_is_discarded() {
    let clauses: &[&[(u32, bool)]] = &[&[(0, true), (1, true)], &[(1, false), (2, true)]];
    let mut transports = ChannelTransport::grid(2);
    let transport = transports.remove(0);
    let context = Context::from_formula(formula_over(3, clauses), Config::default());
    let mut worker = Worker::new(context, transport);

    worker
        .context
        .formula
        .assign(Literal::new(0, true), Implier::Decision, Tag::Local)
        .unwrap();

    let vacuous = vec![Literal::new(0, true), Literal::new(2, false)];
    worker.handle_conflict_clause(1, vacuous.clone()).unwrap();
    assert!(!worker.context.formula.clauses.contains_learned(&vacuous));

    let informative = vec![Literal::new(1, true), Literal::new(2, true)];
    worker.handle_conflict_clause(1, informative.clone()).unwrap();
    assert!(worker.context.formula.clauses.contains_learned(&informative));
}

#[test]
fn full_learned_store_leaves_local_conflict_to_search() {
    let clauses: &[&[(u32, bool)]] = &[&[(0, true), (1, true)], &[(1, false), (2, true)]];
    let mut transports = ChannelTransport::grid(2);
    let transport = transports.remove(0);
    let config = Config {
        conflict_clause_limit: 0,
        ..Config::default()
    };
    let context = Context::from_formula(formula_over(3, clauses), config);
    let mut worker = Worker::new(context, transport);

    worker.context.formula.recurse();
    worker
        .context
        .formula
        .assign(Literal::new(0, false), Implier::Decision, Tag::Local)
        .unwrap();
    assert_eq!(worker.context.formula.depth(), 1);

    // Falsified by the local decision, but with the store full no backjump is taken.
    let refuting = vec![Literal::new(0, true)];
    worker.handle_conflict_clause(1, refuting.clone()).unwrap();

    assert_eq!(worker.context.formula.depth(), 1);
    assert_eq!(worker.context.formula.value_of(0), Some(false));
    assert!(!worker.context.formula.clauses.contains_learned(&refuting));
}

#[test]
fn clause_refuting_a_stolen_branch_invalidates_the_thief() {
    let clauses: &[&[(u32, bool)]] = &[&[(0, true), (1, true)], &[(1, false), (2, true)]];
    let mut transports = ChannelTransport::grid(2);
    let mut thief_end = transports.remove(1);
    let transport = transports.remove(0);
    let context = Context::from_formula(formula_over(3, clauses), Config::default());
    let mut worker = Worker::new(context, transport);

    // Rank 1 was handed the branch valuing variable 1 true.
    let branch = Literal::new(1, true);
    worker
        .context
        .formula
        .variables
        .set_tag(1, true, Tag::Stolen);
    worker.schedule.thieves.push(ThiefRecord {
        literal: branch,
        rank: 1,
        time: 1,
    });

    // A clause asserting variable 1 false refutes the stolen branch.
    worker
        .handle_conflict_clause(1, vec![Literal::new(1, false)])
        .unwrap();

    assert!(worker.schedule.thieves.is_empty());
    let envelope = thief_end.try_recv().unwrap();
    assert_eq!(envelope.from, 0);
    assert!(matches!(
        envelope.message,
        Message::Invalidate { branch: b } if b == branch
    ));
}
