use weaver_sat::{
    db::variable::{Implier, Tag},
    formula::Formula,
    structures::literal::Literal,
};

// A clause inserted mid-search receives shrink edits in the frames holding its falsifying
// assignments, so unwinding those frames restores its live count step by step.
#[test]
fn learned_clause_unwinds_with_the_frames_that_falsify_it() {
    let mut formula = Formula::new(4);
    formula
        .add_clause(vec![Literal::new(0, true), Literal::new(1, true)])
        .unwrap();
    formula.seal(4);

    formula.recurse();
    formula
        .assign(Literal::new(0, false), Implier::Decision, Tag::Local)
        .unwrap();
    formula.recurse();
    formula
        .assign(Literal::new(2, false), Implier::Decision, Tag::Local)
        .unwrap();
    assert_eq!(formula.depth(), 2);

    // Falsified at depth 1 by variable 0 and at depth 2 by variable 2.
    let learned = formula
        .insert_conflict_clause(vec![
            Literal::new(0, true),
            Literal::new(2, true),
            Literal::new(3, true),
        ])
        .unwrap()
        .unwrap();
    assert_eq!(formula.clauses.get(learned).unwrap().live(), 1);

    formula.backtrack().unwrap();
    assert_eq!(formula.clauses.get(learned).unwrap().live(), 2);
    formula.backtrack().unwrap();
    assert_eq!(formula.clauses.get(learned).unwrap().live(), 3);
    assert_eq!(formula.depth(), 0);
}

// Falsifying assignments at the root are permanent and get no edit.
#[test]
fn root_assignments_are_not_unwound() {
    let mut formula = Formula::new(3);
    formula
        .add_clause(vec![Literal::new(0, true), Literal::new(1, true)])
        .unwrap();
    formula.seal(4);

    formula
        .assign(Literal::new(0, false), Implier::Decision, Tag::Local)
        .unwrap();
    formula.recurse();
    formula
        .assign(Literal::new(1, false), Implier::Decision, Tag::Local)
        .unwrap();

    let learned = formula
        .insert_conflict_clause(vec![
            Literal::new(0, true),
            Literal::new(1, true),
            Literal::new(2, true),
        ])
        .unwrap()
        .unwrap();
    assert_eq!(formula.clauses.get(learned).unwrap().live(), 1);

    formula.backtrack().unwrap();
    // Variable 0 stays assigned at the root; only the depth 1 falsification is undone.
    assert_eq!(formula.clauses.get(learned).unwrap().live(), 2);
    assert_eq!(formula.value_of(0), Some(false));
    assert_eq!(formula.value_of(1), None);
}
