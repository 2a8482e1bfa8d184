use weaver_sat::{
    db::variable::{Implier, Tag},
    formula::Formula,
    structures::literal::Literal,
    types::err::{ErrorKind, TransferError},
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
    formula.seal(0);
    formula
}

const CLAUSES: &[&[(u32, bool)]] = &[
    &[(0, true), (1, true), (2, true)],
    &[(0, false), (3, true)],
    &[(1, false), (2, false)],
];

#[test]
fn reconstruction_matches_compressed_valuation() {
    let mut donor = formula_over(4, CLAUSES);
    donor
        .assign(Literal::new(0, true), Implier::Decision, Tag::Local)
        .unwrap();

    let words = donor.compress().unwrap();

    let mut thief = formula_over(4, CLAUSES);
    thief.reconstruct(&words).unwrap();

    for variable in 0..4 {
        assert_eq!(thief.value_of(variable), donor.value_of(variable));
    }
    // Clause 0 was satisfied by the assignment and stays dropped; clause 1 shrank to one
    // candidate and surfaces first.
    assert_eq!(
        thief.clauses.first_active(),
        donor.clauses.first_active()
    );
    assert_eq!(thief.variables.tag(0, true), Tag::Remote);
    assert_eq!(thief.depth(), 0);
}

#[test]
fn reconstruction_checks_word_count() {
    let mut formula = formula_over(4, CLAUSES);
    let mut words = formula.compress().unwrap();
    words.push(0);
    assert_eq!(
        formula.reconstruct(&words),
        Err(ErrorKind::Transfer(TransferError::WordCount))
    );
}

#[test]
fn reconstruction_rejects_contradictory_bits() {
    let mut formula = formula_over(4, CLAUSES);
    let layout = formula.layout();
    let mut words = layout.blank();
    // Both polarities of variable 0.
    words[layout.true_base()] |= 1;
    words[layout.false_base()] |= 1;
    assert_eq!(
        formula.reconstruct(&words),
        Err(ErrorKind::Transfer(TransferError::Inconsistent(0)))
    );
}

#[test]
fn reconstruction_rejects_falsified_active_clause() {
    let donor = formula_over(4, CLAUSES);
    let layout = donor.layout();
    let mut words = layout.blank();
    // Falsify clause 2 outright while leaving it attached.
    let slot_1 = donor.variables.slot(1);
    let slot_2 = donor.variables.slot(2);
    let true_segment = &mut words[layout.true_base()..layout.false_base()];
    slot_1.set(true_segment);
    slot_2.set(true_segment);

    let mut thief = formula_over(4, CLAUSES);
    assert!(matches!(
        thief.reconstruct(&words),
        Err(ErrorKind::ClauseDb(_))
    ));
}
