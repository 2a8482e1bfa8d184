//! A distributed conflict-driven SAT solver for grid constraint puzzles.
//!
//! weaver_sat determines the satisfiability of boolean formulas in conjunctive normal form, with
//! two distinguishing commitments:
//!
//! - The search is an explicit machine rather than a recursive procedure.
//!   Pending decisions live on a [task stack](crate::db::task), and every mutation of the formula
//!   is recorded in an [undo journal](crate::db::journal).
//!   As a consequence a partially-explored search may be suspended, [compressed](crate::compress)
//!   to a fixed-size buffer, and resumed by a different worker.
//! - Solves may be spread across a fixed tree of cooperating [workers](crate::dist), which
//!   exchange unexplored subtrees through a request/grant protocol and propagate learned conflict
//!   clauses between themselves.
//!
//! The front end builds formulas from Sudoku puzzles (see [formula::build]), though the solver
//! core is indifferent to where its clauses came from.
//!
//! # Orientation
//!
//! At a high level a solve is the manipulation of a handful of databases:
//!
//! - A formula is stored as a [variable table](crate::db::variable) and a
//!   [clause database](crate::db::clause) bucketed by how close each clause is to forcing a value.
//! - The frontier of the search is a [task stack](crate::db::task) of pending assignments and
//!   backtrack markers.
//! - Every mutation is paired with an edit in the [journal](crate::db::journal), one frame per
//!   decision, so that any decision may be reversed exactly.
//!
//! Useful starting points:
//!
//! - [procedures::solve](crate::procedures::solve) for the dynamics of a single-worker solve.
//! - [context::GenericContext] for the data considered during a solve.
//! - [dist::worker] for the cooperative event loop and the work-stealing protocol.
//! - [config::Config] for the supported options.
//!
//! # Example
//!
//! ```rust
//! use weaver_sat::config::Config;
//! use weaver_sat::context::Context;
//! use weaver_sat::formula::Formula;
//! use weaver_sat::reports::Report;
//! use weaver_sat::structures::literal::Literal;
//!
//! let mut formula = Formula::new(2);
//! formula.add_clause(vec![Literal::new(0, true), Literal::new(1, true)]).unwrap();
//! formula.add_clause(vec![Literal::new(0, false)]).unwrap();
//!
//! let mut ctx = Context::from_formula(formula, Config::default());
//! assert_eq!(ctx.solve().unwrap(), Report::Satisfiable);
//! assert_eq!(ctx.formula.value_of(1), Some(true));
//! ```
//!
//! # Logs
//!
//! Calls to [log!](log) are made throughout, with targets listed in [misc::log] to narrow output
//! to relevant parts of the library.
//! No log implementation is provided; the bundled CLI initialises [env_logger].

#![allow(clippy::single_match)]
#![allow(clippy::collapsible_else_if)]

pub mod config;
pub mod context;
pub mod reports;

pub mod structures;
pub mod types;

pub mod db;

pub mod compress;
pub mod formula;
pub mod procedures;

pub mod dist;

pub mod generic;
pub mod misc;
