/*!
Procedures relevant to a solve, implemented on [contexts](crate::context::GenericContext).

- [decide] derives the next tasks from the clause database.
- [propagate] applies queued assignments and their consequences.
- [conflict] learns from falsified clauses and backjumps.
- [solve] ties the iterations into a complete solve.
*/

pub mod conflict;
pub mod decide;
pub mod propagate;
pub mod solve;
