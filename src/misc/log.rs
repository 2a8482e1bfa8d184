/*!
Items related to [logging](log).

Calls to the log macro are made throughout the library.
These are intended to provide useful information for extending the library and/or fixing issues.

Note, no log implementation is provided.
For more details, see [log].
*/

/// Targets to be used within a [log]! macro.
pub mod targets {
    /// Logs related to [propagation](crate::procedures::propagate).
    pub const PROPAGATION: &str = "propagation";

    /// Logs related to the [clause database](crate::db::clause).
    pub const CLAUSE_DB: &str = "clause_db";

    /// Logs related to the [undo journal](crate::db::journal).
    pub const JOURNAL: &str = "journal";

    /// Logs related to [decisions](crate::procedures::decide) and the task stack.
    pub const DECISION: &str = "decision";

    /// Logs related to [conflict analysis](crate::procedures::conflict).
    pub const CONFLICT: &str = "conflict";

    /// Logs related to the [work-stealing scheduler](crate::dist).
    pub const SCHEDULE: &str = "schedule";

    /// Logs related to [state compression](crate::compress) and handoff.
    pub const TRANSFER: &str = "transfer";

    /// Logs related to [formula construction](crate::formula::build).
    pub const BUILD: &str = "build";
}
