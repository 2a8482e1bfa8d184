/*!
A database of clauses, bucketed by how close each clause is to forcing an assignment.

Each clause carries a count of its *live* literals, those neither satisfied nor falsified by the
current assignment.
Clauses whose satisfying assignment has been made are *dropped* from the database, and restored
when the assignment is undone.

Active clauses are threaded through intrusive doubly-linked lists, one per [Bucket], keyed by the
live count and the original length of the clause.
The lists allow any clause to be detached or re-attached in constant time, and give the decision
procedure an iteration order which visits clauses with the fewest live literals first.

Clause ids are indices into the record vector, stable for the life of the database.
Conflict clauses learned during search are appended after the original clauses and share the same
id space; [ClauseDb::original_count] marks the boundary.
*/

use crate::{
    db::BitSlot,
    misc::log::targets,
    structures::{
        clause::{Clause, ClauseId},
        literal::Literal,
    },
    types::err,
};

/// A sentinel id for the absence of a clause in an intrusive list.
const NO_CLAUSE: ClauseId = ClauseId::MAX;

/// The bucket a clause belongs to, ordered by decision priority.
///
/// A clause with one live literal forces an assignment, and among those the short clauses are
/// preferred as their literal lists are cheapest to scan.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bucket {
    /// One live literal, originally longer than two literals.
    OneLong,

    /// One live literal, originally at most two literals.
    OneShort,

    /// Two live literals, originally longer than two literals.
    TwoLong,

    /// Two live literals, originally at most two literals.
    TwoShort,

    /// More than two live literals.
    Big,

    /// Dropped from the database.
    Detached,
}

impl Bucket {
    /// The bucket for a clause with the given live count and original length.
    pub fn classify(live: usize, original_length: usize) -> Self {
        match (live, original_length > 2) {
            (1, true) => Bucket::OneLong,
            (1, false) => Bucket::OneShort,
            (2, true) => Bucket::TwoLong,
            (2, false) => Bucket::TwoShort,
            _ => Bucket::Big,
        }
    }

    /// The index of the bucket's intrusive list, if it has one.
    fn list_index(self) -> Option<usize> {
        match self {
            Bucket::OneLong => Some(0),
            Bucket::OneShort => Some(1),
            Bucket::TwoLong => Some(2),
            Bucket::TwoShort => Some(3),
            Bucket::Big => Some(4),
            Bucket::Detached => None,
        }
    }
}

/// The count of intrusive lists.
const BUCKET_COUNT: usize = 5;

/// A record of one clause and its place in the database.
#[derive(Clone, Debug)]
pub struct ClauseRecord {
    /// The clause, as built.
    clause: Clause,

    /// Count of literals neither satisfied nor falsified.
    live: usize,

    /// The bucket the clause belongs to.
    bucket: Bucket,

    /// Previous clause in the bucket's list, or [NO_CLAUSE].
    prev: ClauseId,

    /// Next clause in the bucket's list, or [NO_CLAUSE].
    next: ClauseId,

    /// Compressed-state slot of the clause's dropped bit.
    slot: BitSlot,
}

impl ClauseRecord {
    /// The clause held by the record.
    pub fn clause(&self) -> &Clause {
        &self.clause
    }

    /// Count of literals neither satisfied nor falsified.
    pub fn live(&self) -> usize {
        self.live
    }

    /// The bucket the clause belongs to.
    pub fn bucket(&self) -> Bucket {
        self.bucket
    }

    /// Compressed-state slot of the clause's dropped bit.
    pub fn slot(&self) -> BitSlot {
        self.slot
    }
}

/// The database of clauses.
#[derive(Clone, Debug)]
pub struct ClauseDb {
    records: Vec<ClauseRecord>,

    /// Head of each bucket's list, [NO_CLAUSE] when empty.
    heads: [ClauseId; BUCKET_COUNT],

    /// Count of original clauses, fixed at seal.
    original_count: usize,

    /// Whether the original clause set has been sealed.
    sealed: bool,

    /// Count of learned clauses which may still be added.
    conflict_capacity: usize,

    /// The capacity fixed at seal, restored on reset.
    conflict_limit: usize,
}

impl Default for ClauseDb {
    fn default() -> Self {
        ClauseDb {
            records: Vec::default(),
            heads: [NO_CLAUSE; BUCKET_COUNT],
            original_count: 0,
            sealed: false,
            conflict_capacity: 0,
            conflict_limit: 0,
        }
    }
}

impl ClauseDb {
    /// The count of clauses in the database, dropped clauses included.
    pub fn count(&self) -> usize {
        self.records.len()
    }

    /// The count of original clauses, fixed at seal.
    pub fn original_count(&self) -> usize {
        self.original_count
    }

    /// Whether the original clause set has been sealed.
    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    /// Whether a learned clause may still be added.
    pub fn conflict_capacity(&self) -> usize {
        self.conflict_capacity
    }

    /// Seals the original clause set, with capacity for some count of learned clauses.
    ///
    /// Idempotent, as the database may be sealed on construction and again by a context.
    pub fn seal(&mut self, conflict_limit: usize) {
        if !self.sealed {
            self.sealed = true;
            self.original_count = self.records.len();
            self.conflict_capacity = conflict_limit;
            self.conflict_limit = conflict_limit;
        }
    }

    /// Consumes one unit of learned clause capacity, if any remains.
    pub fn take_conflict_capacity(&mut self) -> bool {
        match self.conflict_capacity {
            0 => false,
            _ => {
                self.conflict_capacity -= 1;
                true
            }
        }
    }

    /// Inserts a clause with the given live count, attached to the matching bucket.
    pub fn insert(&mut self, clause: Clause, live: usize) -> ClauseId {
        let id = self.records.len() as ClauseId;
        let bucket = Bucket::classify(live, clause.len());
        let slot = BitSlot::at(id as usize);

        self.records.push(ClauseRecord {
            clause,
            live,
            bucket: Bucket::Detached,
            prev: NO_CLAUSE,
            next: NO_CLAUSE,
            slot,
        });
        self.attach(id, bucket);
        id
    }

    /// The record of a clause.
    pub fn get(&self, id: ClauseId) -> Result<&ClauseRecord, err::ClauseDbError> {
        match self.records.get(id as usize) {
            Some(record) => Ok(record),
            None => Err(err::ClauseDbError::StaleId(id)),
        }
    }

    /// Detaches a clause from its bucket, preserving the live count for restore.
    pub fn drop_clause(&mut self, id: ClauseId) -> Result<(), err::ClauseDbError> {
        log::trace!(target: targets::CLAUSE_DB, "Drop clause {id}");
        match self.records[id as usize].bucket {
            Bucket::Detached => Err(err::ClauseDbError::DropMismatch(id)),
            _ => {
                self.detach(id);
                Ok(())
            }
        }
    }

    /// Re-attaches a dropped clause, to the bucket its stored live count calls for.
    pub fn restore(&mut self, id: ClauseId) -> Result<(), err::ClauseDbError> {
        log::trace!(target: targets::CLAUSE_DB, "Restore clause {id}");
        let record = &self.records[id as usize];
        match record.bucket {
            Bucket::Detached => {
                let bucket = Bucket::classify(record.live, record.clause.len());
                self.attach(id, bucket);
                Ok(())
            }
            _ => Err(err::ClauseDbError::DropMismatch(id)),
        }
    }

    /// Revises the live count of an attached clause, moving it between buckets as needed.
    pub fn reclassify(&mut self, id: ClauseId, live: usize) -> Result<(), err::ClauseDbError> {
        let record = &self.records[id as usize];
        if matches!(record.bucket, Bucket::Detached) {
            return Err(err::ClauseDbError::DropMismatch(id));
        }

        let bucket = Bucket::classify(live, record.clause.len());
        if bucket == record.bucket {
            self.records[id as usize].live = live;
        } else {
            self.detach(id);
            self.records[id as usize].live = live;
            self.attach(id, bucket);
        }
        Ok(())
    }

    /// Overwrites the stored live count of a detached clause.
    pub fn set_live(&mut self, id: ClauseId, live: usize) {
        self.records[id as usize].live = live;
    }

    /// The first active clause in priority order, fewest live literals first.
    pub fn first_active(&self) -> Option<ClauseId> {
        self.heads
            .iter()
            .find(|head| **head != NO_CLAUSE)
            .copied()
    }

    /// An iterator over active clause ids, fewest live literals first.
    pub fn active(&self) -> ActiveIterator<'_> {
        ActiveIterator {
            db: self,
            list: 0,
            current: self.heads[0],
        }
    }

    /// Whether a learned clause over exactly these literals is already stored.
    ///
    /// Guards against re-learning a clause received twice over the wire.
    pub fn contains_learned(&self, literals: &[Literal]) -> bool {
        let mut sorted = literals.to_vec();
        sorted.sort_unstable();
        self.records[self.original_count..].iter().any(|record| {
            let mut other = record.clause.literals().to_vec();
            other.sort_unstable();
            other == sorted
        })
    }

    /// Returns the database to its just-sealed state.
    ///
    /// Learned clauses are removed, and every original clause is re-attached with its full
    /// literal count live.
    pub fn reset(&mut self) {
        self.records.truncate(self.original_count);
        self.heads = [NO_CLAUSE; BUCKET_COUNT];
        self.conflict_capacity = self.conflict_limit;
        for id in 0..self.records.len() as ClauseId {
            let record = &mut self.records[id as usize];
            let live = record.clause.len();
            record.live = live;
            record.bucket = Bucket::Detached;
            record.prev = NO_CLAUSE;
            record.next = NO_CLAUSE;
            let bucket = Bucket::classify(live, live);
            self.attach(id, bucket);
        }
    }

    fn attach(&mut self, id: ClauseId, bucket: Bucket) {
        let Some(list) = bucket.list_index() else {
            return;
        };

        let head = self.heads[list];
        {
            let record = &mut self.records[id as usize];
            record.bucket = bucket;
            record.prev = NO_CLAUSE;
            record.next = head;
        }
        if head != NO_CLAUSE {
            self.records[head as usize].prev = id;
        }
        self.heads[list] = id;
    }

    fn detach(&mut self, id: ClauseId) {
        let (prev, next, bucket) = {
            let record = &self.records[id as usize];
            (record.prev, record.next, record.bucket)
        };

        if prev != NO_CLAUSE {
            self.records[prev as usize].next = next;
        } else if let Some(list) = bucket.list_index() {
            self.heads[list] = next;
        }
        if next != NO_CLAUSE {
            self.records[next as usize].prev = prev;
        }

        let record = &mut self.records[id as usize];
        record.bucket = Bucket::Detached;
        record.prev = NO_CLAUSE;
        record.next = NO_CLAUSE;
    }
}

/// An iterator over active clause ids, fewest live literals first.
pub struct ActiveIterator<'db> {
    db: &'db ClauseDb,
    list: usize,
    current: ClauseId,
}

impl Iterator for ActiveIterator<'_> {
    type Item = ClauseId;

    fn next(&mut self) -> Option<Self::Item> {
        while self.current == NO_CLAUSE {
            self.list += 1;
            if self.list >= BUCKET_COUNT {
                return None;
            }
            self.current = self.db.heads[self.list];
        }

        let id = self.current;
        self.current = self.db.records[id as usize].next;
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structures::literal::Literal;

    fn clause_of(literals: &[(u32, bool)]) -> Clause {
        Clause::new(
            literals
                .iter()
                .map(|(v, p)| Literal::new(*v, *p))
                .collect(),
        )
    }

    #[test]
    fn buckets_order_by_live_count() {
        let mut db = ClauseDb::default();
        let big = db.insert(clause_of(&[(0, true), (1, true), (2, true)]), 3);
        let pair = db.insert(clause_of(&[(0, false), (1, false)]), 2);
        let unit = db.insert(clause_of(&[(2, false)]), 1);

        let order: Vec<ClauseId> = db.active().collect();
        assert_eq!(order, vec![unit, pair, big]);
        assert_eq!(db.first_active(), Some(unit));
    }

    #[test]
    fn drop_and_restore_preserve_live_counts() {
        let mut db = ClauseDb::default();
        let id = db.insert(clause_of(&[(0, true), (1, true), (2, true)]), 3);
        db.reclassify(id, 2).unwrap();
        db.drop_clause(id).unwrap();

        assert_eq!(db.first_active(), None);
        assert!(db.drop_clause(id).is_err());

        db.restore(id).unwrap();
        assert_eq!(db.get(id).unwrap().live(), 2);
        assert_eq!(db.get(id).unwrap().bucket(), Bucket::TwoLong);
    }

    #[test]
    fn reclassify_moves_between_buckets() {
        let mut db = ClauseDb::default();
        let long = db.insert(clause_of(&[(0, true), (1, true), (2, true)]), 3);
        let short = db.insert(clause_of(&[(3, true), (4, true)]), 2);

        db.reclassify(long, 1).unwrap();
        db.reclassify(short, 1).unwrap();

        let order: Vec<ClauseId> = db.active().collect();
        assert_eq!(order, vec![long, short]);
    }
}
