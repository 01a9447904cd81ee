//! Lineage traversal over a flat, parent-linked collection of state records.
//!
//! [`LineageIndex`] is an arena built once per snapshot: records are stored
//! by position, parent and child links are resolved to positions, and every
//! query walks those positions iteratively with a visited set. The input is
//! not trusted:
//!
//! - Duplicate ids keep the first-seen record.
//! - A parent id that names no record is dangling; the record is a root.
//! - A record on a parent cycle (A -> B -> A, or a self-parent) has its
//!   parent link ignored for traversal, so it is also a root.
//!
//! Traversal (`ancestors`, `descendants`, `generation`, `nearest_ancestor`,
//! `traversal_children`, `top_down`) follows these effective links.
//! `children`, `siblings` and [`LineageIndex::can_delete`] report the stored
//! `parent_id` links as they are, since those describe what the persistence
//! layer holds. A self-parent is never its own child.
//!
//! No query panics or errors; malformed input degrades to partial results.

use std::collections::{HashMap, HashSet, VecDeque};

use culture_types::{OperationType, StateId, StateRecord};

/// A data-quality condition found in a record collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineageIssue {
    /// A later record reused an id; it is ignored.
    DuplicateId {
        /// The repeated id.
        id: StateId,
    },
    /// A record names a parent that does not exist.
    DanglingParent {
        /// The record holding the reference.
        id: StateId,
        /// The missing parent id.
        parent: StateId,
    },
    /// A record lies on a parent cycle.
    CycleMember {
        /// The record on the cycle.
        id: StateId,
    },
    /// An operation was recorded beneath a terminal (harvested) record.
    HarvestedParent {
        /// The harvested record.
        parent: StateId,
        /// The operation recorded beneath it.
        child: StateId,
    },
}

/// Walk state used by cycle detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    OnPath,
    Done,
}

/// Arena index over one snapshot of state records.
#[derive(Debug, Clone)]
pub struct LineageIndex<'a> {
    /// De-duplicated records in input order.
    records: Vec<&'a StateRecord>,
    /// Record id to arena position.
    positions: HashMap<StateId, usize>,
    /// Stored parent link resolved to a position (`None` if absent or dangling).
    stored_parents: Vec<Option<usize>>,
    /// Parent link used for traversal (cycle members cut loose).
    parents: Vec<Option<usize>>,
    /// Traversal children per position, in input order.
    children: Vec<Vec<usize>>,
    /// Stored children per position, in input order, self-links excluded.
    stored_children: Vec<Vec<usize>>,
    /// Whether each position lies on a parent cycle.
    on_cycle: Vec<bool>,
    /// Ids that appeared more than once, in order of the repeats.
    duplicates: Vec<StateId>,
}

impl<'a> LineageIndex<'a> {
    /// Index a record collection supplied in any order.
    pub fn new(records: &'a [StateRecord]) -> Self {
        let mut kept: Vec<&'a StateRecord> = Vec::with_capacity(records.len());
        let mut positions = HashMap::with_capacity(records.len());
        let mut duplicates = Vec::new();

        for record in records {
            if positions.contains_key(&record.id) {
                duplicates.push(record.id);
                continue;
            }
            positions.insert(record.id, kept.len());
            kept.push(record);
        }

        let stored_parents: Vec<Option<usize>> = kept
            .iter()
            .map(|record| {
                record
                    .parent_id
                    .and_then(|parent| positions.get(&parent).copied())
            })
            .collect();

        let on_cycle = detect_cycles(&stored_parents);

        let parents: Vec<Option<usize>> = stored_parents
            .iter()
            .zip(&on_cycle)
            .map(|(parent, cyclic)| if *cyclic { None } else { *parent })
            .collect();

        let children = child_lists(&parents);
        let stored_children = child_lists(&stored_parents);

        Self {
            records: kept,
            positions,
            stored_parents,
            parents,
            children,
            stored_children,
            on_cycle,
            duplicates,
        }
    }

    // -------------------------------------------------------------------
    // Lookups
    // -------------------------------------------------------------------

    /// Number of distinct records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the index holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The first-seen record with this id.
    pub fn record(&self, id: StateId) -> Option<&'a StateRecord> {
        self.position(id).and_then(|pos| self.at(pos))
    }

    /// All distinct records in input order.
    pub fn records(&self) -> impl Iterator<Item = &'a StateRecord> + '_ {
        self.records.iter().copied()
    }

    /// Whether the record lies on a parent cycle.
    pub fn is_on_cycle(&self, id: StateId) -> bool {
        self.position(id)
            .and_then(|pos| self.on_cycle.get(pos).copied())
            .unwrap_or(false)
    }

    /// The traversal parent: `None` for roots, dangling references and
    /// cycle members.
    pub fn parent(&self, id: StateId) -> Option<&'a StateRecord> {
        self.position(id)
            .and_then(|pos| self.parent_position(pos))
            .and_then(|pos| self.at(pos))
    }

    /// Records whose stored `parent_id` is this id, in input order.
    ///
    /// A record naming itself as parent is not listed.
    pub fn children(&self, id: StateId) -> Vec<&'a StateRecord> {
        self.position(id)
            .and_then(|pos| self.stored_children.get(pos))
            .into_iter()
            .flatten()
            .filter_map(|child| self.at(*child))
            .collect()
    }

    /// Records whose traversal parent is this id, in input order.
    pub fn traversal_children(&self, id: StateId) -> impl Iterator<Item = &'a StateRecord> + '_ {
        self.position(id)
            .and_then(|pos| self.children.get(pos))
            .into_iter()
            .flatten()
            .filter_map(|child| self.at(*child))
    }

    /// Records with no traversal parent, in input order.
    pub fn roots(&self) -> Vec<&'a StateRecord> {
        self.parents
            .iter()
            .enumerate()
            .filter(|(_, parent)| parent.is_none())
            .filter_map(|(pos, _)| self.at(pos))
            .collect()
    }

    // -------------------------------------------------------------------
    // Traversal
    // -------------------------------------------------------------------

    /// The chain from the root down to the record, inclusive.
    ///
    /// Empty if the id is unknown.
    pub fn ancestors(&self, id: StateId) -> Vec<&'a StateRecord> {
        let Some(start) = self.position(id) else {
            return Vec::new();
        };
        let mut chain: Vec<usize> = self.walk_up(start).collect();
        chain.reverse();
        chain.into_iter().filter_map(|pos| self.at(pos)).collect()
    }

    /// The record and everything beneath it, breadth-first.
    ///
    /// Empty if the id is unknown.
    pub fn descendants(&self, id: StateId) -> Vec<&'a StateRecord> {
        let Some(start) = self.position(id) else {
            return Vec::new();
        };
        let mut found = Vec::new();
        let mut visited = HashSet::new();
        let mut queue = VecDeque::new();
        visited.insert(start);
        queue.push_back(start);

        while let Some(pos) = queue.pop_front() {
            found.push(pos);
            for child in self.children.get(pos).into_iter().flatten() {
                if visited.insert(*child) {
                    queue.push_back(*child);
                }
            }
        }

        found.into_iter().filter_map(|pos| self.at(pos)).collect()
    }

    /// Distance from the nearest root; 0 for roots, `None` if unknown.
    pub fn generation(&self, id: StateId) -> Option<usize> {
        self.position(id)
            .map(|start| self.walk_up(start).count().saturating_sub(1))
    }

    /// Every record, roots first, each after its traversal parent.
    pub fn top_down(&self) -> Vec<&'a StateRecord> {
        self.top_down_positions()
            .into_iter()
            .filter_map(|pos| self.at(pos))
            .collect()
    }

    /// Generation of every record, computed in one top-down pass.
    pub fn generations(&self) -> HashMap<StateId, usize> {
        let mut depths = vec![0_usize; self.records.len()];
        for pos in self.top_down_positions() {
            let depth = self
                .parent_position(pos)
                .and_then(|parent| depths.get(parent).copied())
                .map_or(0, |above| above.saturating_add(1));
            if let Some(slot) = depths.get_mut(pos) {
                *slot = depth;
            }
        }
        self.records
            .iter()
            .zip(depths)
            .map(|(record, depth)| (record.id, depth))
            .collect()
    }

    /// Records sharing this record's stored `parent_id`, excluding itself.
    ///
    /// Roots are siblings of every other record with no parent.
    pub fn siblings(&self, id: StateId) -> Vec<&'a StateRecord> {
        let Some(record) = self.record(id) else {
            return Vec::new();
        };
        self.records
            .iter()
            .copied()
            .filter(|other| other.id != id && other.parent_id == record.parent_id)
            .collect()
    }

    /// The closest strict ancestor matching `predicate`.
    pub fn nearest_ancestor<P>(&self, id: StateId, predicate: P) -> Option<&'a StateRecord>
    where
        P: Fn(&StateRecord) -> bool,
    {
        let start = self.position(id)?;
        self.walk_up(start)
            .skip(1)
            .filter_map(|pos| self.at(pos))
            .find(|&record| predicate(record))
    }

    // -------------------------------------------------------------------
    // Predicates for the persistence collaborator
    // -------------------------------------------------------------------

    /// Whether the record may be deleted: it exists and has no children.
    pub fn can_delete(&self, id: StateId) -> bool {
        self.position(id).is_some() && self.children(id).is_empty()
    }

    /// Whether a new child with the given operation may be recorded under
    /// `parent`. Harvested records accept measurements but no operations.
    pub fn can_parent(&self, parent: StateId, child_operation: Option<OperationType>) -> bool {
        self.record(parent).is_some_and(|record| {
            !record.is_terminal() || !child_operation.is_some_and(OperationType::is_process_start)
        })
    }

    /// Every data-quality condition in the collection.
    pub fn issues(&self) -> Vec<LineageIssue> {
        let mut issues: Vec<LineageIssue> = self
            .duplicates
            .iter()
            .map(|id| LineageIssue::DuplicateId { id: *id })
            .collect();

        for (pos, record) in self.records.iter().enumerate() {
            let stored = self.stored_parents.get(pos).copied().flatten();
            match (record.parent_id, stored) {
                (Some(parent), None) => {
                    issues.push(LineageIssue::DanglingParent {
                        id: record.id,
                        parent,
                    });
                }
                (Some(parent), Some(parent_pos)) => {
                    let harvested = self.at(parent_pos).is_some_and(StateRecord::is_terminal);
                    if harvested && record.is_process_start() {
                        issues.push(LineageIssue::HarvestedParent {
                            parent,
                            child: record.id,
                        });
                    }
                }
                (None, _) => {}
            }
            if self.on_cycle.get(pos).copied().unwrap_or(false) {
                issues.push(LineageIssue::CycleMember { id: record.id });
            }
        }

        issues
    }

    // -------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------

    fn position(&self, id: StateId) -> Option<usize> {
        self.positions.get(&id).copied()
    }

    fn at(&self, pos: usize) -> Option<&'a StateRecord> {
        self.records.get(pos).copied()
    }

    fn parent_position(&self, pos: usize) -> Option<usize> {
        self.parents.get(pos).copied().flatten()
    }

    /// Breadth-first positions over the traversal forest.
    ///
    /// Cycle members have no traversal parent, so the forest is acyclic and
    /// every position is reached exactly once.
    fn top_down_positions(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.records.len())
            .filter(|pos| self.parent_position(*pos).is_none())
            .collect();
        let mut cursor = 0_usize;
        while let Some(pos) = order.get(cursor).copied() {
            order.extend(self.children.get(pos).into_iter().flatten().copied());
            cursor = cursor.saturating_add(1);
        }
        order
    }

    /// Positions from `start` up to its root, `start` first.
    fn walk_up(&self, start: usize) -> WalkUp<'_, 'a> {
        WalkUp {
            index: self,
            next: Some(start),
            visited: HashSet::new(),
        }
    }
}

/// Iterator over traversal parents with a visited guard.
struct WalkUp<'i, 'a> {
    index: &'i LineageIndex<'a>,
    next: Option<usize>,
    visited: HashSet<usize>,
}

impl Iterator for WalkUp<'_, '_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let current = self.next.take()?;
        if !self.visited.insert(current) {
            return None;
        }
        self.next = self.index.parent_position(current);
        Some(current)
    }
}

/// Child positions per position, skipping self-links.
fn child_lists(parents: &[Option<usize>]) -> Vec<Vec<usize>> {
    let mut children = vec![Vec::new(); parents.len()];
    for (child, parent) in parents.iter().enumerate() {
        if let Some(slot) = parent
            .filter(|p| *p != child)
            .and_then(|p| children.get_mut(p))
        {
            slot.push(child);
        }
    }
    children
}

/// Mark every position that lies on a cycle of stored parent links.
///
/// Each walk follows parents until it reaches a position finished by an
/// earlier walk, a root, or a position already on the current path; the last
/// case closes a cycle made of the path suffix starting at that position.
fn detect_cycles(parents: &[Option<usize>]) -> Vec<bool> {
    let mut marks = vec![Mark::Unvisited; parents.len()];
    let mut on_cycle = vec![false; parents.len()];

    for start in 0..parents.len() {
        let mut path = Vec::new();
        let mut cursor = Some(start);

        while let Some(pos) = cursor {
            match marks.get(pos).copied() {
                Some(Mark::Unvisited) => {
                    if let Some(mark) = marks.get_mut(pos) {
                        *mark = Mark::OnPath;
                    }
                    path.push(pos);
                    cursor = parents.get(pos).copied().flatten();
                }
                Some(Mark::OnPath) => {
                    if let Some(entry) = path.iter().position(|p| *p == pos) {
                        for member in path.iter().skip(entry) {
                            if let Some(flag) = on_cycle.get_mut(*member) {
                                *flag = true;
                            }
                        }
                    }
                    cursor = None;
                }
                Some(Mark::Done) | None => cursor = None,
            }
        }

        for pos in path {
            if let Some(mark) = marks.get_mut(pos) {
                *mark = Mark::Done;
            }
        }
    }

    on_cycle
}

// ---------------------------------------------------------------------------
// Free-function forms
// ---------------------------------------------------------------------------

/// Root-to-record chain, see [`LineageIndex::ancestors`].
pub fn ancestors(records: &[StateRecord], id: StateId) -> Vec<&StateRecord> {
    LineageIndex::new(records).ancestors(id)
}

/// Record plus everything beneath it, see [`LineageIndex::descendants`].
pub fn descendants(records: &[StateRecord], id: StateId) -> Vec<&StateRecord> {
    LineageIndex::new(records).descendants(id)
}

/// Distance from the nearest root, see [`LineageIndex::generation`].
pub fn generation(records: &[StateRecord], id: StateId) -> Option<usize> {
    LineageIndex::new(records).generation(id)
}

/// Records sharing a parent, see [`LineageIndex::siblings`].
pub fn siblings(records: &[StateRecord], id: StateId) -> Vec<&StateRecord> {
    LineageIndex::new(records).siblings(id)
}
