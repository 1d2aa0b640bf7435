//! Differences between two snapshots of the same directory.

use std::cmp::Ordering;

use x402_registry_core::{DirectoryEntry, Snapshot};

/// What changed between an older and a newer snapshot, keyed by id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotDiff {
    /// Ids only in the newer snapshot.
    pub added: Vec<DirectoryEntry>,
    /// Ids only in the older snapshot.
    pub removed: Vec<DirectoryEntry>,
    /// Ids in both whose entry differs, as `(old, new)`.
    pub changed: Vec<(DirectoryEntry, DirectoryEntry)>,
}

impl SnapshotDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.changed.is_empty()
    }
}

/// Compare two snapshots in one merge walk over their id order.
pub fn diff_snapshots(old: &Snapshot, new: &Snapshot) -> SnapshotDiff {
    let mut diff = SnapshotDiff::default();
    let mut a = old.iter().peekable();
    let mut b = new.iter().peekable();

    loop {
        match (a.peek(), b.peek()) {
            (Some(x), Some(y)) => match x.id.cmp(&y.id) {
                Ordering::Less => {
                    diff.removed.push((*x).clone());
                    a.next();
                }
                Ordering::Greater => {
                    diff.added.push((*y).clone());
                    b.next();
                }
                Ordering::Equal => {
                    if x != y {
                        diff.changed.push(((*x).clone(), (*y).clone()));
                    }
                    a.next();
                    b.next();
                }
            },
            (Some(x), None) => {
                diff.removed.push((*x).clone());
                a.next();
            }
            (None, Some(y)) => {
                diff.added.push((*y).clone());
                b.next();
            }
            (None, None) => break,
        }
    }

    diff
}
