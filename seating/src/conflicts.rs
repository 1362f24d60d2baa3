//! Conflict Set and evaluator.
//!
//! Conflicts are advisory: they are reported per table but never block an
//! assignment. The set is supplied from outside and is read-only here.

use crate::types::{Conflict, Guest, GuestId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Immutable collection of guest-pair incompatibilities
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConflictSet {
    conflicts: Vec<Conflict>,
}

impl ConflictSet {
    /// Wraps the supplied conflict records
    #[must_use]
    pub fn new(conflicts: impl IntoIterator<Item = Conflict>) -> Self {
        Self {
            conflicts: conflicts.into_iter().collect(),
        }
    }

    /// An empty set
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            conflicts: Vec::new(),
        }
    }

    /// The records, in the order they were supplied
    #[must_use]
    pub fn as_slice(&self) -> &[Conflict] {
        &self.conflicts
    }

    /// Number of records
    #[must_use]
    pub fn len(&self) -> usize {
        self.conflicts.len()
    }

    /// Whether the set has no records
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.conflicts.is_empty()
    }

    /// Whether the unordered pair `{a, b}` is declared incompatible
    #[must_use]
    pub fn are_conflicting(&self, a: &GuestId, b: &GuestId) -> bool {
        a != b && self.conflicts.iter().any(|c| c.matches_pair(a, b))
    }

    /// Whether any record mentions `guest`
    #[must_use]
    pub fn involves(&self, guest: &GuestId) -> bool {
        self.conflicts
            .iter()
            .any(|c| !c.is_degenerate() && c.involves(guest))
    }

    /// Whether `table_guests` contains a conflicting pair
    #[must_use]
    pub fn has_conflict<'a, I>(&self, table_guests: I) -> bool
    where
        I: IntoIterator<Item = &'a Guest>,
    {
        has_conflict(table_guests, &self.conflicts)
    }

    /// The records that apply among `table_guests`, in supplied order
    #[must_use]
    pub fn conflicts_among<'a, I>(&self, table_guests: I) -> Vec<&Conflict>
    where
        I: IntoIterator<Item = &'a Guest>,
    {
        let present = guest_ids(table_guests);
        if present.len() < 2 {
            return Vec::new();
        }
        self.conflicts
            .iter()
            .filter(|c| applies(c, &present))
            .collect()
    }
}

impl FromIterator<Conflict> for ConflictSet {
    fn from_iter<T: IntoIterator<Item = Conflict>>(iter: T) -> Self {
        Self::new(iter)
    }
}

/// Returns true iff some conflict has both of its guests in `table_guests`.
///
/// Pair matching is symmetric. With fewer than two guests this is always false.
#[must_use]
pub fn has_conflict<'a, I>(table_guests: I, conflicts: &[Conflict]) -> bool
where
    I: IntoIterator<Item = &'a Guest>,
{
    let present = guest_ids(table_guests);
    present.len() >= 2 && conflicts.iter().any(|c| applies(c, &present))
}

fn guest_ids<'a, I>(guests: I) -> HashSet<&'a GuestId>
where
    I: IntoIterator<Item = &'a Guest>,
{
    guests.into_iter().map(|g| &g.id).collect()
}

fn applies(conflict: &Conflict, present: &HashSet<&GuestId>) -> bool {
    !conflict.is_degenerate()
        && present.contains(&conflict.guest_a)
        && present.contains(&conflict.guest_b)
}
