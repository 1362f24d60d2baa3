//! Read-side helpers for renderers, exporters and the guest sidebar.
//!
//! Everything here is derived from the current tables and guests on each
//! call.

use crate::conflicts::ConflictSet;
use crate::engine::seated;
use crate::registry::TableRegistry;
use crate::types::{Conflict, Guest, Table};
use serde::{Deserialize, Serialize};

/// Attending guests without a table whose name contains `search`
///
/// Matching is case-insensitive; an empty search matches everyone.
#[must_use]
pub fn unseated_attending<'a>(guests: &'a [Guest], search: &str) -> Vec<&'a Guest> {
    let needle = search.trim().to_lowercase();
    guests
        .iter()
        .filter(|g| g.is_attending() && !g.is_seated())
        .filter(|g| needle.is_empty() || g.full_name.to_lowercase().contains(&needle))
        .collect()
}

/// A table as a renderer sees it
#[derive(Debug, Clone, PartialEq)]
pub struct TableView<'a> {
    /// The table
    pub table: &'a Table,
    /// Guests seated there, in roster order
    pub guests: Vec<&'a Guest>,
    /// Conflicts that apply among those guests
    pub conflicts: Vec<&'a Conflict>,
}

impl<'a> TableView<'a> {
    /// Builds the view of one table
    #[must_use]
    pub fn new(table: &'a Table, guests: &'a [Guest], conflicts: &'a ConflictSet) -> Self {
        let seated = seated(guests, &table.id);
        let conflicts = conflicts.conflicts_among(seated.iter().copied());
        Self {
            table,
            guests: seated,
            conflicts,
        }
    }

    /// Number of seated guests
    #[must_use]
    pub fn seated_count(&self) -> usize {
        self.guests.len()
    }

    /// Whether no seat is free
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.seated_count() as u64 >= u64::from(self.table.capacity)
    }

    /// Whether more guests sit here than the table is designed for
    #[must_use]
    pub fn is_over_capacity(&self) -> bool {
        self.seated_count() as u64 > u64::from(self.table.capacity)
    }

    /// Whether a conflicting pair sits here
    #[must_use]
    pub fn has_conflict(&self) -> bool {
        !self.conflicts.is_empty()
    }

    /// Seats still free, never negative
    #[must_use]
    pub fn free_seats(&self) -> u64 {
        u64::from(self.table.capacity).saturating_sub(self.seated_count() as u64)
    }

    /// `"seated/capacity"`, as printed under the table name
    #[must_use]
    pub fn occupancy_label(&self) -> String {
        format!("{}/{}", self.seated_count(), self.table.capacity)
    }
}

/// Views of every table, in registry order
#[must_use]
pub fn table_views<'a>(
    tables: &'a TableRegistry,
    guests: &'a [Guest],
    conflicts: &'a ConflictSet,
) -> Vec<TableView<'a>> {
    tables
        .iter()
        .map(|table| TableView::new(table, guests, conflicts))
        .collect()
}

/// Headline numbers for the whole seating plan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatingSummary {
    /// Number of tables
    pub tables: usize,
    /// Sum of table capacities
    pub total_capacity: u64,
    /// Guests with a table
    pub seated: usize,
    /// Attending guests still without a table
    pub unseated_attending: usize,
    /// Free seats across tables that are not full
    pub free_seats: u64,
    /// Tables with no free seat
    pub full_tables: usize,
    /// Tables holding more guests than their capacity
    pub over_capacity_tables: usize,
    /// Tables where a conflicting pair sits
    pub conflicted_tables: usize,
}

impl SeatingSummary {
    /// Computes the summary from the current state
    #[must_use]
    pub fn compute(tables: &TableRegistry, guests: &[Guest], conflicts: &ConflictSet) -> Self {
        let views = table_views(tables, guests, conflicts);
        Self {
            tables: tables.len(),
            total_capacity: tables.total_capacity(),
            seated: views.iter().map(TableView::seated_count).sum(),
            unseated_attending: unseated_attending(guests, "").len(),
            free_seats: views.iter().map(TableView::free_seats).sum(),
            full_tables: views.iter().filter(|v| v.is_full()).count(),
            over_capacity_tables: views.iter().filter(|v| v.is_over_capacity()).count(),
            conflicted_tables: views.iter().filter(|v| v.has_conflict()).count(),
        }
    }
}

/// Tables and guests as handed to the persistence layer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeatingSnapshot {
    /// Tables in registry order
    pub tables: Vec<Table>,
    /// The roster with current seats
    pub guests: Vec<Guest>,
}
