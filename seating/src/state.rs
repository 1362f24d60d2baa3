//! Seating state and actions.
//!
//! All engine state lives in one owned [`SeatingState`]. Every operation is a
//! [`SeatingAction`] command; the reducer answers it with an event action
//! that is applied to the state and published to subscribers.

use crate::conflicts::ConflictSet;
use crate::engine::{Placement, TableFull};
use crate::layout::LayoutState;
use crate::query::{SeatingSnapshot, SeatingSummary, TableView, table_views};
use crate::registry::{TableDraft, TablePatch, TableRegistry};
use crate::types::{Guest, GuestId, Position, Table, TableId};
use serde::{Deserialize, Serialize};

/// The in-memory seating plan
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SeatingState {
    /// Physical tables in registry order
    pub tables: TableRegistry,
    /// Latest roster snapshot supplied by the guest roster
    pub guests: Vec<Guest>,
    /// Declared incompatibilities
    pub conflicts: ConflictSet,
    /// Transient drag state
    #[serde(skip)]
    pub layout: LayoutState,
    /// Last capacity rejection, cleared by the next accepted command
    pub last_rejection: Option<TableFull>,
    /// Last validation error (if any)
    pub last_error: Option<String>,
}

impl SeatingState {
    /// Creates a state from existing tables, roster and conflicts
    ///
    /// Seats pointing at tables that do not exist are cleared.
    #[must_use]
    pub fn new(tables: TableRegistry, guests: Vec<Guest>, conflicts: ConflictSet) -> Self {
        let mut state = Self {
            tables,
            guests,
            conflicts,
            ..Self::default()
        };
        state.clear_dangling_seats();
        state
    }

    /// Clears `table_id` on guests whose table is not registered
    ///
    /// Returns the affected guests in roster order.
    pub fn clear_dangling_seats(&mut self) -> Vec<GuestId> {
        let tables = &self.tables;
        self.guests
            .iter_mut()
            .filter(|g| g.table_id.as_ref().is_some_and(|t| !tables.contains(t)))
            .map(|g| {
                g.table_id = None;
                g.id.clone()
            })
            .collect()
    }

    /// Looks up a guest
    #[must_use]
    pub fn guest(&self, id: &GuestId) -> Option<&Guest> {
        self.guests.iter().find(|g| g.id == *id)
    }

    /// Looks up a table
    #[must_use]
    pub fn table(&self, id: &TableId) -> Option<&Table> {
        self.tables.get(id)
    }

    /// Guests seated at `table_id`
    #[must_use]
    pub fn seated(&self, table_id: &TableId) -> Vec<&Guest> {
        crate::engine::seated(&self.guests, table_id)
    }

    /// Number of guests seated at `table_id`
    #[must_use]
    pub fn seated_count(&self, table_id: &TableId) -> usize {
        crate::engine::seated_count(&self.guests, table_id)
    }

    /// Whether a conflicting pair sits at `table_id`
    #[must_use]
    pub fn has_conflict(&self, table_id: &TableId) -> bool {
        self.conflicts.has_conflict(self.seated(table_id))
    }

    /// Views of every table for rendering
    #[must_use]
    pub fn table_views(&self) -> Vec<TableView<'_>> {
        table_views(&self.tables, &self.guests, &self.conflicts)
    }

    /// Headline numbers
    #[must_use]
    pub fn summary(&self) -> SeatingSummary {
        SeatingSummary::compute(&self.tables, &self.guests, &self.conflicts)
    }

    /// Tables and guests for the persistence layer
    #[must_use]
    pub fn snapshot(&self) -> SeatingSnapshot {
        SeatingSnapshot {
            tables: self.tables.as_slice().to_vec(),
            guests: self.guests.clone(),
        }
    }
}

/// Actions representing commands and events for the seating plan
///
/// Commands express intent and are validated by the reducer. Events are
/// facts; applying an event again reproduces the same state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SeatingAction {
    // ========== Commands ==========
    /// Command: Create a table
    AddTable {
        /// Requested fields; unset ones use the configured defaults
        draft: TableDraft,
    },

    /// Command: Rename, reshape, resize or reposition a table
    UpdateTable {
        /// Table to change
        table_id: TableId,
        /// Fields to change
        patch: TablePatch,
    },

    /// Command: Delete a table, unseating its guests (already confirmed by the caller)
    DeleteTable {
        /// Table to delete
        table_id: TableId,
    },

    /// Command: Seat a guest
    AssignGuest {
        /// Guest to seat
        guest_id: GuestId,
        /// Destination table
        table_id: TableId,
        /// The caller confirmed seating beyond capacity
        allow_over_capacity: bool,
    },

    /// Command: Clear a guest's seat
    UnassignGuest {
        /// Guest to unseat
        guest_id: GuestId,
    },

    /// Command: Place unassigned attending guests automatically
    AutoAssign,

    /// Command: Set a table's position
    MoveTable {
        /// Table to move
        table_id: TableId,
        /// New top-left corner; clamped to non-negative coordinates
        position: Position,
    },

    /// Command: Start dragging a table
    BeginDrag {
        /// Table under the pointer
        table_id: TableId,
        /// Pointer offset from the table corner; the configured default when absent
        grab_offset: Option<Position>,
    },

    /// Command: Pointer moved during a drag
    DragTo {
        /// Pointer position on the canvas
        pointer: Position,
    },

    /// Command: Pointer released
    EndDrag,

    /// Command: Replace the roster with the latest snapshot from the guest roster
    LoadRoster {
        /// The roster
        guests: Vec<Guest>,
    },

    // ========== Events ==========
    /// Event: A table was created
    TableAdded {
        /// The new table
        table: Table,
    },

    /// Event: A table's fields changed
    TableUpdated {
        /// The table after the change
        table: Table,
    },

    /// Event: A table was deleted and its guests unseated
    TableDeleted {
        /// The deleted table
        table_id: TableId,
        /// Guests whose seat was cleared
        unseated: Vec<GuestId>,
    },

    /// Event: A guest was seated
    GuestSeated {
        /// The guest
        guest_id: GuestId,
        /// The table
        table_id: TableId,
        /// Table the guest left, if any
        previous: Option<TableId>,
        /// The table is over capacity after this seat
        over_capacity: bool,
    },

    /// Event: A guest's seat was cleared
    GuestUnseated {
        /// The guest
        guest_id: GuestId,
        /// The table they left
        table_id: TableId,
    },

    /// Event: A seat request hit a full table
    AssignmentRejected {
        /// The guest that was not seated
        guest_id: GuestId,
        /// Details for the confirmation prompt
        rejection: TableFull,
    },

    /// Event: Auto-assignment placed guests
    GuestsAutoAssigned {
        /// Placements in the order they were made
        placements: Vec<Placement>,
        /// Eligible guests still without a table
        unplaced: Vec<GuestId>,
    },

    /// Event: A table moved
    TableMoved {
        /// The table
        table_id: TableId,
        /// Its stored position
        position: Position,
    },

    /// Event: A drag started
    DragStarted {
        /// The dragged table
        table_id: TableId,
        /// Pointer offset from the table corner
        grab_offset: Position,
    },

    /// Event: A drag ended
    DragEnded {
        /// The table that was dragged
        table_id: TableId,
    },

    /// Event: The roster was replaced
    RosterLoaded {
        /// The roster as stored, dangling seats already cleared
        guests: Vec<Guest>,
        /// Guests whose seat referenced a missing table
        cleared: Vec<GuestId>,
    },

    /// Event: Command validation failed
    ValidationFailed {
        /// Error message
        error: String,
    },
}

impl SeatingAction {
    /// Whether this action is a command
    #[must_use]
    pub const fn is_command(&self) -> bool {
        matches!(
            self,
            Self::AddTable { .. }
                | Self::UpdateTable { .. }
                | Self::DeleteTable { .. }
                | Self::AssignGuest { .. }
                | Self::UnassignGuest { .. }
                | Self::AutoAssign
                | Self::MoveTable { .. }
                | Self::BeginDrag { .. }
                | Self::DragTo { .. }
                | Self::EndDrag
                | Self::LoadRoster { .. }
        )
    }

    /// Whether this action is an event
    #[must_use]
    pub const fn is_event(&self) -> bool {
        !self.is_command()
    }

    /// Whether the event changed which guest sits where
    ///
    /// The guest roster owner listens for these to persist new seats.
    #[must_use]
    pub fn changes_seats(&self) -> bool {
        match self {
            Self::TableDeleted { unseated, .. } => !unseated.is_empty(),
            Self::GuestsAutoAssigned { placements, .. } => !placements.is_empty(),
            Self::RosterLoaded { cleared, .. } => !cleared.is_empty(),
            Self::GuestSeated { .. } | Self::GuestUnseated { .. } => true,
            _ => false,
        }
    }
}
