//! Seating assignment engine for a wedding reception.
//!
//! The engine keeps a registry of physical tables, seats guests at them
//! under a soft capacity rule, flags tables where declared conflicts sit
//! together, fills empty seats automatically in a group-cohesive way, and
//! tracks where tables sit on the hall canvas.
//!
//! Guests belong to an external roster. The engine reads them and only ever
//! rewrites each guest's `table_id`; seated counts are always derived from
//! the roster.
//!
//! The free functions in [`engine`], [`registry`], [`conflicts`] and
//! [`layout`] work on plain values. The [`SeatingReducer`] wraps them as
//! commands and events for a [`SeatingStore`], which publishes every change
//! to its subscribers.
//!
//! # Quick Start
//!
//! ```
//! use seating::{SeatingAction, SeatingEnvironment, SeatingReducer, SeatingStore, sample};
//! use seating_core::environment::UuidGenerator;
//! use std::sync::Arc;
//!
//! let env = SeatingEnvironment::new(Arc::new(UuidGenerator));
//! let mut store = SeatingStore::new(sample::reception(), SeatingReducer::new(), env);
//!
//! store.send(SeatingAction::AutoAssign);
//!
//! let summary = store.state(seating::SeatingState::summary);
//! assert_eq!(summary.seated, 3);
//! assert_eq!(summary.unseated_attending, 0);
//! ```

pub mod config;
pub mod conflicts;
pub mod engine;
pub mod layout;
pub mod query;
pub mod reducer;
pub mod registry;
pub mod sample;
pub mod state;
pub mod types;

// Re-export commonly used types
pub use config::{ConfigError, SeatingConfig};
pub use conflicts::{ConflictSet, has_conflict};
pub use engine::{
    AssignOptions, AutoAssignOptions, AutoAssignReport, ConflictPolicy, Placement, SeatChange,
    SeatOutcome, TableFull, assign_guest, auto_assign, auto_assign_with, unassign_guest,
};
pub use layout::{CANVAS, Canvas, LayoutState, move_table};
pub use query::{SeatingSnapshot, SeatingSummary, TableView, unseated_attending};
pub use reducer::{SeatingEnvironment, SeatingReducer};
pub use registry::{RegistryError, TableDefaults, TableDraft, TablePatch, TableRegistry};
pub use state::{SeatingAction, SeatingState};
pub use types::{
    Conflict, ConflictId, Guest, GuestGroup, GuestId, Position, RsvpStatus, Side, Table, TableId,
    TableShape,
};

/// A store running the seating reducer
pub type SeatingStore =
    seating_runtime::Store<SeatingState, SeatingAction, SeatingEnvironment, SeatingReducer>;
