//! Reducer logic for the seating plan.
//!
//! Commands are validated against the current state and turned into events.
//! Each event is applied to the state and published so the guest roster and
//! renderers can follow along. Requests that refer to unknown tables or
//! guests are silent no-ops.

use crate::config::SeatingConfig;
use crate::engine::{
    AssignOptions, AutoAssignOptions, SeatChange, SeatOutcome, apply_placements,
    apply_seat_change, plan_assignment, plan_auto_assign,
};
use crate::registry::{TableDefaults, TableDraft, TablePatch};
use crate::state::{SeatingAction, SeatingState};
use crate::types::{Guest, GuestId, Position, TableId};
use seating_core::{
    SmallVec, effect::Effect, environment::IdGenerator, reducer::Reducer, smallvec,
};
use std::sync::Arc;

/// Environment dependencies for the seating reducer
#[derive(Clone)]
pub struct SeatingEnvironment {
    /// Source of new table ids
    pub ids: Arc<dyn IdGenerator>,
    /// Defaults for new tables
    pub defaults: TableDefaults,
    /// Auto-assignment behavior
    pub auto_assign: AutoAssignOptions,
    /// Grab offset used when a drag does not supply one
    pub grab_offset: Position,
}

impl SeatingEnvironment {
    /// Creates an environment with default settings
    #[must_use]
    pub fn new(ids: Arc<dyn IdGenerator>) -> Self {
        Self::from_config(ids, &SeatingConfig::default())
    }

    /// Creates an environment from loaded configuration
    #[must_use]
    pub fn from_config(ids: Arc<dyn IdGenerator>, config: &SeatingConfig) -> Self {
        Self {
            ids,
            defaults: config.defaults.clone(),
            auto_assign: config.auto_assign(),
            grab_offset: config.grab_offset(),
        }
    }
}

/// Reducer for the seating plan
#[derive(Clone, Debug)]
pub struct SeatingReducer;

type Effects = SmallVec<[Effect<SeatingAction>; 4]>;

impl SeatingReducer {
    /// Creates a new `SeatingReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Applies `event` to the state and publishes it
    fn emit(state: &mut SeatingState, event: SeatingAction) -> Effects {
        Self::apply_event(state, &event);
        smallvec![Effect::Publish(event)]
    }

    fn add_table(state: &SeatingState, draft: TableDraft, env: &SeatingEnvironment) -> SeatingAction {
        let id = TableId::new(env.ids.next_id());
        match state.tables.prepare(id, draft, &env.defaults) {
            Ok(table) => {
                tracing::info!(table_id = %table.id, name = %table.name, "Table added");
                SeatingAction::TableAdded { table }
            },
            Err(error) => SeatingAction::ValidationFailed {
                error: error.to_string(),
            },
        }
    }

    fn update_table(
        state: &SeatingState,
        table_id: &TableId,
        patch: TablePatch,
    ) -> Option<SeatingAction> {
        let current = state.tables.get(table_id)?;
        let mut table = current.clone();
        patch.apply_to(&mut table);
        (table != *current).then_some(SeatingAction::TableUpdated { table })
    }

    fn delete_table(state: &SeatingState, table_id: TableId) -> Option<SeatingAction> {
        if !state.tables.contains(&table_id) {
            return None;
        }
        let unseated = state
            .seated(&table_id)
            .into_iter()
            .map(|g| g.id.clone())
            .collect::<Vec<_>>();
        tracing::info!(%table_id, unseated = unseated.len(), "Table deleted");
        Some(SeatingAction::TableDeleted { table_id, unseated })
    }

    fn assign_guest(
        state: &SeatingState,
        guest_id: &GuestId,
        table_id: &TableId,
        allow_over_capacity: bool,
    ) -> Option<SeatingAction> {
        let options = AssignOptions {
            allow_over_capacity,
        };
        match plan_assignment(&state.tables, &state.guests, guest_id, table_id, options) {
            Ok(SeatOutcome::Seated(change)) => Some(SeatingAction::GuestSeated {
                guest_id: change.guest_id,
                table_id: change.table_id,
                previous: change.previous,
                over_capacity: change.over_capacity,
            }),
            Ok(SeatOutcome::Unchanged) => None,
            Err(rejection) => {
                tracing::warn!(%guest_id, %rejection, "Assignment needs confirmation");
                Some(SeatingAction::AssignmentRejected {
                    guest_id: guest_id.clone(),
                    rejection,
                })
            },
        }
    }

    fn auto_assign(state: &SeatingState, env: &SeatingEnvironment) -> Option<SeatingAction> {
        let report = plan_auto_assign(
            &state.guests,
            state.tables.as_slice(),
            &state.conflicts,
            &env.auto_assign,
        );
        tracing::info!(
            placed = report.placed.len(),
            unplaced = report.unplaced.len(),
            policy = ?env.auto_assign.conflict_policy,
            "Auto-assignment planned"
        );
        if report.placed.is_empty() {
            return None;
        }
        Some(SeatingAction::GuestsAutoAssigned {
            placements: report.placed,
            unplaced: report.unplaced,
        })
    }

    fn load_roster(state: &SeatingState, mut guests: Vec<Guest>) -> SeatingAction {
        let cleared = guests
            .iter_mut()
            .filter(|g| {
                g.table_id
                    .as_ref()
                    .is_some_and(|t| !state.tables.contains(t))
            })
            .map(|g| {
                g.table_id = None;
                g.id.clone()
            })
            .collect::<Vec<_>>();
        if !cleared.is_empty() {
            tracing::warn!(count = cleared.len(), "Cleared seats at unknown tables");
        }
        SeatingAction::RosterLoaded { guests, cleared }
    }

    /// Applies an event to state.
    ///
    /// Events that would leave a seat at a missing table or a table without
    /// seats are dropped with a warning.
    fn apply_event(state: &mut SeatingState, action: &SeatingAction) {
        match action {
            SeatingAction::TableAdded { table } => {
                if let Err(error) = state.tables.insert(table.clone()) {
                    tracing::warn!(table_id = %table.id, %error, "Ignoring table added event");
                    return;
                }
                state.last_error = None;
                state.last_rejection = None;
            },
            SeatingAction::TableUpdated { table } => {
                if !state.tables.replace(table.clone()) {
                    tracing::warn!(table_id = %table.id, "Ignoring invalid table update");
                    return;
                }
                state.last_error = None;
                state.last_rejection = None;
            },
            SeatingAction::TableDeleted { table_id, .. } => {
                state.tables.delete(table_id, &mut state.guests);
                state.layout.forget_table(table_id);
                state.last_error = None;
                state.last_rejection = None;
            },
            SeatingAction::GuestSeated {
                guest_id,
                table_id,
                previous,
                over_capacity,
            } => {
                if !state.tables.contains(table_id) {
                    tracing::warn!(%guest_id, %table_id, "Ignoring seat at unknown table");
                    return;
                }
                apply_seat_change(
                    &mut state.guests,
                    &SeatChange {
                        guest_id: guest_id.clone(),
                        table_id: table_id.clone(),
                        previous: previous.clone(),
                        over_capacity: *over_capacity,
                    },
                );
                state.last_error = None;
                state.last_rejection = None;
            },
            SeatingAction::GuestUnseated { guest_id, table_id } => {
                if let Some(guest) = state
                    .guests
                    .iter_mut()
                    .find(|g| g.id == *guest_id && g.is_seated_at(table_id))
                {
                    guest.table_id = None;
                }
                state.last_error = None;
                state.last_rejection = None;
            },
            SeatingAction::AssignmentRejected { rejection, .. } => {
                state.last_rejection = Some(rejection.clone());
            },
            SeatingAction::GuestsAutoAssigned { placements, .. } => {
                let (valid, stale): (Vec<_>, Vec<_>) = placements
                    .iter()
                    .cloned()
                    .partition(|p| state.tables.contains(&p.table_id));
                if !stale.is_empty() {
                    tracing::warn!(count = stale.len(), "Ignoring placements at unknown tables");
                }
                apply_placements(&mut state.guests, &valid);
                state.last_error = None;
                state.last_rejection = None;
            },
            SeatingAction::TableMoved { table_id, position } => {
                state.tables.move_to(table_id, *position);
            },
            SeatingAction::DragStarted {
                table_id,
                grab_offset,
            } => {
                state.layout.begin_drag(&state.tables, table_id, *grab_offset);
            },
            SeatingAction::DragEnded { table_id } => {
                if state.layout.dragged_table() == Some(table_id) {
                    state.layout.end_drag();
                }
            },
            SeatingAction::RosterLoaded { guests, .. } => {
                state.guests.clone_from(guests);
                state.clear_dangling_seats();
            },
            SeatingAction::ValidationFailed { error } => {
                state.last_error = Some(error.clone());
            },
            // Commands are not applied to state
            SeatingAction::AddTable { .. }
            | SeatingAction::UpdateTable { .. }
            | SeatingAction::DeleteTable { .. }
            | SeatingAction::AssignGuest { .. }
            | SeatingAction::UnassignGuest { .. }
            | SeatingAction::AutoAssign
            | SeatingAction::MoveTable { .. }
            | SeatingAction::BeginDrag { .. }
            | SeatingAction::DragTo { .. }
            | SeatingAction::EndDrag
            | SeatingAction::LoadRoster { .. } => {},
        }
    }
}

impl Default for SeatingReducer {
    fn default() -> Self {
        Self::new()
    }
}

impl Reducer for SeatingReducer {
    type State = SeatingState;
    type Action = SeatingAction;
    type Environment = SeatingEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        let event = match action {
            // ========== Commands ==========
            SeatingAction::AddTable { draft } => Some(Self::add_table(state, draft, env)),

            SeatingAction::UpdateTable { table_id, patch } => {
                Self::update_table(state, &table_id, patch)
            },

            SeatingAction::DeleteTable { table_id } => Self::delete_table(state, table_id),

            SeatingAction::AssignGuest {
                guest_id,
                table_id,
                allow_over_capacity,
            } => Self::assign_guest(state, &guest_id, &table_id, allow_over_capacity),

            SeatingAction::UnassignGuest { guest_id } => state
                .guest(&guest_id)
                .and_then(|g| g.table_id.clone())
                .map(|table_id| SeatingAction::GuestUnseated { guest_id, table_id }),

            SeatingAction::AutoAssign => Self::auto_assign(state, env),

            SeatingAction::MoveTable { table_id, position } => state
                .tables
                .contains(&table_id)
                .then(|| SeatingAction::TableMoved {
                    table_id,
                    position: position.clamped(),
                }),

            SeatingAction::BeginDrag {
                table_id,
                grab_offset,
            } => state
                .tables
                .contains(&table_id)
                .then(|| SeatingAction::DragStarted {
                    table_id,
                    grab_offset: grab_offset.unwrap_or(env.grab_offset),
                }),

            SeatingAction::DragTo { pointer } => state
                .layout
                .target_for(pointer)
                .filter(|(table_id, _)| state.tables.contains(table_id))
                .map(|(table_id, position)| SeatingAction::TableMoved { table_id, position }),

            SeatingAction::EndDrag => state
                .layout
                .dragged_table()
                .cloned()
                .map(|table_id| SeatingAction::DragEnded { table_id }),

            SeatingAction::LoadRoster { guests } => Some(Self::load_roster(state, guests)),

            // ========== Events ==========
            SeatingAction::TableAdded { .. }
            | SeatingAction::TableUpdated { .. }
            | SeatingAction::TableDeleted { .. }
            | SeatingAction::GuestSeated { .. }
            | SeatingAction::GuestUnseated { .. }
            | SeatingAction::AssignmentRejected { .. }
            | SeatingAction::GuestsAutoAssigned { .. }
            | SeatingAction::TableMoved { .. }
            | SeatingAction::DragStarted { .. }
            | SeatingAction::DragEnded { .. }
            | SeatingAction::RosterLoaded { .. }
            | SeatingAction::ValidationFailed { .. } => {
                // Replayed events are applied but not published again
                Self::apply_event(state, &action);
                return SmallVec::new();
            },
        };

        match event {
            Some(event) => Self::emit(state, event),
            None => SmallVec::new(),
        }
    }
}
