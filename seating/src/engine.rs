//! Assignment Engine.
//!
//! Seats and unseats guests under the soft capacity rule and runs the bulk
//! auto-assignment pass. Occupancy is always derived from the guest list,
//! never cached.
//!
//! Planning and applying are separate steps: [`plan_assignment`] and
//! [`plan_auto_assign`] only read, [`assign_guest`] and [`auto_assign_with`]
//! write the planned `table_id` values.

use crate::conflicts::ConflictSet;
use crate::registry::TableRegistry;
use crate::types::{Guest, GuestGroup, GuestId, Table, TableId};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

// ============================================================================
// Occupancy
// ============================================================================

/// Guests seated at `table_id`, in roster order
#[must_use]
pub fn seated<'a>(guests: &'a [Guest], table_id: &TableId) -> Vec<&'a Guest> {
    guests.iter().filter(|g| g.is_seated_at(table_id)).collect()
}

/// Number of guests seated at `table_id`
#[must_use]
pub fn seated_count(guests: &[Guest], table_id: &TableId) -> usize {
    guests.iter().filter(|g| g.is_seated_at(table_id)).count()
}

fn capacity_of(table: &Table) -> usize {
    usize::try_from(table.capacity).unwrap_or(usize::MAX)
}

// ============================================================================
// Manual assignment
// ============================================================================

/// Options for a manual assignment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignOptions {
    /// Seat the guest even if the table is already at capacity
    pub allow_over_capacity: bool,
}

impl AssignOptions {
    /// Reject assignments to full tables
    pub const STRICT: Self = Self {
        allow_over_capacity: false,
    };

    /// Confirmed override: seat even when full
    pub const OVERRIDE: Self = Self {
        allow_over_capacity: true,
    };
}

/// The table was full and the caller did not allow going over capacity
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("table \"{table_name}\" is full ({seated}/{capacity})")]
pub struct TableFull {
    /// Table that was asked for
    pub table_id: TableId,
    /// Its display name, for the confirmation prompt
    pub table_name: String,
    /// Its capacity
    pub capacity: u32,
    /// Guests already seated there
    pub seated: usize,
}

/// A validated seat change, ready to be written
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatChange {
    /// Guest being seated
    pub guest_id: GuestId,
    /// Destination table
    pub table_id: TableId,
    /// Table the guest leaves, if any
    pub previous: Option<TableId>,
    /// The table holds more guests than its capacity after the change
    pub over_capacity: bool,
}

/// Outcome of an accepted assignment request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeatOutcome {
    /// The guest now sits at the requested table
    Seated(SeatChange),
    /// Nothing to do: unknown ids, a non-attending guest, or already seated there
    Unchanged,
}

impl SeatOutcome {
    /// The seat change, if one happened
    #[must_use]
    pub const fn change(&self) -> Option<&SeatChange> {
        match self {
            Self::Seated(change) => Some(change),
            Self::Unchanged => None,
        }
    }
}

/// Validates an assignment without changing anything
///
/// Unknown guest or table ids, guests who are not attending and guests who
/// already sit at the table yield [`SeatOutcome::Unchanged`]. Moving a guest
/// between tables is an implicit unseat followed by a seat.
///
/// # Errors
///
/// Returns [`TableFull`] when the table has no free seat and
/// `options.allow_over_capacity` is false.
pub fn plan_assignment(
    tables: &TableRegistry,
    guests: &[Guest],
    guest_id: &GuestId,
    table_id: &TableId,
    options: AssignOptions,
) -> Result<SeatOutcome, TableFull> {
    let Some(guest) = guests.iter().find(|g| g.id == *guest_id) else {
        tracing::debug!(%guest_id, "Ignoring assignment of unknown guest");
        return Ok(SeatOutcome::Unchanged);
    };
    let Some(table) = tables.get(table_id) else {
        tracing::debug!(%table_id, "Ignoring assignment to unknown table");
        return Ok(SeatOutcome::Unchanged);
    };
    if !guest.is_attending() {
        tracing::warn!(%guest_id, status = ?guest.rsvp_status, "Ignoring assignment of non-attending guest");
        return Ok(SeatOutcome::Unchanged);
    }
    if guest.is_seated_at(table_id) {
        return Ok(SeatOutcome::Unchanged);
    }

    let seated = seated_count(guests, table_id);
    let capacity = capacity_of(table);
    if seated >= capacity && !options.allow_over_capacity {
        return Err(TableFull {
            table_id: table.id.clone(),
            table_name: table.name.clone(),
            capacity: table.capacity,
            seated,
        });
    }

    Ok(SeatOutcome::Seated(SeatChange {
        guest_id: guest_id.clone(),
        table_id: table_id.clone(),
        previous: guest.table_id.clone(),
        over_capacity: seated + 1 > capacity,
    }))
}

/// Writes a planned seat change. Returns `false` if the guest is gone.
pub fn apply_seat_change(guests: &mut [Guest], change: &SeatChange) -> bool {
    match guests.iter_mut().find(|g| g.id == change.guest_id) {
        Some(guest) => {
            guest.table_id = Some(change.table_id.clone());
            true
        },
        None => false,
    }
}

/// Seats a guest at a table under the soft capacity rule
///
/// # Errors
///
/// Returns [`TableFull`] without changing state when the table is full and
/// the override is not set. The caller may retry with [`AssignOptions::OVERRIDE`].
pub fn assign_guest(
    tables: &TableRegistry,
    guests: &mut [Guest],
    guest_id: &GuestId,
    table_id: &TableId,
    options: AssignOptions,
) -> Result<SeatOutcome, TableFull> {
    let outcome = plan_assignment(tables, guests, guest_id, table_id, options)?;
    if let SeatOutcome::Seated(change) = &outcome {
        apply_seat_change(guests, change);
        tracing::debug!(
            %guest_id,
            %table_id,
            over_capacity = change.over_capacity,
            "Guest seated"
        );
    }
    Ok(outcome)
}

/// Clears a guest's seat
///
/// Returns the table the guest left. Unknown or already unseated guests
/// return `None`, so calling this twice is the same as calling it once.
pub fn unassign_guest(guests: &mut [Guest], guest_id: &GuestId) -> Option<TableId> {
    guests
        .iter_mut()
        .find(|g| g.id == *guest_id)
        .and_then(|g| g.table_id.take())
}

// ============================================================================
// Auto-assignment
// ============================================================================

/// How auto-assignment treats declared conflicts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictPolicy {
    /// Conflicts are not consulted; they only show up as warnings afterwards
    #[default]
    Ignore,
    /// Never create a conflicting pair while placing; skipped guests may
    /// land at a later table or stay unassigned
    Avoid,
}

impl FromStr for ConflictPolicy {
    type Err = crate::types::ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ignore" => Ok(Self::Ignore),
            "avoid" => Ok(Self::Avoid),
            other => Err(crate::types::ParseEnumError {
                kind: "conflict policy",
                value: other.to_string(),
            }),
        }
    }
}

/// Options for the bulk auto-assignment pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoAssignOptions {
    /// Conflict handling
    pub conflict_policy: ConflictPolicy,
}

/// One guest placed by auto-assignment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    /// The guest
    pub guest_id: GuestId,
    /// Where they were placed
    pub table_id: TableId,
}

/// What an auto-assignment pass did
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoAssignReport {
    /// Placements in the order they were made
    pub placed: Vec<Placement>,
    /// Eligible guests left without a table, in roster order
    pub unplaced: Vec<GuestId>,
}

impl AutoAssignReport {
    /// Whether the pass changed nothing
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.placed.is_empty()
    }
}

/// Remaining members of one group, as indices into the roster
struct GroupPool {
    group: GuestGroup,
    members: Vec<usize>,
}

/// Groups the unassigned attending guests.
///
/// Groups appear in first-encounter order over the roster, members in roster
/// order. This ordering is part of the contract of [`plan_auto_assign`].
fn eligible_groups(guests: &[Guest]) -> Vec<GroupPool> {
    let mut pools: Vec<GroupPool> = Vec::new();
    for (index, guest) in guests.iter().enumerate() {
        if guest.is_seated() || !guest.is_attending() {
            continue;
        }
        match pools.iter_mut().find(|p| p.group == guest.group) {
            Some(pool) => pool.members.push(index),
            None => pools.push(GroupPool {
                group: guest.group,
                members: vec![index],
            }),
        }
    }
    pools
}

/// Whether `candidate` can join `occupants` under the policy
fn fits_socially(
    guests: &[Guest],
    conflicts: &ConflictSet,
    policy: ConflictPolicy,
    occupants: &[usize],
    candidate: usize,
) -> bool {
    policy == ConflictPolicy::Ignore
        || occupants
            .iter()
            .all(|&o| !conflicts.are_conflicting(&guests[o].id, &guests[candidate].id))
}

/// Whether a whole group can join `occupants` under the policy
fn group_fits_socially(
    guests: &[Guest],
    conflicts: &ConflictSet,
    policy: ConflictPolicy,
    occupants: &[usize],
    members: &[usize],
) -> bool {
    if policy == ConflictPolicy::Ignore {
        return true;
    }
    let mut joined = occupants.to_vec();
    for &member in members {
        if !fits_socially(guests, conflicts, policy, &joined, member) {
            return false;
        }
        joined.push(member);
    }
    true
}

/// Computes the auto-assignment placements without changing anything
///
/// Only unassigned, attending guests are considered; seated guests stay put.
/// For each table in registry order with free seats:
///
/// 1. every remaining group small enough to fit whole is placed there, in
///    group order, shrinking the free space as it goes;
/// 2. any seats still free are filled by taking members off the tail of the
///    remaining groups, in group order.
///
/// Guests that do not fit anywhere are reported as unplaced.
#[must_use]
pub fn plan_auto_assign(
    guests: &[Guest],
    tables: &[Table],
    conflicts: &ConflictSet,
    options: &AutoAssignOptions,
) -> AutoAssignReport {
    let policy = options.conflict_policy;
    let mut pools = eligible_groups(guests);
    let mut report = AutoAssignReport::default();

    for table in tables {
        if pools.is_empty() {
            break;
        }
        let mut occupants: Vec<usize> = guests
            .iter()
            .enumerate()
            .filter(|(_, g)| g.is_seated_at(&table.id))
            .map(|(i, _)| i)
            .collect();
        let mut space_left = capacity_of(table).saturating_sub(occupants.len());
        if space_left == 0 {
            continue;
        }

        let mut place = |index: usize, occupants: &mut Vec<usize>| {
            occupants.push(index);
            report.placed.push(Placement {
                guest_id: guests[index].id.clone(),
                table_id: table.id.clone(),
            });
        };

        // Whole groups first.
        let mut i = 0;
        while i < pools.len() {
            let members = &pools[i].members;
            if members.len() <= space_left
                && group_fits_socially(guests, conflicts, policy, &occupants, members)
            {
                let pool = pools.remove(i);
                space_left -= pool.members.len();
                for index in pool.members {
                    place(index, &mut occupants);
                }
            } else {
                i += 1;
            }
        }

        // Then peel individuals off the tails.
        for pool in &mut pools {
            while space_left > 0 {
                let Some(pos) = pool
                    .members
                    .iter()
                    .rposition(|&m| fits_socially(guests, conflicts, policy, &occupants, m))
                else {
                    break;
                };
                let index = pool.members.remove(pos);
                place(index, &mut occupants);
                space_left -= 1;
            }
        }
        pools.retain(|p| !p.members.is_empty());
    }

    let mut leftover: Vec<usize> = pools.into_iter().flat_map(|p| p.members).collect();
    leftover.sort_unstable();
    report.unplaced = leftover.into_iter().map(|i| guests[i].id.clone()).collect();
    report
}

/// Writes auto-assignment placements into the roster
pub fn apply_placements(guests: &mut [Guest], placements: &[Placement]) {
    for placement in placements {
        if let Some(guest) = guests.iter_mut().find(|g| g.id == placement.guest_id) {
            guest.table_id = Some(placement.table_id.clone());
        }
    }
}

/// Runs auto-assignment in place and reports what it did
pub fn auto_assign_with(
    guests: &mut [Guest],
    tables: &[Table],
    conflicts: &ConflictSet,
    options: &AutoAssignOptions,
) -> AutoAssignReport {
    let report = plan_auto_assign(guests, tables, conflicts, options);
    apply_placements(guests, &report.placed);
    tracing::info!(
        placed = report.placed.len(),
        unplaced = report.unplaced.len(),
        policy = ?options.conflict_policy,
        "Auto-assignment finished"
    );
    report
}

/// Places every unassigned attending guest it can and returns the new roster
///
/// Conflicts are not consulted. Guests that do not fit stay unassigned.
#[must_use]
pub fn auto_assign(mut guests: Vec<Guest>, tables: &[Table]) -> Vec<Guest> {
    auto_assign_with(
        &mut guests,
        tables,
        &ConflictSet::empty(),
        &AutoAssignOptions::default(),
    );
    guests
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::{Conflict, Position, RsvpStatus, Side, TableShape};

    fn guest(id: &str, group: GuestGroup) -> Guest {
        Guest::new(id, format!("Guest {id}"), Side::Bride, group, RsvpStatus::Attending)
    }

    fn table(id: &str, capacity: u32) -> Table {
        Table::new(id, id, TableShape::Round, capacity, Position::default())
    }

    fn table_of<'a>(guests: &'a [Guest], id: &str) -> Option<&'a str> {
        guests
            .iter()
            .find(|g| g.id.as_str() == id)
            .and_then(|g| g.table_id.as_ref())
            .map(TableId::as_str)
    }

    #[test]
    fn assign_rejects_full_table_until_override() {
        let tables = TableRegistry::from_tables([table("t1", 1)]);
        let mut guests = vec![
            guest("g1", GuestGroup::Family).seated_at("t1"),
            guest("g2", GuestGroup::Family),
        ];

        let err = assign_guest(&tables, &mut guests, &"g2".into(), &"t1".into(), AssignOptions::STRICT)
            .unwrap_err();
        assert_eq!(err.seated, 1);
        assert_eq!(err.to_string(), "table \"t1\" is full (1/1)");
        assert_eq!(guests[1].table_id, None);

        let outcome =
            assign_guest(&tables, &mut guests, &"g2".into(), &"t1".into(), AssignOptions::OVERRIDE)
                .unwrap();
        assert!(outcome.change().unwrap().over_capacity);
        assert_eq!(seated_count(&guests, &"t1".into()), 2);
    }

    #[test]
    fn assign_ignores_unknown_ids_and_non_attending_guests() {
        let tables = TableRegistry::from_tables([table("t1", 8)]);
        let mut guests = vec![Guest::new(
            "g1",
            "Mehmet",
            Side::Bride,
            GuestGroup::Colleagues,
            RsvpStatus::Declined,
        )];

        for (guest_id, table_id) in [("g1", "t1"), ("ghost", "t1"), ("g1", "t9")] {
            let outcome = assign_guest(
                &tables,
                &mut guests,
                &guest_id.into(),
                &table_id.into(),
                AssignOptions::STRICT,
            );
            assert_eq!(outcome, Ok(SeatOutcome::Unchanged));
        }
        assert_eq!(guests[0].table_id, None);
    }

    #[test]
    fn reseat_moves_guest_and_reports_previous_table() {
        let tables = TableRegistry::from_tables([table("t1", 8), table("t2", 8)]);
        let mut guests = vec![guest("g1", GuestGroup::Friends).seated_at("t1")];

        let outcome =
            assign_guest(&tables, &mut guests, &"g1".into(), &"t2".into(), AssignOptions::STRICT)
                .unwrap();

        assert_eq!(outcome.change().unwrap().previous, Some("t1".into()));
        assert_eq!(table_of(&guests, "g1"), Some("t2"));
        assert_eq!(seated_count(&guests, &"t1".into()), 0);
    }

    #[test]
    fn reassign_to_same_full_table_is_unchanged() {
        let tables = TableRegistry::from_tables([table("t1", 1)]);
        let mut guests = vec![guest("g1", GuestGroup::Friends).seated_at("t1")];

        let outcome =
            assign_guest(&tables, &mut guests, &"g1".into(), &"t1".into(), AssignOptions::STRICT);

        assert_eq!(outcome, Ok(SeatOutcome::Unchanged));
    }

    #[test]
    fn unassign_is_idempotent() {
        let mut guests = vec![guest("g1", GuestGroup::Family).seated_at("t1")];

        assert_eq!(unassign_guest(&mut guests, &"g1".into()), Some("t1".into()));
        assert_eq!(unassign_guest(&mut guests, &"g1".into()), None);
        assert_eq!(unassign_guest(&mut guests, &"ghost".into()), None);
        assert_eq!(guests[0].table_id, None);
    }

    #[test]
    fn whole_groups_are_placed_in_first_encounter_order() {
        let guests = vec![
            guest("f1", GuestGroup::Friends),
            guest("c1", GuestGroup::Colleagues),
            guest("f2", GuestGroup::Friends),
            guest("c2", GuestGroup::Colleagues),
            guest("c3", GuestGroup::Colleagues),
        ];
        let tables = [table("t1", 3), table("t2", 3)];

        let guests = auto_assign(guests, &tables);

        // Friends (2) fit at t1 first; colleagues (3) no longer fit whole, so one is peeled.
        assert_eq!(table_of(&guests, "f1"), Some("t1"));
        assert_eq!(table_of(&guests, "f2"), Some("t1"));
        assert_eq!(table_of(&guests, "c3"), Some("t1"));
        assert_eq!(table_of(&guests, "c1"), Some("t2"));
        assert_eq!(table_of(&guests, "c2"), Some("t2"));
    }

    #[test]
    fn peel_takes_members_from_the_tail() {
        let guests: Vec<Guest> = (1..=10)
            .map(|n| guest(&format!("g{n}"), GuestGroup::Family))
            .collect();
        let tables = [table("t1", 8), table("t2", 8)];

        let report = plan_auto_assign(
            &guests,
            &tables,
            &ConflictSet::empty(),
            &AutoAssignOptions::default(),
        );

        let at_t1: Vec<&str> = report
            .placed
            .iter()
            .filter(|p| p.table_id.as_str() == "t1")
            .map(|p| p.guest_id.as_str())
            .collect();
        assert_eq!(at_t1, ["g10", "g9", "g8", "g7", "g6", "g5", "g4", "g3"]);
        assert_eq!(report.placed.len(), 10);
        assert!(report.unplaced.is_empty());
    }

    #[test]
    fn seated_and_ineligible_guests_are_untouched() {
        let guests = vec![
            guest("g1", GuestGroup::Family).seated_at("t2"),
            Guest::new("g2", "Pending", Side::Groom, GuestGroup::Family, RsvpStatus::Pending),
            Guest::new("g3", "Declined", Side::Groom, GuestGroup::Family, RsvpStatus::Declined),
            guest("g4", GuestGroup::Family),
        ];
        let tables = [table("t1", 8), table("t2", 8)];

        let result = auto_assign(guests, &tables);

        assert_eq!(table_of(&result, "g1"), Some("t2"));
        assert_eq!(table_of(&result, "g2"), None);
        assert_eq!(table_of(&result, "g3"), None);
        assert_eq!(table_of(&result, "g4"), Some("t1"));
    }

    #[test]
    fn over_capacity_tables_are_skipped() {
        let guests = vec![
            guest("a", GuestGroup::Other).seated_at("t1"),
            guest("b", GuestGroup::Other).seated_at("t1"),
            guest("c", GuestGroup::Other),
        ];
        let tables = [table("t1", 1), table("t2", 1)];

        let result = auto_assign(guests, &tables);

        assert_eq!(table_of(&result, "c"), Some("t2"));
    }

    #[test]
    fn insufficient_capacity_leaves_guests_unplaced_in_roster_order() {
        let mut guests: Vec<Guest> = (1..=5)
            .map(|n| guest(&format!("g{n}"), GuestGroup::Friends))
            .collect();
        let tables = [table("t1", 3)];

        let report = auto_assign_with(
            &mut guests,
            &tables,
            &ConflictSet::empty(),
            &AutoAssignOptions::default(),
        );

        assert_eq!(report.placed.len(), 3);
        assert_eq!(report.unplaced, vec![GuestId::from("g1"), GuestId::from("g2")]);
    }

    #[test]
    fn ignore_policy_co_seats_conflicting_guests() {
        let guests = vec![guest("g1", GuestGroup::Family), guest("g3", GuestGroup::Family)];
        let conflicts = ConflictSet::new([Conflict::new("c1", "g1", "g3", "feud")]);

        let report = plan_auto_assign(
            &guests,
            &[table("t1", 8)],
            &conflicts,
            &AutoAssignOptions::default(),
        );

        assert_eq!(report.placed.len(), 2);
    }

    #[test]
    fn avoid_policy_splits_conflicting_pair() {
        let guests = vec![
            guest("g1", GuestGroup::Family),
            guest("g2", GuestGroup::Family),
            guest("g3", GuestGroup::Family),
        ];
        let conflicts = ConflictSet::new([Conflict::new("c1", "g1", "g3", "feud")]);
        let options = AutoAssignOptions {
            conflict_policy: ConflictPolicy::Avoid,
        };

        let report = plan_auto_assign(&guests, &[table("t1", 8), table("t2", 8)], &conflicts, &options);

        let table_for = |id: &str| {
            report
                .placed
                .iter()
                .find(|p| p.guest_id.as_str() == id)
                .map(|p| p.table_id.as_str())
        };
        // Peel from the tail: g3, g2 join t1; g1 conflicts with g3 and waits for t2.
        assert_eq!(table_for("g3"), Some("t1"));
        assert_eq!(table_for("g2"), Some("t1"));
        assert_eq!(table_for("g1"), Some("t2"));
    }

    #[test]
    fn avoid_policy_respects_existing_occupants() {
        let guests = vec![
            guest("g1", GuestGroup::Family).seated_at("t1"),
            guest("g3", GuestGroup::Friends),
        ];
        let conflicts = ConflictSet::new([Conflict::new("c1", "g3", "g1", "feud")]);
        let options = AutoAssignOptions {
            conflict_policy: ConflictPolicy::Avoid,
        };

        let report = plan_auto_assign(&guests, &[table("t1", 8)], &conflicts, &options);

        assert!(report.placed.is_empty());
        assert_eq!(report.unplaced, vec![GuestId::from("g3")]);
    }

    #[test]
    fn conflict_policy_parses() {
        assert_eq!("Avoid".parse::<ConflictPolicy>().unwrap(), ConflictPolicy::Avoid);
        assert!("maybe".parse::<ConflictPolicy>().is_err());
    }
}
