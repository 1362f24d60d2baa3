//! End-to-end seating scenarios
//!
//! Each scenario runs once against the plain engine functions and, where a
//! command exists, once through a store so both surfaces stay in agreement.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

mod common;

use common::{attending, attending_group, round, store, table_of};
use seating::{
    AssignOptions, Conflict, ConflictSet, GuestGroup, SeatOutcome, SeatingAction, SeatingState,
    TableId, TableRegistry, assign_guest, auto_assign, auto_assign_with, has_conflict, sample,
    unassign_guest,
};
use std::cell::RefCell;
use std::rc::Rc;

#[test]
fn family_of_eight_fills_one_table() {
    let guests = attending_group("g", 8, GuestGroup::Family);
    let tables = [round("t1", 8)];

    let result = auto_assign(guests, &tables);

    assert!(result.iter().all(|g| table_of(&result, g.id.as_str()) == Some("t1")));
}

#[test]
fn group_of_ten_is_split_across_two_tables() {
    let guests = attending_group("g", 10, GuestGroup::Friends);
    let tables = [round("t1", 8), round("t2", 8)];

    let result = auto_assign(guests, &tables);

    let at = |table: &str| {
        result
            .iter()
            .filter(|g| g.table_id.as_ref().map(TableId::as_str) == Some(table))
            .count()
    };
    assert_eq!(at("t1"), 8);
    assert_eq!(at("t2"), 2);
    assert!(result.iter().all(|g| g.is_seated()));
}

#[test]
fn conflicting_pair_is_reported_but_not_blocked() {
    let tables = TableRegistry::from_tables([round("t2", 8)]);
    let conflicts = ConflictSet::new([Conflict::new("c1", "g1", "g3", "Political differences")]);
    let mut guests = vec![
        attending("g1", GuestGroup::Family).seated_at("t2"),
        attending("g3", GuestGroup::Colleagues),
    ];

    let outcome = assign_guest(
        &tables,
        &mut guests,
        &"g3".into(),
        &"t2".into(),
        AssignOptions::STRICT,
    )
    .unwrap();

    assert!(matches!(outcome, SeatOutcome::Seated(_)));
    let seated = seating::engine::seated(&guests, &"t2".into());
    assert!(has_conflict(seated.iter().copied(), conflicts.as_slice()));

    let state = SeatingState::new(tables, guests, conflicts);
    assert!(state.has_conflict(&"t2".into()));
    assert_eq!(state.summary().conflicted_tables, 1);
}

#[test]
fn deleting_a_table_unseats_its_guests() {
    let state = SeatingState::new(
        TableRegistry::from_tables([round("t1", 8), round("t2", 8)]),
        vec![
            attending("g1", GuestGroup::Family).seated_at("t1"),
            attending("g2", GuestGroup::Family).seated_at("t1"),
            attending("g3", GuestGroup::Family).seated_at("t1"),
            attending("g4", GuestGroup::Friends).seated_at("t2"),
        ],
        ConflictSet::empty(),
    );
    let mut store = store(state);

    store.send(SeatingAction::DeleteTable {
        table_id: "t1".into(),
    });

    let state = store.current();
    assert!(state.table(&"t1".into()).is_none());
    for id in ["g1", "g2", "g3"] {
        assert_eq!(table_of(&state.guests, id), None);
    }
    assert_eq!(table_of(&state.guests, "g4"), Some("t2"));
}

#[test]
fn full_table_rejects_until_confirmed() {
    let mut guests = attending_group("g", 8, GuestGroup::Family)
        .into_iter()
        .map(|g| g.seated_at("t1"))
        .collect::<Vec<_>>();
    guests.push(attending("g9", GuestGroup::Other));
    let mut store = store(SeatingState::new(
        TableRegistry::from_tables([round("t1", 8)]),
        guests,
        ConflictSet::empty(),
    ));

    let rejected = store.send(SeatingAction::AssignGuest {
        guest_id: "g9".into(),
        table_id: "t1".into(),
        allow_over_capacity: false,
    });
    assert!(matches!(
        rejected.as_slice(),
        [SeatingAction::AssignmentRejected { .. }]
    ));
    assert_eq!(table_of(&store.current().guests, "g9"), None);
    assert_eq!(store.current().seated_count(&"t1".into()), 8);

    store.send(SeatingAction::AssignGuest {
        guest_id: "g9".into(),
        table_id: "t1".into(),
        allow_over_capacity: true,
    });
    assert_eq!(store.current().seated_count(&"t1".into()), 9);
    assert_eq!(store.current().summary().over_capacity_tables, 1);
}

#[test]
fn assign_then_unassign_restores_prior_seat() {
    let tables = TableRegistry::from_tables([round("t1", 8)]);
    let mut guests = vec![attending("g1", GuestGroup::Family)];
    let before = guests.clone();

    assign_guest(&tables, &mut guests, &"g1".into(), &"t1".into(), AssignOptions::STRICT).unwrap();
    unassign_guest(&mut guests, &"g1".into());

    assert_eq!(guests, before);
}

#[test]
fn unassign_twice_equals_once() {
    let mut store = store(sample::reception());
    store.send(SeatingAction::AutoAssign);

    let first = store.send(SeatingAction::UnassignGuest {
        guest_id: "1".into(),
    });
    let after_first = store.current().clone();
    let second = store.send(SeatingAction::UnassignGuest {
        guest_id: "1".into(),
    });

    assert_eq!(first.len(), 1);
    assert!(second.is_empty());
    assert_eq!(*store.current(), after_first);
}

#[test]
fn auto_assign_with_nobody_to_place_changes_nothing() {
    let guests = vec![
        attending("g1", GuestGroup::Family).seated_at("t1"),
        seating::Guest::new(
            "g2",
            "Declined",
            seating::Side::Groom,
            GuestGroup::Friends,
            seating::RsvpStatus::Declined,
        ),
    ];
    let tables = [round("t1", 8), round("t2", 8)];

    assert_eq!(auto_assign(guests.clone(), &tables), guests);
}

#[test]
fn insufficient_capacity_leaves_excess_unassigned() {
    let mut guests = attending_group("g", 12, GuestGroup::Colleagues);
    let tables = [round("t1", 4), round("t2", 5)];

    let report = auto_assign_with(
        &mut guests,
        &tables,
        &ConflictSet::empty(),
        &seating::AutoAssignOptions::default(),
    );

    assert_eq!(report.placed.len(), 9);
    assert_eq!(report.unplaced.len(), 3);
    assert_eq!(guests.iter().filter(|g| g.is_seated()).count(), 9);
}

#[test]
fn sample_reception_seats_every_attending_guest_at_the_head_table() {
    let mut store = store(sample::reception());
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    store.subscribe(move |event| sink.borrow_mut().push(event.clone()));

    store.send(SeatingAction::AutoAssign);

    let state = store.current();
    for id in ["1", "4", "5"] {
        assert_eq!(table_of(&state.guests, id), Some("t1"));
    }
    assert_eq!(table_of(&state.guests, "2"), None);
    assert_eq!(table_of(&state.guests, "3"), None);
    assert!(!state.has_conflict(&"t1".into()));
    assert_eq!(seen.borrow().len(), 1);
    assert!(seen.borrow()[0].changes_seats());
}

#[test]
fn new_tables_get_sequential_names_and_ids() {
    let mut store = store(sample::reception());

    store.send_all([
        SeatingAction::AddTable {
            draft: seating::TableDraft::default(),
        },
        SeatingAction::AddTable {
            draft: seating::TableDraft::default().named("Kids"),
        },
    ]);

    let state = store.current();
    assert_eq!(state.tables.len(), 8);
    assert_eq!(state.table(&"n1".into()).unwrap().name, "Table 7");
    assert_eq!(state.table(&"n2".into()).unwrap().name, "Kids");
    assert_eq!(store.processed(), 2);
}

#[test]
fn snapshot_serializes_with_camel_case_guest_fields() {
    let mut store = store(sample::reception());
    store.send(SeatingAction::AutoAssign);

    let json = serde_json::to_value(store.current().snapshot()).unwrap();

    assert_eq!(json["tables"][0]["id"], "t1");
    assert_eq!(json["tables"][0]["x"], 300.0);
    assert_eq!(json["guests"][0]["fullName"], "Fatima Yilmaz");
    assert_eq!(json["guests"][0]["tableId"], "t1");
    assert!(json["guests"][1].get("tableId").is_none());
}
