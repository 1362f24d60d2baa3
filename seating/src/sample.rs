//! A small reception used by the demo binary, tests and benchmarks.

use crate::conflicts::ConflictSet;
use crate::registry::TableRegistry;
use crate::state::SeatingState;
use crate::types::{Conflict, Guest, GuestGroup, Position, RsvpStatus, Side, Table, TableShape};

/// Six tables: a head table, four rounds and two long tables
#[must_use]
pub fn hall() -> TableRegistry {
    TableRegistry::from_tables([
        Table::new("t1", "Head Table", TableShape::Head, 8, Position::new(300.0, 50.0)),
        Table::new("t2", "Table 1", TableShape::Round, 8, Position::new(100.0, 250.0)),
        Table::new("t3", "Table 2", TableShape::Round, 8, Position::new(300.0, 250.0)),
        Table::new("t4", "Table 3", TableShape::Round, 8, Position::new(500.0, 250.0)),
        Table::new("t5", "Table 4", TableShape::Rectangular, 10, Position::new(100.0, 450.0)),
        Table::new("t6", "Table 5", TableShape::Rectangular, 10, Position::new(500.0, 450.0)),
    ])
}

/// Five guests with mixed RSVP states, none seated
#[must_use]
pub fn guests() -> Vec<Guest> {
    vec![
        Guest::new("1", "Fatima Yilmaz", Side::Bride, GuestGroup::Family, RsvpStatus::Attending)
            .with_plus_one(true),
        Guest::new("2", "John Smith", Side::Groom, GuestGroup::Friends, RsvpStatus::Pending)
            .with_plus_one(true),
        Guest::new("3", "Mehmet Demir", Side::Bride, GuestGroup::Colleagues, RsvpStatus::Declined),
        Guest::new("4", "Sarah Jones", Side::Groom, GuestGroup::Family, RsvpStatus::Attending)
            .with_plus_one(true),
        Guest::new("5", "Elif Kaya", Side::Bride, GuestGroup::Friends, RsvpStatus::Attending)
            .with_plus_one(true),
    ]
}

/// One declared conflict between guests 1 and 3
#[must_use]
pub fn conflicts() -> ConflictSet {
    ConflictSet::new([Conflict::new("c1", "1", "3", "Political differences")])
}

/// The hall, roster and conflicts as one state
#[must_use]
pub fn reception() -> SeatingState {
    SeatingState::new(hall(), guests(), conflicts())
}
