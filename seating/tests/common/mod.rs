//! Shared fixtures for seating integration tests

#![allow(dead_code)] // Not every test file uses every fixture

use seating::{
    Guest, GuestGroup, Position, RsvpStatus, SeatingEnvironment, SeatingReducer, SeatingState,
    SeatingStore, Side, Table, TableShape,
};
use seating_testing::SequentialIds;
use std::sync::Arc;

/// An attending bride-side guest
pub fn attending(id: &str, group: GuestGroup) -> Guest {
    Guest::new(id, format!("Guest {id}"), Side::Bride, group, RsvpStatus::Attending)
}

/// `count` attending guests named `{prefix}1..`, all in `group`
pub fn attending_group(prefix: &str, count: usize, group: GuestGroup) -> Vec<Guest> {
    (1..=count)
        .map(|n| attending(&format!("{prefix}{n}"), group))
        .collect()
}

/// A round table at the origin
pub fn round(id: &str, capacity: u32) -> Table {
    Table::new(id, format!("Table {id}"), TableShape::Round, capacity, Position::default())
}

/// A store over `state` whose new tables are `n1`, `n2`, ...
pub fn store(state: SeatingState) -> SeatingStore {
    let env = SeatingEnvironment::new(Arc::new(SequentialIds::new("n")));
    SeatingStore::new(state, SeatingReducer::new(), env)
}

/// Table id of guest `id`, as a string
pub fn table_of<'a>(guests: &'a [Guest], id: &str) -> Option<&'a str> {
    guests
        .iter()
        .find(|g| g.id.as_str() == id)
        .and_then(|g| g.table_id.as_ref())
        .map(seating::TableId::as_str)
}
