//! Table Registry.
//!
//! Owns the ordered set of physical tables. Registry order is insertion
//! order and is the table iteration order used by auto-assignment.

use crate::types::{Guest, GuestId, Position, Table, TableId, TableShape};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors surfaced by explicit table-creation requests
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A table must seat at least one guest
    #[error("table capacity must be greater than zero")]
    ZeroCapacity,

    /// Generated ids are expected to be unique
    #[error("table id `{0}` is already registered")]
    DuplicateId(TableId),
}

/// Defaults applied to fields a [`TableDraft`] leaves unset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableDefaults {
    /// Seats per new table
    pub capacity: u32,
    /// Shape of a new table
    pub shape: TableShape,
    /// Where a new table appears on the canvas
    pub position: Position,
    /// New tables are named `"{name_prefix} {n}"`
    pub name_prefix: String,
}

impl Default for TableDefaults {
    fn default() -> Self {
        Self {
            capacity: 8,
            shape: TableShape::Round,
            position: Position::new(100.0, 100.0),
            name_prefix: "Table".to_string(),
        }
    }
}

/// Request to create a table; unset fields fall back to [`TableDefaults`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableDraft {
    /// Display name
    pub name: Option<String>,
    /// Shape
    pub shape: Option<TableShape>,
    /// Capacity, must be positive when given
    pub capacity: Option<u32>,
    /// Initial canvas position
    pub position: Option<Position>,
}

impl TableDraft {
    /// Sets the name
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the shape
    #[must_use]
    pub const fn shape(mut self, shape: TableShape) -> Self {
        self.shape = Some(shape);
        self
    }

    /// Sets the capacity
    #[must_use]
    pub const fn capacity(mut self, capacity: u32) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// Sets the initial position
    #[must_use]
    pub const fn at(mut self, x: f64, y: f64) -> Self {
        self.position = Some(Position::new(x, y));
        self
    }
}

/// Partial update for an existing table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TablePatch {
    /// Rename
    pub name: Option<String>,
    /// Reshape
    pub shape: Option<TableShape>,
    /// Resize; zero is ignored
    pub capacity: Option<u32>,
    /// Reposition; clamped to non-negative coordinates
    pub position: Option<Position>,
}

impl TablePatch {
    /// A patch that only renames
    #[must_use]
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// A patch that only resizes
    #[must_use]
    pub fn resize(capacity: u32) -> Self {
        Self {
            capacity: Some(capacity),
            ..Self::default()
        }
    }

    /// Whether applying the patch could change anything
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.shape.is_none()
            && self.capacity.is_none()
            && self.position.is_none()
    }

    /// Writes the patch into `table`
    pub fn apply_to(self, table: &mut Table) {
        if let Some(name) = self.name {
            table.name = name;
        }
        if let Some(shape) = self.shape {
            table.shape = shape;
        }
        if let Some(capacity) = self.capacity.filter(|c| *c > 0) {
            table.capacity = capacity;
        }
        if let Some(position) = self.position {
            table.position = position.clamped();
        }
    }
}

/// Result of deleting a table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeletedTable {
    /// The removed table
    pub table: Table,
    /// Guests whose seat was cleared by the cascade, in roster order
    pub unseated: Vec<GuestId>,
}

/// Ordered collection of tables
///
/// Deserializes through [`TableRegistry::from_tables`], so a loaded snapshot
/// gets the same checks as one built in code.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Table>", into = "Vec<Table>")]
pub struct TableRegistry {
    tables: Vec<Table>,
}

impl From<Vec<Table>> for TableRegistry {
    fn from(tables: Vec<Table>) -> Self {
        Self::from_tables(tables)
    }
}

impl From<TableRegistry> for Vec<Table> {
    fn from(registry: TableRegistry) -> Self {
        registry.tables
    }
}

impl TableRegistry {
    /// Creates an empty registry
    #[must_use]
    pub const fn new() -> Self {
        Self { tables: Vec::new() }
    }

    /// Builds a registry from existing tables, keeping their order.
    ///
    /// Later duplicates of an id and zero-capacity tables are dropped.
    #[must_use]
    pub fn from_tables(tables: impl IntoIterator<Item = Table>) -> Self {
        let mut registry = Self::new();
        for table in tables {
            if let Err(error) = registry.insert(table) {
                tracing::warn!(%error, "Dropping invalid table");
            }
        }
        registry
    }

    /// Resolves a draft into a complete table without registering it
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::ZeroCapacity`] if the draft asks for zero seats
    /// and [`RegistryError::DuplicateId`] if `id` is taken.
    pub fn prepare(
        &self,
        id: TableId,
        draft: TableDraft,
        defaults: &TableDefaults,
    ) -> Result<Table, RegistryError> {
        if self.contains(&id) {
            return Err(RegistryError::DuplicateId(id));
        }
        let capacity = draft.capacity.unwrap_or(defaults.capacity);
        if capacity == 0 {
            return Err(RegistryError::ZeroCapacity);
        }
        let name = draft
            .name
            .unwrap_or_else(|| format!("{} {}", defaults.name_prefix, self.tables.len() + 1));

        Ok(Table::new(
            id,
            name,
            draft.shape.unwrap_or(defaults.shape),
            capacity,
            draft.position.unwrap_or(defaults.position),
        ))
    }

    /// Creates and registers a table, appending it to the registry order
    ///
    /// # Errors
    ///
    /// See [`TableRegistry::prepare`].
    pub fn add(
        &mut self,
        id: TableId,
        draft: TableDraft,
        defaults: &TableDefaults,
    ) -> Result<&Table, RegistryError> {
        let table = self.prepare(id, draft, defaults)?;
        self.insert(table)
    }

    /// Appends an already-built table. Its position is clamped.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateId`] if the id is taken and
    /// [`RegistryError::ZeroCapacity`] if the table has no seats.
    pub fn insert(&mut self, mut table: Table) -> Result<&Table, RegistryError> {
        if self.contains(&table.id) {
            return Err(RegistryError::DuplicateId(table.id));
        }
        if table.capacity == 0 {
            return Err(RegistryError::ZeroCapacity);
        }
        table.position = table.position.clamped();
        self.tables.push(table);
        Ok(&self.tables[self.tables.len() - 1])
    }

    /// Overwrites the registered table with the same id, keeping its slot.
    ///
    /// Returns `false`, leaving the registry untouched, when the id is unknown
    /// or the replacement has no seats.
    pub fn replace(&mut self, mut table: Table) -> bool {
        if table.capacity == 0 {
            return false;
        }
        let Some(slot) = self.get_mut(&table.id) else {
            return false;
        };
        table.position = table.position.clamped();
        *slot = table;
        true
    }

    /// Applies a partial update. Returns `false` when `id` is unknown.
    pub fn update(&mut self, id: &TableId, patch: TablePatch) -> bool {
        let Some(table) = self.get_mut(id) else {
            return false;
        };
        patch.apply_to(table);
        true
    }

    /// Moves a table. Coordinates are clamped to be non-negative.
    ///
    /// Returns the stored position, or `None` when `id` is unknown.
    pub fn move_to(&mut self, id: &TableId, position: Position) -> Option<Position> {
        let table = self.get_mut(id)?;
        table.position = position.clamped();
        Some(table.position)
    }

    /// Removes a table and unseats every guest that referenced it
    pub fn delete(&mut self, id: &TableId, guests: &mut [Guest]) -> Option<DeletedTable> {
        let index = self.index_of(id)?;
        let table = self.tables.remove(index);

        let unseated = guests
            .iter_mut()
            .filter(|guest| guest.is_seated_at(id))
            .map(|guest| {
                guest.table_id = None;
                guest.id.clone()
            })
            .collect();

        Some(DeletedTable { table, unseated })
    }

    /// Looks up a table
    #[must_use]
    pub fn get(&self, id: &TableId) -> Option<&Table> {
        self.tables.iter().find(|t| t.id == *id)
    }

    fn get_mut(&mut self, id: &TableId) -> Option<&mut Table> {
        self.tables.iter_mut().find(|t| t.id == *id)
    }

    fn index_of(&self, id: &TableId) -> Option<usize> {
        self.tables.iter().position(|t| t.id == *id)
    }

    /// Whether a table with `id` exists
    #[must_use]
    pub fn contains(&self, id: &TableId) -> bool {
        self.get(id).is_some()
    }

    /// Tables in registry order
    pub fn iter(&self) -> std::slice::Iter<'_, Table> {
        self.tables.iter()
    }

    /// Tables in registry order, as a slice
    #[must_use]
    pub fn as_slice(&self) -> &[Table] {
        &self.tables
    }

    /// Number of tables
    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Whether there are no tables
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Sum of all table capacities
    #[must_use]
    pub fn total_capacity(&self) -> u64 {
        self.tables.iter().map(|t| u64::from(t.capacity)).sum()
    }
}

impl<'a> IntoIterator for &'a TableRegistry {
    type Item = &'a Table;
    type IntoIter = std::slice::Iter<'a, Table>;

    fn into_iter(self) -> Self::IntoIter {
        self.tables.iter()
    }
}
