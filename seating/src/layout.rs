//! Layout State.
//!
//! Table positions live on the tables themselves; this module owns the
//! transient drag session and the canvas convention used by renderers.
//! Positions are only clamped to be non-negative. A drag never fails.

use crate::registry::TableRegistry;
use crate::types::{Position, TableId, TableShape};
use serde::{Deserialize, Serialize};

/// Fixed virtual canvas the hall is drawn on
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    /// Width in canvas units
    pub width: f64,
    /// Height in canvas units
    pub height: f64,
}

/// The reception hall canvas, 1200 × 800 units
pub const CANVAS: Canvas = Canvas {
    width: 1200.0,
    height: 800.0,
};

impl Canvas {
    /// Clips a table's top-left corner so its footprint stays on the canvas.
    ///
    /// For rendering and export only; the engine stores unclipped positions.
    #[must_use]
    pub fn clip(&self, position: Position, shape: TableShape) -> Position {
        let (width, height) = shape.footprint();
        Position {
            x: position.x.clamp(0.0, (self.width - width).max(0.0)),
            y: position.y.clamp(0.0, (self.height - height).max(0.0)),
        }
    }

    /// Whether the table's footprint lies entirely on the canvas
    #[must_use]
    pub fn contains(&self, position: Position, shape: TableShape) -> bool {
        let (width, height) = shape.footprint();
        position.x >= 0.0
            && position.y >= 0.0
            && position.x + width <= self.width
            && position.y + height <= self.height
    }
}

/// A table currently being dragged
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DragSession {
    /// The dragged table
    pub table_id: TableId,
    /// Pointer offset from the table's top-left corner
    pub grab_offset: Position,
}

/// Transient drag state; at most one table is mid-drag
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutState {
    drag: Option<DragSession>,
}

impl LayoutState {
    /// No drag in progress
    #[must_use]
    pub const fn new() -> Self {
        Self { drag: None }
    }

    /// The active drag session
    #[must_use]
    pub const fn drag(&self) -> Option<&DragSession> {
        self.drag.as_ref()
    }

    /// Id of the table being dragged
    #[must_use]
    pub fn dragged_table(&self) -> Option<&TableId> {
        self.drag.as_ref().map(|d| &d.table_id)
    }

    /// Starts dragging `table_id`. Returns `false` for an unknown table.
    ///
    /// A drag already in progress on another table is replaced.
    pub fn begin_drag(
        &mut self,
        tables: &TableRegistry,
        table_id: &TableId,
        grab_offset: Position,
    ) -> bool {
        if !tables.contains(table_id) {
            return false;
        }
        if let Some(active) = self.drag.as_ref().filter(|d| d.table_id != *table_id) {
            tracing::warn!(
                active = %active.table_id,
                requested = %table_id,
                "Replacing active drag"
            );
        }
        self.drag = Some(DragSession {
            table_id: table_id.clone(),
            grab_offset,
        });
        true
    }

    /// Moves the dragged table so the grab point sits under `pointer`
    ///
    /// Returns the table and its new position, or `None` when no drag is
    /// active or the dragged table no longer exists.
    pub fn drag_to(
        &self,
        tables: &mut TableRegistry,
        pointer: Position,
    ) -> Option<(TableId, Position)> {
        let session = self.drag.as_ref()?;
        let position = tables.move_to(&session.table_id, pointer.offset_by(session.grab_offset))?;
        Some((session.table_id.clone(), position))
    }

    /// Where a pointer at `pointer` would put the dragged table
    #[must_use]
    pub fn target_for(&self, pointer: Position) -> Option<(TableId, Position)> {
        let session = self.drag.as_ref()?;
        Some((
            session.table_id.clone(),
            pointer.offset_by(session.grab_offset).clamped(),
        ))
    }

    /// Ends the drag, returning the table that was being dragged
    pub fn end_drag(&mut self) -> Option<TableId> {
        self.drag.take().map(|d| d.table_id)
    }

    /// Drops the session if it refers to a deleted table
    pub fn forget_table(&mut self, table_id: &TableId) {
        if self.dragged_table() == Some(table_id) {
            self.drag = None;
        }
    }
}

/// Moves a table, clamping coordinates to be non-negative
///
/// Returns `false` when the table is unknown.
pub fn move_table(tables: &mut TableRegistry, table_id: &TableId, x: f64, y: f64) -> bool {
    tables.move_to(table_id, Position::new(x, y)).is_some()
}
