//! Domain types for the seating engine.
//!
//! Tables are owned by the [`TableRegistry`](crate::registry::TableRegistry).
//! Guests are owned by the external guest roster; the engine only reads them
//! and rewrites `table_id`. Conflicts are supplied as a fixed input.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// ============================================================================
// Identifiers
// ============================================================================

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            #[doc = concat!("Creates a `", stringify!($name), "` from any string-like value")]
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Returns the id as a string slice
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

string_id!(
    /// Identifier of a physical table, generated by the engine's environment
    TableId
);

string_id!(
    /// Identifier of a guest, assigned by the external guest roster
    GuestId
);

string_id!(
    /// Identifier of a conflict record
    ConflictId
);

// ============================================================================
// Enumerations
// ============================================================================

/// Error returned when parsing one of the domain enumerations from text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} `{value}`")]
pub struct ParseEnumError {
    /// Which enumeration was being parsed
    pub kind: &'static str,
    /// The rejected input
    pub value: String,
}

/// Physical shape of a table
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableShape {
    /// Round table
    #[default]
    Round,
    /// Long rectangular table
    Rectangular,
    /// Head table for the couple
    Head,
}

impl TableShape {
    /// Nominal size `(width, height)` of the table on the canvas
    #[must_use]
    pub const fn footprint(self) -> (f64, f64) {
        match self {
            Self::Round => (160.0, 160.0),
            Self::Rectangular => (160.0, 240.0),
            Self::Head => (300.0, 160.0),
        }
    }

    /// Lowercase name as used in configuration and JSON
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Round => "round",
            Self::Rectangular => "rectangular",
            Self::Head => "head",
        }
    }
}

impl fmt::Display for TableShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TableShape {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "round" => Ok(Self::Round),
            "rectangular" => Ok(Self::Rectangular),
            "head" => Ok(Self::Head),
            other => Err(ParseEnumError {
                kind: "table shape",
                value: other.to_string(),
            }),
        }
    }
}

/// Which side of the couple invited the guest
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Bride's side
    Bride,
    /// Groom's side
    Groom,
}

/// Guest-list category; the unit auto-assignment tries to keep together
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuestGroup {
    /// Family members
    Family,
    /// Friends
    Friends,
    /// Work colleagues
    Colleagues,
    /// Everyone else
    Other,
}

impl fmt::Display for GuestGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Family => "family",
            Self::Friends => "friends",
            Self::Colleagues => "colleagues",
            Self::Other => "other",
        })
    }
}

/// RSVP state of a guest
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RsvpStatus {
    /// No answer yet
    Pending,
    /// Confirmed attendance
    Attending,
    /// Will not attend
    Declined,
}

// ============================================================================
// Geometry
// ============================================================================

/// A point on the layout canvas
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal offset from the canvas origin
    pub x: f64,
    /// Vertical offset from the canvas origin
    pub y: f64,
}

impl Position {
    /// Creates a position
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Clamps both coordinates to be non-negative.
    ///
    /// `NaN` coordinates collapse to zero. No upper bound is applied.
    #[must_use]
    pub fn clamped(self) -> Self {
        Self {
            x: self.x.max(0.0),
            y: self.y.max(0.0),
        }
    }

    /// Component-wise subtraction
    #[must_use]
    pub fn offset_by(self, offset: Self) -> Self {
        Self {
            x: self.x - offset.x,
            y: self.y - offset.y,
        }
    }
}

// ============================================================================
// Entities
// ============================================================================

/// A physical table in the reception hall
///
/// Deserialized tables are unchecked until they enter a
/// [`TableRegistry`](crate::registry::TableRegistry).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Unique identifier
    pub id: TableId,
    /// Display name, editable in place
    pub name: String,
    /// Physical shape
    pub shape: TableShape,
    /// Designed number of seats; always greater than zero
    pub capacity: u32,
    /// Top-left corner on the canvas
    #[serde(flatten)]
    pub position: Position,
}

impl Table {
    /// Creates a table
    #[must_use]
    pub fn new(
        id: impl Into<TableId>,
        name: impl Into<String>,
        shape: TableShape,
        capacity: u32,
        position: Position,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            shape,
            capacity,
            position: position.clamped(),
        }
    }
}

/// The part of a guest record the seating engine works with
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Guest {
    /// Roster identifier
    pub id: GuestId,
    /// Full display name
    pub full_name: String,
    /// Inviting side
    pub side: Side,
    /// Guest-list category
    pub group: GuestGroup,
    /// RSVP answer
    pub rsvp_status: RsvpStatus,
    /// Whether the guest may bring a companion
    pub plus_one_allowed: bool,
    /// Table the guest is seated at, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_id: Option<TableId>,
}

impl Guest {
    /// Creates an unseated guest without a plus-one
    #[must_use]
    pub fn new(
        id: impl Into<GuestId>,
        full_name: impl Into<String>,
        side: Side,
        group: GuestGroup,
        rsvp_status: RsvpStatus,
    ) -> Self {
        Self {
            id: id.into(),
            full_name: full_name.into(),
            side,
            group,
            rsvp_status,
            plus_one_allowed: false,
            table_id: None,
        }
    }

    /// Sets the plus-one flag
    #[must_use]
    pub const fn with_plus_one(mut self, allowed: bool) -> Self {
        self.plus_one_allowed = allowed;
        self
    }

    /// Seats the guest at `table_id`
    #[must_use]
    pub fn seated_at(mut self, table_id: impl Into<TableId>) -> Self {
        self.table_id = Some(table_id.into());
        self
    }

    /// Only attending guests are candidates for seating
    #[must_use]
    pub fn is_attending(&self) -> bool {
        self.rsvp_status == RsvpStatus::Attending
    }

    /// Whether the guest currently has a table
    #[must_use]
    pub const fn is_seated(&self) -> bool {
        self.table_id.is_some()
    }

    /// Whether the guest is seated at `table_id`
    #[must_use]
    pub fn is_seated_at(&self, table_id: &TableId) -> bool {
        self.table_id.as_ref() == Some(table_id)
    }
}

/// A declared incompatibility between two guests
///
/// The pair is unordered: `(a, b)` and `(b, a)` describe the same conflict.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conflict {
    /// Unique identifier
    pub id: ConflictId,
    /// One side of the pair
    #[serde(rename = "guestAId")]
    pub guest_a: GuestId,
    /// The other side of the pair
    #[serde(rename = "guestBId")]
    pub guest_b: GuestId,
    /// Free-text explanation shown to the planner
    pub reason: String,
}

impl Conflict {
    /// Creates a conflict record
    #[must_use]
    pub fn new(
        id: impl Into<ConflictId>,
        guest_a: impl Into<GuestId>,
        guest_b: impl Into<GuestId>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            guest_a: guest_a.into(),
            guest_b: guest_b.into(),
            reason: reason.into(),
        }
    }

    /// Whether `guest` is one of the two parties
    #[must_use]
    pub fn involves(&self, guest: &GuestId) -> bool {
        self.guest_a == *guest || self.guest_b == *guest
    }

    /// Whether this record describes the unordered pair `{a, b}`
    #[must_use]
    pub fn matches_pair(&self, a: &GuestId, b: &GuestId) -> bool {
        (self.guest_a == *a && self.guest_b == *b) || (self.guest_a == *b && self.guest_b == *a)
    }

    /// A record naming the same guest twice never applies
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.guest_a == self.guest_b
    }
}
