//! Configuration for the seating engine.
//!
//! Loads configuration from environment variables with sensible defaults.
//! Unset variables fall back to the defaults; set but unparseable values are
//! reported as errors.

use crate::engine::{AutoAssignOptions, ConflictPolicy};
use crate::registry::TableDefaults;
use crate::types::{Position, TableShape};
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while reading configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A variable was set to a value that could not be used
    #[error("invalid value `{value}` for {key}")]
    Invalid {
        /// Variable name
        key: &'static str,
        /// Offending value
        value: String,
    },
}

/// Engine configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeatingConfig {
    /// Defaults for tables created without explicit fields
    pub defaults: TableDefaults,
    /// Pointer offset applied while dragging (both axes)
    pub grab_offset: f64,
    /// Conflict handling during auto-assignment
    pub conflict_policy: ConflictPolicy,
    /// Filter directive for the demo's log output
    pub log_level: String,
}

impl Default for SeatingConfig {
    fn default() -> Self {
        Self {
            defaults: TableDefaults::default(),
            grab_offset: 30.0,
            conflict_policy: ConflictPolicy::Ignore,
            log_level: "info".to_string(),
        }
    }
}

impl SeatingConfig {
    /// Load configuration from the process environment.
    ///
    /// | Variable | Default |
    /// |---|---|
    /// | `SEATING_DEFAULT_CAPACITY` | `8` |
    /// | `SEATING_DEFAULT_SHAPE` | `round` |
    /// | `SEATING_NEW_TABLE_X` / `SEATING_NEW_TABLE_Y` | `100` / `100` |
    /// | `SEATING_TABLE_NAME_PREFIX` | `Table` |
    /// | `SEATING_GRAB_OFFSET` | `30` |
    /// | `SEATING_CONFLICT_POLICY` | `ignore` |
    /// | `SEATING_LOG_LEVEL` | `info` |
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for any variable that is set but
    /// cannot be parsed, or for a default capacity of zero.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// See [`SeatingConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base = Self::default();

        let capacity: u32 = parse_or(&lookup, "SEATING_DEFAULT_CAPACITY", base.defaults.capacity)?;
        if capacity == 0 {
            return Err(ConfigError::Invalid {
                key: "SEATING_DEFAULT_CAPACITY",
                value: "0".to_string(),
            });
        }

        let grab_offset: f64 = parse_or(&lookup, "SEATING_GRAB_OFFSET", base.grab_offset)?;
        if !grab_offset.is_finite() {
            return Err(ConfigError::Invalid {
                key: "SEATING_GRAB_OFFSET",
                value: grab_offset.to_string(),
            });
        }

        Ok(Self {
            defaults: TableDefaults {
                capacity,
                shape: parse_or::<TableShape, _>(&lookup, "SEATING_DEFAULT_SHAPE", base.defaults.shape)?,
                position: Position::new(
                    parse_or(&lookup, "SEATING_NEW_TABLE_X", base.defaults.position.x)?,
                    parse_or(&lookup, "SEATING_NEW_TABLE_Y", base.defaults.position.y)?,
                )
                .clamped(),
                name_prefix: lookup("SEATING_TABLE_NAME_PREFIX")
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .unwrap_or(base.defaults.name_prefix),
            },
            grab_offset,
            conflict_policy: parse_or(&lookup, "SEATING_CONFLICT_POLICY", base.conflict_policy)?,
            log_level: lookup("SEATING_LOG_LEVEL").unwrap_or(base.log_level),
        })
    }

    /// Auto-assignment options derived from this configuration
    #[must_use]
    pub const fn auto_assign(&self) -> AutoAssignOptions {
        AutoAssignOptions {
            conflict_policy: self.conflict_policy,
        }
    }

    /// Grab offset as a position
    #[must_use]
    pub const fn grab_offset(&self) -> Position {
        Position::new(self.grab_offset, self.grab_offset)
    }
}

fn parse_or<T, F>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid { key, value: raw }),
    }
}
