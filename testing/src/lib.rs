//! # Seating Testing
//!
//! Testing utilities and helpers for the seating engine.
//!
//! This crate provides:
//! - Deterministic implementations of Environment traits
//! - A Given-When-Then harness for reducers
//! - Assertion helpers for effects
//!
//! ## Example
//!
//! ```ignore
//! use seating_testing::{ReducerTest, SequentialIds};
//!
//! ReducerTest::new(SeatingReducer::new())
//!     .with_env(SeatingEnvironment::new(Arc::new(SequentialIds::new("t"))))
//!     .given_state(SeatingState::default())
//!     .when_action(SeatingAction::AddTable { draft: TableDraft::default() })
//!     .then_state(|state| assert_eq!(state.tables.len(), 1))
//!     .run();
//! ```


/// Deterministic implementations of Environment traits
pub mod mocks {
    use seating_core::environment::IdGenerator;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Sequential id generator for deterministic tests
    ///
    /// Produces `{prefix}1`, `{prefix}2`, ... in call order.
    ///
    /// # Example
    ///
    /// ```
    /// use seating_testing::mocks::SequentialIds;
    /// use seating_core::environment::IdGenerator;
    ///
    /// let ids = SequentialIds::new("t");
    /// assert_eq!(ids.next_id(), "t1");
    /// assert_eq!(ids.next_id(), "t2");
    /// ```
    #[derive(Debug)]
    pub struct SequentialIds {
        prefix: String,
        next: AtomicUsize,
    }

    impl SequentialIds {
        /// Create a generator whose first id is `{prefix}1`
        #[must_use]
        pub fn new(prefix: impl Into<String>) -> Self {
            Self::starting_at(prefix, 1)
        }

        /// Create a generator whose first id is `{prefix}{first}`
        #[must_use]
        pub fn starting_at(prefix: impl Into<String>, first: usize) -> Self {
            Self {
                prefix: prefix.into(),
                next: AtomicUsize::new(first),
            }
        }
    }

    impl IdGenerator for SequentialIds {
        fn next_id(&self) -> String {
            let n = self.next.fetch_add(1, Ordering::Relaxed);
            format!("{}{n}", self.prefix)
        }
    }
}

pub use mocks::SequentialIds;
pub use reducer_test::{ReducerTest, assertions};

#[cfg(test)]
mod tests {
    use super::*;
    use seating_core::environment::IdGenerator;

    #[test]
    fn sequential_ids_continue_from_offset() {
        let ids = SequentialIds::starting_at("t", 7);
        assert_eq!(ids.next_id(), "t7");
        assert_eq!(ids.next_id(), "t8");
    }
}
