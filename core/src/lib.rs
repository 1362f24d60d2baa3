//! # Seating Core
//!
//! Core traits and types for the seating engine.
//!
//! The engine follows the Reducer pattern: every operation is an action,
//! a reducer validates it against the current state, applies the resulting
//! event in place and returns effect descriptions for the runtime to execute.
//!
//! ## Core Concepts
//!
//! - **State**: The owned, in-memory seating plan
//! - **Action**: All possible inputs to a reducer (commands and events)
//! - **Reducer**: Pure function `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: Side effect descriptions (not execution)
//! - **Environment**: Injected dependencies via traits
//!
//! ## Example
//!
//! ```
//! use seating_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};
//!
//! #[derive(Clone, Debug, Default)]
//! struct CounterState {
//!     count: u32,
//! }
//!
//! #[derive(Clone, Debug, PartialEq)]
//! enum CounterAction {
//!     Increment,
//!     Incremented { count: u32 },
//! }
//!
//! struct CounterReducer;
//!
//! impl Reducer for CounterReducer {
//!     type State = CounterState;
//!     type Action = CounterAction;
//!     type Environment = ();
//!
//!     fn reduce(
//!         &self,
//!         state: &mut CounterState,
//!         action: CounterAction,
//!         _env: &(),
//!     ) -> SmallVec<[Effect<CounterAction>; 4]> {
//!         match action {
//!             CounterAction::Increment => {
//!                 state.count += 1;
//!                 smallvec![Effect::Publish(CounterAction::Incremented { count: state.count })]
//!             }
//!             CounterAction::Incremented { .. } => SmallVec::new(),
//!         }
//!     }
//! }
//!
//! let mut state = CounterState::default();
//! let effects = CounterReducer.reduce(&mut state, CounterAction::Increment, &());
//! assert_eq!(state.count, 1);
//! assert_eq!(effects.len(), 1);
//! ```

pub use smallvec::{SmallVec, smallvec};

/// Reducer module - The core trait for business logic
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`.
/// They contain all business logic and are deterministic and testable.
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait - core abstraction for business logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The domain state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// This is a pure function that:
        /// 1. Validates the action
        /// 2. Updates state in place
        /// 3. Returns effect descriptions to be executed
        ///
        /// Most reducers return zero or one effect, so the result is a
        /// `SmallVec` that stays on the stack for the common case.
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - Side effect descriptions
///
/// Effects are values, not execution. The engine is synchronous and has no
/// I/O of its own, so the only side effect a reducer can ask for is telling
/// the outside world what happened.
pub mod effect {
    /// Effect type - describes a side effect to be executed by the runtime
    ///
    /// # Type Parameters
    ///
    /// - `Action`: The action type carried by published notifications
    #[derive(Clone, Debug, PartialEq)]
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Notify every subscriber of the store about an event
        ///
        /// Used to hand updated guest assignments back to the roster owner
        /// and to tell renderers that the layout changed.
        Publish(Action),
    }

    impl<Action> Effect<Action> {
        /// Returns `true` for [`Effect::None`]
        #[must_use]
        pub const fn is_none(&self) -> bool {
            matches!(self, Self::None)
        }

        /// Returns the published action, if this effect publishes one
        #[must_use]
        pub const fn published(&self) -> Option<&Action> {
            match self {
                Self::Publish(action) => Some(action),
                Self::None => None,
            }
        }
    }
}

/// Environment module - Dependency injection traits
///
/// All sources of non-determinism are abstracted behind traits and injected
/// via the Environment parameter.
pub mod environment {
    use uuid::Uuid;

    /// Id generator - abstracts identifier creation for testability
    ///
    /// # Examples
    ///
    /// ```
    /// use seating_core::environment::{IdGenerator, UuidGenerator};
    ///
    /// let ids = UuidGenerator;
    /// assert_ne!(ids.next_id(), ids.next_id());
    /// ```
    pub trait IdGenerator: Send + Sync {
        /// Produce a fresh, unique identifier
        fn next_id(&self) -> String;
    }

    /// Production id generator backed by random v4 UUIDs
    #[derive(Clone, Copy, Debug, Default)]
    pub struct UuidGenerator;

    impl IdGenerator for UuidGenerator {
        fn next_id(&self) -> String {
            Uuid::new_v4().to_string()
        }
    }
}
