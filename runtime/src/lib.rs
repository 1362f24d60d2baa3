//! # Seating Runtime
//!
//! Runtime implementation for the seating engine.
//!
//! The [`Store`] owns the state, runs the reducer for every action and
//! delivers published effects to subscribers. There is exactly one writer:
//! `send` takes `&mut self` and runs to completion before returning, so no
//! locking or versioning is involved.
//!
//! ## Example
//!
//! ```ignore
//! use seating_runtime::Store;
//!
//! let mut store = Store::new(initial_state, my_reducer, environment);
//!
//! store.subscribe(|event| println!("published: {event:?}"));
//!
//! // Send an action
//! let published = store.send(Action::DoSomething);
//!
//! // Read state
//! let value = store.state(|s| s.some_field);
//! ```

use seating_core::{effect::Effect, reducer::Reducer};
use smallvec::SmallVec;

/// Callback invoked for every published action
type Subscriber<A> = Box<dyn FnMut(&A)>;

/// The Store - runtime coordinator for a reducer
///
/// # Type Parameters
///
/// - `S`: State type
/// - `A`: Action type
/// - `E`: Environment type
/// - `R`: Reducer implementation
pub struct Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    state: S,
    reducer: R,
    environment: E,
    subscribers: Vec<Subscriber<A>>,
    processed: u64,
}

impl<S, A, E, R> Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    /// Create a new store with initial state, reducer, and environment
    #[must_use]
    pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
        Self {
            state: initial_state,
            reducer,
            environment,
            subscribers: Vec::new(),
            processed: 0,
        }
    }

    /// Register a subscriber that observes every published action
    ///
    /// Subscribers are called in registration order, synchronously, while
    /// `send` is executing.
    pub fn subscribe<F>(&mut self, subscriber: F)
    where
        F: FnMut(&A) + 'static,
    {
        self.subscribers.push(Box::new(subscriber));
    }

    /// Send an action to the store
    ///
    /// Runs the reducer, executes the returned effects in order and returns
    /// every action that was published while handling this one. An empty
    /// result means the action had no observable effect.
    #[tracing::instrument(skip(self, action), name = "store_send")]
    pub fn send(&mut self, action: A) -> SmallVec<[A; 4]>
    where
        A: Clone,
    {
        tracing::trace!("Processing action");
        metrics::counter!("seating.store.actions").increment(1);

        let effects = self
            .reducer
            .reduce(&mut self.state, action, &self.environment);
        self.processed += 1;

        tracing::trace!("Reducer completed, returned {} effects", effects.len());

        let mut published = SmallVec::new();
        for effect in effects {
            self.execute_effect(effect, &mut published);
        }
        published
    }

    /// Send several actions in order, collecting everything published
    pub fn send_all<I>(&mut self, actions: I) -> Vec<A>
    where
        I: IntoIterator<Item = A>,
        A: Clone,
    {
        actions
            .into_iter()
            .flat_map(|action| self.send(action))
            .collect()
    }

    fn execute_effect(&mut self, effect: Effect<A>, published: &mut SmallVec<[A; 4]>)
    where
        A: Clone,
    {
        match effect {
            Effect::None => {
                tracing::trace!("Executing Effect::None (no-op)");
                metrics::counter!("seating.store.effects", "type" => "none").increment(1);
            },
            Effect::Publish(action) => {
                tracing::trace!(
                    subscribers = self.subscribers.len(),
                    "Executing Effect::Publish"
                );
                metrics::counter!("seating.store.effects", "type" => "publish").increment(1);
                for subscriber in &mut self.subscribers {
                    subscriber(&action);
                }
                published.push(action);
            },
        }
    }

    /// Read state via a projection function
    pub fn state<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&S) -> T,
    {
        f(&self.state)
    }

    /// Borrow the current state
    #[must_use]
    pub const fn current(&self) -> &S {
        &self.state
    }

    /// Borrow the environment the reducer runs with
    #[must_use]
    pub const fn environment(&self) -> &E {
        &self.environment
    }

    /// Number of actions processed since the store was created
    #[must_use]
    pub const fn processed(&self) -> u64 {
        self.processed
    }

    /// Consume the store and return the final state
    #[must_use]
    pub fn into_state(self) -> S {
        self.state
    }
}

impl<S, A, E, R> std::fmt::Debug for Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
    S: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("state", &self.state)
            .field("subscribers", &self.subscribers.len())
            .field("processed", &self.processed)
            .finish_non_exhaustive()
    }
}
