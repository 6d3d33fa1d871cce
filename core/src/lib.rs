//! # Unistore Core
//!
//! Core traits and types for the Unistore state container.
//!
//! This crate provides the fundamental abstractions for unidirectional state
//! management: a single immutable state value, pure reducers that fold an
//! action into a new state, and selectors that derive view-ready data.
//!
//! ## Core Concepts
//!
//! - **State**: Immutable application state, replaced (never mutated) on every action
//! - **Action**: A closed set of tagged requests for a state change
//! - **Reducer**: Pure function `(State, Action) → State`
//! - **Slice**: The part of the state owned by one reducer
//! - **Selector**: Pure derivation `State → View data`, optionally memoized
//!
//! ## Architecture Principles
//!
//! - Unidirectional Data Flow
//! - Structural sharing: untouched parts of the state keep their identity
//! - Unrecognized actions are absorbed as no-ops, reducers never fail
//!
//! ## Example
//!
//! ```
//! use unistore_core::action::Action;
//! use unistore_core::reducer::Reducer;
//!
//! #[derive(Clone, Debug)]
//! enum CounterAction {
//!     Init,
//!     Increment,
//! }
//!
//! impl Action for CounterAction {
//!     fn init() -> Self {
//!         Self::Init
//!     }
//!
//!     fn kind(&self) -> &'static str {
//!         match self {
//!             Self::Init => "@@INIT",
//!             Self::Increment => "INCREMENT",
//!         }
//!     }
//! }
//!
//! struct CounterReducer;
//!
//! impl Reducer for CounterReducer {
//!     type State = i64;
//!     type Action = CounterAction;
//!
//!     fn initial_state(&self) -> i64 {
//!         0
//!     }
//!
//!     fn reduce(&self, state: &i64, action: &CounterAction) -> i64 {
//!         match action {
//!             CounterAction::Increment => state + 1,
//!             CounterAction::Init => *state,
//!         }
//!     }
//! }
//!
//! let state = CounterReducer.reduce_or_init(None, &CounterAction::init());
//! assert_eq!(CounterReducer.reduce(&state, &CounterAction::Increment), 1);
//! ```

// Re-export commonly used types
pub use serde::{Deserialize, Serialize};

/// Reducer composition utilities
pub mod composition;

/// Memoized selectors
pub mod selector;

/// Action module - the input type for reducers
///
/// Actions describe requested state changes. They are plain values, consumed
/// once by a dispatch, and carry their payload in the variant that needs it.
pub mod action {
    /// Type tag of the synthetic action a store dispatches when it is created.
    pub const INIT_ACTION_TYPE: &str = "@@INIT";

    /// Common behavior for action types processed by a store
    ///
    /// Implemented by the action enum of an application. The store uses
    /// [`Action::init`] to force every reducer to report its default state,
    /// and [`Action::kind`] for logging.
    pub trait Action {
        /// The synthetic initialization action
        ///
        /// Must not be recognized by any reducer, so every reducer answers it
        /// with its prior (or default) state.
        fn init() -> Self;

        /// The `type` tag of this action (e.g. `"ADD_TODO"`)
        fn kind(&self) -> &'static str;
    }
}

/// Reducer module - The core trait for business logic
///
/// Reducers are pure functions: `(State, Action) → State`
///
/// They never mutate the prior state. A reducer that does not recognize an
/// action returns the prior state itself, so reference-counted states keep
/// their pointer identity.
pub mod reducer {
    use std::marker::PhantomData;

    /// The Reducer trait - core abstraction for state transitions
    ///
    /// # Type Parameters
    ///
    /// - `State`: The (slice of) state this reducer produces
    /// - `Action`: The action type this reducer processes
    ///
    /// # Contract
    ///
    /// - `reduce` must be pure and must not observe anything but its inputs
    /// - for an action it does not handle, `reduce` returns `state.clone()`,
    ///   which for `Arc`-backed states is the same allocation
    /// - `initial_state` is the documented default used when no prior state exists
    pub trait Reducer {
        /// The state type this reducer produces
        type State: Clone;

        /// The action type this reducer processes
        type Action;

        /// Default state substituted for an absent prior state
        fn initial_state(&self) -> Self::State;

        /// Fold an action into a new state
        ///
        /// # Arguments
        ///
        /// - `state`: The prior state (never mutated)
        /// - `action`: The action to process
        ///
        /// # Returns
        ///
        /// The next state
        fn reduce(&self, state: &Self::State, action: &Self::Action) -> Self::State;

        /// Fold an action into a possibly absent prior state
        ///
        /// Substitutes [`Reducer::initial_state`] when `state` is `None`.
        fn reduce_or_init(&self, state: Option<&Self::State>, action: &Self::Action) -> Self::State {
            match state {
                Some(state) => self.reduce(state, action),
                None => self.reduce(&self.initial_state(), action),
            }
        }
    }

    impl<R> Reducer for Box<R>
    where
        R: Reducer + ?Sized,
    {
        type State = R::State;
        type Action = R::Action;

        fn initial_state(&self) -> Self::State {
            (**self).initial_state()
        }

        fn reduce(&self, state: &Self::State, action: &Self::Action) -> Self::State {
            (**self).reduce(state, action)
        }
    }

    /// Build a [`Reducer`] from a default state and a closure
    ///
    /// # Example
    ///
    /// ```
    /// use unistore_core::reducer::{reducer_fn, Reducer};
    ///
    /// let adder = reducer_fn(0_i32, |state: &i32, action: &i32| state + action);
    ///
    /// assert_eq!(adder.reduce_or_init(None, &5), 5);
    /// assert_eq!(adder.reduce(&5, &2), 7);
    /// ```
    pub const fn reducer_fn<S, A, F>(initial: S, f: F) -> FnReducer<S, A, F>
    where
        S: Clone,
        F: Fn(&S, &A) -> S,
    {
        FnReducer {
            initial,
            f,
            _action: PhantomData,
        }
    }

    /// A reducer backed by a closure.
    ///
    /// Created by [`reducer_fn`].
    pub struct FnReducer<S, A, F> {
        initial: S,
        f: F,
        _action: PhantomData<fn(&A)>,
    }

    impl<S, A, F> Reducer for FnReducer<S, A, F>
    where
        S: Clone,
        F: Fn(&S, &A) -> S,
    {
        type State = S;
        type Action = A;

        fn initial_state(&self) -> S {
            self.initial.clone()
        }

        fn reduce(&self, state: &S, action: &A) -> S {
            (self.f)(state, action)
        }
    }

    impl<S: std::fmt::Debug, A, F> std::fmt::Debug for FnReducer<S, A, F> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("FnReducer")
                .field("initial", &self.initial)
                .finish_non_exhaustive()
        }
    }
}

pub use action::Action;
pub use composition::{combine_reducers, slice, CombinedReducer, SliceReducer};
pub use reducer::{reducer_fn, Reducer};
pub use selector::{create_selector, ByAddress, Selector};
